use anyhow::{bail, Context, Result};
use clap::Parser;
use phrasemark::convert::{prepare_pdf, rasterize, ConvertOptions};
use phrasemark::pdfium::bind_pdfium;
use phrasemark::render::{
    output_path_for, pdf_output_path_for, report_path_for, ImageRenderer, PageTarget, PdfRenderer,
};
use phrasemark::source::{ImageOcrSource, JsonTokenSource, PdfTextSource};
use phrasemark::text::{OcrOptions, PageSegmentationMode, TesseractCliProvider};
use phrasemark::{
    highlight, Color, HighlightOptions, HighlightReport, OutlineStyle, PhrasemarkError,
    RecordingRenderer, SearchOptions, SearchPhrase, SourceFormat,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Exit status for every runtime failure
const FAILURE_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "phrasemark",
    about = "Outline every occurrence of a phrase in documents and images",
    version,
    author
)]
struct Cli {
    /// Input file (PDF, image, DOCX/XLSX or JSON token dump)
    #[arg(short, long)]
    input: PathBuf,

    /// Phrase to search for
    #[arg(short, long)]
    text: String,

    /// Match letter case exactly
    #[arg(long)]
    case_sensitive: bool,

    /// Print the match report as JSON instead of output paths
    #[arg(long)]
    json: bool,

    /// Worker threads for OCR and search (defaults to the CPU count, at most 8)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Tesseract language code(s), e.g. "eng" or "deu+eng"
    #[arg(short, long, default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (3, 4, 6, 7, 8 or 11)
    #[arg(long, default_value_t = 3)]
    psm: u8,

    /// Raster resolution for PDF and office pages that are OCR'd
    #[arg(long, default_value_t = 200)]
    dpi: u32,

    /// OCR PDF and office pages even when they have a text layer
    #[arg(long)]
    force_ocr: bool,

    /// Outline color: a name such as "red" or a #rrggbb triplet
    #[arg(long, default_value = "red")]
    color: Color,

    /// Outline stroke width (pixels on images, points on PDF pages)
    #[arg(long, default_value_t = 3.0)]
    stroke_width: f64,

    /// Tesseract executable
    #[arg(long, env = "PHRASEMARK_TESSERACT", default_value = "tesseract")]
    tesseract: PathBuf,

    /// LibreOffice executable used for DOCX/XLSX conversion
    #[arg(long, env = "PHRASEMARK_SOFFICE", default_value = "soffice")]
    soffice: PathBuf,

    /// Poppler pdftoppm executable used to rasterize PDFs
    #[arg(long, env = "PHRASEMARK_PDFTOPPM", default_value = "pdftoppm")]
    pdftoppm: PathBuf,

    /// PDFium shared library (defaults to ./ then the system library)
    #[arg(long, env = "PHRASEMARK_PDFIUM")]
    pdfium: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(FAILURE_EXIT_CODE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "phrasemark=debug"
    } else {
        "phrasemark=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if !cli.input.is_file() {
        bail!("Input file not found: {}", cli.input.display());
    }

    // Reject a bad phrase before any conversion or OCR work
    let phrase = SearchPhrase::new(cli.text.clone(), cli.case_sensitive);
    phrase.compile()?;

    let format = SourceFormat::from_path(&cli.input)?;
    let options = HighlightOptions::default()
        .with_search(search_options(cli.jobs))
        .with_style(
            OutlineStyle::default()
                .with_color(cli.color)
                .with_width(cli.stroke_width),
        );

    tracing::debug!(input = %cli.input.display(), ?format, "processing input");

    let report = match format {
        SourceFormat::Image => {
            let provider = tesseract(cli)?;
            highlight_rasters(cli, provider, &cli.input, vec![cli.input.clone()], &phrase, &options)?
        }
        SourceFormat::Pdf | SourceFormat::Office => highlight_document(cli, format, &phrase, &options)?,
        SourceFormat::TokenDump => highlight_dump(&cli.input, &phrase, &options)?,
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for output in &report.outputs {
            println!("Output created: {}", output.display());
        }
        println!(
            "Found {} match(es) for \"{}\" across {} page(s)",
            report.total_matches(),
            report.phrase,
            report.pages.len()
        );
    }
    Ok(())
}

fn search_options(jobs: Option<usize>) -> SearchOptions {
    match jobs {
        Some(jobs) => SearchOptions::default().with_parallelism(jobs),
        None => SearchOptions::default(),
    }
}

fn ocr_options(cli: &Cli) -> Result<OcrOptions> {
    let mode = PageSegmentationMode::from_psm_value(cli.psm)
        .with_context(|| format!("Unsupported page segmentation mode: {}", cli.psm))?;
    Ok(OcrOptions::default()
        .with_language(cli.lang.clone())
        .with_page_segmentation_mode(mode))
}

/// Tesseract provider, checked before any page is converted
fn tesseract(cli: &Cli) -> Result<TesseractCliProvider> {
    let provider = TesseractCliProvider::with_executable(&cli.tesseract);
    provider.check_availability().map_err(PhrasemarkError::from)?;
    Ok(provider)
}

/// Search a PDF (converted first for office input) through its text layer.
///
/// Pages are OCR'd instead when `--force-ocr` is given, when PDFium cannot
/// be loaded, or when the document has no text at all.
fn highlight_document(
    cli: &Cli,
    format: SourceFormat,
    phrase: &SearchPhrase,
    options: &HighlightOptions,
) -> Result<HighlightReport> {
    let convert = ConvertOptions::default()
        .with_soffice_path(&cli.soffice)
        .with_pdftoppm_path(&cli.pdftoppm)
        .with_dpi(cli.dpi);
    let pdf = prepare_pdf(&cli.input, format, &convert)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    if !cli.force_ocr {
        match bind_pdfium(cli.pdfium.as_deref()) {
            Ok(pdfium) => {
                let source = PdfTextSource::load(&pdfium, pdf.path(), phrase)?;
                if source.has_text_layer() {
                    let mut renderer = PdfRenderer::new(&pdfium, pdf.path(), pdf_output_path_for(&cli.input));
                    return Ok(highlight(&source, phrase, &mut renderer, options)?);
                }
                tracing::info!(pdf = %pdf.path().display(), "no text layer, falling back to OCR");
            }
            Err(e) => tracing::warn!("{e}, falling back to OCR"),
        }
    }

    let provider = tesseract(cli)?;
    let document = rasterize(pdf.path(), SourceFormat::Pdf, &convert)
        .with_context(|| format!("Failed to rasterize {}", cli.input.display()))?;
    highlight_rasters(cli, provider, &cli.input, document.pages().to_vec(), phrase, options)
}

/// OCR page rasters and write outlined copies named after `input`
fn highlight_rasters(
    cli: &Cli,
    provider: TesseractCliProvider,
    input: &Path,
    pages: Vec<PathBuf>,
    phrase: &SearchPhrase,
    options: &HighlightOptions,
) -> Result<HighlightReport> {
    let targets = pages
        .iter()
        .enumerate()
        .map(|(index, page)| PageTarget::new(page, output_path_for(input, index, pages.len())))
        .collect();

    let source = ImageOcrSource::new(pages, Arc::new(provider), ocr_options(cli)?);
    let mut renderer = ImageRenderer::new(targets);

    Ok(highlight(&source, phrase, &mut renderer, options)?)
}

/// Search a token dump and write the JSON report next to it
fn highlight_dump(input: &Path, phrase: &SearchPhrase, options: &HighlightOptions) -> Result<HighlightReport> {
    let source = JsonTokenSource::open(input)?;
    let mut report = highlight(&source, phrase, &mut RecordingRenderer::new(), options)?;

    let path = report_path_for(input);
    report.outputs.push(path.clone());

    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &report)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(report)
}
