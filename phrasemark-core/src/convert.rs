//! Conversion of documents to PDF and to page rasters
//!
//! Office documents go through LibreOffice (`soffice`) to PDF, and PDFs
//! without a usable text layer are rasterized with poppler's `pdftoppm`. Both tools are external programs;
//! their paths and the raster resolution live in [`ConvertOptions`].

use crate::error::{PhrasemarkError, Result};
use crate::source::SourceFormat;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::Instant;
use tempfile::TempDir;

/// Prefix of the rasters written by `pdftoppm`
const RASTER_PREFIX: &str = "page";

/// External tools and raster settings
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertOptions {
    pub soffice_path: PathBuf,
    pub pdftoppm_path: PathBuf,
    /// Raster resolution in dots per inch
    pub dpi: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            soffice_path: PathBuf::from("soffice"),
            pdftoppm_path: PathBuf::from("pdftoppm"),
            dpi: 200,
        }
    }
}

impl ConvertOptions {
    pub fn with_soffice_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.soffice_path = path.into();
        self
    }

    pub fn with_pdftoppm_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdftoppm_path = path.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Page rasters living in a scratch directory removed on drop
pub struct RasterizedDocument {
    _scratch: TempDir,
    pages: Vec<PathBuf>,
}

impl RasterizedDocument {
    /// Page images in page order
    pub fn pages(&self) -> &[PathBuf] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// A PDF ready to read, converted into a scratch directory when needed
pub struct PreparedPdf {
    scratch: Option<TempDir>,
    path: PathBuf,
}

impl PreparedPdf {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the PDF was produced by converting another document
    pub fn is_converted(&self) -> bool {
        self.scratch.is_some()
    }
}

/// PDF for a PDF or office input; office documents are converted first
pub fn prepare_pdf(input: &Path, format: SourceFormat, options: &ConvertOptions) -> Result<PreparedPdf> {
    match format {
        SourceFormat::Pdf => Ok(PreparedPdf {
            scratch: None,
            path: input.to_path_buf(),
        }),
        SourceFormat::Office => {
            let scratch = tempfile::Builder::new().prefix("phrasemark-").tempdir()?;
            let path = office_to_pdf(input, scratch.path(), options)?;
            Ok(PreparedPdf {
                scratch: Some(scratch),
                path,
            })
        }
        other => Err(PhrasemarkError::UnsupportedSource(format!(
            "{other:?} input is not a document"
        ))),
    }
}

/// Rasterize a PDF or office document into a fresh scratch directory
pub fn rasterize(input: &Path, format: SourceFormat, options: &ConvertOptions) -> Result<RasterizedDocument> {
    let scratch = tempfile::Builder::new().prefix("phrasemark-").tempdir()?;

    let pdf = match format {
        SourceFormat::Pdf => input.to_path_buf(),
        SourceFormat::Office => office_to_pdf(input, scratch.path(), options)?,
        other => {
            return Err(PhrasemarkError::UnsupportedSource(format!(
                "{other:?} input cannot be rasterized"
            )))
        }
    };

    let pages = pdf_to_images(&pdf, scratch.path(), options)?;
    Ok(RasterizedDocument {
        _scratch: scratch,
        pages,
    })
}

/// Convert an office document to PDF in `out_dir`, returning the PDF path
pub fn office_to_pdf(input: &Path, out_dir: &Path, options: &ConvertOptions) -> Result<PathBuf> {
    let start = Instant::now();
    let output = run_tool(
        Command::new(&options.soffice_path)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(out_dir)
            .arg(input),
        &options.soffice_path,
    )?;
    check_status(&output, &options.soffice_path, input)?;

    let stem = input.file_stem().ok_or_else(|| {
        PhrasemarkError::ConversionFailure(format!("{} has no file name", input.display()))
    })?;
    let pdf = out_dir.join(format!("{}.pdf", stem.to_string_lossy()));
    if !pdf.is_file() {
        return Err(PhrasemarkError::ConversionFailure(format!(
            "PDF conversion failed for {}: no output produced",
            input.display()
        )));
    }

    tracing::debug!(
        input = %input.display(),
        pdf = %pdf.display(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "office document converted"
    );
    Ok(pdf)
}

/// Rasterize every page of `pdf` as PNG into `out_dir`, in page order
pub fn pdf_to_images(pdf: &Path, out_dir: &Path, options: &ConvertOptions) -> Result<Vec<PathBuf>> {
    if options.dpi == 0 {
        return Err(PhrasemarkError::InvalidArgument(
            "raster resolution must be at least 1 dpi".to_string(),
        ));
    }

    let start = Instant::now();
    let output = run_tool(
        Command::new(&options.pdftoppm_path)
            .arg("-r")
            .arg(options.dpi.to_string())
            .arg("-png")
            .arg(pdf)
            .arg(out_dir.join(RASTER_PREFIX)),
        &options.pdftoppm_path,
    )?;
    check_status(&output, &options.pdftoppm_path, pdf)?;

    let mut pages: Vec<(u32, PathBuf)> = std::fs::read_dir(out_dir)?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter_map(|path| {
            let name = path.file_name()?.to_str()?;
            raster_page_number(name).map(|number| (number, path.clone()))
        })
        .collect();
    pages.sort_by_key(|(number, _)| *number);

    if pages.is_empty() {
        return Err(PhrasemarkError::ConversionFailure(format!(
            "no pages rendered from {}",
            pdf.display()
        )));
    }

    tracing::debug!(
        pdf = %pdf.display(),
        pages = pages.len(),
        dpi = options.dpi,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "PDF rasterized"
    );
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}

/// Page number of a `pdftoppm` output name such as `page-07.png`
fn raster_page_number(file_name: &str) -> Option<u32> {
    let digits = file_name
        .strip_prefix(RASTER_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn run_tool(command: &mut Command, tool: &Path) -> Result<Output> {
    command.output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            PhrasemarkError::ConversionFailure(format!(
                "'{}' not found. Install it or set its path explicitly",
                tool.display()
            ))
        } else {
            PhrasemarkError::ConversionFailure(format!("cannot run {}: {e}", tool.display()))
        }
    })
}

fn check_status(output: &Output, tool: &Path, input: &Path) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(PhrasemarkError::ConversionFailure(format!(
        "{} failed on {} ({}): {}",
        tool.display(),
        input.display(),
        output.status,
        String::from_utf8_lossy(&output.stderr).trim()
    )))
}
