//! End-to-end highlighting over the bundled sources and renderers

use phrasemark::render::{output_path_for, ImageRenderer, PageTarget};
use phrasemark::source::{ImageOcrSource, JsonTokenSource};
use phrasemark::text::{MockOcrProvider, OcrOptions};
use phrasemark::{
    highlight, HighlightOptions, OutlineStyle, PhrasemarkError, RecordingRenderer, Rectangle,
    SearchOptions, SearchPhrase, TokenSource,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const RECEIPT_TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext
1\t1\t0\t0\t0\t0\t0\t0\t120\t80\t-1\t
2\t1\t1\t0\t0\t0\t10\t10\t100\t50\t-1\t
3\t1\t1\t1\t0\t0\t10\t10\t100\t50\t-1\t
4\t1\t1\t1\t1\t0\t10\t10\t100\t12\t-1\t
5\t1\t1\t1\t1\t1\t10\t10\t30\t12\t95.1\tAmount
5\t1\t1\t1\t1\t2\t44\t10\t20\t12\t93.7\tdue
4\t1\t1\t1\t2\t0\t10\t40\t100\t12\t-1\t
5\t1\t1\t1\t2\t1\t10\t40\t30\t12\t90.0\tamount
5\t1\t1\t1\t2\t2\t44\t40\t20\t12\t0\tdue
5\t1\t1\t1\t2\t3\t70\t40\t30\t12\t88.5\tlater
";

const DUMP: &str = r#"{
    "pages": [
        {
            "tokens": [
                { "text": "Invoice", "rect": { "x0": 72.0, "y0": 700.0, "x1": 120.0, "y1": 712.0 } },
                { "text": "number", "rect": { "x0": 124.0, "y0": 700.0, "x1": 170.0, "y1": 712.0 } }
            ],
            "hits": [
                { "phrase": "invoice number", "rects": [ { "x0": 72.0, "y0": 699.0, "x1": 170.5, "y1": 713.0 } ] }
            ]
        },
        {
            "tokens": [
                { "text": "see", "rect": { "x0": 72.0, "y0": 600.0, "x1": 90.0, "y1": 612.0 } },
                { "text": "INVOICE", "rect": { "x0": 94.0, "y0": 600.0, "x1": 140.0, "y1": 612.0 } },
                { "text": "NUMBER", "rect": { "x0": 144.0, "y0": 600.0, "x1": 190.0, "y1": 612.0 } }
            ]
        }
    ]
}"#;

fn write_blank_png(path: &Path, width: u32, height: u32) {
    image::RgbImage::from_pixel(width, height, image::Rgb([255, 255, 255]))
        .save(path)
        .unwrap();
}

#[test]
fn test_token_dump_mixes_fast_path_and_scan() {
    let source: JsonTokenSource = DUMP.parse().unwrap();
    let mut renderer = RecordingRenderer::new();

    let report = highlight(
        &source,
        &SearchPhrase::case_insensitive("Invoice Number"),
        &mut renderer,
        &HighlightOptions::default(),
    )
    .unwrap();

    // Page 0 answers from the dump's own hits, page 1 falls back to tokens
    assert_eq!(report.pages[&0], vec![Rectangle::new(72.0, 699.0, 170.5, 713.0)]);
    assert_eq!(report.pages[&1], vec![Rectangle::new(94.0, 600.0, 190.0, 612.0)]);
    assert_eq!(renderer.matches().len(), 2);
}

#[test]
fn test_token_dump_case_sensitive() {
    let source: JsonTokenSource = DUMP.parse().unwrap();

    let report = highlight(
        &source,
        &SearchPhrase::case_sensitive("Invoice number"),
        &mut RecordingRenderer::new(),
        &HighlightOptions::default(),
    )
    .unwrap();

    assert_eq!(report.pages[&0], vec![Rectangle::new(72.0, 700.0, 170.0, 712.0)]);
    assert!(report.pages[&1].is_empty());
    assert_eq!(report.total_matches(), 1);
}

#[test]
fn test_ocr_image_outlined_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("receipt.png");
    write_blank_png(&scan, 120, 80);

    let provider = MockOcrProvider::from_tsv(RECEIPT_TSV).unwrap();
    let source = ImageOcrSource::new(vec![scan.clone()], Arc::new(provider), OcrOptions::default());
    let output = output_path_for(&scan, 0, source.page_count());
    let mut renderer = ImageRenderer::new(vec![PageTarget::new(&scan, &output)]);

    let report = highlight(
        &source,
        &SearchPhrase::case_insensitive("amount due"),
        &mut renderer,
        &HighlightOptions::default().with_style(OutlineStyle::default().with_width(1.0)),
    )
    .unwrap();

    // Second line's "due" has zero confidence, so only "amount" is boxed there
    assert_eq!(
        report.pages[&0],
        vec![
            Rectangle::new(10.0, 10.0, 64.0, 22.0),
            Rectangle::new(10.0, 40.0, 40.0, 52.0),
        ]
    );
    assert_eq!(report.outputs, vec![dir.path().join("receipt_boxed.png")]);

    let outlined = image::open(&output).unwrap().to_rgb8();
    assert_eq!(*outlined.get_pixel(10, 15), image::Rgb([255, 0, 0]));
    assert_eq!(*outlined.get_pixel(64, 15), image::Rgb([255, 0, 0]));
    assert_eq!(*outlined.get_pixel(30, 15), image::Rgb([255, 255, 255]));
    assert_eq!(*outlined.get_pixel(50, 46), image::Rgb([255, 255, 255]));
}

#[test]
fn test_multi_page_ocr_in_parallel() {
    let dir = tempfile::tempdir().unwrap();
    let pages: Vec<_> = (1..=3)
        .map(|n| {
            let path = dir.path().join(format!("page-{n}.png"));
            write_blank_png(&path, 120, 80);
            path
        })
        .collect();

    let provider = MockOcrProvider::from_tsv(RECEIPT_TSV).unwrap();
    let source = ImageOcrSource::new(pages.clone(), Arc::new(provider), OcrOptions::default());
    let input = dir.path().join("statement.pdf");
    let targets = pages
        .iter()
        .enumerate()
        .map(|(i, page)| PageTarget::new(page, output_path_for(&input, i, pages.len())))
        .collect();
    let mut renderer = ImageRenderer::new(targets);

    let options = HighlightOptions::default().with_search(SearchOptions::default().with_parallelism(3));
    let report = highlight(&source, &SearchPhrase::case_sensitive("due"), &mut renderer, &options).unwrap();

    // Each page has two "due" tokens; the zero-confidence one yields no box
    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.total_matches(), 3);
    assert_eq!(
        report.outputs,
        vec![
            dir.path().join("statement_boxed_p1.png"),
            dir.path().join("statement_boxed_p2.png"),
            dir.path().join("statement_boxed_p3.png"),
        ]
    );
    for output in &report.outputs {
        assert!(output.is_file());
    }
}

#[test]
fn test_fully_filtered_match_draws_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let scan = dir.path().join("scan.png");
    write_blank_png(&scan, 120, 80);

    let provider = MockOcrProvider::from_tsv(RECEIPT_TSV).unwrap();
    let source = ImageOcrSource::new(vec![scan.clone()], Arc::new(provider), OcrOptions::default());
    let mut renderer = RecordingRenderer::new();

    // The only "due later" has a zero-confidence "due", but "later" still counts
    let report = highlight(
        &source,
        &SearchPhrase::case_insensitive("due later"),
        &mut renderer,
        &HighlightOptions::default(),
    )
    .unwrap();
    assert_eq!(report.pages[&0], vec![Rectangle::new(70.0, 40.0, 100.0, 52.0)]);

    // A lone zero-confidence "due" matches but leaves no box
    let tsv = RECEIPT_TSV.replace("93.7\tdue", "0\tdue");
    let provider = MockOcrProvider::from_tsv(&tsv).unwrap();
    let source = ImageOcrSource::new(vec![scan], Arc::new(provider), OcrOptions::default());
    let report = highlight(
        &source,
        &SearchPhrase::case_insensitive("due"),
        &mut renderer,
        &HighlightOptions::default(),
    )
    .unwrap();
    assert!(report.pages[&0].is_empty());
}

#[test]
fn test_empty_phrase_rejected_before_extraction() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.png");

    let source = ImageOcrSource::new(
        vec![missing.clone()],
        Arc::new(MockOcrProvider::new()),
        OcrOptions::default(),
    );
    let mut renderer = ImageRenderer::new(vec![PageTarget::new(&missing, dir.path().join("out.png"))]);

    let result = highlight(
        &source,
        &SearchPhrase::case_insensitive(""),
        &mut renderer,
        &HighlightOptions::default(),
    );
    assert!(matches!(result, Err(PhrasemarkError::InvalidArgument(_))));
    assert!(!dir.path().join("out.png").exists());
}
