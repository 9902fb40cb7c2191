//! PDFium binding and coordinate mapping
//!
//! PDFium reports positions in PDF user space: points, origin at the
//! bottom-left corner, `y` growing upwards. Tokens and matches use page
//! space instead, with the origin at the top-left corner and `y` growing
//! downwards, so PDF and raster pages share one convention.

use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use pdfium_render::prelude::PdfRect;
use std::path::Path;

pub use pdfium_render::prelude::Pdfium;

/// Load the PDFium shared library.
///
/// An explicit `library` path is used as given. Otherwise a copy in the
/// working directory wins over the system library.
pub fn bind_pdfium(library: Option<&Path>) -> Result<Pdfium> {
    let bindings = match library {
        Some(path) => Pdfium::bind_to_library(path),
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    }
    .map_err(|e| {
        let location = library.map_or_else(|| "system library".to_string(), |p| p.display().to_string());
        PhrasemarkError::EngineUnavailable(format!("cannot load PDFium from {location}: {e:?}"))
    })?;

    tracing::debug!("PDFium bound");
    Ok(Pdfium::new(bindings))
}

/// Page-space rectangle for a PDFium rectangle on a page `page_height` points tall
pub(crate) fn to_page_space(rect: &PdfRect, page_height: f32) -> Rectangle {
    let height = f64::from(page_height);
    Rectangle::new(
        f64::from(rect.left().value),
        height - f64::from(rect.top().value),
        f64::from(rect.right().value),
        height - f64::from(rect.bottom().value),
    )
}

/// Inverse of [`to_page_space`]
pub(crate) fn to_user_space(rect: &Rectangle, page_height: f32) -> PdfRect {
    let height = f64::from(page_height);
    PdfRect::new_from_values(
        (height - rect.y1) as f32,
        rect.x0 as f32,
        (height - rect.y0) as f32,
        rect.x1 as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_page_space_flips_y() {
        // A word 12pt tall whose baseline box sits 100pt above the bottom of a letter page
        let pdf = PdfRect::new_from_values(100.0, 72.0, 112.0, 120.0);
        let rect = to_page_space(&pdf, 792.0);
        assert_eq!(rect, Rectangle::new(72.0, 680.0, 120.0, 692.0));
    }

    #[test]
    fn test_user_space_inverts_page_space() {
        let rect = Rectangle::new(10.0, 20.0, 50.0, 35.0);
        let pdf = to_user_space(&rect, 400.0);
        assert_eq!(pdf.bottom().value, 365.0);
        assert_eq!(pdf.top().value, 380.0);
        assert_eq!(pdf.left().value, 10.0);
        assert_eq!(pdf.right().value, 50.0);
        assert_eq!(to_page_space(&pdf, 400.0), rect);
    }

    #[test]
    fn test_missing_library_is_engine_unavailable() {
        let result = bind_pdfium(Some(Path::new("/nonexistent/libpdfium.so")));
        match result {
            Err(PhrasemarkError::EngineUnavailable(message)) => {
                assert!(message.contains("/nonexistent/libpdfium.so"), "{message}")
            }
            Err(other) => panic!("unexpected error: {other:?}"),
            Ok(_) => panic!("bound a library that does not exist"),
        }
    }
}
