//! Outlines drawn onto page rasters

use super::{Color, OutlineStyle, Renderer};
use crate::error::{PhrasemarkError, Result};
use crate::geometry::Rectangle;
use ::image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Raster backing one page and where its outlined copy goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTarget {
    pub source: PathBuf,
    pub output: PathBuf,
}

impl PageTarget {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

struct PageCanvas {
    target: PageTarget,
    canvas: Option<RgbImage>,
}

/// Renderer that draws unfilled rectangles on RGB copies of page images.
///
/// Rasters are loaded on first use. Every page is written on
/// [`finish`](Renderer::finish), including pages without matches.
pub struct ImageRenderer {
    pages: Vec<PageCanvas>,
}

impl ImageRenderer {
    pub fn new(targets: Vec<PageTarget>) -> Self {
        Self {
            pages: targets
                .into_iter()
                .map(|target| PageCanvas { target, canvas: None })
                .collect(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn canvas(&mut self, page_index: usize) -> Result<&mut RgbImage> {
        let page = self
            .pages
            .get_mut(page_index)
            .ok_or(PhrasemarkError::InvalidPageNumber(page_index))?;
        let canvas = match page.canvas.take() {
            Some(canvas) => canvas,
            None => load_raster(&page.target.source)?,
        };
        Ok(page.canvas.insert(canvas))
    }
}

impl Renderer for ImageRenderer {
    fn draw_outline(&mut self, page_index: usize, rect: &Rectangle, style: &OutlineStyle) -> Result<()> {
        let canvas = self.canvas(page_index)?;
        draw_outline_on(canvas, rect, style.color, style.width);
        Ok(())
    }

    fn finish(&mut self) -> Result<Vec<PathBuf>> {
        let mut outputs = Vec::with_capacity(self.pages.len());
        for page in &mut self.pages {
            let canvas = match page.canvas.take() {
                Some(canvas) => canvas,
                None => load_raster(&page.target.source)?,
            };
            canvas.save(&page.target.output).map_err(|e| {
                PhrasemarkError::RenderFailure(format!(
                    "cannot write {}: {e}",
                    page.target.output.display()
                ))
            })?;
            tracing::debug!(output = %page.target.output.display(), "page written");
            outputs.push(page.target.output.clone());
        }
        Ok(outputs)
    }
}

fn load_raster(path: &Path) -> Result<RgbImage> {
    let image = ::image::open(path)
        .map_err(|e| PhrasemarkError::RenderFailure(format!("cannot read {}: {e}", path.display())))?;
    Ok(image.to_rgb8())
}

/// Draw an unfilled rectangle with the stroke growing inward from `rect`.
///
/// Coordinates are image pixels; anything outside the image is clipped.
pub fn draw_outline_on(image: &mut RgbImage, rect: &Rectangle, color: Color, width: f64) {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return;
    }

    let pixel = Rgb(color.to_rgb8());
    let stroke = width.round().max(1.0) as i64;
    let (max_x, max_y) = (i64::from(w) - 1, i64::from(h) - 1);

    // Far enough outside the image that every inset line stays outside too
    let clamp_x = |v: f64| (v.round() as i64).clamp(-stroke - 1, max_x + stroke + 1);
    let clamp_y = |v: f64| (v.round() as i64).clamp(-stroke - 1, max_y + stroke + 1);
    let (left, top, right, bottom) = (
        clamp_x(rect.x0),
        clamp_y(rect.y0),
        clamp_x(rect.x1),
        clamp_y(rect.y1),
    );

    for inset in 0..stroke {
        let (l, t, r, b) = (left + inset, top + inset, right - inset, bottom - inset);
        if l > r || t > b {
            break;
        }

        let (x_from, x_to) = (l.max(0), r.min(max_x));
        for y in [t, b] {
            if (0..=max_y).contains(&y) {
                for x in x_from..=x_to {
                    image.put_pixel(x as u32, y as u32, pixel);
                }
            }
        }

        let (y_from, y_to) = (t.max(0), b.min(max_y));
        for x in [l, r] {
            if (0..=max_x).contains(&x) {
                for y in y_from..=y_to {
                    image.put_pixel(x as u32, y as u32, pixel);
                }
            }
        }
    }
}
