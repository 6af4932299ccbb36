//! SVG rasterization using resvg.
//!
//! `resvg::render` draws synchronously into the pixmap and the buffer is
//! complete when the call returns, so a rendered icon can be encoded
//! immediately.

use image::{Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use serde::{Deserialize, Serialize};

use crate::catalog::SizeSpec;
use crate::error::RasterError;
use crate::icon::RasterResult;
use crate::source::VectorSource;

// ============================================================================
// ScaleMode
// ============================================================================

/// How a non-square document is mapped onto the square output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Scale uniformly so the longest side fills the icon, centered on a
    /// transparent background.
    #[default]
    Fit,
    /// Scale each axis independently to fill the icon, distorting the
    /// aspect ratio of non-square documents.
    Stretch,
}

// ============================================================================
// Rasterizer
// ============================================================================

/// Renders a vector source into a square raster for one catalog entry.
///
/// Implementations are shared across worker threads, so they must be
/// `Send + Sync` and must not mutate the source.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, source: &VectorSource, spec: &SizeSpec) -> Result<RasterResult, RasterError>;
}

/// The default [`Rasterizer`], backed by resvg.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResvgRasterizer {
    scale_mode: ScaleMode,
}

impl ResvgRasterizer {
    pub fn new(scale_mode: ScaleMode) -> Self {
        Self { scale_mode }
    }

    pub fn scale_mode(&self) -> ScaleMode {
        self.scale_mode
    }

    /// Renders `source` to a `size x size` RGBA image.
    pub fn render(&self, source: &VectorSource, size: u32) -> Result<RgbaImage, RasterError> {
        if size == 0 {
            return Err(RasterError::ZeroSize);
        }

        let (width, height) = (source.width(), source.height());
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(RasterError::InvalidDimensions { width, height });
        }

        let mut pixmap = Pixmap::new(size, size).ok_or(RasterError::Allocation { size })?;
        let transform = fit_transform(width, height, size, self.scale_mode);
        resvg::render(source.tree(), transform, &mut pixmap.as_mut());

        Ok(pixmap_to_rgba_image(&pixmap))
    }
}

impl Rasterizer for ResvgRasterizer {
    fn rasterize(&self, source: &VectorSource, spec: &SizeSpec) -> Result<RasterResult, RasterError> {
        let image = self.render(source, spec.pixel_size)?;
        let result = RasterResult::new(image, *spec);
        if !result.matches_spec() {
            let dims = result.dimensions();
            return Err(RasterError::SizeMismatch {
                expected: spec.pixel_size,
                width: dims.width,
                height: dims.height,
            });
        }
        Ok(result)
    }
}

/// Computes the transform that maps a `width x height` document onto a
/// `size x size` canvas.
fn fit_transform(width: f32, height: f32, size: u32, mode: ScaleMode) -> Transform {
    let target = size as f32;
    match mode {
        ScaleMode::Stretch => Transform::from_scale(target / width, target / height),
        ScaleMode::Fit => {
            let scale = target / width.max(height);
            let dx = (target - width * scale) / 2.0;
            let dy = (target - height * scale) / 2.0;
            Transform::from_row(scale, 0.0, 0.0, scale, dx, dy)
        }
    }
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let width = pixmap.width();
    let mut img = RgbaImage::new(width, pixmap.height());

    // tiny_skia stores premultiplied alpha, PNG wants straight alpha
    for (i, pixel) in pixmap.pixels().iter().enumerate() {
        let color = pixel.demultiply();
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, Rgba([color.red(), color.green(), color.blue(), color.alpha()]));
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100"><rect width="100" height="100" fill="#ff0000"/></svg>"##;
    const WIDE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100"><rect width="200" height="100" fill="#00ff00"/></svg>"##;

    #[test]
    fn every_catalog_entry_is_exactly_square() {
        let source = VectorSource::from_svg(SQUARE_SVG).unwrap();
        let rasterizer = ResvgRasterizer::default();

        for spec in catalog::all() {
            let result = rasterizer.rasterize(&source, spec).unwrap();
            assert_eq!(result.data.width(), spec.pixel_size, "{spec}");
            assert_eq!(result.data.height(), spec.pixel_size, "{spec}");
            assert_eq!(result.spec, *spec);
        }
    }

    #[test]
    fn render_fills_square_source() {
        let source = VectorSource::from_svg(SQUARE_SVG).unwrap();
        let img = ResvgRasterizer::default().render(&source, 48).unwrap();

        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(47, 47).0, [255, 0, 0, 255]);
    }

    #[test]
    fn fit_letterboxes_wide_source() {
        let source = VectorSource::from_svg(WIDE_SVG).unwrap();
        let img = ResvgRasterizer::new(ScaleMode::Fit).render(&source, 100).unwrap();

        assert_eq!(img.dimensions(), (100, 100));
        // Drawing occupies rows 25..75, the rest stays transparent
        assert_eq!(img.get_pixel(50, 5)[3], 0);
        assert_eq!(img.get_pixel(50, 95)[3], 0);
        assert_eq!(img.get_pixel(50, 50).0, [0, 255, 0, 255]);
    }

    #[test]
    fn stretch_fills_whole_canvas() {
        let source = VectorSource::from_svg(WIDE_SVG).unwrap();
        let img = ResvgRasterizer::new(ScaleMode::Stretch).render(&source, 100).unwrap();

        assert_eq!(img.get_pixel(50, 5).0, [0, 255, 0, 255]);
        assert_eq!(img.get_pixel(50, 95).0, [0, 255, 0, 255]);
    }

    #[test]
    fn zero_size_is_rejected() {
        let source = VectorSource::from_svg(SQUARE_SVG).unwrap();
        let err = ResvgRasterizer::default().render(&source, 0).unwrap_err();
        assert!(matches!(err, RasterError::ZeroSize));
    }

    #[test]
    fn semi_transparent_pixels_are_unpremultiplied() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#ff0000" fill-opacity="0.5"/></svg>"##;
        let source = VectorSource::from_svg(svg).unwrap();
        let img = ResvgRasterizer::default().render(&source, 10).unwrap();

        let pixel = img.get_pixel(5, 5);
        assert!(pixel[0] >= 250, "red channel should be restored, got {}", pixel[0]);
        assert!((126..=129).contains(&pixel[3]));
    }
}
