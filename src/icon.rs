//! Rendered icon buffers.
//!
//! A [`RasterResult`] is the hand-off between the rasterizer and the output
//! writer: an RGBA image together with the catalog entry it was rendered for.

use image::RgbaImage;

use crate::catalog::SizeSpec;

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates a square size.
    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Returns true if width equals height.
    pub fn is_square(&self) -> bool {
        self.width == self.height
    }
}

/// A rasterized icon tagged with the [`SizeSpec`] it was produced for.
///
/// Pixels use straight (non-premultiplied) alpha, ready for PNG encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterResult {
    /// The image data in RGBA format.
    pub data: RgbaImage,

    /// The catalog entry this image satisfies.
    pub spec: SizeSpec,
}

impl RasterResult {
    pub fn new(data: RgbaImage, spec: SizeSpec) -> Self {
        Self { data, spec }
    }

    /// Returns the pixel dimensions of the image.
    pub fn dimensions(&self) -> SizePx {
        SizePx::new(self.data.width(), self.data.height())
    }

    /// Returns true if the image is exactly `pixel_size` on both axes.
    pub fn matches_spec(&self) -> bool {
        self.dimensions() == SizePx::square(self.spec.pixel_size)
    }

    /// Consumes the result, returning the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ANDROID;

    #[test]
    fn size_px_is_square() {
        assert!(SizePx::square(48).is_square());
        assert!(!SizePx::new(100, 200).is_square());
    }

    #[test]
    fn raster_result_matches_spec() {
        let mdpi = ANDROID[0];
        let good = RasterResult::new(RgbaImage::new(48, 48), mdpi);
        assert!(good.matches_spec());
        assert_eq!(good.dimensions(), SizePx::new(48, 48));

        let wrong = RasterResult::new(RgbaImage::new(48, 40), mdpi);
        assert!(!wrong.matches_spec());
    }
}
