//! PNG encoding and persistence of rendered icons.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::error::WriteError;
use crate::icon::RasterResult;

/// PNG compression effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum PngCompression {
    #[default]
    Default,
    Fast,
    Best,
}

impl PngCompression {
    fn encoder_settings(self) -> (CompressionType, FilterType) {
        match self {
            PngCompression::Default => (CompressionType::Default, FilterType::Adaptive),
            PngCompression::Fast => (CompressionType::Fast, FilterType::NoFilter),
            PngCompression::Best => (CompressionType::Best, FilterType::Adaptive),
        }
    }
}

/// Writes rendered icons to disk as PNG files.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputWriter {
    compression: PngCompression,
}

impl OutputWriter {
    pub fn new(compression: PngCompression) -> Self {
        Self { compression }
    }

    /// Encodes `raster` and writes it to `directory/file_stem.png`.
    ///
    /// The directory is created if missing. An existing file at the target
    /// path is replaced.
    pub fn write(
        &self,
        raster: &RasterResult,
        directory: &Path,
        file_stem: &str,
    ) -> Result<PathBuf, WriteError> {
        let path = directory.join(format!("{file_stem}.png"));

        let png = self.encode(raster).map_err(|source| WriteError::Encode {
            path: path.clone(),
            source,
        })?;

        fs::create_dir_all(directory).map_err(|source| WriteError::CreateDir {
            path: directory.to_path_buf(),
            source,
        })?;

        fs::write(&path, png).map_err(|source| WriteError::Write {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Encodes the raster as PNG bytes.
    pub fn encode(&self, raster: &RasterResult) -> Result<Vec<u8>, image::ImageError> {
        let (compression, filter) = self.compression.encoder_settings();
        let mut buf = Cursor::new(Vec::new());
        let encoder = PngEncoder::new_with_quality(&mut buf, compression, filter);
        encoder.write_image(
            raster.data.as_raw(),
            raster.data.width(),
            raster.data.height(),
            ExtendedColorType::Rgba8,
        )?;
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ANDROID, WEB};
    use image::{GenericImageView, Rgba, RgbaImage};

    fn solid(spec: crate::SizeSpec) -> RasterResult {
        let size = spec.pixel_size;
        RasterResult::new(RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255])), spec)
    }

    #[test]
    fn creates_missing_directories() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("Android").join("MDPI");

        let path = OutputWriter::default().write(&solid(ANDROID[0]), &dir, "icon").unwrap();

        assert_eq!(path, dir.join("icon.png"));
        let img = image::open(&path).unwrap();
        assert_eq!(img.dimensions(), (48, 48));
        assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }

    #[test]
    fn overwrites_existing_file() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("icon-48x48.png");
        fs::write(&target, vec![0u8; 1 << 16]).unwrap();

        let writer = OutputWriter::new(PngCompression::Best);
        writer.write(&solid(WEB[0]), root.path(), "icon-48x48").unwrap();

        let img = image::open(&target).unwrap();
        assert_eq!(img.dimensions(), (48, 48));
    }

    #[test]
    fn reports_unwritable_directory() {
        let root = tempfile::tempdir().unwrap();
        let blocker = root.path().join("Web");
        fs::write(&blocker, b"not a directory").unwrap();

        let err = OutputWriter::default()
            .write(&solid(WEB[0]), &blocker, "icon-48x48")
            .unwrap_err();
        assert!(matches!(err, WriteError::CreateDir { .. }));
    }

    #[test]
    fn compression_levels_produce_valid_png() {
        let raster = solid(WEB[1]);
        for compression in [PngCompression::Default, PngCompression::Fast, PngCompression::Best] {
            let bytes = OutputWriter::new(compression).encode(&raster).unwrap();
            let img = image::load_from_memory(&bytes).unwrap();
            assert_eq!(img.dimensions(), (72, 72));
        }
    }
}
