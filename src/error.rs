//! Error types for loading, rasterizing and writing icons.
//!
//! Errors are split by stage. [`InputError`] is the only one that escapes an
//! export synchronously; [`RasterError`] and [`WriteError`] are captured per
//! job as a [`JobError`] and reported through the
//! [`ExportOutcome`](crate::ExportOutcome).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The selected vector file could not be accepted.
///
/// Raised before any directory is created under the destination root.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("path has no file name: {0}")]
    MissingFileName(PathBuf),

    #[error("unsupported file type {extension:?} for {path}, only SVG files are supported")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read SVG stream")]
    Stream(#[source] io::Error),

    #[error("failed to parse SVG document")]
    Parse(#[from] resvg::usvg::Error),

    #[error("SVG document has invalid intrinsic size {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("invalid output file name {0:?}")]
    InvalidFileStem(String),
}

/// A single size could not be rendered.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("target size must be positive")]
    ZeroSize,

    #[error("source has non-positive size {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("failed to allocate a {size}x{size} pixmap")]
    Allocation { size: u32 },

    #[error("rendered {width}x{height} image, expected {expected}x{expected}")]
    SizeMismatch {
        expected: u32,
        width: u32,
        height: u32,
    },

    #[error("renderer failed: {0}")]
    Failed(String),
}

/// A rendered icon could not be persisted.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode PNG for {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The pipeline could not be built from the given options.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("worker pool needs at least one thread")]
    ZeroThreads,

    #[error("no platforms selected for export")]
    NoPlatforms,

    #[error("failed to build worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Terminal failure of one export job.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("export was cancelled before this job started")]
    Cancelled,

    #[error("job panicked: {0}")]
    Panicked(String),
}

impl JobError {
    /// Returns `true` if the job never ran because the export was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_error_wraps_stage_errors() {
        let err: JobError = RasterError::ZeroSize.into();
        assert!(matches!(err, JobError::Raster(RasterError::ZeroSize)));
        assert_eq!(err.to_string(), "target size must be positive");
        assert!(!err.is_cancelled());
        assert!(JobError::Cancelled.is_cancelled());
    }

    #[test]
    fn write_error_names_the_path() {
        let err = WriteError::Write {
            path: PathBuf::from("/out/Web/icon-48x48.png"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("icon-48x48.png"));
    }
}
