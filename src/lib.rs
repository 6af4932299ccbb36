//! appicon-renderer: Android, iOS and web icon sets from a single SVG
//!
//! This crate renders one vector document into the fixed catalog of square
//! PNG icons each platform expects and writes them into a predictable
//! directory tree. Rendering is done by resvg, jobs run concurrently on a
//! rayon pool, and every export reports the result of each individual file.
//!
//! # Example
//!
//! ```no_run
//! use appicon_renderer::{ExportRequest, IconExportPipeline, VectorSource};
//!
//! let source = VectorSource::open("logo.svg")?;
//! let request = ExportRequest::new(source, "/tmp/out").with_file_stem("icon")?;
//!
//! let outcome = IconExportPipeline::new().export(&request);
//! println!("{}", outcome.summary());
//! for failure in &outcome.failures {
//!     eprintln!("{}: {}", failure.spec, failure.message());
//! }
//! # Ok::<(), appicon_renderer::InputError>(())
//! ```
//!
//! # Options and progress
//!
//! [`ExportOptions`] select platforms, scaling, PNG compression and the
//! worker pool size, and can be loaded from JSON. Progress is observable by
//! subscribing to the pipeline's [`ExportEvents`]:
//!
//! ```
//! use appicon_renderer::{ExportEvent, ExportOptions, IconExportPipeline, Platform};
//!
//! let options = ExportOptions::from_json(r#"{"platforms":["web"]}"#).unwrap();
//! let mut pipeline = IconExportPipeline::from_options(&options).unwrap();
//! pipeline.subscribe(|event| {
//!     if let ExportEvent::JobCompleted { path, .. } = event {
//!         println!("wrote {}", path.display());
//!     }
//! });
//! assert_eq!(pipeline.platforms(), [Platform::Web]);
//! ```

pub mod catalog;
mod error;
mod events;
mod icon;
mod layout;
mod options;
mod pipeline;
mod raster;
mod source;
mod writer;

pub use catalog::{Platform, SizeGroup, SizeSpec};
pub use error::{ConfigError, InputError, JobError, RasterError, WriteError};
pub use events::{ExportEvent, ExportEvents, SubscriptionId};
pub use icon::{RasterResult, SizePx};
pub use layout::{DirectoryLayout, file_stem_for};
pub use options::ExportOptions;
pub use pipeline::{
    CancellationToken, DEFAULT_FILE_STEM, ExportFailure, ExportJob, ExportOutcome, ExportPlan,
    ExportRequest, ExportStatus, IconExportPipeline,
};
pub use raster::{Rasterizer, ResvgRasterizer, ScaleMode};
pub use source::VectorSource;
pub use writer::{OutputWriter, PngCompression};
