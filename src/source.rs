//! Loading and validating the vector document.
//!
//! A [`VectorSource`] is parsed once and then shared read-only by every
//! rasterization job of an export.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use resvg::usvg::{Options, Tree, fontdb};

use crate::error::InputError;

/// A parsed SVG document together with its intrinsic size.
pub struct VectorSource {
    tree: Tree,
    width: f32,
    height: f32,
    name: Option<String>,
}

impl VectorSource {
    /// Parses SVG data from raw bytes (plain or gzip-compressed).
    ///
    /// `<text>` is shaped with the system fonts. Relative image links
    /// resolve against the working directory; use [`open`](Self::open) to
    /// resolve them against the document's own directory.
    pub fn from_data(data: &[u8]) -> Result<Self, InputError> {
        Self::parse(data, None)
    }

    /// Parses SVG markup.
    pub fn from_svg(svg: &str) -> Result<Self, InputError> {
        Self::from_data(svg.as_bytes())
    }

    /// Reads the whole stream and parses it as SVG.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self, InputError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data).map_err(InputError::Stream)?;
        Self::from_data(&data)
    }

    /// Opens an `.svg` file.
    ///
    /// The extension is checked before the file is read, so a non-SVG
    /// selection is rejected without touching its contents.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| InputError::MissingFileName(path.to_path_buf()))?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .unwrap_or_default();
        if !extension.eq_ignore_ascii_case("svg") {
            return Err(InputError::UnsupportedExtension {
                path: path.to_path_buf(),
                extension: extension.to_string(),
            });
        }

        let data = std::fs::read(path).map_err(|source| InputError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let resources_dir = std::fs::canonicalize(path)
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));

        let mut source = Self::parse(&data, resources_dir)?;
        source.name = Some(file_name.clone());
        log::debug!("loaded {} ({}x{})", file_name, source.width, source.height);
        Ok(source)
    }

    fn parse(data: &[u8], resources_dir: Option<PathBuf>) -> Result<Self, InputError> {
        let mut opts = Options::default();
        opts.fontdb = system_fonts();
        opts.resources_dir = resources_dir;
        let tree = Tree::from_data(data, &opts)?;
        Self::from_tree(tree)
    }

    /// Wraps an already parsed tree.
    pub fn from_tree(tree: Tree) -> Result<Self, InputError> {
        let size = tree.size();
        let (width, height) = (size.width(), size.height());
        if !is_positive(width) || !is_positive(height) {
            return Err(InputError::InvalidDimensions { width, height });
        }

        Ok(Self {
            tree,
            width,
            height,
            name: None,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Intrinsic width in user units.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Intrinsic height in user units.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// The file name this source was opened from, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Debug for VectorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorSource")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// The system font database, loaded once per process.
fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            log::debug!("loaded {} system font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
