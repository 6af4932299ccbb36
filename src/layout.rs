//! On-disk layout of an export.
//!
//! ```text
//! <root>/
//!   Android/<density>/<stem>.png
//!   iOS/Icons/iPhone/<stem>-<key>.png
//!   iOS/Icons/iPad/<stem>-<key>.png
//!   iOS/Images/<stem><key>.png
//!   Web/<key>.png
//! ```

use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::{self, Platform, SizeGroup, SizeSpec};

/// Computes directories and file names under a destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    root: PathBuf,
}

impl DirectoryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Top-level directory of a platform, e.g. `<root>/iOS`.
    pub fn platform_root(&self, platform: Platform) -> PathBuf {
        self.root.join(platform.dir_name())
    }

    /// Directory a catalog entry is written into.
    pub fn directory_for(&self, spec: &SizeSpec) -> PathBuf {
        let platform_root = self.platform_root(spec.platform);
        match spec.group {
            SizeGroup::AndroidDensity => platform_root.join(spec.variant_key),
            SizeGroup::IphoneIcon => platform_root.join("Icons").join("iPhone"),
            SizeGroup::IpadIcon => platform_root.join("Icons").join("iPad"),
            SizeGroup::IosImage => platform_root.join("Images"),
            SizeGroup::WebIcon => platform_root,
        }
    }

    /// Every directory a platform's export writes into.
    pub fn directories(&self, platform: Platform) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = Vec::new();
        for spec in catalog::catalog(platform) {
            let dir = self.directory_for(spec);
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    /// Creates all directories of a platform. Existing directories are fine.
    pub fn create(&self, platform: Platform) -> io::Result<Vec<PathBuf>> {
        let dirs = self.directories(platform);
        for dir in &dirs {
            std::fs::create_dir_all(dir)?;
        }
        Ok(dirs)
    }
}

/// File name (without `.png`) of a catalog entry for the given stem.
///
/// Web icons ignore the stem and are named after their variant key.
pub fn file_stem_for(spec: &SizeSpec, stem: &str) -> String {
    match spec.group {
        SizeGroup::AndroidDensity => stem.to_string(),
        SizeGroup::IphoneIcon | SizeGroup::IpadIcon => format!("{stem}-{}", spec.variant_key),
        SizeGroup::IosImage => format!("{stem}{}", spec.variant_key),
        SizeGroup::WebIcon => spec.variant_key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ANDROID, IOS_IMAGES, IPAD_ICONS, IPHONE_ICONS, WEB};

    #[test]
    fn android_gets_one_directory_per_density() {
        let layout = DirectoryLayout::new("/out");
        let dirs = layout.directories(Platform::Android);
        assert_eq!(dirs.len(), 6);
        assert_eq!(dirs[0], Path::new("/out/Android/MDPI"));
        assert_eq!(dirs[5], Path::new("/out/Android/PlayStore"));
    }

    #[test]
    fn ios_and_web_directories() {
        let layout = DirectoryLayout::new("/out");
        assert_eq!(
            layout.directories(Platform::Ios),
            [
                PathBuf::from("/out/iOS/Icons/iPhone"),
                PathBuf::from("/out/iOS/Icons/iPad"),
                PathBuf::from("/out/iOS/Images"),
            ]
        );
        assert_eq!(layout.directories(Platform::Web), [PathBuf::from("/out/Web")]);
    }

    #[test]
    fn naming_rules() {
        assert_eq!(file_stem_for(&ANDROID[0], "icon"), "icon");
        assert_eq!(file_stem_for(&IPHONE_ICONS[7], "icon"), "icon-iphone_icon_3x");
        assert_eq!(file_stem_for(&IPAD_ICONS[8], "logo"), "logo-ipad_pro_icon_2x");
        assert_eq!(file_stem_for(&IOS_IMAGES[1], "icon"), "icon@2x");
        assert_eq!(file_stem_for(&WEB[9], "ignored"), "icon-512x512");
    }

    #[test]
    fn paths_are_unique_within_a_layout() {
        let layout = DirectoryLayout::new("/out");
        let mut paths: Vec<PathBuf> = catalog::all()
            .map(|spec| layout.directory_for(spec).join(file_stem_for(spec, "icon")))
            .collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn create_is_idempotent() {
        let root = tempfile::tempdir().unwrap();
        let layout = DirectoryLayout::new(root.path());

        for _ in 0..2 {
            for platform in Platform::ALL {
                layout.create(platform).unwrap();
            }
        }

        assert!(root.path().join("Android/XXXHDPI").is_dir());
        assert!(root.path().join("iOS/Icons/iPad").is_dir());
        assert!(root.path().join("iOS/Images").is_dir());
        assert!(root.path().join("Web").is_dir());
    }
}
