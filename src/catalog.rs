//! Fixed icon size tables for every supported platform.
//!
//! The values here are consumed by app store tooling that expects exact pixel
//! dimensions, so they are part of the public contract. Each platform is split
//! into one or more [`SizeGroup`]s; the group decides where a file lands and
//! how it is named (see [`DirectoryLayout`](crate::DirectoryLayout)).

use serde::{Deserialize, Serialize};

// ============================================================================
// Platform
// ============================================================================

/// A target platform for exported icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Android,
    Ios,
    Web,
}

impl Platform {
    /// All platforms, in export order.
    pub const ALL: [Platform; 3] = [Platform::Android, Platform::Ios, Platform::Web];

    /// Returns the size groups that make up this platform's catalog.
    pub const fn groups(self) -> &'static [SizeGroup] {
        match self {
            Platform::Android => &[SizeGroup::AndroidDensity],
            Platform::Ios => &[SizeGroup::IphoneIcon, SizeGroup::IpadIcon, SizeGroup::IosImage],
            Platform::Web => &[SizeGroup::WebIcon],
        }
    }

    /// Name of the platform's top-level output directory.
    pub const fn dir_name(self) -> &'static str {
        match self {
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Web => "Web",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

// ============================================================================
// SizeGroup
// ============================================================================

/// A sub-table of a platform catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SizeGroup {
    /// One folder per screen density.
    AndroidDensity,
    IphoneIcon,
    IpadIcon,
    /// Plain @1x/@2x/@3x image assets.
    IosImage,
    /// PWA manifest icons.
    WebIcon,
}

impl SizeGroup {
    pub const fn platform(self) -> Platform {
        match self {
            SizeGroup::AndroidDensity => Platform::Android,
            SizeGroup::IphoneIcon | SizeGroup::IpadIcon | SizeGroup::IosImage => Platform::Ios,
            SizeGroup::WebIcon => Platform::Web,
        }
    }

    /// Returns the catalog entries of this group, in declaration order.
    pub const fn specs(self) -> &'static [SizeSpec] {
        match self {
            SizeGroup::AndroidDensity => &ANDROID,
            SizeGroup::IphoneIcon => &IPHONE_ICONS,
            SizeGroup::IpadIcon => &IPAD_ICONS,
            SizeGroup::IosImage => &IOS_IMAGES,
            SizeGroup::WebIcon => &WEB,
        }
    }
}

// ============================================================================
// SizeSpec
// ============================================================================

/// One catalog entry: a square icon of `pixel_size` for a platform variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeSpec {
    pub platform: Platform,
    pub group: SizeGroup,
    /// Unique within the platform, e.g. `XXHDPI` or `iphone_icon_3x`.
    pub variant_key: &'static str,
    /// Width and height of the output in pixels.
    pub pixel_size: u32,
}

impl SizeSpec {
    pub const fn new(group: SizeGroup, variant_key: &'static str, pixel_size: u32) -> Self {
        Self {
            platform: group.platform(),
            group,
            variant_key,
            pixel_size,
        }
    }
}

impl std::fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{} ({}x{})",
            self.platform, self.variant_key, self.pixel_size, self.pixel_size
        )
    }
}

// ============================================================================
// Tables
// ============================================================================

use SizeGroup::{AndroidDensity, IosImage, IpadIcon, IphoneIcon, WebIcon};

/// Android launcher icons, one per density bucket, plus the Play Store icon.
pub const ANDROID: [SizeSpec; 6] = [
    SizeSpec::new(AndroidDensity, "MDPI", 48),
    SizeSpec::new(AndroidDensity, "HDPI", 72),
    SizeSpec::new(AndroidDensity, "XHDPI", 96),
    SizeSpec::new(AndroidDensity, "XXHDPI", 144),
    SizeSpec::new(AndroidDensity, "XXXHDPI", 192),
    SizeSpec::new(AndroidDensity, "PlayStore", 1024),
];

pub const IPHONE_ICONS: [SizeSpec; 8] = [
    SizeSpec::new(IphoneIcon, "iphone_notification_2x", 40),
    SizeSpec::new(IphoneIcon, "iphone_notification_3x", 60),
    SizeSpec::new(IphoneIcon, "iphone_settings_2x", 58),
    SizeSpec::new(IphoneIcon, "iphone_settings_3x", 87),
    SizeSpec::new(IphoneIcon, "iphone_spotlight_2x", 80),
    SizeSpec::new(IphoneIcon, "iphone_spotlight_3x", 120),
    SizeSpec::new(IphoneIcon, "iphone_icon_2x", 120),
    SizeSpec::new(IphoneIcon, "iphone_icon_3x", 180),
];

pub const IPAD_ICONS: [SizeSpec; 10] = [
    SizeSpec::new(IpadIcon, "ipad_notification_1x", 20),
    SizeSpec::new(IpadIcon, "ipad_notification_2x", 40),
    SizeSpec::new(IpadIcon, "ipad_settings_1x", 29),
    SizeSpec::new(IpadIcon, "ipad_settings_2x", 58),
    SizeSpec::new(IpadIcon, "ipad_spotlight_1x", 40),
    SizeSpec::new(IpadIcon, "ipad_spotlight_2x", 80),
    SizeSpec::new(IpadIcon, "ipad_icon_1x", 76),
    SizeSpec::new(IpadIcon, "ipad_icon_2x", 152),
    SizeSpec::new(IpadIcon, "ipad_pro_icon_2x", 167),
    SizeSpec::new(IpadIcon, "app_store", 1024),
];

/// Keys are appended to the file stem without a separator. They carry the
/// `@` of the iOS scale suffix, so the files are `icon@1x.png`,
/// `icon@2x.png` and `icon@3x.png`, never `icon2x.png`.
pub const IOS_IMAGES: [SizeSpec; 3] = [
    SizeSpec::new(IosImage, "@1x", 100),
    SizeSpec::new(IosImage, "@2x", 200),
    SizeSpec::new(IosImage, "@3x", 300),
];

pub const WEB: [SizeSpec; 10] = [
    SizeSpec::new(WebIcon, "icon-48x48", 48),
    SizeSpec::new(WebIcon, "icon-72x72", 72),
    SizeSpec::new(WebIcon, "icon-96x96", 96),
    SizeSpec::new(WebIcon, "icon-120x120", 120),
    SizeSpec::new(WebIcon, "icon-144x144", 144),
    SizeSpec::new(WebIcon, "icon-168x168", 168),
    SizeSpec::new(WebIcon, "icon-180x180", 180),
    SizeSpec::new(WebIcon, "icon-192x192", 192),
    SizeSpec::new(WebIcon, "icon-256x256", 256),
    SizeSpec::new(WebIcon, "icon-512x512", 512),
];

// ============================================================================
// Lookup
// ============================================================================

/// Iterates every entry of a platform's catalog, group by group.
pub fn catalog(platform: Platform) -> impl Iterator<Item = &'static SizeSpec> {
    platform.groups().iter().flat_map(|group| group.specs().iter())
}

/// Iterates the full catalog across all platforms.
pub fn all() -> impl Iterator<Item = &'static SizeSpec> {
    Platform::ALL.into_iter().flat_map(catalog)
}

/// Finds a catalog entry by platform and variant key.
pub fn find(platform: Platform, variant_key: &str) -> Option<&'static SizeSpec> {
    catalog(platform).find(|spec| spec.variant_key == variant_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn catalog_counts() {
        assert_eq!(catalog(Platform::Android).count(), 6);
        assert_eq!(catalog(Platform::Ios).count(), 21);
        assert_eq!(catalog(Platform::Web).count(), 10);
        assert_eq!(all().count(), 37);
    }

    #[test]
    fn variant_keys_unique_per_platform() {
        for platform in Platform::ALL {
            let mut seen = HashSet::new();
            for spec in catalog(platform) {
                assert!(seen.insert(spec.variant_key), "duplicate key {}", spec.variant_key);
            }
        }
    }

    #[test]
    fn sizes_are_positive_and_groups_consistent() {
        for spec in all() {
            assert!(spec.pixel_size > 0);
            assert_eq!(spec.platform, spec.group.platform());
        }
    }

    #[test]
    fn android_values() {
        let sizes: Vec<_> = ANDROID.iter().map(|s| (s.variant_key, s.pixel_size)).collect();
        assert_eq!(
            sizes,
            [
                ("MDPI", 48),
                ("HDPI", 72),
                ("XHDPI", 96),
                ("XXHDPI", 144),
                ("XXXHDPI", 192),
                ("PlayStore", 1024),
            ]
        );
    }

    #[test]
    fn ios_and_web_values() {
        let iphone: Vec<_> = IPHONE_ICONS.iter().map(|s| s.pixel_size).collect();
        assert_eq!(iphone, [40, 60, 58, 87, 80, 120, 120, 180]);

        let ipad: Vec<_> = IPAD_ICONS.iter().map(|s| s.pixel_size).collect();
        assert_eq!(ipad, [20, 40, 29, 58, 40, 80, 76, 152, 167, 1024]);

        let images: Vec<_> = IOS_IMAGES.iter().map(|s| s.pixel_size).collect();
        assert_eq!(images, [100, 200, 300]);

        let web: Vec<_> = WEB.iter().map(|s| s.pixel_size).collect();
        assert_eq!(web, [48, 72, 96, 120, 144, 168, 180, 192, 256, 512]);
    }

    #[test]
    fn web_keys_match_sizes() {
        for spec in &WEB {
            let expected = format!("icon-{0}x{0}", spec.pixel_size);
            assert_eq!(spec.variant_key, expected);
        }
    }

    #[test]
    fn find_by_key() {
        let spec = find(Platform::Ios, "iphone_icon_3x").unwrap();
        assert_eq!(spec.pixel_size, 180);
        assert_eq!(spec.group, SizeGroup::IphoneIcon);

        assert_eq!(find(Platform::Android, "XXHDPI").unwrap().pixel_size, 144);
        assert!(find(Platform::Web, "MDPI").is_none());
    }
}
