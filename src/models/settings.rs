//! Singleton settings documents
//!
//! Each document type lives under one fixed key in `settings_documents`, so
//! there is never more than one row per type. `Default` is the single source
//! of defaults: the public GET returns it before the first save, and the
//! first upsert merges the submitted fields over it.

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
use uuid::Uuid;

/// A settings document stored under a fixed key
pub trait SettingsDocument:
    Default + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Primary key in `settings_documents`
    const KEY: &'static str;

    /// Field-level checks beyond what deserialization enforces
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Apply an RFC 7396 JSON merge patch to `target`
///
/// `null` in the patch removes the key, which resets that field to its
/// default on the next read. This mirrors SQLite's `json_patch`.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }

    if let Value::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(
                    target_map.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}

/// Validate a partial update against the current document
///
/// The patch is merged over `current` (or the defaults) and the result must
/// deserialize into `T` and pass [`SettingsDocument::validate`].
pub fn patched<T: SettingsDocument>(
    current: Option<T>,
    patch: &serde_json::Map<String, Value>,
) -> Result<T, String> {
    let mut document = serde_json::to_value(current.unwrap_or_default())
        .map_err(|e| e.to_string())?;
    merge_patch(&mut document, &Value::Object(patch.clone()));

    let merged: T = serde_json::from_value(document).map_err(|e| e.to_string())?;
    merged.validate()?;
    Ok(merged)
}

fn color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("static color regex")
    })
}

fn check_color(field: &str, value: &str) -> Result<(), String> {
    if color_regex().is_match(value) {
        Ok(())
    } else {
        Err(format!("{} must be a hex color like #1a2b3c, got '{}'", field, value))
    }
}

fn check_range(field: &str, value: u16, min: u16, max: u16) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("{} must be between {} and {}", field, min, max))
    }
}

/// Top navigation bar styling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct NavbarSettings {
    pub background_color: String,
    pub text_color: String,
    pub hover_color: String,
    pub active_color: String,
    pub font_size: u16,
    pub height: u16,
    pub sticky: bool,
}

impl Default for NavbarSettings {
    fn default() -> Self {
        Self {
            background_color: "#1a1a2e".to_string(),
            text_color: "#ffffff".to_string(),
            hover_color: "#f5c518".to_string(),
            active_color: "#f5c518".to_string(),
            font_size: 14,
            height: 64,
            sticky: true,
        }
    }
}

impl SettingsDocument for NavbarSettings {
    const KEY: &'static str = "navbar";

    fn validate(&self) -> Result<(), String> {
        check_color("backgroundColor", &self.background_color)?;
        check_color("textColor", &self.text_color)?;
        check_color("hoverColor", &self.hover_color)?;
        check_color("activeColor", &self.active_color)?;
        check_range("fontSize", self.font_size, 8, 48)?;
        check_range("height", self.height, 32, 200)
    }
}

/// Mobile bottom navigation bar styling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct BottomNavbarSettings {
    pub background_color: String,
    pub icon_color: String,
    pub active_icon_color: String,
    pub text_color: String,
    pub font_size: u16,
    pub visible: bool,
}

impl Default for BottomNavbarSettings {
    fn default() -> Self {
        Self {
            background_color: "#111827".to_string(),
            icon_color: "#9ca3af".to_string(),
            active_icon_color: "#f5c518".to_string(),
            text_color: "#ffffff".to_string(),
            font_size: 12,
            visible: true,
        }
    }
}

impl SettingsDocument for BottomNavbarSettings {
    const KEY: &'static str = "bottom_navbar";

    fn validate(&self) -> Result<(), String> {
        check_color("backgroundColor", &self.background_color)?;
        check_color("iconColor", &self.icon_color)?;
        check_color("activeIconColor", &self.active_icon_color)?;
        check_color("textColor", &self.text_color)?;
        check_range("fontSize", self.font_size, 8, 32)
    }
}

/// Site-wide color scheme and typography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ThemeSettings {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub surface_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub font_family: String,
    pub border_radius: u16,
    pub dark_mode: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            primary_color: "#f5c518".to_string(),
            secondary_color: "#1a1a2e".to_string(),
            background_color: "#0f0f1a".to_string(),
            surface_color: "#1f2937".to_string(),
            text_color: "#ffffff".to_string(),
            accent_color: "#22c55e".to_string(),
            font_family: "Inter, sans-serif".to_string(),
            border_radius: 8,
            dark_mode: true,
        }
    }
}

impl SettingsDocument for ThemeSettings {
    const KEY: &'static str = "theme";

    fn validate(&self) -> Result<(), String> {
        check_color("primaryColor", &self.primary_color)?;
        check_color("secondaryColor", &self.secondary_color)?;
        check_color("backgroundColor", &self.background_color)?;
        check_color("surfaceColor", &self.surface_color)?;
        check_color("textColor", &self.text_color)?;
        check_color("accentColor", &self.accent_color)?;
        if self.font_family.trim().is_empty() {
            return Err("fontFamily must not be empty".to_string());
        }
        check_range("borderRadius", self.border_radius, 0, 64)
    }
}

/// Footer social icon with its target link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: Uuid,
    pub image_url: String,
    pub link_url: String,
}

/// Footer text, badge images and social links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FooterSettings {
    pub background_color: String,
    pub text_color: String,
    pub copyright_text: String,
    pub description: String,
    pub license_image: Option<String>,
    pub gaming_license_image: Option<String>,
    pub responsible_gaming_image: Option<String>,
    pub app_download_image: Option<String>,
    pub social_links: Vec<SocialLink>,
}

impl FooterSettings {
    /// Multipart part names that carry footer images
    pub const IMAGE_FIELDS: [&'static str; 4] = [
        "licenseImage",
        "gamingLicenseImage",
        "responsibleGamingImage",
        "appDownloadImage",
    ];

    /// Multipart part names that carry footer text
    pub const TEXT_FIELDS: [&'static str; 4] =
        ["backgroundColor", "textColor", "copyrightText", "description"];

    /// Current value of an image field by its wire name
    pub fn image_field(&self, name: &str) -> Option<&str> {
        match name {
            "licenseImage" => self.license_image.as_deref(),
            "gamingLicenseImage" => self.gaming_license_image.as_deref(),
            "responsibleGamingImage" => self.responsible_gaming_image.as_deref(),
            "appDownloadImage" => self.app_download_image.as_deref(),
            _ => None,
        }
    }
}

impl Default for FooterSettings {
    fn default() -> Self {
        Self {
            background_color: "#111827".to_string(),
            text_color: "#d1d5db".to_string(),
            copyright_text: "© All rights reserved".to_string(),
            description: String::new(),
            license_image: None,
            gaming_license_image: None,
            responsible_gaming_image: None,
            app_download_image: None,
            social_links: Vec::new(),
        }
    }
}

impl SettingsDocument for FooterSettings {
    const KEY: &'static str = "footer";

    fn validate(&self) -> Result<(), String> {
        check_color("backgroundColor", &self.background_color)?;
        check_color("textColor", &self.text_color)
    }
}

/// Brand images used across the site
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LogoSettings {
    pub main_logo: Option<String>,
    pub mobile_logo: Option<String>,
    pub favicon: Option<String>,
    pub loader_logo: Option<String>,
}

impl LogoSettings {
    /// Multipart part names that carry logo images
    pub const IMAGE_FIELDS: [&'static str; 4] = ["mainLogo", "mobileLogo", "favicon", "loaderLogo"];

    /// Current value of an image field by its wire name
    pub fn image_field(&self, name: &str) -> Option<&str> {
        match name {
            "mainLogo" => self.main_logo.as_deref(),
            "mobileLogo" => self.mobile_logo.as_deref(),
            "favicon" => self.favicon.as_deref(),
            "loaderLogo" => self.loader_logo.as_deref(),
            _ => None,
        }
    }
}

impl SettingsDocument for LogoSettings {
    const KEY: &'static str = "logo";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_patch_sets_and_removes() {
        let mut doc = json!({"a": 1, "b": {"c": 2, "d": 3}, "list": [1, 2]});
        merge_patch(&mut doc, &json!({"a": 5, "b": {"d": null}, "list": [9]}));
        assert_eq!(doc, json!({"a": 5, "b": {"c": 2}, "list": [9]}));
    }

    #[test]
    fn test_merge_patch_over_defaults_keeps_unsubmitted_fields() {
        let mut doc = serde_json::to_value(ThemeSettings::default()).unwrap();
        merge_patch(&mut doc, &json!({"primaryColor": "#000000"}));
        let theme: ThemeSettings = serde_json::from_value(doc).unwrap();
        assert_eq!(theme.primary_color, "#000000");
        assert_eq!(theme.font_family, ThemeSettings::default().font_family);
    }

    #[test]
    fn test_patched_validates_merged_document() {
        let patch = json!({"fontSize": 20}).as_object().cloned().unwrap();
        let navbar: NavbarSettings = patched(None, &patch).unwrap();
        assert_eq!(navbar.font_size, 20);
        assert_eq!(navbar.background_color, NavbarSettings::default().background_color);

        let bad = json!({"fontSize": 2}).as_object().cloned().unwrap();
        assert!(patched::<NavbarSettings>(Some(navbar), &bad).is_err());

        let unknown = json!({"glow": true}).as_object().cloned().unwrap();
        assert!(patched::<ThemeSettings>(None, &unknown).is_err());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = serde_json::from_value::<NavbarSettings>(json!({"bogus": 1}));
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults_validate() {
        assert!(NavbarSettings::default().validate().is_ok());
        assert!(BottomNavbarSettings::default().validate().is_ok());
        assert!(ThemeSettings::default().validate().is_ok());
        assert!(FooterSettings::default().validate().is_ok());
        assert!(LogoSettings::default().validate().is_ok());
    }

    #[test]
    fn test_color_validation() {
        let theme = ThemeSettings {
            primary_color: "red".to_string(),
            ..Default::default()
        };
        let err = theme.validate().unwrap_err();
        assert!(err.contains("primaryColor"));

        let navbar = NavbarSettings {
            hover_color: "#abc".to_string(),
            active_color: "#aabbccdd".to_string(),
            ..Default::default()
        };
        assert!(navbar.validate().is_ok());
    }

    #[test]
    fn test_footer_image_field_lookup() {
        let footer = FooterSettings {
            license_image: Some("/uploads/a.png".to_string()),
            ..Default::default()
        };
        assert_eq!(footer.image_field("licenseImage"), Some("/uploads/a.png"));
        assert_eq!(footer.image_field("appDownloadImage"), None);
        assert_eq!(footer.image_field("copyrightText"), None);
    }
}
