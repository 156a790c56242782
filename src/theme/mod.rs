//! Theme projection for host-rendered consent UI
//!
//! The consent core never touches a rendering surface; it only produces a
//! theme as data. Hosts implement [`ThemeApplier`] to push the CSS custom
//! properties into whatever surface they render (a DOM, a webview, a style
//! sheet), keeping consent logic independent of I/O.

use serde::{Deserialize, Serialize};

/// Button rendering style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Solid,
    Outlined,
    Ghost,
}

/// Visual theme for the banner and preferences surfaces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentTheme {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub border_color: String,
    pub border_radius: String,
    pub font_family: String,
    pub font_size: String,
    pub button_style: ButtonStyle,
    pub shadow: bool,
}

impl ConsentTheme {
    /// The built-in light theme
    pub fn light() -> Self {
        Self {
            primary_color: "#007bff".to_string(),
            secondary_color: "#6c757d".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#212529".to_string(),
            border_color: "#dee2e6".to_string(),
            border_radius: "0.375rem".to_string(),
            font_family: "system-ui, -apple-system, sans-serif".to_string(),
            font_size: "14px".to_string(),
            button_style: ButtonStyle::Solid,
            shadow: true,
        }
    }

    /// The built-in dark theme
    pub fn dark() -> Self {
        Self {
            primary_color: "#0d6efd".to_string(),
            secondary_color: "#adb5bd".to_string(),
            background_color: "#212529".to_string(),
            text_color: "#ffffff".to_string(),
            border_color: "#495057".to_string(),
            border_radius: "0.375rem".to_string(),
            font_family: "system-ui, -apple-system, sans-serif".to_string(),
            font_size: "14px".to_string(),
            button_style: ButtonStyle::Solid,
            shadow: true,
        }
    }

    /// Projects the theme as ordered `--consent-*` CSS custom properties
    pub fn css_custom_properties(&self) -> Vec<(String, String)> {
        let button_style = match self.button_style {
            ButtonStyle::Solid => "solid",
            ButtonStyle::Outlined => "outlined",
            ButtonStyle::Ghost => "ghost",
        };
        let shadow = if self.shadow {
            "0 4px 6px rgba(0, 0, 0, 0.1)"
        } else {
            "none"
        };

        vec![
            ("--consent-primary-color".into(), self.primary_color.clone()),
            ("--consent-secondary-color".into(), self.secondary_color.clone()),
            ("--consent-background-color".into(), self.background_color.clone()),
            ("--consent-text-color".into(), self.text_color.clone()),
            ("--consent-border-color".into(), self.border_color.clone()),
            ("--consent-border-radius".into(), self.border_radius.clone()),
            ("--consent-font-family".into(), self.font_family.clone()),
            ("--consent-font-size".into(), self.font_size.clone()),
            ("--consent-button-style".into(), button_style.to_string()),
            ("--consent-shadow".into(), shadow.to_string()),
        ]
    }
}

impl Default for ConsentTheme {
    fn default() -> Self {
        Self::light()
    }
}

/// Host collaborator that applies a theme to its rendering surface
pub trait ThemeApplier {
    /// Apply the theme's custom properties
    fn apply(&mut self, theme: &ConsentTheme);

    /// Remove all previously applied properties
    fn remove(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_and_dark_differ() {
        assert_ne!(ConsentTheme::light(), ConsentTheme::dark());
    }

    #[test]
    fn test_css_projection_is_complete_and_prefixed() {
        let props = ConsentTheme::light().css_custom_properties();
        assert_eq!(props.len(), 10);
        assert!(props.iter().all(|(k, _)| k.starts_with("--consent-")));
    }

    #[test]
    fn test_shadow_off_projects_none() {
        let mut theme = ConsentTheme::light();
        theme.shadow = false;
        let props = theme.css_custom_properties();
        let shadow = props.iter().find(|(k, _)| k == "--consent-shadow").unwrap();
        assert_eq!(shadow.1, "none");
    }

    #[test]
    fn test_theme_serializes_camel_case() {
        let json = serde_json::to_value(ConsentTheme::dark()).unwrap();
        assert_eq!(json["backgroundColor"], "#212529");
        assert_eq!(json["buttonStyle"], "solid");
    }
}
