//! Viewer configuration, loadable from JSON.

use crate::error::ConfigError;
use docview_render_core::PageFormat;
use docview_render_display::{DisplayOptions, LayoutMode};
use docview_style::dimension::{Margins, PageSize};
use docview_types::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolbarPosition {
    #[default]
    Top,
    Bottom,
    Floating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZoomConfig {
    pub enabled: bool,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min: 0.5,
            max: 4.0,
            step: 0.25,
        }
    }
}

/// Page format of the export artifact. Independent of on-screen zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub page_size: PageSize,
    pub margins: Margins,
    pub default_font_size: f32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        let format = PageFormat::default();
        Self {
            page_size: format.page_size,
            margins: format.margins,
            default_font_size: format.default_font_size,
        }
    }
}

impl ExportConfig {
    pub fn page_format(&self) -> PageFormat {
        PageFormat {
            page_size: self.page_size,
            margins: self.margins,
            default_font_size: self.default_font_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub enable_search: bool,
    pub zoom: ZoomConfig,
    pub show_toolbar: bool,
    pub toolbar_position: ToolbarPosition,
    pub fit_to_width: bool,
    /// Logical width the document is laid out at before zoom.
    pub page_width: f32,
    pub page_mode: LayoutMode,
    pub padding: Margins,
    pub background_color: Color,
    pub page_color: Color,
    pub font_fallbacks: Vec<String>,
    pub search_highlight_color: Color,
    pub current_match_color: Color,
    pub export: ExportConfig,
    /// Stem of exported file names.
    pub document_name: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        let display = DisplayOptions::default();
        Self {
            enable_search: true,
            zoom: ZoomConfig::default(),
            show_toolbar: true,
            toolbar_position: ToolbarPosition::default(),
            fit_to_width: true,
            page_width: display.page_width,
            page_mode: LayoutMode::default(),
            padding: display.padding,
            background_color: display.background,
            page_color: display.page_color,
            font_fallbacks: vec![
                "Helvetica".to_string(),
                "Arial".to_string(),
                "sans-serif".to_string(),
            ],
            search_highlight_color: display.highlight_color,
            current_match_color: display.current_match_color,
            export: ExportConfig::default(),
            document_name: "document".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config from '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let zoom = &self.zoom;
        if !(zoom.min > 0.0 && zoom.min <= zoom.max) {
            return Err(ConfigError::Invalid(format!(
                "zoom range must satisfy 0 < min <= max, got [{}, {}]",
                zoom.min, zoom.max
            )));
        }
        if zoom.step <= 0.0 || zoom.step.is_nan() {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be positive, got {}",
                zoom.step
            )));
        }
        if self.page_width <= 0.0 || self.page_width.is_nan() {
            return Err(ConfigError::Invalid(format!(
                "pageWidth must be positive, got {}",
                self.page_width
            )));
        }
        let p = &self.padding;
        if [p.top, p.right, p.bottom, p.left].iter().any(|v| *v < 0.0) {
            return Err(ConfigError::Invalid("padding must not be negative".to_string()));
        }
        if self.document_name.trim().is_empty() {
            return Err(ConfigError::Invalid("documentName must not be empty".to_string()));
        }
        self.export
            .page_format()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("export: {}", e)))
    }

    pub fn display_options(&self) -> DisplayOptions {
        DisplayOptions {
            page_width: self.page_width,
            padding: self.padding,
            background: self.background_color,
            page_color: self.page_color,
            highlight_color: self.search_highlight_color,
            current_match_color: self.current_match_color,
        }
    }

    pub fn export_file_name(&self) -> String {
        format!("{}.pdf", self.document_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.zoom.min, 0.5);
        assert_eq!(config.zoom.max, 4.0);
        assert_eq!(config.page_width, 768.0);
        assert_eq!(config.font_fallbacks[0], "Helvetica");
    }

    #[test]
    fn parses_recognised_options() {
        let json = r##"{
            "enableSearch": false,
            "zoom": { "enabled": false, "min": 0.25, "max": 2 },
            "toolbarPosition": "floating",
            "pageMode": "paged",
            "padding": "8 16",
            "backgroundColor": "#202020",
            "searchHighlightColor": "#00FF00",
            "export": { "pageSize": "Letter", "margins": 36, "defaultFontSize": 11 },
            "documentName": "report"
        }"##;
        let config = ViewerConfig::from_json_str(json).unwrap();
        assert!(!config.enable_search);
        assert!(!config.zoom.enabled);
        assert_eq!(config.zoom.step, 0.25);
        assert_eq!(config.toolbar_position, ToolbarPosition::Floating);
        assert_eq!(config.page_mode, LayoutMode::Paged);
        assert_eq!(config.padding.left, 16.0);
        assert_eq!(config.padding.top, 8.0);
        assert_eq!(config.background_color, Color::rgb(0x20, 0x20, 0x20));
        let format = config.export.page_format();
        assert_eq!(format.page_size, PageSize::Letter);
        assert_eq!(format.margins, Margins::all(36.0));
        assert_eq!(format.default_font_size, 11.0);
        assert_eq!(config.export_file_name(), "report.pdf");
    }

    #[test]
    fn rejects_inverted_zoom_range() {
        let err = ViewerConfig::from_json_str(r#"{"zoom": {"min": 3, "max": 2}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unusable_export_margins() {
        let err = ViewerConfig::from_json_str(r#"{"export": {"margins": 600}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.starts_with("export")));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{"fitToWidth": false}"#).unwrap();
        let config = ViewerConfig::from_json_file(&path).unwrap();
        assert!(!config.fit_to_width);

        let missing = ViewerConfig::from_json_file(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
