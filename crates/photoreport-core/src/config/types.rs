//! Section structs for the report configuration.
//!
//! Keys keep the names used by existing report config files (`pasta_origem`,
//! `layout_por_slide`, ...); the Rust fields carry English names.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// Folder and site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FoldersConfig {
    /// Folder scanned for photographs
    #[serde(rename = "pasta_origem")]
    pub source_dir: PathBuf,

    /// Folder receiving the generated deck
    #[serde(rename = "pasta_destino")]
    pub destination_dir: PathBuf,

    /// Folder receiving source files once they are placed
    #[serde(rename = "pasta_processadas")]
    pub processed_dir: PathBuf,

    /// Presentation template (.pptx)
    #[serde(rename = "ficheiro_template")]
    pub template: PathBuf,

    /// Unit name printed on the header slide
    #[serde(rename = "unidade")]
    pub unit: String,

    /// Address printed on the header slide
    #[serde(rename = "endereco")]
    pub address: String,
}

/// Offset of one image slot, in centimetres from the slide's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlotPosition {
    pub left: f64,
    pub top: f64,
}

impl SlotPosition {
    pub fn new(left: f64, top: f64) -> Self {
        Self { left, top }
    }
}

/// Blur threshold and slide grid geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettingsConfig {
    /// Laplacian variance below which an image is flagged as blurry
    #[serde(rename = "limiar_desfocagem")]
    pub blur_threshold: f64,

    /// Width of every placed image, in centimetres
    #[serde(rename = "largura_cm")]
    pub image_width_cm: f64,

    /// Height of every placed image, in centimetres
    #[serde(rename = "altura_cm")]
    pub image_height_cm: f64,

    /// Images per content slide
    #[serde(rename = "layout_por_slide")]
    pub images_per_slide: usize,

    /// One position per slot, in placement order
    #[serde(rename = "posicoes", deserialize_with = "deserialize_positions")]
    pub positions: Vec<SlotPosition>,

    /// Template layout used for the header slide
    #[serde(rename = "layout_cabecalho", default = "default_header_layout")]
    pub header_layout: usize,

    /// Template layout used for content slides
    #[serde(rename = "layout_conteudo", default = "default_content_layout")]
    pub content_layout: usize,
}

fn default_header_layout() -> usize {
    0
}

fn default_content_layout() -> usize {
    5
}

/// Accept either a native array of `{left, top}` tables or a string holding
/// the same array as JSON.
fn deserialize_positions<'de, D>(deserializer: D) -> Result<Vec<SlotPosition>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::String(json) => serde_json::from_str(&json)
            .map_err(|e| D::Error::custom(format!("posicoes is not a valid JSON array: {e}"))),
        other => serde_json::from_value(other).map_err(D::Error::custom),
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,

    /// Append-only diagnostic log file (none disables file logging)
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: Some(PathBuf::from("photoreport.log")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        settings: SettingsConfig,
    }

    const BASE: &str = r#"
        limiar_desfocagem = 100.0
        largura_cm = 12.0
        altura_cm = 9.0
        layout_por_slide = 2
    "#;

    #[test]
    fn test_positions_from_inline_tables() {
        let text = format!(
            "[settings]\n{BASE}\nposicoes = [{{ left = 1.0, top = 2.0 }}, {{ left = 3.5, top = 2.0 }}]"
        );
        let parsed: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(
            parsed.settings.positions,
            vec![SlotPosition::new(1.0, 2.0), SlotPosition::new(3.5, 2.0)]
        );
    }

    #[test]
    fn test_positions_from_json_string() {
        let text = format!(
            "[settings]\n{BASE}\nposicoes = '[{{\"left\": 1, \"top\": 2}}, {{\"left\": 3.5, \"top\": 2}}]'"
        );
        let parsed: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(parsed.settings.positions.len(), 2);
        assert_eq!(parsed.settings.positions[1], SlotPosition::new(3.5, 2.0));
    }

    #[test]
    fn test_positions_rejects_bad_json_string() {
        let text = format!("[settings]\n{BASE}\nposicoes = '[{{left: 1}}'");
        let err = toml::from_str::<Wrapper>(&text).err().unwrap();
        assert!(err.to_string().contains("posicoes"));
    }

    #[test]
    fn test_layout_indices_default() {
        let text = format!("[settings]\n{BASE}\nposicoes = []");
        let parsed: Wrapper = toml::from_str(&text).unwrap();
        assert_eq!(parsed.settings.header_layout, 0);
        assert_eq!(parsed.settings.content_layout, 5);
    }

    #[test]
    fn test_unknown_setting_rejected() {
        let text = format!("[settings]\n{BASE}\nposicoes = []\nqualidade = 3");
        assert!(toml::from_str::<Wrapper>(&text).is_err());
    }

    #[test]
    fn test_logging_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, "pretty");
        assert!(config.file.is_some());
    }
}
