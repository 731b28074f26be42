//! Configuration management for photo reports.
//!
//! Configuration is a TOML file with a `[folders]` section, a `[settings]`
//! section and an optional `[logging]` section. It is loaded and validated
//! once per run and shared read-only afterwards.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory before the platform default.
pub const LOCAL_CONFIG_FILE: &str = "config.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Folder paths and site metadata
    #[serde(alias = "Pastas")]
    pub folders: FoldersConfig,

    /// Blur threshold and layout geometry
    #[serde(alias = "Configuracoes")]
    pub settings: SettingsConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Directory of the file this config was read from
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl ReportConfig {
    /// Load configuration from `./config.toml`, falling back to the platform
    /// config directory.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::locate())
    }

    /// Load from `path` when given, otherwise as [`ReportConfig::load`].
    pub fn load_or_locate(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        }
    }

    /// File that [`ReportConfig::load`] reads: `./config.toml` when present,
    /// else [`ReportConfig::default_path`].
    pub fn locate() -> PathBuf {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            local
        } else {
            Self::default_path()
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    /// Parse and validate configuration text. Relative template and log file
    /// paths are resolved against the working directory.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.photoreport.photoreport/config.toml
    /// - Linux: ~/.config/photoreport/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\photoreport\config\config.toml
    ///
    /// Falls back to ~/.photoreport/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "photoreport", "photoreport")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".photoreport").join("config.toml")
            })
    }

    /// Configured source folder (with ~ expansion).
    pub fn source_dir(&self) -> PathBuf {
        expand(&self.folders.source_dir)
    }

    /// Destination folder for generated decks (with ~ expansion).
    pub fn destination_dir(&self) -> PathBuf {
        expand(&self.folders.destination_dir)
    }

    /// Folder receiving placed source files (with ~ expansion).
    pub fn processed_dir(&self) -> PathBuf {
        expand(&self.folders.processed_dir)
    }

    /// Template path. Relative paths are taken from the config file's folder.
    pub fn template_path(&self) -> PathBuf {
        self.relative_to_config(&self.folders.template)
    }

    /// Log file path, resolved like [`ReportConfig::template_path`].
    pub fn log_file(&self) -> Option<PathBuf> {
        self.logging
            .file
            .as_deref()
            .map(|file| self.relative_to_config(file))
    }

    fn relative_to_config(&self, path: &Path) -> PathBuf {
        let path = expand(path);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }

    /// A documented starter configuration.
    pub fn example_toml() -> &'static str {
        EXAMPLE_CONFIG
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

const EXAMPLE_CONFIG: &str = r#"# Photo report configuration

[folders]
# Folder scanned for photographs (png, jpg, jpeg, gif, bmp)
pasta_origem = "~/Fotos/entrada"
# Folder receiving the generated deck
pasta_destino = "~/Fotos/relatorios"
# Placed photographs are moved here
pasta_processadas = "~/Fotos/processadas"
# Relative paths are resolved against this file's folder
ficheiro_template = "template.pptx"
unidade = "Unidade Centro"
endereco = "Rua Principal, 100"

[settings]
# Laplacian variance below which a photo is logged as blurry
limiar_desfocagem = 100.0
largura_cm = 12.0
altura_cm = 9.0
layout_por_slide = 2
# One {left, top} offset in centimetres per slot
posicoes = [{ left = 0.8, top = 4.5 }, { left = 13.0, top = 4.5 }]
layout_cabecalho = 0
layout_conteudo = 5

[logging]
level = "info"
format = "pretty"
file = "photoreport.log"
"#;
