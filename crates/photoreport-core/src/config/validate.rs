//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::ReportConfig;

impl ReportConfig {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let settings = &self.settings;

        if settings.images_per_slide == 0 {
            return Err(ConfigError::ValidationError(
                "settings.layout_por_slide must be > 0".into(),
            ));
        }
        if settings.positions.len() != settings.images_per_slide {
            return Err(ConfigError::ValidationError(format!(
                "settings.posicoes has {} entries but layout_por_slide is {}",
                settings.positions.len(),
                settings.images_per_slide
            )));
        }
        if let Some(i) = settings
            .positions
            .iter()
            .position(|p| !p.left.is_finite() || !p.top.is_finite())
        {
            return Err(ConfigError::ValidationError(format!(
                "settings.posicoes[{i}] must have finite left/top"
            )));
        }
        if !(settings.image_width_cm.is_finite() && settings.image_width_cm > 0.0) {
            return Err(ConfigError::ValidationError(
                "settings.largura_cm must be > 0".into(),
            ));
        }
        if !(settings.image_height_cm.is_finite() && settings.image_height_cm > 0.0) {
            return Err(ConfigError::ValidationError(
                "settings.altura_cm must be > 0".into(),
            ));
        }
        if !(settings.blur_threshold.is_finite() && settings.blur_threshold >= 0.0) {
            return Err(ConfigError::ValidationError(
                "settings.limiar_desfocagem must be >= 0".into(),
            ));
        }
        if self.folders.template.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "folders.ficheiro_template must not be empty".into(),
            ));
        }
        for (key, path) in [
            ("pasta_origem", &self.folders.source_dir),
            ("pasta_destino", &self.folders.destination_dir),
            ("pasta_processadas", &self.folders.processed_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "folders.{key} must not be empty"
                )));
            }
        }
        Ok(())
    }
}
