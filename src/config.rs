use crate::scoring_model::ScoringModel;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Optional path to a scoring model JSON file; defaults apply when unset.
    pub scoring_model_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            scoring_model_path: std::env::var("SCORING_MODEL_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        };

        tracing::info!("Configuration loaded successfully");
        match &config.scoring_model_path {
            Some(path) => tracing::debug!("Scoring model path: {}", path.display()),
            None => tracing::debug!("No scoring model path set, using built-in defaults"),
        }

        Ok(config)
    }

    /// Load the scoring model named by the configuration, or the defaults.
    ///
    /// A configured file that fails to parse or validate is an error, not a
    /// silent fallback.
    pub fn load_scoring_model(&self) -> anyhow::Result<ScoringModel> {
        let Some(path) = &self.scoring_model_path else {
            return Ok(ScoringModel::default());
        };

        let text = std::fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("failed to read scoring model {}: {}", path.display(), e)
        })?;
        let model: ScoringModel = serde_json::from_str(&text).map_err(|e| {
            anyhow::anyhow!("failed to parse scoring model {}: {}", path.display(), e)
        })?;
        model
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid scoring model {}: {}", path.display(), e))?;

        tracing::info!(model = %model.name, version = %model.version, "scoring model loaded");
        Ok(model)
    }
}
