use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Application configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_DATASET_PATH: &str = "Cleaned_Car_Dheko.csv";
pub const DEFAULT_MODEL_PATH: &str = "car_price_model.json";
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Environment overrides for the artefact paths.
pub const DATASET_ENV: &str = "CAR_RESALE_DATASET";
pub const MODEL_ENV: &str = "CAR_RESALE_MODEL";

/// Where the dataset and the trained model live, and how prices are shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub currency_symbol: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl AppConfig {
    /// Defaults, with the artefact paths taken from the environment if set.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(DATASET_ENV).filter(|p| !p.is_empty()) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(path) = lookup(MODEL_ENV).filter(|p| !p.is_empty()) {
            config.model_path = PathBuf::from(path);
        }
        config
    }
}
