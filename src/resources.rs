use std::sync::OnceLock;

use crate::config::AppConfig;
use crate::data::loader;
use crate::data::model::CarDataset;
use crate::error::StartupError;
use crate::predict::encoder::EncoderSet;
use crate::predict::regressor::{GradientBoostedTrees, Regressor};

// ---------------------------------------------------------------------------
// Memoized – load at most once, success or failure
// ---------------------------------------------------------------------------

/// A value produced by the first successful or failed load. Failures are
/// cached too: a missing file is not retried.
#[derive(Debug)]
pub struct Memoized<T> {
    cell: OnceLock<Result<T, StartupError>>,
}

impl<T> Default for Memoized<T> {
    fn default() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }
}

impl<T> Memoized<T> {
    pub fn get_or_load(
        &self,
        load: impl FnOnce() -> Result<T, StartupError>,
    ) -> Result<&T, &StartupError> {
        self.cell.get_or_init(load).as_ref()
    }

    /// The loaded value, without triggering a load.
    pub fn loaded(&self) -> Option<&T> {
        self.cell.get()?.as_ref().ok()
    }

    #[cfg(test)]
    pub fn ready(value: T) -> Self {
        Self {
            cell: OnceLock::from(Ok(value)),
        }
    }
}

// ---------------------------------------------------------------------------
// Resources – the process-wide read-only artefacts
// ---------------------------------------------------------------------------

/// Dataset, encoders and model, each created on first use and shared
/// read-only afterwards. Views receive it by `Arc`.
pub struct Resources {
    config: AppConfig,
    dataset: Memoized<CarDataset>,
    encoders: OnceLock<EncoderSet>,
    model: Memoized<Box<dyn Regressor>>,
}

impl Resources {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            dataset: Memoized::default(),
            encoders: OnceLock::new(),
            model: Memoized::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn dataset(&self) -> Result<&CarDataset, &StartupError> {
        self.dataset.get_or_load(|| {
            let path = &self.config.dataset_path;
            match loader::load_file(path) {
                Ok(dataset) => {
                    log::info!("Loaded {} cars from {}", dataset.len(), path.display());
                    Ok(dataset)
                }
                Err(cause) => {
                    let err = StartupError::Dataset {
                        path: path.clone(),
                        cause,
                    };
                    log::error!("{err}");
                    Err(err)
                }
            }
        })
    }

    /// Encoders fitted on the dataset, built once.
    pub fn encoders(&self) -> Result<&EncoderSet, &StartupError> {
        let dataset = self.dataset()?;
        Ok(self.encoders.get_or_init(|| EncoderSet::from_dataset(dataset)))
    }

    pub fn model(&self) -> Result<&dyn Regressor, &StartupError> {
        self.model
            .get_or_load(|| {
                let path = &self.config.model_path;
                match GradientBoostedTrees::load(path) {
                    Ok(model) => {
                        log::info!("Loaded price model ({}) from {}", model.describe(), path.display());
                        Ok(Box::new(model) as Box<dyn Regressor>)
                    }
                    Err(cause) => {
                        let err = StartupError::Model {
                            path: path.clone(),
                            cause,
                        };
                        log::error!("{err}");
                        Err(err)
                    }
                }
            })
            .map(|model| &**model)
    }

    /// One-line summary for the top bar; does not trigger loading.
    pub fn summary(&self) -> Option<String> {
        let dataset = self.dataset.loaded()?;
        Some(format!("{} cars loaded", dataset.len()))
    }

    #[cfg(test)]
    pub fn preloaded(dataset: CarDataset, model: Box<dyn Regressor>) -> Self {
        Self {
            config: AppConfig::default(),
            dataset: Memoized::ready(dataset),
            encoders: OnceLock::new(),
            model: Memoized::ready(model),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::path::PathBuf;

    use super::*;
    use crate::data::model::tests::sample_dataset;
    use crate::predict::regressor::tests::FixedRegressor;

    #[test]
    fn loads_once() {
        let memo: Memoized<u32> = Memoized::default();
        let loads = Cell::new(0);
        for _ in 0..3 {
            let value = memo.get_or_load(|| {
                loads.set(loads.get() + 1);
                Ok(7)
            });
            assert_eq!(value.ok(), Some(&7));
        }
        assert_eq!(memo.loaded(), Some(&7));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn failure_is_cached_not_retried() {
        let memo: Memoized<u32> = Memoized::default();
        let loads = Cell::new(0);
        let fail = || {
            loads.set(loads.get() + 1);
            Err(StartupError::Model {
                path: PathBuf::from("missing.json"),
                cause: anyhow::anyhow!("no such file"),
            })
        };
        assert!(memo.get_or_load(fail).is_err());
        assert!(memo.get_or_load(|| Ok(1)).is_err());
        assert_eq!(loads.get(), 1);
        assert!(memo.loaded().is_none());
    }

    #[test]
    fn missing_files_surface_startup_errors() {
        let resources = Resources::new(AppConfig {
            dataset_path: PathBuf::from("/nonexistent/cars.csv"),
            model_path: PathBuf::from("/nonexistent/model.json"),
            ..AppConfig::default()
        });
        assert!(resources.summary().is_none());

        let err = resources.dataset().unwrap_err();
        assert!(matches!(err, StartupError::Dataset { .. }));
        assert!(err.to_string().contains("/nonexistent/cars.csv"));
        assert!(resources.encoders().is_err());

        assert!(matches!(resources.model(), Err(StartupError::Model { .. })));
    }

    #[test]
    fn encoders_are_shared_instances() {
        let resources = Resources::preloaded(sample_dataset(), Box::new(FixedRegressor::new(1.0)));
        let a = resources.encoders().unwrap() as *const EncoderSet;
        let b = resources.encoders().unwrap() as *const EncoderSet;
        assert_eq!(a, b);
        assert_eq!(resources.summary().as_deref(), Some("5 cars loaded"));
    }
}
