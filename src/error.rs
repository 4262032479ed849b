use std::path::PathBuf;

/// A required artefact (dataset or model) could not be loaded. Fatal for the
/// view that depends on it; never retried.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to load dataset from {}: {cause:#}", path.display())]
    Dataset {
        path: PathBuf,
        cause: anyhow::Error,
    },

    #[error("failed to load price model from {}: {cause:#}", path.display())]
    Model {
        path: PathBuf,
        cause: anyhow::Error,
    },
}

/// Rejected form input. The `Display` text is shown to the user as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter valid positive values for KM Driven, Engine CC, and Mileage.")]
    NonPositiveNumeric,

    #[error("Invalid car model or brand selected.")]
    MissingSelection,
}
