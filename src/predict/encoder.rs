use std::collections::HashMap;

use crate::data::model::{CarDataset, Column};

/// Code substituted for a label the encoder has never seen.
pub const UNKNOWN_CODE: i64 = -1;

// ---------------------------------------------------------------------------
// Encoded – the result of looking a label up
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded {
    Known(u32),
    Unknown,
}

impl Encoded {
    /// Numeric model input: the code, or [`UNKNOWN_CODE`] for unseen labels.
    pub fn code_or_sentinel(self) -> i64 {
        match self {
            Encoded::Known(code) => code.into(),
            Encoded::Unknown => UNKNOWN_CODE,
        }
    }
}

// ---------------------------------------------------------------------------
// CategoricalEncoder
// ---------------------------------------------------------------------------

/// Fixed label → code mapping learned from one column.
///
/// Labels are sorted and numbered from 0, the same assignment a label
/// encoder fitted on the training data makes. Matching is exact: no
/// trimming and no case folding.
#[derive(Debug, Clone, Default)]
pub struct CategoricalEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoricalEncoder {
    pub fn build<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = values.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        let codes = classes
            .iter()
            .enumerate()
            .map(|(code, label)| (label.clone(), code as u32))
            .collect();
        Self { classes, codes }
    }

    pub fn encode(&self, label: &str) -> Encoded {
        self.codes
            .get(label)
            .map_or(Encoded::Unknown, |&code| Encoded::Known(code))
    }

    /// Known labels in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// EncoderSet – one encoder per categorical model input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct EncoderSet {
    pub car_model: CategoricalEncoder,
    pub brand: CategoricalEncoder,
    pub fuel_type: CategoricalEncoder,
    pub city: CategoricalEncoder,
}

impl EncoderSet {
    /// Fit every encoder on the observed values of its dataset column.
    pub fn from_dataset(dataset: &CarDataset) -> Self {
        let fit = |column: Column| {
            CategoricalEncoder::build(dataset.records.iter().filter_map(|r| r.text(column)))
        };
        let set = Self {
            car_model: fit(Column::CarModel),
            brand: fit(Column::Brand),
            fuel_type: fit(Column::FuelType),
            city: fit(Column::City),
        };
        log::info!(
            "Fitted encoders: {} models, {} brands, {} fuel types, {} cities",
            set.car_model.len(),
            set.brand.len(),
            set.fuel_type.len(),
            set.city.len()
        );
        for (name, encoder) in set.named() {
            if encoder.is_empty() {
                log::warn!("No {name} labels in the dataset; every {name} encodes as unknown");
            } else {
                log::debug!("{name} classes: {:?}", encoder.classes());
            }
        }
        set
    }

    fn named(&self) -> [(&'static str, &CategoricalEncoder); 4] {
        [
            ("car model", &self.car_model),
            ("brand", &self.brand),
            ("fuel type", &self.fuel_type),
            ("city", &self.city),
        ]
    }
}
