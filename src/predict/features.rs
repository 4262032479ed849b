use std::fmt;

use crate::data::model::Transmission;
use crate::error::ValidationError;

use super::encoder::{Encoded, EncoderSet};

pub const FEATURE_COUNT: usize = 11;

// ---------------------------------------------------------------------------
// Feature – the one place the model's input order is declared
// ---------------------------------------------------------------------------

/// Model input in training order. The discriminant is the vector position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    KilometersDriven = 0,
    Transmission = 1,
    CarModel = 2,
    ModelYear = 3,
    EngineCc = 4,
    Mileage = 5,
    City = 6,
    FuelType = 7,
    OwnerCount = 8,
    Brand = 9,
    SeatCount = 10,
}

impl Feature {
    pub const ORDER: [Feature; FEATURE_COUNT] = [
        Feature::KilometersDriven,
        Feature::Transmission,
        Feature::CarModel,
        Feature::ModelYear,
        Feature::EngineCc,
        Feature::Mileage,
        Feature::City,
        Feature::FuelType,
        Feature::OwnerCount,
        Feature::Brand,
        Feature::SeatCount,
    ];

    pub fn position(self) -> usize {
        self as usize
    }

    /// Column name the model was trained with.
    pub fn name(self) -> &'static str {
        match self {
            Feature::KilometersDriven => "Kms_Driven",
            Feature::Transmission => "Transmission",
            Feature::CarModel => "Car_Model",
            Feature::ModelYear => "Car_Produced_Year",
            Feature::EngineCc => "Engine_CC",
            Feature::Mileage => "Mileage",
            Feature::City => "City",
            Feature::FuelType => "Fuel_Type",
            Feature::OwnerCount => "No_of_Owners",
            Feature::Brand => "Manufactured_By",
            Feature::SeatCount => "Seats",
        }
    }
}

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// One model input row, always [`FEATURE_COUNT`] long and in [`Feature::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.position()]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[cfg(test)]
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.position()] = value;
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(Feature::ORDER.iter().map(|&ft| (ft.name(), self.get(ft))))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// RawInputs – what the prediction form collects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RawInputs {
    pub kilometers_driven: f64,
    pub transmission: Transmission,
    pub car_model: String,
    pub model_year: i32,
    pub engine_cc: f64,
    pub mileage: f64,
    pub city: String,
    pub fuel_type: String,
    pub owner_count: u32,
    pub brand: String,
    pub seat_count: u32,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            kilometers_driven: 0.0,
            transmission: Transmission::Automatic,
            car_model: String::new(),
            model_year: 2015,
            engine_cc: 0.0,
            mileage: 0.0,
            city: String::new(),
            fuel_type: String::new(),
            owner_count: 1,
            brand: String::new(),
            seat_count: 2,
        }
    }
}

impl RawInputs {
    /// First failing check wins: numeric positivity, then required selections.
    pub fn validate(&self) -> Result<(), ValidationError> {
        // NaN fails `x > 0.0` and is rejected with the rest.
        let positive = |x: f64| x > 0.0;
        if !(positive(self.kilometers_driven) && positive(self.engine_cc) && positive(self.mileage))
        {
            return Err(ValidationError::NonPositiveNumeric);
        }
        if self.car_model.is_empty() || self.brand.is_empty() {
            return Err(ValidationError::MissingSelection);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Validate `raw`, then encode it into the model's input vector.
pub fn assemble(raw: &RawInputs, encoders: &EncoderSet) -> Result<FeatureVector, ValidationError> {
    raw.validate()?;
    Ok(encode(raw, encoders))
}

/// Encode already validated inputs. Unseen categories degrade to the
/// sentinel code instead of failing.
fn encode(raw: &RawInputs, encoders: &EncoderSet) -> FeatureVector {
    let category = |feature: Feature, encoded: Encoded, label: &str| -> f64 {
        if encoded == Encoded::Unknown {
            log::warn!("Unknown {} '{label}', using sentinel code", feature.name());
        }
        encoded.code_or_sentinel() as f64
    };

    let mut v = FeatureVector([0.0; FEATURE_COUNT]);
    v.set(Feature::KilometersDriven, raw.kilometers_driven);
    v.set(Feature::Transmission, raw.transmission.code());
    v.set(
        Feature::CarModel,
        category(Feature::CarModel, encoders.car_model.encode(&raw.car_model), &raw.car_model),
    );
    v.set(Feature::ModelYear, raw.model_year.into());
    v.set(Feature::EngineCc, raw.engine_cc);
    v.set(Feature::Mileage, raw.mileage);
    v.set(
        Feature::City,
        category(Feature::City, encoders.city.encode(&raw.city), &raw.city),
    );
    v.set(
        Feature::FuelType,
        category(Feature::FuelType, encoders.fuel_type.encode(&raw.fuel_type), &raw.fuel_type),
    );
    v.set(Feature::OwnerCount, raw.owner_count.into());
    v.set(
        Feature::Brand,
        category(Feature::Brand, encoders.brand.encode(&raw.brand), &raw.brand),
    );
    v.set(Feature::SeatCount, raw.seat_count.into());
    v
}
