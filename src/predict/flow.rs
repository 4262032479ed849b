use crate::error::ValidationError;

use super::encoder::EncoderSet;
use super::features::{RawInputs, assemble};
use super::regressor::Regressor;

// ---------------------------------------------------------------------------
// Prediction flow – one pass per submit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    AwaitingInput,
    Validating,
    Rejected,
    Encoding,
    Predicting,
    Displayed,
}

/// What the last submit produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rejected(ValidationError),
    Predicted { price: f64 },
}

impl Outcome {
    /// User-facing message, prices prefixed with `currency`.
    pub fn message(&self, currency: &str) -> String {
        match self {
            Outcome::Rejected(err) => err.to_string(),
            Outcome::Predicted { price } => {
                format!("Predicted Car Price: {}", format_currency(*price, currency))
            }
        }
    }
}

/// Drives the prediction form. Nothing but the last outcome survives
/// between submits.
#[derive(Debug)]
pub struct PredictionFlow {
    state: FlowState,
    outcome: Option<Outcome>,
}

impl Default for PredictionFlow {
    fn default() -> Self {
        Self {
            state: FlowState::AwaitingInput,
            outcome: None,
        }
    }
}

impl PredictionFlow {
    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Run validation, encoding and prediction for one submit.
    pub fn submit(
        &mut self,
        raw: &RawInputs,
        encoders: &EncoderSet,
        model: &dyn Regressor,
    ) -> &Outcome {
        self.transition(FlowState::Validating);
        let outcome = match assemble(raw, encoders) {
            Err(err) => {
                self.transition(FlowState::Rejected);
                log::info!("Prediction input rejected: {err}");
                // The form stays open for correction.
                self.transition(FlowState::AwaitingInput);
                Outcome::Rejected(err)
            }
            Ok(features) => {
                self.transition(FlowState::Encoding);
                log::debug!("Feature vector {features}");

                self.transition(FlowState::Predicting);
                let price = model.predict_one(&features);

                self.transition(FlowState::Displayed);
                Outcome::Predicted { price }
            }
        };
        self.outcome.insert(outcome)
    }

    /// Any form edit after a displayed result re-opens the form.
    pub fn interact(&mut self) {
        if self.state == FlowState::Displayed {
            self.transition(FlowState::AwaitingInput);
        }
    }

    fn transition(&mut self, next: FlowState) {
        log::trace!("prediction flow {:?} -> {next:?}", self.state);
        self.state = next;
    }
}

// ---------------------------------------------------------------------------
// Currency formatting
// ---------------------------------------------------------------------------

/// `1234567.891` → `₹1,234,567.89`. The sign follows the symbol.
pub fn format_currency(value: f64, symbol: &str) -> String {
    if !value.is_finite() {
        return format!("{symbol}{value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{symbol}{sign}{grouped}.{frac_part}")
}
