/// Prediction core: encoding, feature assembly, the model and the form flow.
///
/// ```text
///   form selections ──► RawInputs
///                          │
///                          ▼
///   EncoderSet ──────► features::assemble ──► FeatureVector (11, fixed order)
///                       (validate, encode)
///                                                │
///                                                ▼
///                                      Regressor::predict_one ──► price
/// ```

pub mod encoder;
pub mod features;
pub mod flow;
pub mod regressor;
