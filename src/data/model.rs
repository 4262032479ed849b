use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the car table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value used for filtering, grouping and display.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Transmission
// ---------------------------------------------------------------------------

/// Gearbox type. A fixed two-valued domain, encoded directly rather than
/// learned from the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transmission {
    #[serde(alias = "automatic")]
    Automatic,
    #[serde(alias = "manual")]
    Manual,
}

impl Transmission {
    pub const ALL: [Transmission; 2] = [Transmission::Automatic, Transmission::Manual];

    /// Model input code: Automatic → 0, Manual → 1.
    pub fn code(self) -> f64 {
        match self {
            Transmission::Automatic => 0.0,
            Transmission::Manual => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Transmission::Automatic => "Automatic",
            Transmission::Manual => "Manual",
        }
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column – the fixed schema of the dataset
// ---------------------------------------------------------------------------

/// How a column is presented in filters and charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Categorical,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    CarModel,
    Brand,
    ProducedYear,
    Transmission,
    City,
    KilometersDriven,
    EngineCc,
    Mileage,
    FuelType,
    OwnerCount,
    SeatCount,
    Price,
}

impl Column {
    /// All columns in file order.
    pub const ALL: [Column; 12] = [
        Column::CarModel,
        Column::Brand,
        Column::ProducedYear,
        Column::Transmission,
        Column::City,
        Column::KilometersDriven,
        Column::EngineCc,
        Column::Mileage,
        Column::FuelType,
        Column::OwnerCount,
        Column::SeatCount,
        Column::Price,
    ];

    /// Header name in the dataset file.
    pub fn header(self) -> &'static str {
        match self {
            Column::CarModel => "Car_Model",
            Column::Brand => "Manufactured_By",
            Column::ProducedYear => "Car_Produced_Year",
            Column::Transmission => "Transmission",
            Column::City => "City",
            Column::KilometersDriven => "Kms_Driven",
            Column::EngineCc => "Engine_CC",
            Column::Mileage => "Mileage",
            Column::FuelType => "Fuel_Type",
            Column::OwnerCount => "No_of_Owners",
            Column::SeatCount => "Seats",
            Column::Price => "Car_Price",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::CarModel
            | Column::Brand
            | Column::Transmission
            | Column::City
            | Column::FuelType => ColumnKind::Categorical,
            _ => ColumnKind::Numeric,
        }
    }

    pub fn is_categorical(self) -> bool {
        self.kind() == ColumnKind::Categorical
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// CarRecord – one row of the dataset
// ---------------------------------------------------------------------------

/// A single used car listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    #[serde(rename = "Car_Model")]
    pub car_model: String,
    #[serde(rename = "Manufactured_By")]
    pub brand: String,
    #[serde(rename = "Car_Produced_Year", deserialize_with = "whole_number")]
    pub produced_year: i32,
    #[serde(rename = "Transmission")]
    pub transmission: Transmission,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Kms_Driven")]
    pub kilometers_driven: f64,
    #[serde(rename = "Engine_CC")]
    pub engine_cc: f64,
    #[serde(rename = "Mileage")]
    pub mileage: f64,
    #[serde(rename = "Fuel_Type")]
    pub fuel_type: String,
    #[serde(rename = "No_of_Owners", deserialize_with = "whole_number")]
    pub owner_count: u32,
    #[serde(rename = "Seats", deserialize_with = "whole_number")]
    pub seat_count: u32,
    #[serde(rename = "Car_Price")]
    pub price: f64,
}

/// `value` as an integer when it is finite, has no fractional part and fits
/// `T`. Pandas writes integer columns holding NaN as `1.0`, `5.0`, ...
pub fn whole<T: TryFrom<i64>>(value: f64) -> Option<T> {
    if value.is_finite() && value.fract() == 0.0 {
        T::try_from(value as i64).ok()
    } else {
        None
    }
}

fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let value = f64::deserialize(deserializer)?;
    whole(value).ok_or_else(|| D::Error::custom(format!("{value} is not a whole number in range")))
}

impl CarRecord {
    /// Cell value of `column` for this row.
    pub fn value(&self, column: Column) -> CellValue {
        match column {
            Column::CarModel => CellValue::Text(self.car_model.clone()),
            Column::Brand => CellValue::Text(self.brand.clone()),
            Column::ProducedYear => CellValue::Integer(self.produced_year.into()),
            Column::Transmission => CellValue::Text(self.transmission.label().to_string()),
            Column::City => CellValue::Text(self.city.clone()),
            Column::KilometersDriven => CellValue::Float(self.kilometers_driven),
            Column::EngineCc => CellValue::Float(self.engine_cc),
            Column::Mileage => CellValue::Float(self.mileage),
            Column::FuelType => CellValue::Text(self.fuel_type.clone()),
            Column::OwnerCount => CellValue::Integer(self.owner_count.into()),
            Column::SeatCount => CellValue::Integer(self.seat_count.into()),
            Column::Price => CellValue::Float(self.price),
        }
    }

    /// Numeric view of `column`, `None` for text columns.
    pub fn numeric(&self, column: Column) -> Option<f64> {
        match column {
            Column::ProducedYear => Some(self.produced_year.into()),
            Column::KilometersDriven => Some(self.kilometers_driven),
            Column::EngineCc => Some(self.engine_cc),
            Column::Mileage => Some(self.mileage),
            Column::OwnerCount => Some(self.owner_count.into()),
            Column::SeatCount => Some(self.seat_count.into()),
            Column::Price => Some(self.price),
            _ => None,
        }
    }

    /// Borrow the raw text of a string-valued column.
    pub fn text(&self, column: Column) -> Option<&str> {
        match column {
            Column::CarModel => Some(&self.car_model),
            Column::Brand => Some(&self.brand),
            Column::Transmission => Some(self.transmission.label()),
            Column::City => Some(&self.city),
            Column::FuelType => Some(&self.fuel_type),
            _ => None,
        }
    }

    /// Basic range checks; returns a description of the first violation.
    pub fn range_violation(&self) -> Option<String> {
        let non_negative = [
            (Column::KilometersDriven, self.kilometers_driven),
            (Column::EngineCc, self.engine_cc),
            (Column::Mileage, self.mileage),
            (Column::Price, self.price),
        ];
        for (column, value) in non_negative {
            if !(value >= 0.0) {
                return Some(format!("{column} must be non-negative, got {value}"));
            }
        }
        if self.owner_count < 1 {
            return Some(format!("{} must be at least 1", Column::OwnerCount));
        }
        if self.seat_count < 2 {
            return Some(format!(
                "{} must be at least 2, got {}",
                Column::SeatCount,
                self.seat_count
            ));
        }
        None
    }
}

// ---------------------------------------------------------------------------
// CarDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices. Immutable once
/// built.
#[derive(Debug, Clone, Default)]
pub struct CarDataset {
    /// All listings (rows) in file order.
    pub records: Vec<CarRecord>,
    /// For each column the sorted set of unique values.
    pub unique_values: BTreeMap<Column, BTreeSet<CellValue>>,
}

impl CarDataset {
    /// Build column indices from the loaded records.
    pub fn from_records(records: Vec<CarRecord>) -> Self {
        let mut unique_values: BTreeMap<Column, BTreeSet<CellValue>> = BTreeMap::new();
        for record in &records {
            for column in Column::ALL {
                unique_values
                    .entry(column)
                    .or_default()
                    .insert(record.value(column));
            }
        }
        CarDataset {
            records,
            unique_values,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct text values of `column` in order of first appearance.
    pub fn distinct_text(&self, column: Column) -> Vec<&str> {
        distinct_in_order(self.records.iter().filter_map(|r| r.text(column)))
    }

    /// Distinct car models sold under `brand`, in order of first appearance.
    pub fn models_for_brand(&self, brand: &str) -> Vec<&str> {
        distinct_in_order(
            self.records
                .iter()
                .filter(|r| r.brand == brand)
                .map(|r| r.car_model.as_str()),
        )
    }

    /// Distinct production years in order of first appearance.
    pub fn distinct_years(&self) -> Vec<i32> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.produced_year)
            .filter(|y| seen.insert(*y))
            .collect()
    }

    /// Inclusive `(min, max)` of a numeric column, `None` when empty or text.
    pub fn numeric_bounds(&self, column: Column) -> Option<(f64, f64)> {
        self.records
            .iter()
            .filter_map(|r| r.numeric(column))
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(brand: &str, model: &str, city: &str, fuel: &str, price: f64) -> CarRecord {
        CarRecord {
            car_model: model.to_string(),
            brand: brand.to_string(),
            produced_year: 2018,
            transmission: Transmission::Manual,
            city: city.to_string(),
            kilometers_driven: 40_000.0,
            engine_cc: 1200.0,
            mileage: 18.0,
            fuel_type: fuel.to_string(),
            owner_count: 1,
            seat_count: 5,
            price,
        }
    }

    pub(crate) fn sample_dataset() -> CarDataset {
        let mut rows = vec![
            record("Maruti", "Swift", "Pune", "Petrol", 550_000.0),
            record("Hyundai", "i20", "Chennai", "Petrol", 620_000.0),
            record("Maruti", "Baleno", "Pune", "Diesel", 700_000.0),
            record("Tata", "Nexon", "Delhi", "Electric", 1_100_000.0),
            record("Maruti", "Swift", "Delhi", "CNG", 480_000.0),
        ];
        rows[1].produced_year = 2016;
        rows[1].transmission = Transmission::Automatic;
        rows[3].produced_year = 2021;
        rows[3].seat_count = 7;
        CarDataset::from_records(rows)
    }

    #[test]
    fn unique_values_cover_every_column() {
        let ds = sample_dataset();
        assert_eq!(ds.unique_values.len(), Column::ALL.len());
        assert_eq!(ds.unique_values[&Column::Brand].len(), 3);
        assert_eq!(ds.unique_values[&Column::SeatCount].len(), 2);
    }

    #[test]
    fn distinct_text_keeps_first_appearance_order() {
        let ds = sample_dataset();
        assert_eq!(ds.distinct_text(Column::Brand), ["Maruti", "Hyundai", "Tata"]);
        assert_eq!(ds.models_for_brand("Maruti"), ["Swift", "Baleno"]);
        assert!(ds.models_for_brand("Skoda").is_empty());
        assert_eq!(ds.distinct_years(), [2018, 2016, 2021]);
    }

    #[test]
    fn numeric_bounds_span_the_column() {
        let ds = sample_dataset();
        assert_eq!(ds.numeric_bounds(Column::Price), Some((480_000.0, 1_100_000.0)));
        assert_eq!(ds.numeric_bounds(Column::City), None);
        assert_eq!(CarDataset::default().numeric_bounds(Column::Price), None);
    }

    #[test]
    fn range_violation_flags_bad_rows() {
        let mut row = record("Maruti", "Swift", "Pune", "Petrol", 1.0);
        assert_eq!(row.range_violation(), None);
        row.seat_count = 1;
        assert!(row.range_violation().unwrap().contains("Seats"));
        row.seat_count = 5;
        row.mileage = -3.0;
        assert!(row.range_violation().unwrap().contains("Mileage"));
    }

    #[test]
    fn cell_values_order_within_variant() {
        assert!(CellValue::Integer(2) < CellValue::Integer(10));
        assert!(CellValue::Text("Audi".into()) < CellValue::Text("BMW".into()));
        assert!(CellValue::Float(1.5) < CellValue::Text("a".into()));
        assert_eq!(CellValue::Float(18.456).to_string(), "18.46");
    }

    #[test]
    fn whole_accepts_integral_floats_only() {
        assert_eq!(whole::<u32>(5.0), Some(5));
        assert_eq!(whole::<i32>(2018.0), Some(2018));
        assert_eq!(whole::<u32>(1.5), None);
        assert_eq!(whole::<i32>(2018.9), None);
        assert_eq!(whole::<u32>(-1.0), None);
        assert_eq!(whole::<u32>(f64::NAN), None);
        assert_eq!(whole::<i32>(1e12), None);
    }
}
