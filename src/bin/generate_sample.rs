use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;
use serde_json::json;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// One synthetic listing, serialised with the dataset's column names.
#[derive(Serialize)]
struct Row {
    #[serde(rename = "Car_Model")]
    car_model: &'static str,
    #[serde(rename = "Manufactured_By")]
    brand: &'static str,
    #[serde(rename = "Car_Produced_Year")]
    year: i64,
    #[serde(rename = "Transmission")]
    transmission: &'static str,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "Kms_Driven")]
    km: f64,
    #[serde(rename = "Engine_CC")]
    engine_cc: f64,
    #[serde(rename = "Mileage")]
    mileage: f64,
    #[serde(rename = "Fuel_Type")]
    fuel: &'static str,
    #[serde(rename = "No_of_Owners")]
    owners: i64,
    #[serde(rename = "Seats")]
    seats: i64,
    #[serde(rename = "Car_Price")]
    price: f64,
}

/// (brand, model, engine cc, seats, new price)
const CATALOGUE: [(&str, &str, f64, i64, f64); 10] = [
    ("Maruti", "Swift", 1197.0, 5, 650_000.0),
    ("Maruti", "Baleno", 1197.0, 5, 720_000.0),
    ("Maruti", "Ertiga", 1462.0, 7, 950_000.0),
    ("Hyundai", "i20", 1197.0, 5, 780_000.0),
    ("Hyundai", "Creta", 1497.0, 5, 1_400_000.0),
    ("Tata", "Nexon", 1199.0, 5, 1_000_000.0),
    ("Honda", "City", 1498.0, 5, 1_250_000.0),
    ("Toyota", "Innova", 2393.0, 7, 2_100_000.0),
    ("Mahindra", "XUV500", 2179.0, 7, 1_700_000.0),
    ("Kia", "Seltos", 1493.0, 5, 1_500_000.0),
];
const CITIES: [&str; 6] = ["Bangalore", "Chennai", "Delhi", "Hyderabad", "Jaipur", "Kolkata"];
const FUELS: [&str; 3] = ["Petrol", "Diesel", "CNG"];

const ROWS: usize = 600;
const CSV_PATH: &str = "Cleaned_Car_Dheko.csv";
const PARQUET_PATH: &str = "Cleaned_Car_Dheko.parquet";
const MODEL_PATH: &str = "car_price_model.json";

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|_| {
            let &(brand, car_model, engine_cc, seats, new_price) = rng.pick(&CATALOGUE);
            let year = 2010 + (rng.next_u64() % 14) as i64;
            let age = (2024 - year) as f64;
            let km = (age * rng.uniform(6_000.0, 14_000.0)).round().max(500.0);
            let owners = 1 + (rng.next_u64() % if age > 6.0 { 3 } else { 2 }) as i64;
            let transmission = if rng.next_f64() < 0.3 { "Automatic" } else { "Manual" };
            let fuel = *rng.pick(&FUELS);
            let mileage = (rng.uniform(12.0, 24.0) * 10.0).round() / 10.0;

            let depreciation = 0.88_f64.powf(age) * (1.0 - km / 1_000_000.0);
            let premium = if transmission == "Automatic" { 1.08 } else { 1.0 };
            let noise = rng.uniform(0.92, 1.08);
            let price = (new_price * depreciation * premium * noise / 1000.0).round() * 1000.0;

            Row {
                car_model,
                brand,
                year,
                transmission,
                city: *rng.pick(&CITIES),
                km,
                engine_cc,
                mileage,
                fuel,
                owners,
                seats,
                price,
            }
        })
        .collect()
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let text = |f: fn(&Row) -> &'static str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("Car_Model", text(|r| r.car_model)),
        ("Manufactured_By", text(|r| r.brand)),
        ("Car_Produced_Year", int(|r| r.year)),
        ("Transmission", text(|r| r.transmission)),
        ("City", text(|r| r.city)),
        ("Kms_Driven", float(|r| r.km)),
        ("Engine_CC", float(|r| r.engine_cc)),
        ("Mileage", float(|r| r.mileage)),
        ("Fuel_Type", text(|r| r.fuel)),
        ("No_of_Owners", int(|r| r.owners)),
        ("Seats", int(|r| r.seats)),
        ("Car_Price", float(|r| r.price)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| {
                let data_type: DataType = array.data_type().clone();
                Field::new(*name, data_type, false)
            })
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

/// A small hand-built boosted ensemble over the eleven model inputs
/// (km, transmission, model, year, cc, mileage, city, fuel, owners, brand, seats).
fn write_model(rows: &[Row]) -> Result<()> {
    let mean_price = rows.iter().map(|r| r.price).sum::<f64>() / rows.len().max(1) as f64;
    let leaf = |value: f64| json!({ "leaf": { "value": value } });
    let split = |feature: usize, threshold: f64, left, right| {
        json!({ "split": { "feature": feature, "threshold": threshold, "left": left, "right": right } })
    };

    let trees = vec![
        // model year
        split(
            3,
            2016.5,
            split(3, 2013.5, leaf(-250_000.0), leaf(-90_000.0)),
            split(3, 2020.5, leaf(80_000.0), leaf(260_000.0)),
        ),
        // engine cc
        split(4, 1300.0, leaf(-120_000.0), split(4, 2000.0, leaf(150_000.0), leaf(520_000.0))),
        // kilometers driven
        split(0, 40_000.0, leaf(60_000.0), split(0, 90_000.0, leaf(-20_000.0), leaf(-110_000.0))),
        // transmission: automatic is 0
        split(1, 0.5, leaf(45_000.0), leaf(-15_000.0)),
        // owners
        split(8, 1.5, leaf(25_000.0), leaf(-40_000.0)),
        // seats
        split(10, 5.5, leaf(-10_000.0), leaf(90_000.0)),
    ];

    let feature_names = [
        "Kms_Driven",
        "Transmission",
        "Car_Model",
        "Car_Produced_Year",
        "Engine_CC",
        "Mileage",
        "City",
        "Fuel_Type",
        "No_of_Owners",
        "Manufactured_By",
        "Seats",
    ];
    let model = json!({
        "format_version": 1,
        "n_features": feature_names.len(),
        "feature_names": feature_names,
        "init": mean_price.round(),
        "learning_rate": 1.0,
        "trees": trees,
    });

    let text = serde_json::to_string_pretty(&model).context("serialising model")?;
    std::fs::write(MODEL_PATH, text).context("writing model file")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows)?;
    write_parquet(&rows)?;
    write_model(&rows)?;

    println!("Wrote {} cars to {CSV_PATH} and {PARQUET_PATH}, model to {MODEL_PATH}", rows.len());
    Ok(())
}
