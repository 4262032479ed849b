use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{CarDataset, CarRecord, Column, Transmission, whole};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the car dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the column names of [`Column::header`]
/// * `.parquet` – one Arrow column per field (Pandas / Polars output)
/// * `.json`    – `[{ "Car_Model": "...", ... }, ...]`
pub fn load_file(path: &Path) -> Result<CarDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    for (row_no, record) in records.iter().enumerate() {
        if let Some(problem) = record.range_violation() {
            bail!("Row {row_no}: {problem}");
        }
    }

    Ok(CarDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<CarRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    for column in Column::ALL {
        if !headers.iter().any(|h| h == column.header()) {
            bail!("CSV missing '{}' column", column.header());
        }
    }

    reader
        .deserialize()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn load_json(path: &Path) -> Result<Vec<CarRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per dataset field.
///
/// Integer and float widths are coerced, so files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`) load.
fn load_parquet(path: &Path) -> Result<Vec<CarRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            let record = record_from_batch(&batch, row)
                .with_context(|| format!("Row {}", offset + row))?;
            records.push(record);
        }
    }
    Ok(records)
}

fn record_from_batch(batch: &RecordBatch, row: usize) -> Result<CarRecord> {
    let text = |column: Column| -> Result<String> {
        extract_string(column_by_header(batch, column)?, row)
            .with_context(|| format!("reading '{}'", column.header()))
    };
    let number = |column: Column| -> Result<f64> {
        extract_f64(column_by_header(batch, column)?, row)
            .with_context(|| format!("reading '{}'", column.header()))
    };

    let transmission = match text(Column::Transmission)?.as_str() {
        "Automatic" | "automatic" => Transmission::Automatic,
        "Manual" | "manual" => Transmission::Manual,
        other => bail!("unknown transmission '{other}'"),
    };

    Ok(CarRecord {
        car_model: text(Column::CarModel)?,
        brand: text(Column::Brand)?,
        produced_year: whole_number(batch, row, Column::ProducedYear)?,
        transmission,
        city: text(Column::City)?,
        kilometers_driven: number(Column::KilometersDriven)?,
        engine_cc: number(Column::EngineCc)?,
        mileage: number(Column::Mileage)?,
        fuel_type: text(Column::FuelType)?,
        owner_count: whole_number(batch, row, Column::OwnerCount)?,
        seat_count: whole_number(batch, row, Column::SeatCount)?,
        price: number(Column::Price)?,
    })
}

// -- Parquet / Arrow helpers --

/// Integer field stored as any numeric width; fractional values are rejected.
fn whole_number<T: TryFrom<i64>>(batch: &RecordBatch, row: usize, column: Column) -> Result<T> {
    let value = extract_f64(column_by_header(batch, column)?, row)
        .with_context(|| format!("reading '{}'", column.header()))?;
    whole(value).with_context(|| {
        format!("'{}': {value} is not a whole number in range", column.header())
    })
}

fn column_by_header(batch: &RecordBatch, column: Column) -> Result<&Arc<dyn Array>> {
    batch
        .column_by_name(column.header())
        .with_context(|| format!("Parquet file missing '{}' column", column.header()))
}

fn extract_string(col: &Arc<dyn Array>, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            Ok(arr.value(row).to_string())
        }
        DataType::Utf8View => Ok(col.as_string_view().value(row).to_string()),
        other => bail!("expected a string column, got {other:?}"),
    }
}

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        other => bail!("expected a numeric column, got {other:?}"),
    };
    value.context("numeric column did not match its declared type")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use arrow::array::ArrayRef;
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "Car_Model,Manufactured_By,Car_Produced_Year,Transmission,City,\
Kms_Driven,Engine_CC,Mileage,Fuel_Type,No_of_Owners,Seats,Car_Price";

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_rows() {
        let body = format!(
            "{HEADER}\nSwift,Maruti,2018,Manual,Pune,50000,1197,18.5,Petrol,1,5,550000\n\
             i20,Hyundai,2016,Automatic,Chennai,72000,1396,17.1,Diesel,2,5,610000.5\n"
        );
        let file = write_temp(".csv", &body);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].car_model, "Swift");
        assert_eq!(ds.records[1].transmission, Transmission::Automatic);
        assert_eq!(ds.records[1].price, 610_000.5);
    }

    #[test]
    fn csv_missing_column_is_rejected() {
        let file = write_temp(".csv", "Car_Model,Manufactured_By\nSwift,Maruti\n");
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Car_Produced_Year"));
    }

    #[test]
    fn csv_out_of_range_row_is_rejected() {
        let body = format!("{HEADER}\nSwift,Maruti,2018,Manual,Pune,50000,1197,18.5,Petrol,0,5,550000\n");
        let file = write_temp(".csv", &body);
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Row 0"));
    }

    #[test]
    fn loads_json_records() {
        let body = r#"[{"Car_Model":"Nexon","Manufactured_By":"Tata","Car_Produced_Year":2021,
            "Transmission":"Manual","City":"Delhi","Kms_Driven":12000,"Engine_CC":1199,
            "Mileage":17.0,"Fuel_Type":"Petrol","No_of_Owners":1,"Seats":5,"Car_Price":900000}]"#;
        let file = write_temp(".json", body);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records[0].brand, "Tata");
    }

    /// One-row Parquet file; year and owner columns vary per test.
    fn parquet_file(year: ArrayRef, owners: ArrayRef) -> tempfile::NamedTempFile {
        let text = |v: &str| Arc::new(StringArray::from(vec![v])) as ArrayRef;
        let columns: Vec<(Column, ArrayRef)> = vec![
            (Column::CarModel, text("Swift")),
            (Column::Brand, text("Maruti")),
            (Column::ProducedYear, year),
            (Column::Transmission, text("Manual")),
            (Column::City, text("Pune")),
            (Column::KilometersDriven, Arc::new(Int64Array::from(vec![30_000]))),
            (Column::EngineCc, Arc::new(Float32Array::from(vec![1197.0]))),
            (Column::Mileage, Arc::new(Float64Array::from(vec![21.5]))),
            (Column::FuelType, text("Petrol")),
            (Column::OwnerCount, owners),
            (Column::SeatCount, Arc::new(Int64Array::from(vec![5]))),
            (Column::Price, Arc::new(Float64Array::from(vec![640_000.0]))),
        ];
        let schema = Arc::new(Schema::new(
            columns
                .iter()
                .map(|(c, a)| Field::new(c.header(), a.data_type().clone(), false))
                .collect::<Vec<_>>(),
        ));
        let batch =
            RecordBatch::try_new(schema.clone(), columns.into_iter().map(|(_, a)| a).collect())
                .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_parquet_with_mixed_widths() {
        let file = parquet_file(
            Arc::new(Int32Array::from(vec![2019])),
            Arc::new(Float64Array::from(vec![2.0])),
        );

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        let row = &ds.records[0];
        assert_eq!(row.produced_year, 2019);
        assert_eq!(row.kilometers_driven, 30_000.0);
        assert_eq!(row.engine_cc, 1197.0);
        assert_eq!(row.owner_count, 2);
        assert_eq!(row.seat_count, 5);
    }

    #[test]
    fn parquet_fractional_count_is_rejected() {
        let file = parquet_file(
            Arc::new(Int32Array::from(vec![2019])),
            Arc::new(Float64Array::from(vec![1.5])),
        );
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("No_of_Owners"));
    }

    #[test]
    fn csv_accepts_integral_floats_in_integer_columns() {
        let body = format!(
            "{HEADER}\nSwift,Maruti,2018.0,Manual,Pune,50000,1197,18.5,Petrol,1.0,5.0,550000\n"
        );
        let file = write_temp(".csv", &body);
        let ds = load_file(file.path()).unwrap();
        let row = &ds.records[0];
        assert_eq!(row.produced_year, 2018);
        assert_eq!(row.owner_count, 1);
        assert_eq!(row.seat_count, 5);
    }

    #[test]
    fn csv_fractional_year_is_rejected() {
        let body = format!(
            "{HEADER}\nSwift,Maruti,2018.9,Manual,Pune,50000,1197,18.5,Petrol,1,5,550000\n"
        );
        let file = write_temp(".csv", &body);
        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("not a whole number"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(load_file(file.path()).is_err());
    }
}
