use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Continent, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a gapminder table from a file.  Dispatch by extension.
///
/// Every format carries the columns
/// `country, continent, year, lifeExp, pop, gdpPercap`; extra columns are
/// ignored. Rows are validated before the dataset is handed out.
///
/// Supported formats:
/// * `.parquet` – one column per field
/// * `.json`    – `[{ "country": "...", "continent": "...", ... }, ...]`
/// * `.csv`     – header row with the field names
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        "csv" => read_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    let dataset = Dataset::from_records(records)
        .with_context(|| format!("validating {}", path.display()))?;
    log::info!(
        "Loaded {} rows covering {} years from {}",
        dataset.len(),
        dataset.years().len(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
fn read_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    reader
        .deserialize::<Record>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Columns are looked up by name, so pandas and polars exports both work
/// regardless of column order.
fn read_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let country = column(&batch, "country")?;
        let continent = column(&batch, "continent")?;
        let year = column(&batch, "year")?;
        let life_exp = column(&batch, "lifeExp")?;
        let pop = column(&batch, "pop")?;
        let gdp_percap = column(&batch, "gdpPercap")?;

        for row in 0..batch.num_rows() {
            let read_row = || -> Result<Record> {
                let continent_name = string_at(continent, row)?;
                let population = int_at(pop, row)?;
                Ok(Record {
                    country: string_at(country, row)?,
                    continent: continent_name.parse::<Continent>()?,
                    year: i32::try_from(int_at(year, row)?).context("year out of range")?,
                    life_exp: float_at(life_exp, row)?,
                    pop: u64::try_from(population)
                        .with_context(|| format!("negative population {population}"))?,
                    gdp_percap: float_at(gdp_percap, row)?,
                })
            };
            let record = read_row().with_context(|| format!("Parquet row {}", records.len()))?;
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .with_context(|| format!("Parquet file missing '{name}' column"))
}

fn string_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => Ok(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row).to_string()),
        other => bail!("Expected Utf8 column, got {other:?}"),
    }
}

fn int_at(col: &ArrayRef, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => Ok(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Ok(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt64 => {
            i64::try_from(col.as_primitive::<UInt64Type>().value(row)).context("integer overflow")
        }
        other => bail!("Expected integer column, got {other:?}"),
    }
}

fn float_at(col: &ArrayRef, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in float column");
    }
    match col.data_type() {
        DataType::Float64 => Ok(col.as_primitive::<Float64Type>().value(row)),
        DataType::Float32 => Ok(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Int32 | DataType::Int64 => Ok(int_at(col, row)? as f64),
        other => bail!("Expected float column, got {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    fn temp_with_suffix(suffix: &str) -> Result<NamedTempFile> {
        Ok(Builder::new().suffix(suffix).tempfile()?)
    }

    #[test]
    fn test_load_csv_ignores_extra_columns() -> Result<()> {
        let mut file = temp_with_suffix(".csv")?;
        writeln!(file, "country,continent,year,lifeExp,pop,gdpPercap,iso_alpha,iso_num")?;
        writeln!(file, "Afghanistan,Asia,2007,43.828,31889923,974.5803384,AFG,4")?;
        writeln!(file, "Albania,Europe,2007,76.423,3600523,5937.029526,ALB,8")?;
        file.flush()?;

        let ds = load_file(file.path())?;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].country, "Afghanistan");
        assert_eq!(ds.records()[1].continent, Continent::Europe);
        assert_eq!(ds.records()[1].pop, 3_600_523);
        Ok(())
    }

    #[test]
    fn test_load_json_records() -> Result<()> {
        let mut file = temp_with_suffix(".json")?;
        writeln!(
            file,
            r#"[
            {{"country": "Chile", "continent": "Americas", "year": 1952, "lifeExp": 54.745, "pop": 6377619, "gdpPercap": 3939.978789}},
            {{"country": "Chile", "continent": "Americas", "year": 1957, "lifeExp": 56.074, "pop": 7048426, "gdpPercap": 4315.622723}}
        ]"#
        )?;
        file.flush()?;

        let ds = load_file(file.path())?;
        assert_eq!(ds.years().iter().copied().collect::<Vec<_>>(), vec![1952, 1957]);
        Ok(())
    }

    #[test]
    fn test_load_parquet_by_column_name() -> Result<()> {
        // Deliberately out of the usual column order.
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("pop", DataType::Int64, false),
            Field::new("country", DataType::Utf8, false),
            Field::new("continent", DataType::Utf8, false),
            Field::new("gdpPercap", DataType::Float64, false),
            Field::new("lifeExp", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![2007, 2007])),
                Arc::new(Int64Array::from(vec![20_434_176, 4_115_771])),
                Arc::new(StringArray::from(vec!["Australia", "New Zealand"])),
                Arc::new(StringArray::from(vec!["Oceania", "Oceania"])),
                Arc::new(Float64Array::from(vec![34_435.37, 25_185.01])),
                Arc::new(Float64Array::from(vec![81.235, 80.204])),
            ],
        )?;

        let file = temp_with_suffix(".parquet")?;
        let mut writer = ArrowWriter::try_new(std::fs::File::create(file.path())?, schema, None)?;
        writer.write(&batch)?;
        writer.close()?;

        let ds = load_file(file.path())?;
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].country, "New Zealand");
        assert_eq!(ds.records()[0].pop, 20_434_176);
        assert_eq!(ds.continents().len(), 1);
        Ok(())
    }

    #[test]
    fn test_invalid_row_is_rejected_at_load() -> Result<()> {
        let mut file = temp_with_suffix(".csv")?;
        writeln!(file, "country,continent,year,lifeExp,pop,gdpPercap")?;
        writeln!(file, "Chile,Americas,2007,78.5,16284741,-1.0")?;
        file.flush()?;

        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("GDP per capita"));
        Ok(())
    }

    #[test]
    fn test_non_numeric_population_is_rejected() -> Result<()> {
        let mut file = temp_with_suffix(".csv")?;
        writeln!(file, "country,continent,year,lifeExp,pop,gdpPercap")?;
        writeln!(file, "Chile,Americas,2007,78.5,lots,13171.6")?;
        file.flush()?;

        let err = load_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 0"));
        Ok(())
    }

    #[test]
    fn test_unsupported_extension() -> Result<()> {
        let file = temp_with_suffix(".xlsx")?;
        let err = load_file(file.path()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
        Ok(())
    }
}
