use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// (country, continent, lifeExp 1952, gdpPercap 1952, pop 1952 in millions)
const COUNTRIES: &[(&str, &str, f64, f64, f64)] = &[
    ("Algeria", "Africa", 43.1, 2449.0, 9.3),
    ("Egypt", "Africa", 41.9, 1418.8, 22.2),
    ("Ethiopia", "Africa", 34.1, 362.1, 20.9),
    ("Kenya", "Africa", 42.3, 853.5, 6.5),
    ("Nigeria", "Africa", 36.3, 1077.3, 33.1),
    ("South Africa", "Africa", 45.0, 4725.3, 14.3),
    ("Argentina", "Americas", 62.5, 5911.3, 17.9),
    ("Brazil", "Americas", 50.9, 2108.9, 56.6),
    ("Canada", "Americas", 68.8, 11367.2, 14.8),
    ("Chile", "Americas", 54.7, 3940.0, 6.4),
    ("Mexico", "Americas", 50.8, 3478.1, 30.1),
    ("United States", "Americas", 68.4, 13990.5, 157.6),
    ("China", "Asia", 44.0, 400.4, 556.3),
    ("India", "Asia", 37.4, 546.6, 372.0),
    ("Indonesia", "Asia", 37.5, 749.7, 82.1),
    ("Japan", "Asia", 63.0, 3216.9, 86.5),
    ("Korea, Rep.", "Asia", 47.5, 1030.6, 20.9),
    ("Vietnam", "Asia", 40.4, 605.1, 26.2),
    ("France", "Europe", 67.4, 7029.8, 42.5),
    ("Germany", "Europe", 67.5, 7144.1, 69.1),
    ("Italy", "Europe", 65.9, 4931.4, 47.7),
    ("Norway", "Europe", 72.7, 10095.4, 3.3),
    ("Poland", "Europe", 61.3, 4029.3, 25.7),
    ("Spain", "Europe", 64.9, 3834.0, 28.5),
    ("Australia", "Oceania", 69.1, 10039.6, 8.7),
    ("New Zealand", "Oceania", 69.4, 10556.6, 1.99),
];

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + (hi - lo) * unit
    }
}

#[derive(Serialize)]
struct Row {
    country: String,
    continent: String,
    year: i32,
    #[serde(rename = "lifeExp")]
    life_exp: f64,
    pop: i64,
    #[serde(rename = "gdpPercap")]
    gdp_percap: f64,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    let mut rows = Vec::new();
    for &(country, continent, life0, gdp0, pop0) in COUNTRIES {
        let life_gain = rng.uniform(0.15, 0.55);
        let gdp_growth = rng.uniform(0.005, 0.045);
        let pop_growth = rng.uniform(0.003, 0.03);

        let mut life = life0;
        let mut gdp = gdp0;
        let mut pop = pop0 * 1e6;
        for year in (1952..=2007).step_by(5) {
            rows.push(Row {
                country: country.to_string(),
                continent: continent.to_string(),
                year,
                life_exp: (life * 1000.0).round() / 1000.0,
                pop: pop.round() as i64,
                gdp_percap: gdp,
            });
            // Life expectancy gains slow down as it approaches ~85.
            life += 5.0 * life_gain * (1.0 - life / 85.0).max(0.0) + rng.uniform(-0.3, 0.3);
            gdp *= (1.0 + gdp_growth + rng.uniform(-0.01, 0.01)).powi(5);
            pop *= (1.0 + pop_growth).powi(5);
        }
    }
    rows
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("country", DataType::Utf8, false),
        Field::new("continent", DataType::Utf8, false),
        Field::new("year", DataType::Int32, false),
        Field::new("lifeExp", DataType::Float64, false),
        Field::new("pop", DataType::Int64, false),
        Field::new("gdpPercap", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.country.as_str()))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.continent.as_str()))),
            Arc::new(Int32Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.life_exp))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.pop))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.gdp_percap))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    write_parquet(&rows, "sample_gapminder.parquet")?;
    write_csv(&rows, "sample_gapminder.csv")?;

    println!(
        "Wrote {} rows ({} countries × 12 years) to sample_gapminder.parquet and .csv",
        rows.len(),
        COUNTRIES.len()
    );
    Ok(())
}
