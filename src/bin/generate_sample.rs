use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use worldbank_dashboard::DatasetFiles;

/// World Bank preamble: four lines above the header.
const PREAMBLE: &str = "\u{feff}\"Data Source\",\"World Development Indicators\",\n\n\"Last Updated Date\",\"2019-06-28\",\n\n";

const FIRST_YEAR: i32 = 1960;
const LAST_YEAR: i32 = 2019;

/// (name, code, arable ha/person, rural %, rural people, forest km²) in 1960.
const COUNTRIES: &[(&str, &str, f64, f64, f64, f64)] = &[
    ("Brazil", "BRA", 0.30, 54.0, 39.0e6, 5.9e6),
    ("Canada", "CAN", 2.20, 30.0, 5.3e6, 3.5e6),
    ("China", "CHN", 0.15, 84.0, 560.0e6, 1.6e6),
    ("France", "FRA", 0.42, 38.0, 17.5e6, 0.14e6),
    ("Germany", "DEU", 0.16, 29.0, 21.3e6, 0.11e6),
    ("India", "IND", 0.35, 82.0, 370.0e6, 0.64e6),
    ("Italy", "ITA", 0.25, 41.0, 20.4e6, 0.07e6),
    ("Japan", "JPN", 0.06, 37.0, 34.5e6, 0.25e6),
    ("Mexico", "MEX", 0.60, 49.0, 18.5e6, 0.70e6),
    ("United Kingdom", "GBR", 0.14, 22.0, 11.5e6, 0.03e6),
    ("United States", "USA", 1.00, 30.0, 54.0e6, 3.0e6),
    ("World", "WLD", 0.38, 66.0, 2.0e9, 42.0e6),
];

/// Fixed-seed noise source (splitmix64), so reruns write identical files.
struct Noise(u64);

impl Noise {
    /// Uniform in `[-1, 1)`.
    fn jitter(&mut self) -> f64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        (z >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

/// An indicator export: which column of `COUNTRIES` seeds it and how it drifts.
struct Indicator<'a> {
    file_name: &'a str,
    name: &'a str,
    code: &'a str,
    base: fn(&(&str, &str, f64, f64, f64, f64)) -> f64,
    yearly_growth: f64,
}

fn write_indicator(dir: &Path, indicator: &Indicator, noise: &mut Noise) -> Result<PathBuf> {
    let path = dir.join(indicator.file_name);
    let mut file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;

    file.write_all(PREAMBLE.as_bytes())?;

    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(file);

    let mut header = vec![
        "Country Name".to_string(),
        "Country Code".to_string(),
        "Indicator Name".to_string(),
        "Indicator Code".to_string(),
    ];
    header.extend((FIRST_YEAR..=LAST_YEAR).map(|y| y.to_string()));
    header.push(String::new());
    writer.write_record(&header)?;

    for country in COUNTRIES {
        let (name, code, ..) = *country;
        let base = (indicator.base)(country);
        let mut record = vec![
            name.to_string(),
            code.to_string(),
            indicator.name.to_string(),
            indicator.code.to_string(),
        ];
        for year in FIRST_YEAR..=LAST_YEAR {
            // Aggregates only start reporting in 1970.
            if code == "WLD" && year < 1970 {
                record.push(String::new());
                continue;
            }
            let trend = (1.0 + indicator.yearly_growth).powi(year - FIRST_YEAR);
            let value = base * trend * (1.0 + 0.02 * noise.jitter());
            record.push(format!("{value:.6}"));
        }
        record.push(String::new());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(path)
}

fn main() -> Result<()> {
    env_logger::init();

    let dir = PathBuf::from(std::env::args().nth(1).unwrap_or_else(|| "data".to_string()));
    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let files = DatasetFiles::default();
    let indicators = [
        Indicator {
            file_name: &files.arable_land,
            name: "Arable land (hectares per person)",
            code: "AG.LND.ARBL.HA.PC",
            base: |c| c.2,
            yearly_growth: -0.012,
        },
        Indicator {
            file_name: &files.rural_percent,
            name: "Rural population (% of total population)",
            code: "SP.RUR.TOTL.ZS",
            base: |c| c.3,
            yearly_growth: -0.009,
        },
        Indicator {
            file_name: &files.rural_total,
            name: "Rural population",
            code: "SP.RUR.TOTL",
            base: |c| c.4,
            yearly_growth: 0.006,
        },
        Indicator {
            file_name: &files.forest_area,
            name: "Forest area (sq. km)",
            code: "AG.LND.FRST.K2",
            base: |c| c.5,
            yearly_growth: -0.002,
        },
    ];

    let mut noise = Noise(42);
    for indicator in &indicators {
        let path = write_indicator(&dir, indicator, &mut noise)?;
        log::info!("Wrote {}", path.display());
        println!("Wrote {}", path.display());
    }

    Ok(())
}
