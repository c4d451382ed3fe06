//! End-to-end assembly over indicator files written to a temp directory.

use std::path::Path;

use tempfile::TempDir;
use worldbank_dashboard::figures::{self, AxisScale, BarMode};
use worldbank_dashboard::{
    DashboardConfig, DataError, DatasetLoader, FigureAssembler, TraceSpec, DEFAULT_COUNTRIES,
    FIGURE_COUNT,
};

const PREAMBLE: &str = "\"Data Source\",\"World Development Indicators\",\n\n\"Last Updated Date\",\"2019-06-28\",\n\n";

/// Source order differs from the allow-list order on purpose.
const SOURCE_ORDER: [&str; 11] = [
    "Brazil",
    "Canada",
    "China",
    "France",
    "Germany",
    "India",
    "Italy",
    "Japan",
    "Mexico",
    "United Kingdom",
    "United States",
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn rural(i: usize, year: i32) -> f64 {
    (i as f64 + 1.0) * 1000.0 + f64::from(year - 1990)
}

fn forest(i: usize, year: i32) -> f64 {
    (i as f64 + 1.0) * 10.0 + f64::from(year - 1990) * 0.5
}

fn write_indicator(
    dir: &Path,
    file_name: &str,
    countries: &[&str],
    years: std::ops::RangeInclusive<i32>,
    value: impl Fn(usize, i32) -> f64,
) {
    let mut text = String::from(PREAMBLE);
    text.push_str("\"Country Name\",\"Country Code\"");
    for year in years.clone() {
        text.push_str(&format!(",\"{year}\""));
    }
    text.push_str(",\n");
    for country in countries {
        let i = SOURCE_ORDER.iter().position(|c| c == country).unwrap();
        text.push_str(&format!("\"{country}\",\"X{i}\""));
        for year in years.clone() {
            text.push_str(&format!(",\"{}\"", value(i, year)));
        }
        text.push_str(",\n");
    }
    std::fs::write(dir.join(file_name), text).unwrap();
}

fn write_all(dir: &Path) -> DashboardConfig {
    let config = DashboardConfig::for_data_dir(dir).unwrap();
    let files = &config.datasets;
    write_indicator(dir, &files.arable_land, &SOURCE_ORDER, 1960..=2019, |i, y| {
        0.1 * (i as f64 + 1.0) - 0.001 * f64::from(y - 1960)
    });
    write_indicator(dir, &files.rural_percent, &SOURCE_ORDER, 1960..=2019, |i, y| {
        80.0 - i as f64 - 0.1 * f64::from(y - 1960)
    });
    write_indicator(dir, &files.rural_total, &SOURCE_ORDER, 1960..=2019, rural);
    write_indicator(dir, &files.forest_area, &SOURCE_ORDER, 1960..=2019, forest);
    config
}

#[test]
fn test_assembles_five_charts_in_fixed_order() {
    init_logging();
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());

    let charts = FigureAssembler::new(config).assemble().unwrap();
    assert_eq!(charts.len(), FIGURE_COUNT);

    // 1. arable land lines
    assert!(charts[0].title().starts_with("Change in Hectares Arable Land"));
    assert_eq!(charts[0].traces.len(), DEFAULT_COUNTRIES.len());
    assert!(charts[0]
        .traces
        .iter()
        .all(|t| matches!(t, TraceSpec::Line { x, .. } if x == &vec![1990, 2015])));
    assert_eq!(charts[0].layout.x_axis.tick0, Some(1990.0));

    // 2. grouped bars 1990 vs 2015
    assert_eq!(charts[1].title(), "Hectares Arable Land per Person");
    assert_eq!(charts[1].layout.barmode, Some(BarMode::Group));
    let names: Vec<&str> = charts[1].traces.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["1990", "2015"]);
    assert!(charts[1].traces.iter().all(|t| t.len() == 10));

    // 3. rural percent lines
    assert!(charts[2].title().starts_with("Change in Rural Population"));
    assert_eq!(charts[2].traces.len(), 10);

    // 4. log-log scatter
    assert_eq!(charts[3].title(), "Rural Population vs Forested Area");
    assert_eq!(charts[3].layout.x_axis.scale, Some(AxisScale::Log));
    assert_eq!(charts[3].layout.y_axis.scale, Some(AxisScale::Log));
    assert_eq!(charts[3].traces.len(), 10);
    assert!(charts[3]
        .traces
        .iter()
        .all(|t| matches!(t, TraceSpec::Markers { x, y, .. } if x.len() == 26 && y.len() == 26)));

    // 5. 2015 rural population bars
    assert_eq!(charts[4].title(), "Total Rural Population by Country");
    assert_eq!(charts[4].traces.len(), 1);
    assert_eq!(charts[4].traces[0].name(), "2015");
}

#[test]
fn test_charts_never_include_other_countries() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());

    let charts = FigureAssembler::new(config).assemble().unwrap();
    for chart in &charts {
        for trace in &chart.traces {
            assert_ne!(trace.name(), "Mexico");
            if let TraceSpec::Bar { x, .. } = trace {
                assert!(!x.iter().any(|c| c == "Mexico"));
            }
        }
    }
}

#[test]
fn test_scatter_pairs_by_country_when_sources_disagree_on_order() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());

    let mut reversed = SOURCE_ORDER;
    reversed.reverse();
    write_indicator(dir.path(), &config.datasets.forest_area, &reversed, 1960..=2019, forest);

    let charts = FigureAssembler::new(config).assemble().unwrap();
    let india = SOURCE_ORDER.iter().position(|c| *c == "India").unwrap();
    let trace = charts[3]
        .traces
        .iter()
        .find(|t| t.name() == "India")
        .unwrap();

    match trace {
        TraceSpec::Markers { x, y, .. } => {
            assert_eq!(x[0], Some(rural(india, 1990)));
            assert_eq!(y[0], Some(forest(india, 1990)));
            assert_eq!(x[25], Some(rural(india, 2015)));
            assert_eq!(y[25], Some(forest(india, 2015)));
        }
        other => panic!("expected markers, got {other:?}"),
    }

    // Scatter traces follow the rural population file's order.
    let names: Vec<&str> = charts[3].traces.iter().map(|t| t.name()).collect();
    assert_eq!(names.first(), Some(&"Brazil"));
}

#[test]
fn test_missing_file_abandons_assembly() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());
    std::fs::remove_file(config.dataset_path(&config.datasets.rural_percent)).unwrap();

    let err = FigureAssembler::new(config).assemble().unwrap_err();
    assert!(matches!(err, DataError::MissingFile { .. }));
}

#[test]
fn test_missing_year_column_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());
    write_indicator(dir.path(), &config.datasets.forest_area, &SOURCE_ORDER, 2000..=2019, forest);

    let err = FigureAssembler::new(config).assemble().unwrap_err();
    assert!(matches!(err, DataError::Schema { ref column, .. } if column == "1990"));
}

#[test]
fn test_country_absent_from_source() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());
    let without_india: Vec<&str> = SOURCE_ORDER.iter().copied().filter(|c| *c != "India").collect();
    write_indicator(dir.path(), &config.datasets.forest_area, &without_india, 1960..=2019, forest);

    // Loading alone is fine: the row is just not there.
    let table = DatasetLoader::default()
        .load(
            &config.dataset_path(&config.datasets.forest_area),
            &["Country Name", "1990", "2015"],
        )
        .unwrap();
    assert_eq!(table.len(), 9);
    assert!(table.row("India").is_none());

    // Reshaping for the scatter needs every country.
    let err = FigureAssembler::new(config).assemble().unwrap_err();
    assert!(matches!(err, DataError::MissingCountry { ref country, .. } if country == "India"));
}

#[test]
fn test_json_export_holds_every_chart() {
    let dir = TempDir::new().unwrap();
    let config = write_all(dir.path());
    let charts = FigureAssembler::new(config).assemble().unwrap();

    let json = figures::to_json(&charts).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let figures = value.as_array().unwrap();
    assert_eq!(figures.len(), FIGURE_COUNT);
    assert_eq!(figures[0]["data"][0]["mode"], "lines");
    assert_eq!(figures[1]["data"][0]["type"], "bar");
    assert_eq!(figures[3]["layout"]["yaxis"]["type"], "log");
    assert_eq!(figures[4]["layout"]["yaxis"]["title"], "Rural Population");
}
