use std::collections::HashSet;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::filter::CountryAllowList;
use super::model::{CountryRow, FilteredTable, COUNTRY_NAME_COLUMN};
use crate::error::{DataError, Result};

/// Metadata lines World Bank exports carry above their header row.
pub const DEFAULT_SKIP_ROWS: usize = 4;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Reads indicator files and keeps only the allow-listed countries.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    allowed: CountryAllowList,
    skip_rows: usize,
}

impl DatasetLoader {
    /// Loader for World Bank layout: four preamble lines, then the header.
    pub fn new(allowed: CountryAllowList) -> Self {
        DatasetLoader {
            allowed,
            skip_rows: DEFAULT_SKIP_ROWS,
        }
    }

    /// Override how many leading lines are discarded before the header.
    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    pub fn allowed(&self) -> &CountryAllowList {
        &self.allowed
    }

    /// Load `path`, keeping `keep_columns` (which must name the country
    /// column) and the rows of allow-listed countries.
    ///
    /// Year-labelled columns are read as numbers, any other kept column as
    /// text. Allow-listed countries that the file lacks are simply absent
    /// from the result; a country repeated in the file keeps its first row.
    pub fn load<S: AsRef<str>>(&self, path: &Path, keep_columns: &[S]) -> Result<FilteredTable> {
        let file = std::fs::File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => DataError::Io {
                path: path.to_path_buf(),
                source: e,
            },
        })?;

        let dataset = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.load_reader(&dataset, file, keep_columns)
    }

    /// Same as [`load`](Self::load) for an already-open source.
    pub fn load_reader<R: Read, S: AsRef<str>>(
        &self,
        dataset: &str,
        reader: R,
        keep_columns: &[S],
    ) -> Result<FilteredTable> {
        let mut buffered = BufReader::new(reader);
        skip_lines(&mut buffered, self.skip_rows).map_err(|e| DataError::Io {
            path: dataset.into(),
            source: e,
        })?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(buffered);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();

        let schema_error = |column: &str| DataError::Schema {
            column: column.to_string(),
            dataset: dataset.to_string(),
        };
        let header_index = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| schema_error(column))
        };

        if !keep_columns.iter().any(|c| c.as_ref() == COUNTRY_NAME_COLUMN) {
            return Err(schema_error(COUNTRY_NAME_COLUMN));
        }
        let country_idx = header_index(COUNTRY_NAME_COLUMN)?;

        // (source position, name) of every kept column, split into year
        // columns (numeric) and descriptive ones such as "Country Code"
        let mut value_cols: Vec<(usize, String)> = Vec::new();
        let mut label_cols: Vec<(usize, String)> = Vec::new();
        for column in keep_columns {
            let column: &str = column.as_ref();
            let seen = value_cols.iter().chain(&label_cols).any(|(_, c)| c == column);
            if column == COUNTRY_NAME_COLUMN || seen {
                continue;
            }
            let entry = (header_index(column)?, column.to_string());
            if is_year_label(column) {
                value_cols.push(entry);
            } else {
                label_cols.push(entry);
            }
        }

        let mut rows = Vec::new();
        let mut kept = HashSet::new();
        let mut total = 0usize;

        for result in csv_reader.records() {
            let record = result?;
            total += 1;

            let country = record.get(country_idx).unwrap_or("");
            if !self.allowed.allows(country) {
                continue;
            }
            let line = record.position().map_or(0, |p| p.line()) + self.skip_rows as u64;
            if !kept.insert(country.to_string()) {
                log::warn!("{dataset}, line {line}: repeated row for '{country}' dropped");
                continue;
            }

            let values = value_cols
                .iter()
                .map(|(idx, column)| {
                    parse_cell(record.get(*idx).unwrap_or(""), || DataError::InvalidValue {
                        dataset: dataset.to_string(),
                        line,
                        column: column.clone(),
                        value: record.get(*idx).unwrap_or("").to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            let labels = label_cols
                .iter()
                .map(|(idx, _)| record.get(*idx).unwrap_or("").trim().to_string())
                .collect();

            rows.push(CountryRow {
                country: country.to_string(),
                values,
                labels,
            });
        }

        log::debug!(
            "{dataset}: kept {} of {total} rows, {} value columns",
            rows.len(),
            value_cols.len()
        );

        Ok(FilteredTable::new(
            dataset,
            value_cols.into_iter().map(|(_, c)| c).collect(),
            rows,
            self.allowed.clone(),
        )
        .with_label_columns(label_cols.into_iter().map(|(_, c)| c).collect()))
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        DatasetLoader::new(CountryAllowList::default())
    }
}

// -- helpers --

/// Consume `n` physical lines. Stops quietly at end of input.
fn skip_lines<R: BufRead>(reader: &mut R, n: usize) -> std::io::Result<()> {
    let mut discard = Vec::new();
    for _ in 0..n {
        discard.clear();
        if reader.read_until(b'\n', &mut discard)? == 0 {
            break;
        }
    }
    Ok(())
}

/// Year columns are the ones whose header is an integer, e.g. `"1990"`.
fn is_year_label(column: &str) -> bool {
    column.trim().parse::<i32>().is_ok()
}

/// Empty cells are missing values; anything else must be a number.
fn parse_cell(raw: &str, invalid: impl FnOnce() -> DataError) -> Result<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}\"Data Source\",\"World Development Indicators\",\n\
\n\
\"Last Updated Date\",\"2019-06-28\",\n\
\n\
\"Country Name\",\"Country Code\",\"1990\",\"2000\",\"2015\",\n\
\"Brazil\",\"BRA\",\"0.9\",\"0.7\",\"0.4\",\n\
\"Mexico\",\"MEX\",\"1.1\",\"1.0\",\"0.8\",\n\
\"China\",\"CHN\",\"0.5\",\"\",\"0.3\",\n\
\"World\",\"WLD\",\"0.2\",\"0.2\",\"0.2\",\n";

    fn load(keep: &[&str]) -> Result<FilteredTable> {
        DatasetLoader::default().load_reader("sample.csv", SAMPLE.as_bytes(), keep)
    }

    #[test]
    fn test_filters_to_allow_list_in_source_order() {
        let table = load(&["Country Name", "1990", "2015"]).unwrap();
        assert_eq!(table.countries(), vec!["Brazil", "China"]);
        assert_eq!(table.value_columns, vec!["1990", "2015"]);
        assert_eq!(table.rows[0].values, vec![Some(0.9), Some(0.4)]);
        assert_eq!(table.rows[1].values, vec![Some(0.5), Some(0.3)]);
    }

    #[test]
    fn test_one_row_per_present_country() {
        let table = load(&["Country Name", "2015"]).unwrap();
        for country in table.countries() {
            assert!(table.allowed.allows(country));
            assert_eq!(table.rows.iter().filter(|r| r.country == country).count(), 1);
        }
        // Eight allow-listed countries are absent from the file: no error.
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_empty_cell_is_missing_value() {
        let table = load(&["Country Name", "2000"]).unwrap();
        assert_eq!(table.value("China", "2000"), None);
        assert_eq!(table.value("Brazil", "2000"), Some(0.7));
    }

    #[test]
    fn test_unknown_column_is_schema_error() {
        let err = load(&["Country Name", "1990", "1975"]).unwrap_err();
        assert!(matches!(err, DataError::Schema { ref column, .. } if column == "1975"));
    }

    #[test]
    fn test_keep_columns_must_name_country_column() {
        let err = load(&["1990", "2015"]).unwrap_err();
        assert!(matches!(err, DataError::Schema { ref column, .. } if column == COUNTRY_NAME_COLUMN));
    }

    #[test]
    fn test_wrong_skip_rows_loses_header() {
        let loader = DatasetLoader::default().with_skip_rows(2);
        let err = loader
            .load_reader("sample.csv", SAMPLE.as_bytes(), &["Country Name", "1990"])
            .unwrap_err();
        assert!(matches!(err, DataError::Schema { .. }));
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let data = "Country Name,1990\nChina,abc\n";
        let err = DatasetLoader::default()
            .with_skip_rows(0)
            .load_reader("bad.csv", data.as_bytes(), &["Country Name", "1990"])
            .unwrap_err();
        match err {
            DataError::InvalidValue { line, column, value, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "1990");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");
        let err = DatasetLoader::default()
            .load(&path, &["Country Name", "1990"])
            .unwrap_err();
        assert!(matches!(err, DataError::MissingFile { .. }));
    }

    #[test]
    fn test_load_from_disk_uses_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("API_TEST.csv");
        std::fs::write(&path, SAMPLE).unwrap();
        let table = DatasetLoader::default()
            .load(&path, &["Country Name", "2015"])
            .unwrap();
        assert_eq!(table.dataset, "API_TEST.csv");
        assert_eq!(table.column("2015"), Some(vec![Some(0.4), Some(0.3)]));
    }

    #[test]
    fn test_text_column_is_kept_as_label() {
        let data = "Country Name,Country Code,1990\nChina,CHN,0.5\n";
        let table = DatasetLoader::default()
            .with_skip_rows(0)
            .load_reader("p.csv", data.as_bytes(), &["Country Name", "Country Code", "1990"])
            .unwrap();
        assert_eq!(table.value_columns, vec!["1990"]);
        assert_eq!(table.label_columns, vec!["Country Code"]);
        assert_eq!(table.label("China", "Country Code"), Some("CHN"));
        assert_eq!(table.value("China", "1990"), Some(0.5));
    }

    #[test]
    fn test_world_bank_sample_with_country_code() {
        let table = load(&["Country Name", "Country Code", "2015"]).unwrap();
        assert_eq!(table.label("Brazil", "Country Code"), Some("BRA"));
        assert_eq!(table.column("2015"), Some(vec![Some(0.4), Some(0.3)]));
    }

    #[test]
    fn test_repeated_country_keeps_first_row() {
        let data = "Country Name,1990\nChina,0.5\nBrazil,0.9\nChina,7.0\n";
        let table = DatasetLoader::default()
            .with_skip_rows(0)
            .load_reader("dup.csv", data.as_bytes(), &["Country Name", "1990"])
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.countries(), vec!["China", "Brazil"]);
        assert_eq!(table.value("China", "1990"), Some(0.5));
    }
}
