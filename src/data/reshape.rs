//! Wide → long and wide → per-country reshaping.

use super::model::{CountrySeries, FilteredTable, TidyRecord};
use crate::error::{DataError, Result};

/// Unpivot `value_columns` into one record per (row, column), row-major.
pub fn melt<S: AsRef<str>>(table: &FilteredTable, value_columns: &[S]) -> Result<Vec<TidyRecord>> {
    let indices = table.column_indices(value_columns)?;

    let mut records = Vec::with_capacity(table.len() * indices.len());
    for row in &table.rows {
        for (&idx, column) in indices.iter().zip(value_columns) {
            records.push(TidyRecord {
                country: row.country.clone(),
                variable: column.as_ref().to_string(),
                value: row.value(idx),
            });
        }
    }
    Ok(records)
}

/// One [`CountrySeries`] per country, in first-seen order, over `year_labels`.
///
/// Every country of the table's allow-list must have a row; a table that
/// lost one during filtering is rejected with [`DataError::MissingCountry`].
/// Duplicate rows for a country resolve to the first one.
pub fn to_country_series<S: AsRef<str>>(
    table: &FilteredTable,
    year_labels: &[S],
) -> Result<Vec<CountrySeries>> {
    let years = year_labels
        .iter()
        .map(|label| {
            let label = label.as_ref();
            label
                .trim()
                .parse::<i32>()
                .map_err(|_| DataError::InvalidYearLabel(label.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;
    let indices = table.column_indices(year_labels)?;

    if let Some(missing) = table.allowed.iter().find(|c| table.row(c).is_none()) {
        return Err(DataError::MissingCountry {
            country: missing.to_string(),
            dataset: table.dataset.clone(),
        });
    }

    let series = table
        .countries()
        .into_iter()
        .filter_map(|country| {
            let mut matches = table.rows.iter().filter(|r| r.country == country);
            let row = matches.next()?;
            if matches.next().is_some() {
                log::warn!(
                    "{}: several rows for '{country}', using the first",
                    table.dataset
                );
            }
            Some(CountrySeries {
                country: country.to_string(),
                years: years.clone(),
                values: indices.iter().map(|&i| row.value(i)).collect(),
            })
        })
        .collect();

    Ok(series)
}

/// Year labels `"start"..="end"` as strings, the way indicator headers spell them.
pub fn year_range(start: i32, end: i32) -> Vec<String> {
    (start..=end).map(|y| y.to_string()).collect()
}
