//! Cross-pairing two metrics per country for correlation scatters.

use indexmap::IndexMap;

use super::model::{CountrySeries, SeriesPair};

/// Pair `first` and `second` by country name.
///
/// The result follows the country order of `first`. A country is left out
/// when the other side has no series for it or when the two series cover
/// different years.
pub fn pair(first: &[CountrySeries], second: &[CountrySeries]) -> IndexMap<String, SeriesPair> {
    let by_country: IndexMap<&str, &CountrySeries> = second
        .iter()
        .map(|s| (s.country.as_str(), s))
        .rev() // first occurrence wins on duplicates
        .collect();

    let mut pairs = IndexMap::with_capacity(first.len());
    for a in first {
        if pairs.contains_key(&a.country) {
            continue;
        }
        let Some(b) = by_country.get(a.country.as_str()) else {
            log::warn!("no second series for '{}', skipping pair", a.country);
            continue;
        };
        if a.years != b.years {
            log::warn!("year axes differ for '{}', skipping pair", a.country);
            continue;
        }
        pairs.insert(
            a.country.clone(),
            SeriesPair {
                first: a.values.clone(),
                second: b.values.clone(),
            },
        );
    }

    for b in second {
        if !first.iter().any(|a| a.country == b.country) {
            log::warn!("no first series for '{}', skipping pair", b.country);
        }
    }

    pairs
}
