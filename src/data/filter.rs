use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Country allow-list
// ---------------------------------------------------------------------------

/// The ten economies every dashboard chart is restricted to.
pub const DEFAULT_COUNTRIES: [&str; 10] = [
    "United States",
    "China",
    "Japan",
    "Germany",
    "United Kingdom",
    "India",
    "France",
    "Brazil",
    "Italy",
    "Canada",
];

/// Set of country names a loader keeps. Everything else is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryAllowList {
    names: BTreeSet<String>,
}

impl CountryAllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CountryAllowList {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether a row for `country` passes the filter.
    pub fn allows(&self, country: &str) -> bool {
        self.names.contains(country)
    }

    /// Allowed names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for CountryAllowList {
    fn default() -> Self {
        CountryAllowList::new(DEFAULT_COUNTRIES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_ten_countries() {
        let allowed = CountryAllowList::default();
        assert_eq!(allowed.len(), 10);
        assert!(allowed.allows("United Kingdom"));
        assert!(allowed.allows("Canada"));
        assert!(!allowed.allows("Mexico"));
        assert!(!allowed.allows("World"));
    }

    #[test]
    fn test_match_is_exact() {
        let allowed = CountryAllowList::new(["China"]);
        assert!(!allowed.allows("china"));
        assert!(!allowed.allows("China "));
    }
}
