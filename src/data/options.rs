use std::collections::{BTreeSet, HashSet};

use super::model::{CITY_STATE, STATE, Table, Value, YEAR};

/// Distinct values of `column` in order of first appearance.
///
/// A missing column is logged and yields no options.
pub fn list_options(table: &Table, column: &str) -> Vec<Value> {
    let Some(cells) = table.column(column) else {
        log::warn!("Column '{column}' does not exist in the dataset");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    cells.filter(|v| seen.insert(*v)).cloned().collect()
}

/// Candidate values for each filter control.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub cities: Vec<String>,
    pub states: Vec<String>,
    pub years: Vec<i64>,
}

impl FilterOptions {
    pub fn from_table(table: &Table) -> Self {
        let strings = |col: &str| -> Vec<String> {
            list_options(table, col)
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        };
        FilterOptions {
            cities: strings(CITY_STATE),
            states: strings(STATE),
            years: list_options(table, YEAR)
                .iter()
                .filter_map(Value::as_i64)
                .collect(),
        }
    }

    /// Default city selection: the configured cities that exist as options.
    pub fn default_cities(&self, wanted: &[String]) -> BTreeSet<String> {
        wanted
            .iter()
            .filter(|c| {
                let present = self.cities.contains(c);
                if !present {
                    log::warn!("Default city '{c}' is not in the dataset, skipping it");
                }
                present
            })
            .cloned()
            .collect()
    }

    /// Default year selection: every year.
    pub fn default_years(&self) -> BTreeSet<i64> {
        self.years.iter().copied().collect()
    }
}
