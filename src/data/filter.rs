use std::collections::BTreeSet;

use super::model::{CITY_STATE, STATE, Table, YEAR};

// ---------------------------------------------------------------------------
// Filter selection: which values are selected per dimension
// ---------------------------------------------------------------------------

/// Current selections of the three filter controls.
///
/// Each set is tri-state: an empty set means "no filter" (show all), a
/// non-empty set keeps only rows whose value is a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Composite `"City - UF"` values, matched against `City_State`.
    pub cities: BTreeSet<String>,
    /// State codes, matched against the derived `State`.
    pub states: BTreeSet<String>,
    pub years: BTreeSet<i64>,
}

impl FilterState {
    /// Whether no dimension constrains the rows.
    pub fn is_unconstrained(&self) -> bool {
        self.cities.is_empty() && self.states.is_empty() && self.years.is_empty()
    }
}

/// Return indices of rows that pass all active filters.
///
/// A row passes a dimension when:
/// * The selection for that dimension is empty → passes (no constraint)
/// * The table lacks the column → fails
/// * The row's value for that column is in the selected set → passes
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    let city_idx = table.column_index(CITY_STATE);
    let state_idx = table.column_index(STATE);
    let year_idx = table.column_index(YEAR);

    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            if !filters.cities.is_empty() {
                let hit = city_idx
                    .and_then(|i| row[i].as_str())
                    .is_some_and(|c| filters.cities.contains(c));
                if !hit {
                    return false;
                }
            }
            if !filters.states.is_empty() {
                let hit = state_idx
                    .and_then(|i| row[i].as_str())
                    .is_some_and(|s| filters.states.contains(s));
                if !hit {
                    return false;
                }
            }
            if !filters.years.is_empty() {
                let hit = year_idx
                    .and_then(|i| row[i].as_i64())
                    .is_some_and(|y| filters.years.contains(&y));
                if !hit {
                    return false;
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}

/// New table holding the rows that pass `filters`; the input is untouched.
pub fn filter_table(table: &Table, filters: &FilterState) -> Table {
    if filters.is_unconstrained() {
        return table.clone();
    }
    table.select_rows(&filtered_indices(table, filters))
}
