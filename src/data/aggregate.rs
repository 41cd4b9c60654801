use std::collections::HashMap;

use super::model::{CITY, FOB, NET_WEIGHT, SH2, SH4, STATE, Table, Value, YEAR};
use crate::error::AggregateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// Generic group-by / sum
// ---------------------------------------------------------------------------

/// Group `table` by `group_keys` and sum each of `measures` per group.
///
/// The result has the key columns followed by the measure columns, one row
/// per distinct key combination in order of first appearance.  Sums are
/// `f64`, accumulated in row order; null measure cells are skipped.  A null
/// key is a group of its own, so no measure value is ever dropped.
pub fn aggregate(
    table: &Table,
    group_keys: &[&str],
    measures: &[&str],
) -> Result<Table, AggregateError> {
    let key_idx = resolve(table, group_keys)?;
    let measure_idx = resolve(table, measures)?;

    let mut slots: HashMap<Vec<Value>, usize> = HashMap::new();
    let mut groups: Vec<(Vec<Value>, Vec<f64>)> = Vec::new();

    for (row_no, row) in table.rows().iter().enumerate() {
        let key: Vec<Value> = key_idx.iter().map(|&i| row[i].clone()).collect();
        let slot = match slots.get(&key) {
            Some(&slot) => slot,
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![0.0; measure_idx.len()]));
                groups.len() - 1
            }
        };

        for (m, &i) in measure_idx.iter().enumerate() {
            match &row[i] {
                Value::Null => {}
                cell => {
                    let v = cell.as_f64().ok_or_else(|| AggregateError::NonNumericMeasure {
                        column: measures[m].to_string(),
                        row: row_no,
                    })?;
                    groups[slot].1[m] += v;
                }
            }
        }
    }

    let columns = group_keys
        .iter()
        .chain(measures.iter())
        .map(|c| c.to_string())
        .collect();
    let rows = groups
        .into_iter()
        .map(|(mut key, sums)| {
            key.extend(sums.into_iter().map(Value::Float));
            key
        })
        .collect();

    Ok(Table::new(columns, rows))
}

fn resolve(table: &Table, names: &[&str]) -> Result<Vec<usize>, AggregateError> {
    names
        .iter()
        .map(|n| {
            table
                .column_index(n)
                .ok_or_else(|| AggregateError::MissingColumn(n.to_string()))
        })
        .collect()
}

/// Stable sort by one column; ties keep their current relative order.
pub fn sort_by(table: &Table, column: &str, order: SortOrder) -> Result<Table, AggregateError> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| AggregateError::MissingColumn(column.to_string()))?;

    let (columns, mut rows) = table.clone().into_parts();
    match order {
        SortOrder::Ascending => rows.sort_by(|a, b| a[idx].cmp(&b[idx])),
        SortOrder::Descending => rows.sort_by(|a, b| b[idx].cmp(&a[idx])),
    }
    Ok(Table::new(columns, rows))
}

// ---------------------------------------------------------------------------
// Dashboard aggregations
// ---------------------------------------------------------------------------

/// FOB per year, in year order (chart x-axis).
pub fn fob_by_year(table: &Table) -> Result<Table, AggregateError> {
    sort_by(&aggregate(table, &[YEAR], &[FOB])?, YEAR, SortOrder::Ascending)
}

/// FOB per state, largest first.
pub fn fob_by_state(table: &Table) -> Result<Table, AggregateError> {
    sort_by(&aggregate(table, &[STATE], &[FOB])?, FOB, SortOrder::Descending)
}

/// FOB per city, largest first.
pub fn fob_by_city(table: &Table) -> Result<Table, AggregateError> {
    sort_by(&aggregate(table, &[CITY], &[FOB])?, FOB, SortOrder::Descending)
}

/// FOB per (city, SH2 description), largest first.  Heat-map input.
pub fn fob_by_city_and_sh2(table: &Table) -> Result<Table, AggregateError> {
    sort_by(&aggregate(table, &[CITY, SH2], &[FOB])?, FOB, SortOrder::Descending)
}

/// FOB and net weight per (city, state, SH4 description).  Scatter input.
pub fn value_and_weight_by_product(table: &Table) -> Result<Table, AggregateError> {
    aggregate(table, &[CITY, STATE, SH4], &[FOB, NET_WEIGHT])
}

/// Both stages of the commodity ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct TopProducts {
    /// FOB per (city, state, SH4 description), largest first.
    pub by_location: Table,
    /// `by_location` re-grouped per SH4 description, largest first.
    pub ranking: Table,
}

/// Rank SH4 commodities by FOB in two stages: per location first, then
/// summed again per commodity.
pub fn top_products(table: &Table) -> Result<TopProducts, AggregateError> {
    let by_location = sort_by(
        &aggregate(table, &[CITY, STATE, SH4], &[FOB])?,
        FOB,
        SortOrder::Descending,
    )?;
    let ranking = sort_by(&aggregate(&by_location, &[SH4], &[FOB])?, FOB, SortOrder::Descending)?
        .project(&[SH4, FOB]);
    Ok(TopProducts {
        by_location,
        ranking,
    })
}
