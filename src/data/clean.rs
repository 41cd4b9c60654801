use super::model::{CITY, CITY_STATE, ECONOMIC_BLOCK, STATE, Table, Value};
use crate::error::LoadError;

/// Separator between city name and state code in the composite `City` field.
pub const CITY_STATE_SEPARATOR: &str = " - ";

/// Drop every row holding a null in any column, then every row whose
/// `Economic Block` equals `excluded_block`.
///
/// A table without an `Economic Block` column cannot be cleaned; this is
/// logged and an empty table comes back instead of an error.
pub fn clean(table: &Table, excluded_block: &str) -> Table {
    let Some(block_idx) = table.column_index(ECONOMIC_BLOCK) else {
        log::error!("Cannot clean dataset: column '{ECONOMIC_BLOCK}' does not exist");
        return Table::default();
    };

    let keep: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| !row.iter().any(Value::is_null))
        .filter(|(_, row)| row[block_idx].as_str() != Some(excluded_block))
        .map(|(i, _)| i)
        .collect();

    log::debug!(
        "Cleaning kept {} of {} rows (excluded block '{excluded_block}')",
        keep.len(),
        table.len()
    );
    table.select_rows(&keep)
}

/// Split a composite `"City - UF"` value into its city and state parts.
pub fn split_city_state(composite: &str) -> (String, Option<String>) {
    let mut parts = composite.split(CITY_STATE_SEPARATOR);
    let city = parts.next().unwrap_or_default().to_string();
    let state = parts.next().map(str::to_string);
    (city, state)
}

/// Add `State` and `City_State` and reduce `City` to the bare city name.
///
/// `City_State` is the untouched composite; `State` is null when the
/// composite has no separator.  Must run on already-cleaned rows.
pub fn derive_location_fields(table: &Table) -> Result<Table, LoadError> {
    let city_idx = table
        .column_index(CITY)
        .ok_or_else(|| LoadError::MissingColumn(CITY.to_string()))?;

    let mut columns = table.columns().to_vec();
    let state_idx = push_column(&mut columns, STATE);
    let composite_idx = push_column(&mut columns, CITY_STATE);
    let width = columns.len();

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            row.resize(width, Value::Null);
            let composite = row[city_idx].clone();
            let (city, state) = match composite.as_str() {
                Some(s) => {
                    let (city, state) = split_city_state(s);
                    (Value::String(city), state.map(Value::String).unwrap_or(Value::Null))
                }
                None => (Value::Null, Value::Null),
            };
            row[city_idx] = city;
            row[state_idx] = state;
            row[composite_idx] = composite;
            row
        })
        .collect();

    Ok(Table::new(columns, rows))
}

/// Index of `name`, appending it when the table does not have it yet.
fn push_column(columns: &mut Vec<String>, name: &str) -> usize {
    match columns.iter().position(|c| c == name) {
        Some(idx) => idx,
        None => {
            columns.push(name.to_string());
            columns.len() - 1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::raw_export_table;
    use crate::data::model::FOB;

    #[test]
    fn test_clean_drops_nulls_and_excluded_block() {
        let cleaned = clean(&raw_export_table(), "Europe");
        assert_eq!(cleaned.len(), 5);
        assert!(cleaned.rows().iter().all(|r| !r.iter().any(Value::is_null)));
        let blocks: Vec<_> = cleaned.column(ECONOMIC_BLOCK).unwrap().collect();
        assert!(blocks.iter().all(|b| b.as_str() != Some("Europe")));
    }

    #[test]
    fn test_clean_is_idempotent() {
        let once = clean(&raw_export_table(), "Europe");
        let twice = clean(&once, "Europe");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_clean_without_block_column_is_empty() {
        let t = raw_export_table().project(&[CITY, FOB]);
        let cleaned = clean(&t, "Europe");
        assert!(cleaned.is_empty());
        assert!(cleaned.columns().is_empty());
    }

    #[test]
    fn test_split_city_state() {
        assert_eq!(
            split_city_state("Águas Mornas - SC"),
            ("Águas Mornas".to_string(), Some("SC".to_string()))
        );
        assert_eq!(split_city_state("Brasília"), ("Brasília".to_string(), None));
        assert_eq!(
            split_city_state("A - B - C"),
            ("A".to_string(), Some("B".to_string()))
        );
    }

    #[test]
    fn test_derive_keeps_composite_city() {
        let t = Table::new(
            vec![CITY.into(), ECONOMIC_BLOCK.into()],
            vec![
                vec![Value::from("Franca - SP"), Value::from("European Union")],
                vec![Value::from("Brasília"), Value::from("European Union")],
            ],
        );
        let derived = derive_location_fields(&t).unwrap();
        assert_eq!(
            derived.columns(),
            &[CITY.to_string(), ECONOMIC_BLOCK.to_string(), STATE.to_string(), CITY_STATE.to_string()]
        );
        assert_eq!(derived.rows()[0][0], Value::from("Franca"));
        assert_eq!(derived.rows()[0][2], Value::from("SP"));
        assert_eq!(derived.rows()[0][3], Value::from("Franca - SP"));
        assert_eq!(derived.rows()[1][0], Value::from("Brasília"));
        assert_eq!(derived.rows()[1][2], Value::Null);
        assert_eq!(derived.rows()[1][3], Value::from("Brasília"));
    }
}
