use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};

// ---------------------------------------------------------------------------
// Well-known column names of the export dataset
// ---------------------------------------------------------------------------

pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const CITY_STATE: &str = "City_State";
pub const YEAR: &str = "Year";
pub const FOB: &str = "US$ FOB";
pub const NET_WEIGHT: &str = "Net Weight";
pub const SH2: &str = "SH2 Description";
pub const SH4: &str = "SH4 Description";
pub const ECONOMIC_BLOCK: &str = "Economic Block";

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a dataframe reader infers.
/// Grouping keys are built from `Value`s, so it must be `Eq` and `Hash`.
#[derive(Debug, Clone)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDateTime),
    Null,
}

// -- Manual Eq/Ord/Hash so Value can key HashMaps and be sorted --
//
// Floats compare by their canonical form: every NaN is one value and
// `-0.0` equals `0.0`, so equality, ordering and hashing agree.

fn canonical_float(f: f64) -> f64 {
    if f.is_nan() {
        f64::NAN
    } else if f == 0.0 {
        0.0
    } else {
        f
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => canonical_float(*a).total_cmp(&canonical_float(*b)),
            (String(a), String(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => canonical_float(*f).to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.2}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Date(d) if d.time() == NaiveTime::MIN => write!(f, "{}", d.date()),
            Value::Date(d) => write!(f, "{d}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Interpret the value as an `f64` measure.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Interpret the value as a whole number (years).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            Value::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short dtype name used by the dataset report.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "int64",
            Value::Float(_) => "float64",
            Value::Bool(_) => "bool",
            Value::Date(_) => "datetime",
            Value::Null => "null",
        }
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset, or any view/aggregate derived from it
// ---------------------------------------------------------------------------

/// An in-memory table: ordered column names plus rows of cells.
///
/// Every transformation in the pipeline takes `&Table` and returns a new
/// `Table`; nothing mutates a table it was handed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Table { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Iterate the cells of one column, or `None` if it is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Numeric cells of a column as `f64`, skipping nulls and non-numbers.
    pub fn numeric_column(&self, name: &str) -> Vec<f64> {
        self.column(name)
            .map(|cells| cells.filter_map(Value::as_f64).collect())
            .unwrap_or_default()
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// New table restricted to the named columns, in the given order.
    /// Unknown names are skipped.
    pub fn project(&self, names: &[&str]) -> Table {
        let picks: Vec<(usize, &str)> = names
            .iter()
            .filter_map(|n| self.column_index(n).map(|i| (i, *n)))
            .collect();
        Table {
            columns: picks.iter().map(|(_, n)| n.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| picks.iter().map(|(i, _)| row[*i].clone()).collect())
                .collect(),
        }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Raw (pre-clean) export rows used across the data-layer tests.
    pub(crate) fn raw_export_table() -> Table {
        let columns = [
            CITY,
            ECONOMIC_BLOCK,
            YEAR,
            FOB,
            NET_WEIGHT,
            SH2,
            SH4,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        let row = |city: &str, block: &str, year: i64, fob: f64, weight: f64, sh2: &str, sh4: &str| {
            vec![
                Value::from(city),
                Value::from(block),
                Value::Integer(year),
                Value::Float(fob),
                Value::Float(weight),
                Value::from(sh2),
                Value::from(sh4),
            ]
        };

        Table::new(
            columns,
            vec![
                row("Franca - SP", "European Union", 2021, 1500.0, 10.0, "Footwear", "Leather shoes"),
                row("Alfenas - MG", "European Union", 2021, 900.0, 30.0, "Coffee", "Roasted coffee"),
                row("Franca - SP", "European Union", 2022, 2500.0, 12.0, "Footwear", "Leather shoes"),
                row("Alfenas - MG", "Europe", 2022, 400.0, 5.0, "Coffee", "Green coffee"),
                row("Campinas - SP", "European Union", 2022, 700.0, 2.0, "Machinery", "Pumps"),
                row("Alfenas - MG", "European Union", 2023, 300.0, 8.0, "Coffee", "Green coffee"),
                vec![
                    Value::from("Santos - SP"),
                    Value::from("European Union"),
                    Value::Integer(2023),
                    Value::Null,
                    Value::Float(1.0),
                    Value::from("Coffee"),
                    Value::from("Green coffee"),
                ],
            ],
        )
    }

    #[test]
    fn test_new_pads_short_rows() {
        let t = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Integer(1)]],
        );
        assert_eq!(t.rows()[0], vec![Value::Integer(1), Value::Null]);
    }

    #[test]
    fn test_project_keeps_requested_order() {
        let t = raw_export_table().project(&[FOB, CITY, "missing"]);
        assert_eq!(t.columns(), &[FOB.to_string(), CITY.to_string()]);
        assert_eq!(t.rows()[0][1], Value::from("Franca - SP"));
    }

    #[test]
    fn test_numeric_accessors() {
        assert_eq!(Value::Integer(3).as_f64(), Some(3.0));
        assert_eq!(Value::Float(2021.0).as_i64(), Some(2021));
        assert_eq!(Value::Float(2021.5).as_i64(), None);
    }

    #[test]
    fn test_float_identity_is_canonical() {
        use std::collections::HashSet;
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(-f64::NAN), Value::Float(f64::NAN));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(Value::Float(0.0).cmp(&Value::Float(-0.0)), std::cmp::Ordering::Equal);
        assert_ne!(Value::Float(1.0), Value::Float(f64::NAN));
        assert_ne!(Value::Float(1.0), Value::Integer(1));

        let distinct: HashSet<Value> = [f64::NAN, f64::NAN, 0.0, -0.0]
            .into_iter()
            .map(Value::Float)
            .collect();
        assert_eq!(distinct.len(), 2);
    }

    #[test]
    fn test_date_display_drops_midnight() {
        let d = chrono::NaiveDate::from_ymd_opt(2022, 3, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        assert_eq!(Value::Date(d).to_string(), "2022-03-01");
    }
}
