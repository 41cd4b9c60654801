use std::fmt;

use super::model::{Table, Value};

/// Shape, missing cells, column types and memory footprint of a table.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetReport {
    pub rows: usize,
    pub columns: usize,
    pub missing_total: usize,
    /// Columns with at least one missing cell, most missing first.
    pub missing_by_column: Vec<(String, usize)>,
    pub rows_with_missing: usize,
    /// Type of the first non-null cell per column.
    pub column_types: Vec<(String, &'static str)>,
    pub memory_bytes: usize,
}

impl DatasetReport {
    pub fn from_table(table: &Table) -> Self {
        let width = table.columns().len();
        let mut missing = vec![0usize; width];
        let mut rows_with_missing = 0;
        let mut memory_bytes = 0;

        for row in table.rows() {
            let mut any = false;
            for (i, cell) in row.iter().enumerate() {
                if cell.is_null() {
                    missing[i] += 1;
                    any = true;
                }
                memory_bytes += std::mem::size_of::<Value>();
                if let Value::String(s) = cell {
                    memory_bytes += s.capacity();
                }
            }
            if any {
                rows_with_missing += 1;
            }
        }

        let mut missing_by_column: Vec<(String, usize)> = table
            .columns()
            .iter()
            .cloned()
            .zip(missing.iter().copied())
            .filter(|(_, n)| *n > 0)
            .collect();
        missing_by_column.sort_by(|a, b| b.1.cmp(&a.1));

        let column_types = table
            .columns()
            .iter()
            .map(|name| {
                let dtype = table
                    .column(name)
                    .and_then(|mut cells| cells.find(|v| !v.is_null()))
                    .map(Value::type_name)
                    .unwrap_or("object");
                (name.clone(), dtype)
            })
            .collect();

        DatasetReport {
            rows: table.len(),
            columns: width,
            missing_total: missing.iter().sum(),
            missing_by_column,
            rows_with_missing,
            column_types,
            memory_bytes,
        }
    }
}

impl fmt::Display for DatasetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dataset Report ---")?;
        writeln!(f, "Rows: {}", self.rows)?;
        writeln!(f, "Columns: {}", self.columns)?;
        writeln!(f, "Missing cells: {}", self.missing_total)?;
        if self.missing_total > 0 {
            writeln!(f, "Columns with missing values:")?;
            for (col, count) in &self.missing_by_column {
                let share = *count as f64 / self.rows.max(1) as f64 * 100.0;
                writeln!(f, "  - {col}: {count} missing ({share:.2}%)")?;
            }
            writeln!(f, "Rows with missing values: {}", self.rows_with_missing)?;
        } else {
            writeln!(f, "No missing values.")?;
        }
        writeln!(f, "Column types:")?;
        for (col, dtype) in &self.column_types {
            writeln!(f, "  - {col}: {dtype}")?;
        }
        writeln!(
            f,
            "Memory usage: {:.2} MB",
            self.memory_bytes as f64 / (1024.0 * 1024.0)
        )
    }
}
