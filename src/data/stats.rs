use super::model::{Table, Value};
use crate::error::ChartError;

// ---------------------------------------------------------------------------
// Quantiles
// ---------------------------------------------------------------------------

/// Quantile of already-sorted values with linear interpolation between the
/// two nearest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Descriptive summary
// ---------------------------------------------------------------------------

/// count / mean / std / min / quartiles / max of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnSummary {
    pub fn from_values(column: &str, values: &[f64]) -> Option<Self> {
        let s = sorted(values);
        let n = s.len();
        let mean = mean(&s)?;
        let std = if n < 2 {
            f64::NAN
        } else {
            (s.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
        };
        Some(ColumnSummary {
            column: column.to_string(),
            count: n,
            mean,
            std,
            min: s[0],
            q1: quantile(&s, 0.25)?,
            median: quantile(&s, 0.5)?,
            q3: quantile(&s, 0.75)?,
            max: s[n - 1],
        })
    }
}

/// Summaries of every numeric column, in column order.
pub fn describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .columns()
        .iter()
        .filter(|name| {
            table
                .column(name)
                .and_then(|mut cells| cells.find(|v| !v.is_null()))
                .is_some_and(|v| matches!(v, Value::Integer(_) | Value::Float(_)))
        })
        .filter_map(|name| ColumnSummary::from_values(name, &table.numeric_column(name)))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width bins over the value range plus the mean and median markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
}

impl Histogram {
    pub fn new(values: &[f64], bin_count: usize) -> Option<Self> {
        let s = sorted(values);
        let (min, max) = (*s.first()?, *s.last()?);
        let bin_count = bin_count.max(1);

        let (start, width) = if max > min {
            (min, (max - min) / bin_count as f64)
        } else {
            (min - 0.5, 1.0 / bin_count as f64)
        };

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: start + width * i as f64,
                end: start + width * (i + 1) as f64,
                count: 0,
            })
            .collect();
        for v in &s {
            let slot = (((v - start) / width).floor() as usize).min(bin_count - 1);
            bins[slot].count += 1;
        }

        Some(Histogram {
            bins,
            mean: mean(&s)?,
            median: quantile(&s, 0.5)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Box plot with IQR outlier removal
// ---------------------------------------------------------------------------

/// `[Q1 - 1.5·IQR, Q3 + 1.5·IQR]`.
pub fn iqr_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let s = sorted(values);
    let q1 = quantile(&s, 0.25)?;
    let q3 = quantile(&s, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - 1.5 * iqr, q3 + 1.5 * iqr))
}

/// Values inside the IQR fences, bounds inclusive, in input order.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    match iqr_bounds(values) {
        Some((lo, hi)) => values.iter().copied().filter(|v| *v >= lo && *v <= hi).collect(),
        None => Vec::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxStats {
    /// Box of the values left after outlier removal; whiskers reach the
    /// extreme remaining values.
    pub fn without_outliers(values: &[f64]) -> Option<Self> {
        let kept = sorted(&remove_outliers(values));
        Some(BoxStats {
            lower_whisker: *kept.first()?,
            q1: quantile(&kept, 0.25)?,
            median: quantile(&kept, 0.5)?,
            q3: quantile(&kept, 0.75)?,
            upper_whisker: *kept.last()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Log-log scatter
// ---------------------------------------------------------------------------

/// Points in `log10` space plus how many were left out for being ≤ 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LogLogPoints {
    pub points: Vec<[f64; 2]>,
    pub skipped: usize,
}

/// Pair `x_column` with `y_column` row by row on logarithmic axes.
pub fn log_log_points(
    table: &Table,
    x_column: &str,
    y_column: &str,
) -> Result<LogLogPoints, ChartError> {
    let xi = table
        .column_index(x_column)
        .ok_or_else(|| crate::error::AggregateError::MissingColumn(x_column.to_string()))?;
    let yi = table
        .column_index(y_column)
        .ok_or_else(|| crate::error::AggregateError::MissingColumn(y_column.to_string()))?;

    let mut points = Vec::with_capacity(table.len());
    let mut skipped = 0;
    for row in table.rows() {
        match (row[xi].as_f64(), row[yi].as_f64()) {
            (Some(x), Some(y)) if x > 0.0 && y > 0.0 => points.push([x.log10(), y.log10()]),
            _ => skipped += 1,
        }
    }

    if points.is_empty() {
        return Err(ChartError::NoPositiveValues);
    }
    Ok(LogLogPoints { points, skipped })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::raw_export_table;
    use crate::data::model::{FOB, NET_WEIGHT};

    #[test]
    fn test_quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.25), Some(1.75));
        assert_eq!(quantile(&v, 0.5), Some(2.5));
        assert_eq!(quantile(&v, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn test_summary() {
        let s = ColumnSummary::from_values("x", &[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - 1.2909944487358056).abs() < 1e-12);
        assert_eq!((s.min, s.median, s.max), (1.0, 2.5, 4.0));
        assert!(ColumnSummary::from_values("x", &[7.0]).unwrap().std.is_nan());
    }

    #[test]
    fn test_describe_only_numeric_columns() {
        let names: Vec<String> = describe(&raw_export_table())
            .into_iter()
            .map(|s| s.column)
            .collect();
        assert_eq!(names, vec!["Year", FOB, NET_WEIGHT]);
    }

    #[test]
    fn test_histogram_counts_everything() {
        let values = [1.0, 2.0, 2.5, 9.0, 10.0];
        let h = Histogram::new(&values, 3).unwrap();
        assert_eq!(h.bins.len(), 3);
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(h.bins[2].count, 2);
        assert_eq!(h.median, 2.5);
        assert_eq!(h.mean, 4.9);
    }

    #[test]
    fn test_histogram_single_value() {
        let h = Histogram::new(&[3.0, 3.0], 30).unwrap();
        assert_eq!(h.bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(Histogram::new(&[], 30).is_none());
    }

    #[test]
    fn test_iqr_removes_far_values() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 500.0];
        let kept = remove_outliers(&values);
        assert_eq!(kept, vec![10.0, 11.0, 12.0, 13.0, 14.0]);

        let b = BoxStats::without_outliers(&values).unwrap();
        assert_eq!(b.lower_whisker, 10.0);
        assert_eq!(b.upper_whisker, 14.0);
        assert_eq!(b.median, 12.0);
    }

    #[test]
    fn test_log_log_skips_non_positive() {
        let t = Table::new(
            vec![NET_WEIGHT.into(), FOB.into()],
            vec![
                vec![Value::Float(10.0), Value::Float(1000.0)],
                vec![Value::Float(0.0), Value::Float(5.0)],
            ],
        );
        let pts = log_log_points(&t, NET_WEIGHT, FOB).unwrap();
        assert_eq!(pts.points.len(), 1);
        assert!((pts.points[0][0] - 1.0).abs() < 1e-12);
        assert!((pts.points[0][1] - 3.0).abs() < 1e-12);
        assert_eq!(pts.skipped, 1);
    }

    #[test]
    fn test_log_log_without_positive_values_fails() {
        let t = Table::new(
            vec![NET_WEIGHT.into(), FOB.into()],
            vec![vec![Value::Float(0.0), Value::Float(5.0)]],
        );
        assert_eq!(log_log_points(&t, NET_WEIGHT, FOB), Err(ChartError::NoPositiveValues));
    }
}
