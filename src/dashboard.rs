use crate::config::DashboardConfig;
use crate::data::aggregate::{
    TopProducts, fob_by_city, fob_by_city_and_sh2, fob_by_state, fob_by_year, top_products,
    value_and_weight_by_product,
};
use crate::data::model::{FOB, NET_WEIGHT, SH4, Table};
use crate::data::stats::{
    BoxStats, ColumnSummary, Histogram, LogLogPoints, describe, log_log_points,
};
use crate::format::format_currency_br;

// ---------------------------------------------------------------------------
// Section – outcome of building one chart or table
// ---------------------------------------------------------------------------

/// One independently rendered piece of the dashboard.  A failing section
/// never affects its siblings.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Ready(T),
    /// The selection left nothing to show.
    NoData,
    /// Building the section failed; the message is shown in its place.
    Failed(String),
}

impl<T> Section<T> {
    fn from_result<E: std::fmt::Display>(name: &str, result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Section::Ready(value),
            Err(e) => {
                log::warn!("Section '{name}' failed: {e}");
                Section::Failed(e.to_string())
            }
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl Section<Table> {
    fn from_table<E: std::fmt::Display>(name: &str, result: Result<Table, E>) -> Self {
        match Self::from_result(name, result) {
            Section::Ready(t) if t.is_empty() => Section::NoData,
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard – every view derived from the filtered table
// ---------------------------------------------------------------------------

/// One row of the commodity ranking, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedProduct {
    pub description: String,
    pub fob: f64,
    /// `fob` as Brazilian-style currency.
    pub fob_label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    pub by_year: Section<Table>,
    pub by_state: Section<Table>,
    pub by_city: Section<Table>,
    pub city_sh2: Section<Table>,
    pub weight_vs_value: Section<LogLogPoints>,
    pub ranking: Section<Vec<RankedProduct>>,
    pub summary: Section<Vec<ColumnSummary>>,
    pub histogram: Section<Histogram>,
    pub net_weight_box: Section<BoxStats>,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::empty()
    }
}

impl Dashboard {
    /// Every section reports "no data".
    pub fn empty() -> Self {
        Dashboard {
            by_year: Section::NoData,
            by_state: Section::NoData,
            by_city: Section::NoData,
            city_sh2: Section::NoData,
            weight_vs_value: Section::NoData,
            ranking: Section::NoData,
            summary: Section::NoData,
            histogram: Section::NoData,
            net_weight_box: Section::NoData,
        }
    }

    /// Recompute all views of `filtered`.  Nothing here is cached; each
    /// call starts from the filtered rows.
    pub fn compute(filtered: &Table, config: &DashboardConfig) -> Self {
        if filtered.is_empty() {
            log::debug!("Filtered view is empty, nothing to aggregate");
            return Self::empty();
        }

        let weight_vs_value = match value_and_weight_by_product(filtered) {
            Ok(t) if t.is_empty() => Section::NoData,
            Ok(t) => Section::from_result("weight_vs_value", log_log_points(&t, NET_WEIGHT, FOB)),
            Err(e) => Section::from_result("weight_vs_value", Err(e)),
        };

        let ranking = match top_products(filtered) {
            Ok(TopProducts { ranking, .. }) if ranking.is_empty() => Section::NoData,
            Ok(TopProducts { ranking, .. }) => Section::Ready(ranked_products(&ranking)),
            Err(e) => Section::from_result("ranking", Err(e)),
        };

        let fob = filtered.numeric_column(FOB);
        let weights = filtered.numeric_column(NET_WEIGHT);

        Dashboard {
            by_year: Section::from_table("by_year", fob_by_year(filtered)),
            by_state: Section::from_table("by_state", fob_by_state(filtered)),
            by_city: Section::from_table("by_city", fob_by_city(filtered)),
            city_sh2: Section::from_table("city_sh2", fob_by_city_and_sh2(filtered)),
            weight_vs_value,
            ranking,
            summary: non_empty(describe(filtered)),
            histogram: optional(Histogram::new(&fob, config.histogram_bins)),
            net_weight_box: optional(BoxStats::without_outliers(&weights)),
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Section<Vec<T>> {
    if items.is_empty() {
        Section::NoData
    } else {
        Section::Ready(items)
    }
}

fn optional<T>(value: Option<T>) -> Section<T> {
    value.map(Section::Ready).unwrap_or(Section::NoData)
}

/// Turn the `[SH4 Description, US$ FOB]` ranking into display rows.
pub fn ranked_products(ranking: &Table) -> Vec<RankedProduct> {
    let (Some(desc), Some(fob)) = (ranking.column_index(SH4), ranking.column_index(FOB)) else {
        return Vec::new();
    };
    ranking
        .rows()
        .iter()
        .map(|row| {
            let value = row[fob].as_f64().unwrap_or(0.0);
            RankedProduct {
                description: row[desc].to_string(),
                fob: value,
                fob_label: format_currency_br(value),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::clean::{clean, derive_location_fields};
    use crate::data::filter::{FilterState, filter_table};
    use crate::data::model::tests::raw_export_table;
    use crate::data::model::{CITY, Value};

    fn dataset() -> Table {
        derive_location_fields(&clean(&raw_export_table(), "Europe")).unwrap()
    }

    #[test]
    fn test_every_section_ready_on_data() {
        let d = Dashboard::compute(&dataset(), &DashboardConfig::default());
        assert!(d.by_year.ready().is_some());
        assert!(d.by_state.ready().is_some());
        assert!(d.by_city.ready().is_some());
        assert!(d.city_sh2.ready().is_some());
        assert!(d.weight_vs_value.ready().is_some());
        assert!(d.summary.ready().is_some());
        assert!(d.histogram.ready().is_some());
        assert!(d.net_weight_box.ready().is_some());

        let ranking = d.ranking.ready().unwrap();
        assert_eq!(ranking[0].description, "Leather shoes");
        assert_eq!(ranking[0].fob_label, "US$ 4.000,00");
        assert_eq!(ranking.len(), 4);
    }

    #[test]
    fn test_empty_selection_is_no_data_everywhere() {
        let filters = FilterState {
            cities: ["Franca - SP".to_string()].into_iter().collect(),
            states: ["MG".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let filtered = filter_table(&dataset(), &filters);
        assert_eq!(Dashboard::compute(&filtered, &DashboardConfig::default()), Dashboard::empty());
    }

    #[test]
    fn test_one_failing_section_leaves_siblings() {
        // No State column: the state ranking and the location-based
        // aggregations fail, the rest still renders.
        let t = Table::new(
            vec![CITY.into(), "Year".into(), FOB.into(), NET_WEIGHT.into()],
            vec![vec![
                Value::from("Franca"),
                Value::Integer(2021),
                Value::Float(10.0),
                Value::Float(2.0),
            ]],
        );
        let d = Dashboard::compute(&t, &DashboardConfig::default());
        assert!(matches!(d.by_state, Section::Failed(_)));
        assert!(matches!(d.ranking, Section::Failed(_)));
        assert!(matches!(d.weight_vs_value, Section::Failed(_)));
        assert!(d.by_year.ready().is_some());
        assert!(d.by_city.ready().is_some());
        assert!(d.histogram.ready().is_some());
    }

    #[test]
    fn test_log_plot_failure_is_scoped() {
        let mut t = dataset();
        let weight = t.column_index(NET_WEIGHT).unwrap();
        let (columns, mut rows) = t.into_parts();
        for row in rows.iter_mut() {
            row[weight] = Value::Float(0.0);
        }
        t = Table::new(columns, rows);

        let d = Dashboard::compute(&t, &DashboardConfig::default());
        assert!(matches!(d.weight_vs_value, Section::Failed(_)));
        assert!(d.by_year.ready().is_some());
    }
}
