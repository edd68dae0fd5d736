use chrono::NaiveDate;
use contracts::dashboards::d410_marketing_tests::{CategoryMean, TimeSeriesPoint};
use std::collections::BTreeMap;

use super::columns::{Metric, DATE};
use super::filter_state::FilterState;
use super::loader::{Record, Table};

/// Rows admitted by a filter state plus everything computed from them
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView<'t> {
    rows: Vec<&'t Record>,
    aggregates: Aggregates,
    time_series: Option<Vec<TimeSeriesPoint>>,
}

/// Aggregates over the filtered rows only. Missing cells are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub row_count: usize,
    pub total_impressions: f64,
    pub total_conversions: f64,
    /// 0.0 when no filtered row carries a value
    pub mean_conversion_rate: f64,
    pub total_revenue: f64,
    /// In order of first appearance among the filtered rows
    pub engagement_by_category: Vec<CategoryMean>,
}

impl<'t> FilteredView<'t> {
    pub fn rows(&self) -> &[&'t Record] {
        &self.rows
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// Present only when the table has a date column
    pub fn time_series(&self) -> Option<&[TimeSeriesPoint]> {
        self.time_series.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a record by its identifier within this view.
    /// With duplicate identifiers the first row wins.
    pub fn find(&self, example: &str) -> Option<&'t Record> {
        self.rows.iter().copied().find(|r| r.example() == example)
    }
}

/// Derive the view for `state`. Pure: equal inputs give equal views.
pub fn derive<'t>(table: &'t Table, state: &FilterState) -> FilteredView<'t> {
    let rows: Vec<&Record> = table
        .records()
        .iter()
        .filter(|r| state.admits(r.test_type()))
        .collect();

    let aggregates = aggregate(&rows);
    let time_series = table.has_column(DATE).then(|| time_series(&rows));

    FilteredView {
        rows,
        aggregates,
        time_series,
    }
}

fn aggregate(rows: &[&Record]) -> Aggregates {
    Aggregates {
        row_count: rows.len(),
        total_impressions: sum(rows, Metric::Impressions),
        total_conversions: sum(rows, Metric::Conversions),
        mean_conversion_rate: mean(rows.iter().copied(), Metric::ConversionRate).unwrap_or(0.0),
        total_revenue: sum(rows, Metric::Revenue),
        engagement_by_category: engagement_by_category(rows),
    }
}

fn sum(rows: &[&Record], metric: Metric) -> f64 {
    rows.iter().filter_map(|r| r.metric(metric)).sum()
}

fn mean<'a>(rows: impl Iterator<Item = &'a Record>, metric: Metric) -> Option<f64> {
    let (total, count) = rows
        .filter_map(|r| r.metric(metric))
        .fold((0.0, 0usize), |(total, count), v| (total + v, count + 1));
    (count > 0).then(|| total / count as f64)
}

fn engagement_by_category(rows: &[&Record]) -> Vec<CategoryMean> {
    let mut categories: Vec<&str> = Vec::new();
    for row in rows {
        if !categories.contains(&row.test_type()) {
            categories.push(row.test_type());
        }
    }

    categories
        .into_iter()
        .map(|category| CategoryMean {
            category: category.to_string(),
            mean: mean(
                rows.iter().copied().filter(|r| r.test_type() == category),
                Metric::EngagementScore,
            ),
        })
        .collect()
}

fn time_series(rows: &[&Record]) -> Vec<TimeSeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, TimeSeriesPoint> = BTreeMap::new();
    for row in rows {
        let Some(date) = row.date() else {
            continue;
        };
        let point = by_date.entry(date).or_insert_with(|| TimeSeriesPoint {
            date,
            impressions: 0.0,
            conversions: 0.0,
            revenue: 0.0,
        });
        point.impressions += row.metric(Metric::Impressions).unwrap_or(0.0);
        point.conversions += row.metric(Metric::Conversions).unwrap_or(0.0);
        point.revenue += row.metric(Metric::Revenue).unwrap_or(0.0);
    }
    by_date.into_values().collect()
}
