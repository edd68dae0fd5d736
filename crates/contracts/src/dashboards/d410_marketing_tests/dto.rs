use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::table::TableData;

/// User action sent by the presentation surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Interaction {
    /// Flip a test type in or out of the active filter
    Toggle { category: String },
    /// Choose the record shown in the detail panel
    Select { example: String },
    /// Drop the current detail selection
    ClearSelection,
    /// Re-derive the view without changing state
    Refresh,
}

/// One line of host output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Frame {
    /// Full source table, sent once per session
    Table(TableData),
    /// View derived after an interaction
    View(Box<DashboardView>),
}

/// Everything the presentation surface needs to render one state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub session_id: Uuid,
    /// Filter options in table order with their active flags
    pub filters: Vec<FilterOption>,
    pub summary: SummaryPanel,
    /// Chart descriptors to be drawn over `rows`
    pub charts: Vec<ChartSpec>,
    /// Per-date totals, present only when the table has a `Date` column
    pub time_series: Option<Vec<TimeSeriesPoint>>,
    /// Filtered rows
    pub rows: TableData,
    pub detail: DetailState,
    /// True when the previous selection fell outside this view and was cleared
    pub selection_reset: bool,
}

/// Filter toggle button state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub category: String,
    pub active: bool,
}

/// Summary metrics over the filtered rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryPanel {
    /// e.g. "Showing 4 tests"
    pub headline: String,
    pub row_count: usize,
    pub total_impressions: f64,
    pub total_conversions: f64,
    /// 0.0 when no row carries a conversion rate
    pub average_conversion_rate: f64,
    pub total_revenue: f64,
    pub engagement_by_category: Vec<CategoryMean>,
    /// Pre-formatted cards, in display order
    pub cards: Vec<MetricCard>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
}

/// Mean of a metric within one test type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMean {
    pub category: String,
    /// None when no row of the category has a value
    pub mean: Option<f64>,
}

/// Totals for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub impressions: f64,
    pub conversions: f64,
    pub revenue: f64,
}

/// Chart descriptor consumed by the plotting engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub id: String,
    pub title: String,
    pub kind: ChartKind,
    pub x: String,
    pub y: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    #[serde(default)]
    pub hover: Vec<String>,
}

impl ChartSpec {
    /// All columns the chart reads
    pub fn columns(&self) -> Vec<&str> {
        let mut columns = vec![self.x.as_str()];
        columns.extend(self.y.as_deref());
        columns.extend(self.color.as_deref());
        columns.extend(self.size.as_deref());
        columns.extend(self.hover.iter().map(String::as_str));
        columns
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartKind {
    Scatter,
    Histogram { bins: u32 },
    Line,
}

/// Detail panel state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DetailState {
    /// Nothing to select from
    Empty { message: String },
    /// Selector over the filtered examples with the resolved record
    Selected {
        options: Vec<String>,
        selected: String,
        record: RecordDetail,
    },
}

/// Structured detail of a single record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordDetail {
    pub example: String,
    pub test_type: String,
    pub explanation: Option<String>,
    pub recommendation: Option<String>,
    pub test_method: Option<String>,
    pub reason_for_method: Option<String>,
    /// Performance metrics in canonical order
    pub metrics: Vec<MetricValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    pub name: String,
    pub value: Option<f64>,
}
