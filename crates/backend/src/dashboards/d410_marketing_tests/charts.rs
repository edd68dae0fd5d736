use contracts::dashboards::d410_marketing_tests::{ChartKind, ChartSpec};

use super::columns::{Metric, TextField, DATE, EXAMPLE, TEST_TYPE};
use super::loader::Table;

const ROI_BINS: u32 = 20;

/// Built-in chart set, all colored by test type
fn builtin_charts() -> Vec<ChartSpec> {
    vec![
        ChartSpec {
            id: "conversion_rate_vs_cost".to_string(),
            title: "Conversion Rate vs Cost".to_string(),
            kind: ChartKind::Scatter,
            x: Metric::Cost.column().to_string(),
            y: Some(Metric::ConversionRate.column().to_string()),
            color: Some(TEST_TYPE.to_string()),
            size: None,
            hover: vec![
                EXAMPLE.to_string(),
                TextField::Recommendation.column().to_string(),
            ],
        },
        ChartSpec {
            id: "roi_distribution".to_string(),
            title: "ROI (%) Distribution".to_string(),
            kind: ChartKind::Histogram { bins: ROI_BINS },
            x: Metric::Roi.column().to_string(),
            y: None,
            color: Some(TEST_TYPE.to_string()),
            size: None,
            hover: vec![],
        },
        ChartSpec {
            id: "ctr_vs_impressions".to_string(),
            title: "CTR (%) vs Impressions".to_string(),
            kind: ChartKind::Scatter,
            x: Metric::Impressions.column().to_string(),
            y: Some(Metric::Ctr.column().to_string()),
            color: Some(TEST_TYPE.to_string()),
            size: Some(Metric::Clicks.column().to_string()),
            hover: vec![EXAMPLE.to_string()],
        },
        ChartSpec {
            id: "impressions_over_time".to_string(),
            title: "Impressions over Time".to_string(),
            kind: ChartKind::Line,
            x: DATE.to_string(),
            y: Some(Metric::Impressions.column().to_string()),
            color: Some(TEST_TYPE.to_string()),
            size: None,
            hover: vec![EXAMPLE.to_string()],
        },
    ]
}

/// Charts whose columns all exist in `table`
pub fn chart_specs(table: &Table) -> Vec<ChartSpec> {
    builtin_charts()
        .into_iter()
        .filter(|spec| {
            let missing: Vec<&str> = spec
                .columns()
                .into_iter()
                .filter(|c| !table.has_column(c))
                .collect();
            if !missing.is_empty() {
                tracing::debug!("Skipping chart '{}': missing columns {:?}", spec.id, missing);
            }
            missing.is_empty()
        })
        .collect()
}
