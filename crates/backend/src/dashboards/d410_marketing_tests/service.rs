use contracts::dashboards::d410_marketing_tests::{
    DetailState, FilterOption, MetricCard, MetricValue, RecordDetail, SummaryPanel,
};

use crate::shared::format::{format_decimal, format_number, format_percent};

use super::columns::{Metric, TextField};
use super::filter_state::FilterState;
use super::loader::Record;
use super::view::FilteredView;

/// Filter buttons in table order
pub fn filter_options(state: &FilterState) -> Vec<FilterOption> {
    state
        .known()
        .iter()
        .map(|category| FilterOption {
            category: category.clone(),
            active: state.is_active(category),
        })
        .collect()
}

/// Summary metrics panel
pub fn summary_panel(view: &FilteredView) -> SummaryPanel {
    let a = view.aggregates();
    let cards = vec![
        MetricCard {
            label: "Total Impressions".to_string(),
            value: format_decimal(a.total_impressions, 0),
        },
        MetricCard {
            label: "Total Conversions".to_string(),
            value: format_decimal(a.total_conversions, 0),
        },
        MetricCard {
            label: "Average Conversion Rate (%)".to_string(),
            value: format_percent(a.mean_conversion_rate),
        },
        MetricCard {
            label: "Total Revenue ($)".to_string(),
            value: format_decimal(a.total_revenue, 2),
        },
    ];

    SummaryPanel {
        headline: format!("Showing {} tests", format_number(a.row_count as u64)),
        row_count: a.row_count,
        total_impressions: a.total_impressions,
        total_conversions: a.total_conversions,
        average_conversion_rate: a.mean_conversion_rate,
        total_revenue: a.total_revenue,
        engagement_by_category: a.engagement_by_category.clone(),
        cards,
    }
}

/// Detail panel for the current selection.
///
/// `selected` must already be validated against `view`; without one the
/// first filtered row is shown.
pub fn detail_state(view: &FilteredView, selected: Option<&str>) -> DetailState {
    let record = selected
        .and_then(|example| view.find(example))
        .or_else(|| view.rows().first().copied());

    match record {
        Some(record) => DetailState::Selected {
            options: view.rows().iter().map(|r| r.example().to_string()).collect(),
            selected: record.example().to_string(),
            record: record_detail(record),
        },
        None => DetailState::Empty {
            message: "No tests match the selected test types.".to_string(),
        },
    }
}

pub fn record_detail(record: &Record) -> RecordDetail {
    let text = |field: TextField| record.text(field).map(str::to_string);
    RecordDetail {
        example: record.example().to_string(),
        test_type: record.test_type().to_string(),
        explanation: text(TextField::Explanation),
        recommendation: text(TextField::Recommendation),
        test_method: text(TextField::TestMethod),
        reason_for_method: text(TextField::ReasonForMethod),
        metrics: Metric::ALL
            .iter()
            .map(|m| MetricValue {
                name: m.column().to_string(),
                value: record.metric(*m),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_marketing_tests::loader::parse_table;
    use crate::dashboards::d410_marketing_tests::view::derive;

    const FIXTURE: &str = "\
Example,Test Type,Impressions,Conversions,Conversion Rate (%),Revenue ($),Explanation
a1,A,1200000,3400,2.5,1234.5,Shorter subject lines
b1,B,800,12,,99.999,
";

    #[test]
    fn test_summary_cards_are_formatted() {
        let table = parse_table(FIXTURE, "fixture").unwrap();
        let view = derive(&table, &FilterState::initialize(["A", "B"]));
        let panel = summary_panel(&view);

        assert_eq!(panel.headline, "Showing 2 tests");
        let values: Vec<&str> = panel.cards.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["1,200,800", "3,412", "2.50%", "1,334.50"]);
    }

    #[test]
    fn test_empty_view_summary_and_detail() {
        let table = parse_table(FIXTURE, "fixture").unwrap();
        let state = FilterState::initialize(["A", "B"]).toggled("A").toggled("B");
        let view = derive(&table, &state);

        let panel = summary_panel(&view);
        assert_eq!(panel.headline, "Showing 0 tests");
        assert_eq!(panel.cards[2].value, "0.00%");
        assert!(matches!(detail_state(&view, None), DetailState::Empty { .. }));
    }

    #[test]
    fn test_detail_defaults_to_first_row() {
        let table = parse_table(FIXTURE, "fixture").unwrap();
        let view = derive(&table, &FilterState::initialize(["A", "B"]));

        let DetailState::Selected {
            options,
            selected,
            record,
        } = detail_state(&view, None)
        else {
            panic!("expected a selection");
        };
        assert_eq!(options, vec!["a1", "b1"]);
        assert_eq!(selected, "a1");
        assert_eq!(record.explanation.as_deref(), Some("Shorter subject lines"));
        assert_eq!(record.metrics.len(), 12);
        assert_eq!(record.metrics[0].name, "Impressions");
        assert_eq!(record.metrics[0].value, Some(1200000.0));
        assert_eq!(record.metrics[1].value, None);
    }

    #[test]
    fn test_filter_options_follow_table_order() {
        let state = FilterState::initialize(["B", "A"]).toggled("A");
        assert_eq!(
            filter_options(&state),
            vec![
                FilterOption {
                    category: "B".to_string(),
                    active: true,
                },
                FilterOption {
                    category: "A".to_string(),
                    active: false,
                },
            ]
        );
    }
}
