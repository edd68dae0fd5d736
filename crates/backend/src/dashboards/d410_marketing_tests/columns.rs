/// Identifier column, unique within the table
pub const EXAMPLE: &str = "Example";
/// Category column used for filtering and chart coloring
pub const TEST_TYPE: &str = "Test Type";
/// Optional ISO date column enabling the time series
pub const DATE: &str = "Date";

/// Columns without which the dashboard cannot be built
pub const REQUIRED: [&str; 2] = [EXAMPLE, TEST_TYPE];

/// Declared numeric performance fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Impressions,
    Clicks,
    Conversions,
    ConversionRate,
    Lift,
    Cost,
    Roi,
    Ctr,
    Cpa,
    Revenue,
    Profit,
    EngagementScore,
}

impl Metric {
    /// Canonical order, as shown in the detail panel
    pub const ALL: [Metric; 12] = [
        Metric::Impressions,
        Metric::Clicks,
        Metric::Conversions,
        Metric::ConversionRate,
        Metric::Lift,
        Metric::Cost,
        Metric::Roi,
        Metric::Ctr,
        Metric::Cpa,
        Metric::Revenue,
        Metric::Profit,
        Metric::EngagementScore,
    ];

    /// Source column header
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Impressions => "Impressions",
            Metric::Clicks => "Clicks",
            Metric::Conversions => "Conversions",
            Metric::ConversionRate => "Conversion Rate (%)",
            Metric::Lift => "Lift (%)",
            Metric::Cost => "Cost ($)",
            Metric::Roi => "ROI (%)",
            Metric::Ctr => "CTR (%)",
            Metric::Cpa => "CPA ($)",
            Metric::Revenue => "Revenue ($)",
            Metric::Profit => "Profit ($)",
            Metric::EngagementScore => "Engagement Score",
        }
    }

    pub fn from_column(column: &str) -> Option<Metric> {
        Metric::ALL.into_iter().find(|m| m.column() == column)
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

/// Free-text description fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Explanation,
    Recommendation,
    TestMethod,
    ReasonForMethod,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::Explanation,
        TextField::Recommendation,
        TextField::TestMethod,
        TextField::ReasonForMethod,
    ];

    pub fn column(&self) -> &'static str {
        match self {
            TextField::Explanation => "Explanation",
            TextField::Recommendation => "Recommendation",
            TextField::TestMethod => "Test Method",
            TextField::ReasonForMethod => "Reason for Method",
        }
    }

    pub(crate) fn index(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_index_matches_canonical_order() {
        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(metric.index(), i);
            assert_eq!(Metric::from_column(metric.column()), Some(*metric));
        }
        assert_eq!(Metric::from_column("Explanation"), None);
    }
}
