use contracts::dashboards::d410_marketing_tests::{DashboardView, Interaction};
use contracts::shared::table::TableData;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::charts::chart_specs;
use super::filter_state::FilterState;
use super::loader::Table;
use super::service;
use super::view::derive;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown session {0}")]
    UnknownSession(Uuid),
}

/// Per-session interaction state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    filter: FilterState,
    selected: Option<String>,
}

impl Session {
    fn new(table: &Table) -> Self {
        Self {
            filter: FilterState::initialize(table.categories().iter().cloned()),
            selected: None,
        }
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }
}

/// Session-keyed dashboard host over one loaded table
pub struct MarketingDashboard {
    table: Arc<Table>,
    sessions: HashMap<Uuid, Session>,
}

impl MarketingDashboard {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            sessions: HashMap::new(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    /// Full table for bulk display
    pub fn table_data(&self) -> TableData {
        self.table.to_table_data()
    }

    /// Start a session with every test type selected
    pub fn open_session(&mut self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.insert(id, Session::new(&self.table));
        tracing::info!("Opened dashboard session {}", id);
        id
    }

    pub fn close_session(&mut self, id: Uuid) -> Result<(), SessionError> {
        self.sessions
            .remove(&id)
            .ok_or(SessionError::UnknownSession(id))?;
        tracing::info!("Closed dashboard session {}", id);
        Ok(())
    }

    pub fn session(&self, id: Uuid) -> Result<&Session, SessionError> {
        self.sessions.get(&id).ok_or(SessionError::UnknownSession(id))
    }

    /// Apply one user action and return the re-derived view.
    ///
    /// The detail selection is revalidated against the new view and cleared
    /// when it no longer belongs to it.
    pub fn process_interaction(
        &mut self,
        id: Uuid,
        interaction: Interaction,
    ) -> Result<DashboardView, SessionError> {
        let session = self
            .sessions
            .get_mut(&id)
            .ok_or(SessionError::UnknownSession(id))?;

        tracing::debug!("Session {}: {:?}", id, interaction);
        match interaction {
            Interaction::Toggle { category } => {
                if !session.filter.toggle(&category) {
                    tracing::warn!("Session {}: ignoring unknown test type '{}'", id, category);
                }
            }
            Interaction::Select { example } => session.selected = Some(example),
            Interaction::ClearSelection => session.selected = None,
            Interaction::Refresh => {}
        }

        let view = derive(&self.table, &session.filter);

        let mut selection_reset = false;
        if let Some(example) = session.selected.as_deref() {
            if view.find(example).is_none() {
                tracing::info!(
                    "Session {}: selection '{}' is not in the current view, clearing",
                    id,
                    example
                );
                session.selected = None;
                selection_reset = true;
            }
        }

        Ok(DashboardView {
            session_id: id,
            filters: service::filter_options(&session.filter),
            summary: service::summary_panel(&view),
            charts: chart_specs(&self.table),
            time_series: view.time_series().map(<[_]>::to_vec),
            rows: self.table.rows_data(view.rows().iter().copied()),
            detail: service::detail_state(&view, session.selected.as_deref()),
            selection_reset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboards::d410_marketing_tests::loader::parse_table;
    use contracts::dashboards::d410_marketing_tests::DetailState;

    const FIXTURE: &str = "\
Example,Test Type,Impressions
a1,A,100
a2,A,200
b1,B,300
b2,B,400
c1,C,500
c2,C,600
";

    fn dashboard() -> MarketingDashboard {
        MarketingDashboard::new(Arc::new(parse_table(FIXTURE, "fixture").unwrap()))
    }

    fn toggle(category: &str) -> Interaction {
        Interaction::Toggle {
            category: category.to_string(),
        }
    }

    fn selected(view: &DashboardView) -> Option<&str> {
        match &view.detail {
            DetailState::Selected { selected, .. } => Some(selected.as_str()),
            DetailState::Empty { .. } => None,
        }
    }

    #[test]
    fn test_toggle_b_scenario() {
        let mut dashboard = dashboard();
        let id = dashboard.open_session();

        let view = dashboard.process_interaction(id, Interaction::Refresh).unwrap();
        assert_eq!(view.summary.row_count, 6);
        assert!(view.filters.iter().all(|f| f.active));

        let view = dashboard.process_interaction(id, toggle("B")).unwrap();
        assert_eq!(view.rows.rows.len(), 4);
        assert_eq!(view.summary.total_impressions, 100.0 + 200.0 + 500.0 + 600.0);
        assert!(!dashboard.session(id).unwrap().filter().is_active("B"));
    }

    #[test]
    fn test_toggling_everything_off_shows_nothing() {
        let mut dashboard = dashboard();
        let id = dashboard.open_session();
        for category in ["A", "B", "C"] {
            dashboard.process_interaction(id, toggle(category)).unwrap();
        }

        let view = dashboard.process_interaction(id, Interaction::Refresh).unwrap();
        assert!(view.rows.rows.is_empty());
        assert_eq!(view.summary.average_conversion_rate, 0.0);
        assert!(matches!(view.detail, DetailState::Empty { .. }));
    }

    #[test]
    fn test_stale_selection_is_cleared() {
        let mut dashboard = dashboard();
        let id = dashboard.open_session();

        let view = dashboard
            .process_interaction(
                id,
                Interaction::Select {
                    example: "b2".to_string(),
                },
            )
            .unwrap();
        assert_eq!(selected(&view), Some("b2"));
        assert!(!view.selection_reset);

        let view = dashboard.process_interaction(id, toggle("B")).unwrap();
        assert!(view.selection_reset);
        assert_eq!(dashboard.session(id).unwrap().selected(), None);
        // Falls back to the first filtered row, never the stale record
        assert_eq!(selected(&view), Some("a1"));

        // Re-enabling B does not resurrect the old selection
        let view = dashboard.process_interaction(id, toggle("B")).unwrap();
        assert!(!view.selection_reset);
        assert_eq!(selected(&view), Some("a1"));
    }

    #[test]
    fn test_unknown_selection_is_rejected() {
        let mut dashboard = dashboard();
        let id = dashboard.open_session();
        let view = dashboard
            .process_interaction(
                id,
                Interaction::Select {
                    example: "zz".to_string(),
                },
            )
            .unwrap();
        assert!(view.selection_reset);
        assert_eq!(dashboard.session(id).unwrap().selected(), None);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let mut dashboard = dashboard();
        let first = dashboard.open_session();
        let second = dashboard.open_session();

        dashboard.process_interaction(first, toggle("A")).unwrap();
        dashboard
            .process_interaction(
                first,
                Interaction::Select {
                    example: "c1".to_string(),
                },
            )
            .unwrap();

        let view = dashboard.process_interaction(second, Interaction::Refresh).unwrap();
        assert_eq!(view.summary.row_count, 6);
        assert_eq!(selected(&view), Some("a1"));
        assert_eq!(dashboard.session(second).unwrap().selected(), None);
    }

    #[test]
    fn test_closed_session_is_unknown() {
        let mut dashboard = dashboard();
        let id = dashboard.open_session();
        dashboard.close_session(id).unwrap();

        assert_eq!(
            dashboard.process_interaction(id, Interaction::Refresh).unwrap_err(),
            SessionError::UnknownSession(id)
        );
        assert_eq!(
            dashboard.close_session(id),
            Err(SessionError::UnknownSession(id))
        );
    }
}
