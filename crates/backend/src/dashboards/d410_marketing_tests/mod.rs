//! Marketing test dashboard: CSV loading, per-session test type filter,
//! and the views derived from them.

pub mod charts;
pub mod columns;
pub mod filter_state;
pub mod host;
pub mod loader;
pub mod service;
pub mod session;
pub mod view;

pub use filter_state::FilterState;
pub use loader::{CoercionWarning, DataLoader, LoadError, Record, Table};
pub use session::{MarketingDashboard, SessionError};
pub use view::{derive, FilteredView};
