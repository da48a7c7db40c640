//! Studio analytics.
//!
//! Windowed aggregation over the catalog, plus the table helpers and the
//! memoizing session built on top of it.

pub mod aggregator;
pub mod session;
pub mod table;
pub mod window;

pub use aggregator::*;
pub use session::AnalyticsSession;
pub use table::{filter_by_name, filter_by_status, sort_rows, SortColumn};
pub use window::DateWindow;
