//! Campaign dashboard engine: the record store and everything that reads or
//! writes it.
//!
//! Data flows one way: [`RecordStore`] snapshot → [`DateRange`] →
//! query pipeline or aggregation → plain serializable views. The
//! [`LiveUpdateScheduler`] and [`RefreshController`] are the only writers.

pub mod aggregate;
pub mod date_range;
pub mod error;
pub mod export;
pub mod generate;
pub mod live_update;
pub mod params;
pub mod query;
pub mod refresh;
pub mod session;
pub mod store;

pub use aggregate::{aggregate, top_by_revenue};
pub use date_range::DateRange;
pub use error::{EngineError, ExportError};
pub use generate::{generate_dataset, Dataset, DatasetSpec};
pub use live_update::{apply_tick, LiveUpdateScheduler, Perturbation};
pub use params::QueryParams;
pub use query::{
    filter_and_sort, paginate, run_query, CampaignPage, FilterOptions, ShowingRange, SortDirection,
    SortField, SortState, TableQuery,
};
pub use refresh::{RefreshController, RefreshOutcome, RefreshState};
pub use session::{DashboardSession, SessionConfig};
pub use store::{RecordStore, Snapshot, StoreContents};
