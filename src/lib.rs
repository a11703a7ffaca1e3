//! Credit-risk dashboard core.
//!
//! Loads a loan-application table once, filters it by user predicates,
//! aggregates the result into chart-ready tables and summary statistics, and
//! renders a natural-language report with a local fallback. Presentation
//! adapters (the egui app, the terminal report) sit on top of
//! [`dashboard::DashboardSnapshot`].

pub mod dashboard;
pub mod data;
pub mod report;
pub mod summary;

pub use dashboard::{DashboardSnapshot, Presenter};
pub use data::aggregate::{ChartTable, SummaryStats};
pub use data::filter::{FilterSpec, FilteredView};
pub use data::loader::load_file;
pub use data::model::CreditDataset;
pub use data::DataLoadError;
