//! Descriptive report for one procedure code's provider billing records:
//! negotiated rate statistics plus breakdowns by billing class, contract
//! type and city.
//!
//! `reports::build_report` turns a loaded [`types::Dataset`] into a
//! [`model::ReportModel`]; everything that displays a report consumes that
//! model.
pub mod categories;
pub mod config;
pub mod error;
pub mod geography;
pub mod loader;
pub mod model;
pub mod output;
pub mod reports;
pub mod session;
pub mod stats;
pub mod types;
pub mod util;

pub use config::ReportOptions;
pub use error::{ReportError, Result};
pub use model::ReportModel;
pub use reports::{build_report, build_report_at};
pub use types::Dataset;
