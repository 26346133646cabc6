//! Client for the production-order dashboard API.
//!
//! ```text
//! FilterForm ─► Query ─► OpsSource ─► rank ─► Summary ─► ViewModel
//!  (query)     (query)    (api)      (rank)  (summary)    (view)
//! ```
//!
//! [`dashboard::Dashboard`] ties the steps together and owns the state.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod dates;
pub mod error;
pub mod logging;
pub mod model;
pub mod query;
pub mod rank;
pub mod summary;
pub mod view;
