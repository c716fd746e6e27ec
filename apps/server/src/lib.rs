//! ROC Support - directory service connecting civilians with healthcare providers
//!
//! The crate is organised in layers:
//! - `api`: axum routes, handlers, extractors and middleware
//! - `services`: business logic, including the profile update coordinator
//! - `db`: SQL repositories, the partial-update field mapper and the scoped transaction helper
//! - `models`: request/response types shared by the layers above

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
