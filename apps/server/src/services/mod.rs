//! Business logic layer
//!
//! Services orchestrate operations by coordinating repositories,
//! applying business rules, and managing transactions.

pub mod accounts;
pub mod catalog;
pub mod contacts;
pub mod favorites;
pub mod profile_update;
pub mod profiles;
pub mod search;

pub use accounts::AccountService;
pub use catalog::CatalogService;
pub use contacts::{ContactService, Inbox};
pub use favorites::FavoriteService;
pub use profile_update::{PartitionedUpdate, ProfileUpdateService};
pub use profiles::ProfileService;
pub use search::SearchService;
