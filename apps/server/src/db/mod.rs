//! Database access layer

pub mod accounts;
pub mod contacts;
pub mod emergency_resources;
pub mod favorites;
pub mod medical_issues;
pub mod profiles;
pub mod search;
pub mod sql;
pub mod transaction;

pub use accounts::AccountRepository;
pub use contacts::ContactRepository;
pub use emergency_resources::EmergencyResourceRepository;
pub use favorites::FavoriteRepository;
pub use medical_issues::MedicalIssueRepository;
pub use profiles::ProfileRepository;
pub use search::SearchRepository;
pub use transaction::with_transaction;
