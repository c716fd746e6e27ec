//! Token issuance, password hashing and request principals

pub mod jwt;
pub mod password;
pub mod principal;

pub use jwt::{Claims, TokenManager};
pub use principal::{auth_middleware, PatientPrincipal, Principal, ProviderPrincipal};
