pub mod civilians;
pub mod providers;
pub mod public;

pub use civilians::civilian_routes;
pub use providers::provider_routes;
pub use public::public_routes;
