//! # Lead Magnets Module
//!
//! The signed-in user's lead magnets: row models, create and update
//! validation, the per-session cache and its JSON endpoints.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;


pub use models::{LeadMagnet, LeadMagnetList};
pub use routes::lead_magnet_routes;
pub use store::{LeadMagnetStore, StoreError};
