//! # Wizard Module
//!
//! The two-step create flow: pick a lead magnet type, fill in the details,
//! then run generation and hand the result to the preview screen.

pub mod generator;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;


pub use generator::{ContentGenerator, SimulatedGenerator};
pub use routes::wizard_routes;
pub use state::{Wizard, WizardError};
