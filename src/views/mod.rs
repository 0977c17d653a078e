//! # Views Module
//!
//! Route-bound screens rendered as JSON view models, plus the first-run
//! setup helpers.

pub mod handlers;
pub mod routes;
pub mod screens;
pub mod setup;

#[cfg(test)]
mod tests;

pub use routes::view_routes;
pub use screens::Screen;
