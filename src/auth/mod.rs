//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - mirroring the provider session into per-browser `AuthState`
//! - email and password sign-in, sign-up and sign-out
//! - the email confirmation callback
//! - profile reads and partial updates

pub mod extractors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod sync;
pub mod validators;


pub use extractors::{CurrentSession, MaybeSession};
pub use models::{AuthState, UserProfile};
pub use routes::auth_routes;
pub use sync::AuthSync;
