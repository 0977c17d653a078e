// src/auth/validators.rs

use regex::Regex;
use std::sync::OnceLock;

use super::models::ProfileUpdate;
use crate::common::{ValidationResult, Validator};
use crate::supabase::Credentials;

pub const PASSWORD_MIN: usize = 6;

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn looks_like_email(email: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    match PATTERN.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()) {
        Some(re) => re.is_match(email.trim()),
        None => email.contains('@'),
    }
}

// ============================================================================
// Credentials Validators
// ============================================================================

pub struct CredentialsValidator {
    pub sign_up: bool,
}

impl CredentialsValidator {
    pub fn sign_in() -> Self {
        Self { sign_up: false }
    }

    pub fn sign_up() -> Self {
        Self { sign_up: true }
    }
}

impl Validator<Credentials> for CredentialsValidator {
    fn validate(&self, data: &Credentials) -> ValidationResult {
        let mut result = ValidationResult::new();

        if result.require("email", &data.email, "Email is required")
            && !looks_like_email(&data.email)
        {
            result.add_error("email", "Email must be valid");
        }

        if data.password.is_empty() {
            result.add_error("password", "Password is required");
        } else if self.sign_up && data.password.chars().count() < PASSWORD_MIN {
            result.add_error("password", "Password must be at least 6 characters");
        }

        result
    }
}

pub struct ProfileUpdateValidator;

impl Validator<ProfileUpdate> for ProfileUpdateValidator {
    fn validate(&self, data: &ProfileUpdate) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(email) = &data.email {
            if !looks_like_email(email) {
                result.add_error("email", "Email must be valid");
            }
        }

        result
    }
}
