// src/lead_magnets/validators.rs

use super::models::*;
use crate::common::{ValidationResult, Validator};

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;

// ============================================================================
// Lead Magnet Validators
// ============================================================================

pub struct LeadMagnetValidator;

impl Validator<NewLeadMagnet> for LeadMagnetValidator {
    fn validate(&self, data: &NewLeadMagnet) -> ValidationResult {
        let mut result = ValidationResult::new();

        if result.require("title", &data.title, "Title is required") {
            result.check_length(
                "title",
                &data.title,
                1,
                TITLE_MAX,
                "Title must be less than 100 characters",
            );
        }

        result.require("topic", &data.topic, "Topic is required");

        if let Some(description) = &data.description {
            result.check_length(
                "description",
                description,
                DESCRIPTION_MIN,
                DESCRIPTION_MAX,
                "Description must be between 10 and 500 characters",
            );
        }

        result
    }
}

impl Validator<LeadMagnetUpdate> for LeadMagnetValidator {
    fn validate(&self, data: &LeadMagnetUpdate) -> ValidationResult {
        let mut result = ValidationResult::new();

        if data.is_empty() {
            result.add_error("general", "At least one field must be provided for update");
            return result;
        }

        if let Some(title) = &data.title {
            if result.require("title", title, "Title cannot be empty") {
                result.check_length(
                    "title",
                    title,
                    1,
                    TITLE_MAX,
                    "Title must be less than 100 characters",
                );
            }
        }

        if let Some(topic) = &data.topic {
            result.require("topic", topic, "Topic cannot be empty");
        }

        result
    }
}
