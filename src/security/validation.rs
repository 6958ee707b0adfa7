//! Request Validation Module
//!
//! Field checks for registration, chat and transaction input.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::error::AppError;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

pub const USERNAME_MAX_CHARS: usize = 64;
pub const PASSWORD_MIN_CHARS: usize = 6;
pub const PASSWORD_MAX_CHARS: usize = 128;
pub const CHAT_MESSAGE_MAX_CHARS: usize = 4_000;
pub const PAGE_SIZE_MAX: usize = 200;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} must be between {min} and {max} characters (got {got})")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
        got: usize,
    },

    #[error("{value:?} is not a valid email address")]
    InvalidEmail { value: String },

    #[error("{field} must be a finite, non-negative number")]
    InvalidAmount { field: &'static str },

    #[error("page must be at least 1 and page_size between 1 and {max}")]
    InvalidPage { max: usize },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field } | Self::Length { field, .. } | Self::InvalidAmount { field } => {
                field
            }
            Self::InvalidEmail { .. } => "email",
            Self::InvalidPage { .. } => "page",
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Character-count bounds, an empty value reports as missing
fn check_length(field: &'static str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let got = value.chars().count();
    if got == 0 && min > 0 {
        return Err(ValidationError::Missing { field });
    }
    if got < min || got > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            got,
        });
    }
    Ok(())
}

pub mod validators {
    use super::*;

    pub fn validate_username(username: &str) -> ValidationResult<()> {
        check_length("username", username.trim(), 1, USERNAME_MAX_CHARS)
    }

    pub fn validate_email(email: &str) -> ValidationResult<()> {
        if email.is_empty() {
            return Err(ValidationError::Missing { field: "email" });
        }
        if email.len() > 254 || !EMAIL_REGEX.is_match(email) {
            return Err(ValidationError::InvalidEmail {
                value: email.to_string(),
            });
        }
        Ok(())
    }

    pub fn validate_password(password: &str) -> ValidationResult<()> {
        check_length("password", password, PASSWORD_MIN_CHARS, PASSWORD_MAX_CHARS)
    }

    /// Whitespace-only messages count as empty
    pub fn validate_chat_message(message: &str) -> ValidationResult<()> {
        check_length("message", message.trim(), 1, CHAT_MESSAGE_MAX_CHARS)
    }

    pub fn validate_amount(amount: f64) -> ValidationResult<()> {
        if amount.is_finite() && amount >= 0.0 {
            Ok(())
        } else {
            Err(ValidationError::InvalidAmount { field: "amount" })
        }
    }

    pub fn validate_pagination(page: usize, page_size: usize) -> ValidationResult<()> {
        if page == 0 || page_size == 0 || page_size > PAGE_SIZE_MAX {
            return Err(ValidationError::InvalidPage { max: PAGE_SIZE_MAX });
        }
        Ok(())
    }

    /// Zero-based offset of the first item on `page`
    pub fn page_offset(page: usize, page_size: usize) -> ValidationResult<usize> {
        validate_pagination(page, page_size)?;
        (page - 1)
            .checked_mul(page_size)
            .ok_or(ValidationError::InvalidPage { max: PAGE_SIZE_MAX })
    }
}
