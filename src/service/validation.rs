//! Field-level request validation.

use crate::error::AppError;
use regex::Regex;

/// Rule for one text field. Unset limits are not checked.
#[derive(Clone, Debug, Default)]
pub struct FieldRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<&'static str>,
    pub format: Option<&'static str>,
}

impl FieldRule {
    pub fn required() -> Self {
        FieldRule {
            required: true,
            ..Default::default()
        }
    }

    pub fn optional() -> Self {
        FieldRule::default()
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn max(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn format(mut self, format: &'static str) -> Self {
        self.format = Some(format);
        self
    }
}

pub struct RequestValidator;

impl RequestValidator {
    /// Check each `(field, value, rule)` in order and fail on the first violation.
    pub fn validate(fields: &[(&str, Option<&str>, FieldRule)]) -> Result<(), AppError> {
        for (name, value, rule) in fields {
            let value = value.map(str::trim).filter(|v| !v.is_empty());
            match value {
                None if rule.required => {
                    return Err(AppError::Validation(format!("{} is required", name)));
                }
                None => {}
                Some(v) => validate_field(name, v, rule)?,
            }
        }
        Ok(())
    }

    /// Ids coming from request bodies or paths must be positive.
    pub fn positive_id(label: &str, id: i32) -> Result<(), AppError> {
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "{} id must be greater than zero",
                label
            )));
        }
        Ok(())
    }
}

fn validate_field(name: &str, v: &str, rule: &FieldRule) -> Result<(), AppError> {
    if let Some(format) = rule.format {
        validate_format(name, v, format)?;
    }
    let len = v.chars().count();
    if let Some(max) = rule.max_length {
        if len > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                name, max
            )));
        }
    }
    if let Some(min) = rule.min_length {
        if len < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                name, min
            )));
        }
    }
    if let Some(pattern) = rule.pattern {
        let re = Regex::new(pattern).map_err(|_| AppError::Validation(format!("invalid pattern for {}", name)))?;
        if !re.is_match(v) {
            return Err(AppError::Validation(format!("{} does not match required pattern", name)));
        }
    }
    Ok(())
}

fn validate_format(name: &str, v: &str, format: &str) -> Result<(), AppError> {
    match format.to_lowercase().as_str() {
        "email" => {
            let valid = v
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.'))
                .unwrap_or(false);
            if !valid || v.contains(char::is_whitespace) {
                return Err(AppError::Validation(format!("{} must be a valid email", name)));
            }
        }
        _ => {}
    }
    Ok(())
}
