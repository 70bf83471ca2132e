use crate::errors::{AppError, Result};

pub struct Validator;

impl Validator {
    /// Requires a non-empty text field, returning the trimmed value.
    pub fn require_text(field: &str, value: Option<&str>) -> Result<String> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v.to_string()),
            _ => Err(AppError::ValidationError(format!(
                "Field '{}' is required",
                field
            ))),
        }
    }

    /// Parses a product price: a finite, non-negative decimal number.
    pub fn parse_price(raw: &str) -> Result<f64> {
        let price: f64 = raw.trim().parse().map_err(|_| {
            AppError::ValidationError(format!("Invalid price value: {}", raw))
        })?;
        if !price.is_finite() {
            return Err(AppError::ValidationError(format!(
                "Invalid price value: {}",
                raw
            )));
        }
        if price < 0.0 {
            return Err(AppError::ValidationError(
                "Price must not be negative".to_string(),
            ));
        }
        Ok(price)
    }

    /// Parses a minPrice/maxPrice query bound with the same rules as a price.
    pub fn parse_price_bound(param: &str, raw: &str) -> Result<f64> {
        Self::parse_price(raw)
            .map_err(|_| AppError::ValidationError(format!("Invalid value for {}: {}", param, raw)))
    }

    /// Parses a positive integer query parameter (page, limit).
    pub fn parse_positive_int(param: &str, raw: &str) -> Result<i64> {
        let value: i64 = raw.trim().parse().map_err(|_| {
            AppError::ValidationError(format!("Invalid value for {}: {}", param, raw))
        })?;
        if value < 1 {
            return Err(AppError::ValidationError(format!(
                "{} must be a positive integer",
                param
            )));
        }
        Ok(value)
    }
}
