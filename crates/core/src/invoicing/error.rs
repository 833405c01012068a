use thiserror::Error;

/// Errors that can occur when recording invoice activity.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InvoiceError {
    #[error("Payment amount must be greater than zero, got {0}")]
    InvalidAmount(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_amount_display() {
        assert_eq!(
            InvoiceError::InvalidAmount(-5.0).to_string(),
            "Payment amount must be greater than zero, got -5"
        );
    }
}
