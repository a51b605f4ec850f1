//! # Validation Module
//!
//! Field and input validation utilities for the Farmalink client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Controllers (this workspace)                                 │
//! │  ├── THIS MODULE: field patterns and ranges                            │
//! │  └── Blocks the request before it reaches the network                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend API                                                  │
//! │  ├── Re-validates everything server-side                               │
//! │  └── Answers {success: false, message} on violations                   │
//! │                                                                         │
//! │  Defense in depth: client-side validation is UX, never authority       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use farmalink_core::validation::{validate_email, validate_quantity};
//!
//! validate_email("pedidos@farmaciasur.es").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn email_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn phone_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9\s\-()]{9,}$").expect("valid phone pattern"))
}

fn tax_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // NIF: 8 digits + control letter. CIF: org letter + 7 digits + control.
    RE.get_or_init(|| {
        Regex::new(r"^(?:[0-9]{8}[A-Z]|[A-Z][0-9]{7}[0-9A-Z])$").expect("valid tax id pattern")
    })
}

fn iban_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}[0-9]{2}[0-9A-Z]{10,30}$").expect("valid IBAN pattern"))
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity business code (client or product).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters (backend column width)
/// - Only alphanumeric characters, hyphens and underscores
///
/// ## Example
/// ```rust
/// use farmalink_core::validation::validate_code;
///
/// assert!(validate_code("FARM-001").is_ok());
/// assert!(validate_code("").is_err());
/// assert!(validate_code("has space").is_err());
/// ```
pub fn validate_code(code: &str) -> ValidationResult<()> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "code".to_string(),
        });
    }

    if code.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 20,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates an entity display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters (backend column width)
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an email address shape.
///
/// Intentionally the permissive something@something.tld check - full
/// RFC 5322 parsing buys nothing for a form field; the mail server is
/// the authority.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "not a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a phone number shape.
///
/// ## Rules
/// Optional leading `+`, then at least 9 digits allowing spaces,
/// hyphens and parentheses as separators.
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    if !phone_pattern().is_match(phone) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "not a valid phone number".to_string(),
        });
    }

    Ok(())
}

/// Validates a Spanish tax id (NIF or CIF) shape.
///
/// Case-insensitive; surrounding whitespace is ignored. Checksum letters
/// are not verified - the backend owns that rule.
pub fn validate_tax_id(tax_id: &str) -> ValidationResult<()> {
    let tax_id = tax_id.trim().to_uppercase();

    if tax_id.is_empty() {
        return Err(ValidationError::Required {
            field: "tax_id".to_string(),
        });
    }

    if !tax_id_pattern().is_match(&tax_id) {
        return Err(ValidationError::InvalidFormat {
            field: "tax_id".to_string(),
            reason: "not a valid NIF/CIF".to_string(),
        });
    }

    Ok(())
}

/// Validates an IBAN shape.
///
/// Spaces are stripped before matching (forms commonly group IBANs in
/// blocks of four). Country code + 2 check digits + 10..30 alphanumerics.
pub fn validate_iban(iban: &str) -> ValidationResult<()> {
    let compact: String = iban
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "bank_account".to_string(),
        });
    }

    if compact.len() > 34 || !iban_pattern().is_match(&compact) {
        return Err(ValidationError::InvalidFormat {
            field: "bank_account".to_string(),
            reason: "not a valid IBAN".to_string(),
        });
    }

    Ok(())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (the caller decides what to do with short queries)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (samples and promotional items)
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_code() {
        assert!(validate_code("FARM-001").is_ok());
        assert!(validate_code("ABC123").is_ok());
        assert!(validate_code("product_1").is_ok());

        assert!(validate_code("").is_err());
        assert!(validate_code("   ").is_err());
        assert!(validate_code("has space").is_err());
        assert!(validate_code(&"A".repeat(21)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Farmacia Sur").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("pedidos@farmaciasur.es").is_ok());
        assert!(validate_email("a@b.co").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@signs.es").is_err());
        assert!(validate_email("spaces in@mail.es").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("958123456").is_ok());
        assert!(validate_phone("+34 958 12 34 56").is_ok());
        assert!(validate_phone("(958) 12-34-56").is_ok());

        assert!(validate_phone("").is_err());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("abc123456789").is_err());
    }

    #[test]
    fn test_validate_tax_id() {
        // NIF: 8 digits + letter
        assert!(validate_tax_id("12345678Z").is_ok());
        assert!(validate_tax_id("12345678z").is_ok());
        // CIF: letter + 7 digits + control
        assert!(validate_tax_id("B1234567A").is_ok());
        assert!(validate_tax_id("A12345674").is_ok());

        assert!(validate_tax_id("").is_err());
        assert!(validate_tax_id("1234").is_err());
        assert!(validate_tax_id("123456789").is_err());
    }

    #[test]
    fn test_validate_iban() {
        assert!(validate_iban("ES9121000418450200051332").is_ok());
        assert!(validate_iban("ES91 2100 0418 4502 0005 1332").is_ok());
        assert!(validate_iban("es9121000418450200051332").is_ok());

        assert!(validate_iban("").is_err());
        assert!(validate_iban("ES91").is_err());
        assert!(validate_iban("9121000418450200051332ES").is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("  ibuprofeno  ").unwrap(), "ibuprofeno");
        assert_eq!(validate_search_query("").unwrap(), "");
        assert!(validate_search_query(&"q".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_cents() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(1099).is_ok());
        assert!(validate_price_cents(-100).is_err());
    }
}
