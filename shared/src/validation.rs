//! Validation utilities for the POS+ dashboard
//!
//! Includes Venezuela-specific checks for customer records.

use rust_decimal::Decimal;

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate a product or category name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > 120 {
        return Err("Name must be at most 120 characters");
    }
    Ok(())
}

/// Validate a unit price in dollars
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price.scale() > 2 && price.round_dp(2) != price {
        return Err("Price must have at most two decimals");
    }
    Ok(())
}

/// Parse a price typed into a form field
pub fn parse_price(raw: &str) -> Result<Decimal, &'static str> {
    let price: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| "Price must be a number")?;
    validate_price(price)?;
    Ok(price)
}

/// Validate an on-hand quantity
pub fn validate_stock_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Stock cannot be negative");
    }
    Ok(())
}

/// Validate a category badge color (`#rrggbb`)
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    let valid = color.len() == 7
        && color.starts_with('#')
        && color[1..].chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(())
    } else {
        Err("Color must be a hex value like #10b981")
    }
}

// ============================================================================
// Customer Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Normalize a cédula: strip separators and an optional V-/E- prefix
pub fn normalize_cedula(cedula: &str) -> String {
    let upper = cedula.trim().to_ascii_uppercase();
    let body = upper
        .strip_prefix('V')
        .or_else(|| upper.strip_prefix('E'))
        .unwrap_or(&upper);
    body.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a Venezuelan cédula de identidad
/// Accepts: 12345678, V-12345678, E-81234567, 12.345.678
pub fn validate_cedula(cedula: &str) -> Result<(), &'static str> {
    let digits = normalize_cedula(cedula);
    if digits.len() < 6 || digits.len() > 9 {
        return Err("Cédula must have between 6 and 9 digits");
    }
    Ok(())
}

/// Validate a Venezuelan phone number
/// Accepts: 04141234567, 0414-123-4567, +584141234567
pub fn validate_ve_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Local format: 11 digits starting with 0 (e.g., 04141234567)
    if digits.len() == 11 && digits.starts_with('0') {
        return Ok(());
    }

    // International format: 58 + 10 digits
    if digits.len() == 12 && digits.starts_with("58") {
        return Ok(());
    }

    Err("Invalid phone number format")
}
