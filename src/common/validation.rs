// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// ---
// Validações customizadas usadas pelos payloads (via `#[validate(custom(...))]`)
// ---

/// Campo obrigatório: não pode ficar vazio depois do trim.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo é obrigatório.".into());
        return Err(err);
    }
    Ok(())
}

/// Valor monetário estritamente positivo.
pub fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

/// Trim de campos opcionais de texto livre; ausente vira string vazia.
pub fn trimmed(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
        assert!(validate_not_blank(" Ana ").is_ok());
    }

    #[test]
    fn zero_and_negative_values_are_rejected() {
        assert!(validate_positive(&Decimal::ZERO).is_err());
        assert!(validate_positive(&Decimal::new(-1, 0)).is_err());
        assert!(validate_positive(&Decimal::new(1, 2)).is_ok());
    }

    #[test]
    fn trimmed_defaults_to_empty() {
        assert_eq!(trimmed(None), "");
        assert_eq!(trimmed(Some("  ABC-1234 ")), "ABC-1234");
    }
}
