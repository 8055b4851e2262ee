//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de órdenes: fechas de negocio y dimensiones de carga.

use chrono::NaiveDate;
use uuid::Uuid;
use validator::ValidationError;

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que una fecha de negocio no esté en el pasado
pub fn validate_not_past(value: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if value < today {
        let mut error = ValidationError::new("date_in_past");
        error.add_param("value".into(), &value.to_string());
        error.add_param("today".into(), &today.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que la fecha límite no sea anterior a la fecha de carga
pub fn validate_date_order(
    loading_date: NaiveDate,
    deadline_date: NaiveDate,
) -> Result<(), ValidationError> {
    if deadline_date < loading_date {
        let mut error = ValidationError::new("deadline_before_loading");
        error.add_param("loading_date".into(), &loading_date.to_string());
        error.add_param("deadline_date".into(), &deadline_date.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + serde::Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_date() {
        let valid_date = "2024-01-15";
        assert!(validate_date(valid_date).is_ok());

        let invalid_date = "2024/01/15";
        assert!(validate_date(invalid_date).is_err());
    }

    #[test]
    fn test_validate_not_past() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert!(validate_not_past(today, today).is_ok());
        assert!(validate_not_past(today.succ_opt().unwrap(), today).is_ok());
        assert!(validate_not_past(today.pred_opt().unwrap(), today).is_err());
    }

    #[test]
    fn test_validate_date_order() {
        let loading = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        assert!(validate_date_order(loading, deadline).is_ok());
        assert!(validate_date_order(loading, loading).is_ok());
        assert!(validate_date_order(deadline, loading).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(Decimal::ZERO).is_ok());
        assert!(validate_non_negative(Decimal::new(2450, 2)).is_ok());
        assert!(validate_non_negative(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("TRP-001").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }
}
