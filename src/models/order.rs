//! Modelo de Order (trip)
//!
//! Este módulo contiene el struct Order, el ciclo de vida tripStatus
//! y la lógica de merge para actualizaciones parciales.
//! Mapea exactamente a la tabla orders con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rand::{distributions::Alphanumeric, Rng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::assignment_history::ResourceType;
use crate::utils::errors::{invalid_state_error, AppError, AppResult};

/// Estado del ciclo de vida de una orden - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Quote,
    QuoteApproved,
    Departed,
    Delivered,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Quote => "quote",
            TripStatus::QuoteApproved => "quote_approved",
            TripStatus::Departed => "departed",
            TripStatus::Delivered => "delivered",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quote" => Some(TripStatus::Quote),
            "quote_approved" => Some(TripStatus::QuoteApproved),
            "departed" => Some(TripStatus::Departed),
            "delivered" => Some(TripStatus::Delivered),
            "cancelled" => Some(TripStatus::Cancelled),
            _ => None,
        }
    }

    /// Nombre legible para mostrar en la UI
    pub fn display_name(&self) -> &'static str {
        match self {
            TripStatus::Quote => "Quote Stage",
            TripStatus::QuoteApproved => "Quote Approved",
            TripStatus::Departed => "Departed",
            TripStatus::Delivered => "Delivered",
            TripStatus::Cancelled => "Cancelled",
        }
    }

    /// Guard de las operaciones approve/cancel: solo válidas desde 'quote'.
    /// Las transiciones hacia departed/delivered van por el update genérico
    /// sin guard (comportamiento permisivo documentado en DESIGN.md).
    pub fn ensure_quote_stage(&self, operation: &str) -> AppResult<()> {
        if *self != TripStatus::Quote {
            return Err(invalid_state_error(operation, self.as_str()));
        }
        Ok(())
    }
}

/// Order principal - mapea exactamente a la tabla orders
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub trip_number: String,
    pub customer_id: Uuid,
    pub sales_person_id: Option<Uuid>,
    pub operation_person_id: Option<Uuid>,
    pub fleet_person_id: Option<Uuid>,
    pub customs_person_id: Option<Uuid>,
    pub assigned_vehicle_id: Option<Uuid>,
    pub assigned_trailer_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub cargo_width_m: Option<Decimal>,
    pub cargo_length_m: Option<Decimal>,
    pub cargo_height_m: Option<Decimal>,
    pub cargo_weight_kg: Option<Decimal>,
    pub departure_address: Option<String>,
    pub departure_city: Option<String>,
    pub departure_country: Option<String>,
    pub arrival_address: Option<String>,
    pub arrival_city: Option<String>,
    pub arrival_country: Option<String>,
    pub loading_date: Option<NaiveDate>,
    pub deadline_date: Option<NaiveDate>,
    pub estimated_arrival_date: Option<NaiveDate>,
    pub quote_price: Option<Decimal>,
    pub actual_price: Option<Decimal>,
    pub supply_type: Option<String>,
    pub trip_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Parsear el estado persistido; un valor desconocido es corrupción de datos
    pub fn status(&self) -> AppResult<TripStatus> {
        TripStatus::parse(&self.trip_status).ok_or_else(|| {
            AppError::Internal(format!("unknown trip_status '{}'", self.trip_status))
        })
    }

    /// Columna de asignación que corresponde a cada tipo de recurso
    pub fn assigned_resource_id(&self, resource_type: ResourceType) -> Option<Uuid> {
        match resource_type {
            ResourceType::Driver => self.assigned_driver_id,
            ResourceType::Vehicle => self.assigned_vehicle_id,
            ResourceType::Trailer => self.assigned_trailer_id,
            ResourceType::OperationPerson => self.operation_person_id,
            ResourceType::FleetPerson => self.fleet_person_id,
            ResourceType::CustomsPerson => self.customs_person_id,
        }
    }
}

/// Generar un número de trip legible: TRP-YYYYMMDD-XXXXXX
pub fn generate_trip_number(date: NaiveDate) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect();
    format!("TRP-{}-{}", date.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trip_status_round_trip() {
        for status in [
            TripStatus::Quote,
            TripStatus::QuoteApproved,
            TripStatus::Departed,
            TripStatus::Delivered,
            TripStatus::Cancelled,
        ] {
            assert_eq!(TripStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TripStatus::parse("unknown"), None);
    }

    #[test]
    fn test_trip_status_display_name() {
        assert_eq!(TripStatus::Quote.display_name(), "Quote Stage");
        assert_eq!(TripStatus::QuoteApproved.display_name(), "Quote Approved");
    }

    #[test]
    fn test_ensure_quote_stage_only_from_quote() {
        assert!(TripStatus::Quote.ensure_quote_stage("approve quote").is_ok());

        for status in [
            TripStatus::QuoteApproved,
            TripStatus::Departed,
            TripStatus::Delivered,
            TripStatus::Cancelled,
        ] {
            let err = status.ensure_quote_stage("approve quote").unwrap_err();
            assert!(matches!(err, AppError::InvalidState(_)));
        }
    }

    #[test]
    fn test_generate_trip_number_format() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let number = generate_trip_number(date);
        assert!(number.starts_with("TRP-20250610-"));
        assert_eq!(number.len(), "TRP-20250610-".len() + 6);
    }
}
