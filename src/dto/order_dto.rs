//! DTOs de Order
//!
//! Requests y responses de la API de órdenes, incluida la lógica de
//! merge parcial (PATCH) y la validación de campos de negocio.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use crate::models::order::{Order, TripStatus};
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_date_order, validate_non_negative, validate_not_past};

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

/// Request para crear una nueva orden
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_id: Uuid,
    pub sales_person_id: Option<Uuid>,
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
    pub supply_type: Option<String>,
}

/// Request para actualizar una orden existente.
/// Solo los campos presentes sobreescriben los valores actuales.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateOrderRequest {
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
    pub trip_status: Option<TripStatus>,
}

impl UpdateOrderRequest {
    /// Merge parcial sobre la orden actual: los campos no provistos
    /// conservan su valor y updated_at se sella siempre
    pub fn apply_to(&self, current: &Order) -> Order {
        Order {
            id: current.id,
            trip_number: current.trip_number.clone(),
            customer_id: current.customer_id,
            sales_person_id: current.sales_person_id,
            operation_person_id: current.operation_person_id,
            fleet_person_id: current.fleet_person_id,
            customs_person_id: current.customs_person_id,
            assigned_vehicle_id: current.assigned_vehicle_id,
            assigned_trailer_id: current.assigned_trailer_id,
            assigned_driver_id: current.assigned_driver_id,
            cargo_width_m: self.cargo_width_m.or(current.cargo_width_m),
            cargo_length_m: self.cargo_length_m.or(current.cargo_length_m),
            cargo_height_m: self.cargo_height_m.or(current.cargo_height_m),
            cargo_weight_kg: self.cargo_weight_kg.or(current.cargo_weight_kg),
            departure_address: self
                .departure_address
                .clone()
                .or_else(|| current.departure_address.clone()),
            departure_city: self
                .departure_city
                .clone()
                .or_else(|| current.departure_city.clone()),
            departure_country: self
                .departure_country
                .clone()
                .or_else(|| current.departure_country.clone()),
            arrival_address: self
                .arrival_address
                .clone()
                .or_else(|| current.arrival_address.clone()),
            arrival_city: self
                .arrival_city
                .clone()
                .or_else(|| current.arrival_city.clone()),
            arrival_country: self
                .arrival_country
                .clone()
                .or_else(|| current.arrival_country.clone()),
            loading_date: self.loading_date.or(current.loading_date),
            deadline_date: self.deadline_date.or(current.deadline_date),
            estimated_arrival_date: self
                .estimated_arrival_date
                .or(current.estimated_arrival_date),
            quote_price: self.quote_price.or(current.quote_price),
            actual_price: self.actual_price.or(current.actual_price),
            supply_type: self
                .supply_type
                .clone()
                .or_else(|| current.supply_type.clone()),
            trip_status: self
                .trip_status
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| current.trip_status.clone()),
            created_at: current.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Validar fechas de negocio y dimensiones de carga antes de persistir.
/// Devuelve todas las violaciones juntas, identificando cada campo.
pub fn validate_order_fields(
    loading_date: Option<NaiveDate>,
    deadline_date: Option<NaiveDate>,
    estimated_arrival_date: Option<NaiveDate>,
    dimensions: &[(&'static str, Option<Decimal>)],
    today: NaiveDate,
) -> Result<(), AppError> {
    let mut errors = ValidationErrors::new();

    let dates: [(&'static str, Option<NaiveDate>); 3] = [
        ("loading_date", loading_date),
        ("deadline_date", deadline_date),
        ("estimated_arrival_date", estimated_arrival_date),
    ];
    for (field, date) in dates {
        if let Some(date) = date {
            if let Err(e) = validate_not_past(date, today) {
                errors.add(field, e);
            }
        }
    }

    if let (Some(loading), Some(deadline)) = (loading_date, deadline_date) {
        if let Err(e) = validate_date_order(loading, deadline) {
            errors.add("deadline_date", e);
        }
    }

    for &(field, value) in dimensions {
        if let Some(value) = value {
            if let Err(e) = validate_non_negative(value) {
                errors.add(field, e);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

impl CreateOrderRequest {
    pub fn validate_business(&self, today: NaiveDate) -> Result<(), AppError> {
        validate_order_fields(
            self.loading_date,
            self.deadline_date,
            self.estimated_arrival_date,
            &[
                ("cargo_width_m", self.cargo_width_m),
                ("cargo_length_m", self.cargo_length_m),
                ("cargo_height_m", self.cargo_height_m),
                ("cargo_weight_kg", self.cargo_weight_kg),
            ],
            today,
        )
    }
}

impl UpdateOrderRequest {
    pub fn validate_business(&self, today: NaiveDate) -> Result<(), AppError> {
        validate_order_fields(
            self.loading_date,
            self.deadline_date,
            self.estimated_arrival_date,
            &[
                ("cargo_width_m", self.cargo_width_m),
                ("cargo_length_m", self.cargo_length_m),
                ("cargo_height_m", self.cargo_height_m),
                ("cargo_weight_kg", self.cargo_weight_kg),
            ],
            today,
        )
    }

    /// Un cambio de estado directo a quote_approved/cancelled saltaría el
    /// guard de autorización; esos estados solo se alcanzan por
    /// approve-quote / cancel-quote
    pub fn validate_status_change(&self) -> Result<(), ValidationError> {
        if let Some(status) = self.trip_status {
            if matches!(status, TripStatus::QuoteApproved | TripStatus::Cancelled) {
                let mut error = ValidationError::new("guarded_status");
                error.add_param("status".into(), &status.as_str());
                return Err(error);
            }
        }
        Ok(())
    }
}

/// Request para asignar un recurso operativo a una orden
#[derive(Debug, Deserialize)]
pub struct AssignResourceRequest {
    pub resource_type: String,
    pub resource_id: Uuid,
    pub acting_user_id: Uuid,
    pub notes: Option<String>,
}

/// Request para aprobar o cancelar la cotización de una orden
#[derive(Debug, Deserialize)]
pub struct QuoteActionRequest {
    pub acting_user_id: Uuid,
}

/// Filtros para búsqueda de órdenes
#[derive(Debug, Default, Deserialize)]
pub struct OrderFilters {
    pub customer_id: Option<Uuid>,
    pub sales_person_id: Option<Uuid>,
    pub fleet_person_id: Option<Uuid>,
    pub trip_status: Option<String>,
}

/// Response de orden para la API
#[derive(Debug, Serialize)]
pub struct OrderResponse {
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
    pub trip_status_display: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // Campos de display resueltos contra el directorio (solo en el detalle)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fleet_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customs_person_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_vehicle_plate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_trailer_number: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let trip_status_display = TripStatus::parse(&order.trip_status)
            .map(|s| s.display_name().to_string())
            .unwrap_or_else(|| order.trip_status.clone());

        Self {
            id: order.id,
            trip_number: order.trip_number,
            customer_id: order.customer_id,
            sales_person_id: order.sales_person_id,
            operation_person_id: order.operation_person_id,
            fleet_person_id: order.fleet_person_id,
            customs_person_id: order.customs_person_id,
            assigned_vehicle_id: order.assigned_vehicle_id,
            assigned_trailer_id: order.assigned_trailer_id,
            assigned_driver_id: order.assigned_driver_id,
            cargo_width_m: order.cargo_width_m,
            cargo_length_m: order.cargo_length_m,
            cargo_height_m: order.cargo_height_m,
            cargo_weight_kg: order.cargo_weight_kg,
            departure_address: order.departure_address,
            departure_city: order.departure_city,
            departure_country: order.departure_country,
            arrival_address: order.arrival_address,
            arrival_city: order.arrival_city,
            arrival_country: order.arrival_country,
            loading_date: order.loading_date,
            deadline_date: order.deadline_date,
            estimated_arrival_date: order.estimated_arrival_date,
            quote_price: order.quote_price,
            actual_price: order.actual_price,
            supply_type: order.supply_type,
            trip_status: order.trip_status,
            trip_status_display,
            created_at: order.created_at,
            updated_at: order.updated_at,
            customer_name: None,
            sales_person_name: None,
            operation_person_name: None,
            fleet_person_name: None,
            customs_person_name: None,
            assigned_driver_name: None,
            assigned_vehicle_plate: None,
            assigned_trailer_number: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_order() -> Order {
        Order {
            id: Uuid::new_v4(),
            trip_number: "TRP-20250610-ABC123".to_string(),
            customer_id: Uuid::new_v4(),
            sales_person_id: None,
            operation_person_id: None,
            fleet_person_id: None,
            customs_person_id: None,
            assigned_vehicle_id: None,
            assigned_trailer_id: None,
            assigned_driver_id: None,
            cargo_width_m: Some(Decimal::new(250, 2)),
            cargo_length_m: None,
            cargo_height_m: None,
            cargo_weight_kg: Some(Decimal::new(12000, 0)),
            departure_address: None,
            departure_city: Some("Madrid".to_string()),
            departure_country: Some("ES".to_string()),
            arrival_address: None,
            arrival_city: Some("Lyon".to_string()),
            arrival_country: Some("FR".to_string()),
            loading_date: Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
            deadline_date: Some(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()),
            estimated_arrival_date: None,
            quote_price: Some(Decimal::new(180000, 2)),
            actual_price: None,
            supply_type: None,
            trip_status: "quote".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_partial_update_keeps_unset_fields() {
        let current = base_order();
        let update = UpdateOrderRequest {
            cargo_weight_kg: Some(Decimal::new(14500, 0)),
            ..Default::default()
        };

        let merged = update.apply_to(&current);

        assert_eq!(merged.cargo_weight_kg, Some(Decimal::new(14500, 0)));
        assert_eq!(merged.departure_city, Some("Madrid".to_string()));
        assert_eq!(merged.arrival_city, Some("Lyon".to_string()));
        assert_eq!(merged.cargo_width_m, current.cargo_width_m);
        assert_eq!(merged.trip_status, "quote");
        assert_eq!(merged.created_at, current.created_at);
        assert!(merged.updated_at >= current.updated_at);
    }

    #[test]
    fn test_partial_update_sets_status() {
        let current = base_order();
        let update = UpdateOrderRequest {
            trip_status: Some(TripStatus::Departed),
            ..Default::default()
        };

        let merged = update.apply_to(&current);
        assert_eq!(merged.trip_status, "departed");
    }

    #[test]
    fn test_validate_rejects_deadline_before_loading() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let update = UpdateOrderRequest {
            loading_date: Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
            deadline_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            ..Default::default()
        };

        let err = update.validate_business(today).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("deadline_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_past_dates() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let update = UpdateOrderRequest {
            loading_date: Some(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            ..Default::default()
        };

        assert!(update.validate_business(today).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_dimensions() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let update = UpdateOrderRequest {
            cargo_weight_kg: Some(Decimal::new(-500, 0)),
            ..Default::default()
        };

        let err = update.validate_business(today).unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert!(errors.field_errors().contains_key("cargo_weight_kg"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_valid_update() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let update = UpdateOrderRequest {
            loading_date: Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
            deadline_date: Some(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()),
            cargo_weight_kg: Some(Decimal::new(9000, 0)),
            ..Default::default()
        };

        assert!(update.validate_business(today).is_ok());
    }

    #[test]
    fn test_validate_status_change_blocks_guarded_states() {
        let update = UpdateOrderRequest {
            trip_status: Some(TripStatus::QuoteApproved),
            ..Default::default()
        };
        assert!(update.validate_status_change().is_err());

        let update = UpdateOrderRequest {
            trip_status: Some(TripStatus::Departed),
            ..Default::default()
        };
        assert!(update.validate_status_change().is_ok());
    }

    #[test]
    fn test_order_response_display_status() {
        let order = base_order();
        let response = OrderResponse::from(order);
        assert_eq!(response.trip_status_display, "Quote Stage");
    }
}
