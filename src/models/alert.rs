//! Modelo de Alert
//!
//! Alertas generadas por el escaneo periódico de documentos y revisiones
//! próximos a vencer. Las alertas se desactivan, nunca se borran.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de alerta - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VisaExpiring,
    LicenseExpiring,
    VehicleInspectionDue,
    InsuranceExpiring,
    ContractExpiring,
    PaymentDue,
    DocumentMissing,
    MaintenanceDue,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::VisaExpiring => "visa_expiring",
            AlertType::LicenseExpiring => "license_expiring",
            AlertType::VehicleInspectionDue => "vehicle_inspection_due",
            AlertType::InsuranceExpiring => "insurance_expiring",
            AlertType::ContractExpiring => "contract_expiring",
            AlertType::PaymentDue => "payment_due",
            AlertType::DocumentMissing => "document_missing",
            AlertType::MaintenanceDue => "maintenance_due",
        }
    }

    /// Días de antelación con los que la alerta debe empezar a mostrarse
    pub fn lead_time_days(&self) -> i64 {
        match self {
            AlertType::VisaExpiring | AlertType::LicenseExpiring => 30,
            AlertType::VehicleInspectionDue => 15,
            AlertType::InsuranceExpiring | AlertType::ContractExpiring => 30,
            AlertType::PaymentDue => 7,
            AlertType::DocumentMissing => 0,
            AlertType::MaintenanceDue => 15,
        }
    }
}

/// Prioridad de la alerta - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Low => "low",
            AlertPriority::Medium => "medium",
            AlertPriority::High => "high",
            AlertPriority::Critical => "critical",
        }
    }

    /// Prioridad según los días restantes hasta el vencimiento
    pub fn from_days_until_expiry(days: i64) -> Self {
        if days <= 0 {
            AlertPriority::Critical
        } else if days <= 7 {
            AlertPriority::High
        } else if days <= 30 {
            AlertPriority::Medium
        } else {
            AlertPriority::Low
        }
    }
}

/// Entidad a la que se refiere la alerta - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelatedEntityType {
    Driver,
    Vehicle,
    Trailer,
    Customer,
    Supplier,
}

impl RelatedEntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelatedEntityType::Driver => "driver",
            RelatedEntityType::Vehicle => "vehicle",
            RelatedEntityType::Trailer => "trailer",
            RelatedEntityType::Customer => "customer",
            RelatedEntityType::Supplier => "supplier",
        }
    }
}

/// Alert principal - mapea exactamente a la tabla alerts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Alert {
    pub id: Uuid,
    pub alert_type: String,
    pub priority: String,
    pub title: String,
    pub description: String,
    pub related_entity_type: String,
    pub related_entity_id: Uuid,
    pub expiry_date: NaiveDate,
    pub alert_date: NaiveDate,
    pub is_active: bool,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
    pub assigned_to_user: Option<Uuid>,
    pub deactivated_by: Option<Uuid>,
    pub deactivated_at: Option<DateTime<Utc>>,
}

/// Alerta nueva lista para insertar, derivada de un vencimiento detectado
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub alert_type: AlertType,
    pub priority: AlertPriority,
    pub title: String,
    pub description: String,
    pub related_entity_type: RelatedEntityType,
    pub related_entity_id: Uuid,
    pub expiry_date: NaiveDate,
    pub alert_date: NaiveDate,
}

impl NewAlert {
    /// Construir la alerta para un vencimiento: prioridad según los días
    /// restantes y alert_date = vencimiento menos el lead time del tipo
    pub fn for_expiry(
        alert_type: AlertType,
        related_entity_type: RelatedEntityType,
        related_entity_id: Uuid,
        entity_label: &str,
        expiry_date: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let days_until = (expiry_date - today).num_days();
        let priority = AlertPriority::from_days_until_expiry(days_until);
        let alert_date = expiry_date - Duration::days(alert_type.lead_time_days());

        let (title, description) = match alert_type {
            AlertType::VisaExpiring => (
                format!("Driver visa expiring: {}", entity_label),
                format!("The visa of driver {} expires on {}", entity_label, expiry_date),
            ),
            AlertType::LicenseExpiring => (
                format!("Driver license expiring: {}", entity_label),
                format!("The license of driver {} expires on {}", entity_label, expiry_date),
            ),
            AlertType::VehicleInspectionDue => (
                format!("Vehicle inspection due: {}", entity_label),
                format!("The inspection of vehicle {} expires on {}", entity_label, expiry_date),
            ),
            _ => (
                format!("{}: {}", alert_type.as_str(), entity_label),
                format!("{} expires on {}", entity_label, expiry_date),
            ),
        };

        Self {
            alert_type,
            priority,
            title,
            description,
            related_entity_type,
            related_entity_id,
            expiry_date,
            alert_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_boundaries() {
        assert_eq!(AlertPriority::from_days_until_expiry(-5), AlertPriority::Critical);
        assert_eq!(AlertPriority::from_days_until_expiry(0), AlertPriority::Critical);
        assert_eq!(AlertPriority::from_days_until_expiry(1), AlertPriority::High);
        assert_eq!(AlertPriority::from_days_until_expiry(7), AlertPriority::High);
        assert_eq!(AlertPriority::from_days_until_expiry(8), AlertPriority::Medium);
        assert_eq!(AlertPriority::from_days_until_expiry(30), AlertPriority::Medium);
        assert_eq!(AlertPriority::from_days_until_expiry(31), AlertPriority::Low);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(AlertPriority::Critical > AlertPriority::High);
        assert!(AlertPriority::High > AlertPriority::Medium);
        assert!(AlertPriority::Medium > AlertPriority::Low);
    }

    #[test]
    fn test_lead_time_days() {
        assert_eq!(AlertType::VisaExpiring.lead_time_days(), 30);
        assert_eq!(AlertType::LicenseExpiring.lead_time_days(), 30);
        assert_eq!(AlertType::VehicleInspectionDue.lead_time_days(), 15);
    }

    #[test]
    fn test_new_alert_for_expiry() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let driver_id = Uuid::new_v4();

        let alert = NewAlert::for_expiry(
            AlertType::VisaExpiring,
            RelatedEntityType::Driver,
            driver_id,
            "Juan Pérez",
            expiry,
            today,
        );

        // 19 días restantes -> medium; alert_date = expiry - 30 días
        assert_eq!(alert.priority, AlertPriority::Medium);
        assert_eq!(alert.alert_date, NaiveDate::from_ymd_opt(2025, 5, 21).unwrap());
        assert_eq!(alert.related_entity_id, driver_id);
        assert!(alert.title.contains("Juan Pérez"));
    }

    #[test]
    fn test_new_alert_past_expiry_is_critical() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2025, 5, 28).unwrap();

        let alert = NewAlert::for_expiry(
            AlertType::VehicleInspectionDue,
            RelatedEntityType::Vehicle,
            Uuid::new_v4(),
            "AB-123-CD",
            expiry,
            today,
        );

        assert_eq!(alert.priority, AlertPriority::Critical);
        assert_eq!(alert.alert_date, NaiveDate::from_ymd_opt(2025, 5, 13).unwrap());
    }
}
