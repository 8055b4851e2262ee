//! DTOs de Alert
//!
//! Requests de triaje y responses de la API de alertas.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::alert::Alert;

/// Response de alerta para la API
#[derive(Debug, Serialize)]
pub struct AlertResponse {
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

impl From<Alert> for AlertResponse {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            alert_type: alert.alert_type,
            priority: alert.priority,
            title: alert.title,
            description: alert.description,
            related_entity_type: alert.related_entity_type,
            related_entity_id: alert.related_entity_id,
            expiry_date: alert.expiry_date,
            alert_date: alert.alert_date,
            is_active: alert.is_active,
            is_read: alert.is_read,
            created_at: alert.created_at,
            read_at: alert.read_at,
            assigned_to_user: alert.assigned_to_user,
            deactivated_by: alert.deactivated_by,
            deactivated_at: alert.deactivated_at,
        }
    }
}

/// Request para asignar una alerta a un usuario
#[derive(Debug, Deserialize)]
pub struct AssignAlertRequest {
    pub user_id: Uuid,
}

/// Request para desactivar una alerta
#[derive(Debug, Deserialize)]
pub struct DeactivateAlertRequest {
    pub acting_user_id: Uuid,
}

/// Contador de alertas no leídas
#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// Resumen de un escaneo: alertas creadas por categoría
#[derive(Debug, Default, Serialize)]
pub struct ScanSummaryResponse {
    pub visa_alerts_created: u32,
    pub license_alerts_created: u32,
    pub inspection_alerts_created: u32,
    pub entities_skipped: u32,
}
