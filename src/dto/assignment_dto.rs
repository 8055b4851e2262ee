//! DTOs del historial de asignaciones

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::assignment_history::OrderAssignmentHistory;

/// Response de una entrada del historial de asignaciones
#[derive(Debug, Serialize)]
pub struct AssignmentHistoryResponse {
    pub id: Uuid,
    pub order_id: Uuid,
    pub action: String,
    pub resource_type: String,
    pub resource_id: Uuid,
    pub resource_name: String,
    pub assigned_by_id: Uuid,
    pub assigned_by_name: String,
    pub assigned_at: DateTime<Utc>,
    pub previous_value: Option<String>,
    pub new_value: String,
    pub notes: Option<String>,
}

impl From<OrderAssignmentHistory> for AssignmentHistoryResponse {
    fn from(entry: OrderAssignmentHistory) -> Self {
        Self {
            id: entry.id,
            order_id: entry.order_id,
            action: entry.action,
            resource_type: entry.resource_type,
            resource_id: entry.resource_id,
            resource_name: entry.resource_name,
            assigned_by_id: entry.assigned_by_id,
            assigned_by_name: entry.assigned_by_name,
            assigned_at: entry.assigned_at,
            previous_value: entry.previous_value,
            new_value: entry.new_value,
            notes: entry.notes,
        }
    }
}
