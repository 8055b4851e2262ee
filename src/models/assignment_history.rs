//! Modelo de OrderAssignmentHistory
//!
//! Registro append-only de cada (re)asignación de recursos y personal
//! sobre una orden. Las filas nunca se actualizan ni se borran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tipo de recurso asignable a una orden - se persiste como TEXT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Driver,
    Vehicle,
    Trailer,
    OperationPerson,
    FleetPerson,
    CustomsPerson,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Driver => "driver",
            ResourceType::Vehicle => "vehicle",
            ResourceType::Trailer => "trailer",
            ResourceType::OperationPerson => "operation_person",
            ResourceType::FleetPerson => "fleet_person",
            ResourceType::CustomsPerson => "customs_person",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "driver" => Some(ResourceType::Driver),
            "vehicle" => Some(ResourceType::Vehicle),
            "trailer" => Some(ResourceType::Trailer),
            "operation_person" => Some(ResourceType::OperationPerson),
            "fleet_person" => Some(ResourceType::FleetPerson),
            "customs_person" => Some(ResourceType::CustomsPerson),
            _ => None,
        }
    }

    /// Etiqueta de la acción según el tipo y si había un valor previo:
    /// primera asignación = "... Assignment", reasignación = "... Change"
    pub fn action_label(&self, has_previous: bool) -> &'static str {
        match (self, has_previous) {
            (ResourceType::Driver, false) => "Driver Assignment",
            (ResourceType::Driver, true) => "Driver Change",
            (ResourceType::Vehicle, false) => "Vehicle Assignment",
            (ResourceType::Vehicle, true) => "Vehicle Change",
            (ResourceType::Trailer, false) => "Trailer Assignment",
            (ResourceType::Trailer, true) => "Trailer Change",
            (ResourceType::OperationPerson, false) => "Operation Person Assignment",
            (ResourceType::OperationPerson, true) => "Operation Person Change",
            (ResourceType::FleetPerson, false) => "Fleet Person Assignment",
            (ResourceType::FleetPerson, true) => "Fleet Person Change",
            (ResourceType::CustomsPerson, false) => "Customs Person Assignment",
            (ResourceType::CustomsPerson, true) => "Customs Person Change",
        }
    }
}

/// Fila del historial - mapea exactamente a la tabla order_assignment_history
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderAssignmentHistory {
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

/// Evento de asignación listo para persistir
#[derive(Debug, Clone)]
pub struct AssignmentEvent {
    pub order_id: Uuid,
    pub resource_type: ResourceType,
    pub resource_id: Uuid,
    pub resource_name: String,
    pub assigned_by_id: Uuid,
    pub assigned_by_name: String,
    pub previous_value: Option<String>,
    pub new_value: String,
    pub notes: Option<String>,
}

impl AssignmentEvent {
    pub fn action(&self) -> &'static str {
        self.resource_type.action_label(self.previous_value.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_round_trip() {
        for resource_type in [
            ResourceType::Driver,
            ResourceType::Vehicle,
            ResourceType::Trailer,
            ResourceType::OperationPerson,
            ResourceType::FleetPerson,
            ResourceType::CustomsPerson,
        ] {
            assert_eq!(ResourceType::parse(resource_type.as_str()), Some(resource_type));
        }
        assert_eq!(ResourceType::parse("pilot"), None);
    }

    #[test]
    fn test_action_label_assign_vs_change() {
        assert_eq!(ResourceType::Driver.action_label(false), "Driver Assignment");
        assert_eq!(ResourceType::Driver.action_label(true), "Driver Change");
        assert_eq!(ResourceType::Vehicle.action_label(false), "Vehicle Assignment");
        assert_eq!(ResourceType::Trailer.action_label(true), "Trailer Change");
        assert_eq!(
            ResourceType::CustomsPerson.action_label(false),
            "Customs Person Assignment"
        );
    }

    #[test]
    fn test_assignment_event_action() {
        let event = AssignmentEvent {
            order_id: Uuid::new_v4(),
            resource_type: ResourceType::FleetPerson,
            resource_id: Uuid::new_v4(),
            resource_name: "Marta Ruiz".to_string(),
            assigned_by_id: Uuid::new_v4(),
            assigned_by_name: "Admin".to_string(),
            previous_value: None,
            new_value: "Marta Ruiz".to_string(),
            notes: None,
        };
        assert_eq!(event.action(), "Fleet Person Assignment");

        let reassigned = AssignmentEvent {
            previous_value: Some("Luis Gil".to_string()),
            ..event
        };
        assert_eq!(reassigned.action(), "Fleet Person Change");
    }
}
