use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::assignment_dto::AssignmentHistoryResponse;
use crate::dto::order_dto::{
    ApiResponse, AssignResourceRequest, CreateOrderRequest, OrderFilters, OrderResponse,
    QuoteActionRequest, UpdateOrderRequest,
};
use crate::models::assignment_history::{AssignmentEvent, ResourceType};
use crate::models::directory::UserAccount;
use crate::models::order::{generate_trip_number, Order, TripStatus};
use crate::repositories::assignment_history_repository::AssignmentHistoryRepository;
use crate::repositories::directory_repository::DirectoryRepository;
use crate::repositories::order_repository::OrderRepository;
use crate::utils::errors::{forbidden_error, is_unique_violation, not_found_error, AppError};
use validator::ValidationErrors;

/// Servicio de orquestación de órdenes: ciclo de vida, asignación de
/// recursos y escritura del historial de asignaciones.
pub struct OrderController {
    repository: OrderRepository,
    history: AssignmentHistoryRepository,
    directory: DirectoryRepository,
}

impl OrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OrderRepository::new(pool.clone()),
            history: AssignmentHistoryRepository::new(pool.clone()),
            directory: DirectoryRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, AppError> {
        let today = Utc::now().date_naive();
        request.validate_business(today)?;

        // Verificar que el cliente existe en el directorio
        self.directory
            .get_customer(request.customer_id)
            .await?
            .ok_or_else(|| not_found_error("Customer", &request.customer_id.to_string()))?;

        let now = Utc::now();
        let order = Order {
            id: Uuid::new_v4(),
            trip_number: generate_trip_number(today),
            customer_id: request.customer_id,
            sales_person_id: request.sales_person_id,
            operation_person_id: None,
            fleet_person_id: None,
            customs_person_id: None,
            assigned_vehicle_id: None,
            assigned_trailer_id: None,
            assigned_driver_id: None,
            cargo_width_m: request.cargo_width_m,
            cargo_length_m: request.cargo_length_m,
            cargo_height_m: request.cargo_height_m,
            cargo_weight_kg: request.cargo_weight_kg,
            departure_address: request.departure_address,
            departure_city: request.departure_city,
            departure_country: request.departure_country,
            arrival_address: request.arrival_address,
            arrival_city: request.arrival_city,
            arrival_country: request.arrival_country,
            loading_date: request.loading_date,
            deadline_date: request.deadline_date,
            estimated_arrival_date: request.estimated_arrival_date,
            quote_price: request.quote_price,
            actual_price: None,
            supply_type: request.supply_type,
            trip_status: TripStatus::Quote.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };

        let created = match self.repository.create(&order).await {
            Ok(created) => created,
            Err(AppError::Database(e)) if is_unique_violation(&e) => {
                return Err(AppError::Conflict(format!(
                    "Order with trip number '{}' already exists",
                    order.trip_number
                )));
            }
            Err(e) => return Err(e),
        };

        Ok(ApiResponse::success_with_message(
            created.into(),
            "Orden creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<OrderResponse, AppError> {
        let order = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Order", &id.to_string()))?;

        Ok(self.decorate(order).await)
    }

    pub async fn list(&self) -> Result<Vec<OrderResponse>, AppError> {
        let orders = self.repository.find_all().await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn search(&self, filters: OrderFilters) -> Result<Vec<OrderResponse>, AppError> {
        if let Some(status) = &filters.trip_status {
            if TripStatus::parse(status).is_none() {
                return Err(AppError::BadRequest(format!(
                    "Unknown trip_status filter '{}'",
                    status
                )));
            }
        }

        let orders = self.repository.search(&filters).await?;
        Ok(orders.into_iter().map(OrderResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Order", &id.to_string()))?;

        let today = Utc::now().date_naive();
        request.validate_business(today)?;
        if let Err(e) = request.validate_status_change() {
            let mut errors = ValidationErrors::new();
            errors.add("trip_status", e);
            return Err(AppError::Validation(errors));
        }

        let merged = request.apply_to(&current);
        let updated = self.repository.update(&merged).await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Orden actualizada exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Order", &id.to_string()))?;

        self.repository.delete(id).await?;
        Ok(())
    }

    /// Asignar un recurso operativo a la orden y registrar el evento en el
    /// historial. El fallo de la escritura del historial no revierte la
    /// asignación: se loggea y se traga (auditoría best-effort).
    pub async fn assign_resource(
        &self,
        order_id: Uuid,
        request: AssignResourceRequest,
    ) -> Result<ApiResponse<OrderResponse>, AppError> {
        let resource_type = ResourceType::parse(&request.resource_type).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown resource_type '{}'",
                request.resource_type
            ))
        })?;

        let order = self
            .repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| not_found_error("Order", &order_id.to_string()))?;

        let acting_user = self
            .directory
            .get_user(request.acting_user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &request.acting_user_id.to_string()))?;

        let resource_name = self
            .resource_label(resource_type, request.resource_id)
            .await?
            .ok_or_else(|| {
                not_found_error(resource_label_kind(resource_type), &request.resource_id.to_string())
            })?;

        let previous_value = match order.assigned_resource_id(resource_type) {
            Some(previous_id) => Some(
                self.resource_label(resource_type, previous_id)
                    .await
                    .ok()
                    .flatten()
                    .unwrap_or_else(|| previous_id.to_string()),
            ),
            None => None,
        };

        let updated = self
            .repository
            .update_assignment(order_id, resource_type, request.resource_id)
            .await?;

        let event = AssignmentEvent {
            order_id,
            resource_type,
            resource_id: request.resource_id,
            resource_name: resource_name.clone(),
            assigned_by_id: acting_user.id,
            assigned_by_name: acting_user.full_name,
            previous_value,
            new_value: resource_name,
            notes: request.notes,
        };

        if let Err(e) = self.history.create(&event).await {
            tracing::warn!(
                "No se pudo registrar el historial de asignación para la orden {}: {}",
                order_id,
                e
            );
        }

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Recurso asignado exitosamente".to_string(),
        ))
    }

    pub async fn approve_quote(
        &self,
        order_id: Uuid,
        request: QuoteActionRequest,
    ) -> Result<ApiResponse<OrderResponse>, AppError> {
        let order = self
            .load_order_for_quote_action(order_id, request.acting_user_id, "approve quote")
            .await?;

        order.status()?.ensure_quote_stage("approve quote")?;

        let updated = self
            .repository
            .update_status(order_id, TripStatus::QuoteApproved)
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Cotización aprobada exitosamente".to_string(),
        ))
    }

    pub async fn cancel_quote(
        &self,
        order_id: Uuid,
        request: QuoteActionRequest,
    ) -> Result<ApiResponse<OrderResponse>, AppError> {
        let order = self
            .load_order_for_quote_action(order_id, request.acting_user_id, "cancel quote")
            .await?;

        order.status()?.ensure_quote_stage("cancel quote")?;

        let updated = self
            .repository
            .update_status(order_id, TripStatus::Cancelled)
            .await?;

        Ok(ApiResponse::success_with_message(
            updated.into(),
            "Cotización cancelada exitosamente".to_string(),
        ))
    }

    pub async fn history(&self, order_id: Uuid) -> Result<Vec<AssignmentHistoryResponse>, AppError> {
        let entries = self.history.find_by_order(order_id).await?;
        Ok(entries.into_iter().map(AssignmentHistoryResponse::from).collect())
    }

    pub async fn history_by_type(
        &self,
        order_id: Uuid,
        resource_type: &str,
    ) -> Result<Vec<AssignmentHistoryResponse>, AppError> {
        let resource_type = ResourceType::parse(resource_type).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown resource_type '{}'", resource_type))
        })?;

        let entries = self
            .history
            .find_by_order_and_type(order_id, resource_type)
            .await?;
        Ok(entries.into_iter().map(AssignmentHistoryResponse::from).collect())
    }

    /// El guard de autorización se evalúa antes que el de estado: un
    /// usuario sin autoridad recibe Forbidden sea cual sea el estado
    async fn load_order_for_quote_action(
        &self,
        order_id: Uuid,
        acting_user_id: Uuid,
        operation: &str,
    ) -> Result<Order, AppError> {
        let acting_user: UserAccount = self
            .directory
            .get_user(acting_user_id)
            .await?
            .ok_or_else(|| not_found_error("User", &acting_user_id.to_string()))?;

        if !acting_user.can_approve_quotes {
            return Err(forbidden_error(
                operation,
                "user lacks quote approval authority",
            ));
        }

        let order = self
            .repository
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| not_found_error("Order", &order_id.to_string()))?;

        Ok(order)
    }

    /// Resolver los nombres de display contra el directorio, best-effort:
    /// un lookup fallido deja el campo vacío, nunca falla el detalle
    async fn decorate(&self, order: Order) -> OrderResponse {
        let customer_name = self
            .directory
            .get_customer(order.customer_id)
            .await
            .ok()
            .flatten()
            .map(|c| c.name);
        let sales_person_name = self.user_name(order.sales_person_id).await;
        let operation_person_name = self.user_name(order.operation_person_id).await;
        let fleet_person_name = self.user_name(order.fleet_person_id).await;
        let customs_person_name = self.user_name(order.customs_person_id).await;

        let assigned_driver_name = match order.assigned_driver_id {
            Some(id) => self
                .directory
                .get_driver(id)
                .await
                .ok()
                .flatten()
                .map(|d| d.full_name),
            None => None,
        };
        let assigned_vehicle_plate = match order.assigned_vehicle_id {
            Some(id) => self
                .directory
                .get_vehicle(id)
                .await
                .ok()
                .flatten()
                .map(|v| v.plate_number),
            None => None,
        };
        let assigned_trailer_number = match order.assigned_trailer_id {
            Some(id) => self
                .directory
                .get_trailer(id)
                .await
                .ok()
                .flatten()
                .map(|t| t.trailer_number),
            None => None,
        };

        let mut response = OrderResponse::from(order);
        response.customer_name = customer_name;
        response.sales_person_name = sales_person_name;
        response.operation_person_name = operation_person_name;
        response.fleet_person_name = fleet_person_name;
        response.customs_person_name = customs_person_name;
        response.assigned_driver_name = assigned_driver_name;
        response.assigned_vehicle_plate = assigned_vehicle_plate;
        response.assigned_trailer_number = assigned_trailer_number;
        response
    }

    async fn user_name(&self, id: Option<Uuid>) -> Option<String> {
        match id {
            Some(id) => self
                .directory
                .get_user(id)
                .await
                .ok()
                .flatten()
                .map(|u| u.full_name),
            None => None,
        }
    }

    /// Etiqueta legible del recurso en el directorio: nombre completo para
    /// personas y conductores, matrícula para vehículos, número para
    /// remolques. Ok(None) si el id no resuelve.
    async fn resource_label(
        &self,
        resource_type: ResourceType,
        id: Uuid,
    ) -> Result<Option<String>, AppError> {
        let label = match resource_type {
            ResourceType::Driver => self.directory.get_driver(id).await?.map(|d| d.full_name),
            ResourceType::Vehicle => self.directory.get_vehicle(id).await?.map(|v| v.plate_number),
            ResourceType::Trailer => self.directory.get_trailer(id).await?.map(|t| t.trailer_number),
            ResourceType::OperationPerson
            | ResourceType::FleetPerson
            | ResourceType::CustomsPerson => {
                self.directory.get_user(id).await?.map(|u| u.full_name)
            }
        };

        Ok(label)
    }
}

fn resource_label_kind(resource_type: ResourceType) -> &'static str {
    match resource_type {
        ResourceType::Driver => "Driver",
        ResourceType::Vehicle => "Vehicle",
        ResourceType::Trailer => "Trailer",
        ResourceType::OperationPerson | ResourceType::FleetPerson | ResourceType::CustomsPerson => {
            "User"
        }
    }
}
