use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::order_dto::OrderFilters;
use crate::models::assignment_history::ResourceType;
use crate::models::order::{Order, TripStatus};
use crate::utils::errors::AppError;

pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, order: &Order) -> Result<Order, AppError> {
        let created = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (
                id, trip_number, customer_id, sales_person_id, operation_person_id,
                fleet_person_id, customs_person_id, assigned_vehicle_id, assigned_trailer_id,
                assigned_driver_id, cargo_width_m, cargo_length_m, cargo_height_m,
                cargo_weight_kg, departure_address, departure_city, departure_country,
                arrival_address, arrival_city, arrival_country, loading_date, deadline_date,
                estimated_arrival_date, quote_price, actual_price, supply_type, trip_status,
                created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29
            )
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(&order.trip_number)
        .bind(order.customer_id)
        .bind(order.sales_person_id)
        .bind(order.operation_person_id)
        .bind(order.fleet_person_id)
        .bind(order.customs_person_id)
        .bind(order.assigned_vehicle_id)
        .bind(order.assigned_trailer_id)
        .bind(order.assigned_driver_id)
        .bind(order.cargo_width_m)
        .bind(order.cargo_length_m)
        .bind(order.cargo_height_m)
        .bind(order.cargo_weight_kg)
        .bind(&order.departure_address)
        .bind(&order.departure_city)
        .bind(&order.departure_country)
        .bind(&order.arrival_address)
        .bind(&order.arrival_city)
        .bind(&order.arrival_country)
        .bind(order.loading_date)
        .bind(order.deadline_date)
        .bind(order.estimated_arrival_date)
        .bind(order.quote_price)
        .bind(order.actual_price)
        .bind(&order.supply_type)
        .bind(&order.trip_status)
        .bind(order.created_at)
        .bind(order.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    pub async fn find_all(&self) -> Result<Vec<Order>, AppError> {
        let orders =
            sqlx::query_as::<_, Order>("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        Ok(orders)
    }

    pub async fn search(&self, filters: &OrderFilters) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT * FROM orders
            WHERE ($1::uuid IS NULL OR customer_id = $1)
              AND ($2::uuid IS NULL OR sales_person_id = $2)
              AND ($3::uuid IS NULL OR fleet_person_id = $3)
              AND ($4::text IS NULL OR trip_status = $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(filters.customer_id)
        .bind(filters.sales_person_id)
        .bind(filters.fleet_person_id)
        .bind(&filters.trip_status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Persistir una orden ya mergeada (ver UpdateOrderRequest::apply_to)
    pub async fn update(&self, order: &Order) -> Result<Order, AppError> {
        let updated = sqlx::query_as::<_, Order>(
            r#"
            UPDATE orders
            SET cargo_width_m = $2, cargo_length_m = $3, cargo_height_m = $4,
                cargo_weight_kg = $5, departure_address = $6, departure_city = $7,
                departure_country = $8, arrival_address = $9, arrival_city = $10,
                arrival_country = $11, loading_date = $12, deadline_date = $13,
                estimated_arrival_date = $14, quote_price = $15, actual_price = $16,
                supply_type = $17, trip_status = $18, updated_at = $19
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order.id)
        .bind(order.cargo_width_m)
        .bind(order.cargo_length_m)
        .bind(order.cargo_height_m)
        .bind(order.cargo_weight_kg)
        .bind(&order.departure_address)
        .bind(&order.departure_city)
        .bind(&order.departure_country)
        .bind(&order.arrival_address)
        .bind(&order.arrival_city)
        .bind(&order.arrival_country)
        .bind(order.loading_date)
        .bind(order.deadline_date)
        .bind(order.estimated_arrival_date)
        .bind(order.quote_price)
        .bind(order.actual_price)
        .bind(&order.supply_type)
        .bind(&order.trip_status)
        .bind(order.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Cambio de estado atómico: trip_status y updated_at en un solo UPDATE
    pub async fn update_status(&self, id: Uuid, status: TripStatus) -> Result<Order, AppError> {
        let updated = sqlx::query_as::<_, Order>(
            "UPDATE orders SET trip_status = $2, updated_at = $3 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Actualizar la columna de asignación correspondiente al tipo de recurso
    pub async fn update_assignment(
        &self,
        id: Uuid,
        resource_type: ResourceType,
        resource_id: Uuid,
    ) -> Result<Order, AppError> {
        let sql = match resource_type {
            ResourceType::Driver => {
                "UPDATE orders SET assigned_driver_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ResourceType::Vehicle => {
                "UPDATE orders SET assigned_vehicle_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ResourceType::Trailer => {
                "UPDATE orders SET assigned_trailer_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ResourceType::OperationPerson => {
                "UPDATE orders SET operation_person_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ResourceType::FleetPerson => {
                "UPDATE orders SET fleet_person_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
            ResourceType::CustomsPerson => {
                "UPDATE orders SET customs_person_id = $2, updated_at = $3 WHERE id = $1 RETURNING *"
            }
        };

        let updated = sqlx::query_as::<_, Order>(sql)
            .bind(id)
            .bind(resource_id)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(updated)
    }

    /// Borrado físico de la orden; el historial de asignaciones no tiene FK
    /// y sobrevive por order_id
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
