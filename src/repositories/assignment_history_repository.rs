use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::assignment_history::{AssignmentEvent, OrderAssignmentHistory, ResourceType};
use crate::utils::errors::AppError;

/// Log append-only particionado por order_id. No existen operaciones
/// de update ni delete.
pub struct AssignmentHistoryRepository {
    pool: PgPool,
}

impl AssignmentHistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        event: &AssignmentEvent,
    ) -> Result<OrderAssignmentHistory, AppError> {
        let entry = sqlx::query_as::<_, OrderAssignmentHistory>(
            r#"
            INSERT INTO order_assignment_history (
                id, order_id, action, resource_type, resource_id, resource_name,
                assigned_by_id, assigned_by_name, assigned_at, previous_value,
                new_value, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event.order_id)
        .bind(event.action())
        .bind(event.resource_type.as_str())
        .bind(event.resource_id)
        .bind(&event.resource_name)
        .bind(event.assigned_by_id)
        .bind(&event.assigned_by_name)
        .bind(Utc::now())
        .bind(&event.previous_value)
        .bind(&event.new_value)
        .bind(&event.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_order(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<OrderAssignmentHistory>, AppError> {
        let entries = sqlx::query_as::<_, OrderAssignmentHistory>(
            "SELECT * FROM order_assignment_history WHERE order_id = $1 ORDER BY assigned_at DESC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    pub async fn find_by_order_and_type(
        &self,
        order_id: Uuid,
        resource_type: ResourceType,
    ) -> Result<Vec<OrderAssignmentHistory>, AppError> {
        let entries = sqlx::query_as::<_, OrderAssignmentHistory>(
            r#"
            SELECT * FROM order_assignment_history
            WHERE order_id = $1 AND resource_type = $2
            ORDER BY assigned_at DESC
            "#,
        )
        .bind(order_id)
        .bind(resource_type.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
