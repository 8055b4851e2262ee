use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::alert::{Alert, AlertType, NewAlert, RelatedEntityType};
use crate::utils::errors::AppError;

/// Ranking de prioridad para ordenar en SQL (priority se persiste como TEXT)
const PRIORITY_RANK: &str =
    "CASE priority WHEN 'critical' THEN 4 WHEN 'high' THEN 3 WHEN 'medium' THEN 2 ELSE 1 END";

pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, alert: &NewAlert) -> Result<Alert, AppError> {
        let created = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (
                id, alert_type, priority, title, description, related_entity_type,
                related_entity_id, expiry_date, alert_date, is_active, is_read, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, TRUE, FALSE, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(alert.alert_type.as_str())
        .bind(alert.priority.as_str())
        .bind(&alert.title)
        .bind(&alert.description)
        .bind(alert.related_entity_type.as_str())
        .bind(alert.related_entity_id)
        .bind(alert.expiry_date)
        .bind(alert.alert_date)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Check de deduplicación del escaneo: ¿existe ya una alerta activa
    /// para este (tipo, entidad)?
    pub async fn active_exists(
        &self,
        alert_type: AlertType,
        related_entity_type: RelatedEntityType,
        related_entity_id: Uuid,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM alerts
                WHERE alert_type = $1
                  AND related_entity_type = $2
                  AND related_entity_id = $3
                  AND is_active = TRUE
            )
            "#,
        )
        .bind(alert_type.as_str())
        .bind(related_entity_type.as_str())
        .bind(related_entity_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn find_active(&self) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE is_active = TRUE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn find_unread(&self) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts WHERE is_active = TRUE AND is_read = FALSE ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn find_critical(&self) -> Result<Vec<Alert>, AppError> {
        let sql = format!(
            r#"
            SELECT * FROM alerts
            WHERE is_active = TRUE
              AND is_read = FALSE
              AND priority IN ('high', 'critical')
            ORDER BY {} DESC, created_at DESC
            "#,
            PRIORITY_RANK
        );

        let alerts = sqlx::query_as::<_, Alert>(&sql).fetch_all(&self.pool).await?;

        Ok(alerts)
    }

    pub async fn find_by_assignee(&self, user_id: Uuid) -> Result<Vec<Alert>, AppError> {
        let alerts = sqlx::query_as::<_, Alert>(
            r#"
            SELECT * FROM alerts
            WHERE is_active = TRUE AND assigned_to_user = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(alerts)
    }

    pub async fn count_unread(&self) -> Result<i64, AppError> {
        let result: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM alerts WHERE is_active = TRUE AND is_read = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET is_read = TRUE, read_at = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    /// Desactivación suave; las alertas nunca se borran físicamente
    pub async fn deactivate(
        &self,
        id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            r#"
            UPDATE alerts
            SET is_active = FALSE, deactivated_by = $2, deactivated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(acting_user_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    pub async fn assign(&self, id: Uuid, user_id: Uuid) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET assigned_to_user = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }

    pub async fn unassign(&self, id: Uuid) -> Result<Option<Alert>, AppError> {
        let alert = sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET assigned_to_user = NULL WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(alert)
    }
}
