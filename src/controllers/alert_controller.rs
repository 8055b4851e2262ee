use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::alert_dto::{AlertResponse, UnreadCountResponse};
use crate::dto::order_dto::ApiResponse;
use crate::repositories::alert_repository::AlertRepository;
use crate::utils::errors::{not_found_error, AppError};

/// Operaciones de triaje y consulta de alertas. La generación corre en
/// services::alert_scan_service.
pub struct AlertController {
    repository: AlertRepository,
}

impl AlertController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: AlertRepository::new(pool),
        }
    }

    pub async fn list_active(&self) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self.repository.find_active().await?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }

    pub async fn list_unread(&self) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self.repository.find_unread().await?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }

    pub async fn list_critical(&self) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self.repository.find_critical().await?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }

    pub async fn list_assigned_to(&self, user_id: Uuid) -> Result<Vec<AlertResponse>, AppError> {
        let alerts = self.repository.find_by_assignee(user_id).await?;
        Ok(alerts.into_iter().map(AlertResponse::from).collect())
    }

    pub async fn count_unread(&self) -> Result<UnreadCountResponse, AppError> {
        let unread = self.repository.count_unread().await?;
        Ok(UnreadCountResponse { unread })
    }

    pub async fn mark_as_read(&self, id: Uuid) -> Result<ApiResponse<AlertResponse>, AppError> {
        let alert = self
            .repository
            .mark_read(id)
            .await?
            .ok_or_else(|| not_found_error("Alert", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            alert.into(),
            "Alerta marcada como leída".to_string(),
        ))
    }

    pub async fn deactivate(
        &self,
        id: Uuid,
        acting_user_id: Uuid,
    ) -> Result<ApiResponse<AlertResponse>, AppError> {
        let alert = self
            .repository
            .deactivate(id, acting_user_id)
            .await?
            .ok_or_else(|| not_found_error("Alert", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            alert.into(),
            "Alerta desactivada exitosamente".to_string(),
        ))
    }

    pub async fn assign(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<ApiResponse<AlertResponse>, AppError> {
        let alert = self
            .repository
            .assign(id, user_id)
            .await?
            .ok_or_else(|| not_found_error("Alert", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            alert.into(),
            "Alerta asignada exitosamente".to_string(),
        ))
    }

    pub async fn unassign(&self, id: Uuid) -> Result<ApiResponse<AlertResponse>, AppError> {
        let alert = self
            .repository
            .unassign(id)
            .await?
            .ok_or_else(|| not_found_error("Alert", &id.to_string()))?;

        Ok(ApiResponse::success_with_message(
            alert.into(),
            "Alerta desasignada exitosamente".to_string(),
        ))
    }
}
