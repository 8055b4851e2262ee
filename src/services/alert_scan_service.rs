//! Motor de alertas
//!
//! Escaneo periódico de documentos y revisiones próximos a vencer:
//! visas y licencias de conductores, revisiones técnicas de vehículos.
//! La creación de alertas es idempotente (check de existencia por
//! (tipo, entidad) antes de insertar) y el fallo de una entidad no
//! aborta el escaneo del resto.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::alert_dto::ScanSummaryResponse;
use crate::models::alert::{AlertType, NewAlert, RelatedEntityType};
use crate::repositories::alert_repository::AlertRepository;
use crate::repositories::directory_repository::DirectoryRepository;
use crate::utils::errors::AppError;

/// Umbral de escaneo para documentos de conductores (visa, licencia)
const DRIVER_DOC_THRESHOLD_DAYS: i64 = 30;
/// Umbral de escaneo para revisiones técnicas de vehículos
const VEHICLE_INSPECTION_THRESHOLD_DAYS: i64 = 15;

/// ¿Debe escanearse este vencimiento? Estrictamente antes de today + threshold
pub fn expiry_within_threshold(expiry: NaiveDate, today: NaiveDate, threshold_days: i64) -> bool {
    expiry < today + Duration::days(threshold_days)
}

/// Segundos hasta la próxima ejecución programada a la hora fija (UTC)
pub fn seconds_until_next_scan(now: DateTime<Utc>, hour: u32) -> u64 {
    let today_run = now
        .date_naive()
        .and_hms_opt(hour, 0, 0)
        .unwrap_or_else(|| now.date_naive().and_hms_opt(0, 0, 0).unwrap())
        .and_utc();

    let next = if now < today_run {
        today_run
    } else {
        today_run + Duration::days(1)
    };

    (next - now).num_seconds().max(1) as u64
}

#[derive(Clone)]
pub struct AlertScanService {
    pool: PgPool,
    running: Arc<AtomicBool>,
}

impl AlertScanService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Ejecutar un escaneo completo. No reentrante: un trigger que se
    /// solape con otro escaneo en curso recibe Conflict.
    pub async fn run_scan(&self) -> Result<ScanSummaryResponse, AppError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(AppError::Conflict(
                "An alert scan is already running".to_string(),
            ));
        }

        let result = self.scan_all().await;
        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Loop diario: duerme hasta la hora configurada y ejecuta el escaneo
    pub async fn run_daily(self, hour: u32) {
        loop {
            let wait = seconds_until_next_scan(Utc::now(), hour);
            log::info!("⏰ Próximo escaneo de alertas en {} segundos", wait);
            tokio::time::sleep(std::time::Duration::from_secs(wait)).await;

            match self.run_scan().await {
                Ok(summary) => log::info!(
                    "✅ Escaneo de alertas completado: {} visa, {} licencia, {} revisión, {} omitidas",
                    summary.visa_alerts_created,
                    summary.license_alerts_created,
                    summary.inspection_alerts_created,
                    summary.entities_skipped
                ),
                Err(e) => log::warn!("❌ Escaneo de alertas fallido: {}", e),
            }
        }
    }

    async fn scan_all(&self) -> Result<ScanSummaryResponse, AppError> {
        let directory = DirectoryRepository::new(self.pool.clone());
        let alerts = AlertRepository::new(self.pool.clone());
        let today = Utc::now().date_naive();
        let mut summary = ScanSummaryResponse::default();

        let drivers = directory.list_drivers().await?;
        for driver in &drivers {
            match self
                .check_expiry(
                    &alerts,
                    AlertType::VisaExpiring,
                    RelatedEntityType::Driver,
                    driver.id,
                    &driver.full_name,
                    driver.visa_expiry_date,
                    today,
                    DRIVER_DOC_THRESHOLD_DAYS,
                )
                .await
            {
                Ok(true) => summary.visa_alerts_created += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Escaneo de visa fallido para conductor {}: {}", driver.id, e);
                    summary.entities_skipped += 1;
                }
            }

            match self
                .check_expiry(
                    &alerts,
                    AlertType::LicenseExpiring,
                    RelatedEntityType::Driver,
                    driver.id,
                    &driver.full_name,
                    driver.license_expiry_date,
                    today,
                    DRIVER_DOC_THRESHOLD_DAYS,
                )
                .await
            {
                Ok(true) => summary.license_alerts_created += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!(
                        "Escaneo de licencia fallido para conductor {}: {}",
                        driver.id,
                        e
                    );
                    summary.entities_skipped += 1;
                }
            }
        }

        let vehicles = directory.list_vehicles().await?;
        for vehicle in &vehicles {
            match self
                .check_expiry(
                    &alerts,
                    AlertType::VehicleInspectionDue,
                    RelatedEntityType::Vehicle,
                    vehicle.id,
                    &vehicle.plate_number,
                    vehicle.inspection_expiry_date,
                    today,
                    VEHICLE_INSPECTION_THRESHOLD_DAYS,
                )
                .await
            {
                Ok(true) => summary.inspection_alerts_created += 1,
                Ok(false) => {}
                Err(e) => {
                    log::warn!(
                        "Escaneo de revisión fallido para vehículo {}: {}",
                        vehicle.id,
                        e
                    );
                    summary.entities_skipped += 1;
                }
            }
        }

        Ok(summary)
    }

    /// Devuelve Ok(true) si se creó una alerta nueva, Ok(false) si no
    /// corresponde o ya existe una activa para el mismo (tipo, entidad)
    #[allow(clippy::too_many_arguments)]
    async fn check_expiry(
        &self,
        alerts: &AlertRepository,
        alert_type: AlertType,
        entity_type: RelatedEntityType,
        entity_id: Uuid,
        entity_label: &str,
        expiry: Option<NaiveDate>,
        today: NaiveDate,
        threshold_days: i64,
    ) -> Result<bool, AppError> {
        let Some(expiry) = expiry else {
            return Ok(false);
        };

        if !expiry_within_threshold(expiry, today, threshold_days) {
            return Ok(false);
        }

        if alerts.active_exists(alert_type, entity_type, entity_id).await? {
            return Ok(false);
        }

        let new_alert = NewAlert::for_expiry(
            alert_type,
            entity_type,
            entity_id,
            entity_label,
            expiry,
            today,
        );
        alerts.create(&new_alert).await?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_within_threshold_boundaries() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

        // estrictamente antes del umbral
        assert!(expiry_within_threshold(today, today, 30));
        assert!(expiry_within_threshold(
            today + Duration::days(29),
            today,
            30
        ));
        assert!(!expiry_within_threshold(
            today + Duration::days(30),
            today,
            30
        ));
        assert!(!expiry_within_threshold(
            today + Duration::days(45),
            today,
            30
        ));

        // los vencimientos ya pasados también cuentan
        assert!(expiry_within_threshold(
            today - Duration::days(3),
            today,
            15
        ));
    }

    #[test]
    fn test_seconds_until_next_scan() {
        let before = DateTime::parse_from_rfc3339("2025-06-01T04:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(seconds_until_next_scan(before, 6), 5400);

        let after = DateTime::parse_from_rfc3339("2025-06-01T07:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(seconds_until_next_scan(after, 6), 23 * 3600);

        let exact = DateTime::parse_from_rfc3339("2025-06-01T06:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(seconds_until_next_scan(exact, 6), 24 * 3600);
    }

    #[tokio::test]
    async fn test_run_scan_rejects_overlapping_trigger() {
        let pool = PgPool::connect_lazy("postgres://localhost/freight_backoffice_test")
            .expect("lazy pool");
        let service = AlertScanService::new(pool);

        service.running.store(true, Ordering::SeqCst);
        let err = service.run_scan().await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        // el flag sigue reservado por el escaneo "en curso"
        assert!(service.running.load(Ordering::SeqCst));
    }
}
