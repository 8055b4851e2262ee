//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::services::alert_scan_service::AlertScanService;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    /// Motor de alertas compartido: el flag de single-flight debe ser el
    /// mismo para el loop programado y el trigger manual
    pub alert_scan: AlertScanService,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let alert_scan = AlertScanService::new(pool.clone());
        Self {
            pool,
            config,
            alert_scan,
        }
    }
}
