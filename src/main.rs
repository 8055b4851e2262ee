mod config;
mod controllers;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use config::database::DatabaseConfig;
use config::environment::EnvironmentConfig;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Configurar logging
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚚 Freight Back-Office - Gestión de órdenes y alertas");
    info!("=====================================================");

    // Inicializar base de datos
    let db_config = DatabaseConfig::default();
    let pool = match db_config.create_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let scan_hour = config.alert_scan_hour;
    let app_state = AppState::new(pool, config);

    // Lanzar el escaneo diario de alertas en background
    let scan_service = app_state.alert_scan.clone();
    tokio::spawn(scan_service.run_daily(scan_hour));

    // CORS: permisivo en desarrollo, orígenes explícitos si se configuran
    let cors = if app_state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(app_state.config.cors_origins.clone())
    };

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/order", routes::order_routes::create_order_router())
        .nest("/api/alert", routes::alert_routes::create_alert_router())
        .layer(cors)
        .with_state(app_state.clone());

    // Puerto del servidor
    let addr: SocketAddr = app_state.config.server_url().parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("📦 Endpoints - Order:");
    info!("   POST /api/order - Crear orden");
    info!("   GET  /api/order - Listar órdenes");
    info!("   GET  /api/order/search - Buscar órdenes por filtros");
    info!("   GET  /api/order/:id - Obtener orden");
    info!("   PUT  /api/order/:id - Actualizar orden (merge parcial)");
    info!("   DELETE /api/order/:id - Eliminar orden");
    info!("   POST /api/order/:id/assign - Asignar recurso");
    info!("   POST /api/order/:id/approve-quote - Aprobar cotización");
    info!("   POST /api/order/:id/cancel-quote - Cancelar cotización");
    info!("   GET  /api/order/:id/history - Historial de asignaciones");
    info!("   GET  /api/order/:id/history/:resource_type - Historial por tipo");
    info!("🔔 Endpoints - Alert:");
    info!("   GET  /api/alert/active - Alertas activas");
    info!("   GET  /api/alert/unread - Alertas no leídas");
    info!("   GET  /api/alert/critical - Alertas críticas");
    info!("   GET  /api/alert/unread/count - Contador de no leídas");
    info!("   GET  /api/alert/assigned/:user_id - Alertas por asignado");
    info!("   POST /api/alert/:id/read - Marcar como leída");
    info!("   POST /api/alert/:id/deactivate - Desactivar alerta");
    info!("   POST /api/alert/:id/assign - Asignar alerta");
    info!("   POST /api/alert/:id/unassign - Desasignar alerta");
    info!("   POST /api/alert/scan - Trigger manual del escaneo");
    info!("⏰ Escaneo diario de alertas a las {}:00 UTC", scan_hour);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Freight Back-Office funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
