//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                eprintln!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": e.to_string() })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Forbidden(msg) => {
                eprintln!("Forbidden access: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse {
                        error: "Forbidden".to_string(),
                        message: msg,
                        details: None,
                        code: Some("FORBIDDEN".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::Conflict(msg) => {
                eprintln!("Conflict: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Conflict".to_string(),
                        message: msg,
                        details: None,
                        code: Some("CONFLICT".to_string()),
                    },
                )
            }

            AppError::InvalidState(msg) => {
                eprintln!("Invalid state transition: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid State".to_string(),
                        message: msg,
                        details: None,
                        code: Some("INVALID_STATE".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("BAD_REQUEST".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// ¿Es una violación de unicidad del motor de base de datos?
pub fn is_unique_violation(error: &sqlx::Error) -> bool {
    matches!(error, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Función helper para crear errores de estado inválido
pub fn invalid_state_error(operation: &str, current_state: &str) -> AppError {
    AppError::InvalidState(format!(
        "Cannot {}: order is in '{}' state",
        operation, current_state
    ))
}
