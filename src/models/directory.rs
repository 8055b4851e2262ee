//! Modelos del directorio de recursos
//!
//! Registros de solo lectura (customers, users, drivers, vehicles,
//! trailers) propiedad de los módulos de datos maestros. Este servicio
//! únicamente los consulta por id.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Usuario interno (personal de ventas, operación, flota, aduanas)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub full_name: String,
    pub role: String,
    pub can_approve_quotes: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Driver {
    pub id: Uuid,
    pub full_name: String,
    pub license_number: String,
    pub visa_expiry_date: Option<NaiveDate>,
    pub license_expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate_number: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub inspection_expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trailer {
    pub id: Uuid,
    pub trailer_number: String,
    pub created_at: DateTime<Utc>,
}
