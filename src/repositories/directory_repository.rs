use sqlx::PgPool;
use uuid::Uuid;

use crate::models::directory::{Customer, Driver, Trailer, UserAccount, Vehicle};
use crate::utils::errors::AppError;

/// Directorio de recursos: lookups de solo lectura sobre las tablas de
/// datos maestros (propiedad de los módulos CRUD externos).
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_customer(&self, id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer =
            sqlx::query_as::<_, Customer>("SELECT id, name, created_at FROM customers WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(customer)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserAccount>, AppError> {
        let user = sqlx::query_as::<_, UserAccount>(
            "SELECT id, full_name, role, can_approve_quotes, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_driver(&self, id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, full_name, license_number, visa_expiry_date, license_expiry_date, created_at
            FROM drivers WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn get_vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, plate_number, brand, model, inspection_expiry_date, created_at
            FROM vehicles WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn get_trailer(&self, id: Uuid) -> Result<Option<Trailer>, AppError> {
        let trailer = sqlx::query_as::<_, Trailer>(
            "SELECT id, trailer_number, created_at FROM trailers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(trailer)
    }

    /// Todos los conductores, para el escaneo de vencimientos
    pub async fn list_drivers(&self) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT id, full_name, license_number, visa_expiry_date, license_expiry_date, created_at
            FROM drivers ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    /// Todos los vehículos, para el escaneo de revisiones
    pub async fn list_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, plate_number, brand, model, inspection_expiry_date, created_at
            FROM vehicles ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }
}
