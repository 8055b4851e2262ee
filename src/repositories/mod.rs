//! Repositorios de acceso a datos
//!
//! Un repositorio por tabla, con queries SQL en runtime sobre el pool
//! de PostgreSQL.

pub mod alert_repository;
pub mod assignment_history_repository;
pub mod directory_repository;
pub mod order_repository;
