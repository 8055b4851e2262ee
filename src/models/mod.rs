//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod alert;
pub mod assignment_history;
pub mod directory;
pub mod order;
