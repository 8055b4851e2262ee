//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un
//! request individual: el motor de alertas y su escaneo programado.

pub mod alert_scan_service;

pub use alert_scan_service::*;
