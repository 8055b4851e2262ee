//! Controladores de la aplicación
//!
//! Cada controlador orquesta las operaciones de un agregado sobre sus
//! repositorios y valida antes de tocar el almacenamiento.

pub mod alert_controller;
pub mod order_controller;
