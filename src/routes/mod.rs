pub mod alert_routes;
pub mod order_routes;
