pub mod integration_routes;
pub mod lead_routes;
pub mod setup_routes;
