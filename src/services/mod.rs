pub mod integration_service;
pub mod lead_service;
pub mod setup_service;
