pub mod integration_repository;
pub mod lead_repository;
pub mod system_config_repository;
