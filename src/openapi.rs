use utoipa::OpenApi;

use crate::api::routes::{integration_routes, lead_routes, setup_routes};
use crate::dto::{
    BatchUpdateEntry, BatchUpdateRequest, BatchUpdateResponse, CompleteSetupRequest,
    CompleteSetupResponse, GenerateLeadsData, GenerateLeadsRequest, IntegrationResponse,
    IntegrationStatus, IntegrationType, LeadPageResponse, LeadResponse, MessageResponse,
    SaveStepRequest, SetupStatusResponse, SetupStepResponse, TestConnectionsResponse, TestResult,
    ToggleIntegrationRequest, UpdateIntegrationRequest, UpdateLeadRequest,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        integration_routes::list_integrations_handler,
        integration_routes::get_integration_handler,
        integration_routes::update_integration_handler,
        integration_routes::test_connection_handler,
        integration_routes::toggle_integration_handler,
        integration_routes::batch_update_handler,
        setup_routes::setup_status_handler,
        setup_routes::start_setup_handler,
        setup_routes::save_step_handler,
        setup_routes::complete_setup_handler,
        setup_routes::test_connections_handler,
        lead_routes::list_leads_handler,
        lead_routes::search_leads_handler,
        lead_routes::export_leads_handler,
        lead_routes::generate_leads_handler,
        lead_routes::get_lead_handler,
        lead_routes::update_lead_handler,
        lead_routes::delete_lead_handler,
    ),
    components(
        schemas(
            IntegrationType,
            IntegrationStatus,
            IntegrationResponse,
            UpdateIntegrationRequest,
            ToggleIntegrationRequest,
            BatchUpdateEntry,
            BatchUpdateRequest,
            BatchUpdateResponse,
            TestResult,
            SetupStatusResponse,
            SetupStepResponse,
            SaveStepRequest,
            CompleteSetupRequest,
            CompleteSetupResponse,
            TestConnectionsResponse,
            LeadResponse,
            LeadPageResponse,
            UpdateLeadRequest,
            GenerateLeadsRequest,
            GenerateLeadsData,
            MessageResponse,
        )
    ),
    tags(
        (name = "Integrations", description = "Integration registry and connection testing"),
        (name = "Setup", description = "Guided setup wizard state"),
        (name = "Leads", description = "Lead browsing, export and generation"),
    ),
    info(
        title = "LeadHub Admin API",
        version = "1.0.0",
        description = "Administration and setup API for a lead-generation platform",
    ),
    servers(
        (url = "/", description = "Local server")
    )
)]
pub struct ApiDoc;
