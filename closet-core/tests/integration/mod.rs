//! Integration test modules

mod api_client_tests;
mod service_flow_tests;
