pub mod api_response;
pub mod intent;
pub mod network_config;
pub mod transaction;
pub mod wallet;
