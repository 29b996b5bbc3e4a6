pub mod abi_registry;
pub mod blockchain_service;
pub mod custody_service;
pub mod intent_service;
pub mod network_config;
pub mod planning_service;
pub mod transaction_service;
pub mod wallet_service;
