//! Turns natural-language transaction prompts into confirmed on-chain calls.
//!
//! A hosted planner converts the prompt into a list of actions with
//! pre-encoded steps; [`services::intent_service::IntentService`] decodes each
//! step against the matching contract interface and replays it through a
//! [`services::custody_service::CustodyService`], one confirmed call at a time.

pub mod api;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, ConfigParams, CustodyCredentials, CustodyOptions};
pub use errors::CustomError;
pub use models::intent::Receipt;
pub use services::intent_service::IntentService;
