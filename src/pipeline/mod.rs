pub mod layout;
pub mod orchestrator;
pub mod platform;
pub mod thumbnail;
