//! Port traits the CLI drives and adapters implement.

pub mod config_port;
pub mod data_port;
pub mod export_port;
