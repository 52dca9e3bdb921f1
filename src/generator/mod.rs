pub mod engine;
pub mod exports;
pub mod inbounds;

// Re-export the builders
pub use engine::{build_engine_config, EngineConfig, LogConfig};
pub use exports::{export_link, export_links};
pub use inbounds::build_inbounds;
