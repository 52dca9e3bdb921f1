pub mod error;
pub mod generator;
pub mod models;
pub mod normalize;
pub mod utils;

// Re-export the main model types for easier access
pub use models::{Inbound, Outbound, OutboundType, RuntimeOutbound, Settings, TunStack};

// Re-export the operations
pub use error::ConfigError;
pub use generator::{build_engine_config, build_inbounds, export_link, export_links, EngineConfig};
pub use normalize::{build_for_runtime, fix_outbound};
