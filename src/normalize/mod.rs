//! Outbound normalization: repair passes and the strict runtime projection.

mod fixer;
pub mod runtime;
mod websocket;

pub use fixer::{
    fix_outbound, normalize_flow, normalize_interval, DEFAULT_BANDWIDTH_MBPS,
    DEFAULT_PACKET_ENCODING, FALLBACK_OUTBOUND, VISION_FLOW,
};
pub use runtime::{build_for_runtime, project_transport};
pub use websocket::{CHROME_USER_AGENT, EARLY_DATA_HEADER, FIREFOX_USER_AGENT};
