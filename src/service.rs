//! Prediction transports: JSON lines over stdio and HTTP.

pub mod http;
pub mod line;
pub mod protocol;

pub use http::{AppState, build_router, serve};
pub use line::{LineSummary, run_lines, run_single};
pub use protocol::*;
