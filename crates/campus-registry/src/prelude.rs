pub use campus_core::app::App;
pub use campus_types::error::{CpResult, Error};

pub use tracing::{debug, error, info, warn};

// vim: ts=4
