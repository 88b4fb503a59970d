pub use campus_types::error::{CpResult, Error};
pub use campus_types::types::Timestamp;

pub use tracing::{debug, error, info, warn};

// vim: ts=4
