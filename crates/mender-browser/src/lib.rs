mod cdp_probe;
mod error;
mod navigation;

pub use cdp_probe::{CdpProbe, DEFAULT_DEBUGGING_PORT};
pub use error::{Error, Result};
pub use navigation::normalize_url;
