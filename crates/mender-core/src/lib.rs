pub mod error;
pub mod fallback;
pub mod probe;
pub mod rank;
pub mod resolver;
pub mod session;
pub mod weights;

pub use error::{Error, Result};
pub use fallback::FallbackTable;
pub use probe::{Probe, ProbeError};
pub use rank::{RankedSelector, rank};
pub use resolver::{MatchSource, PersistPolicy, Resolution, Resolver, ResolverConfig};
pub use session::Session;
pub use weights::{SelectorScores, WeightStore, WeightTable};
