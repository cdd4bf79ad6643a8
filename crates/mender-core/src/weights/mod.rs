mod store;
mod types;

pub use store::WeightStore;
pub use types::*;
