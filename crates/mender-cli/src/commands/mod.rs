pub mod completion;
pub mod fallback;
pub mod login;
pub mod rank;
pub mod resolve;
pub mod weights;
