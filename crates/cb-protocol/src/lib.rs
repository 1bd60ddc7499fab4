pub mod error;
pub mod phase;
pub mod reading;
pub mod topics;

pub use error::*;
pub use phase::*;
pub use reading::*;
