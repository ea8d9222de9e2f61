pub mod complete;
pub mod options;
mod scan;
pub mod segment;
pub mod state;
pub mod syntax;
pub mod types;

#[cfg(feature = "pulldown")]
pub mod adapters;

pub use complete::*;
pub use options::*;
pub use segment::*;
pub use state::*;
pub use syntax::*;
pub use types::*;
