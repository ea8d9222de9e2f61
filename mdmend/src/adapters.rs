pub mod pulldown;

pub use pulldown::*;
