pub mod circuit;
pub mod event;

pub use circuit::*;
pub use event::*;
