pub mod identifiers;
pub mod walker;

pub use identifiers::*;
pub use walker::*;
