pub mod generator;
pub mod unit;

pub use generator::*;
pub use unit::*;
