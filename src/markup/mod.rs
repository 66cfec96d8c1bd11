pub mod activity;
pub mod loader;
pub mod reader;

pub use activity::*;
pub use loader::*;
pub use reader::{MarkupElement, MarkupNode, MarkupText};
