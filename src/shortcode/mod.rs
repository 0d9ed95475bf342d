pub mod scanner;
pub mod types;

pub use scanner::{scan, ShortcodeMatch};
pub use types::ShortcodeToken;
