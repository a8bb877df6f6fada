#[cfg(feature = "json")]
mod json;
mod labels;
mod user_flags;

#[cfg(feature = "json")]
pub use json::*;
pub use labels::*;
pub use user_flags::*;
