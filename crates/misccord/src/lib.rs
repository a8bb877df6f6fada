#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod flags;
mod input;
mod permissions;
#[cfg(feature = "serde")]
mod serde_ext;
mod snowflake;
#[cfg(feature = "json")]
mod source;

#[cfg(test)]
mod tests;

pub use crate::error::*;
pub use crate::flags::*;
pub use crate::input::*;
pub use crate::permissions::*;
pub use crate::snowflake::*;
#[cfg(feature = "json")]
pub use crate::source::*;
