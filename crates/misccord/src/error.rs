use crate::{Permissions, TargetKind};

/// A result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `misccord` can produce.
///
/// Every variant is a validation failure raised at construction or decode
/// time. None of them are transient, so retrying with the same input always
/// fails the same way.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The value was neither an unsigned integer nor a string made only of
    /// ASCII decimal digits that fits in 64 bits.
    #[error("invalid input: {input}")]
    InvalidInput {
        /// A rendering of the rejected value.
        input: String,
    },

    /// The permission mask sets bits that have no meaning for the target.
    #[error("permissions {bits:?} are not valid for a {kind}")]
    InvalidPermissionSet {
        kind: TargetKind,
        /// The forbidden bits that were present in the mask.
        bits: Permissions,
    },

    /// A channel overwrite was built for something other than a channel.
    #[error("channel overwrites must target a text or voice channel, got {kind}")]
    InvalidTargetKind { kind: TargetKind },
}

impl Error {
    pub(crate) fn invalid_input(input: impl core::fmt::Display) -> Self {
        let err = Self::InvalidInput {
            input: input.to_string(),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(%err, "rejected raw input");
        err
    }
}

/// Failure of a [`UserSource`](crate::UserSource) backed lookup.
///
/// Either the adapter could not produce the user object, or the object it
/// produced did not decode.
#[cfg(feature = "json")]
#[derive(Debug, thiserror::Error)]
pub enum SourceError<E> {
    #[error("failed to fetch user: {0}")]
    Fetch(#[source] E),

    #[error(transparent)]
    Decode(#[from] Error),
}
