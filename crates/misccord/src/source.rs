//! Platform adapter seams for looking up a user's flags.
//!
//! `misccord` never talks to the network. A bot framework or HTTP client
//! implements [`UserSource`] (blocking) or [`AsyncUserSource`] (async) to hand
//! back the raw user object, and the helpers here decode its flag fields.
//!
//! ```
//! use misccord::{UserSource, flags_for_user};
//! use serde_json::{Value, json};
//! use std::collections::HashMap;
//!
//! struct Cache(HashMap<u64, Value>);
//!
//! impl UserSource for Cache {
//!     type Handle = u64;
//!     type Error = std::io::Error;
//!
//!     fn fetch_user_json(&self, id: &u64) -> Result<Value, Self::Error> {
//!         self.0
//!             .get(id)
//!             .cloned()
//!             .ok_or_else(|| std::io::ErrorKind::NotFound.into())
//!     }
//! }
//!
//! let cache = Cache(HashMap::from([(1, json!({ "public_flags": 1 }))]));
//! assert!(flags_for_user(&cache, &1).unwrap().has_staff());
//! assert!(flags_for_user(&cache, &2).is_err());
//! ```

use crate::{FlagLabels, SourceError, flags_from_json};
use core::future::Future;
use serde_json::Value;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Blocking access to raw user objects.
pub trait UserSource {
    /// How the platform identifies a user (an ID, a library user handle, ...).
    type Handle: ?Sized;
    type Error;

    fn fetch_user_json(&self, handle: &Self::Handle) -> Result<Value, Self::Error>;
}

/// Async access to raw user objects.
///
/// Cancellation and timeouts are the implementor's concern; the decode step
/// that follows the fetch never suspends.
pub trait AsyncUserSource {
    type Handle: ?Sized;
    type Error;

    fn fetch_user_json(
        &self,
        handle: &Self::Handle,
    ) -> impl Future<Output = Result<Value, Self::Error>> + Send;
}

/// Fetches a user through `source` and decodes its flags.
///
/// # Errors
///
/// [`SourceError::Fetch`] if the adapter fails, [`SourceError::Decode`] if
/// the returned object has malformed flag fields.
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip_all))]
pub fn flags_for_user<S>(source: &S, handle: &S::Handle) -> Result<FlagLabels, SourceError<S::Error>>
where
    S: UserSource + ?Sized,
{
    let user = source.fetch_user_json(handle).map_err(SourceError::Fetch)?;
    Ok(flags_from_json(&user)?)
}

/// Async counterpart of [`flags_for_user`].
///
/// # Errors
///
/// Same as [`flags_for_user`].
pub async fn flags_for_user_async<S>(
    source: &S,
    handle: &S::Handle,
) -> Result<FlagLabels, SourceError<S::Error>>
where
    S: AsyncUserSource + ?Sized,
{
    let user = source
        .fetch_user_json(handle)
        .await
        .map_err(SourceError::Fetch)?;
    Ok(flags_from_json(&user)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, thiserror::Error)]
    #[error("user {0} not found")]
    struct NotFound(String);

    struct Users(HashMap<&'static str, Value>);

    impl Users {
        fn sample() -> Self {
            Self(HashMap::from([
                ("bot", json!({ "flags": 65536, "public_flags": "131072" })),
                ("broken", json!({ "public_flags": "lots" })),
            ]))
        }

        fn lookup(&self, handle: &str) -> Result<Value, NotFound> {
            self.0
                .get(handle)
                .cloned()
                .ok_or_else(|| NotFound(handle.to_string()))
        }
    }

    impl UserSource for Users {
        type Handle = str;
        type Error = NotFound;

        fn fetch_user_json(&self, handle: &str) -> Result<Value, NotFound> {
            self.lookup(handle)
        }
    }

    impl AsyncUserSource for Users {
        type Handle = str;
        type Error = NotFound;

        async fn fetch_user_json(&self, handle: &str) -> Result<Value, NotFound> {
            tokio::task::yield_now().await;
            self.lookup(handle)
        }
    }

    #[test]
    fn blocking_lookup_decodes_both_fields() {
        let flags = flags_for_user(&Users::sample(), "bot").unwrap();
        assert_eq!(flags.as_slice(), ["Verified Bot", "Verified Developer"]);
        assert!(flags.has_verified_bot() && flags.has_verified_developer());
    }

    #[test]
    fn fetch_errors_pass_through() {
        let err = flags_for_user(&Users::sample(), "ghost").unwrap_err();
        assert!(matches!(err, SourceError::Fetch(NotFound(ref h)) if h == "ghost"));
        assert_eq!(err.to_string(), "failed to fetch user: user ghost not found");
    }

    #[test]
    fn decode_errors_are_wrapped() {
        let err = flags_for_user(&Users::sample(), "broken").unwrap_err();
        assert!(matches!(
            err,
            SourceError::Decode(Error::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn async_lookup() {
        let users = Users::sample();
        let flags = flags_for_user_async(&users, "bot").await.unwrap();
        assert!(flags.has_verified_bot());
        assert!(matches!(
            flags_for_user_async(&users, "ghost").await,
            Err(SourceError::Fetch(_))
        ));
    }
}
