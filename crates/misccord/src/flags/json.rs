use crate::{Error, FlagLabels, IntoRaw, Result, UserFlags};
use serde_json::Value;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Decodes the `flags` and `public_flags` fields of a user object.
///
/// Each present field is decoded in ascending bit order; `flags` labels come
/// first, then `public_flags` labels. A label set in both fields appears
/// twice. A user object with neither field decodes to an empty list.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `user` is not a JSON object or when a
/// present field is not an integer or digit string.
///
/// # Example
///
/// ```
/// use serde_json::json;
///
/// let user = json!({ "id": "80351110224678912", "public_flags": 65536 });
/// assert_eq!(misccord::decode_user_json(&user).unwrap(), ["Verified Bot"]);
/// ```
#[cfg_attr(feature = "tracing", instrument(level = "trace", skip(user)))]
pub fn decode_user_json(user: &Value) -> Result<Vec<&'static str>> {
    let Value::Object(fields) = user else {
        return Err(Error::invalid_input(user));
    };

    let mut labels = Vec::new();
    for key in ["flags", "public_flags"] {
        if let Some(value) = fields.get(key) {
            labels.extend(UserFlags::from_raw(value.into_raw()?).labels());
        }
    }
    Ok(labels)
}

/// Same as [`decode_user_json`], wrapped for predicate queries.
pub fn flags_from_json(user: &Value) -> Result<FlagLabels> {
    decode_user_json(user).map(FlagLabels::from)
}

impl FlagLabels {
    /// Builds the wrapper from an untyped JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] unless `value` is an array whose
    /// elements are all strings.
    pub fn from_json_list(value: &Value) -> Result<Self> {
        let Value::Array(items) = value else {
            return Err(Error::invalid_input(value));
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(String::from)
                    .ok_or_else(|| Error::invalid_input(item))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}
