//! Optional fields as edit forms submit them.
//!
//! Forms post `""` for an emptied input. A blank string reads like `null`,
//! so clearing an input clears the stored value.
//! Use with `#[serde(default, deserialize_with = "fleet_types::forms::optional")]`,
//! or [`clearable`] on patch fields that tell "absent" from "cleared".

use serde::{de, Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// `null` or blank yields `None`; anything else is trimmed and parsed.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim().parse().map(Some).map_err(de::Error::custom)
        }
        _ => Ok(None),
    }
}

/// Patch variant: a present field is `Some(..)`, and `null` or blank
/// becomes `Some(None)`. Pair with a container-level `#[serde(default)]` so
/// an absent field stays `None`.
pub fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    optional(deserializer).map(Some)
}
