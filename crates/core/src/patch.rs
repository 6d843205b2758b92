//! Serde helpers for partial-update DTOs.
//!
//! Nullable columns are patched through `Option<Option<T>>`:
//!
//! | JSON            | Value            | Effect          |
//! |-----------------|------------------|-----------------|
//! | field absent    | `None`           | left untouched  |
//! | `null`          | `Some(None)`     | cleared         |
//! | `"text"`        | `Some(Some(..))` | set             |
//!
//! Pair the field with `#[serde(default, deserialize_with = "double_option")]`
//! so an absent field falls back to `None` while an explicit `null` reaches
//! this function.

use serde::{Deserialize, Deserializer};

/// Deserialize a present field (including `null`) as `Some(..)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
