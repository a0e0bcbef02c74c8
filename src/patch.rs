/// Partial-update payload support
///
/// A field typed `Option<Option<T>>` with `#[serde(default, deserialize_with =
/// "crate::patch::nullable")]` distinguishes "absent" (`None`) from an
/// explicit `null` (`Some(None)`).

use serde::{Deserialize, Deserializer};

pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Overwrite `target` only when the payload carried a value
pub fn apply<T>(target: &mut T, patch: Option<T>) {
    if let Some(value) = patch {
        *target = value;
    }
}
