//! Serde helpers for the service's wire quirks.

use serde::{Deserialize, Deserializer};

/// Durations as a signed JSON integer of whole seconds.
///
/// Use with `#[serde(with = "crate::codec::seconds")]` on a `TimeDelta`
/// field. Anything other than an integer (floats, quoted numbers) is a
/// deserialization error, never a silent zero.
pub mod seconds {
    use chrono::TimeDelta;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeDelta, D::Error> {
        let seconds = i64::deserialize(deserializer)?;
        TimeDelta::try_seconds(seconds)
            .ok_or_else(|| de::Error::custom(format!("duration of {seconds} seconds is out of range")))
    }
}

/// Treat an explicit `null` like a missing list.
pub fn null_as_empty<'de, D: Deserializer<'de>, T: Deserialize<'de>>(
    data: D,
) -> Result<Vec<T>, D::Error> {
    let maybe: Option<Vec<T>> = Deserialize::deserialize(data)?;
    Ok(maybe.unwrap_or_default())
}

/// Treat an explicit `null` like a missing scalar: the type's zero value.
pub fn null_as_default<'de, D: Deserializer<'de>, T: Deserialize<'de> + Default>(
    data: D,
) -> Result<T, D::Error> {
    let maybe: Option<T> = Deserialize::deserialize(data)?;
    Ok(maybe.unwrap_or_default())
}
