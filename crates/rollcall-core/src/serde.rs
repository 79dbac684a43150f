//! Serde helpers shared by request and response types.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Parses a time of day written as `HH:MM` or `HH:MM:SS`.
pub fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// `NaiveTime` as zero-padded `HH:MM`.
pub mod hh_mm {
    use super::*;

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&time.format("%H:%M"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_time(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid time `{}`, expected HH:MM", raw))
        })
    }
}

/// `Option<NaiveTime>` as zero-padded `HH:MM`.
pub mod option_hh_mm {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(time) => serializer.collect_str(&time.format("%H:%M")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(raw) if raw.is_empty() => Ok(None),
            Some(raw) => parse_time(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("invalid time `{}`, expected HH:MM", raw))
            }),
            None => Ok(None),
        }
    }
}

/// Distinguishes an absent field from an explicit `null` in partial updates.
///
/// Use with `#[serde(default, deserialize_with = "nullable")]`:
/// absent → `None`, `null` → `Some(None)`, value → `Some(Some(value))`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Slot {
        #[serde(with = "hh_mm")]
        start: NaiveTime,
        #[serde(default, with = "option_hh_mm")]
        end: Option<NaiveTime>,
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        group: Option<Option<String>>,
    }

    #[test]
    fn test_hh_mm_round_trip_drops_seconds() {
        let slot: Slot = serde_json::from_str(r#"{"start": "08:30:00", "end": "09:30"}"#).unwrap();
        assert_eq!(slot.start, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        let json = serde_json::to_value(&slot).unwrap();
        assert_eq!(json["start"], "08:30");
        assert_eq!(json["end"], "09:30");
    }

    #[test]
    fn test_hh_mm_rejects_garbage() {
        assert!(serde_json::from_str::<Slot>(r#"{"start": "8h30"}"#).is_err());
        assert!(serde_json::from_str::<Slot>(r#"{"start": "25:00"}"#).is_err());
    }

    #[test]
    fn test_nullable_three_states() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.group, None);

        let cleared: Patch = serde_json::from_str(r#"{"group": null}"#).unwrap();
        assert_eq!(cleared.group, Some(None));

        let set: Patch = serde_json::from_str(r#"{"group": "A"}"#).unwrap();
        assert_eq!(set.group, Some(Some("A".to_string())));
    }
}
