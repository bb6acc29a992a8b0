use serde::de::Unexpected;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

/// Publication state shared by every content collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PublishStatus {
    #[default]
    Draft,
    Published,
    Archived,
    /// Any value this client does not know about yet.
    #[serde(other)]
    Unknown,
}

const KNOWN_STATUSES: &str = "one of draft, published, archived";

fn parse_known<E: serde::de::Error>(raw: &str) -> Result<PublishStatus, E> {
    match raw.parse::<PublishStatus>() {
        Ok(status) if status != PublishStatus::Unknown => Ok(status),
        _ => Err(E::invalid_value(Unexpected::Str(raw), &KNOWN_STATUSES)),
    }
}

fn write_known<S: Serializer>(status: PublishStatus, serializer: S) -> Result<S::Ok, S::Error> {
    if status == PublishStatus::Unknown {
        return Err(S::Error::custom("refusing to send an unrecognized status"));
    }
    status.serialize(serializer)
}

/// Request-side status: unrecognized values are rejected instead of being
/// collapsed into `Unknown` and written back.
pub(crate) mod known_status {
    use super::{Deserialize, Deserializer, PublishStatus, Serializer, parse_known, write_known};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S: Serializer>(
        status: &PublishStatus,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        write_known(*status, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<PublishStatus, D::Error> {
        parse_known(&String::deserialize(deserializer)?)
    }
}

/// `known_status` for optional patch fields.
pub(crate) mod known_status_opt {
    use super::{Deserialize, Deserializer, PublishStatus, Serializer, parse_known, write_known};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        status: &Option<PublishStatus>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match status {
            Some(status) => write_known(*status, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PublishStatus>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_known(&raw))
            .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_status_does_not_fail_decoding() {
        let status: PublishStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(status, PublishStatus::Unknown);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Published".parse::<PublishStatus>().unwrap(), PublishStatus::Published);
        assert_eq!(PublishStatus::Archived.to_string(), "archived");
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Patch {
        #[serde(default, with = "known_status_opt", skip_serializing_if = "Option::is_none")]
        status: Option<PublishStatus>,
    }

    #[test]
    fn request_status_rejects_unrecognized_values() {
        let err = serde_json::from_str::<Patch>(r#"{"status":"scheduled"}"#).unwrap_err();
        assert!(err.to_string().contains("scheduled"));
        assert!(serde_json::from_str::<Patch>(r#"{"status":"unknown"}"#).is_err());
    }

    #[test]
    fn request_status_never_writes_unknown() {
        let patch = Patch {
            status: Some(PublishStatus::Unknown),
        };
        assert!(serde_json::to_string(&patch).is_err());

        let patch: Patch = serde_json::from_str(r#"{"status":"Published"}"#).unwrap();
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"status":"published"}"#);
        let empty: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(serde_json::to_string(&empty).unwrap(), "{}");
    }
}
