//! Compact codec for state carried in shareable URLs.
//!
//! Values are serialized to JSON and then base64 (standard alphabet, no
//! padding) so they survive inside a query string. The decoder accepts
//! padded input too, since links get reassembled by hand.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine, GeneralPurpose, GeneralPurposeConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Query parameter carrying the durable filter profile.
pub const PROFILE_PARAM: &str = "profile";
/// Query parameter carrying the volatile filter state.
pub const EPHEMERAL_PARAM: &str = "ephemeral";
/// Query parameter carrying a full-record task permalink override.
pub const PERMA_PARAM: &str = "perma";

const ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodecError {
    Base64(String),
    Json(String),
    Utf8(String),
}

impl CodecError {
    pub fn message(&self) -> String {
        match self {
            CodecError::Base64(msg) => format!("not valid base64: {msg}"),
            CodecError::Json(msg) => format!("payload is not valid JSON: {msg}"),
            CodecError::Utf8(msg) => format!("payload is not UTF-8: {msg}"),
        }
    }
}

impl From<base64::DecodeError> for CodecError {
    fn from(err: base64::DecodeError) -> Self {
        CodecError::Base64(err.to_string())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        CodecError::Json(err.to_string())
    }
}

impl From<std::string::FromUtf8Error> for CodecError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        CodecError::Utf8(err.to_string())
    }
}

pub fn serialize<T: Serialize>(value: &T) -> Result<String, CodecError> {
    let json = serde_json::to_string(value)?;
    Ok(ENGINE.encode(json.as_bytes()))
}

pub fn deserialize<T: DeserializeOwned>(text: &str) -> Result<T, CodecError> {
    let bytes = ENGINE.decode(text.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FilterEphemeral, FilterProfile};
    use serde_json::json;

    #[test]
    fn profile_round_trips() {
        let profile = FilterProfile {
            equipment: vec!["gloves".to_string(), "mop".to_string()],
            excluded: vec!["outdoor".to_string()],
        };
        let encoded = serialize(&profile).unwrap();
        assert_eq!(deserialize::<FilterProfile>(&encoded).unwrap(), profile);
    }

    #[test]
    fn ephemeral_round_trips() {
        let mut ephemeral = FilterEphemeral::default();
        ephemeral.set_duration_range([0.25, 0.75]);
        ephemeral.search = Some("dishes".to_string());
        let encoded = serialize(&ephemeral).unwrap();
        assert_eq!(deserialize::<FilterEphemeral>(&encoded).unwrap(), ephemeral);
    }

    #[test]
    fn arbitrary_json_with_unicode_round_trips() {
        let value = json!({
            "name": "Aufräumen 🧹",
            "nested": { "tags": ["уборка", "掃除"], "n": [1, 2, 3] },
        });
        let encoded = serialize(&value).unwrap();
        assert_eq!(deserialize::<serde_json::Value>(&encoded).unwrap(), value);
    }

    #[test]
    fn encoding_emits_no_padding_but_decoding_accepts_it() {
        // JSON "abc" is five bytes, so the padded form carries exactly one '='.
        let encoded = serialize(&json!("abc")).unwrap();
        assert!(!encoded.contains('='));
        assert_eq!(encoded.len() % 4, 3);
        let padded = format!("{encoded}=");
        let unpadded: serde_json::Value = deserialize(&encoded).unwrap();
        let repadded: serde_json::Value = deserialize(&padded).unwrap();
        assert_eq!(unpadded, repadded);
    }

    #[test]
    fn garbage_input_reports_a_decode_error() {
        assert!(matches!(
            deserialize::<serde_json::Value>("@@not-base64@@"),
            Err(CodecError::Base64(_))
        ));
        // Valid base64 of something that is not JSON.
        let not_json = ENGINE.encode(b"][");
        assert!(matches!(
            deserialize::<serde_json::Value>(&not_json),
            Err(CodecError::Json(_))
        ));
    }
}
