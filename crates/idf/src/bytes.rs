//! Serde helpers for binary payloads.

pub(crate) mod base64_or_array {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    /// Accepts a base64 string or a plain array of byte values.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BytesDef {
            Encoded(String),
            Raw(Vec<u8>),
        }

        match BytesDef::deserialize(deserializer)? {
            BytesDef::Encoded(s) => STANDARD.decode(s.trim()).map_err(de::Error::custom),
            BytesDef::Raw(bytes) => Ok(bytes),
        }
    }
}
