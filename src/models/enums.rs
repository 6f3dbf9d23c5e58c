//! Enums shared by the schema records

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Data type of an attribute
///
/// The set is closed: every stored attribute carries exactly one of these
/// variants. Persisted rows hold the small integer [`code`](Self::code), which
/// is decoded with `TryFrom<u8>` at the store boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Text,
    Integer,
    Decimal,
    DateTime,
    Boolean,
    List,
    Dictionary,
}

impl AttributeType {
    /// All variants in code order
    pub const ALL: [AttributeType; 7] = [
        AttributeType::Text,
        AttributeType::Integer,
        AttributeType::Decimal,
        AttributeType::DateTime,
        AttributeType::Boolean,
        AttributeType::List,
        AttributeType::Dictionary,
    ];

    /// Persisted code for this type
    pub fn code(self) -> u8 {
        match self {
            AttributeType::Text => 1,
            AttributeType::Integer => 2,
            AttributeType::Decimal => 3,
            AttributeType::DateTime => 4,
            AttributeType::Boolean => 5,
            AttributeType::List => 6,
            AttributeType::Dictionary => 7,
        }
    }

    /// Display label, as shown in the editor and accepted by the API
    pub fn label(self) -> &'static str {
        match self {
            AttributeType::Text => "Text",
            AttributeType::Integer => "Integer",
            AttributeType::Decimal => "Decimal",
            AttributeType::DateTime => "Date/Time",
            AttributeType::Boolean => "Boolean",
            AttributeType::List => "List",
            AttributeType::Dictionary => "Dictionary",
        }
    }

    /// Parse a display label (case-insensitive, with legacy aliases)
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "text" | "string" => Some(AttributeType::Text),
            "integer" => Some(AttributeType::Integer),
            "decimal" | "float" => Some(AttributeType::Decimal),
            "date/time" | "datetime" => Some(AttributeType::DateTime),
            "boolean" | "true/false" => Some(AttributeType::Boolean),
            "list" => Some(AttributeType::List),
            "dictionary" => Some(AttributeType::Dictionary),
            _ => None,
        }
    }
}

/// Error returned when a persisted type code is outside the enumeration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown attribute type code: {0}")]
pub struct UnknownAttributeType(pub u8);

impl TryFrom<u8> for AttributeType {
    type Error = UnknownAttributeType;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        AttributeType::ALL
            .into_iter()
            .find(|t| t.code() == code)
            .ok_or(UnknownAttributeType(code))
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for AttributeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for AttributeType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The editor sends labels; older clients send the integer code.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(u8),
            Label(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => AttributeType::try_from(code).map_err(serde::de::Error::custom),
            Raw::Label(label) => AttributeType::from_label(&label).ok_or_else(|| {
                serde::de::Error::custom(format!("Unknown attribute type: {}", label))
            }),
        }
    }
}

/// HTTP method tag of a user-defined action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
    Get,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl std::str::FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "POST" => Ok(HttpMethod::Post),
            "GET" => Ok(HttpMethod::Get),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(format!("Unsupported HTTP method: {}", s)),
        }
    }
}

/// Output format a project compiles to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetLanguage {
    #[default]
    #[serde(rename = "Sails.js")]
    SailsJs,
}

impl TargetLanguage {
    pub fn code(self) -> u8 {
        match self {
            TargetLanguage::SailsJs => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_for_every_variant() {
        for t in AttributeType::ALL {
            assert_eq!(AttributeType::try_from(t.code()), Ok(t));
        }
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert_eq!(AttributeType::try_from(0), Err(UnknownAttributeType(0)));
        assert_eq!(AttributeType::try_from(8), Err(UnknownAttributeType(8)));
    }

    #[test]
    fn test_deserialize_label_alias_and_code() {
        let t: AttributeType = serde_json::from_str("\"Date/Time\"").unwrap();
        assert_eq!(t, AttributeType::DateTime);
        let t: AttributeType = serde_json::from_str("\"True/False\"").unwrap();
        assert_eq!(t, AttributeType::Boolean);
        let t: AttributeType = serde_json::from_str("3").unwrap();
        assert_eq!(t, AttributeType::Decimal);
        assert!(serde_json::from_str::<AttributeType>("\"Blob\"").is_err());
        assert!(serde_json::from_str::<AttributeType>("42").is_err());
    }

    #[test]
    fn test_http_method_parse() {
        assert_eq!("get".parse::<HttpMethod>(), Ok(HttpMethod::Get));
        assert!("PATCH".parse::<HttpMethod>().is_err());
        let m: HttpMethod = serde_json::from_str("\"DELETE\"").unwrap();
        assert_eq!(m, HttpMethod::Delete);
    }
}
