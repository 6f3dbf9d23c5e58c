//! Attribute type to Sails.js type token mapping

use crate::models::AttributeType;

/// Map an attribute type to the Sails.js attribute `type` token.
///
/// The enumeration is closed, so the mapping is total.
///
/// | Attribute type | Token |
/// |---|---|
/// | Text | `string` |
/// | Integer, Decimal, Date/Time | `number` |
/// | Boolean | `boolean` |
/// | List, Dictionary | `json` |
pub fn map_type(attribute_type: AttributeType) -> &'static str {
    match attribute_type {
        AttributeType::Text => "string",
        AttributeType::Integer | AttributeType::Decimal | AttributeType::DateTime => "number",
        AttributeType::Boolean => "boolean",
        AttributeType::List | AttributeType::Dictionary => "json",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        let expected = [
            (AttributeType::Text, "string"),
            (AttributeType::Integer, "number"),
            (AttributeType::Decimal, "number"),
            (AttributeType::DateTime, "number"),
            (AttributeType::Boolean, "boolean"),
            (AttributeType::List, "json"),
            (AttributeType::Dictionary, "json"),
        ];
        assert_eq!(expected.len(), AttributeType::ALL.len());
        for (attribute_type, token) in expected {
            assert_eq!(map_type(attribute_type), token, "{}", attribute_type);
        }
    }

    #[test]
    fn test_every_type_has_a_token() {
        for attribute_type in AttributeType::ALL {
            assert!(!map_type(attribute_type).is_empty());
        }
    }
}
