//! Deserializers that trim surrounding whitespace from string fields.

use serde::{Deserialize, Deserializer};

pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|value| value.trim().to_string())
}

/// Pair with `#[serde(default)]` so an absent field stays `None`.
pub fn trimmed_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
        .map(|value| value.map(|value| value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Named {
        #[serde(deserialize_with = "trimmed")]
        name: String,
        #[serde(default, deserialize_with = "trimmed_opt")]
        alias: Option<String>,
    }

    #[test]
    fn trims_required_and_optional_fields() {
        let named: Named = serde_json::from_str(r#"{"name": "  Acme ", "alias": "\tA "}"#).unwrap();
        assert_eq!(named.name, "Acme");
        assert_eq!(named.alias.as_deref(), Some("A"));
    }

    #[test]
    fn absent_and_null_optionals_stay_none() {
        let named: Named = serde_json::from_str(r#"{"name": "Acme"}"#).unwrap();
        assert_eq!(named.alias, None);
        let named: Named = serde_json::from_str(r#"{"name": "Acme", "alias": null}"#).unwrap();
        assert_eq!(named.alias, None);
    }
}
