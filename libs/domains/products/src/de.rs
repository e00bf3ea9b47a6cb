//! Lenient deserializers for product request bodies.
//!
//! Clients post numbers either as JSON numbers or as numeric strings, and
//! `categories` either as a list of names or as a single name.

use serde::{Deserialize, Deserializer, de::Error};

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn to_i32<E: Error>(value: IntOrString) -> Result<i32, E> {
    let number = match value {
        IntOrString::Int(number) => number,
        IntOrString::Text(text) => text
            .trim()
            .parse::<i64>()
            .map_err(|_| E::custom("A valid integer is required."))?,
    };

    i32::try_from(number).map_err(|_| E::custom("Ensure this value fits in a 32-bit integer."))
}

pub fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    to_i32(IntOrString::deserialize(deserializer)?)
}

pub fn option_int_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<IntOrString>::deserialize(deserializer)?
        .map(to_i32)
        .transpose()
}

/// `null`, `""`, `"Sport"` or `["Sport", "Football"]`.
pub fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(name)) if name.is_empty() => Vec::new(),
        Some(OneOrMany::One(name)) => vec![name],
        Some(OneOrMany::Many(names)) => names,
    };
    Ok(names)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Body {
        #[serde(default, deserialize_with = "super::int_or_string")]
        quantity: i32,
        #[serde(default, deserialize_with = "super::option_int_or_string")]
        limit: Option<i32>,
        #[serde(default, deserialize_with = "super::one_or_many")]
        categories: Vec<String>,
    }

    fn parse(json: &str) -> Result<Body, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_numbers_and_numeric_strings() {
        assert_eq!(parse(r#"{"quantity": 25}"#).unwrap().quantity, 25);
        assert_eq!(parse(r#"{"quantity": "25"}"#).unwrap().quantity, 25);
        assert_eq!(parse(r#"{"quantity": "-3"}"#).unwrap().quantity, -3);
        assert_eq!(parse(r#"{"limit": "7"}"#).unwrap().limit, Some(7));
        assert_eq!(parse(r#"{"limit": null}"#).unwrap().limit, None);
        assert_eq!(parse("{}").unwrap().quantity, 0);
    }

    #[test]
    fn test_rejects_non_integers() {
        assert!(parse(r#"{"quantity": "lots"}"#).is_err());
        assert!(parse(r#"{"quantity": 2.5}"#).is_err());
        assert!(parse(r#"{"quantity": 99999999999}"#).is_err());
    }

    #[test]
    fn test_categories_one_or_many() {
        assert_eq!(parse(r#"{"categories": "Sport"}"#).unwrap().categories, ["Sport"]);
        assert_eq!(
            parse(r#"{"categories": ["Sport", "Football"]}"#).unwrap().categories,
            ["Sport", "Football"]
        );
        assert!(parse(r#"{"categories": ""}"#).unwrap().categories.is_empty());
        assert!(parse(r#"{"categories": null}"#).unwrap().categories.is_empty());
        assert!(parse("{}").unwrap().categories.is_empty());
    }
}
