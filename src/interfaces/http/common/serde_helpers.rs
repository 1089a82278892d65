//! Lenient deserializers for form-style payloads

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Text(String),
}

/// Accepts `true`/`false` as well as the `"yes"`/`"no"` strings the request
/// forms submit.
pub fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => match text.trim().to_lowercase().as_str() {
            "yes" | "true" | "1" => Ok(true),
            "no" | "false" | "0" | "" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected yes or no, got '{}'",
                other
            ))),
        },
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
}

/// Optional number from a form field. Numeric strings are parsed; blank or
/// unreadable text reads as absent instead of failing the whole payload.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Loose>::deserialize(deserializer)? {
        None => None,
        Some(Loose::Number(n)) => Some(n),
        Some(Loose::Text(text)) => text.trim().parse::<f64>().ok(),
    };
    Ok(value.filter(|n| n.is_finite()))
}
