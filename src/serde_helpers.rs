//! Decoding of raw response bodies.
//!
//! Every body goes through [`decode`]: it must be JSON, and it must be an object or an array.
//! When the `tracing` feature is enabled, fields the target type does not capture are logged as
//! warnings, which helps spot API changes early.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Result;
use crate::error::Error;

/// Decodes a raw response body into `T`.
///
/// Fails with [`crate::error::Kind::Decode`] when the body is not JSON, when it is a JSON scalar
/// (string, number, boolean or null), or when it does not match `T`. The original body is kept on
/// the error.
pub(crate) fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    let value: Value = serde_json::from_str(body).map_err(|e| Error::decode(body, e))?;

    if !(value.is_object() || value.is_array()) {
        return Err(Error::decode(body, "expected a JSON object or array"));
    }

    deserialize_with_warnings(value).map_err(|e| Error::decode(body, e))
}

/// Removes `field` from a decoded object and deserializes it into `T`.
///
/// `path` names the endpoint the value came from and is only used for the error.
pub(crate) fn take_field<T: DeserializeOwned>(mut value: Value, field: &str, path: &str) -> Result<T> {
    let Some(inner) = value.get_mut(field).map(Value::take) else {
        #[cfg(feature = "tracing")]
        tracing::warn!(field = %field, path = %path, "expected field missing from API response");

        return Err(Error::missing_field(field, path));
    };

    let body = inner.to_string();
    deserialize_with_warnings(inner).map_err(|e| Error::decode(body, e))
}

/// Deserialize JSON, logging every field that is not captured by `T`.
///
/// Unknown fields trigger warnings but never cause deserialization to fail. On failure the JSON
/// path of the offending value is logged at `error`.
#[cfg(feature = "tracing")]
fn deserialize_with_warnings<T: DeserializeOwned>(
    value: Value,
) -> std::result::Result<T, serde_json::Error> {
    use std::any::type_name;

    let original = value.clone();
    let mut unknown_paths: Vec<String> = Vec::new();

    let result: T = serde_ignored::deserialize(value, |path| {
        unknown_paths.push(path.to_string());
    })
    .inspect_err(|_| {
        let json = original.to_string();
        let deserializer = &mut serde_json::Deserializer::from_str(&json);
        let path_result: std::result::Result<T, _> = serde_path_to_error::deserialize(deserializer);
        if let Err(path_err) = path_result {
            let path = path_err.path().to_string();
            tracing::error!(
                type_name = %type_name::<T>(),
                path = %path,
                value = %format_value(lookup_value(&original, &path)),
                error = %path_err.inner(),
                "deserialization failed"
            );
        }
    })?;

    for path in unknown_paths {
        tracing::warn!(
            type_name = %type_name::<T>(),
            field = %path,
            value = %format_value(lookup_value(&original, &path)),
            "unknown field in API response"
        );
    }

    Ok(result)
}

#[cfg(not(feature = "tracing"))]
fn deserialize_with_warnings<T: DeserializeOwned>(
    value: Value,
) -> std::result::Result<T, serde_json::Error> {
    serde_json::from_value(value)
}

/// Looks up a value by a `serde_ignored` / `serde_path_to_error` path such as `symbols[3].filters`
/// or `balances.0.free`. `?` segments (Option wrappers) are skipped.
#[cfg(feature = "tracing")]
fn lookup_value<'value>(value: &'value Value, path: &str) -> Option<&'value Value> {
    path.split(['.', '[', ']'])
        .filter(|segment| !segment.is_empty() && *segment != "?")
        .try_fold(value, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?),
            _ => None,
        })
}

#[cfg(feature = "tracing")]
fn format_value(value: Option<&Value>) -> String {
    value.map_or_else(|| "<unable to retrieve>".to_owned(), Value::to_string)
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::error::{Decode, Kind, MissingField};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Price {
        symbol: String,
        price: String,
    }

    #[test]
    fn decode_object_should_succeed() -> Result<()> {
        let price: Price = decode(r#"{"symbol":"BNBBTC","price":"1.23","extra":true}"#)?;

        assert_eq!(
            price,
            Price {
                symbol: "BNBBTC".to_owned(),
                price: "1.23".to_owned()
            }
        );

        Ok(())
    }

    #[test]
    fn decode_array_into_value_should_succeed() -> Result<()> {
        let value: Value = decode("[]")?;

        assert_eq!(value, json!([]));

        Ok(())
    }

    #[test]
    fn decode_invalid_json_should_fail() {
        let err = decode::<Value>("<html>502 Bad Gateway</html>").unwrap_err();

        assert_eq!(err.kind(), Kind::Decode);
        assert_eq!(
            err.downcast_ref::<Decode>().map(|d| d.body.as_str()),
            Some("<html>502 Bad Gateway</html>")
        );
    }

    #[test]
    fn decode_scalar_should_fail() {
        for body in ["42", r#""ok""#, "true", "null"] {
            let err = decode::<Value>(body).unwrap_err();
            assert_eq!(err.kind(), Kind::Decode, "{body} should not decode");
        }
    }

    #[test]
    fn decode_mismatched_shape_should_fail() {
        let err = decode::<Price>(r#"{"symbol":"BNBBTC"}"#).unwrap_err();

        assert_eq!(err.kind(), Kind::Decode);
    }

    #[test]
    fn take_field_should_unwrap_envelope() -> Result<()> {
        let value = json!({ "timezone": "UTC", "symbols": [{ "symbol": "BNBBTC", "price": "1" }] });

        let symbols: Vec<Price> = take_field(value, "symbols", "/api/v1/exchangeInfo")?;

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].symbol, "BNBBTC");

        Ok(())
    }

    #[test]
    fn take_field_missing_should_fail() {
        let err = take_field::<Value>(json!({ "makerCommission": 10 }), "balances", "/api/v3/account")
            .unwrap_err();

        assert_eq!(err.kind(), Kind::MissingField);
        let missing = err.downcast_ref::<MissingField>().expect("missing field source");
        assert_eq!(missing.field, "balances");
        assert_eq!(missing.path, "/api/v3/account");
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn lookup_value_should_follow_mixed_paths() {
        let value = json!({ "symbols": [{ "filters": [{ "minPrice": "0.1" }] }] });

        assert_eq!(
            lookup_value(&value, "symbols[0].filters.0.minPrice"),
            Some(&json!("0.1"))
        );
        assert_eq!(lookup_value(&value, "symbols[4]"), None);
        assert_eq!(format_value(None), "<unable to retrieve>");
    }
}
