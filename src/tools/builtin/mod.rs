//! Built-in restaurant tools.
//!
//! Thin adapters between the model-facing JSON-schema surface and the typed
//! operations in [`crate::ops`]. Each tool validates and coerces its
//! parameters here; domain rules live in `ops`.

mod availability;
mod catalog;
mod recommend;
mod reservation;

pub use availability::CheckAvailabilityTool;
pub use catalog::{GetCuisinesTool, GetFeaturesTool, GetLocationsTool};
pub use recommend::RecommendRestaurantsTool;
pub use reservation::{
    CancelReservationTool, CreateReservationTool, GetReservationTool, ModifyReservationTool,
};

use serde_json::Value;

use super::tool::ToolError;

/// Extract a required string parameter.
fn require_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidParameters(format!("missing '{key}' parameter")))
}

/// Extract an optional string parameter. JSON null counts as absent.
fn opt_str(params: &Value, key: &str) -> Option<String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Extract a required non-negative integer. Models sometimes send numbers as
/// strings, so `"4"` is accepted alongside `4`.
fn require_u32(params: &Value, key: &str) -> Result<u32, ToolError> {
    coerce_u32(params.get(key)).ok_or_else(|| {
        ToolError::InvalidParameters(format!("'{key}' must be a non-negative integer"))
    })
}

/// Extract an optional non-negative integer with the same string coercion.
/// An unparseable value is an error; absence and null are not.
fn opt_u32(params: &Value, key: &str) -> Result<Option<u32>, ToolError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        value => coerce_u32(value).map(Some).ok_or_else(|| {
            ToolError::InvalidParameters(format!("'{key}' must be a non-negative integer"))
        }),
    }
}

/// Like [`opt_u32`] but an unparseable value falls back to absent instead of
/// erroring. Used for cosmetic parameters like result limits.
fn opt_u32_lenient(params: &Value, key: &str) -> Option<u32> {
    coerce_u32(params.get(key))
}

fn coerce_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn u32_coercion_accepts_numbers_and_numeric_strings() {
        let params = json!({"a": 4, "b": "7", "c": " 2 ", "d": -1, "e": "four"});

        assert_eq!(require_u32(&params, "a").unwrap(), 4);
        assert_eq!(require_u32(&params, "b").unwrap(), 7);
        assert_eq!(require_u32(&params, "c").unwrap(), 2);
        assert!(require_u32(&params, "d").is_err());
        assert!(require_u32(&params, "e").is_err());
        assert!(require_u32(&params, "missing").is_err());
    }

    #[test]
    fn opt_u32_distinguishes_absent_from_invalid() {
        let params = json!({"bad": "lots", "null": null, "ok": "3"});

        assert_eq!(opt_u32(&params, "missing").unwrap(), None);
        assert_eq!(opt_u32(&params, "null").unwrap(), None);
        assert_eq!(opt_u32(&params, "ok").unwrap(), Some(3));
        assert!(opt_u32(&params, "bad").is_err());
        assert_eq!(opt_u32_lenient(&params, "bad"), None);
    }
}
