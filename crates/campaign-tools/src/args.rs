//! Typed access to a tool call's argument object.

use serde_json::{Map, Value};

use crate::error::ToolError;

/// Arguments passed to a tool for execution.
///
/// `null` and blank strings count as missing.
#[derive(Debug, Clone, Default)]
pub struct ToolArgs {
    params: Map<String, Value>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: Map<String, Value>) -> Self {
        Self { params }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        match self.params.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.present(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| ToolError::invalid(key, "expected string"))
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.present(key)?.as_str().map(|s| s.trim().to_string())
    }

    /// Get an integer parameter, returning an error if missing or not integral.
    ///
    /// Whole floats and numeric strings are accepted.
    pub fn get_integer(&self, key: &str) -> Result<i64, ToolError> {
        self.get_integer_opt(key)?
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))
    }

    /// Get an optional integer parameter.
    pub fn get_integer_opt(&self, key: &str) -> Result<Option<i64>, ToolError> {
        let value = match self.present(key) {
            Some(v) => v,
            None => return Ok(None),
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(whole))
            }
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ToolError::invalid(key, "expected integer"))
    }
}

fn whole(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(value: Value) -> ToolArgs {
        match value {
            Value::Object(map) => ToolArgs::new(map),
            _ => ToolArgs::default(),
        }
    }

    #[test]
    fn test_get_string() {
        let args = args(json!({"projectId": " p1 ", "count": 3, "blank": "  ", "none": null}));
        assert_eq!(args.get_string("projectId").unwrap(), "p1");
        assert!(matches!(args.get_string("missing"), Err(ToolError::MissingParameter(_))));
        assert!(matches!(args.get_string("blank"), Err(ToolError::MissingParameter(_))));
        assert!(matches!(args.get_string("none"), Err(ToolError::MissingParameter(_))));
        assert!(matches!(args.get_string("count"), Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_get_integer_forms() {
        let args = args(json!({"a": 2, "b": 2.0, "c": "7", "d": 1.5, "e": "x", "f": true}));
        assert_eq!(args.get_integer("a").unwrap(), 2);
        assert_eq!(args.get_integer("b").unwrap(), 2);
        assert_eq!(args.get_integer("c").unwrap(), 7);
        assert!(args.get_integer("d").is_err());
        assert!(args.get_integer("e").is_err());
        assert!(args.get_integer("f").is_err());
        assert_eq!(args.get_integer_opt("missing").unwrap(), None);
    }
}
