use std::io::Read;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use crate::CliError;

/// Where the record to validate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
    /// `KEY=VALUE` pairs, kept as strings the way query parameters arrive.
    Params(Vec<(String, String)>),
}

impl InputSource {
    /// Params win when given; no path (or `-`) means stdin.
    pub fn resolve(input: Option<PathBuf>, params: Vec<(String, String)>) -> Self {
        if !params.is_empty() {
            return InputSource::Params(params);
        }
        match input {
            Some(path) if path != Path::new("-") => InputSource::File(path),
            _ => InputSource::Stdin,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "stdin".to_string(),
            InputSource::Params(params) => format!("{} param(s)", params.len()),
        }
    }

    pub fn read(&self) -> Result<JsonValue, CliError> {
        match self {
            InputSource::File(path) => {
                let content = std::fs::read_to_string(path)?;
                Ok(serde_json::from_str(&content)?)
            }
            InputSource::Stdin => {
                let mut content = String::new();
                std::io::stdin().read_to_string(&mut content)?;
                Ok(serde_json::from_str(&content)?)
            }
            InputSource::Params(params) => Ok(params_to_json(params)),
        }
    }
}

/// Parse a `KEY=VALUE` argument. The value may itself contain `=`.
pub fn parse_param(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Later pairs override earlier ones with the same key.
pub fn params_to_json(params: &[(String, String)]) -> JsonValue {
    let mut map = Map::new();
    for (key, value) in params {
        map.insert(key.clone(), JsonValue::String(value.clone()));
    }
    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn params_parse_on_first_equals() {
        assert_eq!(
            parse_param("q=a=b"),
            Ok(("q".to_string(), "a=b".to_string()))
        );
        assert_eq!(parse_param("short="), Ok(("short".to_string(), String::new())));
        assert!(parse_param("novalue").is_err());
        assert!(parse_param("=1").is_err());
    }

    #[test]
    fn params_become_string_fields() {
        let params = vec![
            ("skip".to_string(), "5".to_string()),
            ("limit".to_string(), "20".to_string()),
            ("skip".to_string(), "7".to_string()),
        ];
        assert_eq!(params_to_json(&params), json!({"skip": "7", "limit": "20"}));
    }

    #[test]
    fn source_resolution_prefers_params() {
        let params = vec![("num".to_string(), "3".to_string())];
        assert!(matches!(
            InputSource::resolve(Some(PathBuf::from("order.json")), params),
            InputSource::Params(_)
        ));
        assert_eq!(
            InputSource::resolve(Some(PathBuf::from("-")), Vec::new()),
            InputSource::Stdin
        );
        assert_eq!(InputSource::resolve(None, Vec::new()), InputSource::Stdin);
        assert_eq!(
            InputSource::resolve(Some(PathBuf::from("order.json")), Vec::new()),
            InputSource::File(PathBuf::from("order.json"))
        );
    }
}
