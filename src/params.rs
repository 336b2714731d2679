//! 参数层：每个输入条目的参数包与二进制附件读取。
//!
//! Per-item parameter and binary payload readers.
//!
//! The host materializes one [`ParameterBag`] per input item. Optional values
//! that are absent, `null` or an empty string are all "not supplied" and come
//! out of the typed getters as `None`; only required getters turn absence into
//! a validation error.

use crate::{Error, ErrorContext, Result};
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Loosely typed parameters of one input item.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterBag {
    values: Map<String, Value>,
    /// Path of this bag inside its parent, used for error field paths.
    scope: Option<String>,
}

impl From<Map<String, Value>> for ParameterBag {
    fn from(values: Map<String, Value>) -> Self {
        Self {
            values,
            scope: None,
        }
    }
}

impl Serialize for ParameterBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.values.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ParameterBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Map::deserialize(deserializer).map(ParameterBag::from)
    }
}

impl ParameterBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a bag from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            Value::Null => Ok(Self::new()),
            other => Err(Error::validation(format!(
                "Item parameters must be an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Builder-style insert, mostly for tests and programmatic callers.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn field_path(&self, name: &str) -> String {
        match &self.scope {
            Some(scope) => format!("{}.{}", scope, name),
            None => name.to_string(),
        }
    }

    /// Look up a value by name or dotted path. `null` counts as absent.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.values.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        if current.is_null() {
            None
        } else {
            Some(current)
        }
    }

    fn type_error(&self, name: &str, expected: &str, found: &Value) -> Error {
        Error::validation_with_context(
            format!(
                "Parameter \"{}\" must be {}, got {}",
                name,
                expected,
                type_name(found)
            ),
            ErrorContext::new()
                .with_field_path(self.field_path(name))
                .with_source("parameter_bag"),
        )
    }

    fn scalar_string(&self, name: &str) -> Result<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(self.type_error(name, "a string", other)),
        }
    }

    /// A value the caller must supply; empty strings are rejected.
    pub fn required_str(&self, name: &str) -> Result<String> {
        match self.scalar_string(name)? {
            Some(s) if !s.is_empty() => Ok(s),
            _ => Err(Error::validation_with_context(
                format!("Parameter \"{}\" is required", name),
                ErrorContext::new()
                    .with_field_path(self.field_path(name))
                    .with_source("parameter_bag"),
            )),
        }
    }

    /// An optional value; absent, `null` and `""` all map to `None`.
    pub fn optional_str(&self, name: &str) -> Result<Option<String>> {
        Ok(self.scalar_string(name)?.filter(|s| !s.is_empty()))
    }

    /// A value with a host-declared default. The default applies only when the
    /// parameter is absent; an explicit empty string is rejected.
    pub fn str_or(&self, name: &str, default: &str) -> Result<String> {
        if self.get(name).is_none() {
            return Ok(default.to_string());
        }
        self.required_str(name)
    }

    pub fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if s.is_empty() => Ok(default),
            Some(Value::String(s)) => match s.as_str() {
                "true" => Ok(true),
                "false" => Ok(false),
                _ => Err(self.type_error(name, "a boolean", &Value::String(s.clone()))),
            },
            Some(other) => Err(self.type_error(name, "a boolean", other)),
        }
    }

    /// A number with a default for the unset case (absent, `null` or `""`).
    pub fn f64_or(&self, name: &str, default: f64) -> Result<f64> {
        match self.get(name) {
            None => Ok(default),
            Some(Value::Number(n)) => n
                .as_f64()
                .ok_or_else(|| self.type_error(name, "a number", &Value::Number(n.clone()))),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(default),
            // `inf` and `NaN` parse but have no JSON encoding.
            Some(Value::String(s)) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| self.type_error(name, "a number", &Value::String(s.clone()))),
            Some(other) => Err(self.type_error(name, "a number", other)),
        }
    }

    pub fn u32_or(&self, name: &str, default: u32) -> Result<u32> {
        let value = self.f64_or(name, default as f64)?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(Error::validation_with_context(
                format!(
                    "Parameter \"{}\" must be a non-negative integer, got {}",
                    name, value
                ),
                ErrorContext::new()
                    .with_field_path(self.field_path(name))
                    .with_source("parameter_bag"),
            ));
        }
        Ok(value as u32)
    }

    /// A nested record as its own scoped bag; absent records yield `None`.
    pub fn record(&self, path: &str) -> Result<Option<ParameterBag>> {
        match self.get(path) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(ParameterBag {
                values: map.clone(),
                scope: Some(self.field_path(path)),
            })),
            Some(other) => Err(self.type_error(path, "an object", other)),
        }
    }

    /// A list of nested records; absent collections yield an empty list.
    pub fn collection(&self, path: &str) -> Result<Vec<ParameterBag>> {
        let entries = match self.get(path) {
            None => return Ok(Vec::new()),
            Some(Value::Array(entries)) => entries,
            Some(other) => return Err(self.type_error(path, "a list", other)),
        };

        let base = self.field_path(path);
        entries
            .iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                Value::Object(map) => Ok(ParameterBag {
                    values: map.clone(),
                    scope: Some(format!("{}[{}]", base, i)),
                }),
                other => Err(Error::validation_with_context(
                    format!("Entry {} of \"{}\" must be an object", i, path),
                    ErrorContext::new()
                        .with_field_path(format!("{}[{}]", base, i))
                        .with_details(format!("got {}", type_name(other)))
                        .with_source("parameter_bag"),
                )),
            })
            .collect()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Binary payload attached to an input item, as handed over by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryData {
    /// Base64-encoded content.
    pub data: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl BinaryData {
    pub fn new(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Decode the transport encoding back into raw bytes.
    pub fn decode(&self) -> Result<Bytes> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map(Bytes::from)
            .map_err(|e| {
                Error::validation_with_context(
                    "Binary data is not valid base64",
                    ErrorContext::new()
                        .with_details(e.to_string())
                        .with_source("binary_reader"),
                )
            })
    }
}

/// One input item: its parameters plus optional named binary payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub json: ParameterBag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<HashMap<String, BinaryData>>,
}

impl Item {
    pub fn new(json: ParameterBag) -> Self {
        Self { json, binary: None }
    }

    pub fn with_binary(mut self, property: impl Into<String>, data: BinaryData) -> Self {
        self.binary
            .get_or_insert_with(HashMap::new)
            .insert(property.into(), data);
        self
    }

    /// Read a named binary property of this item.
    pub fn binary_property(&self, property: &str) -> Result<&BinaryData> {
        let binary = self
            .binary
            .as_ref()
            .ok_or_else(|| Error::missing_binary("No binary data exists on item!"))?;
        binary.get(property).ok_or_else(|| {
            Error::missing_binary(format!(
                "No binary data property \"{}\" exists on item!",
                property
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> ParameterBag {
        ParameterBag::from_value(value).unwrap()
    }

    #[test]
    fn optional_empty_string_is_not_supplied() {
        let params = bag(json!({ "callbackUrl": "", "callbackId": "abc", "title": null }));
        assert_eq!(params.optional_str("callbackUrl").unwrap(), None);
        assert_eq!(params.optional_str("title").unwrap(), None);
        assert_eq!(params.optional_str("folderId").unwrap(), None);
        assert_eq!(
            params.optional_str("callbackId").unwrap().as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let params = bag(json!({ "scale": "inf", "speed": "NaN", "offsetX": " 1.5 " }));
        for name in ["scale", "speed"] {
            let err = params.f64_or(name, 1.0).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{}", name);
            assert_eq!(err.context().and_then(|c| c.field_path.as_deref()), Some(name));
        }
        assert_eq!(params.f64_or("offsetX", 0.0).unwrap(), 1.5);
    }

    #[test]
    fn required_rejects_absent_and_empty() {
        let params = bag(json!({ "groupId": "" }));
        let err = params.required_str("groupId").unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert!(params.required_str("avatarId").is_err());
    }

    #[test]
    fn defaults_apply_only_when_absent() {
        let params = bag(json!({ "gender": "" }));
        assert_eq!(params.str_or("age", "Young Adult").unwrap(), "Young Adult");
        assert!(params.str_or("gender", "Man").is_err());
    }

    #[test]
    fn dotted_paths_reach_nested_collections() {
        let params = bag(json!({
            "videoInput": { "videoInputValues": [ { "avatarId": "a1" }, { "avatarId": "" } ] }
        }));
        let scenes = params.collection("videoInput.videoInputValues").unwrap();
        assert_eq!(scenes.len(), 2);
        assert_eq!(scenes[0].required_str("avatarId").unwrap(), "a1");

        let err = scenes[1].required_str("avatarId").unwrap_err();
        assert_eq!(
            err.context().unwrap().field_path.as_deref(),
            Some("videoInput.videoInputValues[1].avatarId")
        );
    }

    #[test]
    fn missing_collection_is_empty() {
        let params = bag(json!({}));
        assert!(params.collection("videoInput.videoInputValues").unwrap().is_empty());
    }

    #[test]
    fn numbers_accept_numeric_strings() {
        let params = bag(json!({ "scale": "0.5", "speed": 1.25, "offsetX": "" }));
        assert_eq!(params.f64_or("scale", 1.0).unwrap(), 0.5);
        assert_eq!(params.f64_or("speed", 1.0).unwrap(), 1.25);
        assert_eq!(params.f64_or("offsetX", 0.0).unwrap(), 0.0);
        assert!(bag(json!({ "width": 12.5 })).u32_or("width", 1280).is_err());
    }

    #[test]
    fn binary_property_lookup() {
        let item = Item::new(ParameterBag::new());
        assert!(matches!(
            item.binary_property("data"),
            Err(Error::MissingBinary { .. })
        ));

        let item = item.with_binary("data", BinaryData::new(b"hello", "text/plain"));
        assert!(matches!(
            item.binary_property("file"),
            Err(Error::MissingBinary { .. })
        ));
        let data = item.binary_property("data").unwrap();
        assert_eq!(data.decode().unwrap(), Bytes::from_static(b"hello"));
    }
}
