use std::any::Any;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::type_registry::TypeRegistry;
use crate::{BridgeError, BridgeResult};

/// One element of the `parametersJson` array.
///
/// `value` is the JSON text of the argument; absent, `null` or empty means no value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterJson {
  #[serde(rename = "type")]
  pub type_name: String,
  #[serde(default)]
  pub value: Option<Value>,
}

impl ParameterJson {
  pub fn new(type_name: &str, value: &str) -> Self {
    Self {
      type_name: type_name.to_string(),
      value: Some(Value::String(value.to_string())),
    }
  }

  pub fn value_text(&self) -> Option<String> {
    match &self.value {
      None | Some(Value::Null) => None,
      Some(Value::String(text)) if text.is_empty() => None,
      Some(Value::String(text)) => Some(text.clone()),
      Some(other) => Some(other.to_string()),
    }
  }
}

#[derive(Clone)]
pub struct AnyArgument {
  type_name: String,
  value: Option<Arc<dyn Any + Send + Sync>>,
}

impl AnyArgument {
  pub fn new<T>(type_name: &str, value: T) -> Self
  where
    T: Send + Sync + 'static, {
    Self {
      type_name: type_name.to_string(),
      value: Some(Arc::new(value)),
    }
  }

  pub fn none(type_name: &str) -> Self {
    Self {
      type_name: type_name.to_string(),
      value: None,
    }
  }

  pub(crate) fn from_any(type_name: &str, value: Arc<dyn Any + Send + Sync>) -> Self {
    Self {
      type_name: type_name.to_string(),
      value: Some(value),
    }
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }

  pub fn is_none(&self) -> bool {
    self.value.is_none()
  }

  pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
    self.value.as_ref().and_then(|value| value.downcast_ref::<T>())
  }
}

impl Debug for AnyArgument {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("AnyArgument")
      .field("type_name", &self.type_name)
      .field("is_none", &self.is_none())
      .finish()
  }
}

#[derive(Debug, Clone, Default)]
pub struct Arguments {
  values: Vec<AnyArgument>,
}

impl From<Vec<AnyArgument>> for Arguments {
  fn from(values: Vec<AnyArgument>) -> Self {
    Self { values }
  }
}

impl Arguments {
  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &AnyArgument> {
    self.values.iter()
  }

  pub fn type_names(&self) -> Vec<String> {
    self.values.iter().map(|value| value.type_name().to_string()).collect()
  }

  /// The argument at `position`, `None` if the caller supplied no value.
  pub fn get<T: Clone + 'static>(&self, position: usize) -> BridgeResult<Option<T>> {
    let argument = self
      .values
      .get(position)
      .ok_or(BridgeError::MissingArgument { position })?;
    if argument.is_none() {
      return Ok(None);
    }
    argument
      .downcast_ref::<T>()
      .cloned()
      .map(Some)
      .ok_or_else(|| BridgeError::ArgumentTypeMismatch {
        position,
        type_name: std::any::type_name::<T>().to_string(),
      })
  }

  pub fn required<T: Clone + 'static>(&self, position: usize) -> BridgeResult<T> {
    self.get::<T>(position)?.ok_or(BridgeError::MissingArgument { position })
  }
}

/// Turns `[{type, value}]` JSON into positional arguments typed by the registry.
#[derive(Debug, Clone)]
pub struct ParameterMarshaler {
  registry: Arc<TypeRegistry>,
  lenient_string_values: bool,
}

impl ParameterMarshaler {
  pub fn new(registry: Arc<TypeRegistry>) -> Self {
    Self {
      registry,
      lenient_string_values: true,
    }
  }

  pub fn with_lenient_string_values(mut self, lenient: bool) -> Self {
    self.lenient_string_values = lenient;
    self
  }

  /// A blank document is read as an empty parameter list.
  pub fn marshal_json(&self, parameters_json: &str) -> BridgeResult<Arguments> {
    if parameters_json.trim().is_empty() {
      return Ok(Arguments::default());
    }
    let parameters: Vec<ParameterJson> =
      serde_json::from_str(parameters_json).map_err(BridgeError::InvalidParametersJson)?;
    self.marshal(&parameters)
  }

  pub fn marshal(&self, parameters: &[ParameterJson]) -> BridgeResult<Arguments> {
    let mut values = Vec::with_capacity(parameters.len());
    for parameter in parameters {
      let descriptor = self
        .registry
        .resolve(&parameter.type_name)
        .ok_or_else(|| BridgeError::unknown_type(&parameter.type_name))?;
      let type_name = self.registry.qualified_name(&descriptor);
      let argument = match parameter.value_text() {
        None => AnyArgument::none(&type_name),
        Some(text) => {
          let codec = descriptor.as_value().ok_or_else(|| BridgeError::NotDeserializable {
            type_name: type_name.clone(),
          })?;
          let value = codec
            .decode(&text, self.lenient_string_values)
            .map_err(|source| BridgeError::InvalidParameter {
              type_name: type_name.clone(),
              source,
            })?;
          AnyArgument::from_any(&type_name, value)
        }
      };
      values.push(argument);
    }
    log::debug!("marshal: arguments = {:?}", values);
    Ok(Arguments::from(values))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::core::actor::actor_type::ADDRESSABLE;
  use crate::core::types::type_module::TypeModule;
  use crate::core::types::{GUID, INT32, STRING};
  use uuid::Uuid;

  #[derive(Debug, Clone, PartialEq, Deserialize)]
  struct Point {
    x: i32,
    y: i32,
  }

  fn marshaler() -> ParameterMarshaler {
    let registry = TypeRegistry::new().with_module(TypeModule::new("demo").value::<Point>("demo.Point"));
    ParameterMarshaler::new(Arc::new(registry))
  }

  #[test]
  fn test_marshal_int32() {
    let arguments = marshaler().marshal_json(r#"[{"type":"Int32","value":"42"}]"#).unwrap();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments.get::<i32>(0).unwrap(), Some(42));
    assert_eq!(arguments.type_names(), vec![INT32]);
  }

  #[test]
  fn test_marshal_empty_string_is_none() {
    let arguments = marshaler().marshal_json(r#"[{"type":"String","value":""}]"#).unwrap();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments.get::<String>(0).unwrap(), None);
    assert!(matches!(
      arguments.required::<String>(0),
      Err(BridgeError::MissingArgument { position: 0 })
    ));
  }

  #[test]
  fn test_marshal_absent_and_null_values() {
    let arguments = marshaler()
      .marshal_json(r#"[{"type":"demo.Point"},{"type":"Int32","value":null}]"#)
      .unwrap();
    assert_eq!(arguments.type_names(), vec!["demo.Point", INT32]);
    assert!(arguments.iter().all(AnyArgument::is_none));
  }

  #[test]
  fn test_marshal_preserves_order_and_types() {
    let guid = Uuid::new_v4();
    let json = serde_json::to_string(&vec![
      ParameterJson::new("demo.Point", r#"{"x":3,"y":4}"#),
      ParameterJson::new(STRING, "\"hello\""),
      ParameterJson::new(GUID, &format!("\"{}\"", guid)),
    ])
    .unwrap();
    let arguments = marshaler().marshal_json(&json).unwrap();
    assert_eq!(arguments.required::<Point>(0).unwrap(), Point { x: 3, y: 4 });
    assert_eq!(arguments.required::<String>(1).unwrap(), "hello");
    assert_eq!(arguments.required::<Uuid>(2).unwrap(), guid);
    assert!(matches!(
      arguments.get::<i64>(0),
      Err(BridgeError::ArgumentTypeMismatch { position: 0, .. })
    ));
  }

  #[test]
  fn test_marshal_non_string_value_token() {
    let arguments = marshaler()
      .marshal_json(r#"[{"type":"Int32","value":7},{"type":"demo.Point","value":{"x":1,"y":2}}]"#)
      .unwrap();
    assert_eq!(arguments.required::<i32>(0).unwrap(), 7);
    assert_eq!(arguments.required::<Point>(1).unwrap(), Point { x: 1, y: 2 });
  }

  #[test]
  fn test_marshal_lenient_strings() {
    let raw = r#"[{"type":"String","value":"hello world"}]"#;
    let arguments = marshaler().marshal_json(raw).unwrap();
    assert_eq!(arguments.required::<String>(0).unwrap(), "hello world");

    let strict = marshaler().with_lenient_string_values(false);
    assert!(matches!(
      strict.marshal_json(raw),
      Err(BridgeError::InvalidParameter { .. })
    ));
  }

  #[test]
  fn test_marshal_unknown_type() {
    let err = marshaler()
      .marshal_json(r#"[{"type":"demo.Missing","value":"1"}]"#)
      .unwrap_err();
    assert!(matches!(err, BridgeError::UnknownType { type_name } if type_name == "demo.Missing"));
  }

  #[test]
  fn test_marshal_interface_value_is_not_deserializable() {
    let err = marshaler()
      .marshal_json(&format!(r#"[{{"type":"{}","value":"{{}}"}}]"#, ADDRESSABLE))
      .unwrap_err();
    assert!(matches!(err, BridgeError::NotDeserializable { .. }));
  }

  #[test]
  fn test_marshal_malformed_json() {
    assert!(matches!(
      marshaler().marshal_json("{not json"),
      Err(BridgeError::InvalidParametersJson(_))
    ));
    assert!(marshaler().marshal_json("  ").unwrap().is_empty());
    assert!(marshaler().marshal_json("[]").unwrap().is_empty());
  }
}
