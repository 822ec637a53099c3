use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorMethodDescriptor {
  pub name: String,
  pub declaring_interface: String,
  /// Opaque handle, valid for the catalog build that issued it.
  pub method_id: String,
  pub parameters: Vec<ParameterDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
  pub name: String,
  #[serde(rename = "type")]
  pub type_name: String,
  pub is_complex_type: bool,
}

impl ActorMethodDescriptor {
  pub fn parameter_type_names(&self) -> Vec<String> {
    self
      .parameters
      .iter()
      .map(|parameter| parameter.type_name.clone())
      .collect()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_wire_shape() {
    let descriptor = ActorMethodDescriptor {
      name: "Move".to_string(),
      declaring_interface: "demo.IPlayerGrain".to_string(),
      method_id: "01GJ0Z5Q3Y8W2K7N4V6T9R1X0C".to_string(),
      parameters: vec![ParameterDescriptor {
        name: "to".to_string(),
        type_name: "demo.Point".to_string(),
        is_complex_type: true,
      }],
    };
    assert_eq!(
      serde_json::to_value(&descriptor).unwrap(),
      json!({
        "name": "Move",
        "declaringInterface": "demo.IPlayerGrain",
        "methodId": "01GJ0Z5Q3Y8W2K7N4V6T9R1X0C",
        "parameters": [{ "name": "to", "type": "demo.Point", "isComplexType": true }]
      })
    );
    assert_eq!(descriptor.parameter_type_names(), vec!["demo.Point"]);
  }
}
