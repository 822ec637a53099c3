use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum InvocationResult {
  Void,
  Value(Value),
}

impl InvocationResult {
  pub fn of<T: Serialize>(value: &T) -> anyhow::Result<Self> {
    Ok(InvocationResult::Value(serde_json::to_value(value)?))
  }

  pub fn is_void(&self) -> bool {
    matches!(self, InvocationResult::Void)
  }

  pub fn value(&self) -> Option<&Value> {
    match self {
      InvocationResult::Void => None,
      InvocationResult::Value(value) => Some(value),
    }
  }
}
