use std::any::Any;
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;

use serde::de::DeserializeOwned;

pub type AnyValue = Arc<dyn Any + Send + Sync>;

type DecodeFn = dyn Fn(&str) -> Result<AnyValue, serde_json::Error> + Send + Sync;

#[derive(Clone)]
pub struct ValueCodec {
  decode: Arc<DecodeFn>,
  complex: bool,
  textual: bool,
}

impl ValueCodec {
  pub fn of<T>(complex: bool) -> Self
  where
    T: DeserializeOwned + Send + Sync + 'static, {
    Self {
      decode: Arc::new(|json: &str| -> Result<AnyValue, serde_json::Error> {
        let value: T = serde_json::from_str(json)?;
        Ok(Arc::new(value) as AnyValue)
      }),
      complex,
      textual: false,
    }
  }

  /// Codec for `String`; may take unquoted text when decoding leniently.
  pub fn textual() -> Self {
    Self {
      textual: true,
      ..Self::of::<String>(false)
    }
  }

  pub fn is_complex(&self) -> bool {
    self.complex
  }

  pub fn is_textual(&self) -> bool {
    self.textual
  }

  pub fn decode(&self, json: &str, lenient: bool) -> Result<AnyValue, serde_json::Error> {
    match (self.decode)(json) {
      Ok(value) => Ok(value),
      Err(_) if self.textual && lenient => Ok(Arc::new(json.to_string())),
      Err(err) => Err(err),
    }
  }
}

impl Debug for ValueCodec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ValueCodec")
      .field("complex", &self.complex)
      .field("textual", &self.textual)
      .finish()
  }
}
