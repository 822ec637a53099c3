use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::core::actor::actor_type::{
  ActorTypeInfo, InterfaceInfo, ADDRESSABLE, GRAIN, GRAIN_WITH_GUID_KEY, GRAIN_WITH_INTEGER_KEY,
  GRAIN_WITH_STRING_KEY,
};
use crate::core::types::value_codec::ValueCodec;
use crate::core::types::{TypeDescriptor, TypeKind, BOOLEAN, CORE_MODULE, DOUBLE, GUID, INT32, INT64, STRING};

static CORE_TYPES: Lazy<TypeModule> = Lazy::new(|| {
  TypeModule::new(CORE_MODULE)
    .simple_value::<bool>(BOOLEAN)
    .simple_value::<i32>(INT32)
    .simple_value::<i64>(INT64)
    .simple_value::<f64>(DOUBLE)
    .with_type(TypeKind::Value(ValueCodec::textual()), STRING)
    .simple_value::<Uuid>(GUID)
    .interface(InterfaceInfo::marker(ADDRESSABLE, &[]))
    .interface(InterfaceInfo::marker(GRAIN, &[ADDRESSABLE]))
    .interface(InterfaceInfo::marker(GRAIN_WITH_GUID_KEY, &[GRAIN]))
    .interface(InterfaceInfo::marker(GRAIN_WITH_INTEGER_KEY, &[GRAIN]))
    .interface(InterfaceInfo::marker(GRAIN_WITH_STRING_KEY, &[GRAIN]))
});

#[derive(Debug, Clone)]
pub struct TypeModule {
  name: String,
  types: HashMap<String, Arc<TypeDescriptor>>,
}

impl TypeModule {
  pub fn new(name: &str) -> Self {
    Self {
      name: name.to_string(),
      types: HashMap::new(),
    }
  }

  /// Built-in value types and the runtime's marker interfaces.
  pub fn core() -> Self {
    CORE_TYPES.clone()
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn get(&self, full_name: &str) -> Option<Arc<TypeDescriptor>> {
    self.types.get(full_name).cloned()
  }

  pub fn len(&self) -> usize {
    self.types.len()
  }

  pub fn is_empty(&self) -> bool {
    self.types.is_empty()
  }

  pub fn value<T>(self, full_name: &str) -> Self
  where
    T: DeserializeOwned + Send + Sync + 'static, {
    self.with_type(TypeKind::Value(ValueCodec::of::<T>(true)), full_name)
  }

  /// Registers a value type edited as plain text (primitives, enums, ids).
  pub fn simple_value<T>(self, full_name: &str) -> Self
  where
    T: DeserializeOwned + Send + Sync + 'static, {
    self.with_type(TypeKind::Value(ValueCodec::of::<T>(false)), full_name)
  }

  pub fn interface(self, info: InterfaceInfo) -> Self {
    let full_name = info.full_name().to_string();
    self.with_type(TypeKind::Interface(info), &full_name)
  }

  pub fn actor(self, info: ActorTypeInfo) -> Self {
    let full_name = info.full_name().to_string();
    self.with_type(TypeKind::Actor(info), &full_name)
  }

  pub fn with_type(mut self, kind: TypeKind, full_name: &str) -> Self {
    let descriptor = TypeDescriptor::new(&self.name, full_name, kind);
    if self.types.insert(full_name.to_string(), Arc::new(descriptor)).is_some() {
      log::warn!("type registered twice: module = {}, type = {}", self.name, full_name);
    }
    self
  }
}
