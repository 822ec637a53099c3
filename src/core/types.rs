use crate::core::actor::actor_type::{ActorTypeInfo, InterfaceInfo};
use crate::core::types::value_codec::ValueCodec;

pub mod type_module;
pub mod type_registry;
pub mod value_codec;

pub const CORE_MODULE: &str = "core";

pub const BOOLEAN: &str = "Boolean";
pub const INT32: &str = "Int32";
pub const INT64: &str = "Int64";
pub const DOUBLE: &str = "Double";
pub const STRING: &str = "String";
pub const GUID: &str = "Guid";

#[derive(Debug, Clone)]
pub enum TypeKind {
  Value(ValueCodec),
  Interface(InterfaceInfo),
  Actor(ActorTypeInfo),
}

/// A loaded type, addressed by its fully-qualified name.
///
/// `name` is the last `.`-separated segment of `full_name`; the naming-convention
/// heuristics only ever look at it.
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
  full_name: String,
  name: String,
  module: String,
  kind: TypeKind,
}

impl TypeDescriptor {
  pub fn new(module: &str, full_name: &str, kind: TypeKind) -> Self {
    let name = full_name.rsplit('.').next().unwrap_or(full_name).to_string();
    Self {
      full_name: full_name.to_string(),
      name,
      module: module.to_string(),
      kind,
    }
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn module(&self) -> &str {
    &self.module
  }

  pub fn kind(&self) -> &TypeKind {
    &self.kind
  }

  pub fn as_value(&self) -> Option<&ValueCodec> {
    match &self.kind {
      TypeKind::Value(codec) => Some(codec),
      _ => None,
    }
  }

  pub fn as_interface(&self) -> Option<&InterfaceInfo> {
    match &self.kind {
      TypeKind::Interface(info) => Some(info),
      _ => None,
    }
  }

  pub fn as_actor(&self) -> Option<&ActorTypeInfo> {
    match &self.kind {
      TypeKind::Actor(info) => Some(info),
      _ => None,
    }
  }

  pub fn is_complex(&self) -> bool {
    match &self.kind {
      TypeKind::Value(codec) => codec.is_complex(),
      TypeKind::Interface(_) | TypeKind::Actor(_) => true,
    }
  }
}
