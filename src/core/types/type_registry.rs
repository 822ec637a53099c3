use std::collections::HashSet;
use std::sync::Arc;

use crate::core::actor::actor_type::ADDRESSABLE;
use crate::core::types::type_module::TypeModule;
use crate::core::types::{TypeDescriptor, CORE_MODULE};
use crate::{BridgeError, BridgeResult};

#[derive(Debug, Clone)]
pub struct TypeRegistry {
  modules: Vec<TypeModule>,
}

impl Default for TypeRegistry {
  fn default() -> Self {
    Self::new()
  }
}

impl TypeRegistry {
  pub fn new() -> Self {
    Self {
      modules: vec![TypeModule::core()],
    }
  }

  pub fn with_module(mut self, module: TypeModule) -> Self {
    self.register_module(module);
    self
  }

  pub fn register_module(&mut self, module: TypeModule) {
    log::debug!("register_module: name = {}, types = {}", module.name(), module.len());
    self.modules.push(module);
  }

  pub fn modules(&self) -> &[TypeModule] {
    &self.modules
  }

  fn module(&self, name: &str) -> Option<&TypeModule> {
    self.modules.iter().find(|module| module.name() == name)
  }

  /// Resolves `"<full name>"` or `"<full name>, <module>"`.
  ///
  /// The named module (or `core` for plain names) is tried first, then every module in
  /// registration order. `None` means the type is unknown.
  pub fn resolve(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
    let (full_name, module_name) = match type_name.split_once(',') {
      Some((full_name, module_name)) => (full_name.trim(), module_name.trim()),
      None => (type_name.trim(), CORE_MODULE),
    };
    self
      .module(module_name)
      .and_then(|module| module.get(full_name))
      .or_else(|| self.modules.iter().find_map(|module| module.get(full_name)))
  }

  /// The name that resolves back to `descriptor`. Qualified with its module when the plain
  /// full name would resolve to another module's type.
  pub fn qualified_name(&self, descriptor: &Arc<TypeDescriptor>) -> String {
    match self.resolve(descriptor.full_name()) {
      Some(found) if Arc::ptr_eq(&found, descriptor) => descriptor.full_name().to_string(),
      _ => format!("{}, {}", descriptor.full_name(), descriptor.module()),
    }
  }

  pub fn resolve_interface(&self, type_name: &str) -> BridgeResult<Arc<TypeDescriptor>> {
    let descriptor = self
      .resolve(type_name)
      .ok_or_else(|| BridgeError::unknown_type(type_name))?;
    if descriptor.as_interface().is_none() {
      return Err(BridgeError::NotAnInterface {
        type_name: type_name.to_string(),
      });
    }
    Ok(descriptor)
  }

  pub fn interface_closure(&self, interface: &TypeDescriptor) -> BridgeResult<Vec<Arc<TypeDescriptor>>> {
    let mut seen = HashSet::new();
    let mut closure = Vec::new();
    self.collect_closure(interface, &mut seen, &mut closure)?;
    Ok(closure)
  }

  pub fn implemented_interfaces(&self, actor_type: &TypeDescriptor) -> BridgeResult<Vec<Arc<TypeDescriptor>>> {
    let info = actor_type.as_actor().ok_or_else(|| BridgeError::NotAnActorType {
      type_name: actor_type.full_name().to_string(),
    })?;
    let mut seen = HashSet::new();
    let mut interfaces = Vec::new();
    for name in info.implements() {
      let interface = self.resolve_interface(name)?;
      if seen.insert(interface.full_name().to_string()) {
        interfaces.push(interface.clone());
        self.collect_closure(&interface, &mut seen, &mut interfaces)?;
      }
    }
    Ok(interfaces)
  }

  pub fn is_addressable(&self, interface: &TypeDescriptor) -> BridgeResult<bool> {
    Ok(
      self
        .interface_closure(interface)?
        .iter()
        .any(|parent| parent.full_name() == ADDRESSABLE),
    )
  }

  fn collect_closure(
    &self,
    interface: &TypeDescriptor,
    seen: &mut HashSet<String>,
    closure: &mut Vec<Arc<TypeDescriptor>>,
  ) -> BridgeResult<()> {
    let info = interface.as_interface().ok_or_else(|| BridgeError::NotAnInterface {
      type_name: interface.full_name().to_string(),
    })?;
    for parent_name in info.extends() {
      let parent = self.resolve_interface(parent_name)?;
      if seen.insert(parent.full_name().to_string()) {
        closure.push(parent.clone());
        self.collect_closure(&parent, seen, closure)?;
      }
    }
    Ok(())
  }
}
