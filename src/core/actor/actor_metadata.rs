use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use crate::core::actor::actor_key::KeyKind;
use crate::core::types::type_registry::TypeRegistry;
use crate::core::types::TypeDescriptor;

/// Decides how an actor type is addressed: its primary interface and that interface's key kind.
pub trait ActorMetadataProvider: Debug + Send + Sync {
  fn primary_interface(&self, registry: &TypeRegistry, actor_type: &TypeDescriptor) -> Option<Arc<TypeDescriptor>>;

  fn key_kind(&self, registry: &TypeRegistry, interface: &TypeDescriptor) -> Option<KeyKind>;
}

/// Discovers addressing metadata from type names.
///
/// The primary interface is one whose name contains the actor type's name, preferring one that
/// declares a method the actor implements itself. The key kind comes from the first extended
/// interface whose name contains `Key`, tested against the well-known key markers.
#[derive(Debug, Clone, Default)]
pub struct NamingConventionMetadataProvider;

impl NamingConventionMetadataProvider {
  pub fn new() -> Self {
    Self
  }
}

impl ActorMetadataProvider for NamingConventionMetadataProvider {
  fn primary_interface(&self, registry: &TypeRegistry, actor_type: &TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
    let actor = actor_type.as_actor()?;
    let interfaces = match registry.implemented_interfaces(actor_type) {
      Ok(interfaces) => interfaces,
      Err(err) => {
        log::warn!("primary_interface: actor_type = {}, error = {}", actor_type.full_name(), err);
        return None;
      }
    };
    let named_after_actor = |interface: &&Arc<TypeDescriptor>| interface.name().contains(actor_type.name());
    let declares_implemented_method = |interface: &&Arc<TypeDescriptor>| {
      interface
        .as_interface()
        .map(|info| info.methods().iter().any(|m| actor.implements_method(m.name())))
        .unwrap_or(false)
    };
    interfaces
      .iter()
      .filter(named_after_actor)
      .find(declares_implemented_method)
      .or_else(|| interfaces.iter().find(named_after_actor))
      .cloned()
  }

  fn key_kind(&self, registry: &TypeRegistry, interface: &TypeDescriptor) -> Option<KeyKind> {
    let closure = registry.interface_closure(interface).ok()?;
    let key_interface = closure.iter().find(|parent| parent.name().contains("Key"))?;
    KeyKind::ALL
      .into_iter()
      .find(|kind| is_assignable_from(registry, key_interface, kind.marker_interface()))
  }
}

fn is_assignable_from(registry: &TypeRegistry, target: &TypeDescriptor, marker: &str) -> bool {
  if target.full_name() == marker {
    return true;
  }
  registry
    .resolve(marker)
    .and_then(|marker| registry.interface_closure(&marker).ok())
    .map(|closure| closure.iter().any(|parent| parent.full_name() == target.full_name()))
    .unwrap_or(false)
}

/// Declared mappings first, naming convention for everything left undeclared.
#[derive(Debug, Clone, Default)]
pub struct ExplicitMetadataProvider {
  primary_interfaces: HashMap<String, String>,
  key_kinds: HashMap<String, KeyKind>,
  fallback: NamingConventionMetadataProvider,
}

impl ExplicitMetadataProvider {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_primary_interface(mut self, actor_type: &str, interface: &str) -> Self {
    self
      .primary_interfaces
      .insert(actor_type.to_string(), interface.to_string());
    self
  }

  pub fn with_key_kind(mut self, interface: &str, key_kind: KeyKind) -> Self {
    self.key_kinds.insert(interface.to_string(), key_kind);
    self
  }
}

impl ActorMetadataProvider for ExplicitMetadataProvider {
  fn primary_interface(&self, registry: &TypeRegistry, actor_type: &TypeDescriptor) -> Option<Arc<TypeDescriptor>> {
    match self.primary_interfaces.get(actor_type.full_name()) {
      Some(interface) => match registry.resolve_interface(interface) {
        Ok(descriptor) => Some(descriptor),
        Err(err) => {
          log::warn!(
            "declared primary interface is unusable: actor_type = {}, error = {}",
            actor_type.full_name(),
            err
          );
          None
        }
      },
      None => self.fallback.primary_interface(registry, actor_type),
    }
  }

  fn key_kind(&self, registry: &TypeRegistry, interface: &TypeDescriptor) -> Option<KeyKind> {
    match self.key_kinds.get(interface.full_name()) {
      Some(key_kind) => Some(*key_kind),
      None => self.fallback.key_kind(registry, interface),
    }
  }
}
