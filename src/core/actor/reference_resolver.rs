use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::core::actor::actor_key::{ActorKey, KeyKind};
use crate::core::actor::actor_metadata::ActorMetadataProvider;
use crate::core::actor::actor_ref::ActorReference;
use crate::core::actor::actor_ref_provider::ActorRefProvider;
use crate::core::catalog::actor_method_descriptor::ActorMethodDescriptor;
use crate::core::types::type_registry::TypeRegistry;
use crate::core::types::TypeDescriptor;
use crate::{BridgeError, BridgeResult};

/// Turns an identity string into a reference that exposes a catalog method's interface.
#[derive(Clone)]
pub struct ReferenceResolver {
  registry: Arc<TypeRegistry>,
  metadata: Arc<dyn ActorMetadataProvider>,
  provider: Arc<dyn ActorRefProvider>,
}

impl ReferenceResolver {
  pub fn new(
    registry: Arc<TypeRegistry>,
    metadata: Arc<dyn ActorMetadataProvider>,
    provider: Arc<dyn ActorRefProvider>,
  ) -> Self {
    Self {
      registry,
      metadata,
      provider,
    }
  }

  pub fn addressing(&self, actor_type: &TypeDescriptor) -> Option<(Arc<TypeDescriptor>, Option<KeyKind>)> {
    let primary = self.metadata.primary_interface(&self.registry, actor_type)?;
    let key_kind = self.metadata.key_kind(&self.registry, &primary);
    Some((primary, key_kind))
  }

  /// `Ok(None)` when the actor type has no primary interface.
  ///
  /// An empty `identity` with `spawn_if_missing` gets a fresh Guid; other key kinds are rejected.
  pub fn resolve(
    &self,
    actor_type: &TypeDescriptor,
    identity: &str,
    method: &ActorMethodDescriptor,
    spawn_if_missing: bool,
  ) -> BridgeResult<Option<ActorReference>> {
    let (primary, key_kind) = match self.addressing(actor_type) {
      Some(addressing) => addressing,
      None => {
        log::warn!("resolve: no primary interface for {}", actor_type.full_name());
        return Ok(None);
      }
    };
    let key_kind = key_kind.ok_or_else(|| BridgeError::UnrecognizedKeyKind {
      interface: primary.full_name().to_string(),
    })?;

    let key = if spawn_if_missing && identity.is_empty() {
      if key_kind != KeyKind::Guid {
        return Err(BridgeError::SpawnRequiresGuidKey {
          interface: primary.full_name().to_string(),
          key_kind: key_kind.to_string(),
        });
      }
      let key = ActorKey::fresh_guid();
      log::debug!("resolve: spawning {} with fresh identity {}", actor_type.full_name(), key);
      key
    } else {
      key_kind.parse_key(identity)?
    };

    let reference = self.provider.actor_of(primary.full_name(), &key)?;
    if method.declaring_interface == primary.full_name() {
      return Ok(Some(reference));
    }
    log::debug!(
      "resolve: viewing {} as {}",
      reference,
      method.declaring_interface
    );
    self
      .provider
      .as_reference(&reference, &method.declaring_interface)
      .map(Some)
  }
}

impl Debug for ReferenceResolver {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("ReferenceResolver")
      .field("metadata", &self.metadata)
      .finish()
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::core::actor::actor_metadata::NamingConventionMetadataProvider;
  use crate::core::actor::actor_ref_provider::MockActorRefProvider;
  use crate::core::actor::actor_type::{ActorTypeInfo, InterfaceInfo, GRAIN, GRAIN_WITH_GUID_KEY, GRAIN_WITH_INTEGER_KEY};
  use crate::core::dispatch::invocation_result::InvocationResult;
  use crate::core::marshal::Arguments;
  use crate::core::types::type_module::TypeModule;

  trait Door: Send + Sync {}

  struct Wooden;

  impl Door for Wooden {}

  fn interface(full_name: &str, extends: &str, method: &str) -> InterfaceInfo {
    InterfaceInfo::builder::<dyn Door>(full_name)
      .extends(extends)
      .method(method, &[], |_door: Arc<dyn Door>, _args: Arguments| async move {
        Ok::<_, anyhow::Error>(InvocationResult::Void)
      })
      .build()
  }

  fn registry() -> Arc<TypeRegistry> {
    Arc::new(
      TypeRegistry::new().with_module(
        TypeModule::new("house")
          .interface(interface("house.IDoorGrain", GRAIN_WITH_GUID_KEY, "Open"))
          .interface(interface("house.ILockable", GRAIN, "Lock"))
          .interface(interface("house.IGateGrain", GRAIN_WITH_INTEGER_KEY, "Swing"))
          .interface(interface("house.IWindowGrain", GRAIN, "Slide"))
          .actor(
            ActorTypeInfo::new("house.DoorGrain")
              .with_interface("house.IDoorGrain")
              .with_interface("house.ILockable")
              .with_exposed_method("Open")
              .with_exposed_method("Lock"),
          )
          .actor(ActorTypeInfo::new("house.GateGrain").with_interface("house.IGateGrain"))
          .actor(ActorTypeInfo::new("house.WindowGrain").with_interface("house.IWindowGrain"))
          .actor(ActorTypeInfo::new("house.Shed").with_interface("house.ILockable")),
      ),
    )
  }

  fn method(interface: &str, name: &str) -> ActorMethodDescriptor {
    ActorMethodDescriptor {
      name: name.to_string(),
      declaring_interface: interface.to_string(),
      method_id: "id".to_string(),
      parameters: vec![],
    }
  }

  fn reference(interface: &str, key: ActorKey) -> ActorReference {
    let door: Arc<dyn Door> = Arc::new(Wooden);
    ActorReference::new("house.DoorGrain", interface, key, door)
  }

  fn resolver(registry: Arc<TypeRegistry>, provider: MockActorRefProvider) -> ReferenceResolver {
    ReferenceResolver::new(
      registry,
      Arc::new(NamingConventionMetadataProvider::new()),
      Arc::new(provider),
    )
  }

  const DOOR_ID: &str = "0b1b3a8e-2f5c-4d7e-9a61-3c2f1e0d9b8a";

  #[test]
  fn test_same_interface_is_not_reinterpreted() {
    let registry = registry();
    let actor_type = registry.resolve("house.DoorGrain").unwrap();
    let key = KeyKind::Guid.parse_key(DOOR_ID).unwrap();
    let expected = key.clone();

    let mut provider = MockActorRefProvider::new();
    provider
      .expect_actor_of()
      .withf(move |interface, key| interface == "house.IDoorGrain" && key == &expected)
      .times(1)
      .returning(|interface, key| Ok(reference(interface, key.clone())));
    provider.expect_as_reference().never();

    let resolved = resolver(registry, provider)
      .resolve(&actor_type, DOOR_ID, &method("house.IDoorGrain", "Open"), false)
      .unwrap()
      .unwrap();
    assert_eq!(resolved.interface(), "house.IDoorGrain");
    assert_eq!(resolved.key(), &key);
  }

  #[test]
  fn test_other_interface_is_reinterpreted() {
    let registry = registry();
    let actor_type = registry.resolve("house.DoorGrain").unwrap();

    let mut provider = MockActorRefProvider::new();
    provider
      .expect_actor_of()
      .times(1)
      .returning(|interface, key| Ok(reference(interface, key.clone())));
    provider
      .expect_as_reference()
      .withf(|reference, interface| reference.interface() == "house.IDoorGrain" && interface == "house.ILockable")
      .times(1)
      .returning(|reference, interface| Ok(super::test::reference(interface, reference.key().clone())));

    let resolved = resolver(registry, provider)
      .resolve(&actor_type, DOOR_ID, &method("house.ILockable", "Lock"), false)
      .unwrap()
      .unwrap();
    assert_eq!(resolved.interface(), "house.ILockable");
  }

  #[test]
  fn test_spawn_generates_fresh_guid() {
    let registry = registry();
    let actor_type = registry.resolve("house.DoorGrain").unwrap();

    let mut provider = MockActorRefProvider::new();
    provider
      .expect_actor_of()
      .withf(|_, key| matches!(key, ActorKey::Guid(_)))
      .times(2)
      .returning(|interface, key| Ok(reference(interface, key.clone())));

    let resolver = resolver(registry, provider);
    let open = method("house.IDoorGrain", "Open");
    let first = resolver.resolve(&actor_type, "", &open, true).unwrap().unwrap();
    let second = resolver.resolve(&actor_type, "", &open, true).unwrap().unwrap();
    assert_ne!(first.key(), second.key());
  }

  #[test]
  fn test_spawn_rejects_non_guid_keys() {
    let registry = registry();
    let actor_type = registry.resolve("house.GateGrain").unwrap();
    let mut provider = MockActorRefProvider::new();
    provider.expect_actor_of().never();

    let err = resolver(registry, provider)
      .resolve(&actor_type, "", &method("house.IGateGrain", "Swing"), true)
      .unwrap_err();
    assert!(matches!(err, BridgeError::SpawnRequiresGuidKey { .. }));
  }

  #[test]
  fn test_empty_identity_without_spawn_is_parsed() {
    let registry = registry();
    let actor_type = registry.resolve("house.DoorGrain").unwrap();
    let mut provider = MockActorRefProvider::new();
    provider.expect_actor_of().never();

    let err = resolver(registry, provider)
      .resolve(&actor_type, "", &method("house.IDoorGrain", "Open"), false)
      .unwrap_err();
    assert!(matches!(err, BridgeError::InvalidKey { .. }));
  }

  #[test]
  fn test_missing_key_kind_is_an_error() {
    let registry = registry();
    let actor_type = registry.resolve("house.WindowGrain").unwrap();
    let mut provider = MockActorRefProvider::new();
    provider.expect_actor_of().never();

    let err = resolver(registry, provider)
      .resolve(&actor_type, "1", &method("house.IWindowGrain", "Slide"), false)
      .unwrap_err();
    assert!(matches!(err, BridgeError::UnrecognizedKeyKind { interface } if interface == "house.IWindowGrain"));
  }

  #[test]
  fn test_missing_primary_interface_is_none() {
    let registry = registry();
    let actor_type = registry.resolve("house.Shed").unwrap();
    let mut provider = MockActorRefProvider::new();
    provider.expect_actor_of().never();

    let resolved = resolver(registry, provider)
      .resolve(&actor_type, "1", &method("house.ILockable", "Lock"), false)
      .unwrap();
    assert!(resolved.is_none());
  }
}
