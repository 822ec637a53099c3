use crate::core::actor::actor_key::ActorKey;
use crate::core::actor::actor_ref::ActorReference;
use crate::BridgeResult;

/// Resolves actor references on behalf of the bridge; implemented by the actor runtime.
#[cfg_attr(test, mockall::automock)]
pub trait ActorRefProvider: Send + Sync {
  fn actor_of(&self, interface: &str, key: &ActorKey) -> BridgeResult<ActorReference>;

  fn as_reference(&self, reference: &ActorReference, interface: &str) -> BridgeResult<ActorReference>;
}
