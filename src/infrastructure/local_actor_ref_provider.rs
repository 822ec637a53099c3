use std::any::Any;
use std::fmt;
use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;
use std::sync::Arc;

use dashmap::DashMap;

use crate::core::actor::actor_key::ActorKey;
use crate::core::actor::actor_ref::ActorReference;
use crate::core::actor::actor_ref_provider::ActorRefProvider;
use crate::{BridgeError, BridgeResult};

type Instance = Arc<dyn Any + Send + Sync>;
type ActivateFn = dyn Fn(&ActorKey) -> Instance + Send + Sync;
type ViewFn = dyn Fn(&str, &str, &ActorKey, Instance) -> Option<ActorReference> + Send + Sync;

/// Resolves references to actors living in this process.
///
/// An actor is activated on first use of its `(actor type, key)` and then shared by every reference
/// to it, whichever interface the reference is viewed through. Activations live until `deactivate`.
#[derive(Clone, Default)]
pub struct LocalActorRefProvider {
  factories: Arc<DashMap<String, Arc<ActivateFn>>>,
  bindings: Arc<DashMap<String, String>>,
  views: Arc<DashMap<(String, String), Arc<ViewFn>>>,
  activations: Arc<DashMap<(String, ActorKey), Instance>>,
}

impl LocalActorRefProvider {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers how to activate instances of `actor_type`; expose its interfaces on the returned binding.
  pub fn register<A, F>(&self, actor_type: &str, activate: F) -> LocalActorBinding<'_, A>
  where
    A: Send + Sync + 'static,
    F: Fn(&ActorKey) -> A + Send + Sync + 'static, {
    let factory: Arc<ActivateFn> = Arc::new(move |key: &ActorKey| Arc::new(activate(key)) as Instance);
    self.factories.insert(actor_type.to_string(), factory);
    LocalActorBinding {
      provider: self,
      actor_type: actor_type.to_string(),
      p: PhantomData,
    }
  }

  pub fn activation_count(&self) -> usize {
    self.activations.len()
  }

  pub fn is_active(&self, actor_type: &str, key: &ActorKey) -> bool {
    self.activations.contains_key(&(actor_type.to_string(), key.clone()))
  }

  /// Drops the activation of `(actor_type, key)`; the next reference to it activates a new instance.
  pub fn deactivate(&self, actor_type: &str, key: &ActorKey) -> bool {
    let removed = self.activations.remove(&(actor_type.to_string(), key.clone())).is_some();
    if removed {
      log::debug!("deactivate: actor_type = {}, key = {}", actor_type, key);
    }
    removed
  }

  fn activate(&self, actor_type: &str, key: &ActorKey) -> BridgeResult<Instance> {
    let factory = self
      .factories
      .get(actor_type)
      .map(|factory| factory.value().clone())
      .ok_or_else(|| BridgeError::unknown_type(actor_type))?;
    let instance = self
      .activations
      .entry((actor_type.to_string(), key.clone()))
      .or_insert_with(|| {
        log::debug!("activate: actor_type = {}, key = {}", actor_type, key);
        factory(key)
      })
      .value()
      .clone();
    Ok(instance)
  }

  fn view(&self, actor_type: &str, interface: &str, key: &ActorKey) -> BridgeResult<ActorReference> {
    let view = self
      .views
      .get(&(actor_type.to_string(), interface.to_string()))
      .map(|view| view.value().clone())
      .ok_or_else(|| BridgeError::InterfaceNotImplemented {
        actor_type: actor_type.to_string(),
        interface: interface.to_string(),
      })?;
    let instance = self.activate(actor_type, key)?;
    view(actor_type, interface, key, instance).ok_or_else(|| BridgeError::InterfaceViewMismatch {
      interface: interface.to_string(),
    })
  }
}

impl ActorRefProvider for LocalActorRefProvider {
  fn actor_of(&self, interface: &str, key: &ActorKey) -> BridgeResult<ActorReference> {
    let actor_type = self
      .bindings
      .get(interface)
      .map(|binding| binding.value().clone())
      .ok_or_else(|| BridgeError::UnboundInterface {
        interface: interface.to_string(),
      })?;
    self.view(&actor_type, interface, key)
  }

  fn as_reference(&self, reference: &ActorReference, interface: &str) -> BridgeResult<ActorReference> {
    self.view(reference.actor_type(), interface, reference.key())
  }
}

impl Debug for LocalActorRefProvider {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("LocalActorRefProvider")
      .field("actor_types", &self.factories.len())
      .field("bindings", &self.bindings.len())
      .field("activations", &self.activations.len())
      .finish()
  }
}

pub struct LocalActorBinding<'a, A> {
  provider: &'a LocalActorRefProvider,
  actor_type: String,
  p: PhantomData<fn() -> A>,
}

impl<'a, A> LocalActorBinding<'a, A>
where
  A: Send + Sync + 'static,
{
  /// Makes `interface` reachable on this actor type through `cast`.
  ///
  /// The first actor type exposing an interface answers `actor_of` for it.
  pub fn expose<I, F>(self, interface: &str, cast: F) -> Self
  where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<A>) -> Arc<I> + Send + Sync + 'static, {
    let view: Arc<ViewFn> = Arc::new(
      move |actor_type: &str, interface: &str, key: &ActorKey, instance: Instance| {
        instance
          .downcast::<A>()
          .ok()
          .map(|actor| ActorReference::new::<I>(actor_type, interface, key.clone(), cast(actor)))
      },
    );
    self
      .provider
      .views
      .insert((self.actor_type.clone(), interface.to_string()), view);
    let bound = self
      .provider
      .bindings
      .entry(interface.to_string())
      .or_insert_with(|| self.actor_type.clone())
      .value()
      .clone();
    if bound != self.actor_type {
      log::warn!(
        "expose: {} stays bound to {}, {} is reachable through as_reference only",
        interface,
        bound,
        self.actor_type
      );
    }
    self
  }
}
