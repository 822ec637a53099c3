use std::fmt;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::core::actor::actor_lifecycle::{ActorLifecycle, NoopActorLifecycle};
use crate::core::actor::actor_metadata::{ActorMetadataProvider, NamingConventionMetadataProvider};
use crate::core::actor::actor_ref_provider::ActorRefProvider;
use crate::core::actor::reference_resolver::ReferenceResolver;
use crate::core::catalog::actor_method_descriptor::ActorMethodDescriptor;
use crate::core::catalog::MethodCatalog;
use crate::core::dispatch::invocation_dispatcher::InvocationDispatcher;
use crate::core::dispatch::invocation_result::InvocationResult;
use crate::core::marshal::ParameterMarshaler;
use crate::core::types::type_registry::TypeRegistry;
use crate::infrastructure::bridge_config::BridgeConfig;
use crate::infrastructure::logging_rw_lock::LoggingRwLock;
use crate::{read_lock_with_log, write_lock_with_log, BridgeError, BridgeResult};

#[derive(Debug)]
struct Activation {
  catalog: Arc<MethodCatalog>,
  dispatcher: InvocationDispatcher,
}

/// Invokes methods of one actor type by catalog method id, with JSON-encoded arguments.
pub struct MethodInvocationBridge {
  actor_type: String,
  registry: Arc<TypeRegistry>,
  metadata: Arc<dyn ActorMetadataProvider>,
  provider: Arc<dyn ActorRefProvider>,
  lifecycle: Arc<dyn ActorLifecycle>,
  lenient_string_values: bool,
  activation: LoggingRwLock<Option<Arc<Activation>>>,
}

impl MethodInvocationBridge {
  pub fn new(actor_type: &str, registry: Arc<TypeRegistry>, provider: Arc<dyn ActorRefProvider>) -> Self {
    Self {
      actor_type: actor_type.to_string(),
      registry,
      metadata: Arc::new(NamingConventionMetadataProvider::new()),
      provider,
      lifecycle: Arc::new(NoopActorLifecycle),
      lenient_string_values: true,
      activation: LoggingRwLock::new(&format!("bridge:{}", actor_type), None),
    }
  }

  pub fn with_metadata_provider(mut self, metadata: Arc<dyn ActorMetadataProvider>) -> Self {
    self.metadata = metadata;
    self
  }

  pub fn with_lifecycle(mut self, lifecycle: Arc<dyn ActorLifecycle>) -> Self {
    self.lifecycle = lifecycle;
    self
  }

  pub fn with_lenient_string_values(mut self, lenient: bool) -> Self {
    self.lenient_string_values = lenient;
    self
  }

  pub fn with_config(self, config: &BridgeConfig) -> BridgeResult<Self> {
    let metadata = config.metadata_provider()?;
    Ok(
      self
        .with_metadata_provider(Arc::new(metadata))
        .with_lenient_string_values(config.lenient_string_values),
    )
  }

  pub fn actor_type(&self) -> &str {
    &self.actor_type
  }

  /// Builds the method catalog, then runs the activation hook.
  ///
  /// Invocations arriving meanwhile wait for the new catalog. Method ids issued by a previous
  /// activation stop resolving, also when this call fails; the bridge is then not ready until
  /// the next successful activation.
  pub async fn activate(&self) -> BridgeResult<()> {
    let mut activation = write_lock_with_log!(self.activation, "activate");
    if activation.take().is_some() {
      log::debug!("activate: previous catalog retired, actor_type = {}", self.actor_type);
    }
    let catalog = MethodCatalog::build(&self.registry, &self.actor_type)?;
    self
      .lifecycle
      .on_activate(&self.actor_type)
      .await
      .map_err(BridgeError::from_actor)?;
    *activation = Some(Arc::new(Activation {
      catalog: Arc::new(catalog),
      dispatcher: self.dispatcher(),
    }));
    log::info!("activated: actor_type = {}", self.actor_type);
    Ok(())
  }

  pub async fn is_activated(&self) -> bool {
    read_lock_with_log!(self.activation, "is_activated").is_some()
  }

  pub async fn get_available_methods(&self) -> BridgeResult<Vec<ActorMethodDescriptor>> {
    Ok(self.current("get_available_methods").await?.catalog.descriptors())
  }

  /// Name of the type keying this actor type (`Guid`, `Int32` or `String`), empty when it cannot be told.
  pub fn get_grain_key_type(&self) -> String {
    let actor_type = match self.registry.resolve(&self.actor_type) {
      Some(actor_type) => actor_type,
      None => return String::new(),
    };
    match self.resolver().addressing(&actor_type) {
      Some((_, Some(key_kind))) => key_kind.type_name().to_string(),
      _ => {
        log::debug!("get_grain_key_type: undetermined for {}", self.actor_type);
        String::new()
      }
    }
  }

  /// `Ok(None)` for an unknown `method_id`, or when the actor type has no primary interface.
  pub async fn invoke_grain_method(
    &self,
    id: &str,
    method_id: &str,
    parameters_json: &str,
    spawn_if_missing: bool,
  ) -> BridgeResult<Option<InvocationResult>> {
    let activation = self.current("invoke_grain_method").await?;
    let result = activation
      .dispatcher
      .invoke(&activation.catalog, id, method_id, parameters_json, spawn_if_missing)
      .await;
    if let Err(err) = &result {
      log::debug!(
        "invoke_grain_method: failed, id = {:?}, method_id = {}, error = {}",
        id,
        method_id,
        err
      );
    }
    result
  }

  async fn current(&self, function_name: &'static str) -> BridgeResult<Arc<Activation>> {
    let activation = read_lock_with_log!(self.activation, function_name);
    activation.clone().ok_or_else(|| BridgeError::NotReady {
      actor_type: self.actor_type.clone(),
    })
  }

  fn resolver(&self) -> ReferenceResolver {
    ReferenceResolver::new(self.registry.clone(), self.metadata.clone(), self.provider.clone())
  }

  fn dispatcher(&self) -> InvocationDispatcher {
    InvocationDispatcher::new(
      self.resolver(),
      ParameterMarshaler::new(self.registry.clone()).with_lenient_string_values(self.lenient_string_values),
    )
  }
}

impl Debug for MethodInvocationBridge {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("MethodInvocationBridge")
      .field("actor_type", &self.actor_type)
      .field("metadata", &self.metadata)
      .field("lifecycle", &self.lifecycle)
      .field("lenient_string_values", &self.lenient_string_values)
      .finish()
  }
}
