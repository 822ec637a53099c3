use crate::core::actor::reference_resolver::ReferenceResolver;
use crate::core::catalog::MethodCatalog;
use crate::core::dispatch::invocation_result::InvocationResult;
use crate::core::marshal::ParameterMarshaler;
use crate::BridgeResult;

/// Runs one `(instance id, method id, parameters)` request against a built catalog.
#[derive(Debug, Clone)]
pub struct InvocationDispatcher {
  references: ReferenceResolver,
  marshaler: ParameterMarshaler,
}

impl InvocationDispatcher {
  pub fn new(references: ReferenceResolver, marshaler: ParameterMarshaler) -> Self {
    Self { references, marshaler }
  }

  pub fn references(&self) -> &ReferenceResolver {
    &self.references
  }

  /// `Ok(None)` when `method_id` is unknown to `catalog` or the actor type cannot be addressed.
  pub async fn invoke(
    &self,
    catalog: &MethodCatalog,
    instance_id: &str,
    method_id: &str,
    parameters_json: &str,
    spawn_if_missing: bool,
  ) -> BridgeResult<Option<InvocationResult>> {
    let entry = match catalog.find(method_id) {
      Some(entry) => entry,
      None => {
        log::debug!("invoke: unknown method_id = {}", method_id);
        return Ok(None);
      }
    };
    let reference = match self.references.resolve(
      catalog.actor_type(),
      instance_id,
      entry.descriptor(),
      spawn_if_missing,
    )? {
      Some(reference) => reference,
      None => return Ok(None),
    };
    let arguments = self.marshaler.marshal_json(parameters_json)?;
    entry.check_shape(&arguments)?;

    log::debug!(
      "invoke: reference = {}, method = {}, arguments = {:?}",
      reference,
      entry.descriptor().name,
      arguments
    );
    entry.invoker().invoke(reference, arguments).await.map(Some)
  }
}
