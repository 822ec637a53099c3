use std::collections::HashSet;
use std::sync::Arc;

use ulid_generator_rs::ULIDGenerator;

use crate::core::actor::actor_type::MethodSignature;
use crate::core::catalog::actor_method_descriptor::{ActorMethodDescriptor, ParameterDescriptor};
use crate::core::dispatch::method_invoker::MethodInvoker;
use crate::core::marshal::Arguments;
use crate::core::types::type_registry::TypeRegistry;
use crate::core::types::TypeDescriptor;
use crate::{BridgeError, BridgeResult};

pub mod actor_method_descriptor;

#[derive(Debug, Clone)]
pub struct CatalogEntry {
  descriptor: ActorMethodDescriptor,
  parameter_types: Vec<Arc<TypeDescriptor>>,
  invoker: MethodInvoker,
}

impl CatalogEntry {
  fn new(
    registry: &TypeRegistry,
    interface: &TypeDescriptor,
    method: &MethodSignature,
    method_id: String,
  ) -> BridgeResult<Self> {
    let mut parameters = Vec::with_capacity(method.parameters().len());
    let mut parameter_types = Vec::with_capacity(method.parameters().len());
    for parameter in method.parameters() {
      let parameter_type = registry
        .resolve(parameter.type_name())
        .ok_or_else(|| BridgeError::unknown_type(parameter.type_name()))?;
      parameters.push(ParameterDescriptor {
        name: parameter.name().to_string(),
        type_name: registry.qualified_name(&parameter_type),
        is_complex_type: parameter_type.is_complex(),
      });
      parameter_types.push(parameter_type);
    }
    Ok(Self {
      descriptor: ActorMethodDescriptor {
        name: method.name().to_string(),
        declaring_interface: interface.full_name().to_string(),
        method_id,
        parameters,
      },
      parameter_types,
      invoker: method.invoker().clone(),
    })
  }

  pub fn descriptor(&self) -> &ActorMethodDescriptor {
    &self.descriptor
  }

  pub fn method_id(&self) -> &str {
    &self.descriptor.method_id
  }

  pub fn parameter_types(&self) -> &[Arc<TypeDescriptor>] {
    &self.parameter_types
  }

  pub fn invoker(&self) -> &MethodInvoker {
    &self.invoker
  }

  /// Arity and per-position types of `arguments` must equal the declared parameters.
  ///
  /// Types compare by their registry-qualified names, so same-named types of different modules differ.
  pub fn check_shape(&self, arguments: &Arguments) -> BridgeResult<()> {
    let parameters = &self.descriptor.parameters;
    let matches = arguments.len() == parameters.len()
      && arguments
        .iter()
        .zip(parameters.iter())
        .all(|(argument, parameter)| argument.type_name() == parameter.type_name);
    if matches {
      Ok(())
    } else {
      Err(BridgeError::ArgumentShapeMismatch {
        method: format!("{}.{}", self.descriptor.declaring_interface, self.descriptor.name),
        expected: self.descriptor.parameter_type_names(),
        actual: arguments.type_names(),
      })
    }
  }
}

/// The methods one actor type exposes to the bridge, in interface enumeration order.
#[derive(Debug, Clone)]
pub struct MethodCatalog {
  actor_type: Arc<TypeDescriptor>,
  entries: Vec<CatalogEntry>,
}

impl MethodCatalog {
  pub fn build(registry: &TypeRegistry, actor_type_name: &str) -> BridgeResult<Self> {
    let actor_type = registry
      .resolve(actor_type_name)
      .ok_or_else(|| BridgeError::unknown_type(actor_type_name))?;
    let actor = actor_type.as_actor().ok_or_else(|| BridgeError::NotAnActorType {
      type_name: actor_type_name.to_string(),
    })?;

    let mut generator = ULIDGenerator::new();
    let mut issued = HashSet::new();
    let mut entries = Vec::new();
    for interface in registry.implemented_interfaces(&actor_type)? {
      if !registry.is_addressable(&interface)? {
        log::debug!("build: skip non-addressable interface {}", interface.full_name());
        continue;
      }
      let methods = match interface.as_interface() {
        Some(info) => info.methods(),
        None => continue,
      };
      for method in methods.iter().filter(|method| actor.is_exposed(method.name())) {
        let method_id = loop {
          let method_id = generator
            .generate()
            .map_err(|err| BridgeError::IdGeneration {
              message: format!("{:?}", err),
            })?
            .to_string();
          if issued.insert(method_id.clone()) {
            break method_id;
          }
        };
        entries.push(CatalogEntry::new(registry, &interface, method, method_id)?);
      }
    }

    log::info!(
      "catalog built: actor_type = {}, methods = {}",
      actor_type.full_name(),
      entries.len()
    );
    Ok(Self { actor_type, entries })
  }

  pub fn actor_type(&self) -> &Arc<TypeDescriptor> {
    &self.actor_type
  }

  pub fn entries(&self) -> &[CatalogEntry] {
    &self.entries
  }

  pub fn descriptors(&self) -> Vec<ActorMethodDescriptor> {
    self.entries.iter().map(|entry| entry.descriptor.clone()).collect()
  }

  pub fn find(&self, method_id: &str) -> Option<&CatalogEntry> {
    self.entries.iter().find(|entry| entry.method_id() == method_id)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
