use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::dispatch::invocation_result::InvocationResult;
use crate::core::dispatch::method_invoker::MethodInvoker;
use crate::core::marshal::Arguments;

/// Base marker of every interface whose methods can be invoked on an actor reference.
pub const ADDRESSABLE: &str = "Addressable";
pub const GRAIN: &str = "Grain";
pub const GRAIN_WITH_GUID_KEY: &str = "GrainWithGuidKey";
pub const GRAIN_WITH_INTEGER_KEY: &str = "GrainWithIntegerKey";
pub const GRAIN_WITH_STRING_KEY: &str = "GrainWithStringKey";

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSignature {
  name: String,
  type_name: String,
}

impl ParameterSignature {
  pub fn new(name: &str, type_name: &str) -> Self {
    Self {
      name: name.to_string(),
      type_name: type_name.to_string(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn type_name(&self) -> &str {
    &self.type_name
  }
}

#[derive(Debug, Clone)]
pub struct MethodSignature {
  name: String,
  parameters: Vec<ParameterSignature>,
  invoker: MethodInvoker,
}

impl MethodSignature {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parameters(&self) -> &[ParameterSignature] {
    &self.parameters
  }

  pub fn invoker(&self) -> &MethodInvoker {
    &self.invoker
  }
}

#[derive(Debug, Clone)]
pub struct InterfaceInfo {
  full_name: String,
  extends: Vec<String>,
  methods: Vec<MethodSignature>,
}

impl InterfaceInfo {
  /// Starts an interface whose methods are served by `Arc<I>` views of the actor.
  pub fn builder<I>(full_name: &str) -> InterfaceBuilder<I>
  where
    I: ?Sized + Send + Sync + 'static, {
    InterfaceBuilder {
      full_name: full_name.to_string(),
      extends: Vec::new(),
      methods: Vec::new(),
      p: PhantomData,
    }
  }

  pub fn marker(full_name: &str, extends: &[&str]) -> Self {
    Self {
      full_name: full_name.to_string(),
      extends: extends.iter().map(|name| name.to_string()).collect(),
      methods: Vec::new(),
    }
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn extends(&self) -> &[String] {
    &self.extends
  }

  pub fn methods(&self) -> &[MethodSignature] {
    &self.methods
  }
}

pub struct InterfaceBuilder<I: ?Sized> {
  full_name: String,
  extends: Vec<String>,
  methods: Vec<MethodSignature>,
  p: PhantomData<fn(Arc<I>)>,
}

impl<I> InterfaceBuilder<I>
where
  I: ?Sized + Send + Sync + 'static,
{
  pub fn extends(mut self, interface: &str) -> Self {
    self.extends.push(interface.to_string());
    self
  }

  /// Declares a method; `parameters` are `(name, type name)` pairs in declaration order.
  pub fn method<F, Fut>(mut self, name: &str, parameters: &[(&str, &str)], f: F) -> Self
  where
    F: Fn(Arc<I>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<InvocationResult>> + Send + 'static, {
    let invoker = MethodInvoker::new::<I, F, Fut>(&self.full_name, f);
    self.methods.push(MethodSignature {
      name: name.to_string(),
      parameters: parameters
        .iter()
        .map(|(name, type_name)| ParameterSignature::new(name, type_name))
        .collect(),
      invoker,
    });
    self
  }

  pub fn build(self) -> InterfaceInfo {
    InterfaceInfo {
      full_name: self.full_name,
      extends: self.extends,
      methods: self.methods,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImplementedMethod {
  name: String,
  exposed: bool,
}

impl ImplementedMethod {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn is_exposed(&self) -> bool {
    self.exposed
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActorTypeInfo {
  full_name: String,
  implements: Vec<String>,
  methods: Vec<ImplementedMethod>,
}

impl ActorTypeInfo {
  pub fn new(full_name: &str) -> Self {
    Self {
      full_name: full_name.to_string(),
      implements: Vec::new(),
      methods: Vec::new(),
    }
  }

  pub fn implements(&self) -> &[String] {
    &self.implements
  }

  pub fn with_interface(mut self, interface: &str) -> Self {
    self.implements.push(interface.to_string());
    self
  }

  pub fn with_method(mut self, name: &str) -> Self {
    self.methods.push(ImplementedMethod {
      name: name.to_string(),
      exposed: false,
    });
    self
  }

  pub fn with_exposed_method(mut self, name: &str) -> Self {
    self.methods.push(ImplementedMethod {
      name: name.to_string(),
      exposed: true,
    });
    self
  }

  pub fn full_name(&self) -> &str {
    &self.full_name
  }

  pub fn methods(&self) -> &[ImplementedMethod] {
    &self.methods
  }

  pub fn implements_method(&self, name: &str) -> bool {
    self.methods.iter().any(|method| method.name == name)
  }

  pub fn is_exposed(&self, name: &str) -> bool {
    self.methods.iter().any(|method| method.exposed && method.name == name)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::core::types::INT32;

  trait Echo: Send + Sync {
    fn echo(&self, value: i32) -> i32;
  }

  #[test]
  fn test_interface_builder() {
    let info = InterfaceInfo::builder::<dyn Echo>("demo.IEcho")
      .extends(GRAIN_WITH_GUID_KEY)
      .method("Echo", &[("value", INT32)], |echo: Arc<dyn Echo>, args: Arguments| async move {
        let value = args.required::<i32>(0)?;
        InvocationResult::of(&echo.echo(value))
      })
      .build();

    assert_eq!(info.full_name(), "demo.IEcho");
    assert_eq!(info.extends(), &[GRAIN_WITH_GUID_KEY.to_string()]);
    assert_eq!(info.methods().len(), 1);
    let method = &info.methods()[0];
    assert_eq!(method.name(), "Echo");
    assert_eq!(method.parameters(), &[ParameterSignature::new("value", INT32)]);
    assert_eq!(method.invoker().interface(), "demo.IEcho");
  }

  #[test]
  fn test_exposure_marker() {
    let actor = ActorTypeInfo::new("demo.EchoGrain")
      .with_interface("demo.IEcho")
      .with_exposed_method("Echo")
      .with_method("Internal");

    assert!(actor.implements_method("Echo"));
    assert!(actor.implements_method("Internal"));
    assert!(actor.is_exposed("Echo"));
    assert!(!actor.is_exposed("Internal"));
    assert!(!actor.is_exposed("Missing"));
  }
}
