use std::fmt;
use std::fmt::{Debug, Formatter};
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::core::actor::actor_ref::ActorReference;
use crate::core::dispatch::invocation_result::InvocationResult;
use crate::core::marshal::Arguments;
use crate::{BridgeError, BridgeResult};

type InvokeFn = dyn Fn(ActorReference, Arguments) -> BoxFuture<'static, BridgeResult<InvocationResult>> + Send + Sync;

/// Type-erased call of one interface method.
///
/// Built once when the interface is declared; it captures the interface view type, so nothing
/// is looked up by name when it runs.
#[derive(Clone)]
pub struct MethodInvoker {
  interface: String,
  f: Arc<InvokeFn>,
}

impl MethodInvoker {
  pub fn new<I, F, Fut>(interface: &str, f: F) -> Self
  where
    I: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<I>, Arguments) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<InvocationResult>> + Send + 'static, {
    let interface_name = interface.to_string();
    let f = Arc::new(f);
    let invoke = move |reference: ActorReference, arguments: Arguments| match reference.view::<I>() {
      Some(view) => {
        let fut = (*f)(view, arguments);
        async move { fut.await.map_err(BridgeError::from_actor) }.boxed()
      }
      None => {
        let interface = interface_name.clone();
        async move { Err(BridgeError::InterfaceViewMismatch { interface }) }.boxed()
      }
    };
    Self {
      interface: interface.to_string(),
      f: Arc::new(invoke),
    }
  }

  pub fn interface(&self) -> &str {
    &self.interface
  }

  pub async fn invoke(&self, reference: ActorReference, arguments: Arguments) -> BridgeResult<InvocationResult> {
    (self.f)(reference, arguments).await
  }
}

impl Debug for MethodInvoker {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("MethodInvoker")
      .field("interface", &self.interface)
      .finish()
  }
}
