use std::any::Any;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::core::actor::actor_key::ActorKey;

/// A live reference to one actor, viewed through one of its interfaces.
///
/// The view is an `Arc<I>` erased behind `dyn Any`; typed invokers recover it with [`ActorReference::view`].
#[derive(Clone)]
pub struct ActorReference {
  actor_type: String,
  interface: String,
  key: ActorKey,
  view: Arc<dyn Any + Send + Sync>,
}

impl ActorReference {
  pub fn new<I>(actor_type: &str, interface: &str, key: ActorKey, view: Arc<I>) -> Self
  where
    I: ?Sized + Send + Sync + 'static, {
    Self {
      actor_type: actor_type.to_string(),
      interface: interface.to_string(),
      key,
      view: Arc::new(view),
    }
  }

  pub fn actor_type(&self) -> &str {
    &self.actor_type
  }

  pub fn interface(&self) -> &str {
    &self.interface
  }

  pub fn key(&self) -> &ActorKey {
    &self.key
  }

  pub fn view<I>(&self) -> Option<Arc<I>>
  where
    I: ?Sized + Send + Sync + 'static, {
    self.view.downcast_ref::<Arc<I>>().cloned()
  }
}

impl Debug for ActorReference {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("ActorReference")
      .field("actor_type", &self.actor_type)
      .field("interface", &self.interface)
      .field("key", &self.key)
      .finish()
  }
}

impl Display for ActorReference {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}[{}]/{}", self.actor_type, self.interface, self.key)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  trait Greeter: Send + Sync {
    fn greet(&self) -> String;
  }

  trait Unrelated: Send + Sync {}

  struct English;

  impl Greeter for English {
    fn greet(&self) -> String {
      "hello".to_string()
    }
  }

  #[test]
  fn test_view_downcast() {
    let greeter: Arc<dyn Greeter> = Arc::new(English);
    let reference = ActorReference::new("demo.English", "demo.IGreeter", ActorKey::Integer(1), greeter);

    assert_eq!(reference.view::<dyn Greeter>().unwrap().greet(), "hello");
    assert!(reference.view::<dyn Unrelated>().is_none());
    assert_eq!(reference.to_string(), "demo.English[demo.IGreeter]/1");
  }
}
