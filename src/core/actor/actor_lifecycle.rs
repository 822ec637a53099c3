use std::fmt::Debug;

use async_trait::async_trait;

/// Hook the bridge calls once per activation, after its catalog is built.
///
/// It runs under the bridge's activation lock, so it must not call back into the same bridge.
#[async_trait]
pub trait ActorLifecycle: Debug + Send + Sync {
  async fn on_activate(&self, actor_type: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct NoopActorLifecycle;

#[async_trait]
impl ActorLifecycle for NoopActorLifecycle {
  async fn on_activate(&self, actor_type: &str) -> anyhow::Result<()> {
    log::debug!("on_activate: actor_type = {}", actor_type);
    Ok(())
  }
}
