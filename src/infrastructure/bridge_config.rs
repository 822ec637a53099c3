use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::core::actor::actor_key::KeyKind;
use crate::core::actor::actor_metadata::ExplicitMetadataProvider;
use crate::{BridgeError, BridgeResult};

pub const ENV_PREFIX: &str = "ACTUATOR_BRIDGE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimaryInterfaceMapping {
  pub actor_type: String,
  pub interface: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyKindMapping {
  pub interface: String,
  pub key_kind: String,
}

/// Addressing overrides and marshaling switches for a bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
  #[serde(default)]
  pub primary_interfaces: Vec<PrimaryInterfaceMapping>,
  #[serde(default)]
  pub key_kinds: Vec<KeyKindMapping>,
  #[serde(default = "default_lenient_string_values")]
  pub lenient_string_values: bool,
}

fn default_lenient_string_values() -> bool {
  true
}

impl Default for BridgeConfig {
  fn default() -> Self {
    Self {
      primary_interfaces: Vec::new(),
      key_kinds: Vec::new(),
      lenient_string_values: default_lenient_string_values(),
    }
  }
}

impl BridgeConfig {
  /// Reads `name` (any format `config` recognizes, optional) overlaid with `ACTUATOR_BRIDGE_*` variables.
  pub fn load(name: &str) -> BridgeResult<Self> {
    let mut settings = Config::default();
    settings
      .merge(File::with_name(name).required(false))?
      .merge(Environment::with_prefix(ENV_PREFIX))?;
    let config: BridgeConfig = settings.try_into()?;
    log::debug!("load: name = {}, config = {:?}", name, config);
    Ok(config)
  }

  pub fn from_toml(toml: &str) -> BridgeResult<Self> {
    let mut settings = Config::default();
    settings.merge(File::from_str(toml, FileFormat::Toml))?;
    Ok(settings.try_into()?)
  }

  pub fn metadata_provider(&self) -> BridgeResult<ExplicitMetadataProvider> {
    ExplicitMetadataProvider::from_config(self)
  }
}

impl ExplicitMetadataProvider {
  pub fn from_config(config: &BridgeConfig) -> BridgeResult<Self> {
    let mut provider = ExplicitMetadataProvider::new();
    for mapping in &config.primary_interfaces {
      provider = provider.with_primary_interface(&mapping.actor_type, &mapping.interface);
    }
    for mapping in &config.key_kinds {
      let key_kind = KeyKind::from_str(&mapping.key_kind)
        .map_err(|message| BridgeError::Config(config::ConfigError::Message(message)))?;
      provider = provider.with_key_kind(&mapping.interface, key_kind);
    }
    Ok(provider)
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::core::actor::actor_metadata::ActorMetadataProvider;
  use crate::core::actor::actor_type::{ActorTypeInfo, InterfaceInfo, GRAIN};
  use crate::core::types::type_module::TypeModule;
  use crate::core::types::type_registry::TypeRegistry;

  const TOML: &str = r#"
    lenient_string_values = false

    [[primary_interfaces]]
    actor_type = "demo.Lobby"
    interface = "demo.IRoomGrain"

    [[key_kinds]]
    interface = "demo.IRoomGrain"
    key_kind = "String"
  "#;

  #[test]
  fn test_from_toml() {
    let config = BridgeConfig::from_toml(TOML).unwrap();
    assert!(!config.lenient_string_values);
    assert_eq!(
      config.primary_interfaces,
      vec![PrimaryInterfaceMapping {
        actor_type: "demo.Lobby".to_string(),
        interface: "demo.IRoomGrain".to_string(),
      }]
    );
    assert_eq!(config.key_kinds.len(), 1);
  }

  #[test]
  fn test_defaults() {
    let config = BridgeConfig::from_toml("").unwrap();
    assert_eq!(config, BridgeConfig::default());
    assert!(config.lenient_string_values);
  }

  #[test]
  fn test_load_missing_file_uses_defaults() {
    let config = BridgeConfig::load("does-not-exist/bridge").unwrap();
    assert!(config.primary_interfaces.is_empty());
  }

  #[test]
  fn test_metadata_provider() {
    let registry = TypeRegistry::new().with_module(
      TypeModule::new("demo")
        .interface(InterfaceInfo::marker("demo.IRoomGrain", &[GRAIN]))
        .actor(ActorTypeInfo::new("demo.Lobby").with_interface("demo.IRoomGrain")),
    );
    let provider = BridgeConfig::from_toml(TOML).unwrap().metadata_provider().unwrap();
    let lobby = registry.resolve("demo.Lobby").unwrap();
    let primary = provider.primary_interface(&registry, &lobby).unwrap();
    assert_eq!(primary.full_name(), "demo.IRoomGrain");
    assert_eq!(provider.key_kind(&registry, &primary), Some(KeyKind::String));
  }

  #[test]
  fn test_unknown_key_kind_is_a_config_error() {
    let config = BridgeConfig::from_toml(
      r#"
      [[key_kinds]]
      interface = "demo.IRoomGrain"
      key_kind = "long"
      "#,
    )
    .unwrap();
    assert!(matches!(config.metadata_provider(), Err(BridgeError::Config(_))));
  }
}
