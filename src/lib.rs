use thiserror::Error;

#[allow(dead_code)]
pub mod core;
pub mod infrastructure;

pub type BridgeResult<T> = Result<T, BridgeError>;

#[derive(Error, Debug)]
pub enum BridgeError {
  #[error("Unknown type: {type_name}")]
  UnknownType { type_name: String },
  #[error("Not an actor type: {type_name}")]
  NotAnActorType { type_name: String },
  #[error("Not an interface: {type_name}")]
  NotAnInterface { type_name: String },
  #[error("Type has no JSON codec: {type_name}")]
  NotDeserializable { type_name: String },
  #[error("Invalid value for parameter of type {type_name}: {source}")]
  InvalidParameter {
    type_name: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("Invalid parameters JSON: {0}")]
  InvalidParametersJson(#[source] serde_json::Error),
  #[error("Unrecognized key kind: {interface}")]
  UnrecognizedKeyKind { interface: String },
  #[error("Invalid {key_kind} key: {identity:?}")]
  InvalidKey { key_kind: String, identity: String },
  #[error("Spawning a fresh identity requires a Guid key, {interface} is keyed by {key_kind}")]
  SpawnRequiresGuidKey { interface: String, key_kind: String },
  #[error("No actor type is bound to {interface}")]
  UnboundInterface { interface: String },
  #[error("{actor_type} does not implement {interface}")]
  InterfaceNotImplemented { actor_type: String, interface: String },
  #[error("Actor reference is not viewable as {interface}")]
  InterfaceViewMismatch { interface: String },
  #[error("Argument shape mismatch for {method}: expected {expected:?}, actual {actual:?}")]
  ArgumentShapeMismatch {
    method: String,
    expected: Vec<String>,
    actual: Vec<String>,
  },
  #[error("Argument at position {position} is missing")]
  MissingArgument { position: usize },
  #[error("Argument at position {position} is not a {type_name}")]
  ArgumentTypeMismatch { position: usize, type_name: String },
  #[error("Method id generation failed: {message}")]
  IdGeneration { message: String },
  #[error("Bridge is not activated yet: {actor_type}")]
  NotReady { actor_type: String },
  #[error("Configuration error: {0}")]
  Config(#[from] config::ConfigError),
  #[error(transparent)]
  Actor(#[from] anyhow::Error),
}

impl BridgeError {
  pub(crate) fn unknown_type(type_name: &str) -> Self {
    BridgeError::UnknownType {
      type_name: type_name.to_string(),
    }
  }

  /// Recovers a bridge error that travelled through an actor method body as `anyhow::Error`.
  pub(crate) fn from_actor(err: anyhow::Error) -> Self {
    match err.downcast::<BridgeError>() {
      Ok(bridge_error) => bridge_error,
      Err(err) => BridgeError::Actor(err),
    }
  }
}
