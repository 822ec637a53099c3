use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::actor::actor_type::{GRAIN_WITH_GUID_KEY, GRAIN_WITH_INTEGER_KEY, GRAIN_WITH_STRING_KEY};
use crate::core::types::{GUID, INT32, STRING};
use crate::{BridgeError, BridgeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
  Guid,
  Integer,
  String,
}

impl KeyKind {
  pub const ALL: [KeyKind; 3] = [KeyKind::Guid, KeyKind::Integer, KeyKind::String];

  pub fn type_name(&self) -> &'static str {
    match self {
      KeyKind::Guid => GUID,
      KeyKind::Integer => INT32,
      KeyKind::String => STRING,
    }
  }

  pub fn marker_interface(&self) -> &'static str {
    match self {
      KeyKind::Guid => GRAIN_WITH_GUID_KEY,
      KeyKind::Integer => GRAIN_WITH_INTEGER_KEY,
      KeyKind::String => GRAIN_WITH_STRING_KEY,
    }
  }

  pub fn parse_key(&self, identity: &str) -> BridgeResult<ActorKey> {
    let invalid = || BridgeError::InvalidKey {
      key_kind: self.type_name().to_string(),
      identity: identity.to_string(),
    };
    match self {
      KeyKind::Guid => Uuid::parse_str(identity.trim())
        .map(ActorKey::Guid)
        .map_err(|_| invalid()),
      KeyKind::Integer => identity
        .trim()
        .parse::<i32>()
        .map(ActorKey::Integer)
        .map_err(|_| invalid()),
      KeyKind::String => Ok(ActorKey::String(identity.to_string())),
    }
  }
}

impl Display for KeyKind {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.type_name())
  }
}

impl FromStr for KeyKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "guid" => Ok(KeyKind::Guid),
      "integer" | "int32" => Ok(KeyKind::Integer),
      "string" => Ok(KeyKind::String),
      other => Err(format!("unknown key kind: {}", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorKey {
  Guid(Uuid),
  Integer(i32),
  String(String),
}

impl ActorKey {
  pub fn fresh_guid() -> Self {
    ActorKey::Guid(Uuid::new_v4())
  }

  pub fn kind(&self) -> KeyKind {
    match self {
      ActorKey::Guid(_) => KeyKind::Guid,
      ActorKey::Integer(_) => KeyKind::Integer,
      ActorKey::String(_) => KeyKind::String,
    }
  }
}

impl Display for ActorKey {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      ActorKey::Guid(value) => write!(f, "{}", value),
      ActorKey::Integer(value) => write!(f, "{}", value),
      ActorKey::String(value) => write!(f, "{}", value),
    }
  }
}
