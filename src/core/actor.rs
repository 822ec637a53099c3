pub mod actor_key;
pub mod actor_lifecycle;
pub mod actor_metadata;
pub mod actor_ref;
pub mod actor_ref_provider;
pub mod actor_type;
pub mod reference_resolver;
