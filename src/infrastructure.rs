pub mod bridge_config;
pub mod local_actor_ref_provider;
pub mod logging_rw_lock;
