//! Settings module - the persisted key-value store and typed access to the
//! configuration kept in it.

mod config_service;
mod memory_store;
mod persisted;
mod settings_constants;
mod settings_model;
mod settings_traits;


pub use config_service::{ConfigService, ConfigServiceTrait};
pub use memory_store::MemoryStore;
pub use persisted::{
    data_set_from_value, read_by_class, read_json, read_schema_version, write_json,
};
pub use settings_constants::*;
pub use settings_model::{PersistedConfig, Theme};
pub use settings_traits::KeyValueStoreTrait;
