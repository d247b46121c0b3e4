//! Derivation module - synthetic metrics computed from declared dependencies.

mod builtin_rules;
mod derivation_model;
mod derivation_registry;
mod derivation_rules;


pub use builtin_rules::{default_registry, position_rules, stock_valuation_rules};
pub use derivation_model::DerivationRule;
pub use derivation_registry::DerivationRegistry;
pub use derivation_rules::DerivationRules;
