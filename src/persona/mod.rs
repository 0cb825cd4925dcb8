//! Persona system: the fixed set of expert roles a question can be put to.
//!
//! Each persona maps to a system instruction that sets the AI's voice and
//! a localized label for the UI.

pub mod registry;
pub mod types;

pub use registry::PersonaRegistry;
pub use types::{PersonaDefinition, PersonaType};
