//! Core types for the persona system.
//!
//! A persona is the expert role the AI answers as. It decides the system
//! instruction sent with every consultation and the label shown in the UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ─────────────────────────────────────────────────────────────────
// Persona Type
// ─────────────────────────────────────────────────────────────────

/// The three expert roles a user can consult.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaType {
    /// Medical doctor: symptoms and conditions.
    #[default]
    Doctor,
    /// Lawyer: legal questions.
    Lawyer,
    /// Software engineer: technical questions.
    Engineer,
}

impl PersonaType {
    /// Slug used in form values, CLI args and JSON.
    pub fn slug(&self) -> &'static str {
        match self {
            PersonaType::Doctor => "doctor",
            PersonaType::Lawyer => "lawyer",
            PersonaType::Engineer => "engineer",
        }
    }

    /// Localized label shown next to the radio button.
    pub fn display_name(&self) -> &'static str {
        match self {
            PersonaType::Doctor => "医師",
            PersonaType::Lawyer => "弁護士",
            PersonaType::Engineer => "エンジニア",
        }
    }

    /// All persona types in the order the UI offers them.
    pub fn all() -> &'static [PersonaType] {
        &[PersonaType::Doctor, PersonaType::Lawyer, PersonaType::Engineer]
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PersonaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "doctor" => Ok(PersonaType::Doctor),
            "lawyer" => Ok(PersonaType::Lawyer),
            "engineer" => Ok(PersonaType::Engineer),
            _ => Err(Error::unknown_persona(s)),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Persona Definition
// ─────────────────────────────────────────────────────────────────

/// Static definition of one persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonaDefinition {
    pub id: PersonaType,

    /// System instruction establishing the expert's voice.
    pub instruction: &'static str,

    /// Human-readable label.
    pub display_label: &'static str,
}
