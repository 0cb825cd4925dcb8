//! Static persona registry.

use crate::error::{Error, Result};

use super::types::{PersonaDefinition, PersonaType};

static PERSONAS: [PersonaDefinition; 3] = [
    PersonaDefinition {
        id: PersonaType::Doctor,
        instruction: "あなたは優秀な医師です。症状や病状について分かりやすく丁寧に説明してください。",
        display_label: "医師",
    },
    PersonaDefinition {
        id: PersonaType::Lawyer,
        instruction: "あなたは経験豊富な弁護士です。法的な質問に分かりやすく正確に答えてください。",
        display_label: "弁護士",
    },
    PersonaDefinition {
        id: PersonaType::Engineer,
        instruction: "あなたは熟練のソフトウェアエンジニアです。技術的な質問に的確に答えてください。",
        display_label: "エンジニア",
    },
];

/// Registry of the built-in personas.
///
/// The table is compiled in; there is no way to add personas at runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaRegistry;

impl PersonaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a persona id, failing with `UnknownPersona` for anything
    /// outside the table.
    pub fn lookup(&self, persona_id: &str) -> Result<&'static PersonaDefinition> {
        PERSONAS
            .iter()
            .find(|p| p.id.slug() == persona_id)
            .ok_or_else(|| Error::unknown_persona(persona_id))
    }

    /// Definition for an already-typed persona.
    pub fn definition(&self, persona: PersonaType) -> &'static PersonaDefinition {
        match persona {
            PersonaType::Doctor => &PERSONAS[0],
            PersonaType::Lawyer => &PERSONAS[1],
            PersonaType::Engineer => &PERSONAS[2],
        }
    }

    /// All definitions in UI order.
    pub fn all(&self) -> &'static [PersonaDefinition] {
        &PERSONAS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_all_personas() {
        let registry = PersonaRegistry::new();
        let expected = [("doctor", "医師"), ("lawyer", "弁護士"), ("engineer", "エンジニア")];

        for (id, label) in expected {
            let def = registry.lookup(id).unwrap();
            assert_eq!(def.id.slug(), id);
            assert!(!def.instruction.is_empty(), "empty instruction for {}", id);
            assert_eq!(def.display_label, label);
        }
    }

    #[test]
    fn test_lookup_unknown() {
        let registry = PersonaRegistry::new();
        let err = registry.lookup("unknown").unwrap_err();
        assert!(matches!(err, Error::UnknownPersona { ref id } if id == "unknown"));
    }

    #[test]
    fn test_lookup_is_exact() {
        // Slugs are matched verbatim; only FromStr normalises case.
        let registry = PersonaRegistry::new();
        assert!(registry.lookup("Doctor").is_err());
        assert!(registry.lookup("").is_err());
    }

    #[test]
    fn test_definition_matches_lookup() {
        let registry = PersonaRegistry::new();
        for pt in PersonaType::all() {
            let def = registry.definition(*pt);
            assert_eq!(def.id, *pt);
            assert_eq!(def, registry.lookup(pt.slug()).unwrap());
            assert_eq!(def.display_label, pt.display_name());
        }
    }

    #[test]
    fn test_all_in_ui_order() {
        let ids: Vec<_> = PersonaRegistry::new().all().iter().map(|p| p.id).collect();
        assert_eq!(ids, PersonaType::all());
    }
}
