//! # Configuration Document Model
//!
//! Typed view of a parsed `prompt-stack.yaml` document for the advisory
//! cross-reference scan. The YAML tree is loosely typed; this module pins
//! down the two top-level keys the scan cares about with default-on-absence
//! semantics: a missing `roles` or `models` mapping is simply empty.
//!
//! Role order follows the document, which matters for warning output: the
//! scan reports unknown models role by role, candidate by candidate, exactly
//! as they appear in the file.

use std::collections::BTreeSet;
use std::fmt;

use serde_yaml::Value;

/// A named role with its ordered candidate model list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name, the key under the top-level `roles` mapping.
    pub name: String,
    /// Model names under the role's `candidates` sequence, document order.
    pub candidates: Vec<String>,
}

/// An advisory finding: a role's candidate names a model that is not
/// declared under the top-level `models` mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModelRef {
    /// Role whose `candidates` contains the reference.
    pub role: String,
    /// The model name that has no entry under `models`.
    pub model: String,
}

impl fmt::Display for UnknownModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Warning: role \"{}\" references unknown model \"{}\"",
            self.role, self.model
        )
    }
}

/// Parsed configuration document, reduced to what the advisory scan needs.
///
/// Built from a YAML value that has already passed schema validation, but
/// tolerant of arbitrary trees: anything that is not a string-keyed mapping
/// where one is expected is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDoc {
    /// Roles in document order.
    pub roles: Vec<Role>,
    /// Keys of the top-level `models` mapping.
    pub models: BTreeSet<String>,
}

impl ConfigDoc {
    /// Build a document model from a parsed YAML value.
    ///
    /// Absent or non-mapping `roles`/`models` become empty; a role without a
    /// `candidates` sequence gets an empty candidate list. Non-string keys
    /// and non-string candidate entries are skipped — the schema constrains
    /// these to strings, so this only arises on unvalidated input.
    pub fn from_yaml(value: &Value) -> Self {
        let mut doc = ConfigDoc::default();

        if let Some(roles) = value.get("roles").and_then(Value::as_mapping) {
            for (name, defn) in roles {
                let Some(name) = name.as_str() else { continue };
                let candidates = defn
                    .get("candidates")
                    .and_then(Value::as_sequence)
                    .map(|seq| {
                        seq.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_owned)
                            .collect()
                    })
                    .unwrap_or_default();
                doc.roles.push(Role {
                    name: name.to_owned(),
                    candidates,
                });
            }
        }

        if let Some(models) = value.get("models").and_then(Value::as_mapping) {
            doc.models.extend(
                models
                    .keys()
                    .filter_map(Value::as_str)
                    .map(str::to_owned),
            );
        }

        doc
    }

    /// The advisory scan: every candidate that is not a `models` key, in
    /// role-then-candidate document order. No deduplication, no sorting.
    ///
    /// Purely diagnostic — findings never affect the validation outcome.
    pub fn unknown_model_refs(&self) -> Vec<UnknownModelRef> {
        let mut refs = Vec::new();
        for role in &self.roles {
            for candidate in &role.candidates {
                if !self.models.contains(candidate) {
                    refs.push(UnknownModelRef {
                        role: role.name.clone(),
                        model: candidate.clone(),
                    });
                }
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ConfigDoc {
        let value: Value = serde_yaml::from_str(input).unwrap();
        ConfigDoc::from_yaml(&value)
    }

    #[test]
    fn test_empty_document() {
        let doc = parse("{}");
        assert!(doc.roles.is_empty());
        assert!(doc.models.is_empty());
        assert!(doc.unknown_model_refs().is_empty());
    }

    #[test]
    fn test_missing_candidates_treated_as_empty() {
        let doc = parse(
            r#"
roles:
  writer:
    description: drafts text
models:
  gpt-x: {}
"#,
        );
        assert_eq!(doc.roles.len(), 1);
        assert_eq!(doc.roles[0].name, "writer");
        assert!(doc.roles[0].candidates.is_empty());
        assert!(doc.unknown_model_refs().is_empty());
    }

    #[test]
    fn test_known_candidates_produce_no_warnings() {
        let doc = parse(
            r#"
roles:
  writer:
    candidates: [gpt-x]
models:
  gpt-x: {}
"#,
        );
        assert!(doc.unknown_model_refs().is_empty());
    }

    #[test]
    fn test_unknown_candidate_reported() {
        let doc = parse(
            r#"
roles:
  writer:
    candidates: [gpt-x, ghost-model]
models:
  gpt-x: {}
"#,
        );
        let refs = doc.unknown_model_refs();
        assert_eq!(
            refs,
            vec![UnknownModelRef {
                role: "writer".to_owned(),
                model: "ghost-model".to_owned(),
            }]
        );
    }

    #[test]
    fn test_missing_models_mapping_flags_every_candidate() {
        let doc = parse(
            r#"
roles:
  writer:
    candidates: [a, b]
"#,
        );
        let refs = doc.unknown_model_refs();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].model, "a");
        assert_eq!(refs[1].model, "b");
    }

    #[test]
    fn test_warning_order_follows_document_order() {
        let doc = parse(
            r#"
roles:
  zeta:
    candidates: [m2, m1]
  alpha:
    candidates: [m3]
models: {}
"#,
        );
        let refs = doc.unknown_model_refs();
        let pairs: Vec<(&str, &str)> = refs
            .iter()
            .map(|r| (r.role.as_str(), r.model.as_str()))
            .collect();
        // Roles in document order (not sorted), candidates in sequence order.
        assert_eq!(pairs, vec![("zeta", "m2"), ("zeta", "m1"), ("alpha", "m3")]);
    }

    #[test]
    fn test_duplicate_references_not_deduplicated() {
        let doc = parse(
            r#"
roles:
  writer:
    candidates: [ghost, ghost]
models: {}
"#,
        );
        assert_eq!(doc.unknown_model_refs().len(), 2);
    }

    #[test]
    fn test_non_mapping_root_is_empty() {
        let value: Value = serde_yaml::from_str("- just\n- a\n- list").unwrap();
        let doc = ConfigDoc::from_yaml(&value);
        assert_eq!(doc, ConfigDoc::default());
    }

    #[test]
    fn test_warning_display_format() {
        let r = UnknownModelRef {
            role: "writer".to_owned(),
            model: "ghost-model".to_owned(),
        };
        assert_eq!(
            r.to_string(),
            r#"Warning: role "writer" references unknown model "ghost-model""#
        );
    }
}
