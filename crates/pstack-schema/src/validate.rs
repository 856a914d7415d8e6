//! # Schema Validation
//!
//! Strict structural validation of YAML configuration documents against a
//! JSON Schema. The schema is plain JSON loaded from a single file; the
//! document is YAML, converted to a JSON value tree before validation
//! because JSON Schema is defined over JSON instances.
//!
//! Validation is a gate: documents that fail are rejected with structured
//! error information including the instance path, the schema path, and a
//! human-readable message for every violation. The advisory scan in
//! [`crate::document`] only runs on documents that pass this gate.
//!
//! The schema draft is auto-detected from the document's `$schema` field
//! rather than pinned, so the tool accepts schemas written against any
//! draft the engine supports.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonschema::Validator;
use serde_json::Value;
use thiserror::Error;

use crate::document::ConfigDoc;

/// Error during schema validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The document did not conform to the schema.
    #[error("validation failed against '{schema}':\n{violations}")]
    ValidationFailed {
        /// Path or label of the schema validated against.
        schema: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// The schema file could not be read or parsed as JSON.
    #[error("schema load error for '{path}': {reason}")]
    SchemaLoad {
        /// Path to the schema file.
        path: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The configuration file could not be read or parsed as YAML.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoad {
        /// Path to the configuration file.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The schema itself did not compile into a validator.
    #[error("validator build error for '{schema}': {reason}")]
    ValidatorBuild {
        /// Path or label of the schema.
        schema: String,
        /// Reason the validator could not be compiled.
        reason: String,
    },

    /// IO error reading schema or document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations, one per failed schema check.
#[derive(Debug, Clone)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A validator backed by a single JSON Schema document.
///
/// Holds the parsed schema value; a compiled `jsonschema::Validator` is
/// built per validation call. Construction from a file keeps the path for
/// error reporting.
#[derive(Debug)]
pub struct SchemaValidator {
    /// Label used in error messages: the schema path, or "<inline>".
    source: String,
    schema: Value,
}

impl SchemaValidator {
    /// Load a JSON Schema from a file.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::SchemaLoad`] if the file cannot be
    /// read or is not valid JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let path: PathBuf = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            SchemaValidationError::SchemaLoad {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            }
        })?;
        let schema: Value = serde_json::from_str(&content).map_err(|e| {
            SchemaValidationError::SchemaLoad {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {e}"),
            }
        })?;
        Ok(Self {
            source: path.display().to_string(),
            schema,
        })
    }

    /// Wrap an already-parsed schema value.
    pub fn from_value(schema: Value) -> Self {
        Self {
            source: "<inline>".to_owned(),
            schema,
        }
    }

    /// Compile the schema into a `jsonschema::Validator`.
    fn build(&self) -> Result<Validator, SchemaValidationError> {
        jsonschema::validator_for(&self.schema).map_err(|e| {
            SchemaValidationError::ValidatorBuild {
                schema: self.source.clone(),
                reason: e.to_string(),
            }
        })
    }

    /// Validate a parsed JSON value against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::ValidationFailed`] with one
    /// [`Violation`] per failed check if the instance is invalid.
    pub fn validate_value(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let validator = self.build()?;

        let errors: Vec<Violation> = validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema: self.source.clone(),
                violations: ValidationViolations { violations: errors },
            })
        }
    }

    /// Load a YAML configuration file, validate it against the schema, and
    /// return the typed document model on success.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaValidationError::DocumentLoad`] if the file cannot be
    /// read, is not valid YAML, or contains YAML constructs that have no
    /// JSON equivalent. Returns [`SchemaValidationError::ValidationFailed`]
    /// if the document does not conform to the schema.
    pub fn validate_config_file(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<ConfigDoc, SchemaValidationError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SchemaValidationError::DocumentLoad {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            }
        })?;

        let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content).map_err(|e| {
            SchemaValidationError::DocumentLoad {
                path: path.display().to_string(),
                reason: format!("invalid YAML: {e}"),
            }
        })?;

        let json_value = yaml_to_json(&yaml_value).map_err(|e| {
            SchemaValidationError::DocumentLoad {
                path: path.display().to_string(),
                reason: format!("YAML-to-JSON conversion failed: {e}"),
            }
        })?;

        self.validate_value(&json_value)?;

        Ok(ConfigDoc::from_yaml(&yaml_value))
    }
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
///
/// Configuration documents use only the JSON-compatible subset of YAML.
/// Tags are stripped, mapping keys must be scalars, and floats must be
/// representable in JSON.
fn yaml_to_json(yaml: &serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;

    match yaml {
        Yaml::Null => Ok(Value::Null),
        Yaml::Bool(b) => Ok(Value::Bool(*b)),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Number(i.into()))
            } else if let Some(u) = n.as_u64() {
                Ok(Value::Number(u.into()))
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot represent float {f} in JSON"))
            } else {
                Err(format!("unsupported YAML number: {n:?}"))
            }
        }
        Yaml::String(s) => Ok(Value::String(s.clone())),
        Yaml::Sequence(seq) => seq
            .iter()
            .map(yaml_to_json)
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Yaml::Mapping(map) => {
            let mut object = serde_json::Map::new();
            for (k, v) in map {
                let key = match k {
                    Yaml::String(s) => s.clone(),
                    Yaml::Number(n) => n.to_string(),
                    Yaml::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported YAML map key: {other:?}")),
                };
                object.insert(key, yaml_to_json(v)?);
            }
            Ok(Value::Object(object))
        }
        // Tags carry no meaning here; convert the inner value.
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}
