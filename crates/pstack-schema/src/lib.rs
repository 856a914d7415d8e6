//! # pstack-schema — Prompt-Stack Configuration Validation
//!
//! Validates `prompt-stack.yaml` configuration documents in two phases:
//!
//! 1. **Strict structural validation** ([`validate`]) — the YAML document is
//!    converted to JSON and checked against a JSON Schema. Failure here is
//!    fatal and produces structured [`Violation`] records.
//! 2. **Advisory cross-reference scan** ([`document`]) — runs only after the
//!    structural check passes. Every model name listed under a role's
//!    `candidates` must appear as a key of the top-level `models` mapping;
//!    mismatches are reported as warnings and never fail the run.
//!
//! The two phases are deliberately separate types: a [`SchemaValidator`] can
//! abort a run, a [`ConfigDoc`] can only add informational output.
//!
//! ## Crate Policy
//!
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Warnings preserve document order: roles in declaration order, then
//!   candidates in sequence order, no deduplication.

pub mod document;
pub mod validate;

pub use document::{ConfigDoc, Role, UnknownModelRef};
pub use validate::{SchemaValidationError, SchemaValidator, ValidationViolations, Violation};
