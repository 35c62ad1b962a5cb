//! # fcomp - feature composition
//!
//! Feature files can embed scenarios of other feature files. `fcomp` resolves those inclusions
//! into one self-contained feature file and lists the template variables it needs.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `fcomp` works internally.
//!
//! ### Directives
//!
//! A directive is a line inside a scenario that is replaced by the body of another scenario:
//!
//! ```gherkin
//! Feature: checkout
//!   Scenario: pay
//!     {% scenario "login", feature="../library/auth.feature" %}
//!     When the user pays "{{ amount }}"
//! ```
//!
//! The feature path is relative to the directory of the file containing the directive, not to
//! the file resolution started with. This allows shared library files next to their users.
//! See [directive::Directive] for the exact syntax.
//!
//! ### Scanning
//!
//! see [scanner]
//!
//! Feature text is split into top level [feature_document::Block]s:
//! - the preamble (`Feature:` line, description, comments) kept as opaque text
//! - `Background:` sections, kept as opaque text
//! - scenarios
//!
//! A scenario where every line is commented out is *inactive*: it is never classified, never
//! expanded, never contributes variables and is written back exactly as it was read.
//! The lines of active scenarios are classified into [feature_document::Line]s (steps,
//! directives, table rows, doc-strings, comments).
//!
//! ### Resolving
//!
//! see [resolver::resolve]
//!
//! Starting at the root document every directive of every active scenario is replaced by the
//! fully expanded body of the scenario it names. A [resolver::ExpansionContext] caches scanned
//! documents by canonical path and tracks the chain of `(file, scenario)` pairs being expanded.
//! A pair entering the chain twice is a loop and aborts resolution.
//!
//! ### Output
//!
//! see [emitter::emit]
//!
//! Inactive text is copied verbatim. Active scenarios are re-indented relative to their header
//! and tables are normalized ([table::normalize]). Doc-string content is never changed, only its
//! indentation moves along with the delimiters.
//!
//! ### Variables
//!
//! see [variables]
//!
//! `{{ foo | int }}` references the variable `foo`. Variables are collected from active text
//! in order of first appearance.
//!
pub mod composition;
pub mod directive;
pub mod emitter;
pub mod feature_document;
pub mod resolver;
pub mod scanner;
pub mod table;
pub mod variables;
mod visit;
