//! template variable extraction
//!
//! Template expressions (`{{ ... }}`) in active text reference variables that have to be supplied
//! before a feature can run. Only the leading identifier of each expression is a variable name,
//! everything after it (operators, indexing, `| filter` segments) is ignored:
//!
//! ```
//! let variables = fcomp::variables::extract(
//!     r#"Given a variable with value "{{foo * 0.25 | int }}" and another value " {{ bar |int + 12}}""#,
//! )
//! .unwrap();
//! assert_eq!(variables.to_vec(), vec!["foo", "bar"]);
//! ```
use crate::feature_document::FeatureDocument;
use crate::scanner::ScanError;
use crate::visit::VisitActiveText;
use indexmap::IndexSet;
use regex::Regex;
use serde::{ser::SerializeSeq, Serializer};
use std::sync::LazyLock;

static EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(.*?)\}\}").expect("expression pattern must compile"));

static LEADING_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)").expect("identifier pattern must compile")
});

/// Variable names in order of first appearance
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TemplateVariables(IndexSet<String>);

impl TemplateVariables {
    /// Collect variables from all active text of a document
    pub fn from_document(document: &FeatureDocument) -> Self {
        let mut variables = Self::default();
        document.visit_active_text(&mut |line: &str| variables.collect_line(line));

        tracing::debug!(count = variables.len(), "variables extracted");
        variables
    }

    /// Add the variables of every expression on `line`
    pub fn collect_line(&mut self, line: &str) {
        for expression in EXPRESSION.captures_iter(line) {
            if let Some(identifier) = LEADING_IDENTIFIER.captures(&expression[1]) {
                // IndexSet keeps the first position of duplicates
                self.0.insert(identifier[1].to_string());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Scan feature text and collect the variables of its active text
pub fn extract(text: &str) -> Result<TemplateVariables, ScanError> {
    let document = FeatureDocument::parse(text)?;
    Ok(TemplateVariables::from_document(&document))
}

impl IntoIterator for TemplateVariables {
    type Item = String;
    type IntoIter = indexmap::set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl serde::ser::Serialize for TemplateVariables {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_seq(Some(self.0.len()))?;
        for variable in &self.0 {
            ser.serialize_element(variable)?;
        }
        ser.end()
    }
}
