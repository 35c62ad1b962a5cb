//! resolve, render and extract in one step
use crate::emitter::{emit, EmitOptions};
use crate::feature_document::FeatureDocument;
use crate::resolver::{resolve, ResolveError};
use crate::variables::TemplateVariables;
use std::path::Path;

/// A resolved feature file
#[derive(Debug)]
pub struct Composition {
    /// the root document with all directives replaced
    pub document: FeatureDocument,
    /// rendered feature text
    pub text: String,
    /// variables of the rendered text, in order of first appearance
    pub variables: TemplateVariables,
}

impl Composition {
    pub fn new(root: &Path, options: &EmitOptions) -> Result<Self, ResolveError> {
        let document = resolve(root)?;
        Ok(Self::from_document(document, options))
    }

    /// Render a document without resolving it
    pub fn from_document(document: FeatureDocument, options: &EmitOptions) -> Self {
        let text = emit(&document, options);
        // the rendered text scans to the same active text as `document`
        let variables = TemplateVariables::from_document(&document);

        Self {
            document,
            text,
            variables,
        }
    }
}
