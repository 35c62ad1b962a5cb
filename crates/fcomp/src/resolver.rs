//! scenario inclusion
//!
//! Directives are replaced, depth first and in source order, by the body of the scenario they
//! point to. Included bodies are expanded before they are substituted, so the result of
//! [resolve] contains no active directives.
//!
//! All state of one resolution lives in an [ExpansionContext]:
//! - every feature file is read and scanned at most once (keyed by canonical path)
//! - the chain of `(file, scenario)` pairs currently being expanded; a pair entering the chain
//!   a second time is a loop
use crate::directive::Directive;
use crate::feature_document::{Block, FeatureDocument, Line, LoadError};
use crate::scanner::ScanError;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Resolve all directives of the feature file at `root`
///
/// Uses a fresh [ExpansionContext]. Fails on the first error, there is no partial result.
pub fn resolve(root: &Path) -> Result<FeatureDocument, ResolveError> {
    resolve_with(&mut ExpansionContext::default(), root)
}

/// Resolve all directives of the feature file at `root` within `context`
///
/// The context should not have been used for another resolution, cached documents are never
/// re-read.
pub fn resolve_with(
    context: &mut ExpansionContext,
    root: &Path,
) -> Result<FeatureDocument, ResolveError> {
    let root = canonicalize(root, None)?;
    let document = context.load(&root, None)?;

    let mut blocks = Vec::with_capacity(document.blocks().len());
    for block in document.blocks() {
        let block = match block {
            Block::Scenario(scenario) if scenario.active => {
                let lines = context.within(&root, &scenario.name, |context| {
                    context.expand(&root, &scenario.lines)
                })?;
                Block::Scenario(scenario.with_lines(lines))
            }
            block => block.clone(),
        };
        blocks.push(block);
    }

    Ok(document.with_blocks(blocks))
}

/// Parsed documents and the resolution chain of one resolve call
#[derive(Debug, Default)]
pub struct ExpansionContext {
    documents: IndexMap<PathBuf, Rc<FeatureDocument>>,
    chain: Vec<ChainLink>,
}

impl ExpansionContext {
    /// Canonical paths of all documents read so far, in load order
    pub fn loaded(&self) -> impl Iterator<Item = &Path> {
        self.documents.keys().map(PathBuf::as_path)
    }

    pub fn chain(&self) -> &[ChainLink] {
        &self.chain
    }

    fn load(
        &mut self,
        path: &Path,
        referenced_by: Option<&Path>,
    ) -> Result<Rc<FeatureDocument>, ResolveError> {
        if let Some(document) = self.documents.get(path) {
            tracing::trace!(path=%path.display(), "cached");
            return Ok(Rc::clone(document));
        }

        let document = FeatureDocument::load_file(path).map_err(|error| match error {
            LoadError::IoError { source, .. } => ResolveError::FileNotFound {
                path: path.to_path_buf(),
                referenced_by: Referrer(referenced_by.map(Path::to_path_buf)),
                source,
            },
            LoadError::ScanFailed(ScanError::MalformedDirective { line, text }) => {
                ResolveError::MalformedDirective {
                    path: path.to_path_buf(),
                    line,
                    text,
                }
            }
        })?;

        let document = Rc::new(document);
        self.documents
            .insert(path.to_path_buf(), Rc::clone(&document));

        Ok(document)
    }

    /// Run `expand` with `(path, scenario)` on the resolution chain
    fn within<T>(
        &mut self,
        path: &Path,
        scenario: &str,
        expand: impl FnOnce(&mut Self) -> Result<T, ResolveError>,
    ) -> Result<T, ResolveError> {
        let link = ChainLink::new(path.to_path_buf(), scenario.to_string());

        if self.chain.contains(&link) {
            let mut chain = self.chain.clone();
            chain.push(link);
            return Err(ResolveError::CyclicInclusion {
                chain: ResolutionChain(chain),
            });
        }

        self.chain.push(link);
        let result = expand(self);
        self.chain.pop();

        result
    }

    /// Expand the body of a scenario of the document at `path`
    fn expand(&mut self, path: &Path, lines: &[Line]) -> Result<Vec<Line>, ResolveError> {
        let mut expanded = Vec::with_capacity(lines.len());

        for line in lines {
            match line {
                Line::Directive(directive) => expanded.extend(self.include(path, directive)?),
                line => expanded.push(line.clone()),
            }
        }

        Ok(expanded)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(directive = %directive))]
    fn include(
        &mut self,
        referencing: &Path,
        directive: &Directive,
    ) -> Result<Vec<Line>, ResolveError> {
        let directory = referencing.parent().unwrap_or_else(|| Path::new(""));
        let target = canonicalize(&directory.join(&directive.feature), Some(referencing))?;
        let document = self.load(&target, Some(referencing))?;

        let mut candidates = document.active_scenarios_named(&directive.scenario);
        let scenario = match (candidates.next(), candidates.next()) {
            (Some(scenario), None) => scenario,
            (None, _) => {
                return Err(ResolveError::ScenarioNotFound {
                    scenario: directive.scenario.clone(),
                    path: target,
                    referenced_by: referencing.to_path_buf(),
                })
            }
            (Some(_), Some(_)) => {
                return Err(ResolveError::AmbiguousScenario {
                    scenario: directive.scenario.clone(),
                    path: target,
                })
            }
        };

        tracing::debug!(path=%target.display(), scenario=%scenario.name, "including scenario");

        self.within(&target, &scenario.name, |context| {
            context.expand(&target, &scenario.lines)
        })
    }
}

fn canonicalize(path: &Path, referenced_by: Option<&Path>) -> Result<PathBuf, ResolveError> {
    path.canonicalize()
        .map_err(|source| ResolveError::FileNotFound {
            path: path.to_path_buf(),
            referenced_by: Referrer(referenced_by.map(Path::to_path_buf)),
            source,
        })
}

/// A `(file, scenario)` pair being expanded
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct ChainLink {
    pub path: PathBuf,
    pub scenario: String,
}

impl std::fmt::Display for ChainLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.path.display(), self.scenario)
    }
}

/// The resolution chain at the point a loop was found, the repeated link last
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionChain(pub Vec<ChainLink>);

impl std::fmt::Display for ResolutionChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, link) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str(" -> ")?;
            }
            link.fmt(f)?;
        }
        Ok(())
    }
}

/// The file a directive was found in, `None` for the root document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referrer(pub Option<PathBuf>);

impl std::fmt::Display for Referrer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(path) => write!(f, "referenced by {}", path.display()),
            None => f.write_str("root document"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ResolveError {
    #[error("unable to read feature file {} ({referenced_by})", .path.display())]
    FileNotFound {
        path: PathBuf,
        referenced_by: Referrer,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "no active scenario named \"{scenario}\" in {} (referenced by {})",
        .path.display(),
        .referenced_by.display()
    )]
    ScenarioNotFound {
        scenario: String,
        path: PathBuf,
        referenced_by: PathBuf,
    },
    #[error("more than one active scenario named \"{scenario}\" in {}", .path.display())]
    AmbiguousScenario { scenario: String, path: PathBuf },
    #[error("cyclic scenario inclusion: {chain}")]
    CyclicInclusion { chain: ResolutionChain },
    #[error("malformed scenario directive in {} on line {line}: {text}", .path.display())]
    MalformedDirective {
        path: PathBuf,
        line: usize,
        text: String,
    },
}
