//! feature document model ([Block]s of one feature file and the path to its source)
//!
//! A [FeatureDocument] is
//! - a list of top level [Block]s in source order
//! - the canonical path of the file it was loaded from (if any)
//!
//! and is immutable once scanned. See [crate::scanner] for how text is split into blocks.
use crate::directive::Directive;
use crate::scanner::{self, ScanError};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureDocument {
    source: Source,
    blocks: Vec<Block>,
    trailing_newline: bool,
}

impl FeatureDocument {
    pub(crate) fn new(source: Source, blocks: Vec<Block>, trailing_newline: bool) -> Self {
        Self {
            source,
            blocks,
            trailing_newline,
        }
    }

    /// Scan feature text that was not loaded from a file
    pub fn parse(text: &str) -> Result<Self, ScanError> {
        scanner::scan(text, None)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioBlock> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Scenario(scenario) => Some(scenario),
            _ => None,
        })
    }

    /// All active scenarios named `name`
    pub fn active_scenarios_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a ScenarioBlock> + 'a {
        self.scenarios()
            .filter(move |scenario| scenario.active && scenario.name == name)
    }

    /// Same document with its blocks replaced
    pub(crate) fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            source: self.source.clone(),
            blocks,
            trailing_newline: self.trailing_newline,
        }
    }
}

impl FeatureDocument {
    /// Read and scan a feature file
    ///
    /// The document is identified by the canonical form of `file_path`.
    pub fn load_file(file_path: &Path) -> Result<Self, LoadError> {
        let io_error = |source| LoadError::IoError {
            path: file_path.to_path_buf(),
            source,
        };

        let file_path = file_path.canonicalize().map_err(io_error)?;
        tracing::info!(path=%file_path.display(), "loading file");

        let file_contents = std::fs::read_to_string(&file_path).map_err(io_error)?;
        let document = scanner::scan(&file_contents, Some(file_path))?;

        Ok(document)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("unable to read {}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to scan feature file")]
    ScanFailed(#[from] ScanError),
}

/// Top level structure of a feature file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Opaque text, emitted verbatim
    ///
    /// Holds everything before the first `Background:`/`Scenario:` header: the `Feature:` line,
    /// its tags and description, and comments.
    Comment(Vec<String>),
    /// A `Background:` section, emitted verbatim
    Background(Vec<String>),
    Scenario(ScenarioBlock),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioBlock {
    pub name: String,
    /// `false` when every non-blank line of the block is commented out
    pub active: bool,
    /// tag lines directly preceding the header
    pub tags: Vec<String>,
    pub header: String,
    /// classified body lines, empty for inactive blocks
    pub lines: Vec<Line>,
    /// the block as written: tags, header and body
    pub raw: Vec<String>,
}

impl ScenarioBlock {
    /// Same scenario with its body lines replaced
    pub(crate) fn with_lines(&self, lines: Vec<Line>) -> Self {
        Self {
            lines,
            ..self.clone()
        }
    }

    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.lines.iter().filter_map(|line| match line {
            Line::Directive(directive) => Some(directive),
            _ => None,
        })
    }
}

/// A classified line of an active scenario body
///
/// Text is stored without its original indentation unless noted otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// steps, `Examples:` and any other scenario text
    Step(String),
    Directive(Directive),
    TableRow(String),
    /// `"""` or ```` ``` ````, optionally followed by a media type
    DocStringDelimiter(String),
    /// text between doc-string delimiters
    ///
    /// When `rebased` is set, `text` is relative to the indentation of the opening delimiter,
    /// otherwise it is the line as written.
    DocStringContent { text: String, rebased: bool },
    /// a commented line, as written
    Comment(String),
    Blank,
}

pub type Source = Option<PathBuf>;
