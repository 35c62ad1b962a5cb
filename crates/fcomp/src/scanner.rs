//! line classification
//!
//! Scanning happens in two passes:
//!
//! 1. split the text into sections at `Background:`/`Scenario:` headers. Headers are found even
//!    when commented out, so a disabled scenario still ends the block before it. Tag lines that
//!    directly precede a header move to the block the header opens.
//! 2. decide per scenario if it is active (any non-blank line not commented out) and, if it is,
//!    classify its body lines into [Line]s.
//!
//! Doc-strings are opaque in both passes: while one is open no header, comment, table or
//! directive is recognized.
use crate::directive::Directive;
use crate::feature_document::{Block, FeatureDocument, Line, ScenarioBlock, Source};

const DOC_STRING_DELIMITERS: [&str; 2] = [r#"""""#, "```"];
const SCENARIO_KEYWORDS: [&str; 4] = [
    "Scenario Outline:",
    "Scenario Template:",
    "Scenario:",
    "Example:",
];
const BACKGROUND_KEYWORD: &str = "Background:";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("malformed scenario directive on line {line}: {text}")]
    MalformedDirective { line: usize, text: String },
}

/// States of the line classifier
///
/// The section split knows `Background` (opaque text: the preamble and `Background:` sections),
/// `ScenarioHeader` (a scenario section) and `DocString`. The body of an active scenario starts
/// in `ScenarioHeader` and moves between the remaining states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State<'a> {
    Background,
    ScenarioHeader,
    ScenarioBody,
    Table,
    DocString {
        delimiter: &'static str,
        indent: &'a str,
    },
}

/// A numbered source line (1-based)
type SourceLine<'a> = (usize, &'a str);

#[derive(Debug)]
enum SectionKind {
    Comment,
    Background,
    Scenario { name: String },
}

#[derive(Debug)]
struct Section<'a> {
    kind: SectionKind,
    tags: Vec<SourceLine<'a>>,
    header: Option<SourceLine<'a>>,
    body: Vec<SourceLine<'a>>,
}

impl<'a> Section<'a> {
    fn new(kind: SectionKind, tags: Vec<SourceLine<'a>>, header: Option<SourceLine<'a>>) -> Self {
        Self {
            kind,
            tags,
            header,
            body: vec![],
        }
    }

    /// Remove tag lines at the end of the section
    fn take_trailing_tags(&mut self) -> Vec<SourceLine<'a>> {
        let keep = self
            .body
            .iter()
            .rposition(|(_, line)| !is_tag(line))
            .map_or(0, |position| position + 1);

        self.body.split_off(keep)
    }

    fn all_lines(&self) -> impl Iterator<Item = &SourceLine<'a>> {
        self.tags.iter().chain(self.header.iter()).chain(&self.body)
    }

    fn into_block(self) -> Result<Block, ScanError> {
        let raw: Vec<String> = self.all_lines().map(|(_, line)| line.to_string()).collect();
        // tags do not count, a disabled scenario may keep its tags
        let active = self
            .header
            .iter()
            .chain(&self.body)
            .any(|(_, line)| !is_blank(line) && !is_comment(line));

        let block = match self.kind {
            SectionKind::Comment => Block::Comment(raw),
            SectionKind::Background => Block::Background(raw),
            SectionKind::Scenario { name } => {
                let lines = if active {
                    classify_body(&self.body)?
                } else {
                    tracing::trace!(scenario=%name, "inactive scenario");
                    vec![]
                };

                Block::Scenario(ScenarioBlock {
                    name,
                    active,
                    tags: self.tags.iter().map(|(_, line)| line.to_string()).collect(),
                    header: self
                        .header
                        .map(|(_, line)| line.to_string())
                        .unwrap_or_default(),
                    lines,
                    raw,
                })
            }
        };

        Ok(block)
    }
}

/// Scan feature text into a [FeatureDocument]
pub(crate) fn scan(text: &str, source: Source) -> Result<FeatureDocument, ScanError> {
    let trailing_newline = text.ends_with('\n');
    let mut lines: Vec<&str> = if text.is_empty() {
        vec![]
    } else {
        text.split('\n').collect()
    };
    if trailing_newline {
        lines.pop();
    }

    let blocks = split_sections(&lines)
        .into_iter()
        .map(Section::into_block)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FeatureDocument::new(source, blocks, trailing_newline))
}

fn split_sections<'a>(lines: &[&'a str]) -> Vec<Section<'a>> {
    let mut sections = vec![Section::new(SectionKind::Comment, vec![], None)];
    let mut section_state = State::Background;
    let mut state = State::Background;

    for (index, &line) in lines.iter().enumerate() {
        let numbered = (index + 1, line);

        let current = sections
            .last_mut()
            .expect("there is always a current section");

        if let State::DocString { delimiter, .. } = state {
            if line.trim_start().starts_with(delimiter) {
                state = section_state.clone();
            }
            current.body.push(numbered);
            continue;
        }

        if let Some((kind, next)) = header(line) {
            tracing::trace!(line = index + 1, state = ?next, "section");
            let tags = current.take_trailing_tags();
            sections.push(Section::new(kind, tags, Some(numbered)));
            section_state = next.clone();
            state = next;
            continue;
        }

        if !is_comment(line) {
            if let Some(delimiter) = doc_string_delimiter(line) {
                state = State::DocString {
                    delimiter,
                    indent: indentation(line),
                };
            }
        }
        current.body.push(numbered);
    }

    sections.retain(|section| section.header.is_some() || !section.body.is_empty());
    sections
}

/// Classify the body of an active scenario
fn classify_body(body: &[SourceLine<'_>]) -> Result<Vec<Line>, ScanError> {
    let mut lines = Vec::with_capacity(body.len());
    let mut state = State::ScenarioHeader;

    for &(number, line) in body {
        let trimmed = line.trim();

        match state {
            State::DocString { delimiter, indent } => {
                if trimmed.starts_with(delimiter) {
                    lines.push(Line::DocStringDelimiter(trimmed.to_string()));
                    state = State::ScenarioBody;
                } else {
                    lines.push(match line.strip_prefix(indent) {
                        Some(text) => Line::DocStringContent {
                            text: text.to_string(),
                            rebased: true,
                        },
                        None => Line::DocStringContent {
                            text: line.to_string(),
                            rebased: false,
                        },
                    });
                }
                continue;
            }
            State::Table if trimmed.starts_with('|') => {
                lines.push(Line::TableRow(trimmed.to_string()));
                continue;
            }
            State::Table => tracing::trace!(line = number, "end of table"),
            State::Background | State::ScenarioHeader | State::ScenarioBody => {}
        }

        if is_blank(line) {
            lines.push(Line::Blank);
            state = State::ScenarioBody;
        } else if is_comment(line) {
            lines.push(Line::Comment(line.to_string()));
            state = State::ScenarioBody;
        } else if let Some(delimiter) = doc_string_delimiter(line) {
            lines.push(Line::DocStringDelimiter(trimmed.to_string()));
            state = State::DocString {
                delimiter,
                indent: indentation(line),
            };
        } else if trimmed.starts_with('|') {
            lines.push(Line::TableRow(trimmed.to_string()));
            state = State::Table;
        } else if Directive::is_directive(trimmed) {
            let directive =
                Directive::parse(trimmed).ok_or_else(|| ScanError::MalformedDirective {
                    line: number,
                    text: trimmed.to_string(),
                })?;
            lines.push(Line::Directive(directive));
            state = State::ScenarioBody;
        } else {
            lines.push(Line::Step(trimmed.to_string()));
            state = State::ScenarioBody;
        }
    }

    Ok(lines)
}

fn header(line: &str) -> Option<(SectionKind, State<'static>)> {
    let text = uncommented(line);

    if text.starts_with(BACKGROUND_KEYWORD) {
        return Some((SectionKind::Background, State::Background));
    }

    SCENARIO_KEYWORDS
        .iter()
        .find_map(|keyword| text.strip_prefix(keyword))
        .map(|name| {
            let name = name.trim().to_string();
            (SectionKind::Scenario { name }, State::ScenarioHeader)
        })
}

fn doc_string_delimiter(line: &str) -> Option<&'static str> {
    let text = line.trim_start();
    DOC_STRING_DELIMITERS
        .into_iter()
        .find(|delimiter| text.starts_with(delimiter))
}

/// Line text with leading whitespace and comment markers removed
fn uncommented(line: &str) -> &str {
    line.trim_start().trim_start_matches('#').trim_start()
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('#')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_tag(line: &str) -> bool {
    uncommented(line).starts_with('@')
}
