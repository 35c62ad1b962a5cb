//! feature text output
//!
//! Inactive text (the preamble, `Background:` sections, commented-out scenarios and comment
//! lines) is written exactly as it was read. Active scenarios are re-indented relative to their
//! header and their tables are normalized with [crate::table::normalize].
use crate::feature_document::{Block, FeatureDocument, Line, ScenarioBlock};
use crate::scanner::is_comment;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// number of spaces per indentation level
    pub indent_width: usize,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self { indent_width: 2 }
    }
}

/// Render a (resolved) document as feature text
pub fn emit(document: &FeatureDocument, options: &EmitOptions) -> String {
    let mut composer = Composer::new(options);

    for block in document.blocks() {
        match block {
            Block::Comment(lines) | Block::Background(lines) => composer.verbatim(lines),
            Block::Scenario(scenario) if !scenario.active => composer.verbatim(&scenario.raw),
            Block::Scenario(scenario) => composer.scenario(scenario),
        }
    }

    let mut text = composer.lines.join("\n");
    if document.trailing_newline() && !composer.lines.is_empty() {
        text.push('\n');
    }
    text
}

/// Render a (resolved) document into `destination`, replacing its content
pub fn emit_to_file(
    document: &FeatureDocument,
    options: &EmitOptions,
    destination: &Path,
) -> std::io::Result<()> {
    let text = emit(document, options);
    std::fs::write(destination, text)?;
    tracing::info!(path=%destination.display(), "feature written");
    Ok(())
}

struct Composer<'a> {
    options: &'a EmitOptions,
    lines: Vec<String>,
}

impl<'a> Composer<'a> {
    fn new(options: &'a EmitOptions) -> Self {
        Self {
            options,
            lines: vec![],
        }
    }

    fn verbatim(&mut self, lines: &[String]) {
        self.lines.extend(lines.iter().cloned());
    }

    fn scenario(&mut self, scenario: &ScenarioBlock) {
        let header_indent = indentation(&scenario.header);
        let step_indent = self.indent(header_indent, 1);
        let nested_indent = self.indent(header_indent, 2);

        for tag in &scenario.tags {
            if is_comment(tag) {
                self.lines.push(tag.clone());
            } else {
                self.lines.push(format!("{header_indent}{}", tag.trim()));
            }
        }
        self.lines.push(scenario.header.clone());

        let mut table: Vec<&str> = vec![];
        for line in &scenario.lines {
            if let Line::TableRow(row) = line {
                table.push(row);
                continue;
            }
            self.table(&mut table, &nested_indent);

            let line = match line {
                Line::Step(text) => format!("{step_indent}{text}"),
                Line::Directive(directive) => format!("{step_indent}{}", directive.source),
                Line::DocStringDelimiter(delimiter) => format!("{nested_indent}{delimiter}"),
                Line::DocStringContent {
                    text,
                    rebased: true,
                } if !text.is_empty() => format!("{nested_indent}{text}"),
                Line::DocStringContent { text, .. } | Line::Comment(text) => text.clone(),
                Line::Blank => String::new(),
                Line::TableRow(_) => continue,
            };
            self.lines.push(line);
        }
        self.table(&mut table, &nested_indent);
    }

    /// Emit pending table rows
    fn table(&mut self, rows: &mut Vec<&str>, indent: &str) {
        if rows.is_empty() {
            return;
        }

        for row in crate::table::normalize(rows.as_slice()) {
            self.lines.push(format!("{indent}{row}"));
        }
        rows.clear();
    }

    fn indent(&self, base: &str, levels: usize) -> String {
        format!("{base}{}", " ".repeat(self.options.indent_width * levels))
    }
}

fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
