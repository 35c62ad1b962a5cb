use super::Visit;
use crate::feature_document::{Block, FeatureDocument, Line, ScenarioBlock};
use crate::scanner::is_comment;

/// Visit every line of active text
///
/// Active text is everything that is not commented out and not part of an inactive scenario.
pub trait VisitActiveText {
    fn visit_active_text(&self, visitor: &mut dyn Visit<str>);
}

impl VisitActiveText for FeatureDocument {
    fn visit_active_text(&self, visitor: &mut dyn Visit<str>) {
        for block in self.blocks() {
            block.visit_active_text(visitor);
        }
    }
}

impl VisitActiveText for Block {
    fn visit_active_text(&self, visitor: &mut dyn Visit<str>) {
        match self {
            Block::Comment(lines) | Block::Background(lines) => lines
                .iter()
                .filter(|line| !is_comment(line))
                .for_each(|line| visitor.visit(line)),
            Block::Scenario(scenario) => scenario.visit_active_text(visitor),
        }
    }
}

impl VisitActiveText for ScenarioBlock {
    fn visit_active_text(&self, visitor: &mut dyn Visit<str>) {
        if !self.active {
            return;
        }

        self.tags
            .iter()
            .chain(std::iter::once(&self.header))
            .filter(|line| !is_comment(line))
            .for_each(|line| visitor.visit(line));

        for line in &self.lines {
            line.visit_active_text(visitor);
        }
    }
}

impl VisitActiveText for Line {
    fn visit_active_text(&self, visitor: &mut dyn Visit<str>) {
        match self {
            Line::Step(text)
            | Line::TableRow(text)
            | Line::DocStringDelimiter(text)
            | Line::DocStringContent { text, .. } => visitor.visit(text),
            Line::Directive(directive) => visitor.visit(&directive.source),
            Line::Comment(_) | Line::Blank => {}
        }
    }
}
