//! scenario inclusion directive
//!
//! A directive line embeds a scenario of another feature file:
//!
//! ```gherkin
//! {% scenario "login", feature="../library/auth.feature" %}
//! ```
//!
//! Attributes are double quoted, whitespace around `,` and `=` is tolerated.
use regex::Regex;
use std::sync::LazyLock;

static DIRECTIVE_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\{%-?\s*scenario\b").expect("directive opener pattern must compile")
});

static DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\{%\s*scenario\s+"(?P<scenario>[^"]+)"\s*,\s*feature\s*=\s*"(?P<feature>[^"]+)"\s*%\}$"#,
    )
    .expect("directive pattern must compile")
});

/// A parsed `{% scenario ... %}` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    /// name of the scenario to include
    pub scenario: String,
    /// path of the feature file, relative to the directory of the including file
    pub feature: String,
    /// the directive as written (without surrounding whitespace)
    pub source: String,
}

impl Directive {
    /// Does this (trimmed) line open the directive token?
    ///
    /// Lines that do must parse via [Directive::parse], anything else is a malformed directive.
    pub fn is_directive(line: &str) -> bool {
        DIRECTIVE_OPENER.is_match(line.trim())
    }

    /// Parse a directive line
    ///
    /// Returns `None` if the line opens the directive token but the attributes do not match
    /// the directive syntax.
    pub fn parse(line: &str) -> Option<Self> {
        let source = line.trim();
        let captures = DIRECTIVE.captures(source)?;

        Some(Self {
            scenario: captures["scenario"].to_string(),
            feature: captures["feature"].to_string(),
            source: source.to_string(),
        })
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.feature, self.scenario)
    }
}
