//! Comment-preserving capture of an application's `components`
//!
//! The typed model loses comments and key order. [`ComponentsNode`] keeps the
//! source lines of the `components` block instead (indentation, content and
//! comments) so the block can be shown to a user exactly as it was written.
//!
//! A capture is only kept verbatim if rendering it decodes back to the same
//! value as the full parse. Otherwise (flow-style parents, JSON input, quoted
//! keys) the node holds a canonical rendering of the value.

use pest::Parser;
use pest_derive::Parser;
use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;
use std::fmt::{self, Write};
use std::ops::Range;

use crate::definition::ComponentsSpec;
use crate::error::{BundleError, Result};

#[derive(Parser)]
#[grammar = "yaml_lines.pest"]
struct YamlLineParser;

const COMPONENTS_KEY: &str = "components";

/// One lexed source line
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceLine {
    indent: usize,
    content: String,
    /// Comment including the whitespace before it
    comment: String,
}

impl SourceLine {
    fn is_blank(&self) -> bool {
        self.content.trim().is_empty() && self.comment.is_empty()
    }

    /// Blank or comment-only
    fn is_trivia(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Split `key: value` into key and inline value
    fn key(&self) -> Option<(&str, &str)> {
        let (key, rest) = self.content.split_once(':')?;
        if !(rest.is_empty() || rest.starts_with(' ') || rest.starts_with('\t')) {
            return None;
        }
        Some((key.trim_end(), rest.trim()))
    }

    fn is_sequence_item(&self) -> bool {
        self.content == "-" || self.content.starts_with("- ") || self.content.starts_with("-\t")
    }
}

/// The `components` block of one application
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentsNode {
    lines: Vec<SourceLine>,
    /// Indentation of the `components:` line in its source
    base_indent: usize,
    value: JsonValue,
    verbatim: bool,
}

impl ComponentsNode {
    /// Capture `spec.components` from an application document
    pub fn from_document(document: &str) -> Result<Self> {
        let tree: YamlValue = serde_yaml::from_str(document).map_err(|e| {
            BundleError::conversion(format!("error creating components node: {}", e))
        })?;
        let components = tree
            .get("spec")
            .and_then(|spec| spec.get(COMPONENTS_KEY))
            .cloned()
            .unwrap_or(YamlValue::Null);
        let value = serde_json::to_value(&components).map_err(BundleError::conversion)?;

        Self::capture(document, &["spec", COMPONENTS_KEY], value)
    }

    /// Capture a components-only specification (`components: [...]`)
    ///
    /// The text may be YAML or JSON and must contain a `components` key.
    pub fn from_spec(text: &str) -> Result<Self> {
        let spec = parse_components_spec(text)?;
        Self::capture(text, &[COMPONENTS_KEY], spec.components)
    }

    fn capture(source: &str, path: &[&str], value: JsonValue) -> Result<Self> {
        let verbatim = lex(source).ok().and_then(|lines| {
            let range = find_block(&lines, path)?;
            let base_indent = lines[range.start].indent;
            let node = Self {
                lines: lines[range].to_vec(),
                base_indent,
                value: value.clone(),
                verbatim: true,
            };
            node.decodes_to_value().then_some(node)
        });

        match verbatim {
            Some(node) => Ok(node),
            None => {
                tracing::warn!("components formatting could not be preserved, using canonical form");
                Self::canonical(value)
            }
        }
    }

    /// Build a node from the canonical rendering of a value
    fn canonical(value: JsonValue) -> Result<Self> {
        #[derive(Serialize)]
        struct Canonical<'a> {
            components: &'a JsonValue,
        }

        let text = serde_yaml::to_string(&Canonical { components: &value }).map_err(|e| {
            BundleError::internal(format!("error converting components to YAML: {}", e))
        })?;
        let mut lines = lex(&text).map_err(BundleError::internal)?;
        trim_trailing_blank(&mut lines);

        Ok(Self {
            lines,
            base_indent: 0,
            value,
            verbatim: false,
        })
    }

    fn decodes_to_value(&self) -> bool {
        let Ok(text) = self.render() else {
            return false;
        };
        let Ok(tree) = serde_yaml::from_str::<YamlValue>(&text) else {
            return false;
        };
        tree.get(COMPONENTS_KEY)
            .and_then(|components| serde_json::to_value(components).ok())
            .is_some_and(|decoded| decoded == self.value)
    }

    /// Render the block as text, `components:` first
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", self)
            .map_err(|e| BundleError::internal(format!("error rendering components: {}", e)))?;
        Ok(out)
    }

    /// Decoded value of the `components` field
    pub fn value(&self) -> &JsonValue {
        &self.value
    }

    /// Whether the original formatting and comments were kept
    pub fn is_verbatim(&self) -> bool {
        self.verbatim
    }
}

impl fmt::Display for ComponentsNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            if !line.is_blank() {
                let indent = line.indent.saturating_sub(self.base_indent);
                write!(f, "{:indent$}{}{}", "", line.content, line.comment)?;
            }
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Parse a components-only specification, JSON or YAML
pub(crate) fn parse_components_spec(text: &str) -> Result<ComponentsSpec> {
    let parsed = if text.trim_start().starts_with('{') {
        serde_json::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|e| BundleError::internal(format!("unable to parse components: {}", e)))
}

fn lex(text: &str) -> std::result::Result<Vec<SourceLine>, Box<pest::error::Error<Rule>>> {
    let block = YamlLineParser::parse(Rule::block, text)?
        .next()
        .map(|pair| pair.into_inner());

    let mut lines = Vec::new();
    for pair in block.into_iter().flatten() {
        if pair.as_rule() != Rule::line {
            continue;
        }
        let mut line = SourceLine {
            indent: 0,
            content: String::new(),
            comment: String::new(),
        };
        for part in pair.into_inner() {
            match part.as_rule() {
                Rule::indent => line.indent = part.as_str().len(),
                Rule::content => line.content = part.as_str().to_string(),
                Rule::comment | Rule::trailing_comment => line.comment = part.as_str().to_string(),
                _ => {}
            }
        }
        lines.push(line);
    }
    Ok(lines)
}

/// Locate the lines of the block at `path`, one key per nesting level
fn find_block(lines: &[SourceLine], path: &[&str]) -> Option<Range<usize>> {
    let (last, parents) = path.split_last()?;
    let mut scope = 0..lines.len();

    for key in parents {
        let start = find_key(lines, scope.clone(), key)?;
        let (_, inline) = lines[start].key()?;
        if !inline.is_empty() {
            return None;
        }
        scope = start + 1..block_end(lines, start, scope.end);
    }

    let start = find_key(lines, scope.clone(), last)?;
    Some(start..block_end(lines, start, scope.end))
}

/// Find `key:` at the indentation of the first content line of `scope`
fn find_key(lines: &[SourceLine], scope: Range<usize>, key: &str) -> Option<usize> {
    let level = lines[scope.clone()].iter().find(|l| !l.is_trivia())?.indent;
    scope.into_iter().find(|&i| {
        let line = &lines[i];
        !line.is_trivia() && line.indent == level && line.key().is_some_and(|(k, _)| k == key)
    })
}

/// Exclusive end of the value block started by the key line at `start`
///
/// Trailing blank and comment lines are left to whatever follows.
fn block_end(lines: &[SourceLine], start: usize, limit: usize) -> usize {
    let indent = lines[start].indent;
    let has_inline_value = lines[start].key().is_some_and(|(_, v)| !v.is_empty());
    let mut end = start + 1;

    for (i, line) in lines.iter().enumerate().take(limit).skip(start + 1) {
        if line.is_trivia() {
            continue;
        }
        let nested = line.indent > indent
            || (line.indent == indent && !has_inline_value && line.is_sequence_item());
        if !nested {
            break;
        }
        end = i + 1;
    }
    end
}

fn trim_trailing_blank(lines: &mut Vec<SourceLine>) {
    while lines.last().is_some_and(SourceLine::is_blank) {
        lines.pop();
    }
}
