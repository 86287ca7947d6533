//! YAML document editing that preserves the source text
//!
//! A [`Document`] keeps the original text and applies span-addressed edits:
//! the scalar at a dotted key path is located with tree-sitter and spliced in
//! place, so comments, key order, quoting, and formatting everywhere else
//! survive byte-for-byte.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tree_sitter::Node;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse YAML: {0}")]
    Parse(String),

    #[error(transparent)]
    Path(#[from] PathError),
}

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("field {0:?} not found")]
    FieldNotFound(String),

    #[error("expected a mapping at {0:?}")]
    NotAMapping(String),

    #[error("field {0:?} is not a scalar")]
    NotAScalar(String),
}

/// A YAML document that can be edited field-by-field and written back
/// without disturbing any other content.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let tree = parse_tree(text)?;
        if tree.root_node().has_error() {
            let message = match first_error(tree.root_node()) {
                Some(node) => {
                    let pos = node.start_position();
                    format!("syntax error at line {}, column {}", pos.row + 1, pos.column + 1)
                }
                None => "syntax error".to_string(),
            };
            return Err(DocumentError::Parse(message));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Replaces the scalar at a dot-delimited path of mapping keys.
    ///
    /// Keys are matched by exact string equality in document order. The
    /// target field must already exist; no intermediate mappings are
    /// created. Only the scalar's own span is rewritten, with the original
    /// quoting style kept.
    pub fn set(&mut self, field_path: &str, new_value: &str) -> Result<(), DocumentError> {
        let tree = parse_tree(&self.text)?;
        let segments: Vec<&str> = field_path.split('.').collect();

        let mut mapping = child_mapping(tree.root_node())
            .ok_or_else(|| PathError::NotAMapping("document root".to_string()))?;
        let mut walked = String::new();
        let mut value: Option<Node> = None;

        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                mapping = value
                    .and_then(child_mapping)
                    .ok_or_else(|| PathError::NotAMapping(walked.clone()))?;
            }

            value = lookup(mapping, segment, &self.text)
                .ok_or_else(|| PathError::FieldNotFound(segment.to_string()))?;

            if !walked.is_empty() {
                walked.push('.');
            }
            walked.push_str(segment);
        }

        let scalar = value
            .and_then(scalar_node)
            .ok_or_else(|| PathError::NotAScalar(field_path.to_string()))?;

        let replacement = match scalar.kind() {
            "single_quote_scalar" => format!("'{new_value}'"),
            "double_quote_scalar" => format!("\"{new_value}\""),
            _ => new_value.to_string(),
        };
        self.text.replace_range(scalar.byte_range(), &replacement);
        Ok(())
    }

    /// The document's current text, byte-identical to the source apart from
    /// applied edits.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, &self.text).map_err(|source| DocumentError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn parse_tree(text: &str) -> Result<tree_sitter::Tree, DocumentError> {
    let mut parser = tree_sitter::Parser::new();
    let language = tree_sitter_yaml::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| DocumentError::Parse(e.to_string()))?;
    parser
        .parse(text, None)
        .ok_or_else(|| DocumentError::Parse("parser produced no tree".to_string()))
}

/// First mapping reachable through document/node wrappers, without crossing
/// into a pair.
fn child_mapping(node: Node) -> Option<Node> {
    if matches!(node.kind(), "block_mapping" | "flow_mapping") {
        return Some(node);
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "block_mapping" | "flow_mapping" => return Some(child),
            "document" | "block_node" | "flow_node" => {
                if let Some(found) = child_mapping(child) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

/// Finds the pair keyed by `segment`; the inner `Option` is the pair's
/// value node, which is absent for a bare `key:`.
fn lookup<'tree>(
    mapping: Node<'tree>,
    segment: &str,
    text: &str,
) -> Option<Option<Node<'tree>>> {
    let mut cursor = mapping.walk();
    for pair in mapping.named_children(&mut cursor) {
        if !matches!(pair.kind(), "block_mapping_pair" | "flow_pair") {
            continue;
        }
        let Some(key) = pair.child_by_field_name("key") else {
            continue;
        };
        if key_text(key, text) == segment {
            return Some(pair.child_by_field_name("value"));
        }
    }
    None
}

/// The concrete scalar inside a value node, if any.
fn scalar_node(node: Node) -> Option<Node> {
    match node.kind() {
        "plain_scalar" | "single_quote_scalar" | "double_quote_scalar" => Some(node),
        "block_node" | "flow_node" => {
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                if let Some(scalar) = scalar_node(child) {
                    return Some(scalar);
                }
            }
            None
        }
        _ => None,
    }
}

/// Key text with surrounding quotes removed.
fn key_text(node: Node, text: &str) -> String {
    text[node.byte_range()]
        .trim()
        .trim_start_matches('"')
        .trim_end_matches('"')
        .trim_start_matches('\'')
        .trim_end_matches('\'')
        .to_string()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}
