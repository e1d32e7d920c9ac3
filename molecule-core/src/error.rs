//! Error types for molecule codec operations
//!
//! Three disjoint channels are used:
//!
//! - [`CodecError`] carries a path-addressed [`CodecIssue`] tree and is
//!   returned by `unpack` and `safe_parse` for every shape or layout
//!   violation.
//! - [`PackError`] is a plain type error returned when `pack` is handed a
//!   value that is not canonical for the codec.
//! - [`ShapeError`] is returned by codec constructors when the declared
//!   members are inconsistent.

use core::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One segment of the path that addresses a node in an issue tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A struct, table or union field name
    Key(String),
    /// A list index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Default issue formatter: `//path/to/node: message`
pub fn format_codec_error(path: &[PathSegment], message: &str) -> String {
    let joined = path
        .iter()
        .map(|segment| segment.to_string())
        .collect::<Vec<_>>()
        .join("/");
    format!("//{}: {}", joined, message)
}

/// A node in a failure tree
///
/// A leaf carries a message and no children. An aggregate node may carry its
/// own message plus children keyed by field name or index. Children keep
/// their insertion order; adding a child under an existing key replaces it
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecIssue {
    message: Option<String>,
    children: Vec<(PathSegment, CodecIssue)>,
}

impl CodecIssue {
    /// Create an issue with an optional message and children
    pub fn create<I, K>(message: Option<String>, children: I) -> Self
    where
        I: IntoIterator<Item = (K, CodecIssue)>,
        K: Into<PathSegment>,
    {
        let mut issue = Self {
            message,
            children: Vec::new(),
        };
        issue.add_children(children);
        issue
    }

    /// Create a leaf issue
    pub fn leaf(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            children: Vec::new(),
        }
    }

    /// Own message of this node, empty if it has none
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// Whether this node carries its own message
    pub fn has_message(&self) -> bool {
        self.message.is_some()
    }

    /// Children in insertion order
    pub fn children(&self) -> impl Iterator<Item = (&PathSegment, &CodecIssue)> {
        self.children.iter().map(|(key, issue)| (key, issue))
    }

    /// Look up a direct child
    pub fn child(&self, key: impl Into<PathSegment>) -> Option<&CodecIssue> {
        let key = key.into();
        self.children
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, issue)| issue)
    }

    /// Add or replace a child
    pub fn add_child(&mut self, key: impl Into<PathSegment>, issue: CodecIssue) -> &mut Self {
        let key = key.into();
        match self.children.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = issue,
            None => self.children.push((key, issue)),
        }
        self
    }

    /// Add or replace several children
    pub fn add_children<I, K>(&mut self, children: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, CodecIssue)>,
        K: Into<PathSegment>,
    {
        for (key, issue) in children {
            self.add_child(key, issue);
        }
        self
    }

    /// Collect one formatted line per node carrying a message, depth first
    pub fn collect_messages(&self) -> Vec<String> {
        self.collect_messages_with(format_codec_error)
    }

    /// Same as [`collect_messages`](Self::collect_messages) with a custom formatter
    pub fn collect_messages_with<F>(&self, formatter: F) -> Vec<String>
    where
        F: Fn(&[PathSegment], &str) -> String,
    {
        let mut messages = Vec::new();
        let mut prefix = Vec::new();
        self.collect_messages_in(&mut messages, &mut prefix, &formatter);
        messages
    }

    fn collect_messages_in<F>(
        &self,
        messages: &mut Vec<String>,
        prefix: &mut Vec<PathSegment>,
        formatter: &F,
    ) where
        F: Fn(&[PathSegment], &str) -> String,
    {
        if let Some(message) = &self.message {
            messages.push(formatter(prefix, message));
        }
        for (key, issue) in &self.children {
            prefix.push(key.clone());
            issue.collect_messages_in(messages, prefix, formatter);
            prefix.pop();
        }
    }
}

/// Failure wrapping one issue tree
///
/// `cause` links to the error reported by a child codec when a composite
/// adds index, field or variant context on top of it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", .issue.message())]
pub struct CodecError {
    issue: CodecIssue,
    #[source]
    cause: Option<Box<CodecError>>,
}

impl CodecError {
    /// Create an error with a single leaf issue
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            issue: CodecIssue::leaf(message),
            cause: None,
        }
    }

    /// Wrap an existing issue tree
    pub fn from_issue(issue: CodecIssue) -> Self {
        Self { issue, cause: None }
    }

    /// Attach the child error this one was raised for
    pub fn with_cause(mut self, cause: CodecError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// The issue tree
    pub fn issue(&self) -> &CodecIssue {
        &self.issue
    }

    /// Consume the error, keeping its issue tree
    pub fn into_issue(self) -> CodecIssue {
        self.issue
    }

    /// The nested child error, if any
    pub fn cause(&self) -> Option<&CodecError> {
        self.cause.as_deref()
    }

    /// Innermost error of the cause chain
    pub fn root_cause(&self) -> &CodecError {
        let mut current = self;
        while let Some(next) = current.cause() {
            current = next;
        }
        current
    }

    /// See [`CodecIssue::collect_messages`]
    pub fn collect_messages(&self) -> Vec<String> {
        self.issue.collect_messages()
    }

    /// See [`CodecIssue::collect_messages_with`]
    pub fn collect_messages_with<F>(&self, formatter: F) -> Vec<String>
    where
        F: Fn(&[PathSegment], &str) -> String,
    {
        self.issue.collect_messages_with(formatter)
    }

    pub(crate) fn expected_length(expected: usize, found: usize) -> Self {
        Self::new(format!("Expected bytes length {}, found {}", expected, found))
    }

    pub(crate) fn expected_min_length(expected: usize, found: usize) -> Self {
        Self::new(format!(
            "Expected bytes length at least {}, found {}",
            expected, found
        ))
    }
}

/// Outcome of `safe_parse`
#[derive(Debug, Clone, PartialEq)]
pub enum SafeParseResult<T> {
    /// The input was valid; holds the canonical value
    Success(T),
    /// The input was rejected
    Failure(CodecError),
}

impl<T> SafeParseResult<T> {
    /// Whether parsing succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, SafeParseResult::Success(_))
    }

    /// Convert into a standard result
    pub fn into_result(self) -> Result<T, CodecError> {
        match self {
            SafeParseResult::Success(data) => Ok(data),
            SafeParseResult::Failure(error) => Err(error),
        }
    }

    /// The parsed value, if any
    pub fn ok(self) -> Option<T> {
        self.into_result().ok()
    }

    /// The failure, if any
    pub fn err(self) -> Option<CodecError> {
        self.into_result().err()
    }
}

impl<T> From<Result<T, CodecError>> for SafeParseResult<T> {
    fn from(result: Result<T, CodecError>) -> Self {
        match result {
            Ok(data) => SafeParseResult::Success(data),
            Err(error) => SafeParseResult::Failure(error),
        }
    }
}

impl<T: Serialize> Serialize for SafeParseResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            SafeParseResult::Success(data) => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
            }
            SafeParseResult::Failure(error) => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", &error.collect_messages())?;
            }
        }
        map.end()
    }
}

/// Errors raised by `pack` for values that are not canonical for the codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PackError {
    /// The value has the wrong kind
    #[error("Expect {expected}, found {found}")]
    TypeMismatch {
        /// Kind the codec packs
        expected: &'static str,
        /// Kind of the value given
        found: &'static str,
    },

    /// A fixed-length value has the wrong number of items
    #[error("Expect length {expected}, found {found}")]
    LengthMismatch {
        /// Length required by the codec
        expected: usize,
        /// Length of the value given
        found: usize,
    },

    /// Union value names a variant the codec does not declare
    #[error("Unknown union variant {0}")]
    UnknownVariant(String),

    /// Encoded size does not fit into a u32 header
    #[error("Length {0} does not fit into a u32 header")]
    Overflow(usize),
}

/// Errors raised while constructing codecs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// Declared fields absent from the key order
    #[error("Missing keys found: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// A key appears twice in the key order
    #[error("Duplicate key found: {0}")]
    DuplicateKey(String),

    /// The key order names a field that is not declared
    #[error("Unknown key found: {0}")]
    UnknownKey(String),

    /// A union variant codec is registered under a different tag name
    #[error("Codec name {codec} does not match the union tag name {tag}")]
    NameMismatch {
        /// Name of the variant codec
        codec: String,
        /// Tag name it was declared under
        tag: String,
    },

    /// Two union variants share a tag id
    #[error("Duplicate tag id found: {0}")]
    DuplicateTagId(u32),

    /// A member that must be fixed size is not
    #[error("Codec {0} is not fixed size")]
    NotFixedSize(String),

    /// A fixvec element encodes to zero bytes
    #[error("Codec {0} has zero byte length")]
    ZeroSized(String),

    /// The declared byte length does not fit in `usize`
    #[error("Codec {0} is too large")]
    TooLarge(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_messages_depth_first() {
        let mut issue = CodecIssue::leaf("Struct member parse failed");
        issue.add_child("b2", CodecIssue::leaf("Expected array length 2, found 3"));
        issue.add_child(
            "b4",
            CodecIssue::create(
                Some("Array member parse failed".to_string()),
                [(1usize, CodecIssue::leaf("bad"))],
            ),
        );

        assert_eq!(
            issue.collect_messages(),
            vec![
                "//: Struct member parse failed",
                "//b2: Expected array length 2, found 3",
                "//b4: Array member parse failed",
                "//b4/1: bad",
            ]
        );
    }

    #[test]
    fn test_aggregate_without_own_message() {
        let issue = CodecIssue::create(None, [(0usize, CodecIssue::leaf("x"))]);
        assert_eq!(issue.collect_messages(), vec!["//0: x"]);
    }

    #[test]
    fn test_add_child_replaces_in_place() {
        let mut issue = CodecIssue::default();
        issue.add_child("a", CodecIssue::leaf("1"));
        issue.add_child("b", CodecIssue::leaf("2"));
        issue.add_child("a", CodecIssue::leaf("3"));

        let keys: Vec<_> = issue.children().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(issue.child("a").unwrap().message(), "3");
    }

    #[test]
    fn test_custom_formatter() {
        let mut issue = CodecIssue::default();
        issue.add_child("f", CodecIssue::leaf("oops"));
        let messages = issue.collect_messages_with(|path, message| {
            format!("{} => {}", path.len(), message)
        });
        assert_eq!(messages, vec!["1 => oops"]);
    }

    #[test]
    fn test_error_display_and_cause() {
        use std::error::Error;

        let inner = CodecError::new("Expected bytes length 1, found 3");
        let outer = CodecError::new("Invalid table field f").with_cause(inner.clone());

        assert_eq!(outer.to_string(), "Invalid table field f");
        assert_eq!(outer.cause(), Some(&inner));
        assert_eq!(
            outer.source().map(|e| e.to_string()),
            Some("Expected bytes length 1, found 3".to_string())
        );
        assert_eq!(outer.root_cause(), &inner);
    }

    #[test]
    fn test_safe_parse_result_serialize() {
        let ok: SafeParseResult<u8> = SafeParseResult::Success(1);
        assert_eq!(
            serde_json::to_value(&ok).unwrap(),
            serde_json::json!({"success": true, "data": 1})
        );

        let failed: SafeParseResult<u8> = SafeParseResult::Failure(CodecError::new("bad"));
        assert_eq!(
            serde_json::to_value(&failed).unwrap(),
            serde_json::json!({"success": false, "error": ["//: bad"]})
        );
    }

    #[test]
    fn test_shape_error_messages() {
        assert_eq!(
            ShapeError::MissingKeys(vec!["y".into(), "z".into()]).to_string(),
            "Missing keys found: y, z"
        );
        assert_eq!(
            ShapeError::NameMismatch {
                codec: "MolTrue".into(),
                tag: "True".into()
            }
            .to_string(),
            "Codec name MolTrue does not match the union tag name True"
        );
    }
}
