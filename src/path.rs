//! Location paths for values in nested structures.
//!
//! This module provides [`JsonPath`] and [`PathSegment`] for building and
//! parsing paths to values in nested structures. Paths render as `a.b[2].c`;
//! the parser also accepts the all-bracket form `a[b][2][c]`.

use std::fmt::{self, Display};
use std::str::FromStr;

/// A segment of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A field/property access (e.g., `user`, `email`)
    Field(String),
    /// An array index access (e.g., `[0]`, `[42]`)
    Index(usize),
}

impl PathSegment {
    /// Creates a new field segment.
    pub fn field(name: impl Into<String>) -> Self {
        PathSegment::Field(name.into())
    }

    /// Creates a new index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// Errors produced while parsing a path string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// A literal space appeared anywhere in the path.
    #[error("path '{0}' must not contain spaces")]
    ContainsSpace(String),
    /// An empty bracket pair `[]`.
    #[error("path '{0}' contains an empty bracket pair")]
    EmptyBrackets(String),
    /// The path ends with a dangling dot.
    #[error("path '{0}' ends with a dangling dot")]
    TrailingDot(String),
    /// A `[` without a matching `]`.
    #[error("path '{0}' has an unclosed bracket")]
    UnclosedBracket(String),
    /// Two consecutive dots, or a dot with nothing before it.
    #[error("path '{0}' contains an empty segment")]
    EmptySegment(String),
}

/// A path to a value in a nested structure.
///
/// `JsonPath` represents locations like `users[0].email`. It is built
/// incrementally during validation and parsed from strings for schema
/// introspection. The root path renders as the empty string.
///
/// # Example
///
/// ```rust
/// use verdict::JsonPath;
///
/// let path = JsonPath::root()
///     .push_field("users")
///     .push_index(0)
///     .push_field("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// assert_eq!("users[0].email".parse::<JsonPath>().unwrap(), path);
/// assert_eq!("users[0][email]".parse::<JsonPath>().unwrap(), path);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// Creates an empty path representing the root value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single field segment.
    pub fn from_field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Field(name.into())],
        }
    }

    /// Parses a path from its string form.
    ///
    /// Dots introduce fields, brackets hold either an index (all digits) or
    /// a field name; the two notations mix freely. Rejected: literal spaces,
    /// empty bracket pairs, dangling dots and empty segments.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        if input.is_empty() {
            return Ok(Self::root());
        }
        if input.contains(' ') {
            return Err(PathError::ContainsSpace(input.to_string()));
        }

        let mut segments = Vec::new();
        let mut chars = input.char_indices().peekable();

        while let Some((pos, ch)) = chars.next() {
            match ch {
                '[' => {
                    let mut content = String::new();
                    let mut closed = false;
                    for (_, c) in chars.by_ref() {
                        if c == ']' {
                            closed = true;
                            break;
                        }
                        content.push(c);
                    }
                    if !closed {
                        return Err(PathError::UnclosedBracket(input.to_string()));
                    }
                    if content.is_empty() {
                        return Err(PathError::EmptyBrackets(input.to_string()));
                    }
                    // All-digit bracket content indexes the preceding
                    // collection; anything else is a bracket-quoted key.
                    match content.parse::<usize>() {
                        Ok(idx) if content.bytes().all(|b| b.is_ascii_digit()) => {
                            segments.push(PathSegment::Index(idx));
                        }
                        _ => segments.push(PathSegment::Field(content)),
                    }
                }
                '.' => {
                    if pos == 0 {
                        return Err(PathError::EmptySegment(input.to_string()));
                    }
                    match chars.peek() {
                        None => return Err(PathError::TrailingDot(input.to_string())),
                        Some((_, '.')) => {
                            return Err(PathError::EmptySegment(input.to_string()))
                        }
                        _ => {}
                    }
                }
                _ => {
                    let mut name = String::new();
                    name.push(ch);
                    while let Some((_, c)) = chars.peek() {
                        if *c == '.' || *c == '[' {
                            break;
                        }
                        name.push(*c);
                        chars.next();
                    }
                    segments.push(PathSegment::Field(name));
                }
            }
        }

        Ok(Self { segments })
    }

    /// Returns a new path with a field segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_field(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Field(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    ///
    /// This method does not modify the original path; it returns a new one.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns true if this is the root path (no segments).
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the number of segments in this path.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if this path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns an iterator over the path segments.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// Returns the parent path (all segments except the last), or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            None
        } else {
            Some(Self {
                segments: self.segments[..self.segments.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last segment, or None if this is root.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Field(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathSegment::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl FromStr for JsonPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
