//! Semantic vocabulary: tags, dimensions, fields, and tagged-dim patterns

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A semantic descriptor attached to a field (e.g. "source", "client")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tag(String);

impl Tag {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Tag(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Tag {
    fn from(s: &str) -> Self {
        Tag::new(s)
    }
}

/// A domain-specific type label attached to a field (e.g. "ip", "port")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Dim(String);

impl Dim {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Dim(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Dim {
    fn from(s: &str) -> Self {
        Dim::new(s)
    }
}

impl From<String> for Dim {
    fn from(s: String) -> Self {
        Dim::new(s)
    }
}

/// The physical name of a column or attribute in one backend
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Field(String);

impl Field {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Field(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        Field::new(s)
    }
}

/// A tag/dimension pattern selecting zero or more concrete fields
///
/// This is the annotation attached to each field in a schema, and also the
/// shape of a parsed selector. A selector pattern `s` matches an annotation
/// `a` when `s.dim` is unset or equal to `a.dim`, and `s.tags` is a subset
/// of `a.tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedDim {
    #[serde(default)]
    pub tags: BTreeSet<Tag>,
    #[serde(default)]
    pub dim: Option<Dim>,
}

impl TaggedDim {
    pub fn new<I>(tags: I, dim: Option<Dim>) -> Self
    where
        I: IntoIterator<Item = Tag>,
    {
        TaggedDim {
            tags: tags.into_iter().collect(),
            dim,
        }
    }

    /// A pattern with a dimension and no tags
    pub fn of_dim<D: Into<Dim>>(dim: D) -> Self {
        TaggedDim {
            tags: BTreeSet::new(),
            dim: Some(dim.into()),
        }
    }

    /// A pattern with tags and no dimension
    pub fn of_tags<I, T>(tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Tag>,
    {
        TaggedDim {
            tags: tags.into_iter().map(Into::into).collect(),
            dim: None,
        }
    }

    /// Subset rule: does this pattern match the given annotation?
    pub fn matches(&self, annotation: &TaggedDim) -> bool {
        let dim_ok = match &self.dim {
            None => true,
            Some(dim) => annotation.dim.as_ref() == Some(dim),
        };
        dim_ok && self.tags.is_subset(&annotation.tags)
    }
}

impl fmt::Display for TaggedDim {
    /// Render in selector syntax: tags joined by `:`, then the dimension,
    /// or a trailing `:` when no dimension is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tag in &self.tags {
            write!(f, "{}:", tag)?;
        }
        match &self.dim {
            Some(dim) => write!(f, "{}", dim),
            None if self.tags.is_empty() => write!(f, ":"),
            None => Ok(()),
        }
    }
}

/// One entry of a projection list: a raw field, a pattern, or `*`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// A concrete `@field` reference
    Field(Field),
    /// A tag/dimension pattern
    Pattern(TaggedDim),
    /// Every declared field
    All,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Field(field) => write!(f, "@{}", field),
            Selector::Pattern(pattern) => write!(f, "{}", pattern),
            Selector::All => write!(f, "*"),
        }
    }
}
