//! Per-backend schema: field names annotated with tags and dimensions

use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::annotation::{Field, Selector, TaggedDim};
use super::error::SchemaError;

/// One backend's schema expressed as field -> annotation
///
/// Built once from a declarative document of the form
/// `{"<field>": {"tags": [..], "dim": ..}}` and read-only afterwards.
/// Field names are unique by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableMetadata {
    fields: BTreeMap<Field, TaggedDim>,
}

impl TableMetadata {
    /// Build metadata from field/annotation pairs
    pub fn new<I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, TaggedDim)>,
    {
        TableMetadata {
            fields: fields.into_iter().collect(),
        }
    }

    /// Load metadata from a JSON schema file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path_str = path.as_ref().display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|e| SchemaError::Io {
            path: path_str,
            source: e,
        })?;
        Self::from_str(&contents)
    }

    /// Load metadata from a JSON schema string
    pub fn from_str(json: &str) -> Result<Self, SchemaError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Build metadata from an already-parsed JSON document
    pub fn from_value(value: JsonValue) -> Result<Self, SchemaError> {
        let JsonValue::Object(entries) = value else {
            return Err(SchemaError::NotAnObject);
        };

        let mut fields = BTreeMap::new();
        for (name, annotation) in entries {
            if !annotation.is_object() {
                return Err(SchemaError::InvalidAnnotation {
                    field: name,
                    message: format!("expected a tags/dim object, got {}", annotation),
                });
            }
            let tagged: TaggedDim =
                serde_json::from_value(annotation).map_err(|e| SchemaError::InvalidAnnotation {
                    field: name.clone(),
                    message: e.to_string(),
                })?;
            fields.insert(Field::new(name), tagged);
        }

        Ok(TableMetadata { fields })
    }

    /// Is this field declared in the schema?
    pub fn contains(&self, field: &Field) -> bool {
        self.fields.contains_key(field)
    }

    /// The annotation for a declared field
    pub fn annotation(&self, field: &Field) -> Option<&TaggedDim> {
        self.fields.get(field)
    }

    /// All declared fields, in name order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.keys()
    }

    /// Every declared field the selector matches, in name order
    ///
    /// A concrete `@field` matches only itself, and only when declared.
    /// A tag/dim pattern matches by the subset rule. `*` matches every
    /// declared field. An empty result is not an error here; the resolver
    /// decides whether zero matches is fatal.
    pub fn fields_matching(&self, selector: &Selector) -> Vec<Field> {
        match selector {
            Selector::Field(field) => {
                if self.contains(field) {
                    vec![field.clone()]
                } else {
                    vec![]
                }
            }
            Selector::Pattern(pattern) => self
                .fields
                .iter()
                .filter(|(_, annotation)| pattern.matches(annotation))
                .map(|(field, _)| field.clone())
                .collect(),
            Selector::All => self.fields.keys().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dim, Tag};

    fn access_log() -> TableMetadata {
        TableMetadata::from_str(
            r#"{
                "clientip": {"tags": ["client"], "dim": "ip"},
                "serverip": {"tags": ["server"], "dim": "ip"},
                "status": {"tags": ["response"], "dim": null},
                "bytes": {"tags": ["response", "size"], "dim": "count"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_fields_matching_pattern() {
        let metadata = access_log();
        let selector = Selector::Pattern(TaggedDim::of_dim("ip"));
        let fields = metadata.fields_matching(&selector);
        assert_eq!(fields, vec![Field::new("clientip"), Field::new("serverip")]);
    }

    #[test]
    fn test_fields_matching_is_sorted() {
        // Insertion order reversed relative to name order
        let metadata = TableMetadata::new(vec![
            (Field::new("zulu"), TaggedDim::of_dim("ip")),
            (Field::new("alpha"), TaggedDim::of_dim("ip")),
            (Field::new("mike"), TaggedDim::of_dim("ip")),
        ]);
        let fields = metadata.fields_matching(&Selector::Pattern(TaggedDim::of_dim("ip")));
        assert_eq!(
            fields,
            vec![Field::new("alpha"), Field::new("mike"), Field::new("zulu")]
        );
    }

    #[test]
    fn test_fields_matching_subset_rule() {
        let metadata = access_log();
        let tagged = Selector::Pattern(TaggedDim::new(
            [Tag::new("client")],
            Some(Dim::new("ip")),
        ));
        assert_eq!(metadata.fields_matching(&tagged), vec![Field::new("clientip")]);

        // More tags than any annotation carries: no match
        let strict = Selector::Pattern(TaggedDim::new(
            [Tag::new("client"), Tag::new("nat")],
            Some(Dim::new("ip")),
        ));
        assert!(metadata.fields_matching(&strict).is_empty());
    }

    #[test]
    fn test_fields_matching_concrete_field() {
        let metadata = access_log();
        let declared = Selector::Field(Field::new("status"));
        assert_eq!(metadata.fields_matching(&declared), vec![Field::new("status")]);

        let unknown = Selector::Field(Field::new("nosuch"));
        assert!(metadata.fields_matching(&unknown).is_empty());
    }

    #[test]
    fn test_fields_matching_all() {
        let metadata = access_log();
        let all = metadata.fields_matching(&Selector::All);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], Field::new("bytes"));
    }

    #[test]
    fn test_schema_not_an_object() {
        let err = TableMetadata::from_str(r#"["clientip"]"#).unwrap_err();
        assert!(matches!(err, SchemaError::NotAnObject));
    }

    #[test]
    fn test_schema_invalid_annotation() {
        let err = TableMetadata::from_str(r#"{"clientip": "ip"}"#).unwrap_err();
        match err {
            SchemaError::InvalidAnnotation { field, .. } => assert_eq!(field, "clientip"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_schema_annotation_defaults() {
        let metadata = TableMetadata::from_str(r#"{"useragent": {}}"#).unwrap();
        let annotation = metadata.annotation(&Field::new("useragent")).unwrap();
        assert!(annotation.tags.is_empty());
        assert!(annotation.dim.is_none());
    }
}
