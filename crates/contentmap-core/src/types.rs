//! Core types and data structures for content coming out of the CMS
//!
//! These are transient, read-only views over the content repository: a
//! [`Component`] with its [`FieldSet`]s, the [`Template`] it is presented
//! with, [`Keyword`]s and multimedia payloads. The mapping layer never
//! mutates them.

use crate::error::RawKind;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Template metadata key carrying the view name
pub const VIEW_METADATA_KEY: &str = "view";

/// Template metadata key carrying an explicit view model key
pub const VIEW_MODEL_KEY_METADATA_KEY: &str = "viewModelKey";

/// A single raw value held by a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RawValue {
    Text(String),
    Number(f64),
    Date(DateTime<FixedOffset>),
    Keyword(Keyword),
    Component(Box<Component>),
}

impl RawValue {
    /// Variant tag for diagnostics
    pub fn kind(&self) -> RawKind {
        match self {
            RawValue::Text(_) => RawKind::Text,
            RawValue::Number(_) => RawKind::Number,
            RawValue::Date(_) => RawKind::Date,
            RawValue::Keyword(_) => RawKind::Keyword,
            RawValue::Component(_) => RawKind::Component,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<Keyword> for RawValue {
    fn from(value: Keyword) -> Self {
        RawValue::Keyword(value)
    }
}

impl From<Component> for RawValue {
    fn from(value: Component) -> Self {
        RawValue::Component(Box::new(value))
    }
}

/// A named, possibly multi-valued unit of structured content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Field {
    /// Schema field name
    pub name: String,

    /// Raw values in content order
    #[serde(default)]
    pub values: Vec<RawValue>,

    /// Experience-manager tag, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xpm_tag: Option<String>,
}

impl Field {
    /// Create a field from a name and its raw values
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            xpm_tag: None,
        }
    }

    /// First text value, if the first value is text
    pub fn first_text(&self) -> Option<&str> {
        self.values.first().and_then(RawValue::as_text)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Fields of a component or template, looked up by name
///
/// Serialized as a map from field name to field. Deserialization rejects
/// entries whose key differs from the field's own `name`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct FieldSet(BTreeMap<String, Field>);

impl<'de> Deserialize<'de> for FieldSet {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = BTreeMap::<String, Field>::deserialize(deserializer)?;
        if let Some((key, field)) = entries.iter().find(|(key, field)| **key != field.name) {
            return Err(serde::de::Error::custom(format!(
                "field keyed as '{}' is named '{}'",
                key, field.name
            )));
        }
        Ok(FieldSet(entries))
    }
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field, replacing any field with the same name
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        self.0.insert(field.name.clone(), field)
    }

    /// Builder-style insert
    pub fn with(mut self, field: Field) -> Self {
        self.insert(field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<T: IntoIterator<Item = Field>>(iter: T) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

/// A controlled-vocabulary reference value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Keyword {
    pub id: String,
    pub key: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "FieldSet::is_empty")]
    pub metadata: FieldSet,
}

impl Keyword {
    pub fn new(id: impl Into<String>, key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
            title: title.into(),
            description: None,
            metadata: FieldSet::new(),
        }
    }
}

/// The CMS's own multimedia record, as delivered by the content source
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NativeMultimedia {
    pub url: String,
    pub mime_type: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// Structured multimedia payload of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultimediaData {
    /// Binary URL of the asset
    pub url: String,

    /// Underlying native representation
    pub native: NativeMultimedia,
}

impl MultimediaData {
    /// Wrap a native record, taking the URL from it
    pub fn from_native(native: NativeMultimedia) -> Self {
        Self {
            url: native.url.clone(),
            native,
        }
    }
}

/// A content item
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Component {
    pub id: String,
    pub title: String,

    /// Title of the schema the component was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multimedia: Option<MultimediaData>,

    #[serde(default)]
    pub fields: FieldSet,

    #[serde(default)]
    pub metadata_fields: FieldSet,

    /// Nested presentations, in content order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub presentations: Vec<ComponentPresentation>,
}

impl Component {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.insert(field);
        self
    }

    pub fn with_metadata_field(mut self, field: Field) -> Self {
        self.metadata_fields.insert(field);
        self
    }

    pub fn with_multimedia(mut self, multimedia: MultimediaData) -> Self {
        self.multimedia = Some(multimedia);
        self
    }

    pub fn with_presentation(mut self, presentation: ComponentPresentation) -> Self {
        self.presentations.push(presentation);
        self
    }
}

/// A rendering template
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub metadata: FieldSet,
}

impl Template {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            metadata: FieldSet::new(),
        }
    }

    /// Template tagged with a `view` metadata entry
    pub fn with_view(id: impl Into<String>, view: impl Into<String>) -> Self {
        let view = view.into();
        let mut template = Self::new(id, view.clone());
        template
            .metadata
            .insert(Field::new(VIEW_METADATA_KEY, [view]));
        template
    }

    pub fn with_metadata(mut self, field: Field) -> Self {
        self.metadata.insert(field);
        self
    }

    /// First text value of the `view` metadata entry
    pub fn view(&self) -> Option<&str> {
        self.metadata
            .get(VIEW_METADATA_KEY)
            .and_then(Field::first_text)
    }

    /// First text value of the `viewModelKey` metadata entry
    pub fn view_model_key(&self) -> Option<&str> {
        self.metadata
            .get(VIEW_MODEL_KEY_METADATA_KEY)
            .and_then(Field::first_text)
    }
}

/// A content item paired with the template it is rendered with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentPresentation {
    pub component: Component,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
}

impl ComponentPresentation {
    pub fn new(component: Component, template: Template) -> Self {
        Self {
            component,
            template: Some(template),
        }
    }

    /// Presentation without a template, e.g. for a linked component
    pub fn untemplated(component: Component) -> Self {
        Self {
            component,
            template: None,
        }
    }
}

/// The content a view model is built over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelData {
    Component(Component),
    Presentation(ComponentPresentation),
    Keyword(Keyword),
}

impl ModelData {
    /// The component behind this data, if any
    pub fn component(&self) -> Option<&Component> {
        match self {
            ModelData::Component(component) => Some(component),
            ModelData::Presentation(cp) => Some(&cp.component),
            ModelData::Keyword(_) => None,
        }
    }

    pub fn template(&self) -> Option<&Template> {
        match self {
            ModelData::Presentation(cp) => cp.template.as_ref(),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            ModelData::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_view() {
        let template = Template::with_view("tcm:1-2-32", "listItem");
        assert_eq!(template.view(), Some("listItem"));
        assert_eq!(template.view_model_key(), None);
    }

    #[test]
    fn test_template_view_requires_text() {
        let template =
            Template::new("tcm:1-3-32", "odd").with_metadata(Field::new(VIEW_METADATA_KEY, [4.0]));
        assert_eq!(template.view(), None);
    }

    #[test]
    fn test_raw_value_json_shape() {
        let value: RawValue = serde_json::from_str(r#"{"type":"text","value":"hello"}"#).unwrap();
        assert_eq!(value, RawValue::Text("hello".to_string()));

        let value: RawValue = serde_json::from_str(r#"{"type":"number","value":2.5}"#).unwrap();
        assert_eq!(value.kind(), RawKind::Number);
    }

    #[test]
    fn test_field_set_replaces_by_name() {
        let mut set = FieldSet::new();
        set.insert(Field::new("title", ["a"]));
        set.insert(Field::new("title", ["b"]));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("title").and_then(Field::first_text), Some("b"));
    }

    #[test]
    fn test_field_set_from_json_keys_by_name() {
        let fields: FieldSet = serde_json::from_str(
            r#"{"title": {"name": "title", "values": [{"type": "text", "value": "Hello"}]}}"#,
        )
        .unwrap();
        assert_eq!(fields.get("title").and_then(Field::first_text), Some("Hello"));

        let err = serde_json::from_str::<FieldSet>(
            r#"{"heading": {"name": "title", "values": [{"type": "text", "value": "Hello"}]}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("field keyed as 'heading' is named 'title'"));
    }

    #[test]
    fn test_model_data_component() {
        let component = Component::new("tcm:1-10", "Hello");
        let data = ModelData::Presentation(ComponentPresentation::untemplated(component.clone()));
        assert_eq!(data.component(), Some(&component));
        assert!(data.template().is_none());
        assert!(ModelData::Keyword(Keyword::default()).component().is_none());
    }
}
