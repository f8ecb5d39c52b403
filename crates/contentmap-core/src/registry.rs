//! Model type registration
//!
//! Properties are bound to their extractor once, when the model type is
//! registered. Registration is also where the declared property type is
//! checked against the type the extractor produces, so a model whose
//! properties are wired to the wrong extractor never gets built.
//!
//! Model types can be registered in code through [`ModelTypeBuilder`] or
//! loaded from JSON definitions:
//!
//! ```
//! use contentmap_core::registry::ModelRegistry;
//!
//! let registry = ModelRegistry::from_json(r#"[
//!     {
//!         "name": "Teaser",
//!         "properties": [
//!             { "name": "heading", "extractor": "text", "field": "heading" },
//!             { "name": "title", "extractor": "title" }
//!         ]
//!     }
//! ]"#).unwrap();
//!
//! assert!(registry.get("Teaser").is_some());
//! ```

use crate::error::{Error, Result};
use crate::extractor::{
    ComponentExtractor, Extractor, FieldBinding, FieldExtractor, FieldSource, PresentationsByView,
};
use crate::types::ComponentPresentation;
use crate::value::{EnumType, ExpectedType, ValueKind};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A property of a view model and its binding rule
#[derive(Debug, Clone, PartialEq)]
pub struct ModelProperty {
    name: String,
    extractor: Extractor,
    multiple: bool,
    declared: ValueKind,
    enum_type: Option<EnumType>,
}

impl ModelProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    /// Whether the property holds a list of values
    pub fn multiple(&self) -> bool {
        self.multiple
    }

    /// Declared element type
    pub fn declared(&self) -> ValueKind {
        self.declared
    }

    pub fn enum_type(&self) -> Option<&EnumType> {
        self.enum_type.as_ref()
    }

    pub fn expected_type(&self) -> ExpectedType {
        ExpectedType {
            kind: self.declared,
            multiple: self.multiple,
        }
    }
}

/// Builder for model properties
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    extractor: Option<Extractor>,
    multiple: Option<bool>,
    declared: Option<ValueKind>,
    enum_type: Option<EnumType>,
}

impl PropertyBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extractor: None,
            multiple: None,
            declared: None,
            enum_type: None,
        }
    }

    pub fn extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Bind to a content field
    pub fn field(self, field_name: impl Into<String>, kind: FieldExtractor) -> Self {
        self.extractor(Extractor::Field(FieldBinding::new(field_name, kind)))
    }

    /// Bind to a component metadata field
    pub fn metadata_field(self, field_name: impl Into<String>, kind: FieldExtractor) -> Self {
        self.extractor(Extractor::Field(
            FieldBinding::new(field_name, kind).from_source(FieldSource::Metadata),
        ))
    }

    /// Bind to a template metadata field
    pub fn template_metadata_field(
        self,
        field_name: impl Into<String>,
        kind: FieldExtractor,
    ) -> Self {
        self.extractor(Extractor::Field(
            FieldBinding::new(field_name, kind).from_source(FieldSource::TemplateMetadata),
        ))
    }

    pub fn component(self, extractor: ComponentExtractor) -> Self {
        self.extractor(Extractor::Component(extractor))
    }

    pub fn presentations(self, filter: PresentationsByView) -> Self {
        self.extractor(Extractor::Presentations(filter))
    }

    pub fn keyword_data(self) -> Self {
        self.extractor(Extractor::KeywordData)
    }

    /// The property holds a list of values
    pub fn multiple(mut self) -> Self {
        self.multiple = Some(true);
        self
    }

    /// The property holds at most one value
    pub fn single(mut self) -> Self {
        self.multiple = Some(false);
        self
    }

    /// Declare the element type explicitly
    pub fn declared(mut self, kind: ValueKind) -> Self {
        self.declared = Some(kind);
        self
    }

    pub fn enum_type(mut self, enum_type: EnumType) -> Self {
        self.enum_type = Some(enum_type);
        self
    }

    /// Build the property, checking it against its extractor
    pub fn build(self) -> Result<ModelProperty> {
        let name = self.name;
        let extractor = self.extractor.ok_or_else(|| {
            Error::configuration("Property has no extractor", Some(name.as_str()))
        })?;

        let multiple = match (extractor.fixed_cardinality(), self.multiple) {
            (Some(fixed), Some(requested)) if fixed != requested => {
                return Err(Error::configuration(
                    format!(
                        "{} extractor produces {}, property asks for {}",
                        extractor.name(),
                        cardinality_name(fixed),
                        cardinality_name(requested)
                    ),
                    Some(name.as_str()),
                ));
            }
            (Some(fixed), _) => fixed,
            (None, requested) => requested.unwrap_or(false),
        };

        let expected = extractor.expected_type(multiple);
        let declared = self.declared.unwrap_or(expected.kind);
        if declared != expected.kind {
            return Err(Error::configuration(
                format!(
                    "{} extractor produces {}, property is declared as {}",
                    extractor.name(),
                    expected,
                    ExpectedType { kind: declared, multiple }
                ),
                Some(name.as_str()),
            ));
        }

        let is_enum = matches!(
            &extractor,
            Extractor::Field(FieldBinding { kind: FieldExtractor::Enum, .. })
        );
        match (is_enum, &self.enum_type) {
            (true, None) => {
                return Err(Error::configuration(
                    "Enum extractor requires an enum type",
                    Some(name.as_str()),
                ));
            }
            (false, Some(enum_type)) => {
                return Err(Error::configuration(
                    format!(
                        "Enum type {} given for a {} extractor",
                        enum_type.name,
                        extractor.name()
                    ),
                    Some(name.as_str()),
                ));
            }
            _ => {}
        }

        Ok(ModelProperty {
            name,
            extractor,
            multiple,
            declared,
            enum_type: self.enum_type,
        })
    }
}

fn cardinality_name(multiple: bool) -> &'static str {
    if multiple {
        "multiple values"
    } else {
        "a single value"
    }
}

/// A registered view model type
#[derive(Debug, Clone, PartialEq)]
pub struct ModelType {
    name: String,
    properties: Vec<ModelProperty>,
}

impl ModelType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn properties(&self) -> &[ModelProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Builder for model types
#[derive(Debug, Clone)]
pub struct ModelTypeBuilder {
    name: String,
    properties: Vec<PropertyBuilder>,
}

impl ModelTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property);
        self
    }

    pub fn build(self) -> Result<ModelType> {
        let mut properties: Vec<ModelProperty> = Vec::with_capacity(self.properties.len());
        for builder in self.properties {
            let property = builder.build()?;
            if properties.iter().any(|p| p.name == property.name) {
                return Err(Error::configuration(
                    format!("Duplicate property in model type {}", self.name),
                    Some(property.name.as_str()),
                ));
            }
            properties.push(property);
        }

        Ok(ModelType {
            name: self.name,
            properties,
        })
    }
}

/// Registered model types, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    types: HashMap<String, Arc<ModelType>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, model_type: ModelType) -> Result<()> {
        if self.types.contains_key(model_type.name()) {
            return Err(Error::configuration(
                format!("Model type {} is already registered", model_type.name()),
                None,
            ));
        }
        log::debug!(
            "Registered model type {} with {} properties",
            model_type.name(),
            model_type.properties().len()
        );
        self.types
            .insert(model_type.name().to_string(), Arc::new(model_type));
        Ok(())
    }

    /// Builder-style registration
    pub fn with(mut self, model_type: ModelType) -> Result<Self> {
        self.register(model_type)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<Arc<ModelType>> {
        self.types.get(name).cloned()
    }

    /// Look up a type by name, failing when it is not registered
    pub fn require(&self, name: &str) -> Result<Arc<ModelType>> {
        self.get(name).ok_or_else(|| Error::UnknownModelType {
            key: name.to_string(),
        })
    }

    /// Resolve the model type for a presentation
    ///
    /// The template's `viewModelKey` metadata wins; otherwise the component's
    /// schema title is used.
    pub fn resolve_for(&self, presentation: &ComponentPresentation) -> Result<Arc<ModelType>> {
        let key = presentation
            .template
            .as_ref()
            .and_then(|t| t.view_model_key())
            .or(presentation.component.schema.as_deref())
            .ok_or_else(|| Error::UnknownModelType {
                key: format!("(no view model key for {})", presentation.component.id),
            })?;
        self.require(key)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Register every definition in order
    pub fn from_definitions<I>(definitions: I) -> Result<Self>
    where
        I: IntoIterator<Item = ModelDefinition>,
    {
        let mut registry = Self::new();
        for definition in definitions {
            registry.register(definition.into_model_type()?)?;
        }
        Ok(registry)
    }

    /// Load definitions from a JSON array
    pub fn from_json(json: &str) -> Result<Self> {
        let definitions: Vec<ModelDefinition> = serde_json::from_str(json)?;
        Self::from_definitions(definitions)
    }

    /// Load definitions from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }
}

/// Declarative definition of a model type
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,
}

impl ModelDefinition {
    pub fn into_model_type(self) -> Result<ModelType> {
        let mut builder = ModelTypeBuilder::new(self.name);
        for property in self.properties {
            builder = builder.property(property.into_builder()?);
        }
        builder.build()
    }
}

/// Extractor names accepted in definitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorName {
    Text,
    RichText,
    Number,
    Date,
    KeywordKey,
    NumericKeywordKey,
    Keyword,
    Enum,
    MultimediaField,
    ResolvedUrl,
    LinkedComponent,
    Title,
    MultimediaUrl,
    Multimedia,
    NativeMultimedia,
    PresentationsByView,
    KeywordData,
}

/// Declarative definition of one property
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub extractor: ExtractorName,

    /// Field name, required by field extractors
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub source: FieldSource,

    /// Parse text or keyword keys into booleans
    #[serde(default)]
    pub boolean: bool,

    /// Required by `presentations_by_view`
    #[serde(default)]
    pub view_prefix: Option<String>,

    /// Explicit model type for nested models
    #[serde(default)]
    pub complex_type: Option<String>,

    #[serde(default)]
    pub multiple: Option<bool>,

    #[serde(default)]
    pub declared: Option<ValueKind>,

    #[serde(default)]
    pub enum_type: Option<EnumType>,
}

impl PropertyDefinition {
    pub fn into_builder(self) -> Result<PropertyBuilder> {
        let extractor = self.extractor()?;
        let mut builder = PropertyBuilder::new(self.name).extractor(extractor);
        if let Some(multiple) = self.multiple {
            builder = if multiple { builder.multiple() } else { builder.single() };
        }
        if let Some(declared) = self.declared {
            builder = builder.declared(declared);
        }
        if let Some(enum_type) = self.enum_type {
            builder = builder.enum_type(enum_type);
        }
        Ok(builder)
    }

    fn extractor(&self) -> Result<Extractor> {
        let extractor = match self.extractor {
            ExtractorName::Text => self.bind_field(FieldExtractor::Text { boolean: self.boolean })?,
            ExtractorName::RichText => self.bind_field(FieldExtractor::RichText)?,
            ExtractorName::Number => self.bind_field(FieldExtractor::Number)?,
            ExtractorName::Date => self.bind_field(FieldExtractor::Date)?,
            ExtractorName::KeywordKey => {
                self.bind_field(FieldExtractor::KeywordKey { boolean: self.boolean })?
            }
            ExtractorName::NumericKeywordKey => self.bind_field(FieldExtractor::NumericKeywordKey)?,
            ExtractorName::Keyword => self.bind_field(FieldExtractor::Keyword)?,
            ExtractorName::Enum => self.bind_field(FieldExtractor::Enum)?,
            ExtractorName::MultimediaField => self.bind_field(FieldExtractor::Multimedia)?,
            ExtractorName::ResolvedUrl => self.bind_field(FieldExtractor::ResolvedUrl)?,
            ExtractorName::LinkedComponent => self.bind_field(FieldExtractor::LinkedComponent {
                complex_type: self.complex_type.clone(),
            })?,
            ExtractorName::Title => Extractor::Component(ComponentExtractor::Title),
            ExtractorName::MultimediaUrl => Extractor::Component(ComponentExtractor::MultimediaUrl),
            ExtractorName::Multimedia => Extractor::Component(ComponentExtractor::Multimedia),
            ExtractorName::NativeMultimedia => {
                Extractor::Component(ComponentExtractor::NativeMultimedia)
            }
            ExtractorName::PresentationsByView => {
                let prefix = self.view_prefix.clone().ok_or_else(|| {
                    Error::configuration(
                        "presentations_by_view requires a view prefix",
                        Some(self.name.as_str()),
                    )
                })?;
                let filter = PresentationsByView::new(prefix);
                Extractor::Presentations(match &self.complex_type {
                    Some(type_name) => filter.mapped_to(type_name.clone()),
                    None => filter,
                })
            }
            ExtractorName::KeywordData => Extractor::KeywordData,
        };
        Ok(extractor)
    }

    fn bind_field(&self, kind: FieldExtractor) -> Result<Extractor> {
        let field_name = self.field.clone().ok_or_else(|| {
            Error::configuration("Field extractor requires a field name", Some(self.name.as_str()))
        })?;
        Ok(Extractor::Field(
            FieldBinding::new(field_name, kind).from_source(self.source),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Component, Field, Template, VIEW_MODEL_KEY_METADATA_KEY};

    #[test]
    fn test_property_defaults_to_extractor_kind() {
        let property = PropertyBuilder::new("flag")
            .field("flag", FieldExtractor::Text { boolean: true })
            .build()
            .unwrap();
        assert_eq!(property.declared(), ValueKind::Boolean);
        assert!(!property.multiple());
    }

    #[test]
    fn test_declared_mismatch_is_rejected() {
        let err = PropertyBuilder::new("count")
            .field("count", FieldExtractor::Text { boolean: false })
            .declared(ValueKind::Number)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration { property: Some(ref p), .. } if p == "count"));
    }

    #[test]
    fn test_missing_extractor_is_rejected() {
        assert!(PropertyBuilder::new("nothing").build().is_err());
    }

    #[test]
    fn test_fixed_cardinality() {
        let title = PropertyBuilder::new("title")
            .component(ComponentExtractor::Title)
            .build()
            .unwrap();
        assert!(!title.multiple());

        let err = PropertyBuilder::new("titles")
            .component(ComponentExtractor::Title)
            .multiple()
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("a single value"));

        let items = PropertyBuilder::new("items")
            .presentations(PresentationsByView::new("list"))
            .build()
            .unwrap();
        assert!(items.multiple());
        assert_eq!(items.declared(), ValueKind::ViewModel);

        assert!(PropertyBuilder::new("items")
            .presentations(PresentationsByView::new("list"))
            .single()
            .build()
            .is_err());
    }

    #[test]
    fn test_enum_type_requirements() {
        assert!(PropertyBuilder::new("size")
            .field("size", FieldExtractor::Enum)
            .build()
            .is_err());

        assert!(PropertyBuilder::new("size")
            .field("size", FieldExtractor::Number)
            .enum_type(EnumType::new("Size", ["Small", "Large"]))
            .build()
            .is_err());

        let property = PropertyBuilder::new("size")
            .field("size", FieldExtractor::Enum)
            .enum_type(EnumType::new("Size", ["Small", "Large"]))
            .multiple()
            .build()
            .unwrap();
        assert_eq!(property.expected_type(), ExpectedType::list(ValueKind::Enum));
    }

    #[test]
    fn test_duplicate_properties() {
        let result = ModelTypeBuilder::new("Article")
            .property(PropertyBuilder::new("title").component(ComponentExtractor::Title))
            .property(PropertyBuilder::new("title").component(ComponentExtractor::Title))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_duplicate_registration() {
        let model_type = ModelTypeBuilder::new("Article").build().unwrap();
        let mut registry = ModelRegistry::new();
        registry.register(model_type.clone()).unwrap();
        assert!(registry.register(model_type).is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_for_prefers_view_model_key() {
        let registry = ModelRegistry::new()
            .with(ModelTypeBuilder::new("Article").build().unwrap())
            .unwrap()
            .with(ModelTypeBuilder::new("ArticleTeaser").build().unwrap())
            .unwrap();

        let component = Component::new("tcm:1-1", "A").with_schema("Article");
        let plain = ComponentPresentation::untemplated(component.clone());
        assert_eq!(registry.resolve_for(&plain).unwrap().name(), "Article");

        let template = Template::new("tcm:1-2-32", "Teaser")
            .with_metadata(Field::new(VIEW_MODEL_KEY_METADATA_KEY, ["ArticleTeaser"]));
        let keyed = ComponentPresentation::new(component, template);
        assert_eq!(registry.resolve_for(&keyed).unwrap().name(), "ArticleTeaser");
    }

    #[test]
    fn test_resolve_for_without_key() {
        let registry = ModelRegistry::new();
        let presentation = ComponentPresentation::untemplated(Component::new("tcm:1-9", "X"));
        let err = registry.resolve_for(&presentation).unwrap_err();
        assert!(matches!(err, Error::UnknownModelType { .. }));
    }

    #[test]
    fn test_definition_requires_field_name() {
        let err = ModelRegistry::from_json(
            r#"[{"name": "Broken", "properties": [{"name": "x", "extractor": "number"}]}]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("requires a field name"));
    }

    #[test]
    fn test_definition_full() {
        let registry = ModelRegistry::from_json(
            r#"[{
                "name": "Listing",
                "properties": [
                    {"name": "visible", "extractor": "keyword_key", "field": "visible",
                     "source": "metadata", "boolean": true},
                    {"name": "items", "extractor": "presentations_by_view",
                     "view_prefix": "list", "complex_type": "ListItem"},
                    {"name": "tags", "extractor": "enum", "field": "tags", "multiple": true,
                     "enum_type": {"name": "Tag", "variants": [
                        {"name": "News", "discriminant": 0},
                        {"name": "Blog", "discriminant": 1}
                     ]}}
                ]
            }]"#,
        )
        .unwrap();

        let listing = registry.get("Listing").unwrap();
        let visible = listing.property("visible").unwrap();
        assert_eq!(visible.declared(), ValueKind::Boolean);
        assert!(matches!(
            visible.extractor(),
            Extractor::Field(FieldBinding { source: FieldSource::Metadata, .. })
        ));

        let items = listing.property("items").unwrap();
        match items.extractor() {
            Extractor::Presentations(filter) => {
                assert_eq!(filter.view_prefix(), "list");
                assert_eq!(filter.complex_type(), Some("ListItem"));
            }
            other => panic!("unexpected extractor {:?}", other),
        }

        let tags = listing.property("tags").unwrap();
        assert!(tags.multiple());
        assert_eq!(tags.enum_type().unwrap().variants.len(), 2);
    }
}
