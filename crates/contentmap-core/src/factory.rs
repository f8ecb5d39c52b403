//! Reference model-build orchestrator
//!
//! [`DefaultViewModelFactory`] walks the properties of a registered
//! [`ModelType`], hands each extractor its raw input, validates the output
//! against the declared property type and applies the shared cardinality
//! step. It also owns the recursion guard for nested models, since neither
//! the extractors nor the content graph protect against cycles.

use crate::collab::{RichTextRenderer, UrlResolver, ViewModel, ViewModelFactory};
use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::extractor::{apply_cardinality, Extractor, ExtractorInput, FieldBinding, FieldSource};
use crate::registry::{ModelProperty, ModelRegistry, ModelType};
use crate::types::{ComponentPresentation, Field, Keyword, ModelData};
use crate::value::{PropertyBinding, PropertyValue};
use serde::Deserialize;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Factory configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Deepest nesting level a model may be built at
    pub max_depth: usize,

    /// Check every extracted value against the declared property type
    pub strict_types: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            strict_types: true,
        }
    }
}

/// A view model built from a registered model type
#[derive(Debug, Clone)]
pub struct DynamicViewModel {
    model_type: String,
    data: ModelData,
    properties: BTreeMap<String, PropertyBinding>,
}

impl DynamicViewModel {
    pub fn get(&self, property: &str) -> Option<&PropertyBinding> {
        self.properties.get(property)
    }

    /// The value of a single-valued property, or the first of a list
    pub fn single(&self, property: &str) -> Option<&PropertyValue> {
        self.get(property).and_then(PropertyBinding::first)
    }

    /// All values of a property; empty when unbound
    pub fn multiple(&self, property: &str) -> &[PropertyValue] {
        self.get(property).map(PropertyBinding::values).unwrap_or(&[])
    }

    pub fn properties(&self) -> &BTreeMap<String, PropertyBinding> {
        &self.properties
    }

    pub fn data(&self) -> &ModelData {
        &self.data
    }
}

impl ViewModel for DynamicViewModel {
    fn model_type(&self) -> &str {
        &self.model_type
    }

    fn model_data(&self) -> Option<&ModelData> {
        Some(&self.data)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`DynamicViewModel`]s from a [`ModelRegistry`]
pub struct DefaultViewModelFactory {
    registry: Arc<ModelRegistry>,
    renderer: Box<dyn RichTextRenderer + Send + Sync>,
    resolver: Box<dyn UrlResolver + Send + Sync>,
    config: FactoryConfig,
}

impl DefaultViewModelFactory {
    pub fn new(
        registry: Arc<ModelRegistry>,
        renderer: impl RichTextRenderer + Send + Sync + 'static,
        resolver: impl UrlResolver + Send + Sync + 'static,
    ) -> Self {
        Self {
            registry,
            renderer: Box::new(renderer),
            resolver: Box::new(resolver),
            config: FactoryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Build a top-level model for a presentation, resolving its type
    pub fn build(&self, presentation: &ComponentPresentation) -> Result<DynamicViewModel> {
        let model_type = self.registry.resolve_for(presentation)?;
        self.build_model(&model_type, ModelData::Presentation(presentation.clone()), 0)
    }

    /// Build a top-level model of a named type over any model data
    pub fn build_as(&self, data: ModelData, type_name: &str) -> Result<DynamicViewModel> {
        let model_type = self.registry.require(type_name)?;
        self.build_model(&model_type, data, 0)
    }

    /// Build a top-level model over a keyword
    pub fn build_keyword_model(&self, keyword: &Keyword, type_name: &str) -> Result<DynamicViewModel> {
        self.build_as(ModelData::Keyword(keyword.clone()), type_name)
    }

    fn build_model(
        &self,
        model_type: &ModelType,
        data: ModelData,
        depth: usize,
    ) -> Result<DynamicViewModel> {
        if depth > self.config.max_depth {
            return Err(Error::RecursionLimit {
                depth,
                max_depth: self.config.max_depth,
            });
        }

        let span = tracing::debug_span!("build_view_model", model_type = %model_type.name(), depth);
        let _enter = span.enter();

        let mut properties = BTreeMap::new();
        for property in model_type.properties() {
            let binding = self.bind_property(property, &data, depth)?;
            tracing::trace!(
                property = property.name(),
                values = binding.values().len(),
                "bound property"
            );
            properties.insert(property.name().to_string(), binding);
        }

        tracing::debug!(properties = properties.len(), "built view model");

        Ok(DynamicViewModel {
            model_type: model_type.name().to_string(),
            data,
            properties,
        })
    }

    fn bind_property(
        &self,
        property: &ModelProperty,
        data: &ModelData,
        depth: usize,
    ) -> Result<PropertyBinding> {
        let component = data.component();
        let input = match property.extractor() {
            Extractor::Field(binding) => match locate_field(binding, data) {
                Some(field) => ExtractorInput::Field(field),
                None => {
                    log::debug!(
                        "Field '{}' not present for property '{}'",
                        binding.field_name,
                        property.name()
                    );
                    return Ok(apply_cardinality(Vec::new(), property.multiple()));
                }
            },
            Extractor::Component(_) => ExtractorInput::Component(component),
            Extractor::Presentations(_) => ExtractorInput::Presentations(
                component.map(|c| c.presentations.as_slice()).unwrap_or(&[]),
            ),
            Extractor::KeywordData => ExtractorInput::ModelData(Some(data)),
        };

        let ctx = ExtractionContext::new(
            property,
            self,
            self.renderer.as_ref(),
            self.resolver.as_ref(),
        )
        .with_template(data.template())
        .with_model_data(Some(data))
        .at_depth(depth);

        let values = property.extractor().extract(input, &ctx)?;

        if self.config.strict_types {
            if let Some(value) = values.iter().find(|v| v.kind() != property.declared()) {
                return Err(Error::TypeMismatch {
                    property: property.name().to_string(),
                    expected: property.declared(),
                    found: value.kind(),
                });
            }
        }

        Ok(apply_cardinality(values, property.multiple()))
    }
}

fn locate_field<'d>(binding: &FieldBinding, data: &'d ModelData) -> Option<&'d Field> {
    match binding.source {
        FieldSource::Content => data.component()?.fields.get(&binding.field_name),
        FieldSource::Metadata => data.component()?.metadata_fields.get(&binding.field_name),
        FieldSource::TemplateMetadata => data.template()?.metadata.get(&binding.field_name),
    }
}

impl ViewModelFactory for DefaultViewModelFactory {
    fn build_view_model(
        &self,
        presentation: &ComponentPresentation,
        depth: usize,
    ) -> Result<Arc<dyn ViewModel>> {
        let model_type = self.registry.resolve_for(presentation)?;
        let model = self.build_model(
            &model_type,
            ModelData::Presentation(presentation.clone()),
            depth,
        )?;
        Ok(Arc::new(model))
    }

    fn build_mapped_model(
        &self,
        presentation: &ComponentPresentation,
        type_name: &str,
        depth: usize,
    ) -> Result<Arc<dyn ViewModel>> {
        let model_type = self.registry.require(type_name)?;
        let model = self.build_model(
            &model_type,
            ModelData::Presentation(presentation.clone()),
            depth,
        )?;
        Ok(Arc::new(model))
    }
}

impl std::fmt::Debug for DefaultViewModelFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultViewModelFactory")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
