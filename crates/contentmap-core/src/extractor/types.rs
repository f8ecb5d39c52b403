//! Core types for the extractor registry
//!
//! This module defines the closed set of extractors a model property can be
//! bound to, the input each of them consumes, and the return type each of
//! them declares.
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use crate::types::{Component, ComponentPresentation, Field, ModelData};
use crate::value::{ExpectedType, ValueKind};
use serde::{Deserialize, Serialize};

/// Where the orchestrator looks up a bound field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldSource {
    /// The component's content fields
    #[default]
    Content,
    /// The component's metadata fields
    Metadata,
    /// The template's metadata
    TemplateMetadata,
}

/// Conversion policy for a single content field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldExtractor {
    /// Text values, optionally parsed into booleans
    Text { boolean: bool },
    /// Rich text rendered into safe markup
    RichText,
    /// Numbers, parsing text with a `0.0` fallback
    Number,
    /// Date-times, parsing text strictly
    Date,
    /// The key of each keyword, optionally parsed into booleans
    KeywordKey { boolean: bool },
    /// The key of each keyword parsed into a number, `0.0` when unparsable
    NumericKeywordKey,
    /// The keywords themselves
    Keyword,
    /// Values parsed into the property's enum; unparsable values are dropped
    Enum,
    /// Native multimedia record of each linked component
    Multimedia,
    /// Resolved URL of each linked component
    ResolvedUrl,
    /// A nested view model for each linked component
    LinkedComponent { complex_type: Option<String> },
}

impl FieldExtractor {
    pub fn name(&self) -> &'static str {
        match self {
            FieldExtractor::Text { .. } => "text",
            FieldExtractor::RichText => "rich text",
            FieldExtractor::Number => "number",
            FieldExtractor::Date => "date",
            FieldExtractor::KeywordKey { .. } => "keyword key",
            FieldExtractor::NumericKeywordKey => "numeric keyword key",
            FieldExtractor::Keyword => "keyword",
            FieldExtractor::Enum => "enum",
            FieldExtractor::Multimedia => "multimedia field",
            FieldExtractor::ResolvedUrl => "resolved url",
            FieldExtractor::LinkedComponent { .. } => "linked component",
        }
    }

    /// Element type of the produced values
    pub fn element_kind(&self) -> ValueKind {
        match self {
            FieldExtractor::Text { boolean: true } | FieldExtractor::KeywordKey { boolean: true } => {
                ValueKind::Boolean
            }
            FieldExtractor::Text { boolean: false }
            | FieldExtractor::KeywordKey { boolean: false }
            | FieldExtractor::ResolvedUrl => ValueKind::Text,
            FieldExtractor::RichText => ValueKind::Markup,
            FieldExtractor::Number | FieldExtractor::NumericKeywordKey => ValueKind::Number,
            FieldExtractor::Date => ValueKind::Date,
            FieldExtractor::Keyword => ValueKind::Keyword,
            FieldExtractor::Enum => ValueKind::Enum,
            FieldExtractor::Multimedia => ValueKind::NativeMultimedia,
            FieldExtractor::LinkedComponent { .. } => ValueKind::ViewModel,
        }
    }

    pub fn expected_type(&self, multiple: bool) -> ExpectedType {
        ExpectedType {
            kind: self.element_kind(),
            multiple,
        }
    }
}

/// A field extractor bound to a named field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub field_name: String,
    pub source: FieldSource,
    pub kind: FieldExtractor,
}

impl FieldBinding {
    pub fn new(field_name: impl Into<String>, kind: FieldExtractor) -> Self {
        Self {
            field_name: field_name.into(),
            source: FieldSource::Content,
            kind,
        }
    }

    pub fn from_source(mut self, source: FieldSource) -> Self {
        self.source = source;
        self
    }
}

/// Policies reading attributes of the whole component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentExtractor {
    /// Component title
    Title,
    /// URL of the multimedia payload
    MultimediaUrl,
    /// The multimedia payload; always yields exactly one (possibly null) value
    Multimedia,
    /// The payload's underlying native record
    NativeMultimedia,
}

impl ComponentExtractor {
    pub fn name(&self) -> &'static str {
        match self {
            ComponentExtractor::Title => "component title",
            ComponentExtractor::MultimediaUrl => "multimedia url",
            ComponentExtractor::Multimedia => "multimedia",
            ComponentExtractor::NativeMultimedia => "native multimedia",
        }
    }

    pub fn element_kind(&self) -> ValueKind {
        match self {
            ComponentExtractor::Title | ComponentExtractor::MultimediaUrl => ValueKind::Text,
            ComponentExtractor::Multimedia => ValueKind::Multimedia,
            ComponentExtractor::NativeMultimedia => ValueKind::NativeMultimedia,
        }
    }

    pub fn expected_type(&self) -> ExpectedType {
        ExpectedType::single(self.element_kind())
    }
}

/// Nested presentations whose template `view` starts with a prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationsByView {
    view_prefix: String,
    complex_type: Option<String>,
}

impl PresentationsByView {
    pub fn new(view_prefix: impl Into<String>) -> Self {
        Self {
            view_prefix: view_prefix.into(),
            complex_type: None,
        }
    }

    /// Build every selected presentation as the named model type
    pub fn mapped_to(mut self, type_name: impl Into<String>) -> Self {
        self.complex_type = Some(type_name.into());
        self
    }

    pub fn view_prefix(&self) -> &str {
        &self.view_prefix
    }

    pub fn complex_type(&self) -> Option<&str> {
        self.complex_type.as_deref()
    }

    pub fn expected_type(&self) -> ExpectedType {
        ExpectedType::list(ValueKind::ViewModel)
    }
}

/// The extractor attached to a model property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extractor {
    Field(FieldBinding),
    Component(ComponentExtractor),
    Presentations(PresentationsByView),
    /// Exposes keyword model data directly
    KeywordData,
}

impl Extractor {
    pub fn name(&self) -> &'static str {
        match self {
            Extractor::Field(binding) => binding.kind.name(),
            Extractor::Component(extractor) => extractor.name(),
            Extractor::Presentations(_) => "presentations by view",
            Extractor::KeywordData => "keyword data",
        }
    }

    /// Declared return type for a property with the given cardinality
    ///
    /// Component, presentation and keyword-data extractors have a fixed
    /// cardinality and ignore `multiple`.
    pub fn expected_type(&self, multiple: bool) -> ExpectedType {
        match self {
            Extractor::Field(binding) => binding.kind.expected_type(multiple),
            Extractor::Component(extractor) => extractor.expected_type(),
            Extractor::Presentations(filter) => filter.expected_type(),
            Extractor::KeywordData => ExpectedType::single(ValueKind::Keyword),
        }
    }

    /// Cardinality imposed by the extractor, if it has one
    pub fn fixed_cardinality(&self) -> Option<bool> {
        match self {
            Extractor::Field(_) => None,
            Extractor::Component(_) | Extractor::KeywordData => Some(false),
            Extractor::Presentations(_) => Some(true),
        }
    }
}

/// Raw input handed to an extractor
#[derive(Debug, Clone, Copy)]
pub enum ExtractorInput<'a> {
    Field(&'a Field),
    Component(Option<&'a Component>),
    Presentations(&'a [ComponentPresentation]),
    ModelData(Option<&'a ModelData>),
}

impl ExtractorInput<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ExtractorInput::Field(_) => "field",
            ExtractorInput::Component(_) => "component",
            ExtractorInput::Presentations(_) => "presentations",
            ExtractorInput::ModelData(_) => "model data",
        }
    }
}
