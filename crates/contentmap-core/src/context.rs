//! Extraction context handed to every extractor invocation
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use crate::collab::{RichTextRenderer, UrlResolver, ViewModelFactory};
use crate::registry::ModelProperty;
use crate::types::{ModelData, Template};
use std::fmt;

/// Everything an extractor may consult besides its raw input
///
/// The context borrows the property being bound, the template and model
/// data of the model under construction, and the injected collaborators.
/// It holds no mutable state.
#[derive(Clone, Copy)]
pub struct ExtractionContext<'a> {
    /// Property being bound
    pub property: &'a ModelProperty,

    /// Template of the model under construction, if any
    pub template: Option<&'a Template>,

    /// Content the model is built over
    pub model_data: Option<&'a ModelData>,

    /// Orchestrator used for nested models
    pub factory: &'a dyn ViewModelFactory,

    pub renderer: &'a dyn RichTextRenderer,

    pub resolver: &'a dyn UrlResolver,

    /// Nesting level of the model under construction
    pub depth: usize,
}

impl<'a> ExtractionContext<'a> {
    /// Create a context for a top-level model
    pub fn new(
        property: &'a ModelProperty,
        factory: &'a dyn ViewModelFactory,
        renderer: &'a dyn RichTextRenderer,
        resolver: &'a dyn UrlResolver,
    ) -> Self {
        Self {
            property,
            template: None,
            model_data: None,
            factory,
            renderer,
            resolver,
            depth: 0,
        }
    }

    pub fn with_template(mut self, template: Option<&'a Template>) -> Self {
        self.template = template;
        self
    }

    pub fn with_model_data(mut self, model_data: Option<&'a ModelData>) -> Self {
        self.model_data = model_data;
        self
    }

    pub fn at_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Depth at which nested models built from this context live
    pub fn nested_depth(&self) -> usize {
        self.depth + 1
    }
}

impl fmt::Debug for ExtractionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionContext")
            .field("property", &self.property.name())
            .field("template", &self.template.map(|t| t.id.as_str()))
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}
