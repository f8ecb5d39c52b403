//! Uniform entry point over every extractor kind
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use super::model_data::extract_keyword_data;
use super::types::{Extractor, ExtractorInput};
use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::value::PropertyValue;

impl Extractor {
    /// Run the extractor over its raw input
    ///
    /// The input kind must match the extractor kind: fields for field
    /// extractors, a component for component extractors, the nested
    /// presentations for the presentation filter and the model data for the
    /// keyword passthrough. Anything else is a wiring error.
    pub fn extract(
        &self,
        input: ExtractorInput<'_>,
        ctx: &ExtractionContext<'_>,
    ) -> Result<Vec<PropertyValue>> {
        match (self, input) {
            (Extractor::Field(binding), ExtractorInput::Field(field)) => {
                binding.kind.extract(field, ctx)
            }
            (Extractor::Component(extractor), ExtractorInput::Component(component)) => {
                Ok(extractor.extract(component))
            }
            (Extractor::Presentations(filter), ExtractorInput::Presentations(presentations)) => {
                filter.extract(presentations, ctx)
            }
            (Extractor::KeywordData, ExtractorInput::ModelData(data)) => {
                Ok(extract_keyword_data(data))
            }
            (extractor, input) => Err(Error::configuration(
                format!(
                    "{} extractor cannot consume {} input",
                    extractor.name(),
                    input.name()
                ),
                Some(ctx.property.name()),
            )),
        }
    }
}
