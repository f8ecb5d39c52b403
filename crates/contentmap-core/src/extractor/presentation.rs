//! Component presentation filter
//!
//! Selects nested presentations by the `view` metadata of their template and
//! builds a view model for each selected entry through the orchestrator.
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use super::types::PresentationsByView;
use crate::context::ExtractionContext;
use crate::error::Result;
use crate::types::ComponentPresentation;
use crate::value::PropertyValue;

impl PresentationsByView {
    /// Whether the presentation's template view starts with the prefix
    ///
    /// Presentations without a template, without metadata or without a
    /// textual `view` entry never match.
    pub fn matches(&self, presentation: &ComponentPresentation) -> bool {
        presentation
            .template
            .as_ref()
            .and_then(|template| template.view())
            .is_some_and(|view| view.starts_with(self.view_prefix()))
    }

    /// Build a view model for every matching presentation, in order
    pub fn extract(
        &self,
        presentations: &[ComponentPresentation],
        ctx: &ExtractionContext<'_>,
    ) -> Result<Vec<PropertyValue>> {
        let mut models = Vec::new();

        for presentation in presentations {
            if !self.matches(presentation) {
                log::debug!(
                    "Skipping presentation of {}: view does not start with '{}'",
                    presentation.component.id,
                    self.view_prefix()
                );
                continue;
            }

            let model = match self.complex_type() {
                Some(type_name) => {
                    ctx.factory
                        .build_mapped_model(presentation, type_name, ctx.nested_depth())?
                }
                None => ctx
                    .factory
                    .build_view_model(presentation, ctx.nested_depth())?,
            };
            models.push(PropertyValue::Model(model));
        }

        Ok(models)
    }
}
