//! Extractors binding raw content to typed property values
//!
//! Every model property is bound to exactly one [`Extractor`], chosen when
//! the model type is registered. The orchestrator hands each extractor its
//! raw input through [`Extractor::extract`] and then applies the shared
//! [`apply_cardinality`] step.
//!
//! # Module Organization
//!
//! - [`types`] - The closed set of extractors and their declared types
//! - [`field`] - Text, rich text, number, date, keyword, enum and link fields
//! - [`component`] - Title and multimedia of the whole component
//! - [`presentation`] - Nested presentations filtered by template view
//! - [`model_data`] - Keyword model data passthrough
//! - [`cardinality`] - Single vs. multiple value binding
//!
//! # Examples
//!
//! ```
//! use contentmap_core::extractor::{apply_cardinality, ComponentExtractor};
//! use contentmap_core::types::Component;
//! use contentmap_core::value::PropertyBinding;
//!
//! let component = Component::new("tcm:1-10", "Press release");
//! let values = ComponentExtractor::Title.extract(Some(&component));
//!
//! match apply_cardinality(values, false) {
//!     PropertyBinding::Single(Some(title)) => assert_eq!(title.as_text(), Some("Press release")),
//!     other => panic!("unexpected binding: {:?}", other),
//! }
//! ```
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

// Extractor variants and inputs
pub mod types;

pub mod field;
pub mod component;
pub mod presentation;
pub mod model_data;
pub mod cardinality;

// Uniform dispatch over extractor kinds
mod dispatch;


pub use types::{
    ComponentExtractor, Extractor, ExtractorInput, FieldBinding, FieldExtractor, FieldSource,
    PresentationsByView,
};
pub use model_data::extract_keyword_data;
pub use cardinality::apply_cardinality;
