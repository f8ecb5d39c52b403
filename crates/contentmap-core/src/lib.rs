//! Contentmap Core - declarative field mapping from CMS content to view models
//!
//! This crate binds structured content items to strongly-typed view models.
//! Every model property is bound to one extractor that reads a content field
//! (or the whole component, its nested presentations, or keyword model data)
//! and coerces the raw values into the property's declared type.
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Content Types**: Components, fields, keywords, templates and multimedia
//! - **Coercion**: Permissive boolean/number parsing, strict date parsing
//! - **Extractors**: The closed set of field, component and presentation policies
//! - **Registry**: Model types with their properties, checked at registration
//! - **Factory**: A reference orchestrator building models recursively
//!
//! # Example
//!
//! ```
//! use contentmap_core::{
//!     ComponentExtractor, DefaultViewModelFactory, FieldExtractor, LinkResolver,
//!     ModelRegistry, ModelTypeBuilder, PassthroughRenderer, PropertyBuilder, Result,
//! };
//! use contentmap_core::types::{Component, ComponentPresentation, Field};
//! use std::sync::Arc;
//!
//! fn example() -> Result<()> {
//!     let article = ModelTypeBuilder::new("Article")
//!         .property(PropertyBuilder::new("title").component(ComponentExtractor::Title))
//!         .property(PropertyBuilder::new("rating").field("rating", FieldExtractor::Number))
//!         .build()?;
//!     let registry = ModelRegistry::new().with(article)?;
//!
//!     let factory = DefaultViewModelFactory::new(
//!         Arc::new(registry),
//!         PassthroughRenderer,
//!         LinkResolver::new("https://example.com/")?,
//!     );
//!
//!     let component = Component::new("tcm:1-10", "Hello")
//!         .with_schema("Article")
//!         .with_field(Field::new("rating", ["4.5"]));
//!     let model = factory.build(&ComponentPresentation::untemplated(component))?;
//!
//!     assert_eq!(model.single("rating").and_then(|v| v.as_number()), Some(4.5));
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod error;
pub mod types;
pub mod value;
pub mod coerce;
pub mod collab;
pub mod context;
pub mod extractor;
pub mod registry;
pub mod factory;

// Re-export main types for convenience
pub use error::{Error, RawKind, Result};
pub use types::{
    Component, ComponentPresentation, Field, FieldSet, Keyword, ModelData, MultimediaData,
    NativeMultimedia, RawValue, Template,
};
pub use value::{
    EnumType, EnumValue, ExpectedType, Markup, PropertyBinding, PropertyValue, ValueKind,
};
pub use collab::{
    LinkResolver, PassthroughRenderer, RichTextRenderer, UrlResolver, ViewModel,
    ViewModelFactory,
};
pub use context::ExtractionContext;
pub use extractor::{
    apply_cardinality, ComponentExtractor, Extractor, ExtractorInput, FieldBinding,
    FieldExtractor, FieldSource, PresentationsByView,
};
pub use registry::{
    ModelDefinition, ModelProperty, ModelRegistry, ModelType, ModelTypeBuilder, PropertyBuilder,
};
pub use factory::{DefaultViewModelFactory, DynamicViewModel, FactoryConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_error_creation() {
        let err = Error::configuration("Test error", Some("title"));
        assert!(err.to_string().contains("Test error"));
    }
}
