//! Collaborator contracts consumed by the extractors
//!
//! The mapping layer performs no I/O itself. Rich-text rendering, link
//! resolution and recursive model construction are injected through the
//! traits in this module.

use crate::error::{Error, Result};
use crate::types::{Component, ComponentPresentation, ModelData};
use crate::value::Markup;
use anyhow::{anyhow, Context};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use url::Url;

const XHTML_NAMESPACE_ATTR: &str = r#" xmlns="http://www.w3.org/1999/xhtml""#;

/// A constructed view model
pub trait ViewModel: fmt::Debug + Send + Sync + Any {
    /// Registered name of the model type
    fn model_type(&self) -> &str;

    /// The content the model was built over
    fn model_data(&self) -> Option<&ModelData>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds view models for nested content
///
/// `depth` is the nesting level of the model being requested; the top-level
/// build is depth 0.
pub trait ViewModelFactory {
    /// Build a model, resolving its type from the presentation
    fn build_view_model(
        &self,
        presentation: &ComponentPresentation,
        depth: usize,
    ) -> Result<Arc<dyn ViewModel>>;

    /// Build a model of an explicitly named type
    fn build_mapped_model(
        &self,
        presentation: &ComponentPresentation,
        type_name: &str,
        depth: usize,
    ) -> Result<Arc<dyn ViewModel>>;
}

/// Turns raw rich text from the CMS into safe markup
///
/// Failures surface as [`Error::Internal`] and abort the property.
pub trait RichTextRenderer {
    fn render(&self, raw: &str) -> anyhow::Result<Markup>;
}

/// Resolves a shareable URL for a linked or multimedia component
///
/// Failures surface as [`Error::Internal`] and abort the property.
pub trait UrlResolver {
    fn resolve_url(&self, component: &Component) -> anyhow::Result<String>;
}

/// Renderer that trusts CMS markup, only dropping the XHTML namespace
/// declaration the CMS adds to every rich-text root element
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughRenderer;

impl RichTextRenderer for PassthroughRenderer {
    fn render(&self, raw: &str) -> anyhow::Result<Markup> {
        Ok(Markup::trusted(raw.replace(XHTML_NAMESPACE_ATTR, "")))
    }
}

/// Resolves multimedia components to their binary URL and everything else
/// to `{base}/{component id}`
#[derive(Debug, Clone)]
pub struct LinkResolver {
    base: Url,
}

impl LinkResolver {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| {
            Error::configuration(format!("Invalid link resolver base URL '{}': {}", base, e), None)
        })?;
        if base.cannot_be_a_base() {
            return Err(Error::configuration(
                format!("Link resolver base URL '{}' cannot be a base", base),
                None,
            ));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }
}

impl UrlResolver for LinkResolver {
    fn resolve_url(&self, component: &Component) -> anyhow::Result<String> {
        if let Some(multimedia) = &component.multimedia {
            let url = self.base.join(&multimedia.url).with_context(|| {
                format!(
                    "Could not resolve multimedia URL '{}' of {}",
                    multimedia.url, component.id
                )
            })?;
            return Ok(url.to_string());
        }

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("Base URL {} cannot take path segments", self.base))?
            .pop_if_empty()
            .push(&component.id);
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MultimediaData, NativeMultimedia};

    #[test]
    fn test_passthrough_strips_namespace() {
        let markup = PassthroughRenderer
            .render(r#"<p xmlns="http://www.w3.org/1999/xhtml">Hi <b>there</b></p>"#)
            .unwrap();
        assert_eq!(markup.as_str(), "<p>Hi <b>there</b></p>");
    }

    #[test]
    fn test_link_resolver_component() {
        let resolver = LinkResolver::new("https://example.com/content/").unwrap();
        let url = resolver
            .resolve_url(&Component::new("tcm:5-120", "Article"))
            .unwrap();
        assert_eq!(url, "https://example.com/content/tcm:5-120");
    }

    #[test]
    fn test_link_resolver_multimedia() {
        let resolver = LinkResolver::new("https://example.com/").unwrap();
        let component = Component::new("tcm:5-121", "Logo").with_multimedia(
            MultimediaData::from_native(NativeMultimedia {
                url: "/media/logo.png".to_string(),
                mime_type: "image/png".to_string(),
                file_name: "logo.png".to_string(),
                ..Default::default()
            }),
        );
        assert_eq!(
            resolver.resolve_url(&component).unwrap(),
            "https://example.com/media/logo.png"
        );
    }

    #[test]
    fn test_link_resolver_reports_unjoinable_multimedia_url() {
        let resolver = LinkResolver::new("https://example.com/").unwrap();
        let component = Component::new("tcm:5-122", "Broken").with_multimedia(
            MultimediaData::from_native(NativeMultimedia {
                url: "http://[broken".to_string(),
                ..Default::default()
            }),
        );
        let err = resolver.resolve_url(&component).unwrap_err();
        assert!(err.to_string().contains("tcm:5-122"));
    }

    #[test]
    fn test_link_resolver_rejects_bad_base() {
        assert!(LinkResolver::new("not a url").is_err());
        assert!(LinkResolver::new("mailto:someone@example.com").is_err());
    }
}
