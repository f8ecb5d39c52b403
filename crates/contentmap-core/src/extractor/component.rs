//! Component extractors
//!
//! These read attributes of the whole content item rather than a named
//! field. An absent component yields no value, except for
//! [`ComponentExtractor::Multimedia`] which always yields exactly one value
//! so that callers can tell "no media" apart from "not bound".
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use super::types::ComponentExtractor;
use crate::types::Component;
use crate::value::PropertyValue;

impl ComponentExtractor {
    pub fn extract(&self, component: Option<&Component>) -> Vec<PropertyValue> {
        let multimedia = component.and_then(|c| c.multimedia.as_ref());

        match self {
            ComponentExtractor::Title => component
                .map(|c| PropertyValue::Text(c.title.clone()))
                .into_iter()
                .collect(),
            ComponentExtractor::MultimediaUrl => multimedia
                .map(|m| PropertyValue::Text(m.url.clone()))
                .into_iter()
                .collect(),
            ComponentExtractor::Multimedia => {
                vec![PropertyValue::Multimedia(multimedia.cloned())]
            }
            ComponentExtractor::NativeMultimedia => multimedia
                .map(|m| PropertyValue::NativeMultimedia(Some(m.native.clone())))
                .into_iter()
                .collect(),
        }
    }
}
