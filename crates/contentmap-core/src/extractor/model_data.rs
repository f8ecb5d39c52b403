//! Keyword model-data passthrough
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use crate::types::ModelData;
use crate::value::PropertyValue;

/// Expose keyword model data as a single value; anything else yields nothing
pub fn extract_keyword_data(data: Option<&ModelData>) -> Vec<PropertyValue> {
    data.and_then(ModelData::as_keyword)
        .map(|keyword| PropertyValue::Keyword(keyword.clone()))
        .into_iter()
        .collect()
}
