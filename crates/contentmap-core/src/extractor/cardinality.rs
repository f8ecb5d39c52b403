//! Shared cardinality step applied to every extractor's output
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use crate::value::{PropertyBinding, PropertyValue};

/// Bind extracted values to a property
///
/// A single-valued property takes the first value (or none); a multi-valued
/// property takes all of them in their original order.
pub fn apply_cardinality(values: Vec<PropertyValue>, multiple: bool) -> PropertyBinding {
    if multiple {
        PropertyBinding::Multiple(values)
    } else {
        PropertyBinding::Single(values.into_iter().next())
    }
}
