//! Typed property values produced by extractors
//!
//! [`PropertyValue`] is what an extractor hands back to the orchestrator,
//! [`ValueKind`] and [`ExpectedType`] describe what a property declares, and
//! [`PropertyBinding`] is the result of the shared cardinality step.

use crate::collab::ViewModel;
use crate::types::{Keyword, MultimediaData, NativeMultimedia};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Markup that is safe to emit verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markup(String);

impl Markup {
    /// Wrap markup that is already known to be safe
    pub fn trusted(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Element type of a model property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Text,
    Boolean,
    Number,
    Date,
    Markup,
    Multimedia,
    NativeMultimedia,
    Enum,
    Keyword,
    ViewModel,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::Date => "date",
            ValueKind::Markup => "markup",
            ValueKind::Multimedia => "multimedia",
            ValueKind::NativeMultimedia => "native multimedia",
            ValueKind::Enum => "enum",
            ValueKind::Keyword => "keyword",
            ValueKind::ViewModel => "view model",
        };
        f.write_str(name)
    }
}

/// Declared return type of an extractor: element kind plus cardinality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedType {
    pub kind: ValueKind,
    pub multiple: bool,
}

impl ExpectedType {
    pub const fn single(kind: ValueKind) -> Self {
        Self { kind, multiple: false }
    }

    pub const fn list(kind: ValueKind) -> Self {
        Self { kind, multiple: true }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.multiple {
            write!(f, "list of {}", self.kind)
        } else {
            write!(f, "{}", self.kind)
        }
    }
}

/// A single variant of a runtime enum descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumVariant {
    pub name: String,
    pub discriminant: i64,
}

/// Runtime description of an enum a property is parsed into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<EnumVariant>,
}

impl EnumType {
    /// Enum whose discriminants follow declaration order, starting at 0
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .enumerate()
                .map(|(i, variant)| EnumVariant {
                    name: variant.into(),
                    discriminant: i as i64,
                })
                .collect(),
        }
    }

    /// Enum with explicit discriminants
    pub fn with_discriminants<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            variants: variants
                .into_iter()
                .map(|(variant, discriminant)| EnumVariant {
                    name: variant.into(),
                    discriminant,
                })
                .collect(),
        }
    }

    /// Parse a variant name (case-sensitive) or the discriminant of a defined variant
    ///
    /// Integers that match no defined variant are rejected rather than
    /// carried as anonymous values, so every parsed value names a variant.
    pub fn parse(&self, raw: &str) -> Option<EnumValue> {
        let raw = raw.trim();
        let variant = self
            .variants
            .iter()
            .find(|v| v.name == raw)
            .or_else(|| {
                let discriminant = raw.parse::<i64>().ok()?;
                self.variants.iter().find(|v| v.discriminant == discriminant)
            })?;
        Some(self.value_of(variant))
    }

    /// Look up a variant by discriminant
    pub fn from_discriminant(&self, discriminant: i64) -> Option<EnumValue> {
        self.variants
            .iter()
            .find(|v| v.discriminant == discriminant)
            .map(|v| self.value_of(v))
    }

    fn value_of(&self, variant: &EnumVariant) -> EnumValue {
        EnumValue {
            type_name: self.name.clone(),
            variant: variant.name.clone(),
            discriminant: variant.discriminant,
        }
    }
}

/// A parsed enum value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub type_name: String,
    pub variant: String,
    pub discriminant: i64,
}

/// A coerced value ready to be bound to a model property
#[derive(Debug, Clone)]
pub enum PropertyValue {
    Text(String),
    Boolean(bool),
    Number(f64),
    Date(DateTime<FixedOffset>),
    Markup(Markup),
    /// `None` marks a present field without media
    Multimedia(Option<MultimediaData>),
    NativeMultimedia(Option<NativeMultimedia>),
    Enum(EnumValue),
    Keyword(Keyword),
    Model(Arc<dyn ViewModel>),
}

impl PropertyValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PropertyValue::Text(_) => ValueKind::Text,
            PropertyValue::Boolean(_) => ValueKind::Boolean,
            PropertyValue::Number(_) => ValueKind::Number,
            PropertyValue::Date(_) => ValueKind::Date,
            PropertyValue::Markup(_) => ValueKind::Markup,
            PropertyValue::Multimedia(_) => ValueKind::Multimedia,
            PropertyValue::NativeMultimedia(_) => ValueKind::NativeMultimedia,
            PropertyValue::Enum(_) => ValueKind::Enum,
            PropertyValue::Keyword(_) => ValueKind::Keyword,
            PropertyValue::Model(_) => ValueKind::ViewModel,
        }
    }

    /// Whether this is one of the explicit null payloads
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            PropertyValue::Multimedia(None) | PropertyValue::NativeMultimedia(None)
        )
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            PropertyValue::Date(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_markup(&self) -> Option<&Markup> {
        match self {
            PropertyValue::Markup(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            PropertyValue::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&Keyword> {
        match self {
            PropertyValue::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Arc<dyn ViewModel>> {
        match self {
            PropertyValue::Model(m) => Some(m),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::Date(a), Self::Date(b)) => a == b,
            (Self::Markup(a), Self::Markup(b)) => a == b,
            (Self::Multimedia(a), Self::Multimedia(b)) => a == b,
            (Self::NativeMultimedia(a), Self::NativeMultimedia(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::Keyword(a), Self::Keyword(b)) => a == b,
            // Models have no structural equality; compare identity
            (Self::Model(a), Self::Model(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// A property value after cardinality has been applied
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyBinding {
    Single(Option<PropertyValue>),
    Multiple(Vec<PropertyValue>),
}

impl PropertyBinding {
    /// The single value, or the first of many
    pub fn first(&self) -> Option<&PropertyValue> {
        match self {
            PropertyBinding::Single(value) => value.as_ref(),
            PropertyBinding::Multiple(values) => values.first(),
        }
    }

    /// All bound values as a slice
    pub fn values(&self) -> &[PropertyValue] {
        match self {
            PropertyBinding::Single(Some(value)) => std::slice::from_ref(value),
            PropertyBinding::Single(None) => &[],
            PropertyBinding::Multiple(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn colors() -> EnumType {
        EnumType::with_discriminants("Color", [("Red", 1), ("Green", 2), ("Blue", 4)])
    }

    #[test]
    fn test_enum_parse_by_name() {
        let value = colors().parse("Green").unwrap();
        assert_eq!(value.variant, "Green");
        assert_eq!(value.discriminant, 2);
        assert_eq!(value.type_name, "Color");
    }

    #[test]
    fn test_enum_parse_is_case_sensitive() {
        assert!(colors().parse("green").is_none());
    }

    #[test]
    fn test_enum_parse_trims_and_accepts_discriminant() {
        assert_eq!(colors().parse("  Blue ").unwrap().discriminant, 4);
        assert_eq!(colors().parse("4").unwrap().variant, "Blue");
        assert!(colors().parse("3").is_none());
        assert!(colors().parse("").is_none());
    }

    #[test]
    fn test_enum_default_discriminants() {
        let kind = EnumType::new("Kind", ["A", "B"]);
        assert_eq!(kind.from_discriminant(1).unwrap().variant, "B");
    }

    #[test]
    fn test_binding_values() {
        let single = PropertyBinding::Single(Some(PropertyValue::Number(1.0)));
        assert_eq!(single.values().len(), 1);
        assert!(PropertyBinding::Single(None).is_empty());

        let many = PropertyBinding::Multiple(vec![
            PropertyValue::Text("a".into()),
            PropertyValue::Text("b".into()),
        ]);
        assert_eq!(many.first().and_then(PropertyValue::as_text), Some("a"));
    }

    #[test]
    fn test_null_multimedia() {
        assert!(PropertyValue::Multimedia(None).is_null());
        assert_eq!(PropertyValue::Multimedia(None).kind(), ValueKind::Multimedia);
        assert!(!PropertyValue::Text(String::new()).is_null());
    }

    #[test]
    fn test_expected_type_display() {
        assert_eq!(ExpectedType::list(ValueKind::Number).to_string(), "list of number");
        assert_eq!(ExpectedType::single(ValueKind::Markup).to_string(), "markup");
    }
}
