//! Field extractors
//!
//! Each variant of [`FieldExtractor`] converts the raw values of one field
//! into property values, one output per input in field order. The only
//! exception is [`FieldExtractor::Enum`], which drops values it cannot
//! parse.
//!
//! Copyright (c) 2025 Contentmap Team
//! Licensed under the Apache-2.0 license

use super::types::FieldExtractor;
use crate::coerce::{parse_bool, parse_date, parse_number};
use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::types::{Component, ComponentPresentation, Field, Keyword, RawValue};
use crate::value::{EnumType, EnumValue, PropertyValue};

impl FieldExtractor {
    /// Convert every raw value of `field`
    pub fn extract(&self, field: &Field, ctx: &ExtractionContext<'_>) -> Result<Vec<PropertyValue>> {
        match self {
            FieldExtractor::Text { boolean } => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let text = self.expect_text(raw)?;
                    Ok(if *boolean {
                        PropertyValue::Boolean(parse_bool(text))
                    } else {
                        PropertyValue::Text(text.to_string())
                    })
                })
                .collect(),

            FieldExtractor::RichText => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let text = self.expect_text(raw)?;
                    Ok(PropertyValue::Markup(ctx.renderer.render(text)?))
                })
                .collect(),

            FieldExtractor::Number => field
                .values
                .iter()
                .map(|raw| match raw {
                    RawValue::Number(n) => Ok(PropertyValue::Number(*n)),
                    RawValue::Text(s) => Ok(PropertyValue::Number(parse_number(s))),
                    other => Err(self.unexpected("number or text", other)),
                })
                .collect(),

            FieldExtractor::Date => field
                .values
                .iter()
                .map(|raw| match raw {
                    RawValue::Date(d) => Ok(PropertyValue::Date(*d)),
                    RawValue::Text(s) => parse_date(s).map(PropertyValue::Date),
                    other => Err(self.unexpected("date or text", other)),
                })
                .collect(),

            FieldExtractor::KeywordKey { boolean } => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let keyword = self.expect_keyword(raw)?;
                    Ok(if *boolean {
                        PropertyValue::Boolean(parse_bool(&keyword.key))
                    } else {
                        PropertyValue::Text(keyword.key.clone())
                    })
                })
                .collect(),

            FieldExtractor::NumericKeywordKey => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let keyword = self.expect_keyword(raw)?;
                    Ok(PropertyValue::Number(parse_number(&keyword.key)))
                })
                .collect(),

            FieldExtractor::Keyword => field
                .values
                .iter()
                .map(|raw| self.expect_keyword(raw).map(|k| PropertyValue::Keyword(k.clone())))
                .collect(),

            FieldExtractor::Enum => {
                let enum_type = ctx.property.enum_type().ok_or_else(|| {
                    Error::configuration(
                        "Enum extractor requires an enum type",
                        Some(ctx.property.name()),
                    )
                })?;
                Ok(field
                    .values
                    .iter()
                    .filter_map(|raw| parse_enum(enum_type, raw))
                    .map(PropertyValue::Enum)
                    .collect())
            }

            FieldExtractor::Multimedia => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let component = self.expect_component(raw)?;
                    Ok(PropertyValue::NativeMultimedia(
                        component.multimedia.as_ref().map(|m| m.native.clone()),
                    ))
                })
                .collect(),

            FieldExtractor::ResolvedUrl => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let component = self.expect_component(raw)?;
                    Ok(PropertyValue::Text(ctx.resolver.resolve_url(component)?))
                })
                .collect(),

            FieldExtractor::LinkedComponent { complex_type } => field
                .values
                .iter()
                .map(|raw| -> Result<PropertyValue> {
                    let component = self.expect_component(raw)?;
                    let presentation = ComponentPresentation::untemplated(component.clone());
                    let model = match complex_type {
                        Some(type_name) => ctx.factory.build_mapped_model(
                            &presentation,
                            type_name,
                            ctx.nested_depth(),
                        )?,
                        None => ctx
                            .factory
                            .build_view_model(&presentation, ctx.nested_depth())?,
                    };
                    Ok(PropertyValue::Model(model))
                })
                .collect(),
        }
    }

    fn expect_text<'v>(&self, raw: &'v RawValue) -> Result<&'v str> {
        match raw {
            RawValue::Text(s) => Ok(s.as_str()),
            other => Err(self.unexpected("text", other)),
        }
    }

    fn expect_keyword<'v>(&self, raw: &'v RawValue) -> Result<&'v Keyword> {
        match raw {
            RawValue::Keyword(k) => Ok(k),
            other => Err(self.unexpected("keyword", other)),
        }
    }

    fn expect_component<'v>(&self, raw: &'v RawValue) -> Result<&'v Component> {
        match raw {
            RawValue::Component(c) => Ok(c.as_ref()),
            other => Err(self.unexpected("component", other)),
        }
    }

    fn unexpected(&self, expected: &str, raw: &RawValue) -> Error {
        Error::UnexpectedRawValue {
            extractor: self.name().to_string(),
            expected: expected.to_string(),
            found: raw.kind(),
        }
    }
}

/// Parse one raw value into the enum, `None` when it does not match
fn parse_enum(enum_type: &EnumType, raw: &RawValue) -> Option<EnumValue> {
    let parsed = match raw {
        RawValue::Text(s) => enum_type.parse(s),
        RawValue::Keyword(k) => enum_type.parse(&k.key),
        RawValue::Number(n) if n.fract() == 0.0 => enum_type.from_discriminant(*n as i64),
        _ => None,
    };
    if parsed.is_none() {
        log::debug!("Dropping value {:?} not parsable as enum {}", raw, enum_type.name);
    }
    parsed
}
