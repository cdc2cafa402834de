//! String-keyed style properties
//!
//! Application code sets layout styles one property at a time using CSS-like
//! names (`"flex-grow"`, `"marginLeft"`, `"justify_content"`). Names are
//! normalised to lowercase ASCII letters before lookup, so every spelling of
//! a property maps to the same key.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::multispace0,
    combinator::{all_consuming, map, opt, value, verify},
    number::complete::float,
    sequence::{delimited, pair},
    IResult,
};
use taffy::prelude::*;
use taffy::style::Overflow;
use thiserror::Error;

/// Value of a style property, as handed over by the scripting surface
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    Number(f32),
    Text(String),
}

impl From<f32> for StyleValue {
    fn from(value: f32) -> Self {
        StyleValue::Number(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value as f32)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

impl std::fmt::Display for StyleValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StyleValue::Number(n) => write!(f, "{n}"),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StyleError {
    #[error("unknown style property: {0}")]
    UnknownProperty(String),

    #[error("invalid value `{value}` for style property `{name}`")]
    InvalidValue { name: String, value: String },

    #[error("layout node does not exist")]
    UnknownNode,
}

/// Lowercase a property name and keep only ASCII letters
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Parsed length: `auto`, a number of points, or a percentage fraction
#[derive(Clone, Copy, Debug, PartialEq)]
enum Length {
    Auto,
    Points(f32),
    Percent(f32),
}

fn parse_length(input: &str) -> IResult<&str, Length> {
    alt((
        value(Length::Auto, tag_no_case("auto")),
        map(
            pair(
                verify(float, |n: &f32| n.is_finite()),
                opt(alt((tag_no_case("px"), tag("%")))),
            ),
            |(number, unit)| match unit {
                Some("%") => Length::Percent(number / 100.0),
                _ => Length::Points(number),
            },
        ),
    ))(input)
}

fn parse_length_str(input: &str) -> Option<Length> {
    all_consuming(delimited(multispace0, parse_length, multispace0))(input)
        .ok()
        .map(|(_, length)| length)
}

struct Setter<'a> {
    name: &'a str,
    value: &'a StyleValue,
}

impl Setter<'_> {
    fn invalid(&self) -> StyleError {
        StyleError::InvalidValue {
            name: self.name.to_string(),
            value: self.value.to_string(),
        }
    }

    fn number(&self) -> Result<f32, StyleError> {
        match self.value {
            StyleValue::Number(n) if n.is_finite() => Ok(*n),
            StyleValue::Number(_) => Err(self.invalid()),
            StyleValue::Text(text) => match parse_length_str(text) {
                Some(Length::Points(n)) => Ok(n),
                _ => Err(self.invalid()),
            },
        }
    }

    fn keyword(&self) -> Result<String, StyleError> {
        match self.value {
            StyleValue::Text(text) => Ok(normalize_name(text)),
            StyleValue::Number(_) => Err(self.invalid()),
        }
    }

    fn length(&self) -> Result<Length, StyleError> {
        match self.value {
            StyleValue::Number(n) if n.is_finite() => Ok(Length::Points(*n)),
            StyleValue::Number(_) => Err(self.invalid()),
            StyleValue::Text(text) => parse_length_str(text).ok_or_else(|| self.invalid()),
        }
    }

    fn dimension(&self) -> Result<Dimension, StyleError> {
        Ok(match self.length()? {
            Length::Auto => Dimension::Auto,
            Length::Points(n) => Dimension::Length(n),
            Length::Percent(p) => Dimension::Percent(p),
        })
    }

    fn length_percentage_auto(&self) -> Result<LengthPercentageAuto, StyleError> {
        Ok(match self.length()? {
            Length::Auto => LengthPercentageAuto::Auto,
            Length::Points(n) => LengthPercentageAuto::Length(n),
            Length::Percent(p) => LengthPercentageAuto::Percent(p),
        })
    }

    fn length_percentage(&self) -> Result<LengthPercentage, StyleError> {
        match self.length()? {
            Length::Auto => Err(self.invalid()),
            Length::Points(n) => Ok(LengthPercentage::Length(n)),
            Length::Percent(p) => Ok(LengthPercentage::Percent(p)),
        }
    }

    fn align(&self) -> Result<Option<AlignItems>, StyleError> {
        Ok(Some(match self.keyword()?.as_str() {
            "auto" => return Ok(None),
            "flexstart" => AlignItems::FlexStart,
            "flexend" => AlignItems::FlexEnd,
            "start" => AlignItems::Start,
            "end" => AlignItems::End,
            "center" => AlignItems::Center,
            "baseline" => AlignItems::Baseline,
            "stretch" => AlignItems::Stretch,
            _ => return Err(self.invalid()),
        }))
    }

    fn justify(&self) -> Result<Option<JustifyContent>, StyleError> {
        Ok(Some(match self.keyword()?.as_str() {
            "auto" => return Ok(None),
            "flexstart" => JustifyContent::FlexStart,
            "flexend" => JustifyContent::FlexEnd,
            "start" => JustifyContent::Start,
            "end" => JustifyContent::End,
            "center" => JustifyContent::Center,
            "stretch" => JustifyContent::Stretch,
            "spacebetween" => JustifyContent::SpaceBetween,
            "spacearound" => JustifyContent::SpaceAround,
            "spaceevenly" => JustifyContent::SpaceEvenly,
            _ => return Err(self.invalid()),
        }))
    }
}

fn set_all<T: Copy>(rect: &mut taffy::geometry::Rect<T>, value: T) {
    rect.left = value;
    rect.right = value;
    rect.top = value;
    rect.bottom = value;
}

/// Apply one property to a style. `name` may use any casing or separators.
pub fn apply(style: &mut Style, name: &str, value: &StyleValue) -> Result<(), StyleError> {
    let key = normalize_name(name);
    let s = Setter { name, value };

    match key.as_str() {
        "flexdirection" => {
            style.flex_direction = match s.keyword()?.as_str() {
                "row" => FlexDirection::Row,
                "rowreverse" => FlexDirection::RowReverse,
                "column" => FlexDirection::Column,
                "columnreverse" => FlexDirection::ColumnReverse,
                _ => return Err(s.invalid()),
            }
        }
        "flexwrap" => {
            style.flex_wrap = match s.keyword()?.as_str() {
                "nowrap" => FlexWrap::NoWrap,
                "wrap" => FlexWrap::Wrap,
                "wrapreverse" => FlexWrap::WrapReverse,
                _ => return Err(s.invalid()),
            }
        }
        "justifycontent" => style.justify_content = s.justify()?,
        "aligncontent" => style.align_content = s.justify()?,
        "alignitems" => style.align_items = s.align()?,
        "alignself" => style.align_self = s.align()?,
        "position" => {
            style.position = match s.keyword()?.as_str() {
                "relative" => Position::Relative,
                "absolute" => Position::Absolute,
                _ => return Err(s.invalid()),
            }
        }
        "display" => {
            style.display = match s.keyword()?.as_str() {
                "flex" => Display::Flex,
                "none" => Display::None,
                _ => return Err(s.invalid()),
            }
        }
        "overflow" => {
            let overflow = match s.keyword()?.as_str() {
                "visible" => Overflow::Visible,
                "hidden" => Overflow::Hidden,
                "clip" => Overflow::Clip,
                "scroll" => Overflow::Scroll,
                _ => return Err(s.invalid()),
            };
            style.overflow = taffy::geometry::Point {
                x: overflow,
                y: overflow,
            };
        }
        "flex" => {
            let flex = s.number()?;
            if flex > 0.0 {
                style.flex_grow = flex;
                style.flex_shrink = 1.0;
                style.flex_basis = Dimension::Percent(0.0);
            } else {
                style.flex_grow = 0.0;
                style.flex_basis = Dimension::Auto;
            }
        }
        "flexgrow" => style.flex_grow = s.number()?,
        "flexshrink" => style.flex_shrink = s.number()?,
        "flexbasis" => style.flex_basis = s.dimension()?,
        "width" => style.size.width = s.dimension()?,
        "height" => style.size.height = s.dimension()?,
        "minwidth" => style.min_size.width = s.dimension()?,
        "minheight" => style.min_size.height = s.dimension()?,
        "maxwidth" => style.max_size.width = s.dimension()?,
        "maxheight" => style.max_size.height = s.dimension()?,
        "aspectratio" => style.aspect_ratio = Some(s.number()?),
        "left" => style.inset.left = s.length_percentage_auto()?,
        "right" => style.inset.right = s.length_percentage_auto()?,
        "top" => style.inset.top = s.length_percentage_auto()?,
        "bottom" => style.inset.bottom = s.length_percentage_auto()?,
        "margin" => set_all(&mut style.margin, s.length_percentage_auto()?),
        "marginleft" => style.margin.left = s.length_percentage_auto()?,
        "marginright" => style.margin.right = s.length_percentage_auto()?,
        "margintop" => style.margin.top = s.length_percentage_auto()?,
        "marginbottom" => style.margin.bottom = s.length_percentage_auto()?,
        "marginhorizontal" => {
            let margin = s.length_percentage_auto()?;
            style.margin.left = margin;
            style.margin.right = margin;
        }
        "marginvertical" => {
            let margin = s.length_percentage_auto()?;
            style.margin.top = margin;
            style.margin.bottom = margin;
        }
        "padding" => set_all(&mut style.padding, s.length_percentage()?),
        "paddingleft" => style.padding.left = s.length_percentage()?,
        "paddingright" => style.padding.right = s.length_percentage()?,
        "paddingtop" => style.padding.top = s.length_percentage()?,
        "paddingbottom" => style.padding.bottom = s.length_percentage()?,
        "paddinghorizontal" => {
            let padding = s.length_percentage()?;
            style.padding.left = padding;
            style.padding.right = padding;
        }
        "paddingvertical" => {
            let padding = s.length_percentage()?;
            style.padding.top = padding;
            style.padding.bottom = padding;
        }
        "borderwidth" => set_all(&mut style.border, s.length_percentage()?),
        "borderleftwidth" => style.border.left = s.length_percentage()?,
        "borderrightwidth" => style.border.right = s.length_percentage()?,
        "bordertopwidth" => style.border.top = s.length_percentage()?,
        "borderbottomwidth" => style.border.bottom = s.length_percentage()?,
        "gap" => {
            let gap = s.length_percentage()?;
            style.gap = taffy::geometry::Size {
                width: gap,
                height: gap,
            };
        }
        "rowgap" => style.gap.height = s.length_percentage()?,
        "columngap" => style.gap.width = s.length_percentage()?,
        _ => return Err(StyleError::UnknownProperty(name.to_string())),
    }
    Ok(())
}
