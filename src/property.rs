//! Typed extra arguments declared in markup `<properties>` blocks.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("unknown property type `{0}`")]
    UnknownPropertyType(String),
    #[error("invalid {kind} property value `{value}`")]
    InvalidPropertyValue { kind: PropertyKind, value: String },
}

/// The fixed set of property types a `<property type="...">` may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Boolean,
    Byte,
    Character,
    Double,
    Float,
    Integer,
    Long,
    Short,
    String,
}

impl PropertyKind {
    pub const ALL: [PropertyKind; 9] = [
        PropertyKind::Boolean,
        PropertyKind::Byte,
        PropertyKind::Character,
        PropertyKind::Double,
        PropertyKind::Float,
        PropertyKind::Integer,
        PropertyKind::Long,
        PropertyKind::Short,
        PropertyKind::String,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PropertyKind::Boolean => "boolean",
            PropertyKind::Byte => "byte",
            PropertyKind::Character => "character",
            PropertyKind::Double => "double",
            PropertyKind::Float => "float",
            PropertyKind::Integer => "integer",
            PropertyKind::Long => "long",
            PropertyKind::Short => "short",
            PropertyKind::String => "string",
        }
    }

    /// Parse `text` as a value of this kind.
    ///
    /// Booleans follow the lenient markup convention: `true` in any case is
    /// true and every other string is false. Surrounding whitespace is
    /// ignored for booleans and numbers; `string` and `character` values keep
    /// the text exactly as given.
    pub fn parse(self, text: &str) -> Result<PropertyValue, PropertyError> {
        let invalid = || PropertyError::InvalidPropertyValue {
            kind: self,
            value: text.to_string(),
        };
        let trimmed = text.trim();
        let value = match self {
            PropertyKind::Boolean => PropertyValue::Boolean(trimmed.eq_ignore_ascii_case("true")),
            PropertyKind::Byte => PropertyValue::Byte(trimmed.parse().map_err(|_| invalid())?),
            PropertyKind::Character => {
                PropertyValue::Character(text.chars().next().ok_or_else(invalid)?)
            }
            PropertyKind::Double => PropertyValue::Double(trimmed.parse().map_err(|_| invalid())?),
            PropertyKind::Float => PropertyValue::Float(trimmed.parse().map_err(|_| invalid())?),
            PropertyKind::Integer => {
                PropertyValue::Integer(trimmed.parse().map_err(|_| invalid())?)
            }
            PropertyKind::Long => PropertyValue::Long(trimmed.parse().map_err(|_| invalid())?),
            PropertyKind::Short => PropertyValue::Short(trimmed.parse().map_err(|_| invalid())?),
            PropertyKind::String => PropertyValue::String(text.to_string()),
        };
        Ok(value)
    }
}

impl FromStr for PropertyKind {
    type Err = PropertyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        PropertyKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| PropertyError::UnknownPropertyType(name.to_string()))
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Boolean(bool),
    Byte(i8),
    Character(char),
    Double(f64),
    Float(f32),
    Integer(i32),
    Long(i64),
    Short(i16),
    String(String),
}

impl PropertyValue {
    /// Parse `text` with the parser registered under `type_name`.
    pub fn parse(type_name: &str, text: &str) -> Result<Self, PropertyError> {
        type_name.parse::<PropertyKind>()?.parse(text)
    }

    pub fn kind(&self) -> PropertyKind {
        match self {
            PropertyValue::Boolean(_) => PropertyKind::Boolean,
            PropertyValue::Byte(_) => PropertyKind::Byte,
            PropertyValue::Character(_) => PropertyKind::Character,
            PropertyValue::Double(_) => PropertyKind::Double,
            PropertyValue::Float(_) => PropertyKind::Float,
            PropertyValue::Integer(_) => PropertyKind::Integer,
            PropertyValue::Long(_) => PropertyKind::Long,
            PropertyValue::Short(_) => PropertyKind::Short,
            PropertyValue::String(_) => PropertyKind::String,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            PropertyValue::Character(value) => Some(*value),
            _ => None,
        }
    }

    /// Integral value widened to `i64`, for any of the integer kinds.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PropertyValue::Byte(value) => Some(i64::from(*value)),
            PropertyValue::Short(value) => Some(i64::from(*value)),
            PropertyValue::Integer(value) => Some(i64::from(*value)),
            PropertyValue::Long(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PropertyValue::Double(value) => Some(*value),
            PropertyValue::Float(value) => Some(f64::from(*value)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Boolean(value) => write!(f, "{value}"),
            PropertyValue::Byte(value) => write!(f, "{value}"),
            PropertyValue::Character(value) => write!(f, "{value}"),
            PropertyValue::Double(value) => write!(f, "{value}"),
            PropertyValue::Float(value) => write!(f, "{value}"),
            PropertyValue::Integer(value) => write!(f, "{value}"),
            PropertyValue::Long(value) => write!(f, "{value}"),
            PropertyValue::Short(value) => write!(f, "{value}"),
            PropertyValue::String(value) => f.write_str(value),
        }
    }
}
