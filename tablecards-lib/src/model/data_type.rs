//! Column data types and the id registry
//!
//! A [`DataType`] decides how a column's values are edited, displayed and
//! identified on the wire. The numeric id is the only representation the
//! backend knows; [`DataType::from_id`] is the single way back from it.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde::Serialize;

use crate::error::UnknownDataTypeError;

/// Editor widget used to change a value of a given data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorKind {
    /// Free text input.
    TextInput,
    /// Numeric input.
    NumberInput,
    /// Decimal input with currency formatting.
    MoneyInput,
    /// Map widget picking a latitude/longitude pair.
    LocationPicker,
}

/// How a stored value is rendered inside a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayKind {
    Text,
    Number,
    Money,
    Map,
}

/// The data type of a column (or of a single cell).
///
/// # Example
///
/// ```
/// use tablecards_lib::model::DataType;
///
/// let data_type = DataType::from_id(3).unwrap();
/// assert_eq!(data_type, DataType::Monetary);
/// assert_eq!(data_type.id(), DataType::MONETARY_ID);
/// assert_eq!(data_type.format("12.5"), "12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum DataType {
    #[default]
    Textual,
    Numeric,
    Monetary,
    Map,
}

impl DataType {
    pub const TEXTUAL_ID: i32 = 1;
    pub const NUMERIC_ID: i32 = 2;
    pub const MONETARY_ID: i32 = 3;
    pub const MAP_ID: i32 = 4;

    /// Every registered variant, in id order.
    pub const ALL: [DataType; 4] = [
        DataType::Textual,
        DataType::Numeric,
        DataType::Monetary,
        DataType::Map,
    ];

    /// Resolves a wire id into a data type.
    ///
    /// Unknown ids are an error; there is no fallback variant.
    pub fn from_id(id: i32) -> Result<Self, UnknownDataTypeError> {
        match id {
            Self::TEXTUAL_ID => Ok(Self::Textual),
            Self::NUMERIC_ID => Ok(Self::Numeric),
            Self::MONETARY_ID => Ok(Self::Monetary),
            Self::MAP_ID => Ok(Self::Map),
            _ => Err(UnknownDataTypeError { id }),
        }
    }

    /// Stable wire id of this data type.
    pub fn id(&self) -> i32 {
        match self {
            Self::Textual => Self::TEXTUAL_ID,
            Self::Numeric => Self::NUMERIC_ID,
            Self::Monetary => Self::MONETARY_ID,
            Self::Map => Self::MAP_ID,
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Textual => "Text",
            Self::Numeric => "Number",
            Self::Monetary => "Money",
            Self::Map => "Map",
        }
    }

    /// Icon identifier shown next to the column name.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Textual => "text_fields",
            Self::Numeric => "numbers",
            Self::Monetary => "payments",
            Self::Map => "map",
        }
    }

    pub fn editor(&self) -> EditorKind {
        match self {
            Self::Textual => EditorKind::TextInput,
            Self::Numeric => EditorKind::NumberInput,
            Self::Monetary => EditorKind::MoneyInput,
            Self::Map => EditorKind::LocationPicker,
        }
    }

    pub fn display(&self) -> DisplayKind {
        match self {
            Self::Textual => DisplayKind::Text,
            Self::Numeric => DisplayKind::Number,
            Self::Monetary => DisplayKind::Money,
            Self::Map => DisplayKind::Map,
        }
    }

    /// A fresh instance of the same variant.
    pub fn fresh(&self) -> Self {
        *self
    }

    /// Returns `true` if both values are the same variant.
    pub fn same_variant(&self, other: &DataType) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Interprets a stored string according to this data type.
    pub fn parse(&self, value: &str) -> Result<TypedValue, ValueError> {
        let trimmed = value.trim();
        match self {
            Self::Textual => Ok(TypedValue::Text(value.to_string())),
            Self::Numeric => trimmed
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(TypedValue::Number)
                .ok_or_else(|| ValueError::new(*self, value)),
            Self::Monetary => Decimal::from_str(trimmed)
                .map(TypedValue::Money)
                .map_err(|_| ValueError::new(*self, value)),
            Self::Map => parse_location(trimmed).ok_or_else(|| ValueError::new(*self, value)),
        }
    }

    /// Renders a stored string for display.
    ///
    /// Values that do not parse are shown verbatim.
    pub fn format(&self, value: &str) -> String {
        match self.parse(value) {
            Ok(typed) => typed.to_string(),
            Err(_) => value.to_string(),
        }
    }
}

fn parse_location(value: &str) -> Option<TypedValue> {
    let (lat, lng) = value.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(TypedValue::Location { lat, lng })
}

impl TryFrom<i32> for DataType {
    type Error = UnknownDataTypeError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        Self::from_id(id)
    }
}

impl From<DataType> for i32 {
    fn from(data_type: DataType) -> Self {
        data_type.id()
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A cell value interpreted through its data type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Text(String),
    Number(f64),
    Money(Decimal),
    Location { lat: f64, lng: f64 },
}

impl std::fmt::Display for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{}", n),
            Self::Money(amount) => write!(f, "{:.2}", amount),
            Self::Location { lat, lng } => write!(f, "{:.5}, {:.5}", lat, lng),
        }
    }
}

/// A stored string that is not a valid value of its data type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {data_type} value")]
pub struct ValueError {
    pub data_type: DataType,
    pub value: String,
}

impl ValueError {
    fn new(data_type: DataType, value: &str) -> Self {
        Self {
            data_type,
            value: value.to_string(),
        }
    }
}
