use core::fmt::Display;
use core::fmt::Formatter;
use core::fmt::Result as FormatResult;

use gdal::vector::FieldValue;
use gdal::vector::OGRFieldType;
use ordered_float::NotNan;
use serde_json::Value as JsonValue;

/// A single attribute cell. Dates and list fields are read as text.
#[derive(Clone,Debug,PartialEq)]
pub(crate) enum AttributeValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String)
}

impl AttributeValue {

    pub(crate) const fn is_null(&self) -> bool {
        matches!(self,Self::Null)
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) if !value.is_nan() => Some(*value),
            Self::Real(_) | Self::Null | Self::Text(_) => None,
        }
    }

    /// Returns the value as a key for joining, nulls and NaN never match anything.
    pub(crate) fn join_key(&self) -> Option<JoinKey> {
        match self {
            Self::Null => None,
            Self::Integer(value) => Some(JoinKey::Integer(*value)),
            Self::Real(value) => {
                if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
                    Some(JoinKey::Integer(*value as i64))
                } else {
                    NotNan::new(*value).ok().map(JoinKey::Real)
                }
            },
            Self::Text(value) => Some(JoinKey::Text(value.clone())),
        }
    }

    pub(crate) fn to_json(&self) -> JsonValue {
        match self {
            Self::Null => JsonValue::Null,
            Self::Integer(value) => JsonValue::from(*value),
            // from_f64 refuses NaN and infinity, which have no JSON representation
            Self::Real(value) => serde_json::Number::from_f64(*value).map_or(JsonValue::Null, JsonValue::Number),
            Self::Text(value) => JsonValue::String(value.clone()),
        }
    }

    fn kind(&self) -> Option<FieldKind> {
        match self {
            Self::Null => None,
            Self::Integer(_) => Some(FieldKind::Integer),
            Self::Real(_) => Some(FieldKind::Real),
            Self::Text(_) => Some(FieldKind::Text),
        }
    }

}

impl From<Option<FieldValue>> for AttributeValue {

    fn from(value: Option<FieldValue>) -> Self {
        match value {
            None => Self::Null,
            Some(FieldValue::IntegerValue(value)) => Self::Integer(value.into()),
            Some(FieldValue::Integer64Value(value)) => Self::Integer(value),
            Some(FieldValue::RealValue(value)) => Self::Real(value),
            Some(FieldValue::StringValue(value)) => Self::Text(value),
            Some(other) => other.into_string().map_or(Self::Null, Self::Text),
        }
    }
}

impl Display for AttributeValue {

    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            Self::Null => Ok(()),
            Self::Integer(value) => write!(f,"{value}"),
            Self::Real(value) => write!(f,"{value}"),
            Self::Text(value) => write!(f,"{value}"),
        }
    }
}

/// Hashable form of an attribute value. Integral reals are stored as integers so `1` and `1.0` join.
#[derive(Clone,Debug,PartialEq,Eq,Hash)]
pub(crate) enum JoinKey {
    Integer(i64),
    Real(NotNan<f64>),
    Text(String)
}

/// The storage type of a column when written out, chosen from the values it holds.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub(crate) enum FieldKind {
    Integer,
    Real,
    Text
}

impl FieldKind {

    pub(crate) fn infer<'value, Values: IntoIterator<Item = &'value AttributeValue>>(values: Values) -> Self {
        let mut result: Option<Self> = None;
        for kind in values.into_iter().filter_map(AttributeValue::kind) {
            result = Some(match (result,kind) {
                (None,kind) => kind,
                (Some(Self::Text),_) | (_,Self::Text) => Self::Text,
                (Some(Self::Real),_) | (_,Self::Real) => Self::Real,
                (Some(Self::Integer),Self::Integer) => Self::Integer,
            })
        }
        // a column of nulls is written as text
        result.unwrap_or(Self::Text)
    }

    pub(crate) const fn storage_type(self) -> OGRFieldType::Type {
        match self {
            Self::Integer => OGRFieldType::OFTInteger64,
            Self::Real => OGRFieldType::OFTReal,
            Self::Text => OGRFieldType::OFTString,
        }
    }

}

#[cfg(test)]
mod test {
    use super::AttributeValue;
    use super::FieldKind;
    use super::JoinKey;

    #[test]
    fn test_integral_real_joins_integer() {
        assert_eq!(AttributeValue::Real(12.0).join_key(),Some(JoinKey::Integer(12)));
        assert_eq!(AttributeValue::Integer(12).join_key(),Some(JoinKey::Integer(12)));
        assert_ne!(AttributeValue::Real(12.5).join_key(),Some(JoinKey::Integer(12)));
        assert_eq!(AttributeValue::Real(f64::NAN).join_key(),None);
        assert_eq!(AttributeValue::Null.join_key(),None);
    }

    #[test]
    fn test_infer_field_kind() {
        assert_eq!(FieldKind::infer(&[AttributeValue::Integer(1),AttributeValue::Null]),FieldKind::Integer);
        assert_eq!(FieldKind::infer(&[AttributeValue::Integer(1),AttributeValue::Real(0.5)]),FieldKind::Real);
        assert_eq!(FieldKind::infer(&[AttributeValue::Real(1.0),AttributeValue::Text("a".to_owned())]),FieldKind::Text);
        assert_eq!(FieldKind::infer(&[AttributeValue::Null]),FieldKind::Text);
    }

    #[test]
    fn test_nan_is_null_in_json() {
        assert!(AttributeValue::Real(f64::NAN).to_json().is_null());
        assert_eq!(AttributeValue::Integer(3).to_json(),serde_json::json!(3));
    }
}
