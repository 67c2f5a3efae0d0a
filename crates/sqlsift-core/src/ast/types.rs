//! Data types usable as CAST targets.

use std::fmt;

/// A SQL data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// INTEGER
    Integer,
    /// SMALLINT
    Smallint,
    /// BIGINT
    Bigint,
    /// REAL
    Real,
    /// DOUBLE
    Double,
    /// DECIMAL with optional precision/scale.
    Decimal {
        /// Total digits.
        precision: Option<u16>,
        /// Digits after the decimal point.
        scale: Option<u16>,
    },
    /// NUMERIC with optional precision/scale.
    Numeric {
        /// Total digits.
        precision: Option<u16>,
        /// Digits after the decimal point.
        scale: Option<u16>,
    },
    /// CHAR with optional length.
    Char(Option<u32>),
    /// VARCHAR with optional length.
    Varchar(Option<u32>),
    /// TEXT
    Text,
    /// BOOLEAN
    Boolean,
    /// DATE
    Date,
    /// TIME
    Time,
    /// TIMESTAMP
    Timestamp,
    /// A type name the core grammar does not know.
    Custom(String),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Smallint => write!(f, "SMALLINT"),
            Self::Bigint => write!(f, "BIGINT"),
            Self::Real => write!(f, "REAL"),
            Self::Double => write!(f, "DOUBLE"),
            Self::Decimal { precision, scale } => write_sized(f, "DECIMAL", *precision, *scale),
            Self::Numeric { precision, scale } => write_sized(f, "NUMERIC", *precision, *scale),
            Self::Char(len) => write_length(f, "CHAR", *len),
            Self::Varchar(len) => write_length(f, "VARCHAR", *len),
            Self::Text => write!(f, "TEXT"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::Date => write!(f, "DATE"),
            Self::Time => write!(f, "TIME"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Custom(name) => write!(f, "{name}"),
        }
    }
}

fn write_sized(
    f: &mut fmt::Formatter<'_>,
    name: &str,
    precision: Option<u16>,
    scale: Option<u16>,
) -> fmt::Result {
    match (precision, scale) {
        (Some(p), Some(s)) => write!(f, "{name}({p}, {s})"),
        (Some(p), None) => write!(f, "{name}({p})"),
        _ => write!(f, "{name}"),
    }
}

fn write_length(f: &mut fmt::Formatter<'_>, name: &str, len: Option<u32>) -> fmt::Result {
    match len {
        Some(n) => write!(f, "{name}({n})"),
        None => write!(f, "{name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DataType::Integer.to_string(), "INTEGER");
        assert_eq!(DataType::Varchar(Some(255)).to_string(), "VARCHAR(255)");
        assert_eq!(
            DataType::Decimal {
                precision: Some(10),
                scale: Some(2)
            }
            .to_string(),
            "DECIMAL(10, 2)"
        );
        assert_eq!(DataType::Custom(String::from("UUID")).to_string(), "UUID");
    }
}
