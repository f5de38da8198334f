//! Declarative per-field rules shared by every record type.
//!
//! Each record type declares its layout as a static, ordered table of
//! [`FieldDef`] entries (name, inclusion, validator, width, position,
//! padding, optional fixed content). The engine validates, pads and
//! upper-cases values against that table; the concatenation of all padded
//! contents in declared order is always exactly 94 characters.

use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

/// NACHA field inclusion requirement.
///
/// Mandatory fields are necessary for routing/posting; omission of a
/// Required field may cause rejection at the RDFI; Optional fields are at
/// the originator's discretion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inclusion {
    Mandatory,
    Required,
    Optional,
}

/// Padding rule applied after validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Padding {
    /// Fixed literals are stored verbatim at their declared width
    None,
    /// Alphanumeric fields are space-padded on the right
    SpaceRight,
    /// Numeric fields are zero-padded on the left
    ZeroLeft,
}

/// Exactly one validator applies to every field.
#[derive(Debug, Clone, Copy)]
pub enum Validator {
    /// Value must fully match the anchored regular expression
    Pattern(&'static str),
    /// Value must parse as a calendar date under the chrono format
    Date(&'static str),
    /// Value must parse as a time of day under the chrono format
    Time(&'static str),
    /// Value must be exactly one member of the allowed set
    OneOf(&'static [&'static str]),
}

/// Static specification of a single field within a 94-character record.
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    /// Field name, used for get/set-by-name and error messages
    pub name: &'static str,

    /// NACHA inclusion requirement
    pub inclusion: Inclusion,

    /// Validation rule applied to programmatically supplied values
    pub validator: Validator,

    /// Fixed width of the field in characters
    pub width: usize,

    /// 1-based starting offset within the 94-character line
    pub start: usize,

    /// Padding rule applied after validation
    pub padding: Padding,

    /// Fixed content for constant fields (record type codes, literals)
    pub fixed: Option<&'static str>,
}

impl FieldDef {
    /// 1-based ending offset within the 94-character line.
    pub fn end(&self) -> usize {
        self.start + self.width - 1
    }

    /// Applies this field's validator to a raw value.
    ///
    /// Optional date/time fields left blank pass without parsing, so a
    /// record with no date-of-death (for example) can still be built.
    pub fn validate(&self, value: &str) -> Result<(), ValidationError> {
        match self.validator {
            Validator::Pattern(pattern) => {
                if compiled(pattern).is_match(value) {
                    Ok(())
                } else {
                    Err(ValidationError::Pattern {
                        field: self.name,
                        value: value.to_string(),
                        pattern,
                    })
                }
            }
            Validator::Date(format) => {
                if self.inclusion == Inclusion::Optional && value.trim().is_empty() {
                    return Ok(());
                }
                NaiveDate::parse_from_str(value, format).map(|_| ()).map_err(|_| {
                    ValidationError::DateFormat {
                        field: self.name,
                        value: value.to_string(),
                        format,
                    }
                })
            }
            Validator::Time(format) => {
                if self.inclusion == Inclusion::Optional && value.trim().is_empty() {
                    return Ok(());
                }
                NaiveTime::parse_from_str(value, format).map(|_| ()).map_err(|_| {
                    ValidationError::DateFormat {
                        field: self.name,
                        value: value.to_string(),
                        format,
                    }
                })
            }
            Validator::OneOf(allowed) => {
                if allowed.contains(&value) {
                    Ok(())
                } else {
                    Err(ValidationError::NotInSet {
                        field: self.name,
                        value: value.to_string(),
                        allowed,
                    })
                }
            }
        }
    }

    /// Upper-cases a value and pads it to the declared width.
    ///
    /// Padding is idempotent: applying it to already-padded content
    /// produces the same string.
    pub fn pad(&self, value: &str) -> String {
        let value = value.to_ascii_uppercase();
        if value.len() >= self.width {
            return value;
        }
        match self.padding {
            Padding::None => value,
            Padding::SpaceRight => format!("{:<width$}", value, width = self.width),
            Padding::ZeroLeft => format!("{:0>width$}", value, width = self.width),
        }
    }
}

/// Value supplied to a record constructor for one named field.
///
/// Mirrors the inputs the format calls for: plain text, a timestamp for
/// date-derived fields, or an exact decimal dollar amount.
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Date(NaiveDateTime),
    Amount(Decimal),
}

impl FieldValue {
    /// Renders the value as field text; dates use the interchange `yymmdd`
    /// form unless the consuming constructor formats them itself.
    pub fn into_text(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Date(d) => d.format("%y%m%d").to_string(),
            FieldValue::Amount(a) => a.to_string(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::Date(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Amount(value)
    }
}

/// Local wall-clock timestamp used for date defaults.
pub(crate) fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Returns the compiled regex for a static pattern, compiling it at most
/// once per process.
fn compiled(pattern: &'static str) -> Regex {
    static CACHE: OnceLock<Mutex<HashMap<&'static str, Regex>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut map = cache.lock().unwrap_or_else(PoisonError::into_inner);
    map.entry(pattern)
        // Safety: every pattern is a compile-time literal from a field table
        .or_insert_with(|| Regex::new(pattern).expect("static field pattern"))
        .clone()
}
