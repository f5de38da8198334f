//! Generic record engine driven by static field tables.
//!
//! A [`Record`] owns the current contents for every field declared in its
//! [`RecordSpec`]. Construction from named values validates and pads each
//! supplied value; construction from a serialized 94-character line slices
//! each field by its declared position and bypasses validation, since the
//! line is trusted to have been valid when it was produced.

use crate::error::{Error, StructuralError, ValidationError};
use crate::field::{FieldDef, FieldValue};
use std::fmt;

/// Static specification of one record type: its name (for error messages),
/// leading record type code, ordered field table, and required field names.
#[derive(Debug)]
pub struct RecordSpec {
    pub name: &'static str,
    pub type_code: char,
    pub fields: &'static [FieldDef],
    pub required: &'static [&'static str],
}

impl RecordSpec {
    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// One concrete 94-character record: a spec plus the current padded,
/// upper-cased content of every field, in declared order.
#[derive(Debug, Clone)]
pub struct Record {
    spec: &'static RecordSpec,
    contents: Vec<String>,
}

impl Record {
    /// Creates a record with fixed literals in place and every other field
    /// at its padded empty value, so the 94-character invariant holds from
    /// the start.
    fn empty(spec: &'static RecordSpec) -> Self {
        let contents = spec
            .fields
            .iter()
            .map(|f| match f.fixed {
                Some(literal) => literal.to_string(),
                None => f.pad(""),
            })
            .collect();
        Record { spec, contents }
    }

    /// Builds a record from named field values, validating each one.
    ///
    /// Required fields missing from `fields` produce a single
    /// [`StructuralError::MissingFields`] naming every absent field.
    /// Supplied names that are not part of the specification are silently
    /// dropped.
    pub fn build(
        spec: &'static RecordSpec,
        fields: Vec<(&'static str, FieldValue)>,
    ) -> Result<Self, Error> {
        let missing: Vec<&'static str> = spec
            .required
            .iter()
            .filter(|r| !fields.iter().any(|(name, _)| name == *r))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(StructuralError::MissingFields {
                record: spec.name,
                fields: missing,
            }
            .into());
        }

        let mut record = Record::empty(spec);
        for (name, value) in fields {
            if let Some(index) = spec.index_of(name) {
                record.set_index(index, &value.into_text(), true)?;
            }
        }
        Ok(record)
    }

    /// Reconstructs a record by slicing a previously serialized line.
    ///
    /// The line must be exactly 94 ASCII characters. Field validation is
    /// bypassed; contents are only positioned, padded and upper-cased.
    pub fn from_line(spec: &'static RecordSpec, line: &str) -> Result<Self, StructuralError> {
        if !line.is_ascii() {
            return Err(StructuralError::LineNotAscii { record: spec.name });
        }
        if line.len() != 94 {
            return Err(StructuralError::LineLength {
                record: spec.name,
                found: line.len(),
            });
        }

        let mut record = Record::empty(spec);
        for (index, def) in spec.fields.iter().enumerate() {
            let slice = &line[def.start - 1..def.start - 1 + def.width];
            record.contents[index] = def.pad(slice);
        }
        Ok(record)
    }

    /// Validates and sets a single field by name.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error> {
        match self.spec.index_of(name) {
            Some(index) => self.set_index(index, value, true),
            None => Err(StructuralError::UnknownField {
                record: self.spec.name,
                field: name.to_string(),
            }
            .into()),
        }
    }

    /// Returns the padded content of a field by name.
    pub fn get(&self, name: &str) -> Result<&str, StructuralError> {
        match self.spec.index_of(name) {
            Some(index) => Ok(&self.contents[index]),
            None => Err(StructuralError::UnknownField {
                record: self.spec.name,
                field: name.to_string(),
            }),
        }
    }

    /// Padded content of a field that is known to exist in the layout.
    pub(crate) fn content(&self, name: &'static str) -> &str {
        // Safety: callers pass field name constants declared next to the
        // same layout table, so the lookup cannot miss
        self.get(name).expect("field declared in record layout")
    }

    /// Parses a numeric field's content, reporting a validation error for
    /// non-numeric content (possible on records sliced from reject files).
    pub(crate) fn numeric_content(&self, name: &'static str) -> Result<u64, ValidationError> {
        let content = self.content(name);
        content
            .trim()
            .parse::<u64>()
            .map_err(|_| ValidationError::NotNumeric {
                field: name,
                value: content.to_string(),
            })
    }

    fn set_index(&mut self, index: usize, value: &str, validate: bool) -> Result<(), Error> {
        let def = &self.spec.fields[index];
        if validate {
            def.validate(value)?;
        }
        self.contents[index] = def.pad(value);
        Ok(())
    }

    /// The record's leading type code character.
    pub fn type_code(&self) -> char {
        self.spec.type_code
    }

    /// Concatenation of all field contents in declared order; always
    /// exactly 94 characters.
    pub fn to_line(&self) -> String {
        self.contents.concat()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Declares a typed wrapper around [`Record`] for one record spec: line
/// parsing, get/set-by-name, serialization and `Display`.
macro_rules! ach_record {
    ($(#[$meta:meta])* $name:ident, $spec:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            record: $crate::record::Record,
        }

        impl $name {
            /// Reconstructs this record from a serialized 94-character
            /// line. Field validation is bypassed; the line is trusted.
            pub fn from_line(
                line: &str,
            ) -> Result<Self, $crate::error::StructuralError> {
                Ok(Self {
                    record: $crate::record::Record::from_line($spec, line)?,
                })
            }

            /// Validates and sets a single field by name.
            pub fn set_field(
                &mut self,
                name: &str,
                value: &str,
            ) -> Result<(), $crate::error::Error> {
                self.record.set_field(name, value)
            }

            /// Returns the padded content of a field by name.
            pub fn get(&self, name: &str) -> Result<&str, $crate::error::StructuralError> {
                self.record.get(name)
            }

            /// Serialized 94-character line for this record.
            pub fn to_line(&self) -> String {
                self.record.to_line()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.record.to_line())
            }
        }
    };
}

pub(crate) use ach_record;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Inclusion, Padding, Validator};

    const TEST_SPEC: RecordSpec = RecordSpec {
        name: "test record",
        type_code: '5',
        fields: &[
            FieldDef {
                name: "RECORD_TYPE_CODE",
                inclusion: Inclusion::Mandatory,
                validator: Validator::Pattern(r"^\d$"),
                width: 1,
                start: 1,
                padding: Padding::None,
                fixed: Some("5"),
            },
            FieldDef {
                name: "NAME",
                inclusion: Inclusion::Mandatory,
                validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,50}$"),
                width: 50,
                start: 2,
                padding: Padding::SpaceRight,
                fixed: None,
            },
            FieldDef {
                name: "NUMBER",
                inclusion: Inclusion::Mandatory,
                validator: Validator::Pattern(r"^\d{1,43}$"),
                width: 43,
                start: 52,
                padding: Padding::ZeroLeft,
                fixed: None,
            },
        ],
        required: &["NAME", "NUMBER"],
    };

    fn build_valid() -> Record {
        Record::build(
            &TEST_SPEC,
            vec![("NAME", "example".into()), ("NUMBER", "7".into())],
        )
        .unwrap()
    }

    #[test]
    fn test_line_is_94_characters() {
        assert_eq!(build_valid().to_line().len(), 94);
    }

    #[test]
    fn test_contents_are_uppercased_and_padded() {
        let record = build_valid();
        assert_eq!(record.get("NAME").unwrap(), format!("{:<50}", "EXAMPLE"));
        assert_eq!(record.get("NUMBER").unwrap(), format!("{:0>43}", "7"));
    }

    #[test]
    fn test_missing_required_fields_are_all_reported() {
        let err = Record::build(&TEST_SPEC, vec![]).unwrap_err();
        match err {
            Error::Structural(StructuralError::MissingFields { record, fields }) => {
                assert_eq!(record, "test record");
                assert_eq!(fields, vec!["NAME", "NUMBER"]);
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_fields_are_dropped_at_build() {
        let record = Record::build(
            &TEST_SPEC,
            vec![
                ("NAME", "example".into()),
                ("NUMBER", "7".into()),
                ("NOT_A_FIELD", "ignored".into()),
            ],
        )
        .unwrap();
        assert_eq!(record.to_line().len(), 94);
    }

    #[test]
    fn test_set_unknown_field_is_structural() {
        let mut record = build_valid();
        let err = record.set_field("NOT_A_FIELD", "x").unwrap_err();
        assert!(matches!(
            err,
            Error::Structural(StructuralError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_invalid_value_is_validation() {
        let err = Record::build(
            &TEST_SPEC,
            vec![("NAME", "example".into()), ("NUMBER", "not a number".into())],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_resetting_padded_content_is_a_no_op() {
        let mut record = build_valid();
        let before = record.to_line();
        let padded_name = record.get("NAME").unwrap().to_string();
        record.set_field("NAME", &padded_name).unwrap();
        assert_eq!(record.to_line(), before);
    }

    #[test]
    fn test_from_line_round_trips() {
        let line = build_valid().to_line();
        let parsed = Record::from_line(&TEST_SPEC, &line).unwrap();
        assert_eq!(parsed.to_line(), line);
    }

    #[test]
    fn test_from_line_rejects_wrong_length() {
        let err = Record::from_line(&TEST_SPEC, "5short").unwrap_err();
        assert!(matches!(err, StructuralError::LineLength { found: 6, .. }));
    }

    #[test]
    fn test_from_line_bypasses_validation() {
        // Reject files carry non-numeric content in numeric fields; the
        // trusted parse path must accept them verbatim.
        let mut line = build_valid().to_line();
        line.replace_range(51..94, &format!("{:0>43}", "REJ0603"));
        let parsed = Record::from_line(&TEST_SPEC, &line).unwrap();
        assert_eq!(parsed.to_line(), line);
    }

    #[test]
    fn test_numeric_content_rejects_garbage() {
        let mut line = build_valid().to_line();
        line.replace_range(51..94, &format!("{:<43}", "REJ0603"));
        let parsed = Record::from_line(&TEST_SPEC, &line).unwrap();
        assert!(parsed.numeric_content("NUMBER").is_err());
    }
}
