//! File header record (type code `1`): opens a payment file and names the
//! immediate origin and destination points.

use crate::error::Error;
use crate::field::{FieldDef, FieldValue, Inclusion, Padding, Validator};
use crate::record::{ach_record, Record, RecordSpec};

pub const RECORD_TYPE_CODE: &str = "RECORD_TYPE_CODE";
pub const PRIORITY_CODE: &str = "PRIORITY_CODE";
pub const IMMEDIATE_DESTINATION: &str = "IMMEDIATE_DESTINATION";
pub const IMMEDIATE_ORIGIN: &str = "IMMEDIATE_ORIGIN";
pub const FILE_CREATION_DATE: &str = "FILE_CREATION_DATE";
pub const FILE_CREATION_TIME: &str = "FILE_CREATION_TIME";
pub const FILE_ID_MODIFIER: &str = "FILE_ID_MODIFIER";
pub const RECORD_SIZE: &str = "RECORD_SIZE";
pub const BLOCKING_FACTOR: &str = "BLOCKING_FACTOR";
pub const FORMAT_CODE: &str = "FORMAT_CODE";
pub const IMMEDIATE_DESTINATION_NAME: &str = "IMMEDIATE_DESTINATION_NAME";
pub const IMMEDIATE_ORIGIN_NAME: &str = "IMMEDIATE_ORIGIN_NAME";
pub const REFERENCE_CODE: &str = "REFERENCE_CODE";

/// Pseudo-field consumed by [`FileHeader::new`]: a single timestamp that
/// derives both the file creation date and the file creation time.
pub const FILE_DATE: &str = "FILE_DATE";

pub static SPEC: RecordSpec = RecordSpec {
    name: "file header record",
    type_code: '1',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^1$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("1"),
        },
        FieldDef {
            name: PRIORITY_CODE,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^01$"),
            width: 2,
            start: 2,
            padding: Padding::None,
            fixed: Some("01"),
        },
        FieldDef {
            name: IMMEDIATE_DESTINATION,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^ \d{9}$"),
            width: 10,
            start: 4,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: IMMEDIATE_ORIGIN,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{10}$"),
            width: 10,
            start: 14,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: FILE_CREATION_DATE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Date("%y%m%d"),
            width: 6,
            start: 24,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: FILE_CREATION_TIME,
            inclusion: Inclusion::Optional,
            validator: Validator::Time("%H%M"),
            width: 4,
            start: 30,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: FILE_ID_MODIFIER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^[A-Z]$"),
            width: 1,
            start: 34,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: RECORD_SIZE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^094$"),
            width: 3,
            start: 35,
            padding: Padding::None,
            fixed: Some("094"),
        },
        FieldDef {
            name: BLOCKING_FACTOR,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^10$"),
            width: 2,
            start: 38,
            padding: Padding::None,
            fixed: Some("10"),
        },
        FieldDef {
            name: FORMAT_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^1$"),
            width: 1,
            start: 40,
            padding: Padding::None,
            fixed: Some("1"),
        },
        FieldDef {
            name: IMMEDIATE_DESTINATION_NAME,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,23}$"),
            width: 23,
            start: 41,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: IMMEDIATE_ORIGIN_NAME,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,23}$"),
            width: 23,
            start: 64,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: REFERENCE_CODE,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{0,8}$"),
            width: 8,
            start: 87,
            padding: Padding::SpaceRight,
            fixed: None,
        },
    ],
    required: &[
        IMMEDIATE_DESTINATION,
        IMMEDIATE_ORIGIN,
        IMMEDIATE_DESTINATION_NAME,
        IMMEDIATE_ORIGIN_NAME,
    ],
};

ach_record!(
    /// The single header record of a payment file.
    FileHeader,
    &SPEC
);

impl FileHeader {
    /// Builds a file header from named field values.
    ///
    /// The pseudo-field [`FILE_DATE`] supplies one timestamp from which the
    /// creation date (`yymmdd`) and time (`HHMM`) both derive; it defaults
    /// to now. The file ID modifier defaults to `A`.
    pub fn new(fields: Vec<(&'static str, FieldValue)>) -> Result<Self, Error> {
        let mut file_date = None;
        let mut rest = Vec::with_capacity(fields.len() + 2);
        for (name, value) in fields {
            match (name, value) {
                (FILE_DATE, FieldValue::Date(date)) => file_date = Some(date),
                (FILE_DATE, other) => {
                    return Err(crate::error::ValidationError::DateFormat {
                        field: FILE_DATE,
                        value: other.into_text(),
                        format: "%y%m%d %H%M",
                    }
                    .into())
                }
                (name, value) => rest.push((name, value)),
            }
        }

        let date = file_date.unwrap_or_else(crate::field::now);
        if !rest.iter().any(|(name, _)| *name == FILE_CREATION_DATE) {
            rest.push((FILE_CREATION_DATE, date.format("%y%m%d").to_string().into()));
        }
        if !rest.iter().any(|(name, _)| *name == FILE_CREATION_TIME) {
            rest.push((FILE_CREATION_TIME, date.format("%H%M").to_string().into()));
        }
        if !rest.iter().any(|(name, _)| *name == FILE_ID_MODIFIER) {
            rest.push((FILE_ID_MODIFIER, "A".into()));
        }

        Ok(Self {
            record: Record::build(&SPEC, rest)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn creation_date() -> NaiveDateTime {
        // Safety: literal calendar values
        NaiveDate::from_ymd_opt(2018, 5, 29)
            .expect("valid date")
            .and_hms_opt(15, 19, 45)
            .expect("valid time")
    }

    fn build_header() -> FileHeader {
        FileHeader::new(vec![
            (IMMEDIATE_DESTINATION, " 123456789".into()),
            (IMMEDIATE_ORIGIN, "0123456789".into()),
            (IMMEDIATE_DESTINATION_NAME, "abcdefg0123456789".into()),
            (IMMEDIATE_ORIGIN_NAME, "abcdefg9876543210".into()),
            (FILE_DATE, creation_date().into()),
        ])
        .unwrap()
    }

    #[test]
    fn test_serializes_to_golden_line() {
        assert_eq!(
            build_header().to_line(),
            "101 12345678901234567891805291519A094101ABCDEFG0123456789      \
             ABCDEFG9876543210              "
        );
    }

    #[test]
    fn test_file_date_derives_date_and_time() {
        let header = build_header();
        assert_eq!(header.get(FILE_CREATION_DATE).unwrap(), "180529");
        assert_eq!(header.get(FILE_CREATION_TIME).unwrap(), "1519");
    }

    #[test]
    fn test_file_id_modifier_defaults_to_a() {
        assert_eq!(build_header().get(FILE_ID_MODIFIER).unwrap(), "A");
    }

    #[test]
    fn test_file_id_modifier_can_be_overridden() {
        let header = FileHeader::new(vec![
            (IMMEDIATE_DESTINATION, " 123456789".into()),
            (IMMEDIATE_ORIGIN, "0123456789".into()),
            (IMMEDIATE_DESTINATION_NAME, "abcdefg0123456789".into()),
            (IMMEDIATE_ORIGIN_NAME, "abcdefg9876543210".into()),
            (FILE_ID_MODIFIER, "B".into()),
        ])
        .unwrap();
        assert_eq!(header.get(FILE_ID_MODIFIER).unwrap(), "B");
    }

    #[test]
    fn test_missing_required_fields_are_enumerated() {
        let err = FileHeader::new(vec![]).unwrap_err();
        match err {
            crate::error::Error::Structural(
                crate::error::StructuralError::MissingFields { fields, .. },
            ) => {
                assert_eq!(
                    fields,
                    vec![
                        IMMEDIATE_DESTINATION,
                        IMMEDIATE_ORIGIN,
                        IMMEDIATE_DESTINATION_NAME,
                        IMMEDIATE_ORIGIN_NAME,
                    ]
                );
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn test_destination_requires_leading_space() {
        let err = FileHeader::new(vec![
            (IMMEDIATE_DESTINATION, "123456789".into()),
            (IMMEDIATE_ORIGIN, "0123456789".into()),
            (IMMEDIATE_DESTINATION_NAME, "dest".into()),
            (IMMEDIATE_ORIGIN_NAME, "origin".into()),
        ])
        .unwrap_err();
        assert!(matches!(err, crate::error::Error::Validation(_)));
    }

    #[test]
    fn test_from_line_round_trips() {
        let line = build_header().to_line();
        let parsed = FileHeader::from_line(&line).unwrap();
        assert_eq!(parsed.to_line(), line);
    }
}
