//! Entry detail record (type code `6`): one credit or debit against one
//! receiver account, optionally carrying a single addenda record.

use crate::addenda::Addenda;
use crate::collection::Component;
use crate::error::{Error, LifecycleError, StructuralError, ValidationError};
use crate::field::{FieldDef, FieldValue, Inclusion, Padding, Validator};
use crate::record::{Record, RecordSpec};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

pub const RECORD_TYPE_CODE: &str = "RECORD_TYPE_CODE";
pub const TRANSACTION_CODE: &str = "TRANSACTION_CODE";
pub const TRANSIT_ABA_NUMBER: &str = "TRANSIT_ABA_NUMBER";
pub const CHECK_DIGIT: &str = "CHECK_DIGIT";
pub const DFI_ACCOUNT_NUMBER: &str = "DFI_ACCOUNT_NUMBER";
pub const AMOUNT: &str = "AMOUNT";
pub const ID_NUMBER: &str = "ID_NUMBER";
pub const INDIVIDUAL_NAME: &str = "INDIVIDUAL_NAME";
pub const DRAFT_INDICATOR: &str = "DRAFT_INDICATOR";
pub const ADDENDA_INDICATOR: &str = "ADDENDA_INDICATOR";
pub const TRACE_NUMBER: &str = "TRACE_NUMBER";

/// Transaction codes that move money into the receiver's account.
pub static CREDIT_TRANSACTION_CODES: [&str; 6] = ["22", "23", "24", "32", "33", "34"];
/// Transaction codes that move money out of the receiver's account.
pub static DEBIT_TRANSACTION_CODES: [&str; 6] = ["27", "28", "29", "37", "38", "39"];

static ALL_TRANSACTION_CODES: [&str; 12] = [
    "22", "23", "24", "32", "33", "34", "27", "28", "29", "37", "38", "39",
];

pub static SPEC: RecordSpec = RecordSpec {
    name: "entry detail record",
    type_code: '6',
    fields: &[
        FieldDef {
            name: RECORD_TYPE_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^6$"),
            width: 1,
            start: 1,
            padding: Padding::None,
            fixed: Some("6"),
        },
        FieldDef {
            name: TRANSACTION_CODE,
            inclusion: Inclusion::Mandatory,
            validator: Validator::OneOf(&ALL_TRANSACTION_CODES),
            width: 2,
            start: 2,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TRANSIT_ABA_NUMBER,
            inclusion: Inclusion::Mandatory,
            // split transits with a leading zero arrive short of 8 digits
            validator: Validator::Pattern(r"^\d{1,8}$"),
            width: 8,
            start: 4,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: CHECK_DIGIT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d$"),
            width: 1,
            start: 12,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: DFI_ACCOUNT_NUMBER,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^[-a-zA-Z0-9 ]{1,17}$"),
            width: 17,
            start: 13,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: AMOUNT,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,10}$"),
            width: 10,
            start: 30,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: ID_NUMBER,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^[-a-zA-Z0-9 ]{0,15}$"),
            width: 15,
            start: 40,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: INDIVIDUAL_NAME,
            inclusion: Inclusion::Required,
            validator: Validator::Pattern(r"^[a-zA-Z0-9 ]{1,22}$"),
            width: 22,
            start: 55,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: DRAFT_INDICATOR,
            inclusion: Inclusion::Optional,
            validator: Validator::Pattern(r"^((1[?*])|  )?$"),
            width: 2,
            start: 77,
            padding: Padding::SpaceRight,
            fixed: None,
        },
        FieldDef {
            name: ADDENDA_INDICATOR,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^[01]$"),
            width: 1,
            start: 79,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
        FieldDef {
            name: TRACE_NUMBER,
            inclusion: Inclusion::Mandatory,
            validator: Validator::Pattern(r"^\d{1,15}$"),
            width: 15,
            start: 80,
            padding: Padding::ZeroLeft,
            fixed: None,
        },
    ],
    required: &[
        TRANSACTION_CODE,
        TRANSIT_ABA_NUMBER,
        DFI_ACCOUNT_NUMBER,
        AMOUNT,
        INDIVIDUAL_NAME,
        TRACE_NUMBER,
    ],
};

/// One entry detail record and the addenda record it exclusively owns,
/// if any.
#[derive(Debug, Clone)]
pub struct EntryDetail {
    record: Record,
    addenda: Option<Addenda>,
}

impl EntryDetail {
    /// Builds an entry from named field values and its sequence number
    /// within the batch.
    ///
    /// Three fields are derived rather than taken verbatim:
    /// - [`TRANSIT_ABA_NUMBER`] accepts the full 9-digit transit number and
    ///   is split into the 8-digit ABA number and its trailing check digit.
    /// - [`AMOUNT`] accepts decimal dollars (as [`FieldValue::Amount`] or
    ///   text) and is converted to integer cents, truncating any precision
    ///   beyond the cent.
    /// - [`TRACE_NUMBER`] accepts the 8-digit originating DFI ID; the trace
    ///   is the DFI ID followed by the zero-padded sequence number.
    pub fn new(fields: Vec<(&'static str, FieldValue)>, sequence: u32) -> Result<Self, Error> {
        let mut prepared = Vec::with_capacity(fields.len() + 2);
        for (name, value) in fields {
            match name {
                TRANSIT_ABA_NUMBER => {
                    let text = value.into_text();
                    let transit = parse_numeric(TRANSIT_ABA_NUMBER, &text)?;
                    prepared.push((TRANSIT_ABA_NUMBER, (transit / 10).to_string().into()));
                    prepared.push((CHECK_DIGIT, (transit % 10).to_string().into()));
                }
                AMOUNT => {
                    let cents = match value {
                        FieldValue::Amount(amount) => dollars_to_cents(amount)?,
                        other => {
                            let text = other.into_text();
                            let amount = Decimal::from_str(text.trim()).map_err(|_| {
                                ValidationError::NotNumeric {
                                    field: AMOUNT,
                                    value: text.clone(),
                                }
                            })?;
                            dollars_to_cents(amount)?
                        }
                    };
                    prepared.push((AMOUNT, cents.to_string().into()));
                }
                TRACE_NUMBER => {
                    let text = value.into_text();
                    // exactly 8 digits keeps the composed trace inside u64
                    // and the 15-character field
                    if text.trim().len() != 8 {
                        return Err(ValidationError::Pattern {
                            field: TRACE_NUMBER,
                            value: text,
                            pattern: r"^\d{8}$",
                        }
                        .into());
                    }
                    let odfi = parse_numeric(TRACE_NUMBER, &text)?;
                    let trace = odfi * 10_000_000 + u64::from(sequence);
                    prepared.push((TRACE_NUMBER, trace.to_string().into()));
                }
                name => prepared.push((name, value)),
            }
        }
        if !prepared.iter().any(|(name, _)| *name == ADDENDA_INDICATOR) {
            prepared.push((ADDENDA_INDICATOR, "0".into()));
        }

        Ok(EntryDetail {
            record: Record::build(&SPEC, prepared)?,
            addenda: None,
        })
    }

    /// Reconstructs an entry from a serialized 94-character line, with no
    /// addenda attached yet. Field validation is bypassed; reject files
    /// carry traces such as `REJ0603...` that would never validate.
    pub fn from_line(line: &str) -> Result<Self, StructuralError> {
        Ok(EntryDetail {
            record: Record::from_line(&SPEC, line)?,
            addenda: None,
        })
    }

    /// Attaches the entry's single addenda record and flips the addenda
    /// indicator to `1`.
    pub fn attach_addenda(&mut self, addenda: Addenda) -> Result<(), Error> {
        self.record.set_field(ADDENDA_INDICATOR, "1")?;
        self.addenda = Some(addenda);
        Ok(())
    }

    /// Stores an addenda parsed from the stream; the indicator on the
    /// parsed line already announced it.
    pub(crate) fn set_parsed_addenda(&mut self, addenda: Addenda) {
        self.addenda = Some(addenda);
    }

    pub fn addenda(&self) -> Option<&Addenda> {
        self.addenda.as_ref()
    }

    /// Whether the serialized addenda indicator announces an addenda line.
    pub fn has_addenda_indicator(&self) -> bool {
        self.record.content(ADDENDA_INDICATOR) == "1"
    }

    /// Validates and sets a single field by name.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.record.set_field(name, value)
    }

    /// Returns the padded content of a field by name.
    pub fn get(&self, name: &str) -> Result<&str, StructuralError> {
        self.record.get(name)
    }

    pub fn transaction_code(&self) -> &str {
        self.record.content(TRANSACTION_CODE)
    }

    pub fn trace_number(&self) -> &str {
        self.record.content(TRACE_NUMBER)
    }

    /// The amount in integer cents. Non-numeric content, possible only on
    /// records sliced from reject files, counts as zero.
    pub fn amount_cents(&self) -> u64 {
        self.record.numeric_content(AMOUNT).unwrap_or(0)
    }

    /// The 8-digit ABA number as an integer, for entry-hash aggregation.
    /// Non-numeric content counts as zero.
    pub fn transit_aba_number(&self) -> u64 {
        self.record.numeric_content(TRANSIT_ABA_NUMBER).unwrap_or(0)
    }

    /// Serialized entry line, excluding any attached addenda line.
    pub fn to_line(&self) -> String {
        self.record.to_line()
    }
}

impl Component for EntryDetail {
    fn block_count(&self) -> u64 {
        1 + u64::from(self.addenda.is_some())
    }

    fn entry_and_addenda_count(&self) -> u64 {
        self.block_count()
    }

    fn transit_sum(&self) -> u64 {
        self.transit_aba_number()
    }

    fn dollar_sum(&self, transaction_codes: &[&str]) -> u64 {
        if transaction_codes.contains(&self.transaction_code()) {
            self.amount_cents()
        } else {
            0
        }
    }

    fn write_lines(&self, out: &mut Vec<String>) -> Result<(), LifecycleError> {
        out.push(self.record.to_line());
        if let Some(addenda) = &self.addenda {
            out.push(addenda.to_line());
        }
        Ok(())
    }
}

impl fmt::Display for EntryDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.record.to_line())
    }
}

fn parse_numeric(field: &'static str, value: &str) -> Result<u64, ValidationError> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| ValidationError::NotNumeric {
            field,
            value: value.to_string(),
        })
}

/// Converts decimal dollars to integer cents, truncating precision beyond
/// the cent. Negative amounts are rejected; direction is carried by the
/// transaction code.
fn dollars_to_cents(amount: Decimal) -> Result<u64, ValidationError> {
    amount
        .checked_mul(Decimal::from(100))
        .and_then(|cents| cents.trunc().to_u64())
        .ok_or_else(|| ValidationError::NotNumeric {
            field: AMOUNT,
            value: amount.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addenda::{self, Addenda};

    fn build_entry() -> EntryDetail {
        EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "22".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "01234567891011".into()),
                (AMOUNT, "11.00".into()),
                (INDIVIDUAL_NAME, "A Valid Company Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_serializes_to_golden_line() {
        assert_eq!(
            build_entry().to_line(),
            "62211300002301234567891011   0000001100               \
             A VALID COMPANY NAME    0876543210000001"
        );
    }

    #[test]
    fn test_transit_number_splits_into_aba_and_check_digit() {
        let entry = build_entry();
        assert_eq!(entry.get(TRANSIT_ABA_NUMBER).unwrap(), "11300002");
        assert_eq!(entry.get(CHECK_DIGIT).unwrap(), "3");
    }

    #[test]
    fn test_leading_zero_transit_number_keeps_its_width() {
        let entry = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "22".into()),
                (TRANSIT_ABA_NUMBER, "011302742".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "1.00".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            1,
        )
        .unwrap();
        assert_eq!(entry.get(TRANSIT_ABA_NUMBER).unwrap(), "01130274");
        assert_eq!(entry.get(CHECK_DIGIT).unwrap(), "2");
    }

    #[test]
    fn test_amount_truncates_beyond_the_cent() {
        let entry = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "27"),
                (TRANSIT_ABA_NUMBER, "113000023"),
                (DFI_ACCOUNT_NUMBER, "1"),
                (AMOUNT, "15.019"),
                (INDIVIDUAL_NAME, "Name"),
                (TRACE_NUMBER, "87654321"),
            ]
            .into_iter()
            .map(|(name, value)| (name, value.into()))
            .collect(),
            1,
        )
        .unwrap();
        assert_eq!(entry.amount_cents(), 1501);
        assert_eq!(entry.get(AMOUNT).unwrap(), "0000001501");
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let err = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "27".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "-1.00".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            1,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_trace_number_appends_sequence_to_odfi() {
        let entry = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "22".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "1.00".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            42,
        )
        .unwrap();
        assert_eq!(entry.trace_number(), "876543210000042");
    }

    #[test]
    fn test_trace_odfi_must_be_exactly_eight_digits() {
        let err = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "22".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "1.00".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "9999999999999".into()),
            ],
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Pattern {
                field: TRACE_NUMBER,
                ..
            })
        ));
    }

    #[test]
    fn test_amount_too_large_for_cents_is_rejected() {
        // the largest representable decimal cannot survive the ×100 cent
        // conversion
        let err = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "22".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "79228162514264337593543950335".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NotNumeric { field: AMOUNT, .. })
        ));
    }

    #[test]
    fn test_rejects_transaction_code_outside_the_set() {
        let err = EntryDetail::new(
            vec![
                (TRANSACTION_CODE, "21".into()),
                (TRANSIT_ABA_NUMBER, "113000023".into()),
                (DFI_ACCOUNT_NUMBER, "1".into()),
                (AMOUNT, "1.00".into()),
                (INDIVIDUAL_NAME, "Name".into()),
                (TRACE_NUMBER, "87654321".into()),
            ],
            1,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::NotInSet { .. })
        ));
    }

    #[test]
    fn test_attaching_addenda_sets_the_indicator() {
        let mut entry = build_entry();
        assert!(!entry.has_addenda_indicator());
        assert_eq!(entry.block_count(), 1);

        let addenda = Addenda::new_return_entry(vec![
            (addenda::RETURN_REASON_CODE, "R01".into()),
            (addenda::ORIGINAL_ENTRY_TRACE_NUMBER, "111000020000001".into()),
            (addenda::ORIGINAL_RECEIVING_DFI_ID, "11100002".into()),
            (addenda::TRACE_NUMBER, "111000020000001".into()),
        ])
        .unwrap();
        entry.attach_addenda(addenda).unwrap();

        assert!(entry.has_addenda_indicator());
        assert_eq!(entry.block_count(), 2);
        assert_eq!(entry.entry_and_addenda_count(), 2);
    }

    #[test]
    fn test_dollar_sum_honors_the_transaction_code_set() {
        let entry = build_entry();
        assert_eq!(entry.dollar_sum(&CREDIT_TRANSACTION_CODES), 1100);
        assert_eq!(entry.dollar_sum(&DEBIT_TRANSACTION_CODES), 0);
    }

    #[test]
    fn test_parsed_reject_trace_counts_zero_toward_sums() {
        let mut line = build_entry().to_line();
        line.replace_range(79..94, "REJ060300000001");
        let entry = EntryDetail::from_line(&line).unwrap();
        assert_eq!(entry.trace_number(), "REJ060300000001");
        assert_eq!(entry.amount_cents(), 1100);
    }

    #[test]
    fn test_from_line_round_trips() {
        let line = build_entry().to_line();
        let parsed = EntryDetail::from_line(&line).unwrap();
        assert_eq!(parsed.to_line(), line);
    }
}
