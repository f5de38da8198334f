//! End-to-end construction tests: files built programmatically must
//! serialize to the recorded golden output.

use ach_codec::{batch_header, entry_detail, file_header};
use ach_codec::{Batch, BatchHeader, EntryDetail, File, FileHeader};
use chrono::{NaiveDate, NaiveDateTime};

const SINGLE_ENTRY: &str = include_str!("data/single_entry.ach");
const MULTI_BATCH: &str = include_str!("data/multi_batch.ach");

fn timestamp(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2018, 5, 29)
        .expect("valid date")
        .and_hms_opt(h, m, s)
        .expect("valid time")
}

fn file_header() -> FileHeader {
    FileHeader::new(vec![
        (file_header::IMMEDIATE_DESTINATION, " 123456789".into()),
        (file_header::IMMEDIATE_ORIGIN, "0123456789".into()),
        (
            file_header::IMMEDIATE_DESTINATION_NAME,
            "abcdefg0123456789".into(),
        ),
        (
            file_header::IMMEDIATE_ORIGIN_NAME,
            "abcdefg9876543210".into(),
        ),
        (file_header::FILE_DATE, timestamp(15, 19, 45).into()),
    ])
    .expect("valid file header")
}

fn batch_header() -> BatchHeader {
    BatchHeader::new(vec![
        (
            batch_header::SERVICE_CLASS_CODE,
            batch_header::MIXED_SERVICE_CLASS.into(),
        ),
        (batch_header::COMPANY_NAME, "A Real Company".into()),
        (batch_header::DISCRETIONARY_DATA, "A Real Description".into()),
        (batch_header::COMPANY_ID, "0123456789".into()),
        (
            batch_header::STANDARD_ENTRY_CLASS_CODE,
            batch_header::SEC_PPD.into(),
        ),
        (batch_header::COMPANY_ENTRY_DESCRIPTION, "Payroll".into()),
        (batch_header::ORIGINATING_DFI_ID, "87654321".into()),
        (batch_header::BATCH_NUMBER, "1".into()),
        (batch_header::ENTRY_DATE_OVERRIDE, timestamp(15, 20, 3).into()),
    ])
    .expect("valid batch header")
}

fn entry(code: &str, amount: &str, sequence: u32) -> EntryDetail {
    EntryDetail::new(
        vec![
            (entry_detail::TRANSACTION_CODE, code.into()),
            (entry_detail::TRANSIT_ABA_NUMBER, "123456789".into()),
            (entry_detail::DFI_ACCOUNT_NUMBER, "01234567891011".into()),
            (entry_detail::AMOUNT, amount.into()),
            (entry_detail::INDIVIDUAL_NAME, "A Valid Company Name".into()),
            (entry_detail::TRACE_NUMBER, "87654321".into()),
        ],
        sequence,
    )
    .expect("valid entry")
}

#[test]
fn test_single_entry_file_matches_golden_output() {
    let mut batch = Batch::new(batch_header());
    batch.add_entry(entry("22", "11.00", 1)).unwrap();
    batch.close().unwrap();

    let mut file = File::new(file_header());
    file.add_batch(batch).unwrap();
    file.close().unwrap();

    assert_eq!(file.encode().unwrap(), SINGLE_ENTRY);
}

#[test]
fn test_multi_batch_file_matches_golden_output() {
    let mut first = Batch::new(batch_header());
    first.add_entry(entry("22", "11.00", 1)).unwrap();
    first.close().unwrap();

    let mut second = Batch::new(batch_header());
    second.add_entry(entry("22", "11.00", 1)).unwrap();
    second.add_entry(entry("22", "11.00", 2)).unwrap();
    second.add_entry(entry("27", "15.00", 3)).unwrap();
    second.close().unwrap();

    let mut file = File::new(file_header());
    file.add_batch(first).unwrap();
    file.add_batch(second).unwrap();
    file.close().unwrap();

    assert_eq!(file.encode().unwrap(), MULTI_BATCH);
}

#[test]
fn test_built_file_round_trips_through_the_parser() {
    let mut batch = Batch::new(batch_header());
    batch.add_entry(entry("22", "11.00", 1)).unwrap();
    batch.add_entry(entry("27", "12.34", 2)).unwrap();
    batch.close().unwrap();

    let mut file = File::new(file_header());
    file.add_batch(batch).unwrap();
    file.close().unwrap();

    let encoded = file.encode().unwrap();
    let parsed = File::build_from_stream(encoded.as_bytes()).unwrap();
    assert_eq!(parsed.encode().unwrap(), encoded);

    let totals = parsed.totals().unwrap();
    assert_eq!(totals.credit_cents, 1100);
    assert_eq!(totals.debit_cents, 1234);
}
