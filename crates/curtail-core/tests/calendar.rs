// crates/curtail-core/tests/calendar.rs
// ============================================================================
// Module: Calendar Conversion Tests
// Description: Date string and day index conversion tests.
// Purpose: Ensure the single-year calendar maps dates onto contiguous indices.
// Dependencies: curtail-core, proptest, serde_json
// ============================================================================
//! ## Overview
//! Validates sentinel conversions, typed date parsing, and the round-trip law
//! over the whole modeled range.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use curtail_core::CalendarDate;
use curtail_core::CalendarError;
use curtail_core::EPOCH;
use curtail_core::INVALID_INDEX;
use curtail_core::LAST_INDEX;
use curtail_core::OUT_OF_RANGE;
use curtail_core::date_to_index;
use curtail_core::index_to_date;
use curtail_core::month_length;
use proptest::prelude::*;

// ============================================================================
// SECTION: Date To Index
// ============================================================================

#[test]
fn epoch_maps_to_zero() {
    assert_eq!(date_to_index("1404/09/28"), 0);
    assert_eq!(EPOCH.to_index(), 0);
    assert_eq!(EPOCH.day_of_year(), 274);
}

#[test]
fn dash_separators_are_normalized() {
    assert_eq!(date_to_index("1404-10-15"), date_to_index("1404/10/15"));
    assert_eq!(date_to_index("1404-10-15"), 17);
}

#[test]
fn month_boundaries_follow_length_rule() {
    assert_eq!(date_to_index("1404/09/30"), 2);
    assert_eq!(date_to_index("1404/10/01"), 3);
    assert_eq!(date_to_index("1404/11/01"), 33);
    assert_eq!(date_to_index("1404/12/01"), 63);
    assert_eq!(date_to_index("1404/12/29"), LAST_INDEX);
}

#[test]
fn dates_before_epoch_are_negative() {
    assert_eq!(date_to_index("1404/09/27"), -1);
    assert_eq!(date_to_index("1404/01/01"), -273);
    assert_eq!(date_to_index("1404/07/01"), -87);
}

#[test]
fn unparseable_input_returns_sentinel() {
    for input in ["", "1404/09", "1404/09/28/01", "abcd/09/28", "1404/9x/28", "1404//28", "today"] {
        assert_eq!(date_to_index(input), INVALID_INDEX, "input {input:?}");
    }
}

#[test]
fn unknown_month_returns_sentinel() {
    assert_eq!(date_to_index("1404/13/01"), INVALID_INDEX);
    assert_eq!(date_to_index("1404/00/10"), INVALID_INDEX);
}

#[test]
fn unpadded_parts_are_accepted_leniently() {
    assert_eq!(date_to_index("1404/9/28"), 0);
    assert_eq!(date_to_index(" 1404/10/1 "), 3);
}

// ============================================================================
// SECTION: Index To Date
// ============================================================================

#[test]
fn index_walk_crosses_months() {
    assert_eq!(index_to_date(0), "1404/09/28");
    assert_eq!(index_to_date(2), "1404/09/30");
    assert_eq!(index_to_date(3), "1404/10/01");
    assert_eq!(index_to_date(32), "1404/10/30");
    assert_eq!(index_to_date(33), "1404/11/01");
    assert_eq!(index_to_date(62), "1404/11/30");
    assert_eq!(index_to_date(63), "1404/12/01");
    assert_eq!(index_to_date(91), "1404/12/29");
}

#[test]
fn index_past_year_end_is_out_of_range() {
    assert_eq!(index_to_date(LAST_INDEX + 1), OUT_OF_RANGE);
    assert_eq!(index_to_date(10_000), OUT_OF_RANGE);
}

#[test]
fn negative_index_is_out_of_range() {
    assert_eq!(index_to_date(-1), OUT_OF_RANGE);
    assert_eq!(index_to_date(i64::MIN), OUT_OF_RANGE);
    assert!(CalendarDate::from_index(-5).is_none());
}

#[test]
fn round_trip_covers_modeled_range() {
    for index in 0 ..= LAST_INDEX {
        assert_eq!(date_to_index(&index_to_date(index)), index, "index {index}");
    }
}

#[test]
fn typed_dates_are_monotonic() {
    for index in 0 .. LAST_INDEX {
        let earlier = CalendarDate::from_index(index).unwrap();
        let later = CalendarDate::from_index(index + 1).unwrap();
        assert!(earlier < later, "{earlier} !< {later}");
    }
}

// ============================================================================
// SECTION: Typed Dates
// ============================================================================

#[test]
fn parse_accepts_canonical_forms() {
    let date = CalendarDate::parse("1404-10-15").unwrap();
    assert_eq!(date.to_string(), "1404/10/15");
    assert_eq!((date.year(), date.month(), date.day()), (1404, 10, 15));
    assert_eq!("1404/10/15".parse::<CalendarDate>().unwrap(), date);
}

#[test]
fn parse_rejects_invalid_dates() {
    assert!(matches!(CalendarDate::parse("1404/9/28"), Err(CalendarError::Malformed(_))));
    assert!(matches!(CalendarDate::parse("14040/09/28"), Err(CalendarError::Malformed(_))));
    assert!(matches!(CalendarDate::parse("+404/09/28"), Err(CalendarError::Malformed(_))));
    assert_eq!(
        CalendarDate::parse("1403/09/28"),
        Err(CalendarError::UnsupportedYear {
            year: 1403
        })
    );
    assert_eq!(
        CalendarDate::parse("1404/13/01"),
        Err(CalendarError::MonthOutOfRange {
            month: 13
        })
    );
    assert_eq!(
        CalendarDate::parse("1404/12/30"),
        Err(CalendarError::DayOutOfRange {
            month: 12,
            day: 30
        })
    );
    assert_eq!(
        CalendarDate::parse("1404/07/00"),
        Err(CalendarError::DayOutOfRange {
            month: 7,
            day: 0
        })
    );
}

#[test]
fn serde_uses_canonical_string() {
    let date = CalendarDate::new(1404, 9, 28).unwrap();
    assert_eq!(serde_json::to_string(&date).unwrap(), "\"1404/09/28\"");
    let parsed: CalendarDate = serde_json::from_str("\"1404/11/02\"").unwrap();
    assert_eq!(parsed.to_index(), 34);
    assert!(serde_json::from_str::<CalendarDate>("\"1404/11/31\"").is_err());
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn any_index_round_trips_or_is_out_of_range(index in -500_i64 .. 500) {
        let rendered = index_to_date(index);
        if (0 ..= LAST_INDEX).contains(&index) {
            prop_assert_eq!(date_to_index(&rendered), index);
        } else {
            prop_assert_eq!(rendered, OUT_OF_RANGE);
        }
    }

    #[test]
    fn sentinel_and_typed_conversions_agree(month in 1_u8 ..= 12, day in 1_u8 ..= 31) {
        prop_assume!(month_length(month).is_some_and(|length| day <= length));
        let date = CalendarDate::new(1404, month, day).unwrap();
        prop_assert_eq!(date_to_index(&date.to_string()), date.to_index());
    }

    #[test]
    fn arbitrary_text_never_panics(input in ".{0,24}") {
        let _ = date_to_index(&input);
        let _ = CalendarDate::parse(&input);
    }
}
