use std::error::Error as StdError;
use std::time::Duration;

use admin_form_assist::lookup::{
    date::format_date_to_iso,
    error::LookupError,
    lookup_model::{BookingConflict, LookupQuery, LookupResponse, StockValue},
    service::{HttpLookupService, LookupService},
};

fn booking_query(item: &str, start: &str, end: &str) -> LookupQuery {
    LookupQuery::Booking {
        item_id: item.into(),
        start_date: start.into(),
        end_date: end.into(),
    }
}

// =========================================================================
// Date normalization
// =========================================================================

#[test]
fn display_date_becomes_iso() {
    assert_eq!(format_date_to_iso("05.03.2024"), "2024-03-05");
    assert_eq!(format_date_to_iso("31.12.1999"), "1999-12-31");
}

#[test]
fn every_valid_display_date_normalizes() {
    for year in [1999, 2024, 2030] {
        for month in 1..=12 {
            for day in 1..=28 {
                let display = format!("{:02}.{:02}.{}", day, month, year);
                assert_eq!(
                    format_date_to_iso(&display),
                    format!("{}-{:02}-{:02}", year, month, day)
                );
            }
        }
    }
}

#[test]
fn iso_input_is_not_validated() {
    // Already-ISO input has no dots and is passed through as the "day".
    assert_eq!(format_date_to_iso("2024-03-05"), "--2024-03-05");
    assert_eq!(format_date_to_iso("05.03"), "-03-05");
}

// =========================================================================
// Collaborator URLs
// =========================================================================

#[test]
fn stock_url_carries_item_in_query() {
    let service = HttpLookupService::new("http://localhost:8000", None).unwrap();
    let url = service
        .url_for(&LookupQuery::Stock {
            item_id: "42".into(),
        })
        .unwrap();

    assert_eq!(
        url.as_str(),
        "http://localhost:8000/utils/get_item_booking/?item_id=42"
    );
}

#[test]
fn booking_url_carries_item_and_dates_in_path() {
    let service = HttpLookupService::new("http://localhost:8000/", None).unwrap();
    let url = service
        .url_for(&booking_query("10", "2024-05-01", "2024-05-05"))
        .unwrap();

    assert_eq!(
        url.as_str(),
        "http://localhost:8000/utils/check_item_booking/10/2024-05-01/2024-05-05/"
    );
}

#[test]
fn malformed_dates_stay_single_segments() {
    let service = HttpLookupService::new("http://localhost:8000", None).unwrap();
    let url = service
        .url_for(&booking_query("10", "--5/5/2024", "--"))
        .unwrap();

    assert_eq!(
        url.path(),
        "/utils/check_item_booking/10/--5%2F5%2F2024/--/"
    );
}

#[test]
fn base_path_prefix_is_kept() {
    let service = HttpLookupService::new("http://admin.local/warehouse", None).unwrap();
    let url = service
        .url_for(&LookupQuery::Stock {
            item_id: "7".into(),
        })
        .unwrap();

    assert_eq!(url.path(), "/warehouse/utils/get_item_booking/");
}

#[test]
fn item_id_is_encoded() {
    let service = HttpLookupService::new("http://localhost:8000", None).unwrap();
    let url = service
        .url_for(&LookupQuery::Stock {
            item_id: "a b&c".into(),
        })
        .unwrap();

    assert_eq!(url.query(), Some("item_id=a+b%26c"));
}

#[test]
fn unusable_base_url_is_reported() {
    let service = HttpLookupService::new("not a url", None).unwrap();
    let err = service
        .url_for(&LookupQuery::Stock {
            item_id: "1".into(),
        })
        .unwrap_err();
    assert!(matches!(err, LookupError::InvalidUrl { .. }));

    let service = HttpLookupService::new("mailto:stock@example.com", None).unwrap();
    let err = service
        .url_for(&LookupQuery::Stock {
            item_id: "1".into(),
        })
        .unwrap_err();
    assert!(err.to_string().contains("cannot carry a path"));
}

#[test]
fn unreachable_collaborator_is_a_transport_error() {
    let service =
        HttpLookupService::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
    let err = service
        .fetch(&LookupQuery::Stock {
            item_id: "42".into(),
        })
        .unwrap_err();

    assert!(matches!(err, LookupError::Transport { .. }));
    assert!(err.source().is_some());
}

// =========================================================================
// Response decoding
// =========================================================================

#[test]
fn stock_accepts_numbers_and_strings() {
    let query = LookupQuery::Stock {
        item_id: "42".into(),
    };

    let LookupResponse::Stock(info) = LookupResponse::parse(&query, r#"{"stock": 7}"#).unwrap()
    else {
        panic!("Expected stock response");
    };
    assert!(matches!(info.stock, StockValue::Number(_)));
    assert_eq!(info.stock.to_string(), "7");

    let LookupResponse::Stock(info) =
        LookupResponse::parse(&query, r#"{"stock": "12 pcs"}"#).unwrap()
    else {
        panic!("Expected stock response");
    };
    assert_eq!(info.stock, StockValue::Text("12 pcs".into()));
    assert_eq!(info.stock.to_string(), "12 pcs");
}

#[test]
fn bookings_decode_in_order() {
    let query = booking_query("10", "2024-05-01", "2024-05-05");
    let body = r#"{"bookings": [
        {"start_date": "2024-05-02", "end_date": "2024-05-03"},
        {"start_date": "2024-05-04", "end_date": "2024-05-06"}
    ]}"#;

    let LookupResponse::Bookings(conflicts) = LookupResponse::parse(&query, body).unwrap() else {
        panic!("Expected bookings response");
    };
    assert_eq!(
        conflicts.bookings,
        vec![
            BookingConflict {
                start_date: "2024-05-02".into(),
                end_date: "2024-05-03".into(),
            },
            BookingConflict {
                start_date: "2024-05-04".into(),
                end_date: "2024-05-06".into(),
            },
        ]
    );
}

#[test]
fn body_without_expected_field_is_a_decode_error() {
    let query = booking_query("10", "2024-05-01", "2024-05-05");
    let err = LookupResponse::parse(&query, r#"{"error": "Item not found"}"#).unwrap_err();

    assert!(matches!(err, LookupError::Decode { .. }));
    assert!(err.to_string().contains("bookings for item 10"));
    assert!(err.source().is_some());

    let stock = LookupQuery::Stock {
        item_id: "42".into(),
    };
    assert!(LookupResponse::parse(&stock, "not json").is_err());
}

#[test]
fn status_error_display_includes_message() {
    let err = LookupError::Status {
        url: "http://localhost:8000/utils/get_item_booking/?item_id=1".into(),
        status: 404,
        message: Some("Item not found".into()),
    };
    assert_eq!(
        err.to_string(),
        "http://localhost:8000/utils/get_item_booking/?item_id=1 returned 404: Item not found"
    );
    assert!(err.source().is_none());
}

#[test]
fn query_exposes_item_and_segments() {
    let query = booking_query("10", "2024-05-01", "2024-05-05");
    assert_eq!(query.item_id(), "10");
    assert_eq!(query.kind(), "booking");
    assert_eq!(
        query.path_segments(),
        vec!["utils", "check_item_booking", "10", "2024-05-01", "2024-05-05"]
    );
}
