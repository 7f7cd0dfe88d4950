use axum::http::StatusCode;

use eventd::booking::BookingDraft;
use eventd::event::EventDraft;
use eventd::{slug, Error, EventPatch};

fn draft() -> EventDraft {
    EventDraft {
        title: "Tech Meetup 2024".to_string(),
        description: "An evening of talks".to_string(),
        overview: "Talks and networking".to_string(),
        image: "/images/tech-meetup.png".to_string(),
        venue: "Community Hall".to_string(),
        location: "Berlin".to_string(),
        organizer: "Rust Berlin".to_string(),
        date: "2024-11-05".to_string(),
        time: "18:30".to_string(),
        mode: "offline".to_string(),
        audience: "Developers".to_string(),
        agenda: vec!["Doors open".to_string(), "Talks".to_string()],
        tags: vec!["rust".to_string(), "meetup".to_string()],
    }
}

#[test]
fn messy_drafts_come_out_canonical() {
    let event = EventDraft {
        title: "  Tech Meetup!  ".to_string(),
        date: "11/05/2024".to_string(),
        time: "9:5".to_string(),
        mode: "HYBRID".to_string(),
        ..draft()
    }
    .validate()
    .unwrap();

    assert_eq!(event.slug, "tech-meetup");
    assert_eq!(event.title, "Tech Meetup!");
    assert_eq!(event.date, "2024-11-05");
    assert_eq!(event.time, "09:05");
    assert_eq!(serde_json::to_value(event.mode).unwrap(), "hybrid");
}

#[test]
fn derived_slugs_resolve_as_lookup_keys() {
    let event = draft().validate().unwrap();
    assert_eq!(slug::normalize(&event.slug).unwrap(), "tech-meetup-2024");
}

#[test]
fn empty_slug_is_a_missing_parameter() {
    let err = slug::normalize("  ").unwrap_err();
    assert!(matches!(err, Error::MissingParameter));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn underscored_slug_fails_format_validation() {
    let err = slug::normalize("UPPER_CASE").unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
}

#[test]
fn raw_titles_are_not_lookup_keys() {
    assert!(slug::normalize("Tech Meetup!").is_err());
    assert_eq!(slug::derive("Tech Meetup!"), "tech-meetup");
}

#[test]
fn out_of_range_times_never_validate() {
    let result = EventDraft {
        time: "25:00".to_string(),
        ..draft()
    }
    .validate();

    assert!(matches!(result, Err(Error::InvalidTime(_))));
}

#[test]
fn retitled_events_keep_slug_and_title_in_sync() {
    let mut event = draft().validate().unwrap();

    EventPatch {
        title: Some("Tech Meetup 2025".to_string()),
        ..EventPatch::default()
    }
    .apply(&mut event)
    .unwrap();

    assert_eq!(event.slug, slug::derive(&event.title));
    assert_eq!(event.slug, "tech-meetup-2025");
}

#[test]
fn booking_drafts_normalize_the_email() {
    let booking = BookingDraft {
        event_id: "65f2a0c8b7e4d92a31c0ffee".to_string(),
        slug: Some("tech-meetup-2024".to_string()),
        email: " Jane@Example.COM ".to_string(),
    }
    .validate()
    .unwrap();

    assert_eq!(booking.email, "jane@example.com");
}

#[test]
fn booking_drafts_reject_bad_input() {
    let err = BookingDraft {
        event_id: "65f2a0c8b7e4d92a31c0ffee".to_string(),
        slug: None,
        email: "not-an-email".to_string(),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidEmail(_)));

    let err = BookingDraft {
        event_id: "nope".to_string(),
        slug: None,
        email: "jane@example.com".to_string(),
    }
    .validate()
    .unwrap_err();
    assert!(matches!(err, Error::InvalidFormat(_)));
}

#[test]
fn errors_map_to_their_status_class() {
    let cases = [
        (Error::MissingParameter, StatusCode::BAD_REQUEST),
        (Error::MissingField("title"), StatusCode::BAD_REQUEST),
        (Error::InvalidFormat("x!".to_string()), StatusCode::BAD_REQUEST),
        (Error::InvalidDate("soon".to_string()), StatusCode::BAD_REQUEST),
        (Error::InvalidTime("25:00".to_string()), StatusCode::BAD_REQUEST),
        (Error::InvalidEnum("virtual".to_string()), StatusCode::BAD_REQUEST),
        (Error::EmptyCollection("tags"), StatusCode::BAD_REQUEST),
        (Error::InvalidEmail("jane".to_string()), StatusCode::BAD_REQUEST),
        (Error::NotFound("tech-meetup".to_string()), StatusCode::NOT_FOUND),
        (
            Error::DanglingReference("65f2a0c8b7e4d92a31c0ffee".to_string()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (
            Error::DuplicateKey("tech-meetup".to_string()),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
    ];

    for (err, status) in cases {
        assert_eq!(err.status(), status, "{err}");
    }
}

#[test]
fn event_json_uses_camel_case_fields() {
    let event = draft().validate().unwrap();
    let value = serde_json::to_value(&event).unwrap();

    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
    assert!(value.get("_id").is_none());
    assert_eq!(value["slug"], "tech-meetup-2024");
}
