use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::codegen::ALPHABET;
use crate::codegen::CODE_LENGTH;
use crate::tests::helper;

#[tokio::test]
async fn test_shorten_with_generated_code() {
    let mut app = helper::setup_test_app();

    let (status_code, short_link, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", None, None).await;
    assert_eq!(StatusCode::CREATED, status_code);
    assert!(short_link.is_some());

    let short_link = short_link.unwrap();
    assert!(short_link.short_link.starts_with(helper::BASE_URL));

    let shortcode = short_link.shortcode();
    assert_eq!(CODE_LENGTH, shortcode.len());
    assert!(shortcode.bytes().all(|byte| ALPHABET.contains(&byte)));
}

#[tokio::test]
async fn test_shorten_uses_default_validity() {
    let mut app = helper::setup_test_app();

    let (status_code, short_link, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", None, None).await;
    assert_eq!(StatusCode::CREATED, status_code);

    let expiry = parse_expiry(&short_link.unwrap().expiry);
    let minutes_from_now = (expiry - Utc::now()).num_minutes();

    // default is 30 minutes
    assert!((29..=30).contains(&minutes_from_now));
}

#[tokio::test]
async fn test_shorten_with_custom_validity() {
    let mut app = helper::setup_test_app();

    let (status_code, short_link, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", Some(1), None).await;
    assert_eq!(StatusCode::CREATED, status_code);

    let expiry = parse_expiry(&short_link.unwrap().expiry);
    let until_expiry = expiry - Utc::now();

    assert!(until_expiry <= Duration::minutes(1));
    assert!(until_expiry > Duration::seconds(55));
}

#[tokio::test]
async fn test_shorten_with_custom_shortcode() {
    let mut app = helper::setup_test_app();

    let (status_code, short_link, _) = helper::maybe_shorten(
        &mut app,
        "https://www.example.com/",
        None,
        Some("my-code_1"),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    let short_link = short_link.unwrap();
    assert_eq!(
        format!("{}my-code_1", helper::BASE_URL),
        short_link.short_link
    );
    assert!(short_link.expiry.ends_with('Z'));
}

#[tokio::test]
async fn test_shorten_with_claimed_shortcode() {
    let mut app = helper::setup_test_app();

    let (status_code, _, _) = helper::maybe_shorten(
        &mut app,
        "https://www.example.com/",
        None,
        Some("popular"),
    )
    .await;
    assert_eq!(StatusCode::CREATED, status_code);

    // same shortcode again
    let (status_code, short_link, error) = helper::maybe_shorten(
        &mut app,
        "https://www.example.org/",
        None,
        Some("popular"),
    )
    .await;
    assert_eq!(StatusCode::CONFLICT, status_code);
    assert!(short_link.is_none());
    assert_eq!(Some("shortcode collision".to_string()), error);
}

#[tokio::test]
async fn test_shorten_with_blank_shortcode_generates_one() {
    let mut app = helper::setup_test_app();

    let (status_code, short_link, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", None, Some("   ")).await;
    assert_eq!(StatusCode::CREATED, status_code);

    assert_eq!(CODE_LENGTH, short_link.unwrap().shortcode().len());
}

#[tokio::test]
async fn test_shorten_rejects_invalid_urls() {
    let mut app = helper::setup_test_app();

    for url in [
        "ftp://bad",
        "HTTP://www.example.com/",
        "http://",
        "www.example.com",
        "",
    ] {
        let (status_code, short_link, error) =
            helper::maybe_shorten(&mut app, url, None, None).await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code, "url: {url:?}");
        assert!(short_link.is_none());
        assert_eq!(Some("invalid url".to_string()), error);
    }
}

#[tokio::test]
async fn test_shorten_rejects_out_of_range_validity() {
    let mut app = helper::setup_test_app();

    for validity in [0, -1, 10081] {
        let (status_code, short_link, error) =
            helper::maybe_shorten(&mut app, "https://www.example.com/", Some(validity), None).await;
        assert_eq!(StatusCode::BAD_REQUEST, status_code, "validity: {validity}");
        assert!(short_link.is_none());
        assert_eq!(Some("invalid validity".to_string()), error);
    }

    // the boundary itself is fine, 7 days
    let (status_code, _, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", Some(10080), None).await;
    assert_eq!(StatusCode::CREATED, status_code);
}

#[tokio::test]
async fn test_shorten_rejects_bad_shortcodes() {
    let mut app = helper::setup_test_app();

    let too_long = "a".repeat(33);

    for shortcode in ["ab", too_long.as_str(), "abc!", "abc def", "abc/def"] {
        let (status_code, short_link, error) = helper::maybe_shorten(
            &mut app,
            "https://www.example.com/",
            None,
            Some(shortcode),
        )
        .await;
        assert_eq!(
            StatusCode::BAD_REQUEST,
            status_code,
            "shortcode: {shortcode:?}"
        );
        assert!(short_link.is_none());
        assert_eq!(Some("invalid shortcode format".to_string()), error);
    }
}

fn parse_expiry(expiry: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(expiry)
        .unwrap()
        .with_timezone(&Utc)
}
