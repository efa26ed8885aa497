use axum::http::StatusCode;

use crate::tests::helper;

#[tokio::test]
async fn test_stats_unknown_shortcode() {
    let mut app = helper::setup_test_app();

    let (status_code, stats, error) = helper::maybe_stats(&mut app, "missing").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(stats.is_none());
    assert_eq!(Some("shortcode not found".to_string()), error);
}

#[tokio::test]
async fn test_stats_malformed_shortcode_reads_as_missing() {
    let mut app = helper::setup_test_app();

    let (_, _, missing_error) = helper::maybe_stats(&mut app, "missing").await;

    let (status_code, stats, error) = helper::maybe_stats(&mut app, "ab").await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert!(stats.is_none());
    assert_eq!(missing_error, error);
}

#[tokio::test]
async fn test_stats_shape() {
    let mut app = helper::setup_test_app();

    let url = "https://www.example.com/landing";

    let (status_code, short_link, _) =
        helper::maybe_shorten(&mut app, url, Some(60), Some("shaped")).await;
    assert_eq!(StatusCode::CREATED, status_code);
    let short_link = short_link.unwrap();

    let (_, _, _) = helper::redirect_with_headers(
        &mut app,
        "shaped",
        &[("referer", "https://first.example.com/")],
    )
    .await;
    let (_, _, _) = helper::redirect_with_headers(
        &mut app,
        "shaped",
        &[("referer", "https://second.example.com/")],
    )
    .await;

    let (status_code, stats, _) = helper::maybe_stats(&mut app, "shaped").await;
    assert_eq!(StatusCode::OK, status_code);

    let stats = stats.unwrap();
    assert_eq!(short_link.short_link, stats.short_link);
    assert_eq!(url, stats.target_url);
    assert_eq!(short_link.expiry, stats.expiry);
    assert!(stats.created_at.ends_with('Z'));
    assert_eq!(2, stats.total_clicks);

    // oldest first
    assert_eq!(2, stats.clicks.len());
    assert_eq!("https://first.example.com/", stats.clicks[0].source);
    assert_eq!("https://second.example.com/", stats.clicks[1].source);
    assert!(stats.clicks[0].timestamp <= stats.clicks[1].timestamp);
}

#[tokio::test]
async fn test_stats_without_clicks() {
    let mut app = helper::setup_test_app();

    let (status_code, _, _) =
        helper::maybe_shorten(&mut app, "https://www.example.com/", None, Some("untouched")).await;
    assert_eq!(StatusCode::CREATED, status_code);

    let (status_code, stats, _) = helper::maybe_stats(&mut app, "untouched").await;
    assert_eq!(StatusCode::OK, status_code);

    let stats = stats.unwrap();
    assert_eq!(0, stats.total_clicks);
    assert!(stats.clicks.is_empty());
}
