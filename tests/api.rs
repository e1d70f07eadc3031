use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;

use bubble::{
    config::Config,
    store::{seed::demo_events, MemoryEventStore, MemoryKvStore},
    AppState,
};

fn test_app_at(now: DateTime<Utc>) -> Router {
    let config = Config::from_lookup(|key| match key {
        "UTC_OFFSET_MINUTES" => Some("0".to_string()),
        _ => None,
    })
    .unwrap();
    let state = AppState::with_stores(
        config,
        Arc::new(MemoryEventStore::with_events(demo_events(now))),
        Arc::new(MemoryKvStore::new()),
    );
    bubble::app(state)
}

fn test_app() -> Router {
    test_app_at(Utc::now())
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_profile(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-bubble-profile", "alex");
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn ids(body: &Value) -> Vec<String> {
    body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_endpoints() {
    let app = test_app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn lists_all_events_with_points_and_facets() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 8);
    assert_eq!(ids(&body), vec!["1", "2", "3", "4", "5", "6", "7", "8"]);

    // opposite major, city-away
    assert_eq!(body["events"][0]["points"], 100);
    // same major, local
    assert_eq!(body["events"][2]["points"], 10);
    assert_eq!(body["events"][1]["distanceBucket"], "nearby");
    assert_eq!(
        body["facets"]["cities"],
        json!(["Liverpool", "Manchester", "Salford"])
    );
    assert_eq!(body["ignoredFilters"], json!([]));
}

#[tokio::test]
async fn filters_by_query_city_tag_and_paid() {
    let app = test_app();

    let (_, body) = send(&app, get("/api/events?q=salford")).await;
    assert_eq!(ids(&body), vec!["3", "6"]);

    let (_, body) = send(&app, get("/api/events?city=Liverpool")).await;
    assert_eq!(ids(&body), vec!["4", "8"]);

    let (_, body) = send(&app, get("/api/events?tag=Technology")).await;
    assert_eq!(ids(&body), vec!["1", "5", "7"]);

    let (_, body) = send(&app, get("/api/events?paidOnly=true")).await;
    assert_eq!(ids(&body), vec!["2", "3", "5", "6"]);

    let uri = "/api/events?paidOnly=true&city=Manchester&tag=Technology";
    let (_, body) = send(&app, get(uri)).await;
    assert_eq!(ids(&body), vec!["5"]);

    // facets still describe the whole catalogue
    assert_eq!(body["facets"]["cities"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn filters_by_calendar_day() {
    let now = DateTime::parse_from_rfc3339("2025-05-01T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let app = test_app_at(now);

    let (_, body) = send(&app, get("/api/events?date=2025-05-03")).await;
    assert_eq!(ids(&body), vec!["3"]);

    let (_, body) = send(&app, get("/api/events?date=2024-01-01")).await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn malformed_date_is_ignored() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/events?date=tomorrow")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 8);
    assert_eq!(body["ignoredFilters"], json!(["date"]));
}

#[tokio::test]
async fn facets_endpoint() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/events/facets")).await;
    assert_eq!(status, StatusCode::OK);
    let tags = body["tags"].as_array().unwrap();
    assert!(tags.contains(&json!("AI")));
    assert!(tags.windows(2).all(|w| w[0].as_str() < w[1].as_str()));
}

#[tokio::test]
async fn get_single_event() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/events/2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["title"], "Stand-up Comedy Night");
    assert_eq!(body["event"]["points"], 80);

    let (status, body) = send(&app, get("/api/events/404")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn malformed_query_values_use_the_error_envelope() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/events?paidOnly=maybe")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_input");

    let uri = "/api/points/preview?distanceBucket=local&rarityBoost=abc";
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn create_accepts_blank_image_url() {
    let app = test_app();
    let payload = json!({
        "title": "Zine Swap",
        "occursAt": Utc::now() + Duration::hours(2),
        "city": "Leeds",
        "tags": ["Arts"],
        "recommendedMajors": [],
        "imageUrl": "",
        "distanceBucket": "nearby"
    });
    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["event"]["imageUrl"].is_null());
}

#[tokio::test]
async fn creates_event_and_lists_it_in_order() {
    let app = test_app();
    let occurs_at = Utc::now() + Duration::hours(30);
    let payload = json!({
        "title": "Pottery Taster",
        "occursAt": occurs_at,
        "city": "Salford",
        "tags": ["Crafts", " Art "],
        "recommendedMajors": ["Computer Science"],
        "isPaid": true,
        "priceAmount": 5.5,
        "distanceBucket": "local",
        "isOppositeMajor": true
    });

    let (status, body) = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["event"]["points"], 60);
    assert_eq!(body["event"]["tags"], json!(["Crafts", "Art"]));
    let id = body["event"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(&app, get("/api/events?tag=Crafts")).await;
    assert_eq!(ids(&body), vec![id.clone(), "8".to_string()]);

    let (_, body) = send(&app, get("/api/events")).await;
    assert_eq!(ids(&body)[2], id);
}

#[tokio::test]
async fn create_rejects_unknown_bucket_and_invalid_fields() {
    let app = test_app();
    let post = |payload: Value| {
        Request::builder()
            .method("POST")
            .uri("/api/events")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap()
    };

    let (status, body) = send(
        &app,
        post(json!({
            "title": "Moon Walk",
            "occursAt": Utc::now(),
            "city": "Salford",
            "tags": [],
            "recommendedMajors": [],
            "distanceBucket": "orbit"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unrecognized_distance_bucket");

    let (status, body) = send(
        &app,
        post(json!({
            "title": "",
            "occursAt": Utc::now(),
            "city": "Salford",
            "tags": [],
            "recommendedMajors": [],
            "distanceBucket": "local"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn points_preview() {
    let app = test_app();
    let (status, body) = send(
        &app,
        get("/api/points/preview?isOppositeMajor=true&distanceBucket=city-away&rarityBoost=25"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 100);
    assert_eq!(body["capped"], true);

    let (_, body) = send(&app, get("/api/points/preview?distanceBucket=local")).await;
    assert_eq!(body["points"], 10);

    let (status, body) = send(&app, get("/api/points/preview?distanceBucket=far")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unrecognized_distance_bucket");
}

#[tokio::test]
async fn profile_routes_require_header() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/profile")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "missing_profile");

    let request = Request::builder()
        .uri("/api/profile")
        .header("x-bubble-profile", "a:b")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn wallet_flow() {
    let app = test_app();

    let (status, body) = send(&app, with_profile("GET", "/api/profile", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 120);
    assert_eq!(body["rsvps"], json!(["1", "5"]));

    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/rsvps", Some(json!({ "eventId": "7" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["requiresPayment"], false);

    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/rsvps", Some(json!({ "eventId": "7" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alreadyRsvped"], true);

    let (status, _) = send(
        &app,
        with_profile("POST", "/api/profile/rsvps", Some(json!({ "eventId": "nope" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/redemptions", Some(json!({ "discountId": "d1" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 70);

    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/redemptions", Some(json!({ "discountId": "d1" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "discount_used");

    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/redemptions", Some(json!({ "discountId": "d2" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 40);

    let (status, body) = send(&app, with_profile("DELETE", "/api/profile/rsvps/5", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);

    let (_, body) = send(&app, with_profile("GET", "/api/profile", None)).await;
    assert_eq!(body["rsvps"], json!(["1", "7"]));
    assert_eq!(body["usedDiscounts"], json!(["d1", "d2"]));
}

#[tokio::test]
async fn redemption_does_not_need_an_rsvp() {
    let app = test_app();
    // d2 belongs to event 7, which is not among the seeded RSVPs
    let (status, body) = send(
        &app,
        with_profile("POST", "/api/profile/redemptions", Some(json!({ "discountId": "d2" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["points"], 90);

    let (_, body) = send(&app, with_profile("GET", "/api/profile", None)).await;
    assert_eq!(body["rsvps"], json!(["1", "5"]));
    assert_eq!(body["usedDiscounts"], json!(["d2"]));
}

#[tokio::test]
async fn profile_save_and_sign_out() {
    let app = test_app();
    let doc = json!({
        "name": "Alex",
        "email": "alex@example.com",
        "major": "Theatre",
        "openness": 90
    });
    let (status, body) = send(&app, with_profile("PUT", "/api/profile", Some(doc))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["reminders"], true);

    let (_, body) = send(&app, with_profile("GET", "/api/profile", None)).await;
    assert_eq!(body["profile"]["name"], "Alex");
    assert_eq!(body["profile"]["openness"], 90);

    let (status, _) = send(&app, with_profile("DELETE", "/api/profile", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = send(&app, with_profile("GET", "/api/profile", None)).await;
    assert_eq!(body["profile"], Value::Null);
    assert_eq!(body["points"], 120);

    let (status, _) = send(
        &app,
        with_profile(
            "PUT",
            "/api/profile",
            Some(json!({ "name": "A", "email": "bad", "major": "X" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn discount_catalogue() {
    let app = test_app();
    let (status, body) = send(&app, get("/api/discounts")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], "d1");
    assert_eq!(body[0]["costPoints"], 50);
    assert_eq!(body[1]["eventId"], "7");
}
