//! End-to-end checks against the full router, on the in-memory adapters.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use quad_server::assets::LocalAssetStore;
use quad_server::auth::{AdminAllowList, LocalAuthService};
use quad_server::config::Config;
use quad_server::events::EventFeed;
use quad_server::registration::RegistrationService;
use quad_server::routes::create_routes;
use quad_server::state::AppState;
use quad_server::store::{
    MemoryEventStore, MemoryNoticeStore, MemoryProfileStore, MemoryRegistrationStore,
    MemoryUserStore,
};

const ADMIN_EMAIL: &str = "admin@srm.edu.in";

struct TestApp {
    router: Router,
    _assets: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let assets_dir = tempfile::tempdir().unwrap();
    let config = Arc::new(Config {
        database_url: String::new(),
        port: 0,
        admin_emails: vec![ADMIN_EMAIL.to_string()],
        asset_dir: assets_dir.path().to_path_buf(),
        public_base_url: "http://localhost:3001".to_string(),
        max_upload_bytes: 1024 * 1024,
    });

    let event_store = Arc::new(MemoryEventStore::new());
    let events = Arc::new(EventFeed::new(event_store.clone()).await.unwrap());
    let registrations = RegistrationService::new(
        event_store,
        Arc::new(MemoryRegistrationStore::new()),
    );
    let state = AppState {
        config: config.clone(),
        events,
        registrations,
        notices: Arc::new(MemoryNoticeStore::new()),
        profiles: Arc::new(MemoryProfileStore::new()),
        auth: Arc::new(LocalAuthService::new(Arc::new(MemoryUserStore::new()))),
        admins: AdminAllowList::new(&config.admin_emails),
        assets: Arc::new(LocalAssetStore::new(
            assets_dir.path(),
            config.public_base_url.clone(),
            config.max_upload_bytes,
        )),
    };

    TestApp {
        router: create_routes(state),
        _assets: assets_dir,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_token(mut request: Request<Body>, token: &str) -> Request<Body> {
    let value = format!("Bearer {token}").parse().unwrap();
    request.headers_mut().insert(header::AUTHORIZATION, value);
    request
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

const BOUNDARY: &str = "quad-test-boundary";

fn event_multipart(
    method: &str,
    uri: &str,
    token: &str,
    draft: &Value,
    image: Option<(&str, &[u8])>,
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"event\"\r\n\
             Content-Type: application/json\r\n\r\n{draft}\r\n"
        )
        .as_bytes(),
    );
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap()
}

async fn sign_up(router: &Router, email: &str) -> String {
    let (status, body) = send(
        router,
        json_request(
            "POST",
            "/api/auth/signup",
            None,
            &json!({ "email": email, "password": "secret-pass", "display_name": "Tester" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["token"].as_str().unwrap().to_string()
}

fn draft(title: &str, category: &str, club: &str, date: &str) -> Value {
    json!({
        "title": title,
        "description": "A campus event",
        "date": date,
        "time": "09:00 AM - 05:00 PM",
        "venue": "Main Auditorium",
        "category": category,
        "club": club,
        "registration_open": true,
    })
}

#[tokio::test]
async fn health_reports_service_ok() {
    let app = test_app().await;
    let (status, body) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["service"], "quad-api");
}

#[tokio::test]
async fn admin_event_routes_reject_outsiders() {
    let app = test_app().await;
    let payload = draft("Tech Summit", "Technical", "General", "2030-03-15");

    // No token at all.
    let request = Request::builder()
        .method("POST")
        .uri("/api/admin/events")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "AUTH_ERROR");

    // Signed in, but not on the allow-list.
    let student = sign_up(&app.router, "student@srm.edu.in").await;
    let request = event_multipart("POST", "/api/admin/events", &student, &payload, None);
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn events_are_created_listed_and_filtered() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let request = event_multipart(
        "POST",
        "/api/admin/events",
        &admin,
        &draft("Tech Summit", "Technical", "Tech-Wiz", "2030-03-15"),
        None,
    );
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let request = event_multipart(
        "POST",
        "/api/admin/events",
        &admin,
        &draft("Cultural Night", "Cultural", "Sketch", "2030-03-20"),
        None,
    );
    let (status, _) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CREATED);

    // Unfiltered, newest first.
    let (status, body) = send(&app.router, get("/api/events")).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["title"], "Cultural Night");
    assert_eq!(events[1]["title"], "Tech Summit");

    // Category constraint.
    let (_, body) = send(&app.router, get("/api/events?category=Technical")).await;
    let events = body["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["title"], "Tech Summit");

    // Both constraints AND together; no match yields an empty list.
    let (_, body) = send(
        &app.router,
        get("/api/events?category=Technical&club=Sketch"),
    )
    .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    // "all" is the explicit no-constraint spelling.
    let (_, body) = send(&app.router, get("/api/events?category=all&club=all")).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Values outside the closed enumerations are rejected.
    let (status, body) = send(&app.router, get("/api/events?category=Musical")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn event_create_uploads_poster_image() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let request = event_multipart(
        "POST",
        "/api/admin/events",
        &admin,
        &draft("Hackathon", "Technical", "Codekrafters", "2030-04-01"),
        Some(("poster.png", b"fake png bytes")),
    );
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CREATED);

    let image_url = body["data"]["image_url"].as_str().unwrap();
    assert!(image_url.starts_with("http://localhost:3001/assets/"));
    assert!(image_url.ends_with("_poster.png"));
}

#[tokio::test]
async fn duplicate_registration_is_conflict_after_success() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let request = event_multipart(
        "POST",
        "/api/admin/events",
        &admin,
        &draft("Tech Summit", "Technical", "General", "2030-03-15"),
        None,
    );
    let (_, body) = send(&app.router, request).await;
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let student = sign_up(&app.router, "student@srm.edu.in").await;
    let uri = format!("/api/events/{event_id}/register");

    let request = with_token(
        Request::builder()
            .method("POST")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap(),
        &student,
    );
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["event_id"], event_id);

    let request = with_token(
        Request::builder()
            .method("POST")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap(),
        &student,
    );
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body["error"]["message"],
        "Already registered for this event"
    );
}

#[tokio::test]
async fn external_registration_link_redirects() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let mut payload = draft("Summit", "Technical", "General", "2030-03-15");
    payload["registration_link"] = json!("https://forms.example/summit");
    let request = event_multipart("POST", "/api/admin/events", &admin, &payload, None);
    let (_, body) = send(&app.router, request).await;
    let event_id = body["data"]["id"].as_str().unwrap().to_string();

    let student = sign_up(&app.router, "student@srm.edu.in").await;
    let request = with_token(
        Request::builder()
            .method("POST")
            .uri(format!("/api/events/{event_id}/register"))
            .body(Body::empty())
            .unwrap(),
        &student,
    );
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "https://forms.example/summit"
    );
}

#[tokio::test]
async fn empty_dashboard_has_placeholder_and_zero_tiles() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let (status, body) = send(
        &app.router,
        with_token(get("/api/admin/dashboard"), &admin),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stats"]["total"], 0);
    assert_eq!(body["data"]["stats"]["active"], 0);
    assert_eq!(body["data"]["stats"]["upcoming"], 0);
    assert_eq!(
        body["data"]["placeholder"],
        "No events found. Add your first event!"
    );
    assert!(body["data"]["events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn past_events_stay_in_the_table_but_not_in_upcoming() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    for (title, date) in [("Old Meet", "2020-01-01"), ("Next Meet", "2030-01-01")] {
        let request = event_multipart(
            "POST",
            "/api/admin/events",
            &admin,
            &draft(title, "Sports", "General", date),
            None,
        );
        let (status, _) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = send(
        &app.router,
        with_token(get("/api/admin/dashboard"), &admin),
    )
    .await;
    assert_eq!(body["data"]["stats"]["total"], 2);
    assert_eq!(body["data"]["stats"]["upcoming"], 1);
    assert_eq!(body["data"]["events"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["placeholder"], Value::Null);
}

#[tokio::test]
async fn notices_round_trip_through_admin_crud() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let (status, body) = send(
        &app.router,
        json_request(
            "POST",
            "/api/admin/notices",
            Some(&admin),
            &json!({
                "title": "Semester Registration",
                "content": "Registration begins next week.",
                "category": "Academic",
                "important": true,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let notice_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app.router, get("/api/notices")).await;
    assert_eq!(status, StatusCode::OK);
    let notices = body["data"].as_array().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0]["title"], "Semester Registration");

    let (status, _) = send(
        &app.router,
        with_token(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/notices/{notice_id}"))
                .body(Body::empty())
                .unwrap(),
            &admin,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app.router, get("/api/notices")).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn profile_updates_flow_through_auth_and_store() {
    let app = test_app().await;
    let token = sign_up(&app.router, "student@srm.edu.in").await;

    let (status, body) = send(
        &app.router,
        json_request(
            "PUT",
            "/api/profile",
            Some(&token),
            &json!({ "display_name": "Asha", "bio": "CS, third year", "phone": "98765" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Profile updated successfully");
    assert_eq!(body["data"]["display_name"], "Asha");
    assert_eq!(body["data"]["bio"], "CS, third year");

    // The auth identity picked up the new name too.
    let (_, body) = send(&app.router, with_token(get("/api/auth/me"), &token)).await;
    assert_eq!(body["data"]["display_name"], "Asha");

    let (status, body) = send(
        &app.router,
        json_request(
            "PUT",
            "/api/profile/notifications",
            Some(&token),
            &json!({
                "event_updates": false,
                "new_notices": true,
                "registration_confirmations": false,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["event_updates"], false);
    assert_eq!(body["data"]["registration_confirmations"], false);
}

#[tokio::test]
async fn event_update_merges_into_existing_record() {
    let app = test_app().await;
    let admin = sign_up(&app.router, ADMIN_EMAIL).await;

    let request = event_multipart(
        "POST",
        "/api/admin/events",
        &admin,
        &draft("Hackathon", "Technical", "Codekrafters", "2030-04-01"),
        None,
    );
    let (_, body) = send(&app.router, request).await;
    let event_id = body["data"]["id"].as_str().unwrap().to_string();
    let created_at = body["data"]["created_at"].as_str().unwrap().to_string();

    let mut changed = draft("Hackathon", "Technical", "Codekrafters", "2030-04-01");
    changed["venue"] = json!("CS Block");
    let request = event_multipart(
        "PUT",
        &format!("/api/admin/events/{event_id}"),
        &admin,
        &changed,
        None,
    );
    let (status, body) = send(&app.router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["venue"], "CS Block");
    assert_eq!(body["data"]["title"], "Hackathon");
    assert_eq!(body["data"]["created_at"], created_at.as_str());
    assert_ne!(body["data"]["updated_at"], created_at.as_str());
}
