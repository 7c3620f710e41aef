//! End-to-end tests driving the real router with `tower::ServiceExt`.

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
  response::Response,
};
use barracuda_core::{
  admin::{AdminRole, NewAdmin},
  memory::MemoryStore,
};
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AppState, auth::hash_password, router};

const SEED_EMAIL: &str = "admin@affiiate.com";
const SEED_PASSWORD: &str = "admin123";

async fn make_state() -> AppState<MemoryStore> {
  let state = AppState::new(MemoryStore::new(), "test-secret");
  state
    .admins
    .create(NewAdmin {
      email:         SEED_EMAIL.into(),
      password_hash: hash_password(SEED_PASSWORD).unwrap(),
      name:          "Super Admin".into(),
      role:          AdminRole::SuperAdmin,
    })
    .await
    .unwrap();
  state
}

async fn send(
  state: &AppState<MemoryStore>,
  method: &str,
  uri: &str,
  token: Option<&str>,
  body: Option<Value>,
) -> Response {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(t) = token {
    builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
  }
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  router(state.clone()).oneshot(req).await.unwrap()
}

async fn body_json(resp: Response) -> Value {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(resp: Response) -> String {
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  String::from_utf8(bytes.to_vec()).unwrap()
}

async fn login(state: &AppState<MemoryStore>) -> String {
  let resp = send(
    state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  body["data"]["token"].as_str().unwrap().to_string()
}

fn submission(name: &str, email: &str, kind: &str) -> Value {
  json!({ "name": name, "email": email, "company": "Acme", "type": kind })
}

async fn submit(state: &AppState<MemoryStore>, name: &str, email: &str, kind: &str) -> u64 {
  let resp = send(
    state,
    "POST",
    "/api/contact",
    None,
    Some(submission(name, email, kind)),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  body["data"]["contactId"].as_u64().unwrap()
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
  let state = make_state().await;
  let resp = send(&state, "GET", "/api/health", None, None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["status"], "ok");
}

// ─── Intake ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn submission_normalises_and_defaults_to_new() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/contact",
    None,
    Some(json!({
      "name": "  Jo ", "email": " JO@X.COM ", "company": " Acme ",
      "type": "publisher",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  assert_eq!(body["success"], true);
  assert_eq!(body["data"]["contactId"], 1);

  let token = login(&state).await;
  let resp = send(&state, "GET", "/api/admin/contacts/1", Some(&token), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["name"], "Jo");
  assert_eq!(body["data"]["email"], "jo@x.com");
  assert_eq!(body["data"]["company"], "Acme");
  assert_eq!(body["data"]["status"], "new");
}

#[tokio::test]
async fn invalid_submission_stores_nothing() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/contact",
    None,
    Some(json!({ "email": "jo@x.com", "company": "Acme", "type": "publisher" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["success"], false);
  assert_eq!(body["message"], "Please fill in all required fields");

  let resp = send(
    &state,
    "POST",
    "/api/contact",
    None,
    Some(submission("Jo", "not-an-email", "publisher")),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Please provide a valid email address");

  // Store count unchanged.
  let token = login(&state).await;
  let resp = send(&state, "GET", "/api/admin/contacts", Some(&token), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["pagination"]["total"], 0);
}

#[tokio::test]
async fn public_contact_reads_are_gone() {
  // The old unauthenticated list/get routes must not exist; the public
  // surface is write-only.
  let state = make_state().await;
  let resp = send(&state, "GET", "/api/contact", None, None).await;
  assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  let resp = send(&state, "GET", "/api/contact/1", None, None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ─── Auth ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_failures_share_one_generic_message() {
  let state = make_state().await;

  for body in [
    json!({ "email": SEED_EMAIL, "password": "wrong-password" }),
    json!({ "email": "nobody@affiiate.com", "password": "whatever" }),
  ] {
    let resp = send(&state, "POST", "/api/auth/login", None, Some(body)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Invalid email or password");
  }
}

#[tokio::test]
async fn login_returns_user_without_hash_and_records_last_login() {
  let state = make_state().await;
  let resp = send(
    &state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD })),
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["user"]["email"], SEED_EMAIL);
  assert_eq!(body["data"]["user"]["role"], "super_admin");
  assert!(body["data"]["user"].get("passwordHash").is_none());
  assert!(!body["data"]["user"]["lastLogin"].is_null());
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
  let state = make_state().await;

  let resp = send(&state, "GET", "/api/admin/contacts", None, None).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Access token required");

  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts",
    Some("garbage.token.here"),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn admin_listing_is_super_admin_only() {
  let state = make_state().await;
  let super_token = login(&state).await;

  // Register a regular admin and grab its token.
  let resp = send(
    &state,
    "POST",
    "/api/auth/register",
    None,
    Some(json!({
      "email": "op@affiiate.com", "password": "longenough", "name": "Op",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body = body_json(resp).await;
  let admin_token = body["data"]["token"].as_str().unwrap().to_string();
  assert_eq!(body["data"]["user"]["role"], "admin");

  let resp = send(&state, "GET", "/api/auth/admins", Some(&admin_token), None).await;
  assert_eq!(resp.status(), StatusCode::FORBIDDEN);

  let resp = send(&state, "GET", "/api/auth/admins", Some(&super_token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["total"], 2);
}

#[tokio::test]
async fn registration_enforces_uniqueness_and_password_length() {
  let state = make_state().await;

  let resp = send(
    &state,
    "POST",
    "/api/auth/register",
    None,
    Some(json!({
      "email": "ADMIN@AFFIIATE.COM", "password": "longenough", "name": "Dup",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Email already registered");

  let resp = send(
    &state,
    "POST",
    "/api/auth/register",
    None,
    Some(json!({ "email": "op@affiiate.com", "password": "short", "name": "Op" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["message"], "Password must be at least 8 characters");
}

#[tokio::test]
async fn me_returns_the_current_profile() {
  let state = make_state().await;
  let token = login(&state).await;
  let resp = send(&state, "GET", "/api/auth/me", Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["email"], SEED_EMAIL);
  assert!(body["data"].get("passwordHash").is_none());
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
  let state = make_state().await;
  let token = login(&state).await;

  let resp = send(
    &state,
    "PUT",
    "/api/auth/password",
    Some(&token),
    Some(json!({ "currentPassword": "wrong", "newPassword": "newpassword" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

  let resp = send(
    &state,
    "PUT",
    "/api/auth/password",
    Some(&token),
    Some(json!({
      "currentPassword": SEED_PASSWORD, "newPassword": "newpassword",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);

  // Old credential is gone, the new one works.
  let resp = send(
    &state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "email": SEED_EMAIL, "password": SEED_PASSWORD })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let resp = send(
    &state,
    "POST",
    "/api/auth/login",
    None,
    Some(json!({ "email": SEED_EMAIL, "password": "newpassword" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
}

// ─── Triage ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn full_triage_lifecycle() {
  let state = make_state().await;

  let id = submit(&state, "Jo", "jo@x.com", "publisher").await;
  assert_eq!(id, 1);

  let token = login(&state).await;

  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?type=publisher",
    Some(&token),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["data"][0]["id"], 1);
  assert_eq!(body["data"][0]["status"], "new");

  let resp = send(
    &state,
    "PUT",
    "/api/admin/contacts/1",
    Some(&token),
    Some(json!({ "status": "qualified" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], "qualified");
  assert!(!body["data"]["updatedAt"].is_null());

  let resp = send(&state, "DELETE", "/api/admin/contacts/1", Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let resp = send(&state, "GET", "/api/admin/contacts/1", Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  // Second delete is the same idempotent 404.
  let resp = send(&state, "DELETE", "/api/admin/contacts/1", Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_paginates_and_reports_totals() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;
  submit(&state, "B", "b@x.com", "publisher").await;
  submit(&state, "C", "c@x.com", "advertiser").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?page=1&limit=2",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 2);
  assert_eq!(body["pagination"]["total"], 3);
  assert_eq!(body["pagination"]["pages"], 2);

  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?page=2&limit=2",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 1);

  // Past the last page: empty items, same totals.
  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?page=5&limit=2",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 0);
  assert_eq!(body["pagination"]["total"], 3);
}

#[tokio::test]
async fn list_stats_block_ignores_filters() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;
  submit(&state, "B", "b@x.com", "advertiser").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?type=advertiser",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  // Filtered items...
  assert_eq!(body["data"].as_array().unwrap().len(), 1);
  assert_eq!(body["pagination"]["total"], 1);
  // ...but the overview block still covers the whole store.
  assert_eq!(body["stats"]["total"], 2);
  assert_eq!(body["stats"]["publishers"], 1);
  assert_eq!(body["stats"]["advertisers"], 1);
}

#[tokio::test]
async fn list_search_matches_name_email_or_company() {
  let state = make_state().await;
  submit(&state, "Alice", "alice@wonder.land", "publisher").await;
  submit(&state, "Bob", "bob@x.com", "publisher").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?search=WONDER",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["pagination"]["total"], 1);
  assert_eq!(body["data"][0]["name"], "Alice");
}

#[tokio::test]
async fn stats_endpoint_buckets_by_calendar() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;
  submit(&state, "B", "b@x.com", "advertiser").await;

  let token = login(&state).await;
  let resp = send(&state, "GET", "/api/admin/contacts/stats", Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  // Both were just submitted, so they land in every bucket.
  assert_eq!(body["data"]["total"], 2);
  assert_eq!(body["data"]["today"], 2);
  assert_eq!(body["data"]["thisWeek"], 2);
  assert_eq!(body["data"]["thisMonth"], 2);
  assert_eq!(body["data"]["byType"]["publisher"], 1);
  assert_eq!(body["data"]["byType"]["advertiser"], 1);
  assert_eq!(body["data"]["byStatus"]["new"], 2);
  assert_eq!(body["data"]["byStatus"]["rejected"], 0);
}

#[tokio::test]
async fn update_rejects_unknown_status_values_with_the_envelope() {
  let state = make_state().await;
  submit(&state, "Jo", "jo@x.com", "publisher").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "PUT",
    "/api/admin/contacts/1",
    Some(&token),
    Some(json!({ "status": "escalated" })),
  )
  .await;
  // A bad enum value is a 400 in the standard envelope, never a bare
  // framework rejection.
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["message"].as_str().unwrap().contains("escalated"));

  // The lead is untouched.
  let resp = send(&state, "GET", "/api/admin/contacts/1", Some(&token), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["status"], "new");
}

#[tokio::test]
async fn malformed_json_body_gets_the_envelope() {
  let state = make_state().await;
  let req = Request::builder()
    .method("POST")
    .uri("/api/contact")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let resp = router(state.clone()).oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["message"].is_string());
}

#[tokio::test]
async fn invalid_date_query_gets_the_envelope() {
  let state = make_state().await;
  let token = login(&state).await;
  let resp = send(
    &state,
    "GET",
    "/api/admin/contacts?startDate=yesterday",
    Some(&token),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body = body_json(resp).await;
  assert_eq!(body["success"], false);
  assert!(body["message"].as_str().unwrap().contains("invalid date"));
}

#[tokio::test]
async fn list_survives_absurd_page_numbers() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;

  let token = login(&state).await;
  let uri = format!("/api/admin/contacts?page={}&limit=20", usize::MAX);
  let resp = send(&state, "GET", &uri, Some(&token), None).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"].as_array().unwrap().len(), 0);
  assert_eq!(body["pagination"]["total"], 1);
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn export_row_count_matches_list_total() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;
  submit(&state, "B", "b@x.com", "publisher").await;
  submit(&state, "C", "c@x.com", "advertiser").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "POST",
    "/api/admin/contacts/export",
    Some(&token),
    Some(json!({ "type": "publisher" })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  assert_eq!(
    resp.headers().get(header::CONTENT_TYPE).unwrap(),
    "text/csv"
  );
  let disposition = resp
    .headers()
    .get(header::CONTENT_DISPOSITION)
    .unwrap()
    .to_str()
    .unwrap()
    .to_string();
  assert!(disposition.starts_with("attachment; filename=contacts-"));
  assert!(disposition.ends_with(".csv"));

  let csv = body_text(resp).await;
  let lines: Vec<&str> = csv.lines().collect();
  assert!(lines[0].starts_with("ID,Name,Email,Company,Type,"));
  // Header plus one row per matching lead.
  assert_eq!(lines.len(), 3);
  assert!(lines.iter().skip(1).all(|l| l.contains("publisher")));
}

#[tokio::test]
async fn export_with_no_matches_is_header_only() {
  let state = make_state().await;
  let token = login(&state).await;
  let resp = send(
    &state,
    "POST",
    "/api/admin/contacts/export",
    Some(&token),
    Some(json!({ "status": "rejected" })),
  )
  .await;
  let csv = body_text(resp).await;
  assert_eq!(csv.lines().count(), 1);
}

// ─── Settings & dashboard ────────────────────────────────────────────────────

#[tokio::test]
async fn settings_merge_update_and_reset() {
  let state = make_state().await;
  let token = login(&state).await;

  let resp = send(&state, "GET", "/api/admin/settings", Some(&token), None).await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["siteName"], "Affiiate");

  let resp = send(
    &state,
    "PUT",
    "/api/admin/settings",
    Some(&token),
    Some(json!({
      "siteName": "Renamed",
      "maintenanceMode": true,
      "unknownKey": "ignored",
    })),
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["siteName"], "Renamed");
  assert_eq!(body["data"]["maintenanceMode"], true);
  assert_eq!(body["data"]["companyName"], "Barracuda Marketing");
  assert!(body["data"].get("unknownKey").is_none());

  let resp = send(
    &state,
    "POST",
    "/api/admin/settings/reset",
    Some(&token),
    None,
  )
  .await;
  let body = body_json(resp).await;
  assert_eq!(body["data"]["siteName"], "Affiiate");
  assert_eq!(body["data"]["maintenanceMode"], false);
}

#[tokio::test]
async fn dashboard_combines_settings_and_live_counts() {
  let state = make_state().await;
  submit(&state, "A", "a@x.com", "publisher").await;
  submit(&state, "B", "b@x.com", "advertiser").await;

  let token = login(&state).await;
  let resp = send(
    &state,
    "GET",
    "/api/admin/settings/dashboard",
    Some(&token),
    None,
  )
  .await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = body_json(resp).await;
  assert_eq!(body["data"]["siteInfo"]["siteName"], "Affiiate");
  assert_eq!(body["data"]["siteInfo"]["maintenanceMode"], false);
  assert_eq!(body["data"]["quickStats"]["totalContacts"], 2);
  assert_eq!(body["data"]["quickStats"]["publishers"], 1);
  assert_eq!(body["data"]["quickStats"]["advertisers"], 1);
}
