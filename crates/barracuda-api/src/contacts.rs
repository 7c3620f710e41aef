//! Triage handlers for `/api/admin/contacts`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/api/admin/contacts` | Filter + paginate; `stats` block covers the whole store |
//! | `GET`    | `/api/admin/contacts/stats` | Calendar-bucketed counts |
//! | `GET`    | `/api/admin/contacts/{id}` | 404 if unknown |
//! | `PUT`    | `/api/admin/contacts/{id}` | Applies only fields present in the body |
//! | `DELETE` | `/api/admin/contacts/{id}` | Permanent |
//! | `POST`   | `/api/admin/contacts/export` | CSV attachment, same filters as list |

use axum::{
  Json,
  extract::{Path, State},
  http::header,
  response::IntoResponse,
};
use barracuda_core::{
  contact::{Contact, ContactFilter, ContactPatch, LeadStatus},
  store::ContactStore,
};
use chrono::{
  DateTime, Datelike, Duration, Local, LocalResult, NaiveDate, NaiveTime,
  SecondsFormat, TimeZone, Utc,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::{
  AppState,
  auth::AuthAdmin,
  error::{ApiError, store_error},
  extract::{ApiJson, ApiQuery},
};

// ─── Date bounds ─────────────────────────────────────────────────────────────

/// Accept either a full RFC 3339 instant or a bare `YYYY-MM-DD` date
/// (interpreted as UTC midnight, matching the original wire contract).
fn parse_date_bound(s: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = s.parse::<DateTime<Utc>>() {
    return Some(dt);
  }
  s.parse::<NaiveDate>()
    .ok()
    .map(|d| Utc.from_utc_datetime(&d.and_time(NaiveTime::MIN)))
}

fn de_date_bound<'de, D>(d: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
  D: Deserializer<'de>,
{
  let raw = Option::<String>::deserialize(d)?;
  match raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
    None => Ok(None),
    Some(s) => parse_date_bound(s)
      .map(Some)
      .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {s}"))),
  }
}

// ─── Query / body types ──────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
  #[serde(rename = "type")]
  pub contact_type: Option<String>,
  pub status:       Option<LeadStatus>,
  pub search:       Option<String>,
  #[serde(default, deserialize_with = "de_date_bound")]
  pub start_date:   Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "de_date_bound")]
  pub end_date:     Option<DateTime<Utc>>,
  pub page:         Option<usize>,
  pub limit:        Option<usize>,
}

impl ListParams {
  fn filter(&self) -> ContactFilter {
    ContactFilter {
      contact_type: self.contact_type.clone(),
      status:       self.status,
      search:       self.search.clone(),
      start_date:   self.start_date,
      end_date:     self.end_date,
    }
  }
}

/// Body of `POST /api/admin/contacts/export` — the same predicates as the
/// list query, without pagination.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportParams {
  #[serde(rename = "type")]
  pub contact_type: Option<String>,
  pub status:       Option<LeadStatus>,
  pub search:       Option<String>,
  #[serde(default, deserialize_with = "de_date_bound")]
  pub start_date:   Option<DateTime<Utc>>,
  #[serde(default, deserialize_with = "de_date_bound")]
  pub end_date:     Option<DateTime<Utc>>,
}

impl ExportParams {
  fn filter(self) -> ContactFilter {
    ContactFilter {
      contact_type: self.contact_type,
      status:       self.status,
      search:       self.search,
      start_date:   self.start_date,
      end_date:     self.end_date,
    }
  }
}

// ─── Shared helpers ──────────────────────────────────────────────────────────

/// Filter, then sort newest-first. The sort is stable, so leads with equal
/// timestamps keep their insertion order.
fn filter_and_sort(mut contacts: Vec<Contact>, filter: &ContactFilter) -> Vec<Contact> {
  contacts.retain(|c| filter.matches(c));
  contacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
  contacts
}

fn count_by<F>(contacts: &[Contact], pred: F) -> usize
where
  F: Fn(&Contact) -> bool,
{
  contacts.iter().filter(|c| pred(c)).count()
}

/// Overview block returned alongside every (possibly filtered) list — it
/// always reflects the entire store so operators keep the big picture while
/// drilling down.
fn overview_stats(contacts: &[Contact]) -> serde_json::Value {
  json!({
    "total":       contacts.len(),
    "publishers":  count_by(contacts, |c| c.contact_type == "publisher"),
    "advertisers": count_by(contacts, |c| c.contact_type == "advertiser"),
    "new":         count_by(contacts, |c| c.status == LeadStatus::New),
    "contacted":   count_by(contacts, |c| c.status == LeadStatus::Contacted),
    "qualified":   count_by(contacts, |c| c.status == LeadStatus::Qualified),
  })
}

fn local_day_start(date: NaiveDate) -> DateTime<Utc> {
  let naive = date.and_time(NaiveTime::MIN);
  match naive.and_local_timezone(Local) {
    LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
      dt.with_timezone(&Utc)
    }
    // Midnight falls in a DST gap; UTC midnight is close enough for a
    // reporting bucket.
    LocalResult::None => Utc.from_utc_datetime(&naive),
  }
}

/// Start of today's local calendar day.
pub(crate) fn today_start() -> DateTime<Utc> {
  local_day_start(Local::now().date_naive())
}

/// Start of the first day of the current local calendar month.
pub(crate) fn month_start() -> DateTime<Utc> {
  let today = Local::now().date_naive();
  local_day_start(today.with_day(1).unwrap_or(today))
}

// ─── List ────────────────────────────────────────────────────────────────────

/// `GET /api/admin/contacts` — filtered, newest-first, paginated.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let all = state.contacts.all().await.map_err(store_error)?;
  let stats = overview_stats(&all);

  let filtered = filter_and_sort(all, &params.filter());
  let total = filtered.len();

  let page = params.page.unwrap_or(1).max(1);
  let limit = params.limit.unwrap_or(20).max(1);
  let pages = total.div_ceil(limit);

  // Saturate rather than overflow on absurd page numbers; skipping past
  // the end just yields an empty page.
  let items: Vec<Contact> = filtered
    .into_iter()
    .skip((page - 1).saturating_mul(limit))
    .take(limit)
    .collect();

  Ok(Json(json!({
    "success": true,
    "data": items,
    "pagination": {
      "page":  page,
      "limit": limit,
      "total": total,
      "pages": pages,
    },
    "stats": stats,
  })))
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// `GET /api/admin/contacts/stats` — totals bucketed against local calendar
/// boundaries (day start, day start minus seven days, first of month).
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contacts = state.contacts.all().await.map_err(store_error)?;

  let today = today_start();
  let week = today - Duration::days(7);
  let month = month_start();

  Ok(Json(json!({
    "success": true,
    "data": {
      "total":     contacts.len(),
      "today":     count_by(&contacts, |c| c.created_at >= today),
      "thisWeek":  count_by(&contacts, |c| c.created_at >= week),
      "thisMonth": count_by(&contacts, |c| c.created_at >= month),
      "byType": {
        "publisher":  count_by(&contacts, |c| c.contact_type == "publisher"),
        "advertiser": count_by(&contacts, |c| c.contact_type == "advertiser"),
      },
      "byStatus": {
        "new":       count_by(&contacts, |c| c.status == LeadStatus::New),
        "contacted": count_by(&contacts, |c| c.status == LeadStatus::Contacted),
        "qualified": count_by(&contacts, |c| c.status == LeadStatus::Qualified),
        "rejected":  count_by(&contacts, |c| c.status == LeadStatus::Rejected),
      },
    },
  })))
}

// ─── Single-lead operations ──────────────────────────────────────────────────

/// `GET /api/admin/contacts/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contact = state
    .contacts
    .by_id(id)
    .await
    .map_err(store_error)?
    .ok_or(barracuda_core::Error::ContactNotFound(id))?;

  Ok(Json(json!({ "success": true, "data": contact })))
}

/// `PUT /api/admin/contacts/{id}` — body: any subset of
/// `{status, notes, assignedTo}`. Only fields present in the request are
/// applied; an explicit empty string is a real update.
pub async fn update<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  Path(id): Path<u64>,
  ApiJson(patch): ApiJson<ContactPatch>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let contact = state
    .contacts
    .update(id, patch)
    .await
    .map_err(store_error)?
    .ok_or(barracuda_core::Error::ContactNotFound(id))?;

  Ok(Json(json!({
    "success": true,
    "message": "Contact updated successfully",
    "data": contact,
  })))
}

/// `DELETE /api/admin/contacts/{id}` — permanent; deleting an already-gone
/// lead is a plain 404, not a fault.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let removed = state.contacts.delete(id).await.map_err(store_error)?;
  if !removed {
    return Err(barracuda_core::Error::ContactNotFound(id).into());
  }

  Ok(Json(json!({
    "success": true,
    "message": "Contact deleted successfully",
  })))
}

// ─── Export ──────────────────────────────────────────────────────────────────

const CSV_HEADER: &str =
  "ID,Name,Email,Company,Type,Messenger,Username,Status,Created At";

fn csv_quote(value: &str) -> String {
  format!("\"{}\"", value.replace('"', "\"\""))
}

/// Render leads to CSV. The header row is always present, even for zero
/// rows; `Name` and `Company` are quoted, everything else emitted bare.
fn render_csv(contacts: &[Contact]) -> String {
  let mut out = String::from(CSV_HEADER);
  for c in contacts {
    out.push('\n');
    out.push_str(&format!(
      "{},{},{},{},{},{},{},{},{}",
      c.id,
      csv_quote(&c.name),
      c.email,
      csv_quote(&c.company),
      c.contact_type,
      c.messenger.as_deref().unwrap_or(""),
      c.username.as_deref().unwrap_or(""),
      c.status.as_str(),
      c.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    ));
  }
  out
}

/// `POST /api/admin/contacts/export` — same filter predicates as the list
/// endpoint, no pagination, returned as a `text/csv` attachment.
pub async fn export<S>(
  State(state): State<AppState<S>>,
  _auth: AuthAdmin,
  ApiJson(params): ApiJson<ExportParams>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ContactStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let all = state.contacts.all().await.map_err(store_error)?;
  let rows = filter_and_sort(all, &params.filter());
  let body = render_csv(&rows);

  let filename = format!("contacts-{}.csv", Utc::now().timestamp_millis());
  Ok((
    [
      (header::CONTENT_TYPE, "text/csv".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename={filename}"),
      ),
    ],
    body,
  ))
}
