//! Booking routes
//!
//! Creation from the booking form, the three list views, guarded status
//! transitions and ratings.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::{Created, DataResponse, Paginated, PaginationParams};
use crate::app::AppState;
use crate::domain::bookings::{
    Booking, BookingAction, BookingError, BookingStatus, NewBooking, Party, PaymentMethod, Priority,
    Transition,
};
use crate::domain::forms::{FormSession, FormValues};
use crate::error::{ApiError, ApiResult};
use crate::middleware::request_id;
use crate::services::form_registry::BOOKING_FORM;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub customer_id: String,
    pub worker_id: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// Booking form values
    #[serde(default)]
    pub values: FormValues,
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

/// Query parameters of booking views
#[derive(Debug, Deserialize, Default)]
pub struct ViewQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub party: Option<Party>,
}

impl ViewQuery {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Stars are range-checked by the store
#[derive(Debug, Deserialize)]
pub struct RatingInput {
    pub stars: i64,
}

/// Booking as shown on a card: the record plus derived display fields and
/// the actions the viewing party may take.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub title: String,
    pub price: f64,
    pub actions: Vec<BookingAction>,
}

fn view(state: &AppState, booking: Booking, party: Party) -> BookingView {
    let actions = booking.available_actions(party, state.bookings.rating_policy());
    BookingView {
        title: booking.title(),
        price: booking.price(),
        actions,
        booking,
    }
}

fn views(state: &AppState, bookings: Vec<Booking>, party: Party) -> Vec<BookingView> {
    bookings.into_iter().map(|b| view(state, b, party)).collect()
}

// ============================================================================
// Payload Mapping
// ============================================================================

fn text(payload: &FormValues, key: &str) -> String {
    match payload.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn timestamp(payload: &FormValues, key: &str) -> ApiResult<Option<DateTime<Utc>>> {
    match payload.get(key).and_then(Value::as_str) {
        Some(s) if !s.is_empty() => DateTime::parse_from_rfc3339(s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| ApiError::bad_request(format!("{} is not a valid timestamp", key))),
        _ => Ok(None),
    }
}

fn enum_value<T>(payload: &FormValues, key: &str) -> ApiResult<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    match payload.get(key) {
        Some(Value::String(s)) if s.is_empty() => Ok(T::default()),
        Some(Value::Null) | None => Ok(T::default()),
        Some(v) => serde_json::from_value(v.clone())
            .map_err(|_| ApiError::bad_request(format!("{} has an unsupported value", key))),
    }
}

/// Shape a committed booking form payload into a new booking
fn new_booking(request: &CreateBookingRequest, payload: &FormValues) -> ApiResult<NewBooking> {
    Ok(NewBooking {
        customer_id: request.customer_id.clone(),
        worker_id: request.worker_id.clone(),
        category: text(payload, "serviceType"),
        subcategory: request.subcategory.clone().unwrap_or_default(),
        priority: enum_value::<Priority>(payload, "priority")?,
        scheduled_start_time: timestamp(payload, "scheduledStartTime")?,
        scheduled_end_time: timestamp(payload, "scheduledEndTime")?,
        address: text(payload, "address"),
        description: text(payload, "description"),
        estimated_price: payload
            .get("estimatedPrice")
            .and_then(Value::as_f64)
            .unwrap_or_default(),
        payment_method: enum_value::<PaymentMethod>(payload, "paymentMethod")?,
        coupon_code: text(payload, "couponCode"),
        ..Default::default()
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateBookingRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.customer_id.trim().is_empty() || request.worker_id.trim().is_empty() {
        return Err(ApiError::bad_request("customerId and workerId are required"));
    }

    let schema = state
        .forms
        .get(BOOKING_FORM)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("booking form is not registered")))?;
    let session = FormSession::initialize(schema, &request.values);

    let (bookings, request) = (&state.bookings, &request);
    let booking = session
        .submit_with(schema, |payload| async move {
            let input = new_booking(request, &payload)?;
            Ok::<_, ApiError>(bookings.create(input)?)
        })
        .await?;
    Ok(Created(view(&state, booking, Party::Customer)))
}

/// GET /bookings/:booking_id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.bookings.get(&booking_id)?;
    let party = query.party.unwrap_or(Party::Customer);
    Ok(DataResponse::new(view(&state, booking, party)))
}

/// GET /bookings/customer/:customer_id
pub async fn list_customer_bookings(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let bookings = state.bookings.bookings_for_customer(&customer_id);
    Paginated::from_items(views(&state, bookings, Party::Customer), &query.pagination())
}

/// GET /bookings/worker/:worker_id/requests
///
/// Pending requests waiting for the worker's answer.
pub async fn list_worker_requests(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let bookings = state.bookings.pending_requests_for_worker(&worker_id);
    Paginated::from_items(views(&state, bookings, Party::Worker), &query.pagination())
}

/// GET /bookings/worker/:worker_id/jobs
///
/// Accepted and completed jobs.
pub async fn list_worker_jobs(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
    Query(query): Query<ViewQuery>,
) -> impl IntoResponse {
    let bookings = state.bookings.active_or_done_for_worker(&worker_id);
    Paginated::from_items(views(&state, bookings, Party::Worker), &query.pagination())
}

fn transitioned(
    state: &AppState,
    headers: &HeaderMap,
    booking_id: &str,
    transition: Transition,
    result: Result<Booking, BookingError>,
) -> ApiResult<DataResponse<BookingView>> {
    let booking = result.map_err(|e| {
        tracing::warn!(
            request_id = request_id(headers).unwrap_or("-"),
            booking_id = %booking_id,
            %transition,
            error = %e,
            "Booking transition refused"
        );
        ApiError::from(e)
    })?;
    Ok(DataResponse::new(view(state, booking, Party::Worker)))
}

/// POST /bookings/:booking_id/accept
pub async fn accept_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let result = state.bookings.accept(&booking_id);
    transitioned(&state, &headers, &booking_id, Transition::Accept, result)
}

/// POST /bookings/:booking_id/reject
pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let result = state.bookings.reject(&booking_id);
    transitioned(&state, &headers, &booking_id, Transition::Reject, result)
}

/// POST /bookings/:booking_id/complete
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let result = state.bookings.complete(&booking_id);
    transitioned(&state, &headers, &booking_id, Transition::Complete, result)
}

/// PATCH /bookings/:booking_id/status?status=ACCEPTED
///
/// Same guarded transitions, addressed by target status.
pub async fn update_booking_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<String>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<impl IntoResponse> {
    let target: BookingStatus = query.status.parse().map_err(ApiError::BadRequest)?;
    let step = Transition::towards(target).ok_or_else(|| {
        ApiError::bad_request(format!("Cannot move a booking to {}", target))
    })?;
    let result = state.bookings.transition(&booking_id, step);
    transitioned(&state, &headers, &booking_id, step, result)
}

/// POST /bookings/:booking_id/rating/user
pub async fn rate_by_user(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(input): Json<RatingInput>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.bookings.rate_by_user(&booking_id, input.stars)?;
    Ok(DataResponse::new(view(&state, booking, Party::Customer)))
}

/// POST /bookings/:booking_id/rating/worker
pub async fn rate_by_worker(
    State(state): State<Arc<AppState>>,
    Path(booking_id): Path<String>,
    Json(input): Json<RatingInput>,
) -> ApiResult<impl IntoResponse> {
    let booking = state.bookings.rate_by_worker(&booking_id, input.stars)?;
    Ok(DataResponse::new(view(&state, booking, Party::Worker)))
}
