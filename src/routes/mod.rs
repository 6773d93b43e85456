pub mod bookings;
pub mod forms;
pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;

use crate::app::AppState;

/// Build the API router with all routes
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::health_check))
        // Forms
        .route("/forms", get(forms::list_forms))
        .route("/forms/:form_id", get(forms::get_form))
        .route("/forms/:form_id/render", post(forms::render_form))
        .route("/forms/:form_id/validate", post(forms::validate_form))
        .route("/forms/:form_id/submit", post(forms::submit_form))
        // Bookings
        .route("/bookings", post(bookings::create_booking))
        .route("/bookings/:booking_id", get(bookings::get_booking))
        .route(
            "/bookings/customer/:customer_id",
            get(bookings::list_customer_bookings),
        )
        .route(
            "/bookings/worker/:worker_id/requests",
            get(bookings::list_worker_requests),
        )
        .route(
            "/bookings/worker/:worker_id/jobs",
            get(bookings::list_worker_jobs),
        )
        // Lifecycle
        .route("/bookings/:booking_id/accept", post(bookings::accept_booking))
        .route("/bookings/:booking_id/reject", post(bookings::reject_booking))
        .route(
            "/bookings/:booking_id/complete",
            post(bookings::complete_booking),
        )
        .route(
            "/bookings/:booking_id/status",
            patch(bookings::update_booking_status),
        )
        // Ratings
        .route(
            "/bookings/:booking_id/rating/user",
            post(bookings::rate_by_user),
        )
        .route(
            "/bookings/:booking_id/rating/worker",
            post(bookings::rate_by_worker),
        )
}
