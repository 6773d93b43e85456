mod api;
mod app;
mod config;
mod domain;
mod error;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::Result;

use services::{demo_bookings, BookingStore, FormRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        rating_policy = ?settings.rating_policy(),
        "Starting HandyHub backend"
    );

    // Booking store
    let bookings = if settings.seed_demo_bookings {
        let seeded = demo_bookings();
        tracing::info!(count = seeded.len(), "Seeding demo bookings");
        BookingStore::with_bookings(settings.rating_policy(), seeded)
    } else {
        BookingStore::new(settings.rating_policy())
    };

    // Form schemas
    let forms = FormRegistry::builtin()?;
    tracing::info!(forms = forms.ids().len(), "Form registry initialized");

    // Create application state
    let state = app::AppState::new(settings.clone(), bookings, forms);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
