//! Service layer: the shared booking store and the form schema registry.

pub mod booking_store;
pub mod form_registry;

pub use booking_store::{demo_bookings, BookingStore};
pub use form_registry::FormRegistry;
