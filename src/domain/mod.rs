//! Domain types
//!
//! The form engine and the booking lifecycle. Nothing here knows about HTTP.

pub mod bookings;
pub mod forms;
