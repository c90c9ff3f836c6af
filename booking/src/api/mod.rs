//! API endpoints for the reservation system.
//!
//! This module contains the HTTP handlers of the booking boundary:
//! - Availability: probing for a free cabin in a resolved window
//! - Reservations: creating a reservation through the atomic procedure
//! - Profile: storing the contact phone before the confirmation view
//!
//! The handlers are thin: they validate payload shape, resolve the
//! time range server-side, and delegate to the backend collaborator.

pub mod availability;
pub mod profile;
pub mod reservations;

pub use availability::check_availability;
pub use profile::save_phone;
pub use reservations::create_reservation;
