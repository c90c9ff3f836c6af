//! Cabanamar booking system.
//!
//! A beach-cabin reservation service: a reducer-driven reservation
//! wizard, a pure pricing engine, a deterministic time-range resolver,
//! a submission client with a closed error taxonomy, and two thin HTTP
//! endpoints over an atomic cabin-assignment backend.
//!
//! # Architecture
//!
//! ```text
//! Catalog Loader ──▶ Wizard State Machine (reducer-owned selections)
//!                        │                    │
//!                        ▼                    ▼
//!                  Pricing Engine      Time-Range Resolver
//!                  (derived totals)    (one path for probe + create)
//!                        │                    │
//!                        └───────┬────────────┘
//!                                ▼
//!                     Reservation Submission Client
//!                     (idle → submitting → {success, failure})
//!                                │
//!                                ▼
//!                   POST /api/availability, /api/reservations
//!                                │
//!                                ▼
//!                  BookingBackend (atomic assign/create procedures)
//! ```
//!
//! # Key Properties
//!
//! - **One resolution path**: the availability probe and the
//!   reservation creation resolve the booking window through the same
//!   [`timerange::resolve_time_range`] call, so they can never
//!   disagree about the window being booked.
//! - **Pricing floor, advisory warning**: groups below the minimum
//!   headcount still book at the minimum-equivalent price; the wizard
//!   surfaces a non-blocking warning instead of a gate.
//! - **Atomicity at the boundary**: no two reservations share a cabin
//!   in overlapping windows, enforced inside the backend procedure,
//!   treated as a black-box transaction here and faked under a mutex
//!   in [`backend::InMemoryBackend`] for tests.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod confirmation;
pub mod gateway;
pub mod pricing;
pub mod server;
pub mod session;
pub mod submission;
pub mod timerange;
pub mod types;
pub mod wizard;

pub use config::Config;
pub use server::{AppState, build_router};
