//! # Studio Scheduling Core
//!
//! Class scheduling and booking engine for a fitness-studio platform.
//!
//! This crate implements the one subsystem of the platform with genuine
//! invariants: expanding recurring class templates into concrete bookable
//! instances, deriving live seat availability under concurrent booking
//! attempts, enforcing membership eligibility, promoting waitlists in strict
//! arrival order, and detecting instructor double-booking. Everything else
//! (identity, payments, notification delivery, recommendations) is an
//! external collaborator reached through explicit ports.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Identifier newtypes and the public type surface
//! - [`models`]: Domain records (templates, instances, bookings, waitlist)
//! - [`scheduling`]: The pure core engine (expansion, availability,
//!   eligibility, booking, waitlist, search, validation)
//! - [`db`]: Persistence port, repository implementations and configuration
//! - [`services`]: Orchestration over the port (admission, cancellation →
//!   promotion, template lifecycle)
//! - [`http`]: Axum-based REST surface
//!
//! ## Concurrency
//!
//! Seat availability is always derived, never cached authoritatively. The
//! admission check and the booking insert happen inside one atomic repository
//! operation, so racing requests for the last seat cannot oversubscribe a
//! class; waitlist promotion is serialized the same way.

pub mod api;

pub mod db;
pub mod models;

pub mod scheduling;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
