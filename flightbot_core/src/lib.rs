#![warn(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Shared domain and transport types for the flight reservation bot.
//!
//! Everything that crosses a crate boundary lives here: the reservation
//! records collected by the dialogs, the catalog of confirmed reservations,
//! the turn-level transport types, displayable cards, and the pricing
//! formulas.

pub mod card;
pub mod pricing;
pub mod reservation;
pub mod turn;

pub use card::{Card, CardAction, CardFact};
pub use reservation::{
    CarClass, FlightReservation, ParseClassError, RentalReservation, ReservationCatalog, TripClass,
};
pub use turn::{Outbound, Outbox, TurnEvent, TurnInput, TurnOutput};
