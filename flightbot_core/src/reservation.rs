//! Reservation records collected by the dialogs.
//!
//! A `FlightReservation` is filled in field by field while the flight intake
//! dialog runs, so everything that is not known from the start is optional.
//! Confirmed reservations are appended to the `ReservationCatalog`, which is
//! the only collection the browse/cancel flows operate on.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a class label cannot be parsed.
#[derive(Debug, Clone, Error)]
#[error("unknown class: {0}")]
pub struct ParseClassError(pub String);

/// Flight cabin class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripClass {
    Standard,
    Business,
    Premium,
}

impl TripClass {
    /// All classes in menu order.
    pub const ALL: [Self; 3] = [Self::Standard, Self::Business, Self::Premium];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Business => "Business",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for TripClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseClassError(s.to_string()))
    }
}

/// Rental car class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarClass {
    Economy,
    Standard,
    Premium,
}

impl CarClass {
    /// All classes in menu order.
    pub const ALL: [Self; 3] = [Self::Economy, Self::Standard, Self::Premium];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Standard => "Standard",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for CarClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CarClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseClassError(s.to_string()))
    }
}

/// Car rental attached to a flight reservation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalReservation {
    /// Rental length in days (1..=89).
    pub length_days: u32,
    /// Number of people travelling with the passenger (0..=7).
    pub passengers: u32,
    /// Child seats requested, never more than `passengers`.
    pub child_seats: u32,
    /// Car class, set once the user picks one.
    pub car_class: Option<CarClass>,
    /// Total cost, daily rate times `length_days`.
    pub cost: u32,
}

/// A flight reservation in progress or confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightReservation {
    /// Seven digit id, generated only when the user confirms.
    pub reservation_id: Option<u32>,
    pub passenger_name: String,
    pub from_airport: String,
    pub to_airport: String,
    pub one_way: bool,
    pub start_date: Option<NaiveDate>,
    /// `None` for one way flights, otherwise on or after `start_date`.
    pub end_date: Option<NaiveDate>,
    pub trip_class: Option<TripClass>,
    pub cost: u32,
    pub rental: Option<RentalReservation>,
}

/// Insertion-ordered collection of confirmed reservations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCatalog {
    reservations: Vec<FlightReservation>,
}

impl ReservationCatalog {
    /// Append a confirmed reservation.
    pub fn push(&mut self, reservation: FlightReservation) {
        self.reservations.push(reservation);
    }

    /// Look up a reservation by id. Absence is a normal outcome, not an error.
    #[must_use]
    pub fn find(&self, id: u32) -> Option<&FlightReservation> {
        self.reservations
            .iter()
            .find(|r| r.reservation_id == Some(id))
    }

    /// Remove the first reservation with the given id, keeping the order of
    /// the remaining entries.
    pub fn remove(&mut self, id: u32) -> Option<FlightReservation> {
        let index = self
            .reservations
            .iter()
            .position(|r| r.reservation_id == Some(id))?;
        Some(self.reservations.remove(index))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reservations.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.reservations.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlightReservation> {
        self.reservations.iter()
    }
}
