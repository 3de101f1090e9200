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

//! Card rendering.
//!
//! Pure functions from reservation values to displayable [`Card`]s. The
//! dialogs pass field values only; nothing here touches state or transport.

use chrono::NaiveDate;
use flightbot_core::{Card, FlightReservation, RentalReservation};

/// Card sent when the flight intake dialog starts.
#[must_use]
pub fn quick_help() -> Card {
    Card::new("New reservation")
        .with_body(
            "Let's start reservation process!\n\
             In case you get lost just send one of the messages to the bot:",
        )
        .fact("help", "Information about the flight bot will be displayed.")
        .fact(
            "cancel",
            "Current reservation will be aborted and main menu will be displayed.",
        )
        .fact("exit", "Conversation will be immediately ended.")
}

/// Card sent for the `help` keyword.
#[must_use]
pub fn help() -> Card {
    Card::new("Help")
        .with_body(
            "Flight Reservation Bot is an assistant which helps you to book a flight.\n\n\
             In order to book a flight ticket please provide following information: \
             Passenger's Name, Departure Airport, Arrival Airport, are you going to travel \
             one way or return back to destination airport, Departure Date, Return Date \
             (if applicable), Flight Class. At the end of reservation process you will be \
             able to book a car rental at destination airport. Flight Reservation Bot \
             allows you also to display all reservations you have done during current \
             conversation, display specific reservation or even cancel it.\n\n\
             In case you:\n\
             - would like to abort current reservation process and get back to main menu \
             please type in 'cancel',\n\
             - need help please type in 'help',\n\
             - would like to immediately end the conversation please type in 'exit'.\n\n\
             If you want to make a reservation by yourself just use Skyscanner.",
        )
        .action("Go to Skyscanner", "https://www.skyscanner.pl/")
}

/// Summary shown before the user confirms a new flight reservation.
#[must_use]
pub fn flight_summary(reservation: &FlightReservation) -> Card {
    flight_card("New Flight Reservation", reservation)
}

/// Summary shown before the user confirms a car rental.
#[must_use]
pub fn rental_summary(rental: &RentalReservation) -> Card {
    let mut card = Card::new("New Car Rental");
    push_rental_facts(&mut card, rental);
    card
}

/// Full details of a stored reservation, including its rental if present.
#[must_use]
pub fn reservation_details(reservation: &FlightReservation) -> Card {
    let title = reservation
        .reservation_id
        .map_or_else(|| "Reservation".to_string(), |id| format!("Reservation {id}"));
    let mut card = flight_card(&title, reservation);
    if let Some(rental) = &reservation.rental {
        push_rental_facts(&mut card, rental);
    }
    card
}

fn flight_card(title: &str, reservation: &FlightReservation) -> Card {
    let mut card = Card::new(title)
        .fact("Passenger", &reservation.passenger_name)
        .fact("Departure airport", &reservation.from_airport)
        .fact("Arrival airport", &reservation.to_airport)
        .fact("Departure date", format_date(reservation.start_date));
    if !reservation.one_way {
        card = card.fact("Return date", format_date(reservation.end_date));
    }
    card.fact(
        "Flight class",
        reservation
            .trip_class
            .map_or("-", flightbot_core::TripClass::as_str),
    )
    .fact("Flight cost", format_cost(reservation.cost))
}

fn push_rental_facts(card: &mut Card, rental: &RentalReservation) {
    let length = if rental.length_days == 1 {
        "1 day".to_string()
    } else {
        format!("{} days", rental.length_days)
    };
    card.push_fact("Rental length", length);
    card.push_fact("Passengers", rental.passengers.to_string());
    card.push_fact("Child seats", rental.child_seats.to_string());
    card.push_fact(
        "Car class",
        rental.car_class.map_or("-", flightbot_core::CarClass::as_str),
    );
    card.push_fact("Rental cost", format_cost(rental.cost));
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

fn format_cost(cost: u32) -> String {
    format!("{cost} $")
}
