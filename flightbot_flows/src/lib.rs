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

//! The concrete reservation dialogs.
//!
//! Five step-sequence dialogs cover the whole conversation: the main menu,
//! flight intake, rental intake, show-one/cancel and show-all. [`registry`]
//! assembles them; [`router`] wires a ready-to-use [`TurnRouter`] with the
//! reservation bot's greeting, farewell and interruption keywords.

mod flight;
mod menu;
mod rental;
mod reservations;

use std::sync::Arc;

use flightbot_core::Outbound;
use flightbot_engine::{
    DialogError, DialogRegistry, Interruption, Interruptions, RouterOptions, TurnRouter,
};
use flightbot_state::StateStore;

/// Dialog ids.
pub mod ids {
    pub const MAIN_MENU: &str = "main_menu";
    pub const FLIGHT_INTAKE: &str = "flight_intake";
    pub const RENTAL_INTAKE: &str = "rental_intake";
    pub const SHOW_ONE: &str = "show_one_reservation";
    pub const SHOW_ALL: &str = "show_all_reservations";
}

const FLIGHT_CLASS_INFO: &str = "Standard - 2 or 3 seats next to each other, radio output in \
    the seat, no meal, cold beverage (water or juice)\n\n\
    Premium - onboarding priority over Standard class, 2 seats next to each other, 230V AC/DC \
    connector and USB connector in the seat, 20% more space for legs than in the Standard \
    class, no meal, cold beverage (water or juice)\n\n\
    Business - Business lounge with buffet and open bar, onboarding priority over Premium and \
    Standard classes, separate seat which can be converted into a bed, 24 inches flat screen \
    (TV, DVD, USB, HDMI), headset, meal and beverage included";

const CAR_CLASS_INFO: &str = "Economy - Basic radio, manually opened windows and central \
    aircondition. Costs 15$ per a day.\n\n\
    Standard - Audio with jack and usb connectors, electric windows in first seats row, \
    separate aircondition for every seats row. Costs 40$ per a day.\n\n\
    Premium - High class audio system with jack and usb connectors, colorful satellite \
    navigation with voice control, all electric windows and tailgate, separate aircondition \
    for every seat. Costs 80$ per a day.";

/// All reservation dialogs, ready for the engine.
pub fn registry() -> Result<DialogRegistry, DialogError> {
    let mut registry = DialogRegistry::new();
    registry.register(menu::definition())?;
    registry.register(flight::definition())?;
    registry.register(rental::definition())?;
    registry.register(reservations::show_one_definition())?;
    registry.register(reservations::show_all_definition())?;
    Ok(registry)
}

/// Router options of the reservation bot: root menu, fixed texts and the
/// reserved keywords.
#[must_use]
pub fn router_options() -> RouterOptions {
    RouterOptions {
        root_dialog: ids::MAIN_MENU.to_string(),
        greeting: "Hello new Passenger!".to_string(),
        farewell: "Goodbye Passenger!".to_string(),
        apology: "I am unable to do anything...".to_string(),
        interruptions: Interruptions::new()
            .with(
                "help",
                Interruption::Inform(vec![Outbound::Card(flightbot_cards::help())]),
            )
            .with(
                "more flight",
                Interruption::Inform(vec![Outbound::Text(FLIGHT_CLASS_INFO.to_string())]),
            )
            .with(
                "more cars",
                Interruption::Inform(vec![Outbound::Text(CAR_CLASS_INFO.to_string())]),
            )
            .with("cancel", Interruption::CancelRestart)
            .with("exit", Interruption::Exit),
    }
}

/// A turn router over the given store, running the reservation dialogs.
pub fn router(store: Arc<dyn StateStore>) -> Result<TurnRouter, DialogError> {
    Ok(TurnRouter::new(registry()?, store, router_options()))
}
