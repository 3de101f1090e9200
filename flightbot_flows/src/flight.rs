//! The flight intake dialog.
//!
//! Collects the reservation field by field, writing each answer into the
//! `FlightInfo` slot before asking the next question, so a turn can resume
//! anywhere. The confirm step generates the reservation id; the final step
//! appends the finished record to the catalog.

use chrono::{Local, NaiveDate};
use flightbot_core::{pricing, FlightReservation, TripClass};
use flightbot_engine::{
    DialogDefinition, DialogError, PromptSpec, StepAction, StepContext, StepResult, Validation,
};
use flightbot_state::{slots, StateAccessor};
use tracing::info;

use crate::ids;

const PASSENGER_NAME: &str = "PassengerName";
const FROM_AIRPORT: &str = "FromAirport";
const TO_AIRPORT: &str = "ToAirport";
const ONE_OR_TWO_WAY: &str = "OneOrTwoWayFlight";
const START_DATE: &str = "StartDate";
const END_DATE: &str = "EndDate";
const CLASS_CHOICE: &str = "ClassChoice";
const CONFIRM_CHOICE: &str = "ConfirmChoice";
const CAR_OFFER: &str = "CarReservationChoice";

const OPTION_ONE_WAY: &str = "One way flight";
const OPTION_TWO_WAYS: &str = "Two ways flight";
pub(crate) const OPTION_CONFIRM: &str = "Yes, confirm";
pub(crate) const OPTION_START_OVER: &str = "No, start over";
const OPTION_RENT: &str = "Yes, I would like to rent a car.";
const OPTION_NO_RENT: &str = "No, thank you.";

const RETRY_OPTION: &str = "I don't recognize this option. Try again";

pub fn definition() -> DialogDefinition {
    DialogDefinition::new(ids::FLIGHT_INTAKE)
        .step(get_passenger_name)
        .step(get_from_airport)
        .step(get_to_airport)
        .step(get_one_or_two_way)
        .step(get_start_date)
        .step(get_end_date)
        .step(get_trip_class)
        .step(display_reservation)
        .step(confirm_reservation)
        .step(ask_for_car_rental)
        .step(finish_reservation)
        .text_prompt(PASSENGER_NAME, validate_passenger_name)
        .text_prompt(FROM_AIRPORT, validate_from_airport)
        .text_prompt(TO_AIRPORT, validate_to_airport)
        .date_prompt(START_DATE, validate_start_date)
        .date_prompt(END_DATE, validate_end_date)
}

fn get_passenger_name(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    ctx.send_card(flightbot_cards::quick_help());
    Ok(StepAction::Prompt(PromptSpec::text_input(
        PASSENGER_NAME,
        "Please enter your name.",
    )))
}

fn get_from_airport(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.passenger_name = ctx.result().as_text()?.to_string();
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    Ok(StepAction::Prompt(PromptSpec::text_input(
        FROM_AIRPORT,
        "Please enter departure airport.",
    )))
}

fn get_to_airport(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.from_airport = ctx.result().as_text()?.to_string();
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    Ok(StepAction::Prompt(PromptSpec::text_input(
        TO_AIRPORT,
        "Please enter arrival airport.",
    )))
}

fn get_one_or_two_way(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.to_airport = ctx.result().as_text()?.to_string();
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            ONE_OR_TWO_WAY,
            "Please choose one of the options:",
            [OPTION_ONE_WAY, OPTION_TWO_WAYS],
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn get_start_date(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.one_way = ctx.result().as_choice()?.eq_ignore_ascii_case(OPTION_ONE_WAY);
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    Ok(StepAction::Prompt(PromptSpec::date_input(
        START_DATE,
        "Please enter departure date.",
    )))
}

fn get_end_date(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.start_date = Some(ctx.result().as_date()?);
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    if flight.one_way {
        // No return date to collect.
        return Ok(StepAction::Continue(StepResult::None));
    }
    Ok(StepAction::Prompt(PromptSpec::date_input(
        END_DATE,
        "Please enter date of return.",
    )))
}

fn get_trip_class(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    if flight.one_way {
        flight.end_date = None;
    } else {
        flight.end_date = Some(ctx.result().as_date()?);
    }
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            CLASS_CHOICE,
            "Please choose flight class (to access more details type in 'more flight'):",
            TripClass::ALL.map(TripClass::as_str),
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn display_reservation(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let class = parse_trip_class(ctx.result().as_choice()?)?;
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.trip_class = Some(class);
    flight.cost = pricing::flight_cost(class);
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;

    ctx.send_text("Thank you, below you can find your reservation.");
    ctx.send_card(flightbot_cards::flight_summary(&flight));

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            CONFIRM_CHOICE,
            "Please verify if flight details are correct and choose option:",
            [OPTION_CONFIRM, OPTION_START_OVER],
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn confirm_reservation(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    if !ctx.result().as_choice()?.eq_ignore_ascii_case(OPTION_CONFIRM) {
        return Ok(StepAction::Replace(ids::FLIGHT_INTAKE.to_string()));
    }

    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    let id = pricing::generate_reservation_id();
    flight.reservation_id = Some(id);
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;
    ctx.send_text(format!("Thank you, please save your reservation id: {id}."));

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            CAR_OFFER,
            "Would you like to rent a car on destination airport?",
            [OPTION_RENT, OPTION_NO_RENT],
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn ask_for_car_rental(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    if ctx.result().as_choice()?.eq_ignore_ascii_case(OPTION_RENT) {
        return Ok(StepAction::PushChild(ids::RENTAL_INTAKE.to_string()));
    }

    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    flight.rental = None;
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;
    Ok(StepAction::Continue(StepResult::None))
}

fn finish_reservation(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    let mut catalog: flightbot_core::ReservationCatalog =
        ctx.state.get_or_default(slots::RESERVATION_CATALOG)?;
    info!(
        reservation_id = flight.reservation_id,
        rental = flight.rental.is_some(),
        "reservation confirmed"
    );
    catalog.push(flight);
    ctx.state.set(slots::RESERVATION_CATALOG, &catalog)?;

    Ok(StepAction::End(StepResult::None))
}

fn parse_trip_class(label: &str) -> Result<TripClass, DialogError> {
    label.parse().map_err(|_| DialogError::ResultShape {
        expected: "trip class",
        got: "choice",
    })
}

fn validate_passenger_name(input: &str, _state: &StateAccessor) -> Validation {
    let trimmed = input.trim();
    let words = trimmed.split_whitespace().count();
    if trimmed.is_empty() || words > 3 {
        Validation::invalid("Please type in correct name.")
    } else {
        Validation::Valid(StepResult::Text(trimmed.to_string()))
    }
}

fn validate_from_airport(input: &str, _state: &StateAccessor) -> Validation {
    let trimmed = input.trim();
    let words = trimmed.split_whitespace().count();
    if trimmed.is_empty() || words > 2 {
        Validation::invalid("Please type in correct departure airport.")
    } else {
        Validation::Valid(StepResult::Text(trimmed.to_string()))
    }
}

fn validate_to_airport(input: &str, state: &StateAccessor) -> Validation {
    let trimmed = input.trim();
    let words = trimmed.split_whitespace().count();
    let flight: FlightReservation = state.get_or_default(slots::FLIGHT_INFO).unwrap_or_default();
    if trimmed.is_empty() || words > 2 || flight.from_airport == trimmed {
        Validation::invalid("Please type in correct arrival airport.")
    } else {
        Validation::Valid(StepResult::Text(trimmed.to_string()))
    }
}

fn validate_start_date(candidates: &[NaiveDate], _state: &StateAccessor) -> Validation {
    let Some(date) = candidates.first() else {
        return Validation::invalid("Please type in correct departure date.");
    };
    let today = Local::now().date_naive();
    if *date > today {
        Validation::Valid(StepResult::Date(*date))
    } else {
        Validation::invalid("Departure date should be greater than today.")
    }
}

fn validate_end_date(candidates: &[NaiveDate], state: &StateAccessor) -> Validation {
    let Some(date) = candidates.first() else {
        return Validation::invalid("Please type in correct arrival date.");
    };
    let flight: FlightReservation = state.get_or_default(slots::FLIGHT_INFO).unwrap_or_default();
    match flight.start_date {
        Some(start) if *date < start => {
            Validation::invalid("Return date should be greater or the same as departure date")
        }
        _ => Validation::Valid(StepResult::Date(*date)),
    }
}
