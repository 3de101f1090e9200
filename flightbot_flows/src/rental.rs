//! The rental intake dialog.
//!
//! Runs as a child of the flight intake: collects the rental details into
//! the `RentalInfo` slot and, on confirmation, attaches the finished rental
//! to the in-progress flight reservation before popping. A rejected summary
//! blanks the slot and starts the intake over.

use flightbot_core::{pricing, CarClass, FlightReservation, RentalReservation};
use flightbot_engine::{
    DialogDefinition, DialogError, PromptSpec, StepAction, StepContext, StepResult, Validation,
};
use flightbot_state::{slots, StateAccessor};
use tracing::info;

use crate::flight::{OPTION_CONFIRM, OPTION_START_OVER};
use crate::ids;

const RENTAL_LENGTH: &str = "RentalLength";
const PASSENGERS_NUMBER: &str = "PassengersNumber";
const CHILD_SEATS: &str = "ChildSeat";
const CAR_CLASS_CHOICE: &str = "CarClassChoice";
const CONFIRM_CHOICE: &str = "ConfirmChoice";

const RETRY_OPTION: &str = "I don't recognize this option. Try again";

pub fn definition() -> DialogDefinition {
    DialogDefinition::new(ids::RENTAL_INTAKE)
        .step(ask_rental_length)
        .step(ask_passengers_number)
        .step(ask_child_seats)
        .step(ask_car_class)
        .step(display_rental)
        .step(finish_rental)
        .text_prompt(RENTAL_LENGTH, validate_rental_length)
        .text_prompt(PASSENGERS_NUMBER, validate_passengers_number)
        .text_prompt(CHILD_SEATS, validate_child_seats)
}

fn ask_rental_length(_ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    Ok(StepAction::Prompt(PromptSpec::text_input(
        RENTAL_LENGTH,
        "Please enter the number of days you would like to rent a car.",
    )))
}

fn ask_passengers_number(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let mut rental: RentalReservation = ctx.state.get_or_default(slots::RENTAL_INFO)?;
    rental.length_days = to_count(ctx.result().as_number()?);
    ctx.state.set(slots::RENTAL_INFO, &rental)?;

    Ok(StepAction::Prompt(PromptSpec::text_input(
        PASSENGERS_NUMBER,
        "Please enter the number of people which will travel with you.",
    )))
}

fn ask_child_seats(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let passengers = to_count(ctx.result().as_number()?);
    let mut rental: RentalReservation = ctx.state.get_or_default(slots::RENTAL_INFO)?;
    rental.passengers = passengers;
    ctx.state.set(slots::RENTAL_INFO, &rental)?;

    if passengers == 0 {
        // Travelling alone, no child seats to ask about.
        return Ok(StepAction::Continue(StepResult::None));
    }
    Ok(StepAction::Prompt(PromptSpec::text_input(
        CHILD_SEATS,
        "In case you are going to travel with child, please enter the number of child seats \
         you will need.",
    )))
}

fn ask_car_class(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let child_seats = match ctx.result() {
        StepResult::Number(value) => to_count(*value),
        _ => 0,
    };
    let mut rental: RentalReservation = ctx.state.get_or_default(slots::RENTAL_INFO)?;
    rental.child_seats = child_seats;
    ctx.state.set(slots::RENTAL_INFO, &rental)?;

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            CAR_CLASS_CHOICE,
            "Please choose car class (to access more details type in 'more cars'):",
            CarClass::ALL.map(CarClass::as_str),
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn display_rental(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let class = parse_car_class(ctx.result().as_choice()?)?;
    let mut rental: RentalReservation = ctx.state.get_or_default(slots::RENTAL_INFO)?;
    rental.car_class = Some(class);
    rental.cost = pricing::rental_cost(class, rental.length_days);
    ctx.state.set(slots::RENTAL_INFO, &rental)?;

    ctx.send_text("Thank you, below you can find your car rental details.");
    ctx.send_card(flightbot_cards::rental_summary(&rental));

    Ok(StepAction::Prompt(
        PromptSpec::choice(
            CONFIRM_CHOICE,
            "Please verify if rental details are correct and choose option:",
            [OPTION_CONFIRM, OPTION_START_OVER],
        )
        .with_retry(RETRY_OPTION),
    ))
}

fn finish_rental(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    if !ctx.result().as_choice()?.eq_ignore_ascii_case(OPTION_CONFIRM) {
        // Start the rental over with a blank slate.
        ctx.state
            .set(slots::RENTAL_INFO, &RentalReservation::default())?;
        return Ok(StepAction::Replace(ids::RENTAL_INTAKE.to_string()));
    }

    let rental: RentalReservation = ctx.state.get_or_default(slots::RENTAL_INFO)?;
    let mut flight: FlightReservation = ctx.state.get_or_default(slots::FLIGHT_INFO)?;
    info!(
        length_days = rental.length_days,
        cost = rental.cost,
        "rental confirmed"
    );
    flight.rental = Some(rental);
    ctx.state.set(slots::FLIGHT_INFO, &flight)?;
    ctx.send_text(
        "Thank you, your car rental has been associated with your flight reservation. Contact \
         with Rental Office at destination airport in order to get the car. You can ask \
         airport staff to get directions of Rental Office.",
    );

    Ok(StepAction::End(StepResult::None))
}

fn parse_car_class(label: &str) -> Result<CarClass, DialogError> {
    label.parse().map_err(|_| DialogError::ResultShape {
        expected: "car class",
        got: "choice",
    })
}

fn to_count(value: i64) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

fn validate_rental_length(input: &str, _state: &StateAccessor) -> Validation {
    let Ok(length) = input.trim().parse::<i64>() else {
        return Validation::invalid("The value you have provided is not correct, please try again.");
    };
    if length <= 0 {
        Validation::invalid("You cannot rent a car for less than 1 day.")
    } else if length >= 90 {
        Validation::invalid("You cannot rent a car for more than 90 days.")
    } else {
        Validation::Valid(StepResult::Number(length))
    }
}

fn validate_passengers_number(input: &str, _state: &StateAccessor) -> Validation {
    let Ok(passengers) = input.trim().parse::<i64>() else {
        return Validation::invalid("The value you have provided is not correct, please try again.");
    };
    if passengers < 0 {
        Validation::invalid(
            "The value you have provided is not correct, if you are going to travel alone \
             please type in 0.",
        )
    } else if passengers > 7 {
        Validation::invalid("Sorry, we do not have such big cars.")
    } else {
        Validation::Valid(StepResult::Number(passengers))
    }
}

fn validate_child_seats(input: &str, state: &StateAccessor) -> Validation {
    let Ok(child_seats) = input.trim().parse::<i64>() else {
        return Validation::invalid("The value you have provided is not correct, please try again.");
    };
    let rental: RentalReservation = state.get_or_default(slots::RENTAL_INFO).unwrap_or_default();
    if child_seats < 0 {
        Validation::invalid("The value you have provided is not correct, please try again.")
    } else if child_seats > i64::from(rental.passengers) {
        Validation::invalid(
            "The value is greater than the number of passengers you have declared before, \
             please type in correct child seats number.",
        )
    } else {
        Validation::Valid(StepResult::Number(child_seats))
    }
}
