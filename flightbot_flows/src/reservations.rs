//! Browsing and cancelling stored reservations.
//!
//! The show-one dialog doubles as the cancellation flow: after displaying a
//! match it offers cancellation only when something was found. Lookup misses
//! are a normal outcome and never an error.

use flightbot_core::ReservationCatalog;
use flightbot_engine::{
    DialogDefinition, DialogError, PromptSpec, StepAction, StepContext, StepResult, Validation,
};
use flightbot_state::{slots, StateAccessor};
use tracing::info;

use crate::ids;

const RESERVATION_ID: &str = "ReservationId";
const NEXT_ACTION: &str = "NextAction";

const OPTION_SHOW_OTHER: &str = "Display other reservation";
const OPTION_RETURN_MENU: &str = "Return to main menu";
const CANCEL_PREFIX: &str = "Cancel reservation";

const NOTHING_TO_SHOW: &str = "There is no reservation to display.";

/// Key of the instance-local value carrying the id displayed this run.
const REQUEST_ID: &str = "request_id";

pub fn show_one_definition() -> DialogDefinition {
    DialogDefinition::new(ids::SHOW_ONE)
        .step(ask_reservation_id)
        .step(display_reservation)
        .step(ask_next_action)
        .step(finish_show_one)
        .text_prompt(RESERVATION_ID, validate_reservation_id)
}

pub fn show_all_definition() -> DialogDefinition {
    DialogDefinition::new(ids::SHOW_ALL).step(display_all_reservations)
}

fn ask_reservation_id(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let catalog: ReservationCatalog = ctx.state.get_or_default(slots::RESERVATION_CATALOG)?;
    if catalog.is_empty() {
        ctx.send_text(NOTHING_TO_SHOW);
        return Ok(StepAction::End(StepResult::None));
    }

    Ok(StepAction::Prompt(PromptSpec::text_input(
        RESERVATION_ID,
        "Please enter reservation ID.",
    )))
}

fn display_reservation(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let id = ctx.result().as_number()?;
    let catalog: ReservationCatalog = ctx.state.get_or_default(slots::RESERVATION_CATALOG)?;

    match u32::try_from(id).ok().and_then(|id| catalog.find(id)) {
        Some(reservation) => {
            ctx.send_card(flightbot_cards::reservation_details(reservation));
            ctx.set_value(REQUEST_ID, &id)?;
        }
        None => {
            ctx.send_text("There is not any reservation matching provided ID.");
            ctx.set_value(REQUEST_ID, &0i64)?;
        }
    }
    Ok(StepAction::Continue(StepResult::None))
}

fn ask_next_action(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let id: i64 = ctx.value(REQUEST_ID).unwrap_or(0);
    let options = if id == 0 {
        vec![OPTION_SHOW_OTHER.to_string(), OPTION_RETURN_MENU.to_string()]
    } else {
        vec![
            format!("{CANCEL_PREFIX} {id}"),
            OPTION_SHOW_OTHER.to_string(),
            OPTION_RETURN_MENU.to_string(),
        ]
    };

    Ok(StepAction::Prompt(
        PromptSpec::choice(NEXT_ACTION, "What would you like to do next:", options)
            .with_retry("I don't recognize this option. Try again."),
    ))
}

fn finish_show_one(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let choice = ctx.result().as_choice()?.to_string();
    if choice.eq_ignore_ascii_case(OPTION_SHOW_OTHER) {
        return Ok(StepAction::Replace(ids::SHOW_ONE.to_string()));
    }
    if choice.starts_with(CANCEL_PREFIX) {
        let id: i64 = ctx.value(REQUEST_ID).unwrap_or(0);
        let mut catalog: ReservationCatalog =
            ctx.state.get_or_default(slots::RESERVATION_CATALOG)?;
        if let Ok(id) = u32::try_from(id) {
            if catalog.remove(id).is_some() {
                info!(reservation_id = id, "reservation cancelled");
            }
        }
        ctx.state.set(slots::RESERVATION_CATALOG, &catalog)?;
        ctx.send_text("Your reservation has been successfully cancelled.");
    }
    Ok(StepAction::End(StepResult::None))
}

fn display_all_reservations(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let catalog: ReservationCatalog = ctx.state.get_or_default(slots::RESERVATION_CATALOG)?;
    if catalog.is_empty() {
        ctx.send_text(NOTHING_TO_SHOW);
        return Ok(StepAction::End(StepResult::None));
    }

    let cards: Vec<_> = catalog
        .iter()
        .map(flightbot_cards::reservation_details)
        .collect();
    for card in cards {
        ctx.send_card(card);
    }
    Ok(StepAction::End(StepResult::None))
}

fn validate_reservation_id(input: &str, _state: &StateAccessor) -> Validation {
    match input.trim().parse::<i64>() {
        Ok(id) if id > 1_000_000 && id < 9_999_999 => {
            Validation::Valid(StepResult::Number(id))
        }
        _ => Validation::invalid("Please type in correct reservation ID."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use flightbot_state::{MemoryStore, StateAccessor};

    async fn accessor() -> StateAccessor {
        StateAccessor::load(Arc::new(MemoryStore::new()), "test")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_reservation_id_bounds() {
        let state = accessor().await;
        let invalid = |input: &str| {
            matches!(
                validate_reservation_id(input, &state),
                Validation::Invalid(_)
            )
        };

        assert!(invalid("not a number"));
        assert!(invalid("1000000"));
        assert!(invalid("9999999"));
        assert!(invalid("123"));
        assert!(matches!(
            validate_reservation_id("2345671", &state),
            Validation::Valid(StepResult::Number(2_345_671))
        ));
    }
}
