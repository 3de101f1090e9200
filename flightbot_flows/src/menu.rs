//! The root menu dialog.
//!
//! Presents the operation choice, dispatches to the matching child dialog
//! and, once that child ends, replaces itself so the menu comes back. The
//! menu only ever terminates through "Finish conversation".

use flightbot_engine::{
    DialogDefinition, DialogError, PromptSpec, StepAction, StepContext, StepResult,
};

use crate::ids;

const OPERATION_PROMPT: &str = "OperationType";

const OPTION_BUY: &str = "Buy flight ticket";
const OPTION_SHOW_ONE: &str = "Show single reservation";
const OPTION_SHOW_ALL: &str = "Show all reservations";
const OPTION_CANCEL: &str = "Cancel the reservation";
const OPTION_FINISH: &str = "Finish conversation";

pub fn definition() -> DialogDefinition {
    DialogDefinition::new(ids::MAIN_MENU)
        .step(get_operation_type)
        .step(dispatch_operation)
        .step(restart_menu)
}

fn get_operation_type(_ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    Ok(StepAction::Prompt(
        PromptSpec::choice(
            OPERATION_PROMPT,
            "Please choose one of the options:",
            [
                OPTION_BUY,
                OPTION_SHOW_ONE,
                OPTION_SHOW_ALL,
                OPTION_CANCEL,
                OPTION_FINISH,
            ],
        )
        .with_retry("I don't recognize this option. Try again."),
    ))
}

fn dispatch_operation(ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    let choice = ctx.result().as_choice()?;
    let action = if choice.eq_ignore_ascii_case(OPTION_SHOW_ONE)
        || choice.eq_ignore_ascii_case(OPTION_CANCEL)
    {
        StepAction::PushChild(ids::SHOW_ONE.to_string())
    } else if choice.eq_ignore_ascii_case(OPTION_SHOW_ALL) {
        StepAction::PushChild(ids::SHOW_ALL.to_string())
    } else if choice.eq_ignore_ascii_case(OPTION_FINISH) {
        StepAction::End(StepResult::None)
    } else {
        StepAction::PushChild(ids::FLIGHT_INTAKE.to_string())
    };
    Ok(action)
}

fn restart_menu(_ctx: &mut StepContext<'_>) -> Result<StepAction, DialogError> {
    Ok(StepAction::Replace(ids::MAIN_MENU.to_string()))
}
