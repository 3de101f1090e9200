//! End-to-end booking scenarios driven through the turn router.

use std::sync::Arc;

use chrono::{Days, Local};
use flightbot_core::{Outbound, ReservationCatalog, TurnInput};
use flightbot_engine::TurnRouter;
use flightbot_flows::router;
use flightbot_state::{slots, MemoryStore, StateAccessor};

const CONV: &str = "conv";

fn setup() -> (TurnRouter, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let router = router(store.clone()).unwrap();
    (router, store)
}

async fn send(router: &TurnRouter, text: &str) -> Vec<String> {
    let output = router
        .process_turn(TurnInput::message(CONV, text))
        .await
        .unwrap();
    render(output.messages)
}

async fn start(router: &TurnRouter) -> Vec<String> {
    let output = router
        .process_turn(TurnInput::started(CONV))
        .await
        .unwrap();
    render(output.messages)
}

fn render(messages: Vec<Outbound>) -> Vec<String> {
    messages
        .into_iter()
        .map(|item| match item {
            Outbound::Text(text) => text,
            Outbound::Card(card) => card.to_string(),
        })
        .collect()
}

fn contains(messages: &[String], needle: &str) -> bool {
    messages.iter().any(|m| m.contains(needle))
}

async fn catalog(store: &Arc<MemoryStore>) -> ReservationCatalog {
    let accessor = StateAccessor::load(store.clone(), CONV).await.unwrap();
    accessor
        .get_or_default(slots::RESERVATION_CATALOG)
        .unwrap()
}

fn tomorrow_literal() -> String {
    (Local::now().date_naive() + Days::new(1))
        .format("%Y-%m-%d")
        .to_string()
}

/// Drive the flight intake up to the confirm choice.
async fn fill_one_way_flight(router: &TurnRouter) {
    start(router).await;
    send(router, "Buy flight ticket").await;
    send(router, "John Smith").await;
    send(router, "Warsaw").await;
    send(router, "London").await;
    send(router, "One way flight").await;
    send(router, &tomorrow_literal()).await;
}

#[tokio::test]
async fn test_one_way_booking_end_to_end() {
    let (router, store) = setup();

    let greeting = start(&router).await;
    assert!(contains(&greeting, "Hello new Passenger!"));
    assert!(contains(&greeting, "Please choose one of the options:"));
    assert!(contains(&greeting, "Buy flight ticket"));

    let reply = send(&router, "Buy flight ticket").await;
    assert!(contains(&reply, "Let's start reservation process!"));
    assert!(contains(&reply, "Please enter your name."));

    assert!(contains(&send(&router, "John Smith").await, "departure airport"));
    assert!(contains(&send(&router, "Warsaw").await, "arrival airport"));
    assert!(contains(&send(&router, "London").await, "One way flight"));
    assert!(contains(
        &send(&router, "One way flight").await,
        "Please enter departure date."
    ));

    // One way: the return date prompt is skipped entirely.
    let reply = send(&router, &tomorrow_literal()).await;
    assert!(!contains(&reply, "date of return"));
    assert!(contains(&reply, "Please choose flight class"));

    let reply = send(&router, "Standard").await;
    assert!(contains(&reply, "below you can find your reservation"));
    assert!(contains(&reply, "Passenger: John Smith"));
    assert!(contains(&reply, "Please verify if flight details are correct"));

    // Nothing is committed and no id exists before the explicit confirm.
    assert!(catalog(&store).await.is_empty());
    assert!(!contains(&reply, "reservation id"));

    let reply = send(&router, "Yes, confirm").await;
    assert!(contains(&reply, "please save your reservation id:"));
    assert!(contains(&reply, "Would you like to rent a car"));

    let reply = send(&router, "No, thank you.").await;
    // The reservation is stored and the menu comes back.
    assert!(contains(&reply, "Please choose one of the options:"));

    let catalog = catalog(&store).await;
    assert_eq!(catalog.len(), 1);
    let reservation = catalog.iter().next().unwrap();
    let id = reservation.reservation_id.unwrap();
    assert!(id > 1_000_000 && id < 9_999_999);
    assert!((500..=899).contains(&reservation.cost));
    assert_eq!(reservation.passenger_name, "John Smith");
    assert_eq!(reservation.from_airport, "Warsaw");
    assert_eq!(reservation.to_airport, "London");
    assert!(reservation.one_way);
    assert_eq!(reservation.end_date, None);
    assert!(reservation.rental.is_none());
}

#[tokio::test]
async fn test_destination_equal_to_origin_reprompts() {
    let (router, store) = setup();
    start(&router).await;
    send(&router, "Buy flight ticket").await;
    send(&router, "John Smith").await;
    send(&router, "Warsaw").await;

    let reply = send(&router, "Warsaw").await;
    assert!(contains(&reply, "Please type in correct arrival airport."));

    // The rejected answer was not written anywhere.
    let accessor = StateAccessor::load(store.clone(), CONV).await.unwrap();
    let flight: flightbot_core::FlightReservation =
        accessor.get_or_default(slots::FLIGHT_INFO).unwrap();
    assert_eq!(flight.from_airport, "Warsaw");
    assert_eq!(flight.to_airport, "");

    // A different city moves the dialog forward.
    let reply = send(&router, "London").await;
    assert!(contains(&reply, "One way flight"));
}

#[tokio::test]
async fn test_start_date_must_be_in_the_future() {
    let (router, _store) = setup();
    start(&router).await;
    send(&router, "Buy flight ticket").await;
    send(&router, "John Smith").await;
    send(&router, "Warsaw").await;
    send(&router, "London").await;
    send(&router, "One way flight").await;

    let reply = send(&router, "2020-01-01").await;
    assert!(contains(&reply, "Departure date should be greater than today."));

    let reply = send(&router, "gibberish").await;
    assert!(contains(&reply, "Please type in correct departure date."));

    let reply = send(&router, &tomorrow_literal()).await;
    assert!(contains(&reply, "Please choose flight class"));
}

#[tokio::test]
async fn test_two_way_return_date_not_before_departure() {
    let (router, _store) = setup();
    start(&router).await;
    send(&router, "Buy flight ticket").await;
    send(&router, "John Smith").await;
    send(&router, "Warsaw").await;
    send(&router, "London").await;
    send(&router, "Two ways flight").await;

    let reply = send(&router, &tomorrow_literal()).await;
    assert!(contains(&reply, "Please enter date of return."));

    let reply = send(&router, "2020-01-01").await;
    assert!(contains(
        &reply,
        "Return date should be greater or the same as departure date"
    ));

    // The same day as departure is allowed.
    let reply = send(&router, &tomorrow_literal()).await;
    assert!(contains(&reply, "Please choose flight class"));

    let reply = send(&router, "Business").await;
    assert!(contains(&reply, "Return date"));
}

#[tokio::test]
async fn test_rejected_summary_starts_intake_over() {
    let (router, store) = setup();
    fill_one_way_flight(&router).await;
    send(&router, "Premium").await;

    let reply = send(&router, "No, start over").await;
    assert!(contains(&reply, "Let's start reservation process!"));
    assert!(contains(&reply, "Please enter your name."));
    assert!(catalog(&store).await.is_empty());
}

#[tokio::test]
async fn test_unrecognized_menu_input_retries_forever() {
    let (router, _store) = setup();
    start(&router).await;

    for _ in 0..12 {
        let reply = send(&router, "make me a sandwich").await;
        assert!(contains(&reply, "I don't recognize this option. Try again."));
        assert!(contains(&reply, "Buy flight ticket"));
    }

    // Still answerable after any number of failures.
    let reply = send(&router, "Show all reservations").await;
    assert!(contains(&reply, "There is no reservation to display."));
}

#[tokio::test]
async fn test_finish_conversation_says_goodbye() {
    let (router, store) = setup();
    start(&router).await;

    let reply = send(&router, "Finish conversation").await;
    assert!(contains(&reply, "Goodbye Passenger!"));

    let accessor = StateAccessor::load(store.clone(), CONV).await.unwrap();
    let stack: flightbot_engine::DialogStack =
        accessor.get_or_default(slots::DIALOG_STATE).unwrap();
    assert!(stack.is_empty());
}
