//! Cost generation and reservation id generation.
//!
//! Flight costs are drawn from a class-dependent range, rentals are a flat
//! daily rate times the rental length. Reservation ids are random seven digit
//! numbers; uniqueness against the catalog is not checked.

use rand::Rng;

use crate::reservation::{CarClass, TripClass};

/// Generate a flight cost for the given cabin class.
#[must_use]
pub fn flight_cost(class: TripClass) -> u32 {
    let mut rng = rand::thread_rng();
    match class {
        TripClass::Standard => rng.gen_range(500..900),
        TripClass::Business => rng.gen_range(1000..2000),
        TripClass::Premium => rng.gen_range(2100..4000),
    }
}

/// Daily rental rate for a car class, in dollars.
#[must_use]
pub const fn daily_rate(class: CarClass) -> u32 {
    match class {
        CarClass::Economy => 15,
        CarClass::Standard => 40,
        CarClass::Premium => 80,
    }
}

/// Total rental cost for a car class over the given number of days.
#[must_use]
pub const fn rental_cost(class: CarClass, length_days: u32) -> u32 {
    daily_rate(class) * length_days
}

/// Generate a seven digit reservation id in (1000000, 9999999).
#[must_use]
pub fn generate_reservation_id() -> u32 {
    rand::thread_rng().gen_range(1_000_001..9_999_999)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flight_cost_ranges() {
        for _ in 0..200 {
            let standard = flight_cost(TripClass::Standard);
            assert!((500..=899).contains(&standard), "standard cost {standard}");

            let business = flight_cost(TripClass::Business);
            assert!((1000..=1999).contains(&business), "business cost {business}");

            let premium = flight_cost(TripClass::Premium);
            assert!((2100..=3999).contains(&premium), "premium cost {premium}");
        }
    }

    #[test]
    fn test_rental_cost_is_flat_rate() {
        assert_eq!(rental_cost(CarClass::Economy, 1), 15);
        assert_eq!(rental_cost(CarClass::Standard, 10), 400);
        assert_eq!(rental_cost(CarClass::Premium, 89), 7120);
    }

    #[test]
    fn test_reservation_id_is_seven_digits() {
        for _ in 0..200 {
            let id = generate_reservation_id();
            assert!(id > 1_000_000 && id < 9_999_999, "id {id}");
        }
    }
}
