//! Headless controllers for the dish detail and table reservation screens.
//!
//! Each controller keeps its draft as a plain value and moves it with a pure
//! `reduce` function; the `*Screen` types wrap a reducer with the platform
//! services that carry out its effects.

pub mod calendar;
pub mod comment_form;
pub mod dish_detail;
pub mod gesture;
pub mod notification;
pub mod permission_gate;
pub mod prompt;
pub mod reservation;
pub mod settings;

pub use calendar::CalendarSequencer;
pub use dish_detail::{DishDetailAction, DishDetailScreen, DishDetailView};
pub use notification::NotificationSequencer;
pub use prompt::{Choice, ConfirmPrompt};
pub use reservation::{ReservationDispatch, ReservationEvent, ReservationScreen};
pub use settings::{AppSettings, CalendarPlatform, ReservationSettings};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
