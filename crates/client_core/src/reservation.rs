//! Table reservation form: draft editing, the confirmation prompt, and the
//! notification/calendar side effects of a confirmed reservation.

use serde::{Deserialize, Serialize};
use shared::{
    domain::{MAX_GUESTS, MIN_GUESTS},
    error::ActionError,
};
use tokio::{runtime::Handle, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    calendar::CalendarSequencer,
    notification::NotificationSequencer,
    prompt::{Choice, ConfirmPrompt},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDraft {
    pub guest_count: u8,
    pub smoking: bool,
    /// Raw date/time picker value.
    pub when: String,
    pub summary_visible: bool,
}

impl Default for ReservationDraft {
    fn default() -> Self {
        Self {
            guest_count: MIN_GUESTS,
            smoking: false,
            when: String::new(),
            summary_visible: false,
        }
    }
}

impl ReservationDraft {
    pub fn summary_lines(&self) -> [String; 3] {
        [
            format!("Number of Guests: {}", self.guest_count),
            format!("Smoking?: {}", if self.smoking { "Yes" } else { "No" }),
            format!("Date and Time: {}", self.when),
        ]
    }

    fn confirmation_prompt(&self) -> ConfirmPrompt {
        ConfirmPrompt::new(
            "Your Reservation OK?",
            format!(
                "Number of Guests: {}\nSmoking? {}\nDate and Time: {}",
                self.guest_count, self.smoking, self.when
            ),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationPhase {
    Editing,
    ConfirmPending,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservationState {
    pub draft: ReservationDraft,
    /// Set while the confirmation prompt is up.
    pub prompt: Option<ConfirmPrompt>,
}

impl ReservationState {
    pub fn phase(&self) -> ReservationPhase {
        if self.prompt.is_some() {
            ReservationPhase::ConfirmPending
        } else {
            ReservationPhase::Editing
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationEvent {
    SetGuests(u8),
    SetSmoking(bool),
    SetWhen(String),
    RequestReservation,
    Answer(Choice),
    ToggleSummary,
    /// "close" on the summary: hides it and resets the form.
    CloseSummary,
}

/// What a confirmed reservation asks the outside world to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRequest {
    pub guest_count: u8,
    pub smoking: bool,
    pub when: String,
}

pub fn reduce(
    state: &ReservationState,
    event: ReservationEvent,
) -> (ReservationState, Option<ReservationRequest>) {
    let pending = state.phase() == ReservationPhase::ConfirmPending;
    match event {
        ReservationEvent::SetGuests(guest_count) if !pending => {
            let clamped = guest_count.clamp(MIN_GUESTS, MAX_GUESTS);
            if clamped != guest_count {
                debug!(guest_count, clamped, "guest count outside picker range");
            }
            (with_draft(state, |draft| draft.guest_count = clamped), None)
        }
        ReservationEvent::SetSmoking(smoking) if !pending => {
            (with_draft(state, |draft| draft.smoking = smoking), None)
        }
        ReservationEvent::SetWhen(when) if !pending => {
            (with_draft(state, |draft| draft.when = when), None)
        }
        ReservationEvent::ToggleSummary if !pending => (
            with_draft(state, |draft| draft.summary_visible = !draft.summary_visible),
            None,
        ),
        ReservationEvent::CloseSummary if !pending => (ReservationState::default(), None),
        ReservationEvent::RequestReservation if !pending => {
            debug!(
                draft = %serde_json::to_string(&state.draft).unwrap_or_default(),
                "reservation confirmation requested"
            );
            let next = ReservationState {
                draft: state.draft.clone(),
                prompt: Some(state.draft.confirmation_prompt()),
            };
            (next, None)
        }
        ReservationEvent::Answer(Choice::Cancel) if pending => {
            debug!("reservation cancelled");
            (ReservationState::default(), None)
        }
        ReservationEvent::Answer(Choice::Ok) if pending => {
            let request = ReservationRequest {
                guest_count: state.draft.guest_count,
                smoking: state.draft.smoking,
                when: state.draft.when.clone(),
            };
            (ReservationState::default(), Some(request))
        }
        ignored => {
            debug!(event = ?ignored, phase = ?state.phase(), "reservation event ignored");
            (state.clone(), None)
        }
    }
}

fn with_draft(state: &ReservationState, edit: impl FnOnce(&mut ReservationDraft)) -> ReservationState {
    let mut next = state.clone();
    edit(&mut next.draft);
    next
}

/// Handle of the side effects of a confirmed reservation. Dropping it
/// detaches the task; nothing in the form waits on it.
pub struct ReservationDispatch {
    task: JoinHandle<ReservationOutcome>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationOutcome {
    pub notification: Result<(), ActionError>,
    pub calendar: Result<String, ActionError>,
}

impl ReservationDispatch {
    pub async fn settle(self) -> ReservationOutcome {
        self.task.await.unwrap_or_else(|err| {
            warn!(error = %err, "reservation task did not complete");
            ReservationOutcome {
                notification: Err(ActionError::external("notification task", &err)),
                calendar: Err(ActionError::external("calendar task", &err)),
            }
        })
    }
}

pub struct ReservationScreen {
    state: ReservationState,
    runtime: Handle,
    notifications: NotificationSequencer,
    calendar: CalendarSequencer,
}

impl ReservationScreen {
    pub fn new(
        runtime: Handle,
        notifications: NotificationSequencer,
        calendar: CalendarSequencer,
    ) -> Self {
        Self {
            state: ReservationState::default(),
            runtime,
            notifications,
            calendar,
        }
    }

    pub fn state(&self) -> &ReservationState {
        &self.state
    }

    /// A confirmed reservation starts its side effects on the screen's runtime
    /// before the form resets; the returned dispatch may be awaited or dropped.
    pub fn handle(&mut self, event: ReservationEvent) -> Option<ReservationDispatch> {
        let (next, request) = reduce(&self.state, event);
        let dispatch = request.map(|request| self.dispatch(request));
        self.state = next;
        dispatch
    }

    fn dispatch(&self, request: ReservationRequest) -> ReservationDispatch {
        info!(
            guests = request.guest_count,
            smoking = request.smoking,
            when = %request.when,
            "reservation confirmed"
        );
        let notifications = self.notifications.clone();
        let calendar = self.calendar.clone();
        let when = request.when;
        // `join` polls the notification first, so its permission query always
        // precedes the calendar's; after that the two run interleaved.
        let task = self.runtime.spawn(async move {
            let (notification, calendar) = futures::future::join(
                notifications.notify_reservation(when.clone()),
                calendar.add_reservation(when),
            )
            .await;
            ReservationOutcome {
                notification,
                calendar,
            }
        });
        ReservationDispatch { task }
    }
}

#[cfg(test)]
#[path = "tests/reservation_tests.rs"]
mod tests;
