use std::sync::Arc;

use super::*;
use crate::{
    calendar::{CALENDAR_ADDED, CALENDAR_FAILED},
    settings::ReservationSettings,
    test_support::{
        arc, drain, notice_channel, RecordingCalendar, RecordingNotifications,
        ScriptedPermissions,
    },
};
use chrono::NaiveDate;
use shared::{
    domain::{Capability, PermissionStatus},
    error::{Notice, NoticeLevel},
};
use tokio::{runtime::Handle, sync::mpsc::UnboundedReceiver};

fn apply(state: ReservationState, events: Vec<ReservationEvent>) -> ReservationState {
    events
        .into_iter()
        .fold(state, |state, event| reduce(&state, event).0)
}

fn filled() -> ReservationState {
    apply(
        ReservationState::default(),
        vec![
            ReservationEvent::SetGuests(4),
            ReservationEvent::SetSmoking(true),
            ReservationEvent::SetWhen("2024-05-01T19:00:00".into()),
        ],
    )
}

struct Harness {
    screen: ReservationScreen,
    permissions: Arc<ScriptedPermissions>,
    notifications: Arc<RecordingNotifications>,
    calendar: Arc<RecordingCalendar>,
    notices: UnboundedReceiver<Notice>,
}

fn harness(permissions: ScriptedPermissions, calendar: RecordingCalendar) -> Harness {
    let permissions = arc(permissions);
    let notifications = arc(RecordingNotifications::default());
    let calendar = arc(calendar);
    let (tx, notices) = notice_channel();
    let tx = arc(tx);
    let settings = ReservationSettings::default();

    let screen = ReservationScreen::new(
        Handle::current(),
        NotificationSequencer::new(
            permissions.clone(),
            notifications.clone(),
            tx.clone(),
            settings.clone(),
        ),
        CalendarSequencer::new(permissions.clone(), calendar.clone(), tx, settings),
    );

    Harness {
        screen,
        permissions,
        notifications,
        calendar,
        notices,
    }
}

fn fill(screen: &mut ReservationScreen) {
    for event in [
        ReservationEvent::SetGuests(4),
        ReservationEvent::SetSmoking(true),
        ReservationEvent::SetWhen("2024-05-01T19:00:00".into()),
    ] {
        assert!(screen.handle(event).is_none());
    }
}

#[test]
fn defaults_match_a_fresh_form() {
    let state = ReservationState::default();
    assert_eq!(state.draft.guest_count, 1);
    assert!(!state.draft.smoking);
    assert_eq!(state.draft.when, "");
    assert!(!state.draft.summary_visible);
    assert_eq!(state.phase(), ReservationPhase::Editing);
}

#[test]
fn request_raises_summary_prompt() {
    let (state, request) = reduce(&filled(), ReservationEvent::RequestReservation);
    assert!(request.is_none());
    assert_eq!(state.phase(), ReservationPhase::ConfirmPending);

    let prompt = state.prompt.expect("prompt");
    assert_eq!(prompt.title, "Your Reservation OK?");
    assert_eq!(
        prompt.message,
        "Number of Guests: 4\nSmoking? true\nDate and Time: 2024-05-01T19:00:00"
    );
    assert_eq!(prompt.options[0].label, "Cancel");
    assert_eq!(prompt.options[1].label, "OK");
}

#[test]
fn cancel_restores_defaults_without_side_effects() {
    let pending = apply(filled(), vec![ReservationEvent::RequestReservation]);
    let (state, request) = reduce(&pending, ReservationEvent::Answer(Choice::Cancel));
    assert!(request.is_none());
    assert_eq!(state, ReservationState::default());
}

#[test]
fn ok_emits_request_and_resets() {
    let pending = apply(filled(), vec![ReservationEvent::RequestReservation]);
    let (state, request) = reduce(&pending, ReservationEvent::Answer(Choice::Ok));
    assert_eq!(state, ReservationState::default());
    assert_eq!(
        request,
        Some(ReservationRequest {
            guest_count: 4,
            smoking: true,
            when: "2024-05-01T19:00:00".into(),
        })
    );
}

#[test]
fn answers_without_a_prompt_do_nothing() {
    let state = filled();
    let (next, request) = reduce(&state, ReservationEvent::Answer(Choice::Ok));
    assert!(request.is_none());
    assert_eq!(next, state);
}

#[test]
fn edits_are_blocked_while_prompt_is_up() {
    let pending = apply(filled(), vec![ReservationEvent::RequestReservation]);
    let next = apply(
        pending.clone(),
        vec![
            ReservationEvent::SetGuests(2),
            ReservationEvent::SetWhen("later".into()),
            ReservationEvent::RequestReservation,
        ],
    );
    assert_eq!(next, pending);
}

#[test]
fn guest_count_is_clamped_to_the_picker_range() {
    let high = apply(ReservationState::default(), vec![ReservationEvent::SetGuests(7)]);
    assert_eq!(high.draft.guest_count, 6);
    let low = apply(high, vec![ReservationEvent::SetGuests(0)]);
    assert_eq!(low.draft.guest_count, 1);
}

#[test]
fn summary_toggles_independently_and_close_resets() {
    let shown = apply(filled(), vec![ReservationEvent::ToggleSummary]);
    assert!(shown.draft.summary_visible);
    assert_eq!(shown.phase(), ReservationPhase::Editing);
    assert_eq!(
        shown.draft.summary_lines(),
        [
            "Number of Guests: 4".to_string(),
            "Smoking?: Yes".to_string(),
            "Date and Time: 2024-05-01T19:00:00".to_string(),
        ]
    );

    let hidden = apply(shown.clone(), vec![ReservationEvent::ToggleSummary]);
    assert!(!hidden.draft.summary_visible);
    assert_eq!(hidden.draft.guest_count, 4);

    let closed = apply(shown, vec![ReservationEvent::CloseSummary]);
    assert_eq!(closed, ReservationState::default());
}

#[tokio::test]
async fn confirmed_reservation_notifies_and_books_two_hours() {
    let mut h = harness(
        ScriptedPermissions::granted(),
        RecordingCalendar::device_defaults(),
    );
    fill(&mut h.screen);

    assert!(h
        .screen
        .handle(ReservationEvent::RequestReservation)
        .is_none());
    let dispatch = h
        .screen
        .handle(ReservationEvent::Answer(Choice::Ok))
        .expect("dispatch");
    assert_eq!(h.screen.state(), &ReservationState::default());

    let outcome = dispatch.settle().await;
    assert_eq!(outcome.notification, Ok(()));
    assert!(outcome.calendar.is_ok());

    let presented = h.notifications.presented.lock().await;
    assert_eq!(presented.len(), 1);
    assert_eq!(presented[0].title, "Your Reservation");
    assert!(presented[0].body.contains("2024-05-01T19:00:00"));

    let events = h.calendar.events.lock().await;
    assert_eq!(events.len(), 1);
    let start = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|date| date.and_hms_opt(19, 0, 0))
        .expect("start");
    assert_eq!(events[0].1.start, start);
    assert_eq!(events[0].1.end - events[0].1.start, chrono::Duration::hours(2));

    assert_eq!(drain(&mut h.notices), vec![Notice::info(CALENDAR_ADDED)]);
    assert_eq!(h.screen.state(), &ReservationState::default());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn notification_permission_is_queried_before_calendar() {
    for _ in 0..200 {
        let mut h = harness(
            ScriptedPermissions::granted(),
            RecordingCalendar::device_defaults(),
        );
        fill(&mut h.screen);
        h.screen.handle(ReservationEvent::RequestReservation);
        h.screen
            .handle(ReservationEvent::Answer(Choice::Ok))
            .expect("dispatch")
            .settle()
            .await;

        assert_eq!(
            *h.permissions.queries.lock().await,
            vec![Capability::Notifications, Capability::Calendar]
        );
    }
}

#[tokio::test]
async fn dropped_dispatch_still_runs_both_actions() {
    let mut h = harness(
        ScriptedPermissions::granted(),
        RecordingCalendar::device_defaults(),
    );
    fill(&mut h.screen);
    h.screen.handle(ReservationEvent::RequestReservation);
    drop(h.screen.handle(ReservationEvent::Answer(Choice::Ok)));

    for _ in 0..100 {
        if !h.calendar.events.lock().await.is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(h.notifications.presented.lock().await.len(), 1);
    assert_eq!(h.calendar.events.lock().await.len(), 1);
}

#[tokio::test]
async fn cancelled_reservation_touches_no_service() {
    let mut h = harness(
        ScriptedPermissions::granted(),
        RecordingCalendar::device_defaults(),
    );
    fill(&mut h.screen);
    h.screen.handle(ReservationEvent::RequestReservation);
    assert!(h
        .screen
        .handle(ReservationEvent::Answer(Choice::Cancel))
        .is_none());

    tokio::task::yield_now().await;
    assert!(h.permissions.queries.lock().await.is_empty());
    assert!(h.notifications.presented.lock().await.is_empty());
    assert!(h.calendar.events.lock().await.is_empty());
    assert_eq!(h.screen.state(), &ReservationState::default());
}

#[tokio::test]
async fn calendar_denial_does_not_block_the_notification() {
    let permissions = ScriptedPermissions::default()
        .with(
            Capability::Notifications,
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        )
        .with(
            Capability::Calendar,
            PermissionStatus::Undetermined,
            PermissionStatus::Denied,
        );
    let mut h = harness(permissions, RecordingCalendar::device_defaults());
    fill(&mut h.screen);
    h.screen.handle(ReservationEvent::RequestReservation);
    let outcome = h
        .screen
        .handle(ReservationEvent::Answer(Choice::Ok))
        .expect("dispatch")
        .settle()
        .await;

    assert_eq!(outcome.notification, Ok(()));
    assert_eq!(
        outcome.calendar,
        Err(ActionError::PermissionDenied {
            capability: Capability::Calendar
        })
    );
    assert_eq!(h.notifications.presented.lock().await.len(), 1);
    assert!(h.calendar.events.lock().await.is_empty());
    assert_eq!(h.permissions.request_count(Capability::Calendar).await, 1);

    let notices = drain(&mut h.notices);
    assert_eq!(
        notices,
        vec![Notice::warning("Permission not granted to calendar", None)]
    );
    assert_eq!(h.screen.state(), &ReservationState::default());
}

#[tokio::test]
async fn notification_denial_does_not_block_the_calendar() {
    let permissions = ScriptedPermissions::default()
        .with(
            Capability::Notifications,
            PermissionStatus::Denied,
            PermissionStatus::Denied,
        )
        .with(
            Capability::Calendar,
            PermissionStatus::Granted,
            PermissionStatus::Granted,
        );
    let mut h = harness(permissions, RecordingCalendar::device_defaults());
    fill(&mut h.screen);
    h.screen.handle(ReservationEvent::RequestReservation);
    let outcome = h
        .screen
        .handle(ReservationEvent::Answer(Choice::Ok))
        .expect("dispatch")
        .settle()
        .await;

    assert!(outcome.notification.is_err());
    assert!(outcome.calendar.is_ok());
    assert!(h.notifications.presented.lock().await.is_empty());
    assert_eq!(h.calendar.events.lock().await.len(), 1);

    let warnings: Vec<_> = drain(&mut h.notices)
        .into_iter()
        .filter(|notice| notice.level == NoticeLevel::Warning)
        .collect();
    assert_eq!(
        warnings,
        vec![Notice::warning(
            "Permission not granted to show notifications",
            None
        )]
    );
}

#[tokio::test]
async fn calendar_failure_still_resets_the_form() {
    let mut h = harness(
        ScriptedPermissions::granted(),
        RecordingCalendar::device_defaults().failing_events("calendar is read-only"),
    );
    fill(&mut h.screen);
    h.screen.handle(ReservationEvent::RequestReservation);
    let outcome = h
        .screen
        .handle(ReservationEvent::Answer(Choice::Ok))
        .expect("dispatch")
        .settle()
        .await;

    assert!(outcome.calendar.is_err());
    assert_eq!(h.screen.state(), &ReservationState::default());
    let notices = drain(&mut h.notices);
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].title, CALENDAR_FAILED);
    assert_eq!(notices[0].message.as_deref(), Some("calendar is read-only"));
}

#[tokio::test]
async fn notification_delivery_failure_is_silent() {
    let permissions = arc(ScriptedPermissions::granted());
    let notifications = arc(RecordingNotifications {
        fail_with: Some("no notification channel".into()),
        ..RecordingNotifications::default()
    });
    let (tx, mut rx) = notice_channel();
    let sequencer = NotificationSequencer::new(
        permissions,
        notifications.clone(),
        arc(tx),
        ReservationSettings::default(),
    );

    let result = sequencer.notify_reservation("2024-05-01T19:00:00".into()).await;

    assert_eq!(result, Ok(()));
    assert_eq!(notifications.presented.lock().await.len(), 1);
    assert!(drain(&mut rx).is_empty());
}
