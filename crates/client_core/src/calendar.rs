//! Adds a confirmed reservation to the device calendar.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDateTime};
use platform::{
    CalendarAccessLevel, CalendarEntityType, CalendarEvent, CalendarService, CalendarSource,
    CalendarSpec, CalendarSummary, NoticePresenter, PermissionService,
};
use shared::{
    domain::Capability,
    error::{ActionError, Notice},
};
use tracing::{debug, info, warn};

use crate::{
    permission_gate::run_gated,
    settings::{CalendarPlatform, ReservationSettings},
};

pub const RESERVATION_HOURS: i64 = 2;
pub const CALENDAR_ADDED: &str = "The event has been added to your calendar successfully.";
pub const CALENDAR_FAILED: &str = "An error occurred while adding to your calendar";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the picker value. Offsets are dropped: the event carries the
/// restaurant timezone, so the wall-clock time is what matters.
pub fn parse_reservation_time(raw: &str) -> Result<NaiveDateTime, ActionError> {
    let trimmed = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(with_offset.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ActionError::InvalidReservationTime {
            raw: raw.to_string(),
        })
}

pub fn reservation_event(
    settings: &ReservationSettings,
    when: &str,
) -> Result<CalendarEvent, ActionError> {
    let start = parse_reservation_time(when)?;
    Ok(CalendarEvent {
        title: settings.event_title.clone(),
        start,
        end: start + Duration::hours(RESERVATION_HOURS),
        timezone: settings.timezone.clone(),
        location: settings.location.clone(),
    })
}

/// Platform rule for where a new app calendar lives.
pub trait TargetCalendarPolicy: Send + Sync {
    fn new_calendar(
        &self,
        existing: &[CalendarSummary],
        settings: &ReservationSettings,
    ) -> Result<CalendarSpec, ActionError>;
}

fn base_spec(settings: &ReservationSettings) -> CalendarSpec {
    CalendarSpec {
        title: settings.calendar_title.clone(),
        name: settings.calendar_title.clone(),
        color: settings.calendar_color.clone(),
        entity_type: CalendarEntityType::Event,
        access_level: CalendarAccessLevel::Owner,
        source_id: None,
        source: None,
        owner_account: None,
    }
}

/// iOS: attach to the source named "Default".
pub struct DefaultSourcePolicy;

impl TargetCalendarPolicy for DefaultSourcePolicy {
    fn new_calendar(
        &self,
        existing: &[CalendarSummary],
        settings: &ReservationSettings,
    ) -> Result<CalendarSpec, ActionError> {
        let source_id = existing
            .iter()
            .filter_map(|calendar| calendar.source.as_ref())
            .find(|source| source.name == "Default")
            .and_then(|source| source.id.clone())
            .ok_or_else(|| ActionError::external("create calendar", "no default calendar source"))?;
        Ok(CalendarSpec {
            source_id: Some(source_id),
            ..base_spec(settings)
        })
    }
}

/// Android: reuse the account of a calendar the user owns, as a local account.
pub struct OwnerAccountPolicy;

impl TargetCalendarPolicy for OwnerAccountPolicy {
    fn new_calendar(
        &self,
        existing: &[CalendarSummary],
        settings: &ReservationSettings,
    ) -> Result<CalendarSpec, ActionError> {
        let owned = existing
            .iter()
            .find(|calendar| calendar.access_level == CalendarAccessLevel::Owner)
            .ok_or_else(|| ActionError::external("create calendar", "no owned calendar found"))?;
        let source_name = owned
            .source
            .as_ref()
            .map(|source| source.name.clone())
            .ok_or_else(|| ActionError::external("create calendar", "owned calendar has no source"))?;
        Ok(CalendarSpec {
            source: Some(CalendarSource {
                id: None,
                name: source_name,
                is_local_account: true,
            }),
            owner_account: owned.owner_account.clone(),
            ..base_spec(settings)
        })
    }
}

pub fn policy_for(platform: CalendarPlatform) -> Arc<dyn TargetCalendarPolicy> {
    match platform {
        CalendarPlatform::Ios => Arc::new(DefaultSourcePolicy),
        CalendarPlatform::Android => Arc::new(OwnerAccountPolicy),
    }
}

/// Returns the id of the app-owned calendar, creating it on first use.
pub async fn resolve_or_create_calendar(
    calendars: &dyn CalendarService,
    policy: &dyn TargetCalendarPolicy,
    settings: &ReservationSettings,
) -> Result<String, ActionError> {
    let existing = calendars
        .calendars(CalendarEntityType::Event)
        .await
        .map_err(|err| ActionError::external("list calendars", err))?;

    if let Some(found) = existing.iter().find(|calendar| {
        calendar.title == settings.calendar_title
            && calendar.access_level == CalendarAccessLevel::Owner
    }) {
        debug!(calendar_id = %found.id, "reusing reservation calendar");
        return Ok(found.id.clone());
    }

    let spec = policy.new_calendar(&existing, settings)?;
    let calendar_id = calendars
        .create_calendar(spec)
        .await
        .map_err(|err| ActionError::external("create calendar", err))?;
    info!(%calendar_id, "created reservation calendar");
    Ok(calendar_id)
}

#[derive(Clone)]
pub struct CalendarSequencer {
    permissions: Arc<dyn PermissionService>,
    calendars: Arc<dyn CalendarService>,
    notices: Arc<dyn NoticePresenter>,
    policy: Arc<dyn TargetCalendarPolicy>,
    settings: ReservationSettings,
}

impl CalendarSequencer {
    pub fn new(
        permissions: Arc<dyn PermissionService>,
        calendars: Arc<dyn CalendarService>,
        notices: Arc<dyn NoticePresenter>,
        settings: ReservationSettings,
    ) -> Self {
        Self {
            permissions,
            calendars,
            notices,
            policy: policy_for(settings.calendar_platform),
            settings,
        }
    }

    pub fn with_policy(mut self, policy: Arc<dyn TargetCalendarPolicy>) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the created event id. Every failure after the permission gate
    /// is reported through a warning notice as well.
    pub async fn add_reservation(&self, when: String) -> Result<String, ActionError> {
        run_gated(
            self.permissions.as_ref(),
            self.notices.as_ref(),
            Capability::Calendar,
            when,
            |when| async move {
                match self.create_event(&when).await {
                    Ok(event_id) => {
                        info!(%when, %event_id, "reservation added to calendar");
                        self.notices.present(Notice::info(CALENDAR_ADDED));
                        Ok(event_id)
                    }
                    Err(err) => {
                        warn!(
                            %when,
                            kind = ?err.kind(),
                            error = %err,
                            "adding reservation to calendar failed"
                        );
                        self.notices
                            .present(Notice::warning(CALENDAR_FAILED, Some(err.detail())));
                        Err(err)
                    }
                }
            },
        )
        .await
    }

    async fn create_event(&self, when: &str) -> Result<String, ActionError> {
        let event = reservation_event(&self.settings, when)?;
        let calendar_id = resolve_or_create_calendar(
            self.calendars.as_ref(),
            self.policy.as_ref(),
            &self.settings,
        )
        .await?;
        self.calendars
            .create_event(&calendar_id, event)
            .await
            .map_err(|err| ActionError::external("create event", err))
    }
}

#[cfg(test)]
#[path = "tests/calendar_tests.rs"]
mod tests;
