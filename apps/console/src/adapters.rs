//! In-process stand-ins for the device services, so both screens can be
//! driven from a terminal.

use std::collections::HashSet;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use clap::ValueEnum;
use platform::{
    CalendarAccessLevel, CalendarEntityType, CalendarEvent, CalendarService, CalendarSource,
    CalendarSpec, CalendarSummary, CatalogStore, CommentSink, LocalNotification,
    NotificationService, PermissionService, ShareContent, ShareService,
};
use shared::domain::{
    Capability, Comment, CommentId, CommentSubmission, DishId, DishView, PermissionStatus,
};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

pub struct MemoryCatalog {
    dishes: Vec<DishView>,
    favorites: RwLock<HashSet<DishId>>,
    comments: RwLock<Vec<Comment>>,
}

impl MemoryCatalog {
    pub fn new(dishes: Vec<DishView>, comments: Vec<Comment>) -> Self {
        Self {
            dishes,
            favorites: RwLock::new(HashSet::new()),
            comments: RwLock::new(comments),
        }
    }

    pub async fn with_favorites(self, favorites: impl IntoIterator<Item = DishId>) -> Self {
        self.favorites.write().await.extend(favorites);
        self
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn dish(&self, dish_id: DishId) -> Result<Option<DishView>> {
        Ok(self.dishes.iter().find(|dish| dish.id == dish_id).cloned())
    }

    async fn favorites(&self) -> Result<HashSet<DishId>> {
        Ok(self.favorites.read().await.clone())
    }

    async fn add_favorite(&self, dish_id: DishId) -> Result<()> {
        self.favorites.write().await.insert(dish_id);
        Ok(())
    }

    async fn comments_for(&self, dish_id: DishId) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .read()
            .await
            .iter()
            .filter(|comment| comment.dish_id == dish_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CommentSink for MemoryCatalog {
    async fn append_comment(&self, submission: CommentSubmission) -> Result<()> {
        let comment = Comment {
            id: CommentId(Uuid::new_v4()),
            dish_id: submission.dish_id,
            rating: submission.rating,
            author: submission.author,
            comment: submission.body,
            date: Utc::now(),
        };
        self.comments.write().await.push(comment);
        Ok(())
    }
}

/// How a permission dialog plays out for one capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PermissionScript {
    /// Already granted, no dialog.
    #[default]
    Granted,
    /// Already denied; asking again is refused.
    Denied,
    /// Undetermined, and the user allows when asked.
    AskGrant,
    /// Undetermined, and the user refuses when asked.
    AskDeny,
}

impl PermissionScript {
    fn initial(self) -> PermissionStatus {
        match self {
            PermissionScript::Granted => PermissionStatus::Granted,
            PermissionScript::Denied => PermissionStatus::Denied,
            PermissionScript::AskGrant | PermissionScript::AskDeny => {
                PermissionStatus::Undetermined
            }
        }
    }

    fn after_request(self) -> PermissionStatus {
        match self {
            PermissionScript::Granted | PermissionScript::AskGrant => PermissionStatus::Granted,
            PermissionScript::Denied | PermissionScript::AskDeny => PermissionStatus::Denied,
        }
    }
}

pub struct ScriptedPermissions {
    calendar: PermissionScript,
    notifications: PermissionScript,
    answered: RwLock<HashSet<Capability>>,
}

impl ScriptedPermissions {
    pub fn new(calendar: PermissionScript, notifications: PermissionScript) -> Self {
        Self {
            calendar,
            notifications,
            answered: RwLock::new(HashSet::new()),
        }
    }

    fn script(&self, capability: Capability) -> PermissionScript {
        match capability {
            Capability::Calendar => self.calendar,
            Capability::Notifications => self.notifications,
        }
    }
}

#[async_trait]
impl PermissionService for ScriptedPermissions {
    async fn status(&self, capability: Capability) -> Result<PermissionStatus> {
        let script = self.script(capability);
        if self.answered.read().await.contains(&capability) {
            return Ok(script.after_request());
        }
        Ok(script.initial())
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus> {
        let status = self.script(capability).after_request();
        info!(%capability, ?status, "permission dialog answered");
        self.answered.write().await.insert(capability);
        Ok(status)
    }
}

#[derive(Default)]
pub struct LoggedNotifications;

#[async_trait]
impl NotificationService for LoggedNotifications {
    async fn present_local(&self, notification: LocalNotification) -> Result<()> {
        info!(title = %notification.title, body = %notification.body, "local notification");
        Ok(())
    }
}

pub struct MemoryCalendar {
    calendars: RwLock<Vec<CalendarSummary>>,
    events: RwLock<Vec<(String, CalendarEvent)>>,
}

impl MemoryCalendar {
    /// A device with one calendar on the "Default" source and one owned local
    /// account calendar.
    pub fn device() -> Self {
        Self {
            calendars: RwLock::new(vec![
                CalendarSummary {
                    id: "1".into(),
                    title: "Calendar".into(),
                    source: Some(CalendarSource {
                        id: Some("default-source".into()),
                        name: "Default".into(),
                        is_local_account: false,
                    }),
                    access_level: CalendarAccessLevel::Editor,
                    owner_account: None,
                },
                CalendarSummary {
                    id: "2".into(),
                    title: "Personal".into(),
                    source: Some(CalendarSource {
                        id: Some("local-source".into()),
                        name: "diner@localhost".into(),
                        is_local_account: true,
                    }),
                    access_level: CalendarAccessLevel::Owner,
                    owner_account: Some("diner@localhost".into()),
                },
            ]),
            events: RwLock::new(Vec::new()),
        }
    }

    pub async fn events(&self) -> Vec<(String, CalendarEvent)> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl CalendarService for MemoryCalendar {
    async fn calendars(&self, entity_type: CalendarEntityType) -> Result<Vec<CalendarSummary>> {
        if entity_type != CalendarEntityType::Event {
            return Ok(Vec::new());
        }
        Ok(self.calendars.read().await.clone())
    }

    async fn create_calendar(&self, spec: CalendarSpec) -> Result<String> {
        let source = match (spec.source, spec.source_id) {
            (Some(source), _) => source,
            (None, Some(source_id)) => CalendarSource {
                id: Some(source_id),
                name: "Default".into(),
                is_local_account: false,
            },
            (None, None) => bail!("calendar needs a source"),
        };
        let mut calendars = self.calendars.write().await;
        let id = (calendars.len() + 1).to_string();
        calendars.push(CalendarSummary {
            id: id.clone(),
            title: spec.title,
            source: Some(source),
            access_level: spec.access_level,
            owner_account: spec.owner_account,
        });
        Ok(id)
    }

    async fn create_event(&self, calendar_id: &str, event: CalendarEvent) -> Result<String> {
        if !self
            .calendars
            .read()
            .await
            .iter()
            .any(|calendar| calendar.id == calendar_id)
        {
            bail!("calendar {calendar_id} does not exist");
        }
        let mut events = self.events.write().await;
        events.push((calendar_id.to_string(), event));
        Ok(format!("{calendar_id}-{}", events.len()))
    }
}

#[derive(Default)]
pub struct LoggedShare;

#[async_trait]
impl ShareService for LoggedShare {
    async fn share(&self, content: ShareContent) -> Result<()> {
        info!(dialog = %content.dialog_title, message = %content.message, "share sheet");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/adapters_tests.rs"]
mod tests;
