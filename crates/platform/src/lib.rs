//! Contracts of the platform collaborators the screens consume.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shared::{
    domain::{Capability, Comment, CommentSubmission, DishId, DishView, PermissionStatus},
    error::Notice,
};
use tokio::sync::mpsc::UnboundedSender;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn dish(&self, dish_id: DishId) -> anyhow::Result<Option<DishView>>;
    async fn favorites(&self) -> anyhow::Result<HashSet<DishId>>;
    async fn add_favorite(&self, dish_id: DishId) -> anyhow::Result<()>;
    async fn comments_for(&self, dish_id: DishId) -> anyhow::Result<Vec<Comment>>;
}

/// Append-only comment store. Assigns ids and timestamps.
#[async_trait]
pub trait CommentSink: Send + Sync {
    async fn append_comment(&self, submission: CommentSubmission) -> anyhow::Result<()>;
}

#[async_trait]
pub trait PermissionService: Send + Sync {
    async fn status(&self, capability: Capability) -> anyhow::Result<PermissionStatus>;
    async fn request(&self, capability: Capability) -> anyhow::Result<PermissionStatus>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IosNotificationOptions {
    pub sound: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AndroidNotificationOptions {
    pub sound: bool,
    pub vibrate: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalNotification {
    pub title: String,
    pub body: String,
    pub ios: IosNotificationOptions,
    pub android: AndroidNotificationOptions,
}

#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn present_local(&self, notification: LocalNotification) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarEntityType {
    Event,
    Reminder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarAccessLevel {
    Owner,
    Editor,
    Contributor,
    Read,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: Option<String>,
    pub name: String,
    pub is_local_account: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub id: String,
    pub title: String,
    pub source: Option<CalendarSource>,
    pub access_level: CalendarAccessLevel,
    pub owner_account: Option<String>,
}

/// Parameters for a new calendar. Which source fields are set depends on the
/// platform policy that built it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSpec {
    pub title: String,
    pub name: String,
    pub color: String,
    pub entity_type: CalendarEntityType,
    pub access_level: CalendarAccessLevel,
    pub source_id: Option<String>,
    pub source: Option<CalendarSource>,
    pub owner_account: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub timezone: String,
    pub location: String,
}

#[async_trait]
pub trait CalendarService: Send + Sync {
    async fn calendars(&self, entity_type: CalendarEntityType)
        -> anyhow::Result<Vec<CalendarSummary>>;
    async fn create_calendar(&self, spec: CalendarSpec) -> anyhow::Result<String>;
    async fn create_event(&self, calendar_id: &str, event: CalendarEvent) -> anyhow::Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareContent {
    pub title: String,
    pub message: String,
    pub url: String,
    pub dialog_title: String,
}

#[async_trait]
pub trait ShareService: Send + Sync {
    async fn share(&self, content: ShareContent) -> anyhow::Result<()>;
}

/// Rendering-side sink for non-blocking notices.
pub trait NoticePresenter: Send + Sync {
    fn present(&self, notice: Notice);
}

impl NoticePresenter for UnboundedSender<Notice> {
    fn present(&self, notice: Notice) {
        // Receiver dropped: the screen is gone.
        let _ = self.send(notice);
    }
}
