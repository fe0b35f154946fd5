//! Hand-written collaborators for controller tests.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use platform::{
    CalendarAccessLevel, CalendarEntityType, CalendarEvent, CalendarService, CalendarSource,
    CalendarSpec, CalendarSummary, CatalogStore, CommentSink, LocalNotification,
    NotificationService, PermissionService, ShareContent, ShareService,
};
use shared::{
    domain::{Capability, Comment, CommentId, CommentSubmission, DishId, DishView, PermissionStatus},
    error::Notice,
};
use tokio::sync::{mpsc, Mutex};

pub fn notice_channel() -> (mpsc::UnboundedSender<Notice>, mpsc::UnboundedReceiver<Notice>) {
    mpsc::unbounded_channel()
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<Notice>) -> Vec<Notice> {
    let mut notices = Vec::new();
    while let Ok(notice) = rx.try_recv() {
        notices.push(notice);
    }
    notices
}

#[derive(Debug, Clone, Copy)]
struct PermissionScript {
    initial: PermissionStatus,
    after_request: PermissionStatus,
}

#[derive(Default)]
pub struct ScriptedPermissions {
    scripts: HashMap<Capability, PermissionScript>,
    pub queries: Mutex<Vec<Capability>>,
    pub requests: Mutex<Vec<Capability>>,
}

impl ScriptedPermissions {
    pub fn granted() -> Self {
        Self::default()
            .with(
                Capability::Calendar,
                PermissionStatus::Granted,
                PermissionStatus::Granted,
            )
            .with(
                Capability::Notifications,
                PermissionStatus::Granted,
                PermissionStatus::Granted,
            )
    }

    pub fn with(
        mut self,
        capability: Capability,
        initial: PermissionStatus,
        after_request: PermissionStatus,
    ) -> Self {
        self.scripts.insert(
            capability,
            PermissionScript {
                initial,
                after_request,
            },
        );
        self
    }

    pub async fn request_count(&self, capability: Capability) -> usize {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|c| **c == capability)
            .count()
    }
}

#[async_trait]
impl PermissionService for ScriptedPermissions {
    async fn status(&self, capability: Capability) -> Result<PermissionStatus> {
        self.queries.lock().await.push(capability);
        Ok(self
            .scripts
            .get(&capability)
            .map(|script| script.initial)
            .unwrap_or_default())
    }

    async fn request(&self, capability: Capability) -> Result<PermissionStatus> {
        self.requests.lock().await.push(capability);
        Ok(self
            .scripts
            .get(&capability)
            .map(|script| script.after_request)
            .unwrap_or(PermissionStatus::Denied))
    }
}

#[derive(Default)]
pub struct RecordingNotifications {
    pub presented: Mutex<Vec<LocalNotification>>,
    pub fail_with: Option<String>,
}

#[async_trait]
impl NotificationService for RecordingNotifications {
    async fn present_local(&self, notification: LocalNotification) -> Result<()> {
        self.presented.lock().await.push(notification);
        match &self.fail_with {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}

pub struct RecordingCalendar {
    pub existing: Mutex<Vec<CalendarSummary>>,
    pub created_calendars: Mutex<Vec<CalendarSpec>>,
    pub events: Mutex<Vec<(String, CalendarEvent)>>,
    pub fail_event_with: Option<String>,
}

impl RecordingCalendar {
    pub fn with_calendars(calendars: Vec<CalendarSummary>) -> Self {
        Self {
            existing: Mutex::new(calendars),
            created_calendars: Mutex::new(Vec::new()),
            events: Mutex::new(Vec::new()),
            fail_event_with: None,
        }
    }

    /// One iCloud calendar under the "Default" source and one owned local
    /// account calendar, so either platform policy can find a source.
    pub fn device_defaults() -> Self {
        Self::with_calendars(vec![
            CalendarSummary {
                id: "cal-home".into(),
                title: "Home".into(),
                source: Some(CalendarSource {
                    id: Some("src-default".into()),
                    name: "Default".into(),
                    is_local_account: false,
                }),
                access_level: CalendarAccessLevel::Editor,
                owner_account: None,
            },
            CalendarSummary {
                id: "cal-owner".into(),
                title: "Personal".into(),
                source: Some(CalendarSource {
                    id: Some("src-local".into()),
                    name: "owner@device".into(),
                    is_local_account: true,
                }),
                access_level: CalendarAccessLevel::Owner,
                owner_account: Some("owner@device".into()),
            },
        ])
    }

    pub fn failing_events(mut self, err: impl Into<String>) -> Self {
        self.fail_event_with = Some(err.into());
        self
    }
}

#[async_trait]
impl CalendarService for RecordingCalendar {
    async fn calendars(&self, _entity_type: CalendarEntityType) -> Result<Vec<CalendarSummary>> {
        Ok(self.existing.lock().await.clone())
    }

    async fn create_calendar(&self, spec: CalendarSpec) -> Result<String> {
        let mut created = self.created_calendars.lock().await;
        let id = format!("created-{}", created.len() + 1);
        self.existing.lock().await.push(CalendarSummary {
            id: id.clone(),
            title: spec.title.clone(),
            source: spec.source.clone().or_else(|| {
                spec.source_id.clone().map(|source_id| CalendarSource {
                    id: Some(source_id),
                    name: "Default".into(),
                    is_local_account: false,
                })
            }),
            access_level: spec.access_level,
            owner_account: spec.owner_account.clone(),
        });
        created.push(spec);
        Ok(id)
    }

    async fn create_event(&self, calendar_id: &str, event: CalendarEvent) -> Result<String> {
        if let Some(err) = &self.fail_event_with {
            return Err(anyhow!(err.clone()));
        }
        let mut events = self.events.lock().await;
        events.push((calendar_id.to_string(), event));
        Ok(format!("event-{}", events.len()))
    }
}

pub struct MemoryCatalog {
    dishes: Vec<DishView>,
    pub favorites: Mutex<HashSet<DishId>>,
    pub add_favorite_calls: Mutex<Vec<DishId>>,
    comments: Vec<Comment>,
}

impl MemoryCatalog {
    pub fn with_dishes(dishes: Vec<DishView>) -> Self {
        Self {
            dishes,
            favorites: Mutex::new(HashSet::new()),
            add_favorite_calls: Mutex::new(Vec::new()),
            comments: Vec::new(),
        }
    }

    pub fn uthappizza() -> Self {
        let mut catalog = Self::with_dishes(vec![
            DishView {
                id: DishId(0),
                name: "Uthappizza".into(),
                description: "A unique combination of Indian Uthappam and Italian pizza".into(),
                image: "images/uthappizza.png".into(),
            },
            DishView {
                id: DishId(1),
                name: "Zucchipakoda".into(),
                description: "Deep fried Zucchini coated with mildly spiced Chickpea flour batter"
                    .into(),
                image: "images/zucchipakoda.png".into(),
            },
        ]);
        catalog.comments = vec![
            comment(0, DishId(0), 5, "John Lemon", "Imagine all the eatables"),
            comment(1, DishId(0), 4, "Paul McVites", "Sends anyone to heaven"),
            comment(2, DishId(1), 3, "Michael Jaikishan", "Eat it, just eat it!"),
        ];
        catalog
    }

    pub async fn favorite(self, dish_id: DishId) -> Self {
        self.favorites.lock().await.insert(dish_id);
        self
    }
}

fn comment(seq: u128, dish_id: DishId, rating: u8, author: &str, body: &str) -> Comment {
    Comment {
        id: CommentId(uuid::Uuid::from_u128(seq)),
        dish_id,
        rating,
        author: author.into(),
        comment: body.into(),
        date: Utc.with_ymd_and_hms(2012, 10, 16, 17, 57, 28).unwrap(),
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn dish(&self, dish_id: DishId) -> Result<Option<DishView>> {
        Ok(self.dishes.iter().find(|dish| dish.id == dish_id).cloned())
    }

    async fn favorites(&self) -> Result<HashSet<DishId>> {
        Ok(self.favorites.lock().await.clone())
    }

    async fn add_favorite(&self, dish_id: DishId) -> Result<()> {
        self.add_favorite_calls.lock().await.push(dish_id);
        self.favorites.lock().await.insert(dish_id);
        Ok(())
    }

    async fn comments_for(&self, dish_id: DishId) -> Result<Vec<Comment>> {
        Ok(self
            .comments
            .iter()
            .filter(|comment| comment.dish_id == dish_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct RecordingComments {
    pub appended: Mutex<Vec<CommentSubmission>>,
    pub fail_with: Option<String>,
}

#[async_trait]
impl CommentSink for RecordingComments {
    async fn append_comment(&self, submission: CommentSubmission) -> Result<()> {
        self.appended.lock().await.push(submission);
        match &self.fail_with {
            Some(err) => Err(anyhow!(err.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingShare {
    pub shared: Mutex<Vec<ShareContent>>,
}

#[async_trait]
impl ShareService for RecordingShare {
    async fn share(&self, content: ShareContent) -> Result<()> {
        self.shared.lock().await.push(content);
        Ok(())
    }
}

pub fn arc<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
