//! Local "reservation requested" notification behind the notifications
//! permission.

use std::sync::Arc;

use platform::{
    AndroidNotificationOptions, IosNotificationOptions, LocalNotification, NoticePresenter,
    NotificationService, PermissionService,
};
use shared::{domain::Capability, error::ActionError};
use tracing::{info, warn};

use crate::{permission_gate::run_gated, settings::ReservationSettings};

pub fn reservation_notification(settings: &ReservationSettings, when: &str) -> LocalNotification {
    LocalNotification {
        title: settings.notification_title.clone(),
        body: format!("Reservation for {when} requested"),
        ios: IosNotificationOptions { sound: true },
        android: AndroidNotificationOptions {
            sound: true,
            vibrate: true,
            color: settings.notification_color.clone(),
        },
    }
}

#[derive(Clone)]
pub struct NotificationSequencer {
    permissions: Arc<dyn PermissionService>,
    notifications: Arc<dyn NotificationService>,
    notices: Arc<dyn NoticePresenter>,
    settings: ReservationSettings,
}

impl NotificationSequencer {
    pub fn new(
        permissions: Arc<dyn PermissionService>,
        notifications: Arc<dyn NotificationService>,
        notices: Arc<dyn NoticePresenter>,
        settings: ReservationSettings,
    ) -> Self {
        Self {
            permissions,
            notifications,
            notices,
            settings,
        }
    }

    /// Delivery failures are logged only; the notification is best-effort.
    pub async fn notify_reservation(&self, when: String) -> Result<(), ActionError> {
        run_gated(
            self.permissions.as_ref(),
            self.notices.as_ref(),
            Capability::Notifications,
            when,
            |when| async move {
                let notification = reservation_notification(&self.settings, &when);
                match self.notifications.present_local(notification).await {
                    Ok(()) => info!(%when, "reservation notification presented"),
                    Err(err) => warn!(%when, error = %err, "reservation notification failed"),
                }
                Ok(())
            },
        )
        .await
    }
}
