//! Query-then-request permission sequencing in front of a platform action.

use std::future::Future;

use platform::{NoticePresenter, PermissionService};
use shared::{
    domain::{Capability, PermissionState, PermissionStatus},
    error::{ActionError, Notice},
};
use tracing::{debug, warn};

/// Makes sure `capability` is granted, asking the user at most once, and
/// returns the status it ended up with.
///
/// The status is never cached: every call queries the platform again. A
/// failing query counts as undetermined and a failing request as denied.
pub async fn obtain_permission(
    permissions: &dyn PermissionService,
    capability: Capability,
) -> Result<PermissionState, ActionError> {
    let queried = PermissionState {
        capability,
        status: match permissions.status(capability).await {
            Ok(status) => status,
            Err(err) => {
                warn!(%capability, error = %err, "permission query failed");
                PermissionStatus::Undetermined
            }
        },
    };
    if queried.status.is_granted() {
        return Ok(queried);
    }

    debug!(?queried, "requesting permission");
    let answered = PermissionState {
        capability,
        status: match permissions.request(capability).await {
            Ok(status) => status,
            Err(err) => {
                warn!(%capability, error = %err, "permission request failed");
                PermissionStatus::Denied
            }
        },
    };
    if answered.status.is_granted() {
        Ok(answered)
    } else {
        debug!(?answered, "permission refused");
        Err(ActionError::PermissionDenied { capability })
    }
}

/// Runs `action(args)` once `capability` is granted. On denial a warning
/// notice is shown and the action is dropped; nothing is retried or queued.
pub async fn run_gated<A, F, Fut, T>(
    permissions: &dyn PermissionService,
    notices: &dyn NoticePresenter,
    capability: Capability,
    args: A,
    action: F,
) -> Result<T, ActionError>
where
    F: FnOnce(A) -> Fut,
    Fut: Future<Output = Result<T, ActionError>>,
{
    if let Err(err) = obtain_permission(permissions, capability).await {
        warn!(%capability, kind = ?err.kind(), "permission not granted; skipping action");
        notices.present(Notice::from(&err));
        return Err(err);
    }
    action(args).await
}

#[cfg(test)]
#[path = "tests/permission_gate_tests.rs"]
mod tests;
