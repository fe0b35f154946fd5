//! Comment form shown over the dish detail screen.

use serde::{Deserialize, Serialize};
use shared::domain::{CommentSubmission, DishId, DEFAULT_RATING, MAX_RATING, MIN_RATING};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub rating: u8,
    pub author: String,
    pub body: String,
    pub visible: bool,
}

impl Default for CommentDraft {
    fn default() -> Self {
        Self {
            rating: DEFAULT_RATING,
            author: String::new(),
            body: String::new(),
            visible: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentFormEvent {
    Reveal,
    SetRating(u8),
    SetAuthor(String),
    SetBody(String),
    Submit { dish_id: DishId },
    /// Cancel button, or the modal being dismissed by the platform.
    Cancel,
}

/// Applies one form event. Returns the next draft and, for a submit from the
/// visible form, the snapshot to hand to the comment sink.
pub fn reduce(
    draft: &CommentDraft,
    event: CommentFormEvent,
) -> (CommentDraft, Option<CommentSubmission>) {
    match event {
        CommentFormEvent::Reveal => (
            CommentDraft {
                visible: true,
                ..draft.clone()
            },
            None,
        ),
        CommentFormEvent::SetRating(rating) if draft.visible => (
            CommentDraft {
                rating: rating.clamp(MIN_RATING, MAX_RATING),
                ..draft.clone()
            },
            None,
        ),
        CommentFormEvent::SetAuthor(author) if draft.visible => (
            CommentDraft {
                author,
                ..draft.clone()
            },
            None,
        ),
        CommentFormEvent::SetBody(body) if draft.visible => (
            CommentDraft {
                body,
                ..draft.clone()
            },
            None,
        ),
        CommentFormEvent::Submit { dish_id } if draft.visible => {
            let submission = CommentSubmission {
                dish_id,
                rating: draft.rating,
                author: draft.author.clone(),
                body: draft.body.clone(),
            };
            (CommentDraft::default(), Some(submission))
        }
        CommentFormEvent::Cancel => (CommentDraft::default(), None),
        ignored => {
            tracing::debug!(event = ?ignored, "comment form hidden; ignoring event");
            (draft.clone(), None)
        }
    }
}

#[cfg(test)]
#[path = "tests/comment_form_tests.rs"]
mod tests;
