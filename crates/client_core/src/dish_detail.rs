//! Dish detail screen: swipe/tap to favorite or comment, and sharing.

use std::sync::Arc;

use platform::{CatalogStore, CommentSink, ShareContent, ShareService};
use serde::Serialize;
use shared::domain::{Comment, CommentSubmission, DishId, DishView};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    comment_form::{self, CommentDraft, CommentFormEvent},
    gesture::{classify, DragGesture, GestureIntent},
    prompt::{Choice, ConfirmPrompt},
    settings::AppSettings,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("missing dishId route parameter")]
    Missing,
    #[error("invalid dishId route parameter '{raw}'")]
    Invalid { raw: String },
}

/// Navigation passes the dish id as a string, empty when absent.
pub fn parse_dish_route(raw: &str) -> Result<DishId, RouteError> {
    if raw.trim().is_empty() {
        return Err(RouteError::Missing);
    }
    raw.parse().map_err(|_| RouteError::Invalid {
        raw: raw.to_string(),
    })
}

/// Catalog facts the reducer needs, loaded fresh for every action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DishContext {
    pub dish: Option<DishView>,
    pub favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DishDetailState {
    pub form: CommentDraft,
    /// Pending "Add to Favorites?" confirmation.
    pub prompt: Option<ConfirmPrompt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DishDetailAction {
    DragStarted,
    DragReleased(DragGesture),
    FavoriteTapped,
    CommentTapped,
    ShareTapped,
    Answer(Choice),
    SetRating(u8),
    SetAuthor(String),
    SetBody(String),
    SubmitComment,
    CancelComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DishDetailEffect {
    /// Cosmetic acknowledgement of a gesture start.
    Pulse,
    AddFavorite(DishId),
    AppendComment(CommentSubmission),
    Share(ShareContent),
}

fn favorite_prompt(dish: &DishView) -> ConfirmPrompt {
    ConfirmPrompt::new(
        "Add to Favorites?",
        format!(
            "Are you sure you wish to add {} to your favorites?",
            dish.name
        ),
    )
}

pub fn share_content(settings: &AppSettings, dish: &DishView) -> ShareContent {
    let url = settings.image_url(&dish.image);
    ShareContent {
        title: dish.name.clone(),
        message: format!("{}: {} {}", dish.name, dish.description, url),
        url,
        dialog_title: format!("Share {}", dish.name),
    }
}

fn request_favorite(state: &DishDetailState, ctx: &DishContext) -> DishDetailState {
    let Some(dish) = &ctx.dish else {
        return state.clone();
    };
    if ctx.favorite {
        debug!(dish_id = %dish.id, "already favorited");
        return state.clone();
    }
    DishDetailState {
        prompt: Some(favorite_prompt(dish)),
        ..state.clone()
    }
}

fn apply_form(state: &DishDetailState, event: CommentFormEvent) -> (DishDetailState, Vec<DishDetailEffect>) {
    let (form, submission) = comment_form::reduce(&state.form, event);
    let next = DishDetailState {
        form,
        ..state.clone()
    };
    let effects = submission
        .map(DishDetailEffect::AppendComment)
        .into_iter()
        .collect();
    (next, effects)
}

pub fn reduce(
    state: &DishDetailState,
    ctx: &DishContext,
    settings: &AppSettings,
    action: DishDetailAction,
) -> (DishDetailState, Vec<DishDetailEffect>) {
    if state.prompt.is_some() {
        return match action {
            DishDetailAction::Answer(Choice::Ok) => {
                let effects = match &ctx.dish {
                    Some(dish) if !ctx.favorite => vec![DishDetailEffect::AddFavorite(dish.id)],
                    _ => Vec::new(),
                };
                (clear_prompt(state), effects)
            }
            DishDetailAction::Answer(Choice::Cancel) => (clear_prompt(state), Vec::new()),
            ignored => {
                debug!(action = ?ignored, "favorite prompt open; ignoring action");
                (state.clone(), Vec::new())
            }
        };
    }

    match action {
        DishDetailAction::DragStarted if ctx.dish.is_some() => {
            (state.clone(), vec![DishDetailEffect::Pulse])
        }
        DishDetailAction::DragReleased(gesture) if ctx.dish.is_some() => match classify(gesture) {
            GestureIntent::Favorite => (request_favorite(state, ctx), Vec::new()),
            GestureIntent::Comment => apply_form(state, CommentFormEvent::Reveal),
            GestureIntent::None => (state.clone(), Vec::new()),
        },
        DishDetailAction::FavoriteTapped => (request_favorite(state, ctx), Vec::new()),
        DishDetailAction::CommentTapped if ctx.dish.is_some() => {
            apply_form(state, CommentFormEvent::Reveal)
        }
        DishDetailAction::ShareTapped => {
            let effects = ctx
                .dish
                .as_ref()
                .map(|dish| DishDetailEffect::Share(share_content(settings, dish)))
                .into_iter()
                .collect();
            (state.clone(), effects)
        }
        DishDetailAction::SetRating(rating) => apply_form(state, CommentFormEvent::SetRating(rating)),
        DishDetailAction::SetAuthor(author) => apply_form(state, CommentFormEvent::SetAuthor(author)),
        DishDetailAction::SetBody(body) => apply_form(state, CommentFormEvent::SetBody(body)),
        DishDetailAction::SubmitComment => match &ctx.dish {
            Some(dish) => apply_form(state, CommentFormEvent::Submit { dish_id: dish.id }),
            None => apply_form(state, CommentFormEvent::Cancel),
        },
        DishDetailAction::CancelComment => apply_form(state, CommentFormEvent::Cancel),
        ignored => {
            trace!(action = ?ignored, "dish detail action without effect");
            (state.clone(), Vec::new())
        }
    }
}

fn clear_prompt(state: &DishDetailState) -> DishDetailState {
    DishDetailState {
        prompt: None,
        ..state.clone()
    }
}

/// Everything the rendering surface needs for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishDetailView {
    pub dish: Option<DishView>,
    pub image_url: Option<String>,
    pub favorite: bool,
    pub comments: Vec<Comment>,
    pub form: CommentDraft,
    pub prompt: Option<ConfirmPrompt>,
}

pub struct DishDetailScreen {
    dish_id: Option<DishId>,
    state: DishDetailState,
    catalog: Arc<dyn CatalogStore>,
    comments: Arc<dyn CommentSink>,
    share: Arc<dyn ShareService>,
    settings: AppSettings,
}

impl DishDetailScreen {
    /// Mounts the screen for the `dishId` route parameter. An unusable
    /// parameter yields a screen without a dish.
    pub fn open(
        route_dish_id: &str,
        catalog: Arc<dyn CatalogStore>,
        comments: Arc<dyn CommentSink>,
        share: Arc<dyn ShareService>,
        settings: AppSettings,
    ) -> Self {
        let dish_id = match parse_dish_route(route_dish_id) {
            Ok(dish_id) => Some(dish_id),
            Err(err) => {
                warn!(error = %err, "dish detail opened without a usable dish id");
                None
            }
        };
        Self {
            dish_id,
            state: DishDetailState::default(),
            catalog,
            comments,
            share,
            settings,
        }
    }

    pub fn state(&self) -> &DishDetailState {
        &self.state
    }

    async fn context(&self) -> DishContext {
        let Some(dish_id) = self.dish_id else {
            return DishContext::default();
        };
        let dish = self.catalog.dish(dish_id).await.unwrap_or_else(|err| {
            warn!(%dish_id, error = %err, "failed to load dish");
            None
        });
        let favorite = match self.catalog.favorites().await {
            Ok(favorites) => favorites.contains(&dish_id),
            Err(err) => {
                warn!(%dish_id, error = %err, "failed to load favorites");
                false
            }
        };
        DishContext { dish, favorite }
    }

    /// Applies one user action and runs its effects. Returns the effects for
    /// hosts that want to echo them.
    pub async fn handle(&mut self, action: DishDetailAction) -> Vec<DishDetailEffect> {
        let ctx = self.context().await;
        let (next, effects) = reduce(&self.state, &ctx, &self.settings, action);
        self.state = next;
        for effect in &effects {
            self.run(effect).await;
        }
        effects
    }

    async fn run(&self, effect: &DishDetailEffect) {
        match effect {
            DishDetailEffect::Pulse => trace!("dish card pulse"),
            DishDetailEffect::AddFavorite(dish_id) => {
                match self.catalog.add_favorite(*dish_id).await {
                    Ok(()) => info!(%dish_id, "dish added to favorites"),
                    Err(err) => warn!(%dish_id, error = %err, "adding favorite failed"),
                }
            }
            DishDetailEffect::AppendComment(submission) => {
                match self.comments.append_comment(submission.clone()).await {
                    Ok(()) => info!(dish_id = %submission.dish_id, "comment posted"),
                    Err(err) => warn!(dish_id = %submission.dish_id, error = %err, "posting comment failed"),
                }
            }
            DishDetailEffect::Share(content) => {
                if let Err(err) = self.share.share(content.clone()).await {
                    warn!(title = %content.title, error = %err, "share failed");
                }
            }
        }
    }

    pub async fn view(&self) -> DishDetailView {
        let ctx = self.context().await;
        let comments = match (&ctx.dish, self.dish_id) {
            (Some(_), Some(dish_id)) => self.catalog.comments_for(dish_id).await.unwrap_or_else(|err| {
                warn!(%dish_id, error = %err, "failed to load comments");
                Vec::new()
            }),
            _ => Vec::new(),
        };
        DishDetailView {
            image_url: ctx
                .dish
                .as_ref()
                .map(|dish| self.settings.image_url(&dish.image)),
            dish: ctx.dish,
            favorite: ctx.favorite,
            comments,
            form: self.state.form.clone(),
            prompt: self.state.prompt.clone(),
        }
    }
}

#[cfg(test)]
#[path = "tests/dish_detail_tests.rs"]
mod tests;
