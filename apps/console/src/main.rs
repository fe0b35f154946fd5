use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{
    dish_detail::DishDetailAction, gesture::DragGesture, AppSettings, CalendarSequencer, Choice,
    DishDetailScreen, NotificationSequencer, ReservationEvent, ReservationScreen,
};
use shared::{
    domain::DishId,
    error::{Notice, NoticeLevel},
};
use tokio::{runtime::Handle, sync::mpsc};
use tracing_subscriber::EnvFilter;

mod adapters;
mod config;
mod menu;

use adapters::{
    LoggedNotifications, LoggedShare, MemoryCalendar, MemoryCatalog, PermissionScript,
    ScriptedPermissions,
};

#[derive(Parser, Debug)]
#[command(name = "confusion", about = "Drive the Con Fusion dish and reservation screens")]
struct Args {
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a dish and interact with its card.
    Dish {
        /// Route parameter, as navigation would pass it.
        #[arg(long, default_value = "")]
        id: String,
        /// Dishes already marked favorite.
        #[arg(long, value_delimiter = ',')]
        favorites: Vec<i64>,
        /// Horizontal drag displacement over the card.
        #[arg(long, allow_hyphen_values = true)]
        drag: Option<f64>,
        #[arg(long)]
        tap_favorite: bool,
        #[arg(long)]
        tap_comment: bool,
        /// Answer to the favorite prompt.
        #[arg(long, value_enum)]
        answer: Option<Answer>,
        #[arg(long)]
        rating: Option<u8>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        comment: Option<String>,
        /// Submit the comment form instead of cancelling it.
        #[arg(long)]
        submit: bool,
        #[arg(long)]
        share: bool,
    },
    /// Fill in and confirm a table reservation.
    Reserve {
        #[arg(long, default_value_t = 1)]
        guests: u8,
        #[arg(long)]
        smoking: bool,
        #[arg(long, default_value = "")]
        when: String,
        /// Show the summary before reserving.
        #[arg(long)]
        summary: bool,
        #[arg(long, value_enum, default_value_t = Answer::Ok)]
        answer: Answer,
        #[arg(long, value_enum, default_value_t = PermissionScript::Granted)]
        calendar_permission: PermissionScript,
        #[arg(long, value_enum, default_value_t = PermissionScript::Granted)]
        notification_permission: PermissionScript,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Answer {
    Ok,
    Cancel,
}

impl From<Answer> for Choice {
    fn from(value: Answer) -> Self {
        match value {
            Answer::Ok => Choice::Ok,
            Answer::Cancel => Choice::Cancel,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();
    let settings = config::load_settings(&args.config);

    match args.command {
        Command::Dish {
            id,
            favorites,
            drag,
            tap_favorite,
            tap_comment,
            answer,
            rating,
            author,
            comment,
            submit,
            share,
        } => {
            let actions = dish_actions(DishScript {
                drag,
                tap_favorite,
                tap_comment,
                answer,
                rating,
                author,
                comment,
                submit,
                share,
            });
            run_dish(&settings, &id, favorites, actions).await
        }
        Command::Reserve {
            guests,
            smoking,
            when,
            summary,
            answer,
            calendar_permission,
            notification_permission,
        } => {
            let permissions = ScriptedPermissions::new(calendar_permission, notification_permission);
            let mut events = vec![
                ReservationEvent::SetGuests(guests),
                ReservationEvent::SetSmoking(smoking),
                ReservationEvent::SetWhen(when),
            ];
            if summary {
                events.push(ReservationEvent::ToggleSummary);
            }
            events.push(ReservationEvent::RequestReservation);
            events.push(ReservationEvent::Answer(answer.into()));
            run_reservation(&settings, permissions, events).await
        }
    }
}

struct DishScript {
    drag: Option<f64>,
    tap_favorite: bool,
    tap_comment: bool,
    answer: Option<Answer>,
    rating: Option<u8>,
    author: Option<String>,
    comment: Option<String>,
    submit: bool,
    share: bool,
}

fn dish_actions(script: DishScript) -> Vec<DishDetailAction> {
    let mut actions = Vec::new();
    if let Some(dx) = script.drag {
        actions.push(DishDetailAction::DragStarted);
        actions.push(DishDetailAction::DragReleased(DragGesture::horizontal(dx)));
    }
    if script.tap_favorite {
        actions.push(DishDetailAction::FavoriteTapped);
    }
    if let Some(answer) = script.answer {
        actions.push(DishDetailAction::Answer(answer.into()));
    }
    if script.tap_comment {
        actions.push(DishDetailAction::CommentTapped);
    }
    if let Some(rating) = script.rating {
        actions.push(DishDetailAction::SetRating(rating));
    }
    if let Some(author) = script.author {
        actions.push(DishDetailAction::SetAuthor(author));
    }
    if let Some(comment) = script.comment {
        actions.push(DishDetailAction::SetBody(comment));
    }
    if script.submit {
        actions.push(DishDetailAction::SubmitComment);
    }
    if script.share {
        actions.push(DishDetailAction::ShareTapped);
    }
    actions
}

async fn run_dish(
    settings: &AppSettings,
    route_id: &str,
    favorites: Vec<i64>,
    actions: Vec<DishDetailAction>,
) -> Result<()> {
    let catalog = Arc::new(
        MemoryCatalog::new(menu::dishes(), menu::comments())
            .with_favorites(favorites.into_iter().map(DishId))
            .await,
    );
    let mut screen = DishDetailScreen::open(
        route_id,
        catalog.clone(),
        catalog,
        Arc::new(LoggedShare),
        settings.clone(),
    );

    for action in actions {
        let effects = screen.handle(action).await;
        if let Some(prompt) = &screen.state().prompt {
            println!("[prompt] {}: {}", prompt.title, prompt.message);
        }
        for effect in effects {
            println!("[effect] {effect:?}");
        }
    }

    println!("{}", serde_json::to_string_pretty(&screen.view().await)?);
    Ok(())
}

async fn run_reservation(
    settings: &AppSettings,
    permissions: ScriptedPermissions,
    events: Vec<ReservationEvent>,
) -> Result<()> {
    let permissions = Arc::new(permissions);
    let calendar = Arc::new(MemoryCalendar::device());
    let (notice_tx, mut notice_rx) = mpsc::unbounded_channel::<Notice>();
    let notices = Arc::new(notice_tx);

    let mut screen = ReservationScreen::new(
        Handle::current(),
        NotificationSequencer::new(
            permissions.clone(),
            Arc::new(LoggedNotifications),
            notices.clone(),
            settings.reservation.clone(),
        ),
        CalendarSequencer::new(
            permissions,
            calendar.clone(),
            notices,
            settings.reservation.clone(),
        ),
    );

    let mut dispatched = Vec::new();
    for event in events {
        let show_summary = matches!(event, ReservationEvent::ToggleSummary);
        dispatched.extend(screen.handle(event));
        if show_summary && screen.state().draft.summary_visible {
            println!("Your Reservation");
            for line in screen.state().draft.summary_lines() {
                println!("  {line}");
            }
        }
        if let Some(prompt) = &screen.state().prompt {
            println!("[prompt] {}\n{}", prompt.title, prompt.message);
        }
    }

    // The form has already reset; wait only so the process outlives the tasks.
    for dispatch in dispatched {
        let outcome = dispatch.settle().await;
        tracing::debug!(?outcome, "reservation side effects settled");
    }

    while let Ok(notice) = notice_rx.try_recv() {
        let level = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
        };
        match notice.message {
            Some(message) => println!("[{level}] {}: {message}", notice.title),
            None => println!("[{level}] {}", notice.title),
        }
    }
    for (calendar_id, event) in calendar.events().await {
        println!(
            "[calendar {calendar_id}] {} {} -> {} ({})",
            event.title, event.start, event.end, event.timezone
        );
    }
    println!("{}", serde_json::to_string_pretty(screen.state())?);
    Ok(())
}
