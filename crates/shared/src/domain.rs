use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }
    };
}

id_newtype!(DishId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const DEFAULT_RATING: u8 = 3;

pub const MIN_GUESTS: u8 = 1;
pub const MAX_GUESTS: u8 = 6;

/// Read-only projection of a catalog dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishView {
    pub id: DishId,
    pub name: String,
    pub description: String,
    /// Path relative to the image base URL.
    pub image: String,
}

/// A comment as recorded by the comment store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub dish_id: DishId,
    pub rating: u8,
    pub author: String,
    pub comment: String,
    pub date: DateTime<Utc>,
}

/// Immutable snapshot of a submitted comment draft. Id and timestamp are
/// assigned by the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSubmission {
    pub dish_id: DishId,
    pub rating: u8,
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    Calendar,
    Notifications,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Calendar => f.write_str("calendar"),
            Capability::Notifications => f.write_str("notifications"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    #[default]
    Undetermined,
    Denied,
    Granted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == PermissionStatus::Granted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionState {
    pub capability: Capability,
    pub status: PermissionStatus,
}
