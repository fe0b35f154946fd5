use serde::{Deserialize, Serialize};

/// Which platform rules decide the source of a newly created calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarPlatform {
    #[default]
    Ios,
    Android,
}

impl std::str::FromStr for CalendarPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            other => Err(format!("unknown calendar platform '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationSettings {
    pub event_title: String,
    pub location: String,
    pub timezone: String,
    pub calendar_title: String,
    pub calendar_color: String,
    pub calendar_platform: CalendarPlatform,
    pub notification_title: String,
    pub notification_color: String,
}

impl Default for ReservationSettings {
    fn default() -> Self {
        Self {
            event_title: "Con Fusion Table Reservation".into(),
            location: "121, Clear Water Bay Road, Clear Water Bay, Kowloon, Hong Kong".into(),
            timezone: "Asia/Hong_Kong".into(),
            calendar_title: "Reservation".into(),
            calendar_color: "#2196F3".into(),
            calendar_platform: CalendarPlatform::Ios,
            notification_title: "Your Reservation".into(),
            notification_color: "#512DA8".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Prefix for dish image paths, also used for shared links.
    pub base_url: String,
    pub reservation: ReservationSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001/".into(),
            reservation: ReservationSettings::default(),
        }
    }
}

impl AppSettings {
    pub fn image_url(&self, image: &str) -> String {
        format!("{}{}", self.base_url, image)
    }
}
