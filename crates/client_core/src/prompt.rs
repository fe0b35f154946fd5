//! Blocking two-way confirmation prompts, rendered by the host and answered
//! back into the owning controller.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Cancel,
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStyle {
    Cancel,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOption {
    pub label: String,
    pub style: OptionStyle,
    pub choice: Choice,
}

/// A modal with exactly the Cancel and OK options. Not dismissable without a
/// choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmPrompt {
    pub title: String,
    pub message: String,
    pub options: [PromptOption; 2],
}

impl ConfirmPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            options: [
                PromptOption {
                    label: "Cancel".into(),
                    style: OptionStyle::Cancel,
                    choice: Choice::Cancel,
                },
                PromptOption {
                    label: "OK".into(),
                    style: OptionStyle::Default,
                    choice: Choice::Ok,
                },
            ],
        }
    }
}
