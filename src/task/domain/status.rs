//! Task status and kind enumerations.
//!
//! Stored records carry several spellings of the same status (`Complete`,
//! `completed`, `Needs attention`, ...). Every spelling is normalized to the
//! closed enumerations below when it crosses into the domain.

use super::{ParseTaskKindError, ParseTaskStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskStatus {
    /// Waiting on dependencies.
    Upcoming,
    /// Actionable: a human or an automated executor should pick it up.
    NeedsAttention,
    /// Finished for this workflow instance.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::NeedsAttention => "needs_attention",
            Self::Completed => "completed",
        }
    }

    /// Returns the folded tokens that parse to this status.
    ///
    /// The canonical form is always first. A stored spelling belongs to the
    /// status when [`fold_token`] maps it onto one of these tokens, so
    /// `Needs attention`, `NEEDS-ATTENTION` and `needs_attention` all match.
    #[must_use]
    pub const fn accepted_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Upcoming => &["upcoming"],
            Self::NeedsAttention => &["needs_attention"],
            Self::Completed => &["completed", "complete", "done"],
        }
    }

    /// Returns `true` when no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns `true` when moving to `target` is a forward step.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Upcoming, Self::NeedsAttention | Self::Completed)
                | (Self::NeedsAttention, Self::Completed)
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let token = fold_token(value);
        [Self::Upcoming, Self::NeedsAttention, Self::Completed]
            .into_iter()
            .find(|status| status.accepted_tokens().contains(&token.as_str()))
            .ok_or_else(|| ParseTaskStatusError(value.to_owned()))
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Who completes a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TaskKind {
    /// Completed by a person.
    Manual,
    /// Started by an external executor as soon as the task becomes actionable.
    Automated,
}

impl TaskKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Automated => "automated",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match fold_token(value).as_str() {
            "manual" | "human" => Ok(Self::Manual),
            "automated" | "automation" | "ai" => Ok(Self::Automated),
            _ => Err(ParseTaskKindError(value.to_owned())),
        }
    }
}

impl TryFrom<String> for TaskKind {
    type Error = ParseTaskKindError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

/// Trims, lowercases, and folds spaces and hyphens into underscores.
///
/// The `status_token` SQL function applies the same folding in the database.
#[must_use]
pub fn fold_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|ch| match ch {
            ' ' | '-' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}
