use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

use super::{Category, OutfitDetails, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Liked,
    Disliked,
}

impl Reaction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reaction::Liked => "liked",
            Reaction::Disliked => "disliked",
        }
    }

    pub fn reward(&self) -> i32 {
        match self {
            Reaction::Liked => 1,
            Reaction::Disliked => -1,
        }
    }
}

impl FromStr for Reaction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "liked" => Ok(Reaction::Liked),
            "disliked" => Ok(Reaction::Disliked),
            other => Err(format!("unknown reaction: {}", other)),
        }
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's reaction to an outfit. Append-only; no deduplication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub outfit_id: Uuid,
    pub reaction: Reaction,
    pub created_at: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(user_id: Uuid, outfit_id: Uuid, reaction: Reaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            outfit_id,
            reaction,
            created_at: Utc::now(),
        }
    }
}

/// Style and color attributes of a rated outfit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Combination {
    pub top_style: Option<Style>,
    pub bottom_style: Option<Style>,
    #[serde(default)]
    pub top_colors: Vec<String>,
    #[serde(default)]
    pub bottom_colors: Vec<String>,
    pub occasion: Option<String>,
}

impl Combination {
    /// Extracts the combination from an outfit; missing garments contribute nothing
    pub fn from_outfit(outfit: &OutfitDetails) -> Self {
        Self {
            top_style: outfit.top.as_ref().map(|item| item.style),
            bottom_style: outfit.bottom.as_ref().map(|item| item.style),
            top_colors: outfit
                .top
                .as_ref()
                .map(|item| item.dominant_colors.clone())
                .unwrap_or_default(),
            bottom_colors: outfit
                .bottom
                .as_ref()
                .map(|item| item.dominant_colors.clone())
                .unwrap_or_default(),
            occasion: Some(outfit.occasion.clone()),
        }
    }
}

/// Liked and disliked combinations derived from feedback history.
/// Computed on demand and never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PreferenceProfile {
    pub liked: Vec<Combination>,
    pub disliked: Vec<Combination>,
}

impl PreferenceProfile {
    /// True for users without any feedback history
    pub fn is_empty(&self) -> bool {
        self.liked.is_empty() && self.disliked.is_empty()
    }
}

/// Structured record of a single piece of feedback, kept for offline training
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingSignal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub outfit_id: Uuid,
    pub reaction: Reaction,
    pub combination: Combination,
    pub top_category: Option<Category>,
    pub bottom_category: Option<Category>,
    pub reward: i32,
    pub created_at: DateTime<Utc>,
}

/// A stored feedback row as read back for aggregation.
///
/// The reaction is kept raw so that corrupt rows can be skipped individually.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub feedback_id: Uuid,
    pub outfit_id: Uuid,
    pub reaction: String,
    /// `None` when the referenced outfit no longer exists
    pub outfit: Option<OutfitDetails>,
}
