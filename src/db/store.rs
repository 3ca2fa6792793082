use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        ClothingItem, FeedbackEvent, FeedbackRecord, Outfit, OutfitDetails, SavedOutfit,
        TrainingSignal,
    },
};

/// Per-user garment records
#[async_trait::async_trait]
pub trait WardrobeStore: Send + Sync {
    /// All items owned by the user, newest first
    async fn list_items(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>>;

    async fn get_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>>;

    async fn insert_item(&self, item: &ClothingItem) -> AppResult<()>;

    /// Deletes the item and clears references to it from outfits.
    /// Returns `false` when the user owns no such item.
    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool>;
}

/// Generated outfits and the user's saved list
#[async_trait::async_trait]
pub trait OutfitStore: Send + Sync {
    async fn insert_outfit(&self, outfit: &Outfit) -> AppResult<()>;

    /// The outfit with its garments, if owned by the user
    async fn get_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<OutfitDetails>>;

    /// Adds an outfit to the saved list; saving twice is a no-op
    async fn save_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<()>;

    /// Saved outfits, most recently saved first
    async fn list_saved(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>>;
}

/// Append-only feedback history
#[async_trait::async_trait]
pub trait FeedbackStore: Send + Sync {
    /// Persists the event and its training signal together
    async fn insert_feedback(&self, event: &FeedbackEvent, signal: &TrainingSignal)
        -> AppResult<()>;

    /// Every feedback record of the user, oldest first, resolved to its outfit
    async fn list_feedback(&self, user_id: Uuid) -> AppResult<Vec<FeedbackRecord>>;
}

/// Everything the HTTP layer needs from persistence
pub trait Store: WardrobeStore + OutfitStore + FeedbackStore {}

impl<T> Store for T where T: WardrobeStore + OutfitStore + FeedbackStore {}
