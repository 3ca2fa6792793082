use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    db::store::{FeedbackStore, OutfitStore, WardrobeStore},
    error::AppResult,
    models::{
        ClothingItem, FeedbackEvent, FeedbackRecord, Outfit, OutfitDetails, SavedOutfit,
        TrainingSignal,
    },
};

/// In-process store backed by maps behind a single lock.
///
/// Used by tests and for running without a database. Every write completes
/// under the lock, so a create followed by a read always observes the create.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    /// Insertion order, oldest first
    items: Vec<ClothingItem>,
    outfits: HashMap<Uuid, Outfit>,
    saved: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    feedback: Vec<FeedbackEvent>,
    training_signals: Vec<TrainingSignal>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of outfits stored for a user
    pub async fn outfit_count(&self, user_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner.outfits.values().filter(|o| o.user_id == user_id).count()
    }

    /// Number of stored training signals for a user
    pub async fn training_signal_count(&self, user_id: Uuid) -> usize {
        let inner = self.inner.read().await;
        inner
            .training_signals
            .iter()
            .filter(|s| s.user_id == user_id)
            .count()
    }
}

impl MemoryStoreInner {
    fn item(&self, item_id: Option<Uuid>) -> Option<ClothingItem> {
        let item_id = item_id?;
        self.items.iter().find(|i| i.id == item_id).cloned()
    }

    fn details(&self, outfit: &Outfit) -> OutfitDetails {
        OutfitDetails::new(
            outfit.clone(),
            self.item(outfit.top_item_id),
            self.item(outfit.bottom_item_id),
        )
    }
}

#[async_trait::async_trait]
impl WardrobeStore for MemoryStore {
    async fn list_items(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .rev()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .iter()
            .find(|i| i.id == item_id && i.user_id == user_id)
            .cloned())
    }

    async fn insert_item(&self, item: &ClothingItem) -> AppResult<()> {
        self.inner.write().await.items.push(item.clone());
        Ok(())
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.items.len();
        inner
            .items
            .retain(|i| !(i.id == item_id && i.user_id == user_id));

        if inner.items.len() == before {
            return Ok(false);
        }

        for outfit in inner.outfits.values_mut() {
            if outfit.top_item_id == Some(item_id) {
                outfit.top_item_id = None;
            }
            if outfit.bottom_item_id == Some(item_id) {
                outfit.bottom_item_id = None;
            }
        }
        Ok(true)
    }
}

#[async_trait::async_trait]
impl OutfitStore for MemoryStore {
    async fn insert_outfit(&self, outfit: &Outfit) -> AppResult<()> {
        self.inner
            .write()
            .await
            .outfits
            .insert(outfit.id, outfit.clone());
        Ok(())
    }

    async fn get_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<OutfitDetails>> {
        let inner = self.inner.read().await;
        Ok(inner
            .outfits
            .get(&outfit_id)
            .filter(|o| o.user_id == user_id)
            .map(|o| inner.details(o)))
    }

    async fn save_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let already_saved = inner
            .saved
            .iter()
            .any(|(u, o, _)| *u == user_id && *o == outfit_id);
        if !already_saved {
            inner.saved.push((user_id, outfit_id, Utc::now()));
        }
        Ok(())
    }

    async fn list_saved(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>> {
        let inner = self.inner.read().await;
        Ok(inner
            .saved
            .iter()
            .rev()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, outfit_id, saved_at)| {
                inner.outfits.get(outfit_id).map(|o| SavedOutfit {
                    outfit: inner.details(o),
                    saved_at: *saved_at,
                })
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl FeedbackStore for MemoryStore {
    async fn insert_feedback(
        &self,
        event: &FeedbackEvent,
        signal: &TrainingSignal,
    ) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.feedback.push(event.clone());
        inner.training_signals.push(signal.clone());
        Ok(())
    }

    async fn list_feedback(&self, user_id: Uuid) -> AppResult<Vec<FeedbackRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .feedback
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| FeedbackRecord {
                feedback_id: f.id,
                outfit_id: f.outfit_id,
                reaction: f.reaction.to_string(),
                outfit: inner.outfits.get(&f.outfit_id).map(|o| inner.details(o)),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Category, NewClothingItem, Reaction, Recommendation, Selection, WeatherReading,
    };
    use crate::services::preferences::record_feedback;

    fn item(user_id: Uuid, category: Category) -> ClothingItem {
        NewClothingItem {
            category: Some(category),
            ..Default::default()
        }
        .into_item(user_id)
    }

    fn outfit(user_id: Uuid, top: &ClothingItem, bottom: &ClothingItem) -> Outfit {
        let recommendation = Recommendation {
            selection: Selection::Pair {
                top: top.clone(),
                bottom: bottom.clone(),
            },
            explanation: "Looks good".to_string(),
        };
        Outfit::from_recommendation(
            user_id,
            &recommendation,
            "casual",
            &WeatherReading::new(20.0, "Clear"),
        )
    }

    #[tokio::test]
    async fn test_items_are_scoped_per_user_and_newest_first() {
        let store = MemoryStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let first = item(alice, Category::Shirt);
        let second = item(alice, Category::Jeans);
        store.insert_item(&first).await.unwrap();
        store.insert_item(&item(bob, Category::Skirt)).await.unwrap();
        store.insert_item(&second).await.unwrap();

        let items = store.list_items(alice).await.unwrap();
        assert_eq!(
            items.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );
        assert!(store.get_item(bob, first.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_item_clears_outfit_references() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let shirt = item(user_id, Category::Shirt);
        let jeans = item(user_id, Category::Jeans);
        store.insert_item(&shirt).await.unwrap();
        store.insert_item(&jeans).await.unwrap();
        let outfit = outfit(user_id, &shirt, &jeans);
        store.insert_outfit(&outfit).await.unwrap();

        assert!(!store.delete_item(Uuid::new_v4(), shirt.id).await.unwrap());
        assert!(store.delete_item(user_id, shirt.id).await.unwrap());

        let details = store.get_outfit(user_id, outfit.id).await.unwrap().unwrap();
        assert!(details.top.is_none());
        assert_eq!(details.bottom.map(|b| b.id), Some(jeans.id));
    }

    #[tokio::test]
    async fn test_save_outfit_is_idempotent() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let shirt = item(user_id, Category::Shirt);
        let jeans = item(user_id, Category::Jeans);
        let outfit = outfit(user_id, &shirt, &jeans);
        store.insert_outfit(&outfit).await.unwrap();

        store.save_outfit(user_id, outfit.id).await.unwrap();
        store.save_outfit(user_id, outfit.id).await.unwrap();

        let saved = store.list_saved(user_id).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].outfit.id, outfit.id);
    }

    #[tokio::test]
    async fn test_feedback_round_trip() {
        let store = MemoryStore::new();
        let user_id = Uuid::new_v4();
        let shirt = item(user_id, Category::Shirt);
        let jeans = item(user_id, Category::Jeans);
        store.insert_item(&shirt).await.unwrap();
        store.insert_item(&jeans).await.unwrap();
        let outfit = outfit(user_id, &shirt, &jeans);
        store.insert_outfit(&outfit).await.unwrap();

        let details = store.get_outfit(user_id, outfit.id).await.unwrap().unwrap();
        let event = FeedbackEvent::new(user_id, outfit.id, Reaction::Liked);
        let signal = record_feedback(&details, Reaction::Liked);
        store.insert_feedback(&event, &signal).await.unwrap();

        let records = store.list_feedback(user_id).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reaction, "liked");
        assert_eq!(records[0].outfit.as_ref().map(|o| o.id), Some(outfit.id));
        assert_eq!(store.training_signal_count(user_id).await, 1);
        assert!(store.list_feedback(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
