use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ClothingItem, WeatherReading};

/// The garments chosen for an outfit. At least one slot is always filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Pair {
        top: ClothingItem,
        bottom: ClothingItem,
    },
    TopOnly(ClothingItem),
    BottomOnly(ClothingItem),
}

impl Selection {
    pub fn top(&self) -> Option<&ClothingItem> {
        match self {
            Selection::Pair { top, .. } | Selection::TopOnly(top) => Some(top),
            Selection::BottomOnly(_) => None,
        }
    }

    pub fn bottom(&self) -> Option<&ClothingItem> {
        match self {
            Selection::Pair { bottom, .. } | Selection::BottomOnly(bottom) => Some(bottom),
            Selection::TopOnly(_) => None,
        }
    }
}

/// Output of the recommender: a selection and its explanation text
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub selection: Selection,
    pub explanation: String,
}

/// A persisted recommendation. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Outfit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub top_item_id: Option<Uuid>,
    pub bottom_item_id: Option<Uuid>,
    pub occasion: String,
    /// Weather used to generate the outfit, frozen at creation time
    pub weather: WeatherReading,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl Outfit {
    pub fn from_recommendation(
        user_id: Uuid,
        recommendation: &Recommendation,
        occasion: &str,
        weather: &WeatherReading,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            top_item_id: recommendation.selection.top().map(|item| item.id),
            bottom_item_id: recommendation.selection.bottom().map(|item| item.id),
            occasion: occasion.to_string(),
            weather: weather.clone(),
            explanation: recommendation.explanation.clone(),
            created_at: Utc::now(),
        }
    }
}

/// An outfit together with its (possibly deleted) garments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutfitDetails {
    pub id: Uuid,
    pub user_id: Uuid,
    pub top: Option<ClothingItem>,
    pub bottom: Option<ClothingItem>,
    pub occasion: String,
    pub weather: WeatherReading,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl OutfitDetails {
    pub fn new(outfit: Outfit, top: Option<ClothingItem>, bottom: Option<ClothingItem>) -> Self {
        Self {
            id: outfit.id,
            user_id: outfit.user_id,
            top,
            bottom,
            occasion: outfit.occasion,
            weather: outfit.weather,
            explanation: outfit.explanation,
            created_at: outfit.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedOutfit {
    #[serde(flatten)]
    pub outfit: OutfitDetails,
    pub saved_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewClothingItem};

    fn item(category: Category) -> ClothingItem {
        NewClothingItem {
            category: Some(category),
            ..Default::default()
        }
        .into_item(Uuid::new_v4())
    }

    #[test]
    fn test_selection_slots() {
        let shirt = item(Category::Shirt);
        let jeans = item(Category::Jeans);

        let pair = Selection::Pair {
            top: shirt.clone(),
            bottom: jeans.clone(),
        };
        assert_eq!(pair.top(), Some(&shirt));
        assert_eq!(pair.bottom(), Some(&jeans));

        let bottom_only = Selection::BottomOnly(jeans.clone());
        assert_eq!(bottom_only.top(), None);
        assert_eq!(bottom_only.bottom(), Some(&jeans));
    }

    #[test]
    fn test_outfit_from_single_item_recommendation() {
        let shirt = item(Category::Shirt);
        let user_id = shirt.user_id;
        let recommendation = Recommendation {
            selection: Selection::TopOnly(shirt.clone()),
            explanation: "Just the shirt".to_string(),
        };
        let weather = WeatherReading::new(22.0, "Sunny");

        let outfit = Outfit::from_recommendation(user_id, &recommendation, "casual", &weather);

        assert_eq!(outfit.top_item_id, Some(shirt.id));
        assert_eq!(outfit.bottom_item_id, None);
        assert_eq!(outfit.occasion, "casual");
        assert_eq!(outfit.weather, weather);
        assert_eq!(outfit.explanation, "Just the shirt");
    }
}
