use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use uuid::Uuid;

/// Maximum number of dominant colors kept per garment
pub const MAX_DOMINANT_COLORS: usize = 3;

/// Garment type as reported by the image classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Shirt,
    Top,
    Blouse,
    Hoodie,
    Jacket,
    Dress,
    Pants,
    Jeans,
    Skirt,
    Leggings,
}

impl Category {
    pub const TOPS: [Category; 6] = [
        Category::Shirt,
        Category::Top,
        Category::Blouse,
        Category::Hoodie,
        Category::Jacket,
        Category::Dress,
    ];

    pub const BOTTOMS: [Category; 4] = [
        Category::Pants,
        Category::Jeans,
        Category::Skirt,
        Category::Leggings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Shirt => "shirt",
            Category::Top => "top",
            Category::Blouse => "blouse",
            Category::Hoodie => "hoodie",
            Category::Jacket => "jacket",
            Category::Dress => "dress",
            Category::Pants => "pants",
            Category::Jeans => "jeans",
            Category::Skirt => "skirt",
            Category::Leggings => "leggings",
        }
    }

    pub fn is_top(&self) -> bool {
        Self::TOPS.contains(self)
    }

    pub fn is_bottom(&self) -> bool {
        Self::BOTTOMS.contains(self)
    }

    /// Slot a garment of this category normally occupies. Unknown shapes land on top.
    pub fn default_part(&self) -> OutfitPart {
        if self.is_bottom() {
            OutfitPart::Bottom
        } else {
            OutfitPart::Top
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    #[default]
    Casual,
    Formal,
    Sporty,
}

impl Style {
    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Casual => "casual",
            Style::Formal => "formal",
            Style::Sporty => "sporty",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherSuitability {
    Warm,
    Cold,
    #[default]
    Unspecified,
}

impl WeatherSuitability {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSuitability::Warm => "warm",
            WeatherSuitability::Cold => "cold",
            WeatherSuitability::Unspecified => "unspecified",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutfitPart {
    Top,
    Bottom,
}

impl OutfitPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutfitPart::Top => "top",
            OutfitPart::Bottom => "bottom",
        }
    }
}

/// Error returned when a stored label does not match any known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} label: {value}")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! label_enum {
    ($ty:ty, $kind:literal, [$($variant:expr),+ $(,)?]) => {
        impl FromStr for $ty {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_lowercase();
                [$($variant),+]
                    .into_iter()
                    .find(|v| v.as_str() == normalized)
                    .ok_or_else(|| UnknownLabel {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum!(
    Category,
    "category",
    [
        Category::Shirt,
        Category::Top,
        Category::Blouse,
        Category::Hoodie,
        Category::Jacket,
        Category::Dress,
        Category::Pants,
        Category::Jeans,
        Category::Skirt,
        Category::Leggings,
    ]
);
label_enum!(Style, "style", [Style::Casual, Style::Formal, Style::Sporty]);
label_enum!(
    WeatherSuitability,
    "weather suitability",
    [
        WeatherSuitability::Warm,
        WeatherSuitability::Cold,
        WeatherSuitability::Unspecified,
    ]
);
label_enum!(OutfitPart, "outfit part", [OutfitPart::Top, OutfitPart::Bottom]);

/// A catalogued garment. Immutable once created; only deletion is supported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClothingItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category: Category,
    pub style: Style,
    pub weather_suitability: WeatherSuitability,
    pub outfit_part: OutfitPart,
    /// Most dominant first, at most [`MAX_DOMINANT_COLORS`] entries
    pub dominant_colors: Vec<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ClothingItem {
    /// Whether the item can fill the top slot (by declared part or by category).
    ///
    /// When the declared part disagrees with the category, such as leggings
    /// tagged as a top, the item fits both slots and may be paired with
    /// itself.
    pub fn fits_top(&self) -> bool {
        self.outfit_part == OutfitPart::Top || self.category.is_top()
    }

    /// Whether the item can fill the bottom slot. See [`ClothingItem::fits_top`].
    pub fn fits_bottom(&self) -> bool {
        self.outfit_part == OutfitPart::Bottom || self.category.is_bottom()
    }
}

/// Classifier output plus user-supplied labels for a new wardrobe item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClothingItem {
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub style: Option<Style>,
    #[serde(default, alias = "weather")]
    pub weather_suitability: Option<WeatherSuitability>,
    #[serde(default)]
    pub outfit_part: Option<OutfitPart>,
    #[serde(default)]
    pub dominant_colors: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewClothingItem {
    /// Fills defaults and normalizes colors into a storable item
    pub fn into_item(self, user_id: Uuid) -> ClothingItem {
        let category = self.category.unwrap_or_default();
        let dominant_colors = self
            .dominant_colors
            .into_iter()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
            .take(MAX_DOMINANT_COLORS)
            .collect();

        ClothingItem {
            id: Uuid::new_v4(),
            user_id,
            category,
            style: self.style.unwrap_or_default(),
            weather_suitability: self.weather_suitability.unwrap_or_default(),
            outfit_part: self.outfit_part.unwrap_or_else(|| category.default_part()),
            dominant_colors,
            image_url: self.image_url,
            created_at: Utc::now(),
        }
    }
}
