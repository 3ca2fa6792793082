use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    db::store::{FeedbackStore, OutfitStore, WardrobeStore},
    error::{AppError, AppResult},
    models::{
        ClothingItem, FeedbackEvent, FeedbackRecord, Outfit, OutfitDetails, SavedOutfit,
        TrainingSignal, UnknownLabel, WeatherReading,
    },
};

/// Creates a PostgreSQL connection pool
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the bundled migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const ITEM_COLUMNS: &str = "id, user_id, category, style, weather_suitability, outfit_part, \
                            dominant_colors, image_url, created_at";

const OUTFIT_COLUMNS: &str = "o.id, o.user_id, o.top_item_id, o.bottom_item_id, o.occasion, \
                              o.weather_temperature, o.weather_condition, o.explanation, o.created_at";

#[derive(Debug, FromRow)]
struct ClothingItemRow {
    id: Uuid,
    user_id: Uuid,
    category: String,
    style: String,
    weather_suitability: String,
    outfit_part: String,
    dominant_colors: Vec<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ClothingItemRow> for ClothingItem {
    type Error = UnknownLabel;

    fn try_from(row: ClothingItemRow) -> Result<Self, Self::Error> {
        Ok(ClothingItem {
            id: row.id,
            user_id: row.user_id,
            category: row.category.parse()?,
            style: row.style.parse()?,
            weather_suitability: row.weather_suitability.parse()?,
            outfit_part: row.outfit_part.parse()?,
            dominant_colors: row.dominant_colors,
            image_url: row.image_url,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct OutfitRow {
    id: Uuid,
    user_id: Uuid,
    top_item_id: Option<Uuid>,
    bottom_item_id: Option<Uuid>,
    occasion: String,
    weather_temperature: f64,
    weather_condition: String,
    explanation: String,
    created_at: DateTime<Utc>,
}

impl From<OutfitRow> for Outfit {
    fn from(row: OutfitRow) -> Self {
        Outfit {
            id: row.id,
            user_id: row.user_id,
            top_item_id: row.top_item_id,
            bottom_item_id: row.bottom_item_id,
            occasion: row.occasion,
            weather: WeatherReading::new(row.weather_temperature, row.weather_condition),
            explanation: row.explanation,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SavedOutfitRow {
    #[sqlx(flatten)]
    outfit: OutfitRow,
    saved_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct FeedbackRow {
    id: Uuid,
    outfit_id: Uuid,
    reaction: String,
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads items by id. Rows with unreadable labels are logged and left out,
    /// so outfits referencing them read as if the item were deleted.
    async fn items_by_id(&self, ids: Vec<Uuid>) -> AppResult<HashMap<Uuid, ClothingItem>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, ClothingItemRow>(&format!(
            "SELECT {} FROM clothing_items WHERE id = ANY($1)",
            ITEM_COLUMNS
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match ClothingItem::try_from(row) {
                    Ok(item) => Some((id, item)),
                    Err(e) => {
                        tracing::warn!(item_id = %id, error = %e, "Skipping unreadable clothing item");
                        None
                    }
                }
            })
            .collect())
    }

    async fn details(&self, outfits: Vec<Outfit>) -> AppResult<Vec<OutfitDetails>> {
        let ids = outfits
            .iter()
            .flat_map(|o| [o.top_item_id, o.bottom_item_id])
            .flatten()
            .collect();
        let items = self.items_by_id(ids).await?;

        Ok(outfits
            .into_iter()
            .map(|o| {
                let top = o.top_item_id.and_then(|id| items.get(&id).cloned());
                let bottom = o.bottom_item_id.and_then(|id| items.get(&id).cloned());
                OutfitDetails::new(o, top, bottom)
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl WardrobeStore for PgStore {
    async fn list_items(&self, user_id: Uuid) -> AppResult<Vec<ClothingItem>> {
        let rows = sqlx::query_as::<_, ClothingItemRow>(&format!(
            "SELECT {} FROM clothing_items WHERE user_id = $1 ORDER BY created_at DESC",
            ITEM_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| ClothingItem::try_from(row).map_err(|e| AppError::Internal(e.to_string())))
            .collect()
    }

    async fn get_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<Option<ClothingItem>> {
        let row = sqlx::query_as::<_, ClothingItemRow>(&format!(
            "SELECT {} FROM clothing_items WHERE id = $1 AND user_id = $2",
            ITEM_COLUMNS
        ))
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ClothingItem::try_from)
            .transpose()
            .map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn insert_item(&self, item: &ClothingItem) -> AppResult<()> {
        sqlx::query(&format!(
            "INSERT INTO clothing_items ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
            ITEM_COLUMNS
        ))
        .bind(item.id)
        .bind(item.user_id)
        .bind(item.category.as_str())
        .bind(item.style.as_str())
        .bind(item.weather_suitability.as_str())
        .bind(item.outfit_part.as_str())
        .bind(item.dominant_colors.clone())
        .bind(item.image_url.as_deref())
        .bind(item.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<bool> {
        // Outfit references are cleared by ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM clothing_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl OutfitStore for PgStore {
    async fn insert_outfit(&self, outfit: &Outfit) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO outfits (id, user_id, top_item_id, bottom_item_id, occasion, \
             weather_temperature, weather_condition, explanation, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(outfit.id)
        .bind(outfit.user_id)
        .bind(outfit.top_item_id)
        .bind(outfit.bottom_item_id)
        .bind(&outfit.occasion)
        .bind(outfit.weather.temperature)
        .bind(&outfit.weather.condition)
        .bind(&outfit.explanation)
        .bind(outfit.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<Option<OutfitDetails>> {
        let row = sqlx::query_as::<_, OutfitRow>(&format!(
            "SELECT {} FROM outfits o WHERE o.id = $1 AND o.user_id = $2",
            OUTFIT_COLUMNS
        ))
        .bind(outfit_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(self.details(vec![row.into()]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn save_outfit(&self, user_id: Uuid, outfit_id: Uuid) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO saved_outfits (user_id, outfit_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, outfit_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(outfit_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_saved(&self, user_id: Uuid) -> AppResult<Vec<SavedOutfit>> {
        let rows = sqlx::query_as::<_, SavedOutfitRow>(&format!(
            "SELECT {}, s.saved_at FROM saved_outfits s \
             JOIN outfits o ON o.id = s.outfit_id \
             WHERE s.user_id = $1 ORDER BY s.saved_at DESC",
            OUTFIT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let saved_at: Vec<DateTime<Utc>> = rows.iter().map(|r| r.saved_at).collect();
        let outfits = self
            .details(rows.into_iter().map(|r| r.outfit.into()).collect())
            .await?;

        Ok(outfits
            .into_iter()
            .zip(saved_at)
            .map(|(outfit, saved_at)| SavedOutfit { outfit, saved_at })
            .collect())
    }
}

#[async_trait::async_trait]
impl FeedbackStore for PgStore {
    async fn insert_feedback(
        &self,
        event: &FeedbackEvent,
        signal: &TrainingSignal,
    ) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO feedback (id, user_id, outfit_id, reaction, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(event.id)
        .bind(event.user_id)
        .bind(event.outfit_id)
        .bind(event.reaction.as_str())
        .bind(event.created_at)
        .execute(&mut *tx)
        .await?;

        let combination = &signal.combination;
        sqlx::query(
            "INSERT INTO training_signals (id, user_id, outfit_id, reaction, top_style, \
             bottom_style, top_colors, bottom_colors, top_category, bottom_category, occasion, \
             reward, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(signal.id)
        .bind(signal.user_id)
        .bind(signal.outfit_id)
        .bind(signal.reaction.as_str())
        .bind(combination.top_style.map(|s| s.as_str()))
        .bind(combination.bottom_style.map(|s| s.as_str()))
        .bind(combination.top_colors.clone())
        .bind(combination.bottom_colors.clone())
        .bind(signal.top_category.map(|c| c.as_str()))
        .bind(signal.bottom_category.map(|c| c.as_str()))
        .bind(combination.occasion.as_deref())
        .bind(signal.reward)
        .bind(signal.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn list_feedback(&self, user_id: Uuid) -> AppResult<Vec<FeedbackRecord>> {
        let rows = sqlx::query_as::<_, FeedbackRow>(
            "SELECT id, outfit_id, reaction FROM feedback \
             WHERE user_id = $1 ORDER BY created_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let outfit_ids: Vec<Uuid> = rows.iter().map(|r| r.outfit_id).collect();
        let outfit_rows = sqlx::query_as::<_, OutfitRow>(&format!(
            "SELECT {} FROM outfits o WHERE o.id = ANY($1) AND o.user_id = $2",
            OUTFIT_COLUMNS
        ))
        .bind(outfit_ids)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let outfits: HashMap<Uuid, OutfitDetails> = self
            .details(outfit_rows.into_iter().map(Outfit::from).collect())
            .await?
            .into_iter()
            .map(|o| (o.id, o))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| FeedbackRecord {
                feedback_id: row.id,
                outfit_id: row.outfit_id,
                reaction: row.reaction,
                outfit: outfits.get(&row.outfit_id).cloned(),
            })
            .collect())
    }
}
