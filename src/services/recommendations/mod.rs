//! Outfit recommender
//!
//! A single stateless pass per request: filter the wardrobe by weather and
//! occasion, pick a top/bottom pair (or a single garment when only one slot
//! can be filled), then attach an explanation. Preferences are recomputed from
//! feedback history on every request and passed in by the caller.
use rand::{seq::SliceRandom, Rng};
use std::{sync::Arc, time::Duration};

use crate::{
    models::{ClothingItem, OutfitPart, PreferenceProfile, Recommendation, Selection, WeatherReading},
    services::explanation::{
        fallback_explanation, ExplanationError, ExplanationPrompt, ExplanationService,
    },
};

pub mod filter;
pub mod scorer;

pub use filter::{candidates, Candidates};
pub use scorer::{score_and_select, score_pair};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendationError {
    #[error("wardrobe is empty")]
    EmptyWardrobe,

    #[error("no viable candidates for an outfit")]
    NoViableCandidates,
}

/// Produces complete recommendations (selection plus explanation) or an error;
/// never a partial result.
#[derive(Clone)]
pub struct Recommender {
    explainer: Arc<dyn ExplanationService>,
    explanation_timeout: Duration,
}

impl Recommender {
    pub fn new(explainer: Arc<dyn ExplanationService>, explanation_timeout: Duration) -> Self {
        Self {
            explainer,
            explanation_timeout,
        }
    }

    /// Recommends an outfit from `wardrobe` for the occasion and weather
    pub async fn generate_outfit<R: Rng + Send + ?Sized>(
        &self,
        wardrobe: &[ClothingItem],
        occasion: &str,
        weather: &WeatherReading,
        profile: Option<&PreferenceProfile>,
        rng: &mut R,
    ) -> Result<Recommendation, RecommendationError> {
        let selection = select_outfit(wardrobe, occasion, weather, profile, rng)?;
        let explanation = self.explain(&selection, occasion, weather).await;

        Ok(Recommendation {
            selection,
            explanation,
        })
    }

    /// Asks the text service for an explanation, bounded by the configured
    /// timeout. Falls back to the template on any failure.
    pub async fn explain(
        &self,
        selection: &Selection,
        occasion: &str,
        weather: &WeatherReading,
    ) -> String {
        let prompt = ExplanationPrompt::new(selection, occasion, weather);

        let result = match tokio::time::timeout(
            self.explanation_timeout,
            self.explainer.generate(&prompt),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ExplanationError::Timeout(self.explanation_timeout)),
        };

        match result {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                tracing::warn!(
                    service = self.explainer.name(),
                    "Explanation service returned blank text, using fallback"
                );
                fallback_explanation(selection, occasion, weather)
            }
            Err(e) => {
                tracing::warn!(
                    service = self.explainer.name(),
                    error = %e,
                    "Explanation unavailable, using fallback"
                );
                fallback_explanation(selection, occasion, weather)
            }
        }
    }
}

/// Chooses the garments for an outfit without explaining them
pub fn select_outfit<R: Rng + ?Sized>(
    wardrobe: &[ClothingItem],
    occasion: &str,
    weather: &WeatherReading,
    profile: Option<&PreferenceProfile>,
    rng: &mut R,
) -> Result<Selection, RecommendationError> {
    if wardrobe.is_empty() {
        return Err(RecommendationError::EmptyWardrobe);
    }

    let pool = candidates(wardrobe, occasion, weather);

    // One slot stays empty even after refilling, so recommend a single garment
    if !pool.is_pairable() {
        let item = wardrobe
            .choose(rng)
            .ok_or(RecommendationError::NoViableCandidates)?;
        tracing::info!(
            item_id = %item.id,
            outfit_part = %item.outfit_part,
            tops = pool.tops.len(),
            bottoms = pool.bottoms.len(),
            "Only one outfit slot can be filled, recommending a single item"
        );
        return Ok(match item.outfit_part {
            OutfitPart::Top => Selection::TopOnly(item.clone()),
            OutfitPart::Bottom => Selection::BottomOnly(item.clone()),
        });
    }

    let (top, bottom) = score_and_select(&pool.tops, &pool.bottoms, profile, occasion, rng)
        .ok_or(RecommendationError::NoViableCandidates)?;

    Ok(Selection::Pair {
        top: top.clone(),
        bottom: bottom.clone(),
    })
}
