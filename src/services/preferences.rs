use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::store::FeedbackStore,
    error::AppResult,
    models::{
        Combination, FeedbackRecord, OutfitDetails, PreferenceProfile, Reaction, TrainingSignal,
    },
};

/// A stored feedback record that cannot contribute to a profile
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MalformedFeedback {
    #[error("feedback {feedback_id} has unknown reaction {reaction:?}")]
    UnknownReaction { feedback_id: Uuid, reaction: String },

    #[error("feedback {feedback_id} references missing outfit {outfit_id}")]
    MissingOutfit { feedback_id: Uuid, outfit_id: Uuid },
}

fn parse_record(record: &FeedbackRecord) -> Result<(Reaction, Combination), MalformedFeedback> {
    let reaction = record
        .reaction
        .parse::<Reaction>()
        .map_err(|_| MalformedFeedback::UnknownReaction {
            feedback_id: record.feedback_id,
            reaction: record.reaction.clone(),
        })?;

    let outfit = record
        .outfit
        .as_ref()
        .ok_or(MalformedFeedback::MissingOutfit {
            feedback_id: record.feedback_id,
            outfit_id: record.outfit_id,
        })?;

    Ok((reaction, Combination::from_outfit(outfit)))
}

/// Buckets feedback records into liked and disliked combinations.
///
/// Records keep their stored order. Malformed ones are logged and skipped.
pub fn aggregate_records(records: &[FeedbackRecord]) -> PreferenceProfile {
    let mut profile = PreferenceProfile::default();

    for record in records {
        match parse_record(record) {
            Ok((Reaction::Liked, combination)) => profile.liked.push(combination),
            Ok((Reaction::Disliked, combination)) => profile.disliked.push(combination),
            Err(e) => tracing::warn!(error = %e, "Skipping malformed feedback"),
        }
    }

    profile
}

/// Builds the user's preference profile from their full feedback history
pub async fn aggregate<S>(store: &S, user_id: Uuid) -> AppResult<PreferenceProfile>
where
    S: FeedbackStore + ?Sized,
{
    let records = store.list_feedback(user_id).await?;
    let profile = aggregate_records(&records);

    tracing::debug!(
        user_id = %user_id,
        records = records.len(),
        liked = profile.liked.len(),
        disliked = profile.disliked.len(),
        "Aggregated preferences"
    );

    Ok(profile)
}

/// Training signal written alongside each feedback event
pub fn record_feedback(outfit: &OutfitDetails, reaction: Reaction) -> TrainingSignal {
    TrainingSignal {
        id: Uuid::new_v4(),
        user_id: outfit.user_id,
        outfit_id: outfit.id,
        reaction,
        combination: Combination::from_outfit(outfit),
        top_category: outfit.top.as_ref().map(|item| item.category),
        bottom_category: outfit.bottom.as_ref().map(|item| item.category),
        reward: reaction.reward(),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ClothingItem, NewClothingItem, Style, WeatherReading};

    fn item(category: Category, style: Style, colors: &[&str]) -> ClothingItem {
        NewClothingItem {
            category: Some(category),
            style: Some(style),
            dominant_colors: colors.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
        .into_item(Uuid::new_v4())
    }

    fn outfit(top: Option<ClothingItem>, bottom: Option<ClothingItem>) -> OutfitDetails {
        OutfitDetails {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            top,
            bottom,
            occasion: "casual".to_string(),
            weather: WeatherReading::new(20.0, "Clear"),
            explanation: String::new(),
            created_at: Utc::now(),
        }
    }

    fn record(reaction: &str, outfit: Option<OutfitDetails>) -> FeedbackRecord {
        FeedbackRecord {
            feedback_id: Uuid::new_v4(),
            outfit_id: outfit.as_ref().map(|o| o.id).unwrap_or_else(Uuid::new_v4),
            reaction: reaction.to_string(),
            outfit,
        }
    }

    #[test]
    fn test_aggregate_buckets_by_reaction() {
        let liked = outfit(
            Some(item(Category::Shirt, Style::Casual, &["#ffffff"])),
            Some(item(Category::Jeans, Style::Casual, &["#000080"])),
        );
        let disliked = outfit(
            Some(item(Category::Blouse, Style::Formal, &[])),
            Some(item(Category::Skirt, Style::Formal, &[])),
        );

        let profile = aggregate_records(&[
            record("liked", Some(liked)),
            record("disliked", Some(disliked)),
        ]);

        assert_eq!(profile.liked.len(), 1);
        assert_eq!(profile.liked[0].top_style, Some(Style::Casual));
        assert_eq!(profile.liked[0].bottom_colors, vec!["#000080"]);
        assert_eq!(profile.disliked.len(), 1);
        assert_eq!(profile.disliked[0].top_style, Some(Style::Formal));
    }

    #[test]
    fn test_aggregate_keeps_duplicates_in_order() {
        let shirt = item(Category::Shirt, Style::Casual, &["#ffffff"]);
        let hoodie = item(Category::Hoodie, Style::Sporty, &["#00ff00"]);

        let profile = aggregate_records(&[
            record("liked", Some(outfit(Some(shirt.clone()), None))),
            record("liked", Some(outfit(Some(hoodie), None))),
            record("liked", Some(outfit(Some(shirt), None))),
        ]);

        let styles: Vec<_> = profile.liked.iter().map(|c| c.top_style).collect();
        assert_eq!(
            styles,
            vec![Some(Style::Casual), Some(Style::Sporty), Some(Style::Casual)]
        );
    }

    #[test]
    fn test_aggregate_skips_malformed_records() {
        let good = outfit(Some(item(Category::Shirt, Style::Casual, &[])), None);

        let profile = aggregate_records(&[
            record("meh", Some(good.clone())),
            record("liked", None),
            record("liked", Some(good)),
        ]);

        assert_eq!(profile.liked.len(), 1);
        assert!(profile.disliked.is_empty());
    }

    #[test]
    fn test_parse_record_reports_reason() {
        let missing = record("liked", None);
        assert_eq!(
            parse_record(&missing),
            Err(MalformedFeedback::MissingOutfit {
                feedback_id: missing.feedback_id,
                outfit_id: missing.outfit_id,
            })
        );

        let unknown = record("love it", Some(outfit(None, None)));
        assert!(matches!(
            parse_record(&unknown),
            Err(MalformedFeedback::UnknownReaction { .. })
        ));
    }

    #[test]
    fn test_outfit_with_deleted_items_contributes_empty_attributes() {
        let profile = aggregate_records(&[record("disliked", Some(outfit(None, None)))]);

        assert_eq!(profile.disliked.len(), 1);
        assert_eq!(profile.disliked[0].top_style, None);
        assert!(profile.disliked[0].top_colors.is_empty());
    }

    #[test]
    fn test_no_history_is_empty_profile() {
        assert!(aggregate_records(&[]).is_empty());
    }

    #[test]
    fn test_record_feedback_builds_training_signal() {
        let details = outfit(
            Some(item(Category::Shirt, Style::Casual, &["#ffffff"])),
            Some(item(Category::Jeans, Style::Casual, &["#000000"])),
        );

        let signal = record_feedback(&details, Reaction::Disliked);

        assert_eq!(signal.outfit_id, details.id);
        assert_eq!(signal.user_id, details.user_id);
        assert_eq!(signal.reward, -1);
        assert_eq!(signal.top_category, Some(Category::Shirt));
        assert_eq!(signal.bottom_category, Some(Category::Jeans));
        assert_eq!(signal.combination.top_colors, vec!["#ffffff"]);
        assert_eq!(signal.combination.occasion.as_deref(), Some("casual"));
    }
}
