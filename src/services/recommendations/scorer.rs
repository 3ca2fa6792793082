use rand::{seq::SliceRandom, Rng};

use crate::models::{ClothingItem, Combination, PreferenceProfile};

/// Points for a pair whose top and bottom styles both match a liked combination
pub const STYLE_MATCH_POINTS: u32 = 2;
/// Points for each garment color also present in a liked combination
pub const COLOR_MATCH_POINTS: u32 = 1;

/// Scores a top/bottom pair against every liked combination in the profile.
///
/// Only liked combinations contribute; disliked ones never lower a score.
pub fn score_pair(top: &ClothingItem, bottom: &ClothingItem, liked: &[Combination]) -> u32 {
    liked
        .iter()
        .map(|combination| {
            let mut score = 0;

            if combination.top_style == Some(top.style)
                && combination.bottom_style == Some(bottom.style)
            {
                score += STYLE_MATCH_POINTS;
            }

            score += color_matches(&top.dominant_colors, &combination.top_colors);
            score += color_matches(&bottom.dominant_colors, &combination.bottom_colors);
            score
        })
        .sum()
}

fn color_matches(colors: &[String], liked_colors: &[String]) -> u32 {
    colors
        .iter()
        .filter(|color| liked_colors.contains(*color))
        .count() as u32
        * COLOR_MATCH_POINTS
}

/// Picks the best top/bottom pair for the user.
///
/// Without any feedback history the top and the bottom are drawn uniformly
/// and independently from `rng`. Otherwise every pair in the cross product is
/// scored with [`score_pair`] and the strictly highest score wins; ties go to
/// the first pair in iteration order (tops outer, bottoms inner), so results
/// are reproducible.
///
/// Cost grows as tops × bottoms × liked combinations. Wardrobes hold tens of
/// items, which keeps this well below a millisecond.
///
/// Returns `None` when either slot has no candidates.
pub fn score_and_select<'a, R: Rng + ?Sized>(
    tops: &[&'a ClothingItem],
    bottoms: &[&'a ClothingItem],
    profile: Option<&PreferenceProfile>,
    occasion: &str,
    rng: &mut R,
) -> Option<(&'a ClothingItem, &'a ClothingItem)> {
    let profile = match profile {
        Some(profile) if !profile.is_empty() => profile,
        _ => {
            let top = *tops.choose(rng)?;
            let bottom = *bottoms.choose(rng)?;
            tracing::debug!(occasion = %occasion, "No feedback history, picking a random pair");
            return Some((top, bottom));
        }
    };

    let mut best: Option<(&ClothingItem, &ClothingItem, u32)> = None;
    for &top in tops {
        for &bottom in bottoms {
            let score = score_pair(top, bottom, &profile.liked);
            if best.map_or(true, |(_, _, best_score)| score > best_score) {
                best = Some((top, bottom, score));
            }
        }
    }

    if let Some((top, bottom, score)) = best {
        tracing::debug!(
            occasion = %occasion,
            pairs = tops.len() * bottoms.len(),
            liked = profile.liked.len(),
            top_id = %top.id,
            bottom_id = %bottom.id,
            score,
            "Selected highest scoring pair"
        );
    }

    best.map(|(top, bottom, _)| (top, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewClothingItem, Style};
    use rand::{rngs::StdRng, SeedableRng};
    use uuid::Uuid;

    fn item(category: Category, style: Style, colors: &[&str]) -> ClothingItem {
        NewClothingItem {
            category: Some(category),
            style: Some(style),
            dominant_colors: colors.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
        .into_item(Uuid::new_v4())
    }

    fn liked(top_style: Style, bottom_style: Style, top: &[&str], bottom: &[&str]) -> Combination {
        Combination {
            top_style: Some(top_style),
            bottom_style: Some(bottom_style),
            top_colors: top.iter().map(|c| c.to_string()).collect(),
            bottom_colors: bottom.iter().map(|c| c.to_string()).collect(),
            occasion: Some("casual".to_string()),
        }
    }

    #[test]
    fn test_score_pair_style_and_colors() {
        let top = item(Category::Shirt, Style::Casual, &["#ffffff", "#ff0000"]);
        let bottom = item(Category::Jeans, Style::Casual, &["#000000"]);
        let combos = vec![liked(
            Style::Casual,
            Style::Casual,
            &["#ffffff", "#ff0000"],
            &["#000000"],
        )];

        // 2 for styles, 2 top colors, 1 bottom color
        assert_eq!(score_pair(&top, &bottom, &combos), 5);
    }

    #[test]
    fn test_score_pair_requires_both_styles() {
        let top = item(Category::Shirt, Style::Casual, &[]);
        let bottom = item(Category::Pants, Style::Formal, &[]);
        let combos = vec![liked(Style::Casual, Style::Casual, &[], &[])];

        assert_eq!(score_pair(&top, &bottom, &combos), 0);
    }

    #[test]
    fn test_score_pair_sums_over_combinations() {
        let top = item(Category::Shirt, Style::Sporty, &["#00ff00"]);
        let bottom = item(Category::Leggings, Style::Sporty, &[]);
        let combos = vec![
            liked(Style::Sporty, Style::Sporty, &[], &[]),
            liked(Style::Sporty, Style::Sporty, &["#00ff00"], &[]),
        ];

        assert_eq!(score_pair(&top, &bottom, &combos), 5);
    }

    #[test]
    fn test_disliked_combinations_do_not_penalize() {
        let top = item(Category::Shirt, Style::Casual, &["#ffffff"]);
        let bottom = item(Category::Jeans, Style::Casual, &["#000000"]);
        let profile = PreferenceProfile {
            liked: vec![],
            disliked: vec![liked(Style::Casual, Style::Casual, &["#ffffff"], &["#000000"])],
        };

        assert_eq!(score_pair(&top, &bottom, &profile.liked), 0);
    }

    #[test]
    fn test_liked_history_selects_matching_pair() {
        let formal_top = item(Category::Shirt, Style::Formal, &["#333333"]);
        let casual_top = item(Category::Shirt, Style::Casual, &["#ffffff"]);
        let formal_bottom = item(Category::Pants, Style::Formal, &["#222222"]);
        let casual_bottom = item(Category::Jeans, Style::Casual, &["#000000"]);
        let tops = vec![&formal_top, &casual_top];
        let bottoms = vec![&formal_bottom, &casual_bottom];
        let profile = PreferenceProfile {
            liked: vec![liked(Style::Casual, Style::Casual, &["#ffffff"], &["#000000"])],
            disliked: vec![],
        };

        let mut rng = StdRng::seed_from_u64(7);
        let (top, bottom) =
            score_and_select(&tops, &bottoms, Some(&profile), "casual", &mut rng).unwrap();

        assert_eq!(top.id, casual_top.id);
        assert_eq!(bottom.id, casual_bottom.id);
        assert!(
            score_pair(&casual_top, &casual_bottom, &profile.liked)
                > score_pair(&casual_top, &formal_bottom, &profile.liked)
        );
        assert!(
            score_pair(&casual_top, &casual_bottom, &profile.liked)
                > score_pair(&formal_top, &casual_bottom, &profile.liked)
        );
    }

    #[test]
    fn test_ties_go_to_first_pair() {
        let top_a = item(Category::Shirt, Style::Casual, &[]);
        let top_b = item(Category::Blouse, Style::Casual, &[]);
        let bottom_a = item(Category::Jeans, Style::Casual, &[]);
        let bottom_b = item(Category::Skirt, Style::Casual, &[]);
        let tops = vec![&top_a, &top_b];
        let bottoms = vec![&bottom_a, &bottom_b];
        // Every pair matches styles equally
        let profile = PreferenceProfile {
            liked: vec![liked(Style::Casual, Style::Casual, &[], &[])],
            disliked: vec![],
        };

        let mut rng = StdRng::seed_from_u64(1);
        let (top, bottom) =
            score_and_select(&tops, &bottoms, Some(&profile), "casual", &mut rng).unwrap();

        assert_eq!(top.id, top_a.id);
        assert_eq!(bottom.id, bottom_a.id);
    }

    #[test]
    fn test_dislike_only_history_picks_first_pair() {
        let top_a = item(Category::Shirt, Style::Casual, &[]);
        let top_b = item(Category::Hoodie, Style::Sporty, &[]);
        let bottom = item(Category::Jeans, Style::Casual, &[]);
        let tops = vec![&top_a, &top_b];
        let bottoms = vec![&bottom];
        let profile = PreferenceProfile {
            liked: vec![],
            disliked: vec![liked(Style::Casual, Style::Casual, &[], &[])],
        };

        let mut rng = StdRng::seed_from_u64(3);
        let (top, _) =
            score_and_select(&tops, &bottoms, Some(&profile), "casual", &mut rng).unwrap();

        assert_eq!(top.id, top_a.id);
    }

    #[test]
    fn test_random_selection_is_reproducible_with_seed() {
        let wardrobe: Vec<ClothingItem> = (0..5)
            .map(|_| item(Category::Shirt, Style::Casual, &[]))
            .chain((0..5).map(|_| item(Category::Jeans, Style::Casual, &[])))
            .collect();
        let tops: Vec<&ClothingItem> = wardrobe[..5].iter().collect();
        let bottoms: Vec<&ClothingItem> = wardrobe[5..].iter().collect();

        let first =
            score_and_select(&tops, &bottoms, None, "casual", &mut StdRng::seed_from_u64(42))
                .unwrap();
        let second = score_and_select(
            &tops,
            &bottoms,
            Some(&PreferenceProfile::default()),
            "casual",
            &mut StdRng::seed_from_u64(42),
        )
        .unwrap();

        assert_eq!(first.0.id, second.0.id);
        assert_eq!(first.1.id, second.1.id);
        assert!(tops.iter().any(|t| t.id == first.0.id));
        assert!(bottoms.iter().any(|b| b.id == first.1.id));
    }

    #[test]
    fn test_empty_slot_yields_none() {
        let top = item(Category::Shirt, Style::Casual, &[]);
        let tops = vec![&top];
        let mut rng = StdRng::seed_from_u64(0);

        assert!(score_and_select(&tops, &[], None, "casual", &mut rng).is_none());
        let profile = PreferenceProfile {
            liked: vec![liked(Style::Casual, Style::Casual, &[], &[])],
            disliked: vec![],
        };
        assert!(score_and_select(&tops, &[], Some(&profile), "casual", &mut rng).is_none());
    }

    #[test]
    fn test_adding_matching_like_never_lowers_pair_rank() {
        let top_a = item(Category::Shirt, Style::Casual, &["#ffffff"]);
        let top_b = item(Category::Blouse, Style::Formal, &["#111111"]);
        let bottom_a = item(Category::Jeans, Style::Casual, &["#000000"]);
        let bottom_b = item(Category::Pants, Style::Formal, &["#222222"]);
        let mut combos = vec![liked(Style::Formal, Style::Formal, &["#111111"], &["#222222"])];

        let before_target = score_pair(&top_a, &bottom_a, &combos);
        let before_other = score_pair(&top_b, &bottom_b, &combos);

        combos.push(liked(Style::Casual, Style::Casual, &["#ffffff"], &["#000000"]));

        let after_target = score_pair(&top_a, &bottom_a, &combos);
        let after_other = score_pair(&top_b, &bottom_b, &combos);

        assert!(after_target > before_target);
        assert_eq!(after_other, before_other);
    }
}
