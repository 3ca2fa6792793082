use crate::models::{ClothingItem, Style, WeatherReading, WeatherSuitability};

/// Styles acceptable for an occasion. Unknown occasions default to casual.
pub fn styles_for_occasion(occasion: &str) -> &'static [Style] {
    match occasion.trim().to_lowercase().as_str() {
        "gym" => &[Style::Sporty],
        "friends" => &[Style::Casual, Style::Sporty],
        "formal" => &[Style::Formal],
        "casual" => &[Style::Casual, Style::Sporty],
        "work" => &[Style::Formal, Style::Casual],
        _ => &[Style::Casual],
    }
}

/// Tops and bottoms eligible for pairing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidates<'a> {
    pub tops: Vec<&'a ClothingItem>,
    pub bottoms: Vec<&'a ClothingItem>,
}

impl Candidates<'_> {
    pub fn is_pairable(&self) -> bool {
        !self.tops.is_empty() && !self.bottoms.is_empty()
    }
}

/// Keeps items suited to the temperature. Never returns an empty set for a
/// non-empty input: when nothing fits, the input is returned unchanged.
pub fn filter_by_weather<'a>(
    items: &[&'a ClothingItem],
    weather: &WeatherReading,
) -> Vec<&'a ClothingItem> {
    let is_warm = weather.is_warm();
    let suitable: Vec<&ClothingItem> = items
        .iter()
        .copied()
        .filter(|item| match item.weather_suitability {
            WeatherSuitability::Warm => is_warm,
            WeatherSuitability::Cold => !is_warm,
            WeatherSuitability::Unspecified => true,
        })
        .collect();

    if suitable.is_empty() {
        tracing::debug!(temperature = weather.temperature, "Weather filter matched nothing, keeping all items");
        items.to_vec()
    } else {
        suitable
    }
}

/// Keeps items whose style fits the occasion, with the same fallback as
/// [`filter_by_weather`].
pub fn filter_by_occasion<'a>(items: &[&'a ClothingItem], occasion: &str) -> Vec<&'a ClothingItem> {
    let styles = styles_for_occasion(occasion);
    let suitable: Vec<&ClothingItem> = items
        .iter()
        .copied()
        .filter(|item| styles.contains(&item.style))
        .collect();

    if suitable.is_empty() {
        tracing::debug!(occasion = %occasion, "Occasion filter matched nothing, keeping all items");
        items.to_vec()
    } else {
        suitable
    }
}

/// Applies the weather pass then the occasion pass to the whole wardrobe
pub fn filter<'a>(
    items: &'a [ClothingItem],
    occasion: &str,
    weather: &WeatherReading,
) -> Vec<&'a ClothingItem> {
    let all: Vec<&ClothingItem> = items.iter().collect();
    let weather_suitable = filter_by_weather(&all, weather);
    filter_by_occasion(&weather_suitable, occasion)
}

/// Splits the filtered wardrobe into tops and bottoms.
///
/// A slot left empty by filtering is refilled from the entire unfiltered
/// wardrobe before giving up on it.
pub fn candidates<'a>(
    wardrobe: &'a [ClothingItem],
    occasion: &str,
    weather: &WeatherReading,
) -> Candidates<'a> {
    let filtered = filter(wardrobe, occasion, weather);

    // Split by slot; an item may land in both
    let mut tops: Vec<&ClothingItem> = filtered.iter().copied().filter(|i| i.fits_top()).collect();
    let mut bottoms: Vec<&ClothingItem> = filtered
        .iter()
        .copied()
        .filter(|i| i.fits_bottom())
        .collect();

    // Refill an empty slot from the unfiltered wardrobe
    if tops.is_empty() {
        tops = wardrobe.iter().filter(|i| i.fits_top()).collect();
    }
    if bottoms.is_empty() {
        bottoms = wardrobe.iter().filter(|i| i.fits_bottom()).collect();
    }

    tracing::debug!(
        wardrobe = wardrobe.len(),
        filtered = filtered.len(),
        tops = tops.len(),
        bottoms = bottoms.len(),
        "Candidates selected"
    );

    Candidates { tops, bottoms }
}
