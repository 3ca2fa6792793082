mod clothing;
mod feedback;
mod outfit;
mod weather;

pub use clothing::{
    Category, ClothingItem, NewClothingItem, OutfitPart, Style, UnknownLabel,
    WeatherSuitability, MAX_DOMINANT_COLORS,
};
pub use feedback::{
    Combination, FeedbackEvent, FeedbackRecord, PreferenceProfile, Reaction, TrainingSignal,
};
pub use outfit::{Outfit, OutfitDetails, Recommendation, SavedOutfit, Selection};
pub use weather::{CurrentWeather, OpenWeatherResponse, WeatherReading, WARM_THRESHOLD_CELSIUS};
