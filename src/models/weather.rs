use serde::{Deserialize, Serialize};

/// Temperatures at or above this many degrees Celsius count as warm
pub const WARM_THRESHOLD_CELSIUS: f64 = 15.0;

/// Weather snapshot supplied with a recommendation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReading {
    /// Degrees Celsius
    #[serde(alias = "temp")]
    pub temperature: f64,
    #[serde(default = "default_condition", alias = "weather")]
    pub condition: String,
}

fn default_condition() -> String {
    "clear".to_string()
}

impl WeatherReading {
    pub fn new(temperature: f64, condition: impl Into<String>) -> Self {
        Self {
            temperature,
            condition: condition.into(),
        }
    }

    pub fn is_warm(&self) -> bool {
        self.temperature >= WARM_THRESHOLD_CELSIUS
    }

    /// "warm" or "cold", as used in explanation text
    pub fn temperature_label(&self) -> &'static str {
        if self.is_warm() {
            "warm"
        } else {
            "cold"
        }
    }
}

/// Current conditions as reported by the weather endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub condition: String,
    pub description: String,
    pub city: String,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl CurrentWeather {
    /// Reading served when no upstream provider is available
    pub fn development(city: &str) -> Self {
        Self {
            temperature: 18.0,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            city: city.to_string(),
            humidity: Some(60.0),
            wind_speed: Some(5.5),
        }
    }
}

impl From<&CurrentWeather> for WeatherReading {
    fn from(current: &CurrentWeather) -> Self {
        WeatherReading::new(current.temperature, current.condition.clone())
    }
}

// ============================================================================
// OpenWeatherMap API Types
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherResponse {
    pub name: String,
    pub main: OpenWeatherMain,
    #[serde(default)]
    pub weather: Vec<OpenWeatherCondition>,
    #[serde(default)]
    pub wind: Option<OpenWeatherWind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherMain {
    pub temp: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherCondition {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenWeatherWind {
    pub speed: f64,
}

impl From<OpenWeatherResponse> for CurrentWeather {
    fn from(response: OpenWeatherResponse) -> Self {
        let (condition, description) = response
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_else(|| ("Clear".to_string(), String::new()));

        CurrentWeather {
            temperature: response.main.temp,
            condition,
            description,
            city: response.name,
            humidity: response.main.humidity,
            wind_speed: response.wind.map(|w| w.speed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_threshold_is_inclusive() {
        assert!(WeatherReading::new(15.0, "Clear").is_warm());
        assert!(!WeatherReading::new(14.9, "Clear").is_warm());
        assert_eq!(WeatherReading::new(-3.0, "Snow").temperature_label(), "cold");
    }

    #[test]
    fn test_reading_accepts_aliases() {
        let reading: WeatherReading = serde_json::from_str(r#"{"temp": 21.5}"#).unwrap();
        assert_eq!(reading.temperature, 21.5);
        assert_eq!(reading.condition, "clear");
    }

    #[test]
    fn test_openweather_response_conversion() {
        let json = r#"{
            "name": "Sofia",
            "main": {"temp": 12.3, "humidity": 71},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "wind": {"speed": 3.1}
        }"#;

        let response: OpenWeatherResponse = serde_json::from_str(json).unwrap();
        let current = CurrentWeather::from(response);

        assert_eq!(current.city, "Sofia");
        assert_eq!(current.temperature, 12.3);
        assert_eq!(current.condition, "Rain");
        assert_eq!(current.description, "light rain");
        assert_eq!(current.humidity, Some(71.0));
        assert_eq!(current.wind_speed, Some(3.1));
    }
}
