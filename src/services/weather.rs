use reqwest::Client as HttpClient;
use std::time::Duration;

use crate::{
    cached,
    config::Config,
    db::{redis::WEATHER_TTL_SECS, Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CurrentWeather, OpenWeatherResponse},
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Current conditions for the configured city from OpenWeatherMap.
///
/// Never fails: without an API key, or when the upstream call fails, a fixed
/// development reading is returned instead.
#[derive(Clone)]
pub struct WeatherService {
    http_client: HttpClient,
    cache: Option<Cache>,
    api_key: Option<String>,
    api_url: String,
    city: String,
}

impl WeatherService {
    pub fn new(
        cache: Option<Cache>,
        api_key: Option<String>,
        api_url: String,
        city: String,
    ) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            cache,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            api_url: api_url.trim_end_matches('/').to_string(),
            city,
        })
    }

    pub fn from_config(config: &Config, cache: Option<Cache>) -> anyhow::Result<Self> {
        Self::new(
            cache,
            config.openweather_api_key.clone(),
            config.openweather_url.clone(),
            config.openweather_city.clone(),
        )
    }

    pub async fn current(&self) -> CurrentWeather {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::debug!(city = %self.city, "No OpenWeather API key, using development weather");
            return CurrentWeather::development(&self.city);
        };

        match self.lookup(api_key).await {
            Ok(weather) => weather,
            Err(e) => {
                tracing::error!(error = %e, city = %self.city, "Weather lookup failed, using development weather");
                CurrentWeather::development(&self.city)
            }
        }
    }

    async fn lookup(&self, api_key: &str) -> AppResult<CurrentWeather> {
        match &self.cache {
            Some(cache) => cached!(
                cache,
                CacheKey::Weather(self.city.clone()),
                WEATHER_TTL_SECS,
                self.fetch(api_key)
            ),
            None => self.fetch(api_key).await,
        }
    }

    async fn fetch(&self, api_key: &str) -> AppResult<CurrentWeather> {
        let url = format!("{}/data/2.5/weather", self.api_url);

        // Metric units, so temperatures arrive in Celsius
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("q", self.city.as_str()),
                ("appid", api_key),
                ("units", "metric"),
            ])
            .send()
            .await?;

        // Keep the upstream body for the error message
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OpenWeather API returned status {}: {}",
                status, body
            )));
        }

        // Only the first condition entry is used
        let body: OpenWeatherResponse = response.json().await?;
        let weather = CurrentWeather::from(body);

        tracing::info!(
            city = %weather.city,
            temperature = weather.temperature,
            condition = %weather.condition,
            "Fetched current weather"
        );

        Ok(weather)
    }
}
