/// Read-through caching over [`Cache`](crate::db::redis::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues the result for writing with `$ttl` seconds, and returns
/// it. A failed cache read is logged and treated as a miss, so an unreachable
/// Redis never hides fresh data. Errors from `$block` propagate with `?`, so
/// the enclosing function must return an `AppResult`.
///
/// ```rust,ignore
/// let weather: CurrentWeather = cached!(cache, CacheKey::Weather(city), WEATHER_TTL_SECS, async {
///     fetch_current_weather(&city).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Ok(Some(cached)) => Ok(cached),
            read => {
                if let Err(e) = read {
                    ::tracing::warn!(error = %e, key = %key, "Cache read failed, treating as a miss");
                }
                // Compute, then store without waiting on Redis
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
