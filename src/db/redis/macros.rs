/// Read-through caching around an async lookup.
///
/// Evaluates to `Ok(value)`: the cached value on a hit, otherwise the result of
/// awaiting `$fetch`, which is then queued for storage with the given TTL (seconds).
/// A failed cache read is logged and treated as a miss. Errors from `$fetch`
/// propagate with `?`, so the enclosing function must return `AppResult`.
///
/// # Example
/// ```rust,ignore
/// let slug: Option<String> = cached!(cache, CacheKey::SlugSearch(title.to_string()), 3600,
///     self.search_slug(title))?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $fetch:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Cache read failed, bypassing cache");
                None
            }
        };

        match hit {
            Some(value) => Ok(value),
            None => {
                let value = $fetch.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
