use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{CompletionConfig, Recommendation},
    services::providers::{GameSearch, TextOracle},
};

/// Builds the few-shot prompt asking for one game similar to `slug`
pub fn build_prompt(slug: &str) -> String {
    format!(
        "find a game that is similar, dont use roman numerals\n\
         input: Left 4 Dead\n\
         output: Hunt: Showdown\n\
         input: Path of Exile\n\
         output: Diablo 3\n\
         input: {}\n\
         output:",
        slug
    )
}

/// Suggests a similar game for a free-text title
///
/// The title is first resolved to a catalog slug; only a resolved slug is sent
/// to the oracle. The oracle's first candidate is returned verbatim.
pub struct RecommendationService {
    search: Arc<dyn GameSearch>,
    oracle: Arc<dyn TextOracle>,
    config: CompletionConfig,
}

impl RecommendationService {
    pub fn new(search: Arc<dyn GameSearch>, oracle: Arc<dyn TextOracle>) -> Self {
        Self {
            search,
            oracle,
            config: CompletionConfig::default(),
        }
    }

    pub async fn recommend(&self, title: &str) -> AppResult<Recommendation> {
        let slug = self
            .search
            .resolve_slug(title)
            .await
            .inspect_err(|e| tracing::error!(title = %title, error = %e, "Slug lookup failed"))?
            .ok_or_else(|| AppError::NotFound("Game not found".to_string()))?;

        let prompt = build_prompt(&slug);
        let output = self
            .oracle
            .complete(&prompt, &self.config)
            .await
            .inspect_err(|e| tracing::error!(slug = %slug, error = %e, "Oracle call failed"))?
            .into_iter()
            .next();

        if output.is_none() {
            tracing::info!(slug = %slug, "Oracle returned no candidates");
        }

        Ok(Recommendation {
            title: title.to_string(),
            slug: Some(slug),
            output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::{MockGameSearch, MockTextOracle};

    fn service(search: MockGameSearch, oracle: MockTextOracle) -> RecommendationService {
        RecommendationService::new(Arc::new(search), Arc::new(oracle))
    }

    #[test]
    fn test_prompt_embeds_slug_last() {
        let prompt = build_prompt("deep-rock-galactic");
        assert!(prompt.starts_with("find a game that is similar, dont use roman numerals\n"));
        assert!(prompt.contains("input: Left 4 Dead\noutput: Hunt: Showdown\n"));
        assert!(prompt.ends_with("input: deep-rock-galactic\noutput:"));
    }

    #[tokio::test]
    async fn test_no_match_skips_oracle() {
        let mut search = MockGameSearch::new();
        search.expect_resolve_slug().times(1).returning(|_| Ok(None));
        let mut oracle = MockTextOracle::new();
        oracle.expect_complete().times(0);

        let result = service(search, oracle).recommend("zzzz").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_returns_first_candidate_verbatim() {
        let mut search = MockGameSearch::new();
        search
            .expect_resolve_slug()
            .returning(|_| Ok(Some("left-4-dead-2".to_string())));
        let mut oracle = MockTextOracle::new();
        oracle
            .expect_complete()
            .withf(|prompt, config| {
                prompt.ends_with("input: left-4-dead-2\noutput:") && config.temperature == 0.7
            })
            .times(1)
            .returning(|_, _| Ok(vec![" Back 4 Blood".to_string(), "Vermintide".to_string()]));

        let rec = service(search, oracle).recommend("left 4 dead").await.unwrap();
        assert_eq!(rec.title, "left 4 dead");
        assert_eq!(rec.slug.as_deref(), Some("left-4-dead-2"));
        assert_eq!(rec.output.as_deref(), Some(" Back 4 Blood"));
    }

    #[tokio::test]
    async fn test_no_candidates_is_not_an_error() {
        let mut search = MockGameSearch::new();
        search
            .expect_resolve_slug()
            .returning(|_| Ok(Some("portal-2".to_string())));
        let mut oracle = MockTextOracle::new();
        oracle.expect_complete().returning(|_, _| Ok(Vec::new()));

        let rec = service(search, oracle).recommend("portal 2").await.unwrap();
        assert_eq!(rec.slug.as_deref(), Some("portal-2"));
        assert_eq!(rec.output, None);
    }

    #[tokio::test]
    async fn test_search_error_propagates() {
        let mut search = MockGameSearch::new();
        search
            .expect_resolve_slug()
            .returning(|_| Err(AppError::ExternalApi("status 502".to_string())));
        let mut oracle = MockTextOracle::new();
        oracle.expect_complete().times(0);

        let result = service(search, oracle).recommend("portal").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }

    #[tokio::test]
    async fn test_oracle_error_propagates() {
        let mut search = MockGameSearch::new();
        search
            .expect_resolve_slug()
            .returning(|_| Ok(Some("portal-2".to_string())));
        let mut oracle = MockTextOracle::new();
        oracle
            .expect_complete()
            .returning(|_, _| Err(AppError::ExternalApi("quota exceeded".to_string())));

        let result = service(search, oracle).recommend("portal").await;
        assert!(matches!(result, Err(AppError::ExternalApi(_))));
    }
}
