//! Sequential, resumable batch summarisation over a dataset sample.

use tracing::{debug, info, instrument};

use crate::{
    data::{cache::SummaryCache, Record},
    error::StorageError,
    llm::{CompletionService, SummaryGenerator},
};

/// Lifecycle of a single article within a run.
///
/// Every article starts `Pending`. `Generating` is held while the completion
/// call is in flight, and every finished article ends in `CacheHit`, `Cached`
/// or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleState {
    Pending,
    CacheHit,
    Generating,
    Cached,
    Failed,
}

impl ArticleState {
    pub fn is_final(self) -> bool {
        matches!(self, Self::CacheHit | Self::Cached | Self::Failed)
    }

    /// Whether `self -> next` is an edge of the per-article state machine.
    pub fn can_advance_to(self, next: ArticleState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::CacheHit)
                | (Self::Pending, Self::Generating)
                | (Self::Generating, Self::Cached)
                | (Self::Generating, Self::Failed)
        )
    }

    fn advance(&mut self, index: usize, next: ArticleState) {
        debug_assert!(self.can_advance_to(next), "{self:?} -> {next:?}");
        debug!(index, from = ?*self, to = ?next, "article state");
        *self = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleOutcome {
    pub index: usize,
    pub state: ArticleState,
    pub summary: String,
}

/// Per-run results in dataset order.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub articles: Vec<ArticleOutcome>,
}

impl RunOutcome {
    /// Generated summaries, `summaries()[i]` belonging to input record `i`.
    pub fn summaries(&self) -> Vec<String> {
        self.articles.iter().map(|a| a.summary.clone()).collect()
    }

    pub fn count(&self, state: ArticleState) -> usize {
        self.articles.iter().filter(|a| a.state == state).count()
    }

    pub fn cache_hits(&self) -> usize {
        self.count(ArticleState::CacheHit)
    }

    pub fn generated(&self) -> usize {
        self.count(ArticleState::Cached)
    }

    pub fn failed(&self) -> usize {
        self.count(ArticleState::Failed)
    }
}

/// Consults the cache, generates on misses and persists after every miss.
pub struct BatchPipeline<C> {
    generator: SummaryGenerator<C>,
    cache: SummaryCache,
    retry_empty: bool,
}

impl<C: CompletionService> BatchPipeline<C> {
    pub fn new(generator: SummaryGenerator<C>, cache: SummaryCache) -> Self {
        Self {
            generator,
            cache,
            retry_empty: false,
        }
    }

    /// Treat cached empty summaries as misses.
    pub fn retry_empty(mut self, enabled: bool) -> Self {
        self.retry_empty = enabled;
        self
    }

    pub fn cache(&self) -> &SummaryCache {
        &self.cache
    }

    pub fn into_cache(self) -> SummaryCache {
        self.cache
    }

    /// Process `records` one at a time in order.
    ///
    /// Generation failures are recorded as empty summaries and processing
    /// continues. A cache write failure aborts the run.
    #[instrument(skip_all, fields(total = records.len()))]
    pub async fn run(&mut self, records: &[Record]) -> Result<RunOutcome, StorageError> {
        let total = records.len();
        let mut outcome = RunOutcome {
            articles: Vec::with_capacity(total),
        };

        for (index, record) in records.iter().enumerate() {
            let article = self.process(index, &record.article).await?;
            debug_assert!(article.state.is_final());
            let progress = format!(
                "[{}/{}] {:?} ({} chars)",
                index + 1,
                total,
                article.state,
                article.summary.len()
            );
            println!("{progress}");
            info!("{progress}");
            outcome.articles.push(article);
        }

        info!(
            hits = outcome.cache_hits(),
            generated = outcome.generated(),
            failed = outcome.failed(),
            "batch complete"
        );
        Ok(outcome)
    }

    async fn process(&mut self, index: usize, article: &str) -> Result<ArticleOutcome, StorageError> {
        let mut state = ArticleState::Pending;
        if let Some(summary) = self.cache.get(article) {
            if !(self.retry_empty && summary.is_empty()) {
                let summary = summary.to_string();
                state.advance(index, ArticleState::CacheHit);
                return Ok(ArticleOutcome {
                    index,
                    state,
                    summary,
                });
            }
        }

        state.advance(index, ArticleState::Generating);
        let generation = self.generator.generate(article).await;
        let next = if generation.is_failure() {
            ArticleState::Failed
        } else {
            ArticleState::Cached
        };
        let summary = generation.into_text();
        self.cache.insert_and_save(article, summary.clone())?;
        state.advance(index, next);

        Ok(ArticleOutcome {
            index,
            state,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ArticleState::*;

    #[test]
    fn only_terminal_states_are_final() {
        assert!(!Pending.is_final());
        assert!(!Generating.is_final());
        assert!(CacheHit.is_final() && Cached.is_final() && Failed.is_final());
    }

    #[test]
    fn state_machine_edges() {
        assert!(Pending.can_advance_to(CacheHit));
        assert!(Pending.can_advance_to(Generating));
        assert!(Generating.can_advance_to(Cached));
        assert!(Generating.can_advance_to(Failed));

        assert!(!Pending.can_advance_to(Cached));
        assert!(!CacheHit.can_advance_to(Generating));
        assert!(!Cached.can_advance_to(Failed));
        assert!(!Failed.can_advance_to(Pending));
    }
}
