//! Bounded-concurrency fan-out of translate calls.
//!
//! Every item runs as its own task. A shared semaphore admits at most
//! [`MAX_CONCURRENT_TRANSLATIONS`] calls at a time. A failing item is logged
//! and dropped; it never aborts the batch.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::model::translation::{Translatable, Translation};
use crate::services::translator::Translator;

/// Cap on in-flight model calls, to stay inside provider rate limits.
pub const MAX_CONCURRENT_TRANSLATIONS: usize = 16;

/// How many items test mode translates.
pub const TEST_MODE_SAMPLE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub max_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: MAX_CONCURRENT_TRANSLATIONS,
        }
    }
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    /// Successful translations, in completion order.
    pub translations: Vec<Translation>,
    pub failed: usize,
}

impl PipelineReport {
    pub fn succeeded(&self) -> usize {
        self.translations.len()
    }
}

/// Translates every item and waits for all of them.
pub async fn run<I>(translator: Arc<dyn Translator>, items: I, cfg: PipelineConfig) -> PipelineReport
where
    I: IntoIterator<Item = Translatable>,
{
    let semaphore = Arc::new(Semaphore::new(cfg.max_concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for translatable in items {
        let translator = Arc::clone(&translator);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            // Held until the task ends, on success and failure alike.
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(err) => {
                    tracing::error!(source = %translatable.source, error = %err, "no translation slot");
                    return None;
                }
            };

            tracing::info!(source = %translatable.source, "translating");

            match translator.translate(&translatable).await {
                Ok(translation) => {
                    tracing::info!(
                        source = %translation.source,
                        translation = %translation.translation,
                        fuzzy = translation.fuzzy,
                        "translated"
                    );
                    Some(translation)
                }
                Err(err) => {
                    tracing::error!(source = %translatable.source, error = %err, "failed to translate");
                    None
                }
            }
        });
    }

    let mut report = PipelineReport::default();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some(translation)) => report.translations.push(translation),
            Ok(None) => report.failed += 1,
            Err(err) => {
                tracing::error!(error = %err, "translation task panicked");
                report.failed += 1;
            }
        }
    }

    if report.failed > 0 {
        tracing::warn!(
            succeeded = report.succeeded(),
            failed = report.failed,
            "some strings could not be translated and were dropped"
        );
    } else {
        tracing::info!(succeeded = report.succeeded(), "translated all strings");
    }

    report
}

/// Picks up to `k` distinct items at random. The whole sequence is
/// collected first.
pub fn sample<I, R>(items: I, k: usize, rng: &mut R) -> Vec<Translatable>
where
    I: IntoIterator<Item = Translatable>,
    R: Rng + ?Sized,
{
    let all: Vec<Translatable> = items.into_iter().collect();
    all.choose_multiple(rng, k).cloned().collect()
}
