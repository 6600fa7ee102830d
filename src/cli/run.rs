use std::path::PathBuf;

use crate::config::Settings;
use crate::error::RunError;
use crate::model::translation::Translatable;
use crate::services::csv_writer;
use crate::services::pipeline::{self, PipelineConfig, TEST_MODE_SAMPLE_SIZE};
use crate::services::registry::{ExtractorRegistry, TranslatorRegistry};

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub translated: usize,
    pub failed: usize,
    pub output: PathBuf,
}

/// Extract, translate, write.
pub async fn run(
    settings: &Settings,
    extractors: &ExtractorRegistry,
    translators: &TranslatorRegistry,
) -> Result<RunSummary, RunError> {
    if !settings.input.exists() {
        return Err(RunError::InputNotFound(settings.input.clone()));
    }

    let extractor = extractors.lookup(&settings.format)?;
    tracing::info!(extractor = extractor.name(), "using extractor");

    let translatables = extractor.extract(&settings.input)?;

    let items: Box<dyn Iterator<Item = Translatable> + Send> = if settings.test_mode {
        tracing::warn!(
            count = TEST_MODE_SAMPLE_SIZE,
            "test mode is enabled; only translating a few strings"
        );
        let picked = pipeline::sample(translatables, TEST_MODE_SAMPLE_SIZE, &mut rand::thread_rng());
        Box::new(picked.into_iter())
    } else {
        translatables
    };

    let translator = translators.lookup(&settings.model)?;
    tracing::info!(translator = translator.name(), "using translator");

    let report = pipeline::run(translator, items, PipelineConfig::default()).await;

    csv_writer::write(&settings.output, &report.translations)?;

    Ok(RunSummary {
        translated: report.succeeded(),
        failed: report.failed,
        output: settings.output.clone(),
    })
}
