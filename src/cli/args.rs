//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::services::ai::DEFAULT_BASE_URL;
use crate::services::translator::DEFAULT_TARGET_LANGUAGE;

/// Translate the untranslated and fuzzy strings of a catalog with an LLM and
/// write them to CSV for proofreading.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// The input file to translate
    pub input: PathBuf,

    /// Where to write the translations (default: <INPUT>.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Catalog format, e.g. `po` (default: the input file extension)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Model used to translate, e.g. `gpt-4o` (default: gpt-4o)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Only translate 3 random strings
    #[arg(long)]
    pub test_mode: bool,

    /// Language named in the translation instructions
    #[arg(long, default_value = DEFAULT_TARGET_LANGUAGE)]
    pub target_language: String,

    /// API key for the model service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn definition_is_consistent() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn parses_all_flags() {
        let args = Arguments::try_parse_from([
            "sekai-po",
            "messages.po",
            "-o",
            "out.csv",
            "--format",
            "pot",
            "-m",
            "gpt-4o-mini",
            "--test-mode",
            "--target-language",
            "Japanese",
            "--api-key",
            "sk-test",
            "-v",
        ])
        .expect("arguments parse");

        assert_eq!(args.input, PathBuf::from("messages.po"));
        assert_eq!(args.output, Some(PathBuf::from("out.csv")));
        assert_eq!(args.format.as_deref(), Some("pot"));
        assert_eq!(args.model.as_deref(), Some("gpt-4o-mini"));
        assert!(args.test_mode);
        assert_eq!(args.target_language, "Japanese");
        assert_eq!(args.api_key.as_deref(), Some("sk-test"));
        assert!(args.verbose);
    }

    #[test]
    fn input_is_required() {
        assert!(Arguments::try_parse_from(["sekai-po"]).is_err());
    }
}
