//! Run settings resolved from the command line.

use std::path::{Path, PathBuf};

use crate::cli::Arguments;
use crate::services::registry::DEFAULT_MODEL;

/// Appended to the input path when no output path is given.
pub const OUTPUT_SUFFIX: &str = ".csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: String,
    pub model: String,
    pub test_mode: bool,
    pub target_language: String,
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Settings {
    /// Fills in defaults: output next to the input, format from the
    /// extension, the built-in model.
    pub fn resolve(args: Arguments) -> Self {
        let output = args
            .output
            .unwrap_or_else(|| default_output(&args.input));

        let format = match args.format {
            Some(f) => f,
            None => {
                let f = format_from_extension(&args.input);
                tracing::info!(format = %f, "no format specified; using the file extension");
                f
            }
        };

        let model = match args.model {
            Some(m) => m,
            None => {
                tracing::info!(model = DEFAULT_MODEL, "no model specified; using the default model");
                DEFAULT_MODEL.to_string()
            }
        };

        Self {
            input: args.input,
            output,
            format,
            model,
            test_mode: args.test_mode,
            target_language: args.target_language,
            api_key: args.api_key.filter(|k| !k.trim().is_empty()),
            base_url: args.base_url,
        }
    }
}

/// `<input>.csv`, keeping the original extension.
pub fn default_output(input: &Path) -> PathBuf {
    let mut s = input.as_os_str().to_os_string();
    s.push(OUTPUT_SUFFIX);
    PathBuf::from(s)
}

/// Extension without the dot; empty when there is none.
pub fn format_from_extension(input: &Path) -> String {
    input
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}
