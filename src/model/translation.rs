/// Confidence below this marks a model translation as fuzzy.
pub const FUZZY_THRESHOLD: f64 = 0.5;

/// A finished or historical translation.
#[derive(Debug, Clone, PartialEq)]
pub struct Translation {
    pub source: String,
    pub translation: String,
    pub fuzzy: bool,
    pub context: Option<String>,

    /// Only set on model output, in `[0.0, 1.0]`.
    pub confidence: Option<f64>,
}

impl Translation {
    /// A catalog-derived hint. Carries no confidence.
    pub fn reference(
        source: impl Into<String>,
        context: Option<String>,
        translation: impl Into<String>,
        fuzzy: bool,
    ) -> Self {
        Self {
            source: source.into(),
            translation: translation.into(),
            fuzzy,
            context,
            confidence: None,
        }
    }

    /// Model output; `fuzzy` follows from the confidence.
    pub fn from_model(
        source: impl Into<String>,
        context: Option<String>,
        translation: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            source: source.into(),
            translation: translation.into(),
            fuzzy: confidence < FUZZY_THRESHOLD,
            context,
            confidence: Some(confidence),
        }
    }
}

/// A string that still needs translating.
#[derive(Debug, Clone, PartialEq)]
pub struct Translatable {
    pub source: String,
    pub context: Option<String>,

    /// Hints for the translator, most relevant first.
    pub references: Vec<Translation>,
}

impl Translatable {
    pub fn new(source: impl Into<String>, context: Option<String>) -> Self {
        Self {
            source: source.into(),
            context,
            references: Vec::new(),
        }
    }

    pub fn with_reference(mut self, reference: Translation) -> Self {
        self.references.push(reference);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_translation_is_fuzzy_below_half() {
        for (confidence, fuzzy) in [(0.0, true), (0.49, true), (0.5, false), (0.51, false), (1.0, false)] {
            let t = Translation::from_model("Save", None, "儲存", confidence);
            assert_eq!(t.fuzzy, fuzzy, "confidence {confidence}");
            assert_eq!(t.confidence, Some(confidence));
        }
    }

    #[test]
    fn reference_has_no_confidence() {
        let r = Translation::reference("Save", Some("menu".into()), "", true);
        assert_eq!(r.confidence, None);
        assert!(r.fuzzy);
        assert_eq!(r.context.as_deref(), Some("menu"));
    }
}
