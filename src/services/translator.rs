//! Translators turn one [`Translatable`] into one [`Translation`].
//!
//! [`ChatTranslator`] encodes the item as a small tag-based document (see
//! [`encode_request`]), sends it to a [`ModelClient`] together with a fixed
//! system instruction, and validates the structured answer. Downstream
//! proofreading tools rely on the exact request text, so the encoding must not
//! change.

use std::fmt::Write;

use async_trait::async_trait;

use crate::error::TranslationError;
use crate::model::translation::{Translatable, Translation};
use crate::services::ai::ModelClient;
use crate::services::ai_types::{ResponseSchema, TranslatedText};

pub const DEFAULT_TARGET_LANGUAGE: &str = "Chinese (Traditional, Taiwan)";

#[async_trait]
pub trait Translator: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Makes exactly one model call. Retrying is the caller's business.
    async fn translate(&self, translatable: &Translatable) -> Result<Translation, TranslationError>;
}

pub struct ChatTranslator<C> {
    client: C,
    name: String,
    system_prompt: String,
    schema: ResponseSchema,
}

impl<C: ModelClient> ChatTranslator<C> {
    pub fn new(client: C, name: impl Into<String>, target_language: &str) -> Self {
        Self {
            client,
            name: name.into(),
            system_prompt: system_prompt(target_language),
            schema: ResponseSchema::translated_text(),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

#[async_trait]
impl<C: ModelClient> Translator for ChatTranslator<C> {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(&self, translatable: &Translatable) -> Result<Translation, TranslationError> {
        let input = encode_request(translatable);

        let result = self
            .client
            .complete(&self.system_prompt, &input, &self.schema)
            .await
            .map_err(|cause| TranslationError::Request {
                source_text: translatable.source.clone(),
                cause,
            })
            .and_then(|content| parse_response(translatable, content));

        match result {
            Ok(tt) => {
                tracing::debug!(
                    translator = %self.name,
                    translation = %tt.translation,
                    confidence = tt.confidence,
                    "got response"
                );
                Ok(Translation::from_model(
                    translatable.source.clone(),
                    translatable.context.clone(),
                    tt.translation,
                    tt.confidence,
                ))
            }
            Err(err) => {
                tracing::error!(
                    translator = %self.name,
                    source = %translatable.source,
                    error = %err,
                    "failed to translate"
                );
                Err(err)
            }
        }
    }
}

fn parse_response(
    translatable: &Translatable,
    content: Option<String>,
) -> Result<TranslatedText, TranslationError> {
    let content = match content {
        Some(c) if !c.trim().is_empty() => c,
        _ => {
            return Err(TranslationError::EmptyResponse {
                source_text: translatable.source.clone(),
            })
        }
    };

    let invalid = |message: String| TranslationError::InvalidResponse {
        source_text: translatable.source.clone(),
        message,
    };

    let tt: TranslatedText = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

    if !(0.0..=1.0).contains(&tt.confidence) {
        return Err(invalid(format!("confidence {} is outside [0, 1]", tt.confidence)));
    }

    Ok(tt)
}

/// Encodes a translatable as the model's user input.
///
/// ```text
/// <source context="A greeting">Hello, world!</source>
/// <references>
///     <translation source="Hello, World!" fuzzy>哈囉，世界！</translation>
/// </references>
/// ```
///
/// Attributes are only written when present, reference lines are indented
/// with a single tab, and the `<references>` block is omitted when empty.
pub fn encode_request(translatable: &Translatable) -> String {
    let mut out = String::from("<source");
    if let Some(context) = &translatable.context {
        let _ = write!(out, " context=\"{context}\"");
    }
    let _ = writeln!(out, ">{}</source>", translatable.source);

    if !translatable.references.is_empty() {
        out.push_str("<references>\n");
        for reference in &translatable.references {
            let _ = write!(out, "\t<translation source=\"{}\"", reference.source);
            if let Some(context) = &reference.context {
                let _ = write!(out, " context=\"{context}\"");
            }
            if reference.fuzzy {
                out.push_str(" fuzzy");
            }
            let _ = writeln!(out, ">{}</translation>", reference.translation);
        }
        out.push_str("</references>\n");
    }

    out
}

/// The fixed instruction sent with every request.
pub fn system_prompt(target_language: &str) -> String {
    format!(
        r#"You are a professional software translator. Translate the following text to {target_language}. Use the words native speakers of {target_language} usually say. No explanation of your translation. You can reorder the arguments, but positional tags must be mapped (%s → %1$s); for example, `components %s of service %s is rejected` may become `service %2$s rejected component %1$s` in the target word order. Replace English quotes ("``", "''", '""', '“”') with the quotation marks customary in {target_language}. Preserve the format (quotes, prefix, suffix, etc.) and spacing in the translation.

I will give you an XML document, like:

```
<source context="{{context}}">{{source}}</source>
<references>
    <translation source="{{old-source}}" context="{{old-context}}" fuzzy>{{old-trans}}</translation>
</references>
```

Use "references" and "context" as guidance, translate the source, and return JSON according to the schema. "confidence" is your certainty in the translation, from 0 to 1."#
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ClientError;

    fn hello() -> Translatable {
        Translatable::new("Hello, world!", None)
    }

    fn reference(source: &str, translation: &str, fuzzy: bool) -> Translation {
        Translation::reference(source, None, translation, fuzzy)
    }

    #[test]
    fn source_only() {
        assert_eq!(encode_request(&hello()), "<source>Hello, world!</source>\n");
    }

    #[test]
    fn source_and_context() {
        let t = Translatable::new("Hello, world!", Some("A greeting".into()));
        assert_eq!(
            encode_request(&t),
            "<source context=\"A greeting\">Hello, world!</source>\n"
        );
    }

    #[test]
    fn context_with_single_reference() {
        let t = Translatable::new("Hello, world!", Some("A greeting".into()))
            .with_reference(reference("Hello, World!", "哈囉，世界！", false));
        assert_eq!(
            encode_request(&t),
            "<source context=\"A greeting\">Hello, world!</source>\n<references>\n\t<translation source=\"Hello, World!\">哈囉，世界！</translation>\n</references>\n"
        );
    }

    #[test]
    fn multiple_references_keep_order() {
        let t = hello()
            .with_reference(reference("Hello, World!", "哈囉，世界！", true))
            .with_reference(reference("Hi, World!", "你好，世界！", false));
        assert_eq!(
            encode_request(&t),
            "<source>Hello, world!</source>\n<references>\n\t<translation source=\"Hello, World!\" fuzzy>哈囉，世界！</translation>\n\t<translation source=\"Hi, World!\">你好，世界！</translation>\n</references>\n"
        );
    }

    #[test]
    fn reference_with_context_and_fuzzy() {
        let t = hello().with_reference(Translation::reference(
            "Hello, World!",
            Some("A greeting".into()),
            "哈囉，世界！",
            true,
        ));
        assert_eq!(
            encode_request(&t),
            "<source>Hello, world!</source>\n<references>\n\t<translation source=\"Hello, World!\" context=\"A greeting\" fuzzy>哈囉，世界！</translation>\n</references>\n"
        );
    }

    #[test]
    fn empty_reference_translation() {
        let t = hello().with_reference(reference("Hello", "", false));
        assert_eq!(
            encode_request(&t),
            "<source>Hello, world!</source>\n<references>\n\t<translation source=\"Hello\"></translation>\n</references>\n"
        );
    }

    #[test]
    fn prompt_names_the_target_language() {
        let prompt = system_prompt("Japanese");
        assert!(prompt.contains("Translate the following text to Japanese."));
        assert!(prompt.contains("<source context=\"{context}\">{source}</source>"));
    }

    /// Replays canned answers and records the inputs it was given.
    struct ScriptedClient {
        answer: Result<Option<String>, u16>,
        inputs: Mutex<Vec<String>>,
    }

    impl ScriptedClient {
        fn answering(content: Option<&str>) -> Self {
            Self {
                answer: Ok(content.map(str::to_string)),
                inputs: Mutex::new(Vec::new()),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                answer: Err(status),
                inputs: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedClient {
        async fn complete(
            &self,
            _system_prompt: &str,
            user_input: &str,
            schema: &ResponseSchema,
        ) -> Result<Option<String>, ClientError> {
            assert_eq!(schema.name, "translation");
            self.inputs.lock().unwrap().push(user_input.to_string());
            match &self.answer {
                Ok(content) => Ok(content.clone()),
                Err(status) => Err(ClientError::Status {
                    status: *status,
                    message: "boom".into(),
                }),
            }
        }
    }

    fn translator(client: ScriptedClient) -> ChatTranslator<ScriptedClient> {
        ChatTranslator::new(client, "test", DEFAULT_TARGET_LANGUAGE)
    }

    #[tokio::test]
    async fn builds_translation_from_response() {
        let t = translator(ScriptedClient::answering(Some(
            r#"{"translation":"哈囉，世界！","confidence":0.92}"#,
        )));
        let item = Translatable::new("Hello, world!", Some("A greeting".into()));

        let translation = t.translate(&item).await.expect("translates");

        assert_eq!(
            translation,
            Translation {
                source: "Hello, world!".into(),
                translation: "哈囉，世界！".into(),
                fuzzy: false,
                context: Some("A greeting".into()),
                confidence: Some(0.92),
            }
        );
        assert_eq!(
            t.client.inputs.lock().unwrap().as_slice(),
            ["<source context=\"A greeting\">Hello, world!</source>\n".to_string()]
        );
    }

    #[tokio::test]
    async fn fuzzy_follows_confidence() {
        for (confidence, fuzzy) in [("0.49", true), ("0.5", false), ("0", true), ("1", false)] {
            let body = format!(r#"{{"translation":"x","confidence":{confidence}}}"#);
            let t = translator(ScriptedClient::answering(Some(&body)));
            let translation = t.translate(&hello()).await.expect("translates");
            assert_eq!(translation.fuzzy, fuzzy, "confidence {confidence}");
        }
    }

    #[tokio::test]
    async fn empty_content_is_an_error() {
        for content in [None, Some(""), Some("  ")] {
            let t = translator(ScriptedClient::answering(content));
            let err = t.translate(&hello()).await.unwrap_err();
            assert!(matches!(err, TranslationError::EmptyResponse { .. }), "{err:?}");
            assert_eq!(err.source_text(), "Hello, world!");
        }
    }

    #[tokio::test]
    async fn malformed_content_is_an_error() {
        for content in [
            "not json",
            r#"{"translation":"x"}"#,
            r#"{"translation":"x","confidence":"high"}"#,
            r#"{"translation":"x","confidence":0.9,"notes":"extra"}"#,
            r#"{"translation":"x","confidence":1.5}"#,
            r#"{"translation":"x","confidence":-0.1}"#,
        ] {
            let t = translator(ScriptedClient::answering(Some(content)));
            let err = t.translate(&hello()).await.unwrap_err();
            assert!(matches!(err, TranslationError::InvalidResponse { .. }), "{content}: {err:?}");
        }
    }

    #[tokio::test]
    async fn client_failure_is_an_error() {
        let t = translator(ScriptedClient::failing(500));
        let err = t.translate(&hello()).await.unwrap_err();
        assert!(matches!(
            err,
            TranslationError::Request {
                cause: ClientError::Status { status: 500, .. },
                ..
            }
        ));
        assert_eq!(err.source_text(), "Hello, world!");
    }
}
