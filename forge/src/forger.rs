use std::fmt;
use std::sync::Arc;

use gsf_core::TextGenerator;
use tracing::{debug, error, info, warn};

use crate::cache::{CacheScope, NoteCacheRef};
use crate::prompt::build_prompt;

/// Model used for every note request
pub const NOTES_MODEL: &str = "gemini-2.5-flash";

/// Sampling temperature used for every note request
pub const NOTES_TEMPERATURE: f32 = 0.7;

/// Prefix of the text shown when generation fails
pub const ERROR_PREFIX: &str = "An error occurred while generating notes:";

/// Outcome of forging one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Forged {
    /// Markdown returned by the model, unmodified
    Notes(String),
    /// Description of why generation failed
    Failed(String),
}

impl Forged {
    pub fn is_failure(&self) -> bool {
        matches!(self, Forged::Failed(_))
    }

    /// Text to render for this outcome
    pub fn display_text(&self) -> String {
        match self {
            Forged::Notes(markdown) => markdown.clone(),
            Forged::Failed(reason) => format!("{} {}", ERROR_PREFIX, reason),
        }
    }
}

impl fmt::Display for Forged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

/// Whether an outcome was served from the note cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// A forged outcome and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgeReport {
    pub outcome: Forged,
    pub cache: CacheStatus,
}

/// Turns raw text into study notes, memoizing by exact input
pub struct NoteForger {
    generator: Arc<dyn TextGenerator>,
    cache: NoteCacheRef,
    scope: CacheScope,
}

impl NoteForger {
    pub fn new(generator: Arc<dyn TextGenerator>, cache: NoteCacheRef, scope: CacheScope) -> Self {
        Self {
            generator,
            cache,
            scope,
        }
    }

    pub fn scope(&self) -> CacheScope {
        self.scope
    }

    pub fn cache(&self) -> &NoteCacheRef {
        &self.cache
    }

    /// Forge notes for `raw_content` submitted from `session`.
    ///
    /// Calls the generator at most once per cache key. Failures are folded
    /// into [`Forged::Failed`] and cached like any other outcome.
    pub async fn forge(&self, session: Option<&str>, raw_content: &str) -> ForgeReport {
        let key = self.scope.key(session, raw_content);

        match self.cache.get(&key).await {
            Ok(Some(outcome)) => {
                debug!(input_len = raw_content.len(), "Serving notes from cache");
                return ForgeReport {
                    outcome,
                    cache: CacheStatus::Hit,
                };
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Note cache lookup failed, treating as a miss"),
        }

        let prompt = build_prompt(raw_content);
        info!(
            input_len = raw_content.len(),
            prompt_len = prompt.len(),
            model = NOTES_MODEL,
            "Forging notes"
        );

        let outcome = match self
            .generator
            .generate(NOTES_MODEL, &prompt, NOTES_TEMPERATURE)
            .await
        {
            Ok(markdown) => Forged::Notes(markdown),
            Err(e) => {
                error!(error = %e, "Note generation failed");
                Forged::Failed(e.to_string())
            }
        };

        if let Err(e) = self.cache.put(key, outcome.clone()).await {
            warn!(error = %e, "Failed to store forged notes");
        }

        ForgeReport {
            outcome,
            cache: CacheStatus::Miss,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheKey, InMemoryNoteCache, NoteCache};
    use async_trait::async_trait;
    use gsf_core::{GeminiError, GeminiResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Generator double that counts calls and records what it was asked
    #[derive(Default)]
    pub(crate) struct RecordingGenerator {
        pub calls: AtomicUsize,
        pub prompts: Mutex<Vec<(String, String, f32)>>,
        pub fail_with: Option<String>,
    }

    impl RecordingGenerator {
        pub fn failing(message: &str) -> Self {
            Self {
                fail_with: Some(message.to_string()),
                ..Default::default()
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, model: &str, prompt: &str, temperature: f32) -> GeminiResult<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts
                .lock()
                .unwrap()
                .push((model.to_string(), prompt.to_string(), temperature));

            match &self.fail_with {
                Some(message) => Err(GeminiError::ResponseError(message.clone())),
                None => Ok(format!("**Notes #{n}**")),
            }
        }
    }

    #[derive(Debug)]
    struct BrokenCache;

    #[async_trait]
    impl NoteCache for BrokenCache {
        async fn get(&self, _key: &CacheKey) -> Result<Option<Forged>, CacheError> {
            Err(CacheError::Storage("poisoned".to_string()))
        }
        async fn put(&self, _key: CacheKey, _value: Forged) -> Result<(), CacheError> {
            Err(CacheError::Storage("poisoned".to_string()))
        }
        async fn len(&self) -> Result<usize, CacheError> {
            Err(CacheError::Storage("poisoned".to_string()))
        }
        async fn clear(&self) -> Result<(), CacheError> {
            Ok(())
        }
    }

    fn forger(generator: Arc<RecordingGenerator>, scope: CacheScope) -> NoteForger {
        NoteForger::new(generator, Arc::new(InMemoryNoteCache::new()), scope)
    }

    #[tokio::test]
    async fn test_forge_calls_generator_with_fixed_model_and_temperature() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = forger(generator.clone(), CacheScope::Process);
        let input = "a".repeat(60);

        let report = forger.forge(None, &input).await;

        assert_eq!(report.outcome, Forged::Notes("**Notes #1**".to_string()));
        assert_eq!(report.cache, CacheStatus::Miss);

        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let (model, prompt, temperature) = &prompts[0];
        assert_eq!(model, NOTES_MODEL);
        assert_eq!(*temperature, NOTES_TEMPERATURE);
        assert!(prompt.contains(&input));
        assert!(prompt.contains("Vibe Check Summary"));
    }

    #[tokio::test]
    async fn test_identical_input_is_served_from_cache() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = forger(generator.clone(), CacheScope::Process);
        let input = "The mitochondria is the powerhouse of the cell, and more.";

        let first = forger.forge(None, input).await;
        let second = forger.forge(None, input).await;

        assert_eq!(generator.call_count(), 1);
        assert_eq!(second.cache, CacheStatus::Hit);
        assert_eq!(first.outcome, second.outcome);
    }

    #[tokio::test]
    async fn test_distinct_inputs_get_distinct_results() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = forger(generator.clone(), CacheScope::Process);

        let one = forger.forge(None, "first lecture").await;
        let two = forger.forge(None, "second lecture").await;

        assert_eq!(generator.call_count(), 2);
        assert_ne!(one.outcome, two.outcome);
    }

    #[tokio::test]
    async fn test_failure_is_discriminated_and_prefixed() {
        let generator = Arc::new(RecordingGenerator::failing("connection reset"));
        let forger = forger(generator.clone(), CacheScope::Process);

        let report = forger.forge(None, "some text").await;

        assert!(report.outcome.is_failure());
        let text = report.outcome.display_text();
        assert!(text.starts_with(ERROR_PREFIX));
        assert!(text.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_failures_are_memoized() {
        let generator = Arc::new(RecordingGenerator::failing("quota"));
        let forger = forger(generator.clone(), CacheScope::Process);

        forger.forge(None, "same text").await;
        let again = forger.forge(None, "same text").await;

        assert_eq!(generator.call_count(), 1);
        assert_eq!(again.cache, CacheStatus::Hit);
        assert!(again.outcome.is_failure());
    }

    #[tokio::test]
    async fn test_process_scope_shares_across_sessions() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = forger(generator.clone(), CacheScope::Process);

        forger.forge(Some("alice"), "shared text").await;
        let bob = forger.forge(Some("bob"), "shared text").await;

        assert_eq!(generator.call_count(), 1);
        assert_eq!(bob.cache, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_session_scope_isolates_sessions() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = forger(generator.clone(), CacheScope::Session);

        forger.forge(Some("alice"), "shared text").await;
        let bob = forger.forge(Some("bob"), "shared text").await;
        let alice_again = forger.forge(Some("alice"), "shared text").await;

        assert_eq!(generator.call_count(), 2);
        assert_eq!(bob.cache, CacheStatus::Miss);
        assert_eq!(alice_again.cache, CacheStatus::Hit);
    }

    #[tokio::test]
    async fn test_broken_cache_still_forges() {
        let generator = Arc::new(RecordingGenerator::default());
        let forger = NoteForger::new(generator.clone(), Arc::new(BrokenCache), CacheScope::Process);

        let report = forger.forge(None, "text").await;

        assert_eq!(report.outcome, Forged::Notes("**Notes #1**".to_string()));
        assert_eq!(report.cache, CacheStatus::Miss);
        assert_eq!(generator.call_count(), 1);
    }
}
