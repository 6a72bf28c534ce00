//! Modifier Registry

use crate::loader::{LoadError, LoadOutcome, LoadReport, ModifierSource, SkippedModule};
use crate::{ModifierMeta, ModifierPlugin};
use quill_core::{codes, Args, QuillError};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Error type for registry operations
#[derive(Debug, Clone, Error)]
pub enum ModifierError {
    #[error("Modifier '{name}' has no id")]
    InvalidDescriptor { name: String },

    #[error("Modifier \"{id}\" not registered")]
    UnknownModifier { id: String, similar: Vec<String> },

    #[error("Modifier \"{id}\" failed: {cause}")]
    ModifierExecutionFailed {
        id: String,
        #[source]
        cause: QuillError,
    },
}

impl From<ModifierError> for QuillError {
    fn from(err: ModifierError) -> Self {
        match err {
            ModifierError::InvalidDescriptor { .. } => {
                QuillError::new(codes::INVALID_DESCRIPTOR, err.to_string())
                    .with_suggestion("Set a non-empty id in the modifier metadata")
            }
            ModifierError::UnknownModifier { ref similar, .. } => {
                let mut out = QuillError::new(codes::UNKNOWN_MODIFIER, err.to_string());
                if !similar.is_empty() {
                    out = out.with_suggestion(format!("Similar: {}", similar.join(", ")));
                }
                out
            }
            ModifierError::ModifierExecutionFailed { ref id, ref cause } => {
                QuillError::new(codes::MODIFIER_FAILED, format!("Modifier \"{}\" failed", id))
                    .with_cause(cause.clone())
            }
        }
    }
}

/// Central modifier registry.
///
/// Entries are keyed by the id reported at registration time. Registering an
/// id twice replaces the earlier entry. The bulk loader runs at most once per
/// registry.
pub struct ModifierRegistry {
    entries: RwLock<HashMap<String, Arc<dyn ModifierPlugin>>>,
    loaded: OnceCell<LoadReport>,
}

impl ModifierRegistry {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            loaded: OnceCell::new(),
        }
    }

    /// Builder form of [`register`](Self::register). Invalid descriptors are
    /// skipped with a warning.
    pub fn with_modifier<M: ModifierPlugin + 'static>(self, m: M) -> Self {
        if let Err(e) = self.register(Arc::new(m)) {
            warn!(error = %e, "skipping modifier");
        }
        self
    }

    pub fn register(&self, descriptor: Arc<dyn ModifierPlugin>) -> Result<(), ModifierError> {
        let meta = descriptor.meta();
        let id = meta.id;
        if id.trim().is_empty() {
            return Err(ModifierError::InvalidDescriptor { name: meta.name.to_string() });
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.insert(id.to_string(), descriptor).is_some() {
            debug!(id, "modifier re-registered, previous entry replaced");
        } else {
            debug!(id, "modifier registered");
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn ModifierPlugin>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dispatch `text` to the modifier registered under `id`.
    ///
    /// The modifier's result is returned as-is.
    pub fn apply_by_id(&self, id: &str, text: &str, args: &Args) -> Result<String, ModifierError> {
        // The lock is released before `apply` runs.
        let entry = match self.get(id) {
            Some(m) => m,
            None => {
                let similar = self.find_similar_ids(id).into_iter().take(5).collect();
                return Err(ModifierError::UnknownModifier { id: id.to_string(), similar });
            }
        };

        entry.apply(text, args).map_err(|cause| ModifierError::ModifierExecutionFailed {
            id: id.to_string(),
            cause,
        })
    }

    /// Metadata of every registered modifier, in no particular order
    pub fn list(&self) -> Vec<ModifierMeta> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|m| m.meta())
            .collect()
    }

    pub fn list_by_category(&self, category: Option<&str>) -> Vec<ModifierMeta> {
        self.list()
            .into_iter()
            .filter(|m| category.map_or(true, |c| m.category == c))
            .collect()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// Load and register every source, once.
    ///
    /// A source that fails, yields nothing, or yields a descriptor without an
    /// id is recorded in the report and skipped; the rest still load. Later
    /// calls return the first report without touching any source.
    pub async fn auto_register_all(&self, sources: &[Arc<dyn ModifierSource>]) -> LoadOutcome<'_> {
        let mut ran = false;
        let report = self.loaded
            .get_or_init(|| {
                ran = true;
                self.load_sources(sources)
            })
            .await;

        if ran {
            LoadOutcome::Loaded(report)
        } else {
            LoadOutcome::AlreadyLoaded(report)
        }
    }

    async fn load_sources(&self, sources: &[Arc<dyn ModifierSource>]) -> LoadReport {
        let mut report = LoadReport::default();

        for source in sources {
            let module = source.name().to_string();
            let skip = |error: QuillError| {
                warn!(module = %module, %error, "modifier module skipped");
                SkippedModule { module: module.clone(), error }
            };

            match source.load().await {
                Ok(Some(descriptor)) => {
                    let id = descriptor.meta().id.to_string();
                    match self.register(descriptor) {
                        Ok(()) => report.registered.push(id),
                        Err(e) => report.skipped.push(skip(e.into())),
                    }
                }
                Ok(None) => {
                    let missing = LoadError::new(module.as_str(), "module exposes no descriptor");
                    report.skipped.push(skip(missing.into()));
                }
                Err(e) => report.skipped.push(skip(e.into())),
            }
        }

        info!(
            registered = report.registered.len(),
            skipped = report.skipped.len(),
            "modifier modules loaded"
        );
        report
    }

    /// Find registered ids similar to the given one (for error suggestions)
    fn find_similar_ids(&self, id: &str) -> Vec<String> {
        let query = id.to_lowercase();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut matches: Vec<(String, usize)> = entries.keys()
            .filter_map(|candidate| {
                let score = Self::similarity_score(&query, &candidate.to_lowercase());
                (score > 0).then(|| (candidate.clone(), score))
            })
            .collect();

        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        matches.into_iter().map(|(id, _)| id).collect()
    }

    fn similarity_score(query: &str, candidate: &str) -> usize {
        let mut score = 0;

        if candidate.starts_with(query) {
            score += 100;
        } else if candidate.contains(query) {
            score += 50;
        } else if query.contains(candidate) {
            score += 30;
        }

        let query_chars: HashSet<char> = query.chars().collect();
        let candidate_chars: HashSet<char> = candidate.chars().collect();
        score += query_chars.intersection(&candidate_chars).count() * 2;

        let len_diff = query.len().abs_diff(candidate.len());
        if len_diff < 5 && score > 0 {
            score += 5 - len_diff;
        }

        score
    }
}

impl Default for ModifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArgMeta, FnModifier, MergeMode, StaticSource};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn meta(id: &'static str, name: &'static str) -> ModifierMeta {
        ModifierMeta {
            id,
            name,
            description: "test modifier",
            category: "test",
            default_mode: MergeMode::Flatten,
            args: &[],
        }
    }

    fn upper(id: &'static str) -> Arc<dyn ModifierPlugin> {
        Arc::new(FnModifier::new(meta(id, "Upper"), |text: &str, _: &Args| Ok(text.to_uppercase())))
    }

    fn suffix(id: &'static str, s: &'static str) -> Arc<dyn ModifierPlugin> {
        Arc::new(FnModifier::new(meta(id, "Suffix"), move |text: &str, _: &Args| Ok(format!("{}{}", text, s))))
    }

    #[test]
    fn test_register_and_apply() {
        let registry = ModifierRegistry::new();
        registry.register(upper("upper")).unwrap();
        assert_eq!(registry.apply_by_id("upper", "abc", &Args::new()).unwrap(), "ABC");
    }

    #[test]
    fn test_result_is_not_post_processed() {
        let registry = ModifierRegistry::new();
        registry.register(suffix("pad", "  \n")).unwrap();
        assert_eq!(registry.apply_by_id("pad", " x", &Args::new()).unwrap(), " x  \n");
    }

    #[test]
    fn test_duplicate_id_last_registration_wins() {
        let registry = ModifierRegistry::new();
        registry.register(suffix("dup", "-first")).unwrap();
        registry.register(suffix("dup", "-second")).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.apply_by_id("dup", "x", &Args::new()).unwrap(), "x-second");
    }

    #[test]
    fn test_empty_id_is_invalid() {
        let registry = ModifierRegistry::new();
        let err = registry.register(upper("")).unwrap_err();
        assert!(matches!(err, ModifierError::InvalidDescriptor { .. }));
        let err = registry.register(upper("   ")).unwrap_err();
        assert!(matches!(err, ModifierError::InvalidDescriptor { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_listed_ids_dispatch() {
        let registry = ModifierRegistry::new();
        registry.register(suffix(" pad ", "!")).unwrap();
        registry.register(upper("upper")).unwrap();

        for meta in registry.list() {
            assert!(registry.contains(meta.id), "listed id {:?} not dispatchable", meta.id);
            assert!(registry.apply_by_id(meta.id, "x", &Args::new()).is_ok());
        }
        assert!(!registry.contains("pad"));
    }

    #[test]
    fn test_unknown_modifier_leaves_registry_unchanged() {
        let registry = ModifierRegistry::new();
        registry.register(upper("text.upper")).unwrap();
        let before = registry.len();

        let err = registry.apply_by_id("text.uper", "abc", &Args::new()).unwrap_err();
        match err {
            ModifierError::UnknownModifier { ref id, ref similar } => {
                assert_eq!(id, "text.uper");
                assert_eq!(similar, &vec!["text.upper".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(registry.len(), before);
        assert!(!registry.contains("text.uper"));
    }

    #[test]
    fn test_execution_failure_preserves_cause() {
        let registry = ModifierRegistry::new();
        registry.register(Arc::new(FnModifier::new(meta("boom", "Boom"), |_: &str, _: &Args| {
            Err(QuillError::new(codes::ARG_TYPE, "shift must be a number"))
        }))).unwrap();

        let err = registry.apply_by_id("boom", "abc", &Args::new()).unwrap_err();
        let ModifierError::ModifierExecutionFailed { ref cause, .. } = err else {
            panic!("unexpected error: {:?}", err);
        };
        assert_eq!(cause.message, "shift must be a number");

        let structured: QuillError = err.into();
        assert_eq!(structured.code, codes::MODIFIER_FAILED);
        assert_eq!(structured.root_cause().code, codes::ARG_TYPE);
    }

    #[test]
    fn test_list_and_category_filter() {
        static ARGS: [ArgMeta; 1] = [ArgMeta::required("n", "number", "count")];
        let registry = ModifierRegistry::new()
            .with_modifier(FnModifier::new(
                ModifierMeta { category: "alphabet", args: &ARGS, ..meta("a", "A") },
                |t: &str, _: &Args| Ok(t.to_string()),
            ))
            .with_modifier(FnModifier::new(meta("b", "B"), |t: &str, _: &Args| Ok(t.to_string())));

        let mut ids: Vec<&str> = registry.list().iter().map(|m| m.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);

        let alphabet = registry.list_by_category(Some("alphabet"));
        assert_eq!(alphabet.len(), 1);
        assert_eq!(alphabet[0].args[0].key, "n");
    }

    struct CountingSource {
        loads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ModifierSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }

        async fn load(&self) -> Result<Option<Arc<dyn ModifierPlugin>>, LoadError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Some(upper("counted")))
        }
    }

    struct BrokenSource;

    #[async_trait]
    impl ModifierSource for BrokenSource {
        fn name(&self) -> &str {
            "broken"
        }

        async fn load(&self) -> Result<Option<Arc<dyn ModifierPlugin>>, LoadError> {
            Err(LoadError::new("broken", "syntax error in module"))
        }
    }

    struct EmptySource;

    #[async_trait]
    impl ModifierSource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        async fn load(&self) -> Result<Option<Arc<dyn ModifierPlugin>>, LoadError> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_auto_register_isolates_failures() {
        let registry = ModifierRegistry::new();
        let sources: Vec<Arc<dyn ModifierSource>> = vec![
            Arc::new(BrokenSource),
            Arc::new(StaticSource::new("upper", || upper("upper"))),
            Arc::new(EmptySource),
            Arc::new(StaticSource::new("nameless", || upper(""))),
            Arc::new(StaticSource::new("suffix", || suffix("suffix", "!"))),
        ];

        let outcome = registry.auto_register_all(&sources).await;
        assert!(outcome.is_first_load());
        let report = outcome.report();
        assert_eq!(report.registered, vec!["upper".to_string(), "suffix".to_string()]);
        let skipped: Vec<(&str, &str)> = report.skipped.iter()
            .map(|s| (s.module.as_str(), s.error.code.as_str()))
            .collect();
        assert_eq!(skipped, vec![
            ("broken", codes::MODULE_LOAD),
            ("empty", codes::MODULE_LOAD),
            ("nameless", codes::INVALID_DESCRIPTOR),
        ]);
        assert!(report.skipped[0].error.message.contains("syntax error in module"));

        assert!(registry.is_loaded());
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_auto_register_runs_once() {
        let loads = Arc::new(AtomicUsize::new(0));
        let registry = ModifierRegistry::new();
        let sources: Vec<Arc<dyn ModifierSource>> =
            vec![Arc::new(CountingSource { loads: loads.clone() })];

        assert!(registry.auto_register_all(&sources).await.is_first_load());
        let second = registry.auto_register_all(&sources).await;
        assert!(!second.is_first_load());
        assert_eq!(second.report().registered, vec!["counted".to_string()]);
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }
}
