use std::sync::Arc;

use log::{error, info};
use tokio::sync::OnceCell;

use crate::model::RecipeRecord;
use crate::sources::RecipeSource;

/// A loaded set of recipes, or an empty one with the reason loading failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeDataset {
    records: Vec<RecipeRecord>,
    problem: Option<String>,
}

impl RecipeDataset {
    pub fn new(records: Vec<RecipeRecord>) -> Self {
        Self {
            records,
            problem: None,
        }
    }

    /// An empty dataset carrying a user-facing explanation
    pub fn unavailable(problem: impl Into<String>) -> Self {
        Self {
            records: Vec::new(),
            problem: Some(problem.into()),
        }
    }

    pub fn records(&self) -> &[RecipeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Why the dataset is empty, if loading failed
    pub fn problem(&self) -> Option<&str> {
        self.problem.as_deref()
    }

    /// First record with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<&RecipeRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    /// Like [`find_by_name`](Self::find_by_name) but falls back to the first record
    pub fn find_or_first(&self, name: Option<&str>) -> Option<&RecipeRecord> {
        name.and_then(|n| self.find_by_name(n))
            .or_else(|| self.records.first())
    }

    /// Each recipe name once, in the order first seen
    pub fn unique_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.records.len());
        for record in &self.records {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
        names
    }
}

/// Runs `source` once, turning any failure into an empty dataset.
pub async fn load_or_empty(source: &dyn RecipeSource) -> RecipeDataset {
    match source.fetch().await {
        Ok(records) => RecipeDataset::new(records),
        Err(e) => {
            error!("Error loading recipes from {}: {}", source.source_name(), e);
            RecipeDataset::unavailable(format!("Error loading data: {}", e))
        }
    }
}

/// Recipe access with a load-once cache.
///
/// The source is queried at most once per repository; concurrent first
/// callers wait on the same load. Later changes to the source are not seen.
pub struct RecipeRepository {
    source: Box<dyn RecipeSource>,
    dataset: OnceCell<Arc<RecipeDataset>>,
}

impl RecipeRepository {
    pub fn new(source: Box<dyn RecipeSource>) -> Self {
        Self {
            source,
            dataset: OnceCell::new(),
        }
    }

    pub async fn load(&self) -> Arc<RecipeDataset> {
        self.dataset
            .get_or_init(|| async {
                info!("Loading recipes from {} source", self.source.source_name());
                Arc::new(load_or_empty(self.source.as_ref()).await)
            })
            .await
            .clone()
    }

    /// Whether the first load has already happened
    pub fn is_loaded(&self) -> bool {
        self.dataset.initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecipeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recipe(name: &str, calories: u32) -> RecipeRecord {
        RecipeRecord {
            name: name.to_string(),
            calories,
            ..Default::default()
        }
    }

    /// Returns a different dataset on every call so stale caching is visible.
    struct CountingSource {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RecipeSource for CountingSource {
        fn source_name(&self) -> &str {
            "counting"
        }

        async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![recipe(&format!("Recipe {}", n), 100)])
        }
    }

    struct FailingSource;

    #[async_trait]
    impl RecipeSource for FailingSource {
        fn source_name(&self) -> &str {
            "failing"
        }

        async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
            Err(RecipeError::MissingFields(vec!["Calories".to_string()]))
        }
    }

    #[tokio::test]
    async fn test_load_is_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let repo = RecipeRepository::new(Box::new(CountingSource {
            calls: calls.clone(),
        }));
        assert!(!repo.is_loaded());

        let first = repo.load().await;
        let second = repo.load().await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.records()[0].name, "Recipe 0");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(repo.is_loaded());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_loads_fetch_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let repo = Arc::new(RecipeRepository::new(Box::new(CountingSource {
            calls: calls.clone(),
        })));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.load().await })
            })
            .collect();

        for handle in handles {
            let dataset = handle.await.unwrap();
            assert_eq!(dataset.records()[0].name, "Recipe 0");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_degrades_to_empty() {
        let repo = RecipeRepository::new(Box::new(FailingSource));
        let dataset = repo.load().await;

        assert!(dataset.is_empty());
        assert!(dataset.problem().unwrap().contains("Calories"));
    }

    #[test]
    fn test_find_by_name() {
        let dataset = RecipeDataset::new(vec![
            recipe("Soup", 200),
            recipe("Pie", 800),
            recipe("Stew", 500),
        ]);

        assert_eq!(dataset.find_by_name("Pie").unwrap().calories, 800);
        assert!(dataset.find_by_name("Cake").is_none());
        assert!(dataset.find_by_name("pie").is_none());
    }

    #[test]
    fn test_duplicate_names_first_wins() {
        let dataset = RecipeDataset::new(vec![
            recipe("Soup", 200),
            recipe("Pie", 800),
            recipe("Soup", 999),
        ]);

        assert_eq!(dataset.find_by_name("Soup").unwrap().calories, 200);
        assert_eq!(dataset.unique_names(), vec!["Soup", "Pie"]);
    }

    #[test]
    fn test_find_or_first() {
        let dataset = RecipeDataset::new(vec![recipe("Soup", 200), recipe("Pie", 800)]);

        assert_eq!(dataset.find_or_first(Some("Pie")).unwrap().name, "Pie");
        assert_eq!(dataset.find_or_first(Some("Gone")).unwrap().name, "Soup");
        assert_eq!(dataset.find_or_first(None).unwrap().name, "Soup");
        assert!(RecipeDataset::default().find_or_first(None).is_none());
    }
}
