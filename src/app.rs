use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};

use crate::error::RecipeError;
use crate::model::RecipeRecord;
use crate::normalize::{normalize, SubmissionForm};
use crate::render::{Render, Screen, View};
use crate::repository::{RecipeDataset, RecipeRepository};
use crate::session::{Action, Page, ViewState};
use crate::sinks::RecipeSink;

/// Told about every successful submission
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipe_name: &str,
        details: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Records submissions in the log instead of sending them anywhere
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        recipe_name: &str,
        details: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        info!("New recipe submitted: {}\n{}", recipe_name, details);
        Ok(())
    }
}

/// Coordinates data access, session state and submissions.
///
/// One instance can serve many sessions; each session owns its
/// [`ViewState`] and passes it in with every action.
pub struct RecipeApp {
    repository: Arc<RecipeRepository>,
    sink: Box<dyn RecipeSink>,
    notifier: Box<dyn Notifier>,
    placeholder_image_url: String,
}

impl RecipeApp {
    pub fn new(
        repository: Arc<RecipeRepository>,
        sink: Box<dyn RecipeSink>,
        notifier: Box<dyn Notifier>,
        placeholder_image_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            sink,
            notifier,
            placeholder_image_url: placeholder_image_url.into(),
        }
    }

    pub async fn dataset(&self) -> Arc<RecipeDataset> {
        self.repository.load().await
    }

    /// Applies `action`, then renders the resulting page exactly once.
    pub async fn dispatch(
        &self,
        state: ViewState,
        action: Action,
        renderer: &dyn Render,
    ) -> ViewState {
        let state = state.apply(action);
        self.show(state, renderer).await
    }

    /// Renders the current page without changing anything else.
    ///
    /// On the viewer, a missing or stale selection is replaced by the
    /// recipe actually shown (the first one) so later actions refer to it.
    pub async fn show(&self, mut state: ViewState, renderer: &dyn Render) -> ViewState {
        let dataset = self.dataset().await;

        if state.current_page == Page::Viewer {
            let shown = dataset
                .find_or_first(state.selected.as_deref())
                .map(|r| r.name.clone());
            if shown.is_some() {
                state.selected = shown;
            }
        }

        renderer.render(&self.screen(&state, &dataset));
        state
    }

    /// Builds the page model for `state`
    pub fn screen<'a>(&'a self, state: &'a ViewState, dataset: &'a RecipeDataset) -> Screen<'a> {
        let view = match state.current_page {
            Page::List => View::List {
                names: dataset.unique_names(),
            },
            Page::Viewer => {
                let recipe = dataset.find_or_first(state.selected.as_deref());
                View::Viewer {
                    recipe,
                    image_url: recipe
                        .map(|r| r.display_image_url(&self.placeholder_image_url))
                        .unwrap_or(&self.placeholder_image_url),
                    is_favorite: recipe.is_some_and(|r| state.is_favorite(&r.name)),
                }
            }
            Page::Favorites => View::Favorites {
                names: state.favorites(),
            },
            Page::Add => View::Add,
        };

        Screen {
            page: state.current_page,
            view,
            notice: dataset.problem(),
        }
    }

    /// Normalizes and stores a submission, then sends a notification.
    ///
    /// Storage failures are returned and the submission is dropped.
    /// Notification failures are only logged. The cached dataset is not
    /// refreshed, so the new recipe is not listed until the next process.
    pub async fn submit(&self, form: &SubmissionForm) -> Result<RecipeRecord, RecipeError> {
        let record = normalize(form, &self.placeholder_image_url)?;

        if let Err(e) = self.sink.append(&record).await {
            error!(
                "Failed to store recipe '{}' via {}: {}",
                record.name,
                self.sink.sink_name(),
                e
            );
            return Err(e);
        }

        if let Err(e) = self
            .notifier
            .notify(&record.name, &submission_details(&record))
            .await
        {
            warn!("Failed to send notification for '{}': {}", record.name, e);
        }

        Ok(record)
    }
}

fn submission_details(record: &RecipeRecord) -> String {
    format!(
        "Subtitle: {}\nCalories: {}\nPrep Time: {} minutes\nCook Time: {} minutes\nIngredients: {}",
        record.subtitle,
        record.calories,
        record.prep_time_minutes,
        record.cook_time_minutes,
        record.ingredients.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::RecipeSource;
    use std::sync::Mutex;

    struct FixedSource(Vec<RecipeRecord>);

    #[async_trait]
    impl RecipeSource for FixedSource {
        fn source_name(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self) -> Result<Vec<RecipeRecord>, RecipeError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct MemorySink {
        records: Mutex<Vec<RecipeRecord>>,
        fail: bool,
    }

    #[async_trait]
    impl RecipeSink for Arc<MemorySink> {
        fn sink_name(&self) -> &str {
            "memory"
        }

        async fn append(&self, record: &RecipeRecord) -> Result<(), RecipeError> {
            if self.fail {
                return Err(RecipeError::PersistError("disk full".to_string()));
            }
            self.records.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    struct FailingNotifier;

    #[async_trait]
    impl Notifier for FailingNotifier {
        async fn notify(
            &self,
            _recipe_name: &str,
            _details: &str,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            Err("smtp unavailable".into())
        }
    }

    /// Remembers the page and recipe of every render
    #[derive(Default)]
    struct RecordingRenderer {
        renders: Mutex<Vec<(Page, Option<String>)>>,
    }

    impl Render for RecordingRenderer {
        fn render(&self, screen: &Screen<'_>) {
            let shown = match &screen.view {
                View::Viewer { recipe, .. } => recipe.map(|r| r.name.clone()),
                _ => None,
            };
            self.renders.lock().unwrap().push((screen.page, shown));
        }
    }

    fn recipe(name: &str) -> RecipeRecord {
        RecipeRecord {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn app_with(sink: Arc<MemorySink>, notifier: Box<dyn Notifier>) -> RecipeApp {
        let repository = RecipeRepository::new(Box::new(FixedSource(vec![
            recipe("Soup"),
            recipe("Pie"),
        ])));
        RecipeApp::new(
            Arc::new(repository),
            Box::new(sink),
            notifier,
            "https://via.placeholder.com/150",
        )
    }

    fn form(name: &str) -> SubmissionForm {
        SubmissionForm {
            name: name.to_string(),
            calories: "100".to_string(),
            prep_time: "1".to_string(),
            cook_time: "2".to_string(),
            ingredients: "a, b".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_dispatch_renders_once_per_action() {
        let app = app_with(Arc::default(), Box::new(LogNotifier));
        let renderer = RecordingRenderer::default();

        let state = app
            .dispatch(ViewState::new(), Action::Select("Pie".to_string()), &renderer)
            .await;
        let state = app
            .dispatch(state, Action::Navigate(Page::List), &renderer)
            .await;

        assert_eq!(state.current_page, Page::List);
        assert_eq!(
            *renderer.renders.lock().unwrap(),
            vec![
                (Page::Viewer, Some("Pie".to_string())),
                (Page::List, None)
            ]
        );
    }

    #[tokio::test]
    async fn test_viewer_falls_back_to_first_recipe() {
        let app = app_with(Arc::default(), Box::new(LogNotifier));
        let renderer = RecordingRenderer::default();

        let state = app
            .dispatch(ViewState::new(), Action::Select("Missing".to_string()), &renderer)
            .await;

        assert_eq!(state.selected.as_deref(), Some("Soup"));
        let state = app
            .dispatch(state, Action::ToggleFavorite, &renderer)
            .await;
        assert!(state.is_favorite("Soup"));
    }

    #[tokio::test]
    async fn test_screen_marks_favorites() {
        let app = app_with(Arc::default(), Box::new(LogNotifier));
        let dataset = app.dataset().await;
        let state = ViewState::new()
            .apply(Action::Select("Pie".to_string()))
            .apply(Action::ToggleFavorite);

        match app.screen(&state, &dataset).view {
            View::Viewer {
                recipe,
                image_url,
                is_favorite,
            } => {
                assert_eq!(recipe.unwrap().name, "Pie");
                assert_eq!(image_url, "https://via.placeholder.com/150");
                assert!(is_favorite);
            }
            other => panic!("expected viewer, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_record() {
        let sink = Arc::new(MemorySink::default());
        let app = app_with(sink.clone(), Box::new(FailingNotifier));

        let record = app.submit(&form("Salad")).await.unwrap();

        assert_eq!(record.ingredients, vec!["a", "b"]);
        assert_eq!(sink.records.lock().unwrap().len(), 1);
        // Cached dataset is not refreshed by a submission
        assert!(app.dataset().await.find_by_name("Salad").is_none());
    }

    #[tokio::test]
    async fn test_submit_reports_persist_failure() {
        let sink = Arc::new(MemorySink {
            fail: true,
            ..Default::default()
        });
        let app = app_with(sink, Box::new(LogNotifier));

        assert!(matches!(
            app.submit(&form("Salad")).await,
            Err(RecipeError::PersistError(_))
        ));
    }

    #[tokio::test]
    async fn test_submit_rejects_invalid_form() {
        let sink = Arc::new(MemorySink::default());
        let app = app_with(sink.clone(), Box::new(LogNotifier));
        let mut bad = form("Salad");
        bad.calories = "many".to_string();

        assert!(matches!(
            app.submit(&bad).await,
            Err(RecipeError::ValidationError(_))
        ));
        assert!(sink.records.lock().unwrap().is_empty());
    }
}
