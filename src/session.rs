/// Pages a session can be on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Page {
    List,
    #[default]
    Viewer,
    Favorites,
    Add,
}

impl Page {
    pub fn title(&self) -> &'static str {
        match self {
            Page::List => "All Recipes",
            Page::Viewer => "View Recipe",
            Page::Favorites => "Favorites",
            Page::Add => "Add Recipe",
        }
    }
}

/// Something the user did that changes the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Go to a page; always allowed
    Navigate(Page),
    /// Pick a recipe and show it
    Select(String),
    /// Add or remove the selected recipe from favorites
    ToggleFavorite,
}

/// Navigation state for one interactive session.
///
/// Never persisted; a new session starts on the viewer with nothing
/// selected and no favorites. The selection is not checked against the
/// dataset, so it can name a recipe that no longer exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub current_page: Page,
    pub selected: Option<String>,
    favorites: Vec<String>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(mut self, action: Action) -> Self {
        match action {
            Action::Navigate(page) => self.current_page = page,
            Action::Select(name) => {
                self.selected = Some(name);
                self.current_page = Page::Viewer;
            }
            Action::ToggleFavorite => {
                if let Some(name) = &self.selected {
                    if let Some(pos) = self.favorites.iter().position(|f| f == name) {
                        self.favorites.remove(pos);
                    } else {
                        self.favorites.push(name.clone());
                    }
                }
            }
        }
        self
    }

    /// Favorite names, oldest first
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|f| f == name)
    }
}
