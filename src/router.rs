use std::fmt;

// ---------------------------------------------------------------------------
// Page – the closed set of views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    DataFiltering,
    DataAnalysis,
    DataPrediction,
}

impl Page {
    /// Menu order.
    pub const ALL: [Page; 4] = [
        Page::Home,
        Page::DataFiltering,
        Page::DataAnalysis,
        Page::DataPrediction,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::DataFiltering => "Data Filtering",
            Page::DataAnalysis => "Data Analysis",
            Page::DataPrediction => "Data Prediction",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Page::Home => "🏠",
            Page::DataFiltering => "🔍",
            Page::DataAnalysis => "📊",
            Page::DataPrediction => "🎲",
        }
    }

    /// Exact, case-sensitive title match.
    pub fn from_title(title: &str) -> Option<Page> {
        Page::ALL.into_iter().find(|p| p.title() == title)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// PageView – anything that can draw itself on a surface
// ---------------------------------------------------------------------------

/// A view rendered onto surface `S` (an `egui::Ui` in the app).
pub trait PageView<S: ?Sized> {
    fn render(&mut self, surface: &mut S);
}

impl<S: ?Sized, F> PageView<S> for F
where
    F: FnMut(&mut S),
{
    fn render(&mut self, surface: &mut S) {
        self(surface)
    }
}

// ---------------------------------------------------------------------------
// PageRouter
// ---------------------------------------------------------------------------

struct PageEntry<S: ?Sized> {
    page: Page,
    view: Box<dyn PageView<S>>,
}

/// Ordered registry of pages; renders exactly one per cycle.
pub struct PageRouter<S: ?Sized> {
    entries: Vec<PageEntry<S>>,
}

impl<S: ?Sized> Default for PageRouter<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S: ?Sized> PageRouter<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `view` for `page`. Registering a page again replaces its
    /// view and keeps its menu position.
    pub fn register(&mut self, page: Page, view: impl PageView<S> + 'static) -> &mut Self {
        let view: Box<dyn PageView<S>> = Box::new(view);
        match self.entries.iter_mut().find(|e| e.page == page) {
            Some(entry) => entry.view = view,
            None => self.entries.push(PageEntry { page, view }),
        }
        self
    }

    /// Registered pages in registration order.
    pub fn pages(&self) -> impl Iterator<Item = Page> + '_ {
        self.entries.iter().map(|e| e.page)
    }

    pub fn titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.pages().map(Page::title)
    }

    /// Render the page named by the menu selection. An unmatched title is a
    /// no-op; returns whether anything was rendered.
    pub fn dispatch(&mut self, selection: &str, surface: &mut S) -> bool {
        match Page::from_title(selection) {
            Some(page) => self.render(page, surface),
            None => {
                log::debug!("No page titled {selection:?}");
                false
            }
        }
    }

    pub fn render(&mut self, page: Page, surface: &mut S) -> bool {
        match self.entries.iter_mut().find(|e| e.page == page) {
            Some(entry) => {
                entry.view.render(surface);
                true
            }
            None => {
                log::debug!("Page {page} is not registered");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Log = Vec<&'static str>;

    fn router() -> PageRouter<Log> {
        let mut router = PageRouter::new();
        router
            .register(Page::Home, |log: &mut Log| log.push("home"))
            .register(Page::DataFiltering, |log: &mut Log| log.push("filter"));
        router
    }

    #[test]
    fn selection_renders_only_that_page() {
        let mut router = router();
        let mut log = Log::new();
        assert!(router.dispatch("Data Filtering", &mut log));
        assert_eq!(log, ["filter"]);
    }

    #[test]
    fn unknown_selection_is_a_noop() {
        let mut router = router();
        let mut log = Log::new();
        assert!(!router.dispatch("Settings", &mut log));
        assert!(!router.dispatch("home", &mut log));
        assert!(!router.dispatch("Data Analysis", &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn titles_follow_registration_order() {
        let mut router = router();
        router.register(Page::DataPrediction, |_: &mut Log| {});
        let titles: Vec<_> = router.titles().collect();
        assert_eq!(titles, ["Home", "Data Filtering", "Data Prediction"]);
    }

    #[test]
    fn reregistering_replaces_in_place() {
        let mut router = router();
        router.register(Page::Home, |log: &mut Log| log.push("new home"));
        let mut log = Log::new();
        router.dispatch("Home", &mut log);
        assert_eq!(log, ["new home"]);
        assert_eq!(router.pages().collect::<Vec<_>>(), [Page::Home, Page::DataFiltering]);
    }

    #[test]
    fn views_keep_their_state() {
        let mut renders = 0;
        let mut router: PageRouter<Log> = PageRouter::new();
        router.register(Page::DataAnalysis, move |log: &mut Log| {
            renders += 1;
            if renders == 2 {
                log.push("second");
            }
        });
        let mut log = Log::new();
        router.render(Page::DataAnalysis, &mut log);
        router.render(Page::DataAnalysis, &mut log);
        assert_eq!(log, ["second"]);
    }

    #[test]
    fn titles_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_title(page.title()), Some(page));
        }
    }
}
