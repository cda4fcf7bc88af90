//! Search orchestration around the viewer: the query, the result list, the
//! open viewer and the last created flashcard.

use lectern_common::{LecternError, SearchResult};
use tracing::{debug, info, warn};

use crate::presenter::FlashcardPresenter;
use crate::timer::SearchTimer;
use crate::viewer::{Effect, Notice, Request, ResultViewer, Ticket, TicketCounter, ViewerEvent};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchPhase {
    #[default]
    Idle,
    Searching {
        ticket: Ticket,
        query: String,
        timer: SearchTimer,
    },
    Done {
        query: String,
        results: Vec<SearchResult>,
    },
    Failed {
        query: String,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Submit(String),
    /// `Err` carries the failure reason for the logs.
    SearchCompleted {
        ticket: Ticket,
        outcome: Result<Vec<SearchResult>, String>,
    },
    /// Open the result at this position of the list.
    Open(usize),
    Viewer(ViewerEvent),
    FlipFlashcard,
    DismissFlashcard,
}

/// What the shell must do after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEffect {
    Search { ticket: Ticket, query: String },
    Request(Request),
    Notify(Notice),
    CopyToClipboard(String),
}

#[derive(Default)]
pub struct App {
    phase: SearchPhase,
    viewer: Option<ResultViewer>,
    flashcard: Option<FlashcardPresenter>,
    tickets: TicketCounter,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &SearchPhase {
        &self.phase
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, SearchPhase::Searching { .. })
    }

    pub fn results(&self) -> &[SearchResult] {
        match &self.phase {
            SearchPhase::Done { results, .. } => results,
            _ => &[],
        }
    }

    pub fn viewer(&self) -> Option<&ResultViewer> {
        self.viewer.as_ref()
    }

    pub fn flashcard(&self) -> Option<&FlashcardPresenter> {
        self.flashcard.as_ref()
    }

    /// One-line summary of the search phase, if there is anything to say.
    pub fn status_line(&self) -> Option<String> {
        match &self.phase {
            SearchPhase::Idle => None,
            SearchPhase::Searching { timer, .. } => {
                Some(timer.display())
            }
            SearchPhase::Done { query, results } if results.is_empty() => {
                Some(format!("No results found for \"{query}\"."))
            }
            SearchPhase::Done { .. } => None,
            SearchPhase::Failed { message, .. } => Some(message.clone()),
        }
    }

    pub fn update(&mut self, event: AppEvent) -> Vec<AppEffect> {
        match event {
            AppEvent::Submit(query) => self.submit(query),
            AppEvent::SearchCompleted { ticket, outcome } => {
                self.search_completed(ticket, outcome);
                vec![]
            }
            AppEvent::Open(index) => {
                self.open(index);
                vec![]
            }
            AppEvent::Viewer(event) => self.route_to_viewer(event),
            AppEvent::FlipFlashcard => {
                if let Some(presenter) = self.flashcard.as_mut() {
                    presenter.flip();
                }
                vec![]
            }
            AppEvent::DismissFlashcard => {
                self.flashcard = None;
                vec![]
            }
        }
    }

    fn submit(&mut self, query: String) -> Vec<AppEffect> {
        let query = query.trim();
        if query.is_empty() {
            return vec![];
        }

        self.close_viewer();
        self.flashcard = None;

        let ticket = self.tickets.next();
        info!(%ticket, query, "Search submitted");
        self.phase = SearchPhase::Searching {
            ticket,
            query: query.to_string(),
            timer: SearchTimer::start(),
        };
        vec![AppEffect::Search {
            ticket,
            query: query.to_string(),
        }]
    }

    fn search_completed(&mut self, ticket: Ticket, outcome: Result<Vec<SearchResult>, String>) {
        let SearchPhase::Searching {
            ticket: current,
            query,
            timer,
        } = &mut self.phase
        else {
            debug!(%ticket, "Dropping search completion, no search running");
            return;
        };
        if *current != ticket {
            debug!(%ticket, current = %current, "Dropping stale search completion");
            return;
        }

        timer.stop();
        let query = std::mem::take(query);
        let elapsed_ms = timer.elapsed().as_millis() as u64;

        self.phase = match outcome {
            Ok(results) => {
                info!(query = %query, results = results.len(), elapsed_ms, "Search completed");
                SearchPhase::Done { query, results }
            }
            Err(reason) => {
                warn!(query = %query, reason = %reason, elapsed_ms, "Search failed");
                let message = LecternError::SearchFailed(reason).user_message().to_string();
                SearchPhase::Failed { query, message }
            }
        };
    }

    fn open(&mut self, index: usize) {
        let Some(result) = self.results().get(index).cloned() else {
            warn!(index, available = self.results().len(), "No result at that position");
            return;
        };
        self.close_viewer();
        self.viewer = Some(ResultViewer::new(result));
    }

    fn close_viewer(&mut self) {
        if let Some(viewer) = self.viewer.take() {
            viewer.close();
        }
    }

    fn route_to_viewer(&mut self, event: ViewerEvent) -> Vec<AppEffect> {
        let Some(viewer) = self.viewer.as_mut() else {
            debug!(?event, "No viewer open, event dropped");
            return vec![];
        };

        let mut out = Vec::new();
        for effect in viewer.update(event) {
            match effect {
                Effect::Request(request) => out.push(AppEffect::Request(request)),
                Effect::Notify(notice) => out.push(AppEffect::Notify(notice)),
                Effect::CopyToClipboard(text) => out.push(AppEffect::CopyToClipboard(text)),
                Effect::FlashcardCreated(card) => {
                    self.flashcard = Some(FlashcardPresenter::new(card));
                }
                Effect::Close => self.close_viewer(),
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_common::ContentType;
    use lectern_content::testing::sample_result;

    fn search_ticket(effects: &[AppEffect]) -> Ticket {
        match effects {
            [AppEffect::Search { ticket, .. }] => *ticket,
            other => panic!("expected a search effect, got {other:?}"),
        }
    }

    fn app_with_results(results: Vec<SearchResult>) -> App {
        let mut app = App::new();
        let ticket = search_ticket(&app.update(AppEvent::Submit("rust".into())));
        app.update(AppEvent::SearchCompleted {
            ticket,
            outcome: Ok(results),
        });
        app
    }

    #[test]
    fn blank_submit_is_ignored() {
        let mut app = App::new();
        assert!(app.update(AppEvent::Submit("   ".into())).is_empty());
        assert_eq!(app.phase(), &SearchPhase::Idle);
    }

    #[test]
    fn empty_results_report_query() {
        let app = app_with_results(vec![]);
        assert_eq!(
            app.status_line().as_deref(),
            Some("No results found for \"rust\".")
        );
    }

    #[test]
    fn failed_search_keeps_no_results() {
        let mut app = App::new();
        let ticket = search_ticket(&app.update(AppEvent::Submit("rust".into())));
        app.update(AppEvent::SearchCompleted {
            ticket,
            outcome: Err("upstream 500".into()),
        });

        assert!(app.results().is_empty());
        assert_eq!(
            app.status_line().as_deref(),
            Some("An error occurred during the search. Please try again.")
        );
    }

    #[test]
    fn superseded_search_is_dropped() {
        let mut app = App::new();
        let first = search_ticket(&app.update(AppEvent::Submit("one".into())));
        let second = search_ticket(&app.update(AppEvent::Submit("two".into())));

        app.update(AppEvent::SearchCompleted {
            ticket: first,
            outcome: Ok(vec![sample_result("old", ContentType::News)]),
        });
        assert!(app.is_searching());

        app.update(AppEvent::SearchCompleted {
            ticket: second,
            outcome: Ok(vec![sample_result("new", ContentType::News)]),
        });
        assert_eq!(app.results()[0].id, "new");
    }

    #[test]
    fn new_search_closes_viewer_and_clears_flashcard() {
        let mut app = app_with_results(vec![sample_result("doc1", ContentType::Document)]);
        app.update(AppEvent::Open(0));
        assert!(app.viewer().is_some());

        app.update(AppEvent::Submit("again".into()));
        assert!(app.viewer().is_none());
        assert!(app.flashcard().is_none());
    }

    #[test]
    fn open_out_of_range_is_ignored() {
        let mut app = app_with_results(vec![sample_result("doc1", ContentType::Document)]);
        app.update(AppEvent::Open(3));
        assert!(app.viewer().is_none());
    }

    #[test]
    fn viewer_close_discards_it() {
        let mut app = app_with_results(vec![sample_result("doc1", ContentType::Document)]);
        app.update(AppEvent::Open(0));
        app.update(AppEvent::Viewer(ViewerEvent::Close));
        assert!(app.viewer().is_none());
    }

    #[test]
    fn empty_selection_notice_bubbles_up() {
        let mut app = app_with_results(vec![sample_result("doc1", ContentType::News)]);
        app.update(AppEvent::Open(0));
        assert_eq!(
            app.update(AppEvent::Viewer(ViewerEvent::CreateFlashcard)),
            vec![AppEffect::Notify(Notice::EmptySelection)]
        );
        assert!(app.viewer().is_some());
    }
}
