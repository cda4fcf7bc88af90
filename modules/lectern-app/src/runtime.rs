//! Carries out the I/O effects the state machines ask for.
//!
//! Two drivers share [`perform`] and [`search`]:
//!
//! - [`settle`] / [`settle_viewer`] run requests one at a time and feed each
//!   completion straight back, until nothing is left in flight. Deterministic,
//!   used by tests and scripted runs.
//! - [`Runtime`] spawns each request on tokio and delivers completions over an
//!   unbounded channel, so several actions can be in flight at once.

use std::collections::VecDeque;
use std::sync::Arc;

use lectern_content::ContentService;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::app::{App, AppEffect, AppEvent};
use crate::viewer::{Completion, Effect, Outcome, Request, RequestKind, ResultViewer, Ticket, ViewerEvent};

/// Call the content service for one viewer request.
pub async fn perform(service: &dyn ContentService, request: Request) -> Completion {
    debug!(ticket = %request.ticket, request = request.kind.label(), "Performing request");
    let outcome = match &request.kind {
        RequestKind::Translate { text, language } => {
            Outcome::Translated(service.translate(text, *language).await)
        }
        RequestKind::GenerateImage { prompt } => {
            Outcome::Image(service.make_image(prompt).await.map_err(|e| e.to_string()))
        }
        RequestKind::CreateFlashcard { text, image } => {
            Outcome::Flashcard(service.make_flashcard(text, image).await)
        }
    };
    request.complete(outcome)
}

/// Run a search and wrap the answer as the completion event.
pub async fn search(service: &dyn ContentService, ticket: Ticket, query: &str) -> AppEvent {
    let outcome = service.search(query).await.map_err(|e| e.to_string());
    AppEvent::SearchCompleted { ticket, outcome }
}

/// Drive a standalone viewer until every request it issues has completed.
/// Returns the non-request effects in the order they were produced.
pub async fn settle_viewer(
    viewer: &mut ResultViewer,
    service: &dyn ContentService,
    event: ViewerEvent,
) -> Vec<Effect> {
    let mut queue = VecDeque::from([event]);
    let mut emitted = Vec::new();

    while let Some(event) = queue.pop_front() {
        for effect in viewer.update(event) {
            match effect {
                Effect::Request(request) => {
                    let completion = perform(service, request).await;
                    queue.push_back(ViewerEvent::Completed(completion));
                }
                other => emitted.push(other),
            }
        }
    }

    emitted
}

/// Drive the app until every search and request it issues has completed.
/// Returns the effects left for the shell: notices and clipboard copies.
pub async fn settle(app: &mut App, service: &dyn ContentService, event: AppEvent) -> Vec<AppEffect> {
    let mut queue = VecDeque::from([event]);
    let mut emitted = Vec::new();

    while let Some(event) = queue.pop_front() {
        for effect in app.update(event) {
            match effect {
                AppEffect::Search { ticket, query } => {
                    queue.push_back(search(service, ticket, &query).await);
                }
                AppEffect::Request(request) => {
                    let completion = perform(service, request).await;
                    queue.push_back(AppEvent::Viewer(ViewerEvent::Completed(completion)));
                }
                other => emitted.push(other),
            }
        }
    }

    emitted
}

/// Concurrent driver. Completions arrive on the receiver returned by
/// [`Runtime::new`] and must be fed back through [`App::update`].
#[derive(Clone)]
pub struct Runtime {
    service: Arc<dyn ContentService>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Runtime {
    pub fn new(service: Arc<dyn ContentService>) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { service, tx }, rx)
    }

    /// Spawn every search and request; hand back the effects the shell shows itself.
    pub fn dispatch(&self, effects: Vec<AppEffect>) -> Vec<AppEffect> {
        effects
            .into_iter()
            .filter_map(|effect| match effect {
                AppEffect::Search { ticket, query } => {
                    self.spawn_search(ticket, query);
                    None
                }
                AppEffect::Request(request) => {
                    self.spawn_request(request);
                    None
                }
                other => Some(other),
            })
            .collect()
    }

    fn spawn_search(&self, ticket: Ticket, query: String) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = search(service.as_ref(), ticket, &query).await;
            deliver(&tx, event);
        });
    }

    fn spawn_request(&self, request: Request) {
        let service = self.service.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let completion = perform(service.as_ref(), request).await;
            deliver(&tx, AppEvent::Viewer(ViewerEvent::Completed(completion)));
        });
    }
}

fn deliver(tx: &mpsc::UnboundedSender<AppEvent>, event: AppEvent) {
    if tx.send(event).is_err() {
        warn!("Completion receiver dropped, discarding result");
    }
}
