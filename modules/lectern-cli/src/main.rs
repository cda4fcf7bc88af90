mod commands;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lectern_app::{App, AppEffect, AppEvent, Runtime, ViewerEvent};
use lectern_common::{AppConfig, Language, LecternError};
use lectern_content::{AiContentService, ContentService, SearchSettings};

use commands::{Command, HELP};

#[derive(Parser)]
#[command(name = "lectern", about = "Semantic search with translation, flashcards and images")]
struct Cli {
    /// Run this search on startup
    #[arg(long)]
    query: Option<String>,

    /// Target language for translations (en, es, fr, de, ja, zh)
    #[arg(long, default_value = "en")]
    lang: Language,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

/// The REPL's state: the app, the runtime performing its requests, and the
/// language every opened viewer starts with.
struct Shell {
    app: App,
    runtime: Runtime,
    language: Language,
}

impl Shell {
    fn apply(&mut self, event: AppEvent) {
        let effects = self.app.update(event);
        for effect in self.runtime.dispatch(effects) {
            match effect {
                AppEffect::Notify(notice) => println!("! {}", notice.message()),
                AppEffect::CopyToClipboard(text) => println!("copied: {text}"),
                AppEffect::Search { .. } | AppEffect::Request(_) => {}
            }
        }
    }

    fn viewer(&mut self, event: ViewerEvent) {
        if self.app.viewer().is_none() {
            println!("No result open. Use `open <n>` first.");
            return;
        }
        self.apply(AppEvent::Viewer(event));
    }

    /// Returns false when the user asked to quit.
    fn command(&mut self, command: Command) -> bool {
        match command {
            Command::Search(query) => self.apply(AppEvent::Submit(query)),
            Command::Open(index) => {
                self.apply(AppEvent::Open(index));
                if self.app.viewer().is_some() {
                    self.apply(AppEvent::Viewer(ViewerEvent::SetLanguage(self.language)));
                    render::screen(&self.app);
                } else {
                    println!("No result {}.", index + 1);
                }
            }
            Command::Mode(mode) => {
                self.viewer(ViewerEvent::SetMode(mode));
                render::screen(&self.app);
            }
            Command::Select(text) => self.viewer(ViewerEvent::TextSelected(text)),
            Command::Lang(language) => {
                self.language = language;
                if self.app.viewer().is_some() {
                    self.apply(AppEvent::Viewer(ViewerEvent::SetLanguage(language)));
                }
                println!("Language: {} ({})", language.name(), language.code());
            }
            Command::Translate => self.viewer(ViewerEvent::Translate),
            Command::Prompt(prompt) => self.viewer(ViewerEvent::SetPrompt(prompt)),
            Command::Generate => self.viewer(ViewerEvent::GenerateImage),
            Command::Flashcard => self.viewer(ViewerEvent::CreateFlashcard),
            Command::Copy => self.viewer(ViewerEvent::CopyTranslation),
            Command::Close => self.viewer(ViewerEvent::Close),
            Command::Flip => {
                self.apply(AppEvent::FlipFlashcard);
                render::screen(&self.app);
            }
            Command::Dismiss => self.apply(AppEvent::DismissFlashcard),
            Command::Show => render::screen(&self.app),
            Command::Help => println!("{HELP}"),
            Command::Quit => return false,
        }
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    tracing::info!("Starting lectern");

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            let err = LecternError::Config(format!("{e:#}"));
            eprintln!("{}", err.user_message());
            return Err(err.into());
        }
    };

    let mut openai = ai_client::OpenAi::new(&config.openai_api_key, &config.chat_model)
        .with_image_model(&config.image_model);
    if let Some(base_url) = &config.api_base_url {
        openai = openai.with_base_url(base_url);
    }
    tracing::info!(
        chat_model = openai.model(),
        image_model = openai.image_model(),
        "AI client ready"
    );
    let service: Arc<dyn ContentService> = Arc::new(AiContentService::from_openai(
        Arc::new(openai),
        SearchSettings::from(&config),
    ));

    let (runtime, mut completions) = Runtime::new(service);
    let mut shell = Shell {
        app: App::new(),
        runtime,
        language: cli.lang,
    };

    println!("lectern: type `help` for commands.");
    if let Some(query) = cli.query {
        shell.apply(AppEvent::Submit(query));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tick = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match Command::parse(&line) {
                    Ok(Some(command)) => {
                        if !shell.command(command) {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(event) = completions.recv() => {
                shell.apply(event);
                render::screen(&shell.app);
            }
            _ = tick.tick() => {
                if shell.app.is_searching() {
                    if let Some(status) = shell.app.status_line() {
                        println!("{status}");
                    }
                }
            }
        }
    }

    tracing::info!("Bye");
    Ok(())
}
