use lectern_app::ViewMode;
use lectern_common::Language;

/// One line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    /// Zero-based position in the result list (typed one-based).
    Open(usize),
    Mode(ViewMode),
    Select(String),
    Lang(Language),
    Translate,
    Prompt(String),
    Generate,
    Flashcard,
    Copy,
    Close,
    Flip,
    Dismiss,
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  search <query>          run a search
  open <n>                open result n
  mode data|image|full    switch the viewer's projection
  select <text>           set the text selection
  lang <code>             target language (en, es, fr, de, ja, zh)
  translate               translate the selection or the displayed text
  prompt <text>           set the image prompt
  generate                generate an image from the prompt
  flashcard               create a flashcard from the selection
  copy                    copy the translation
  close                   close the viewer
  flip                    flip the flashcard
  dismiss                 hide the flashcard
  show                    print the current screen
  help                    this text
  quit                    exit";

impl Command {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" | "s" => Command::Search(required(rest, "search <query>")?),
            "open" | "o" => {
                let n: usize = rest
                    .parse()
                    .map_err(|_| format!("expected a result number, got {rest:?}"))?;
                if n == 0 {
                    return Err("results are numbered from 1".to_string());
                }
                Command::Open(n - 1)
            }
            "mode" | "m" => Command::Mode(rest.parse()?),
            "select" => Command::Select(required(rest, "select <text>")?),
            "lang" => Command::Lang(rest.parse().map_err(|e| format!("{e}"))?),
            "translate" | "t" => Command::Translate,
            "prompt" => Command::Prompt(rest.to_string()),
            "generate" | "g" => Command::Generate,
            "flashcard" | "f" => Command::Flashcard,
            "copy" => Command::Copy,
            "close" => Command::Close,
            "flip" => Command::Flip,
            "dismiss" => Command::Dismiss,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(rest.to_string())
    }
}
