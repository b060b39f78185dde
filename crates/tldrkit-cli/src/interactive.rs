//! Interactive terminal front end
//!
//! Prompts for the API key, then loops over URLs. Each URL is one shell
//! submission; the rendered output follows the shell state. An empty key
//! is asked for again instead of being resubmitted.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;
use tldrkit::{Shell, ShellState, Summarizer};

const TITLE: &str = "TLDR: summarize text from YouTube or any website";

/// Run the prompt loop until `quit`, `exit` or EOF
pub async fn run(summarizer: Summarizer, api_key: Option<String>) {
    eprintln!("{}", TITLE);

    let mut api_key = match api_key {
        Some(key) => key,
        None => match read_api_key() {
            Ok(Some(key)) => key,
            Ok(None) => return,
            Err(e) => {
                eprintln!("Error reading API key: {}", e);
                std::process::exit(1);
            }
        },
    };

    let mut shell = Shell::new(summarizer);

    loop {
        eprint!("URL> ");
        let _ = io::stderr().flush();

        let url = match read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading stdin: {}", e);
                break;
            }
        };

        let url = url.trim();
        if is_quit(url) {
            break;
        }

        let mut spinner: Option<ProgressBar> = None;
        let state = shell
            .submit(&api_key, url, |state| match state {
                ShellState::Running => spinner = Some(waiting_spinner()),
                _ => {
                    if let Some(s) = spinner.take() {
                        s.finish_and_clear();
                    }
                }
            })
            .await;

        render(state);

        if needs_new_key(state, &api_key) {
            api_key = match read_api_key() {
                Ok(Some(key)) => key,
                Ok(None) => break,
                Err(e) => {
                    eprintln!("Error reading API key: {}", e);
                    break;
                }
            };
        }
    }
}

/// The shell stopped for input and the key is what is missing
fn needs_new_key(state: &ShellState, api_key: &str) -> bool {
    matches!(state, ShellState::AwaitingInput { .. }) && api_key.trim().is_empty()
}

fn is_quit(input: &str) -> bool {
    matches!(input, "quit" | "exit")
}

fn render(state: &ShellState) {
    match state {
        ShellState::Success(summary) => {
            if let Some(ref title) = summary.title {
                println!("# {}\n", title);
            }
            println!("{}\n", summary.text);
        }
        ShellState::AwaitingInput { message } => eprintln!("{}", message),
        ShellState::Failed { message, .. } => eprintln!("{}", message),
        ShellState::Idle | ShellState::Running => {}
    }
}

/// Spinner shown while the pipeline runs
pub fn waiting_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
    }
    spinner.set_message("Waiting...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Masked prompt on a terminal, plain line read otherwise
fn read_api_key() -> io::Result<Option<String>> {
    if io::stdin().is_terminal() {
        return read_secret("Groq API key: ");
    }

    read_line()
}

/// One trimmed line from stdin, `None` at EOF
fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Read a secret in raw mode, echoing `*` per character
///
/// Returns `None` on Esc or Ctrl-C.
pub fn read_secret(prompt: &str) -> io::Result<Option<String>> {
    let mut stderr = io::stderr();
    write!(stderr, "{}", prompt)?;
    stderr.flush()?;

    enable_raw_mode()?;
    let result = read_masked(&mut stderr);
    disable_raw_mode()?;

    writeln!(stderr)?;
    result
}

fn read_masked(out: &mut impl Write) -> io::Result<Option<String>> {
    let mut secret = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => return Ok(Some(secret)),
            KeyCode::Esc => return Ok(None),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None)
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(out, "\x08 \x08")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                write!(out, "*")?;
            }
            _ => {}
        }
        out.flush()?;
    }
}
