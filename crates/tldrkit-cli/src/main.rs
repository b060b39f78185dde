//! TLDRKit CLI - summarize web pages and YouTube videos from the terminal

mod interactive;
mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal, Write};
use std::time::Duration;
use tldrkit::{Request, Summarizer, Summary, TlsPolicy, DEFAULT_MODEL, TOOL_LLMTXT};
use tracing::error;

/// Environment variable read when `--api-key` is absent
const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Output format for summarize subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// Markdown with YAML frontmatter
    #[default]
    Md,
    /// JSON format
    Json,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

/// TLDRKit - summarize any URL in about 300 words
#[derive(Parser, Debug)]
#[command(name = "tldr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,

    /// Groq API key (prompted with masked input when omitted)
    ///
    /// Prefer GROQ_API_KEY over the flag: flag values are visible in the
    /// process list.
    #[arg(long, global = true, env = API_KEY_ENV, hide_env_values = true)]
    api_key: Option<String>,

    /// Model identifier
    #[arg(long, global = true, default_value = DEFAULT_MODEL)]
    model: String,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Verify TLS certificates for web pages
    #[arg(long, global = true)]
    strict_tls: bool,

    /// Fetch timeout in seconds
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    /// Custom User-Agent for web pages
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Preferred transcript language (repeatable, most preferred first)
    #[arg(long = "lang", global = true, value_name = "CODE")]
    languages: Vec<String>,

    /// Truncate page content to this many characters before prompting
    #[arg(long, global = true, value_name = "N")]
    max_chars: Option<usize>,

    /// Log format: text (default) or json
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Summarize one URL and print the result
    Summarize {
        /// URL to summarize
        url: String,

        /// Output format
        #[arg(long, short, default_value = "md")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    init_tracing(&cli);
    let summarizer = build_summarizer(&cli);

    match &cli.command {
        Some(Commands::Mcp) => {
            let Some(api_key) = cli.api_key.clone() else {
                eprintln!("Error: tldr mcp requires {} or --api-key", API_KEY_ENV);
                std::process::exit(1);
            };
            mcp::run_server(summarizer, api_key).await;
        }
        Some(Commands::Summarize { url, output }) => {
            let api_key = resolve_api_key(cli.api_key.clone());
            run_summarize(&summarizer, url, &api_key, *output).await;
        }
        None => {
            interactive::run(summarizer, cli.api_key.clone()).await;
        }
    }
}

/// Install the tracing subscriber on stderr
///
/// `RUST_LOG` overrides the `-v` levels.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "tldrkit=warn,tldr=warn",
        1 => "tldrkit=info,tldr=info",
        2 => "tldrkit=debug,tldr=debug",
        _ => "tldrkit=trace,tldr=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(io::stderr)
                .init();
        }
    }
}

fn build_summarizer(cli: &Cli) -> Summarizer {
    let mut builder = Summarizer::builder()
        .model(cli.model.as_str())
        .languages(cli.languages.iter().map(String::as_str));

    if let Some(ref base) = cli.api_base {
        builder = builder.api_base(base.as_str());
    }
    if cli.strict_tls {
        builder = builder.tls_policy(TlsPolicy::Verify);
    }
    if let Some(secs) = cli.timeout {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(ref ua) = cli.user_agent {
        builder = builder.user_agent(ua.as_str());
    }
    if let Some(max) = cli.max_chars {
        builder = builder.max_content_chars(max);
    }

    builder.build()
}

/// Use the flag, or prompt when attached to a terminal
fn resolve_api_key(flag: Option<String>) -> String {
    if let Some(key) = flag {
        return key;
    }
    if !io::stdin().is_terminal() {
        eprintln!(
            "Error: {} or --api-key is required when stdin is not a terminal",
            API_KEY_ENV
        );
        std::process::exit(1);
    }
    match interactive::read_secret("Groq API key: ") {
        Ok(Some(key)) => key,
        Ok(None) => std::process::exit(130),
        Err(e) => {
            eprintln!("Error reading API key: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_summarize(summarizer: &Summarizer, url: &str, api_key: &str, output: OutputFormat) {
    let request = Request::new(url, api_key);
    let spinner = interactive::waiting_spinner();
    let result = summarizer.summarize(&request).await;
    spinner.finish_and_clear();

    match result {
        Ok(summary) => match output {
            OutputFormat::Md => writeln_safe(&format_md_with_frontmatter(&summary)),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&summary).unwrap_or_else(|e| {
                    eprintln!("Error serializing summary: {}", e);
                    std::process::exit(1);
                });
                writeln_safe(&json);
            }
        },
        Err(e) => {
            error!(error = %e, url, "Summarization failed");
            eprintln!("Error: {}", e.user_message());
            std::process::exit(1);
        }
    }
}

/// Format summary as markdown with YAML frontmatter
fn format_md_with_frontmatter(summary: &Summary) -> String {
    let mut output = String::new();

    output.push_str("---\n");
    output.push_str(&format!("url: {}\n", yaml_quote(&summary.url)));
    output.push_str(&format!("source: {}\n", summary.source));
    output.push_str(&format!("model: {}\n", yaml_quote(&summary.model)));
    if let Some(ref title) = summary.title {
        output.push_str(&format!("title: {}\n", yaml_quote(title)));
    }
    output.push_str("---\n");
    output.push_str(&summary.text);

    output
}

/// Double-quoted YAML scalar
fn yaml_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            c if c.is_control() => quoted.push_str(&format!("\\u{:04x}", c as u32)),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tldrkit::SourceKind;

    fn summary() -> Summary {
        Summary {
            text: "A short summary.".to_string(),
            url: "https://example.com/post".to_string(),
            source: SourceKind::Generic,
            model: "llama-3.1-8b-instant".to_string(),
            title: None,
        }
    }

    #[test]
    fn test_format_md_basic() {
        let output = format_md_with_frontmatter(&summary());

        assert!(output.starts_with("---\n"));
        assert!(output.contains("url: \"https://example.com/post\"\n"));
        assert!(output.contains("source: generic\n"));
        assert!(output.contains("model: \"llama-3.1-8b-instant\"\n"));
        assert!(!output.contains("title:"));
        assert!(output.ends_with("---\nA short summary."));
    }

    #[test]
    fn test_format_md_with_title() {
        let summary = Summary {
            source: SourceKind::Video,
            title: Some("A talk".to_string()),
            ..summary()
        };

        let output = format_md_with_frontmatter(&summary);

        assert!(output.contains("source: video\n"));
        assert!(output.contains("title: \"A talk\"\n"));
    }

    #[test]
    fn test_format_md_title_with_yaml_syntax() {
        let summary = Summary {
            source: SourceKind::Video,
            title: Some("Part 1: Intro # \"live\"".to_string()),
            ..summary()
        };

        let output = format_md_with_frontmatter(&summary);

        assert!(output.contains("title: \"Part 1: Intro # \\\"live\\\"\"\n"));
    }

    #[test]
    fn test_yaml_quote() {
        assert_eq!(yaml_quote("plain"), "\"plain\"");
        assert_eq!(yaml_quote("a: b"), "\"a: b\"");
        assert_eq!(yaml_quote("back\\slash"), "\"back\\\\slash\"");
        assert_eq!(yaml_quote("two\nlines"), "\"two\\nlines\"");
        assert_eq!(yaml_quote("bell\u{7}"), "\"bell\\u0007\"");
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::parse_from([
            "tldr",
            "summarize",
            "https://example.com",
            "--lang",
            "de",
            "--lang",
            "en",
            "--strict-tls",
            "-vv",
            "--output",
            "json",
        ]);

        assert_eq!(cli.languages, vec!["de", "en"]);
        assert!(cli.strict_tls);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.model, DEFAULT_MODEL);
        assert!(matches!(
            cli.command,
            Some(Commands::Summarize {
                output: OutputFormat::Json,
                ..
            })
        ));
    }

    #[test]
    fn test_cli_defaults_to_interactive() {
        let cli = Cli::parse_from(["tldr"]);
        assert!(cli.command.is_none());
        assert!(!cli.llmtxt);
    }

    #[test]
    fn test_api_key_reads_environment() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "api_key")
            .unwrap();
        assert_eq!(arg.get_env(), Some(std::ffi::OsStr::new(API_KEY_ENV)));
        assert!(arg.is_hide_env_values_set());

        let cli = Cli::parse_from(["tldr", "mcp", "--api-key", "gsk_flag"]);
        assert_eq!(cli.api_key.as_deref(), Some("gsk_flag"));
    }

    #[test]
    fn test_build_summarizer_uses_model_flag() {
        let cli = Cli::parse_from(["tldr", "--model", "llama-3.3-70b-versatile"]);
        assert_eq!(build_summarizer(&cli).model(), "llama-3.3-70b-versatile");
    }
}
