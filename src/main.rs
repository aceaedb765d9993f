//! scopepaint - highlight a file with a TextMate grammar and theme

use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process;

use scopepaint::error::{Error, Result};
use scopepaint::render::{write_spans, write_spans_plain};
use scopepaint::syntax::{tokenize_with, Grammar, Registry};
use scopepaint::Config;

/// What to print for the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Render,
    Tokens,
    Spans,
    Plain,
}

#[derive(Debug)]
struct Args {
    grammar: Option<String>,
    theme: Option<String>,
    mode: Mode,
    file: Option<String>,
}

fn main() {
    setup_tracing();
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn setup_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env("SCOPEPAINT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    // Handle --help and --version
    if let Some(first) = args.first() {
        match first.as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-V" => {
                print_version();
                return Ok(());
            }
            _ => {}
        }
    }

    let config = Config::load()?;
    let mut registry = Registry::new();
    for path in &config.grammar_paths {
        registry.load_grammar_file(path)?;
    }
    for path in &config.theme_paths {
        registry.load_theme_file(path)?;
    }

    if args.iter().any(|a| a == "--list") {
        return print_list(&registry);
    }

    let args = parse_args(&args)?;
    let Some(file) = args.file else {
        print_usage();
        return Err(Error::Message("no input file".to_string()));
    };
    let path = Path::new(&file);
    let text = fs::read_to_string(path)?;

    let grammar = match &args.grammar {
        Some(key) => resolve_grammar(&mut registry, key)?,
        None => match registry.detect_grammar(path) {
            Some(grammar) => grammar.scope_name().to_string(),
            None => {
                tracing::info!(file = %path.display(), "no grammar for file, writing plain text");
                return Ok(write_spans_plain(&mut io::stdout().lock(), &text)?);
            }
        },
    };
    let theme = match &args.theme {
        Some(key) => resolve_theme(&mut registry, key)?,
        None => config.theme.clone(),
    };
    let options = config.highlight_options();
    let mut out = io::stdout().lock();

    match args.mode {
        Mode::Plain => write_spans_plain(&mut out, &text)?,
        Mode::Tokens => {
            let grammar = registry.grammar(&grammar)?;
            print_tokens(&mut out, &grammar, &text, &options.tokenize)?;
        }
        Mode::Spans => {
            let spans = registry.highlight(&grammar, &theme, &text, &options)?;
            for span in &spans {
                let style: Vec<String> = span.style.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
                writeln!(out, "{}..{} {}", span.start, span.end, style.join(" "))?;
            }
        }
        Mode::Render => match registry.highlight(&grammar, &theme, &text, &options) {
            Ok(spans) => write_spans(&mut out, &text, &spans)?,
            Err(Error::Grammar(e)) => {
                tracing::warn!(error = %e, "highlighting failed, writing plain text");
                write_spans_plain(&mut out, &text)?;
            }
            Err(e) => return Err(e),
        },
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Args> {
    let mut parsed = Args {
        grammar: None,
        theme: None,
        mode: Mode::Render,
        file: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-g" | "--grammar" => parsed.grammar = Some(option_value(arg, iter.next())?),
            "-t" | "--theme" => parsed.theme = Some(option_value(arg, iter.next())?),
            "--tokens" => parsed.mode = Mode::Tokens,
            "--spans" => parsed.mode = Mode::Spans,
            "--plain" => parsed.mode = Mode::Plain,
            _ if arg.starts_with('-') => {
                return Err(Error::Message(format!("unknown option: {}", arg)));
            }
            _ => parsed.file = Some(arg.clone()),
        }
    }

    Ok(parsed)
}

fn option_value(option: &str, value: Option<&String>) -> Result<String> {
    value
        .cloned()
        .ok_or_else(|| Error::Message(format!("{} requires a value", option)))
}

/// A key naming an existing file is loaded; anything else is a registry key
fn resolve_grammar(registry: &mut Registry, key: &str) -> Result<String> {
    let path = Path::new(key);
    if path.is_file() {
        return registry.load_grammar_file(path);
    }
    Ok(registry.grammar(key)?.scope_name().to_string())
}

fn resolve_theme(registry: &mut Registry, key: &str) -> Result<String> {
    let path = Path::new(key);
    if path.is_file() {
        return registry.load_theme_file(path);
    }
    registry.theme(key)?;
    Ok(key.to_string())
}

fn print_tokens<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    text: &str,
    options: &scopepaint::syntax::TokenizeOptions,
) -> Result<()> {
    for token in tokenize_with(grammar, text, options)? {
        writeln!(out, "{}..{} {} {:?}", token.start, token.end, token.scope, token.text)?;
    }
    Ok(())
}

fn print_list(registry: &Registry) -> Result<()> {
    println!("Grammars:");
    for key in registry.list_grammars() {
        let grammar = registry.grammar(key)?;
        println!("  {:<16} {} ({})", key, grammar.name(), grammar.file_types().join(", "));
    }
    println!("Themes:");
    for key in registry.list_themes() {
        println!("  {}", key);
    }
    Ok(())
}

fn print_usage() {
    println!("scopepaint {} - TextMate grammar highlighter", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: scopepaint [OPTIONS] FILE");
    println!();
    println!("Options:");
    println!("  -g, --grammar KEY  Grammar scope name, name, or JSON file");
    println!("  -t, --theme KEY    Theme name or JSON file");
    println!("      --tokens       Print scoped tokens");
    println!("      --spans        Print resolved styled spans");
    println!("      --plain        Print the file without styling");
    println!("      --list         List available grammars and themes");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!();
    println!("Settings are read from ~/.scopepaint.toml; set SCOPEPAINT_LOG to adjust logging.");
}

fn print_version() {
    println!("scopepaint {}", env!("CARGO_PKG_VERSION"));
}
