use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, ValueEnum};
use reply_render::Config;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reply-render")]
#[command(about = "Render an AI assistant reply as text, HTML, Typst or PDF")]
struct Cli {
    /// Reply file to render (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Output file (html and pdf default to `<prefix>-<millis>.<ext>`)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML export config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Document title, overriding the config
    #[arg(long)]
    title: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Html,
    Typst,
    Pdf,
}

impl Format {
    fn extension(self) -> &'static str {
        match self {
            Format::Text => "txt",
            Format::Html => "html",
            Format::Typst => "typ",
            Format::Pdf => "pdf",
        }
    }

    /// Standalone documents get a file by default; the rest print to stdout.
    fn writes_file(self) -> bool {
        matches!(self, Format::Html | Format::Pdf)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path).map_err(|e| e.to_string())?,
        None => Config::compiled_default(),
    };
    if let Some(title) = cli.title {
        config.document.title = title;
    }

    let reply = read_input(cli.input.as_deref())?;
    let doc = reply_render::parse(&reply);

    let bytes = match cli.format {
        Format::Text => reply_render::to_plain_text(&doc).into_bytes(),
        Format::Html => reply_render::to_html(&doc, &config).into_bytes(),
        Format::Typst => reply_render::to_typst(&doc, &config).into_bytes(),
        Format::Pdf => reply_render::document_to_pdf(&doc, &config).map_err(|e| e.to_string())?,
    };

    let output = cli.output.or_else(|| {
        cli.format
            .writes_file()
            .then(|| PathBuf::from(config.export_file_name(unix_millis(), cli.format.extension())))
    });

    match output {
        Some(path) => {
            fs::write(&path, bytes)
                .map_err(|e| format!("writing {}: {}", path.display(), e))?;
            println!("Created {}", path.display());
        }
        None => io::stdout()
            .write_all(&bytes)
            .map_err(|e| format!("writing stdout: {}", e))?,
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String, String> {
    match input {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| format!("reading {}: {}", path.display(), e)),
        _ => io::read_to_string(io::stdin()).map_err(|e| format!("reading stdin: {}", e)),
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
