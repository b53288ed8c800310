//! `dataconv` CLI: convert documents between JSON, XML, YAML and TOML.
//!
//! ## Usage
//!
//! ```sh
//! # JSON on stdin to YAML on stdout
//! echo '{"name":"Alice","age":30}' | dataconv convert --from json --to yaml
//!
//! # Formats inferred from file extensions
//! dataconv convert -i config.yaml -o config.toml
//!
//! # XML output under a custom root element
//! dataconv convert -i data.json --to xml --root catalog
//!
//! # List supported formats
//! dataconv formats
//! ```

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use dataconv_core::{ConvertOptions, Converter, Format};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(
    name = "dataconv",
    version,
    about = "Convert structured documents between JSON, XML, YAML and TOML"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document from one format to another
    Convert {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Source format (inferred from the input extension if omitted)
        #[arg(long)]
        from: Option<String>,
        /// Target format (inferred from the output extension if omitted)
        #[arg(long)]
        to: Option<String>,
        /// Root element name for XML output
        #[arg(long)]
        root: Option<String>,
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// List supported formats
    Formats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            from,
            to,
            root,
            compact,
        } => {
            let from = format_token(from, input.as_deref(), "source", "--from", "-i")?;
            let to = format_token(to, output.as_deref(), "target", "--to", "-o")?;

            let mut options = ConvertOptions::default().with_compact_json(compact);
            if let Some(root) = root {
                options = options.with_xml_root(root);
            }
            let converter = Converter::new(options);

            let content = read_input(input.as_deref())?;
            let converted = converter
                .convert(&content, &from, &to)
                .with_context(|| format!("Failed to convert {from} to {to}"))?;
            write_output(output.as_deref(), &converted)?;
            info!(
                from = %from,
                to = %to,
                input = input.as_deref().unwrap_or("<stdin>"),
                output = output.as_deref().unwrap_or("<stdout>"),
                "converted document"
            );
        }
        Commands::Formats => {
            for format in Format::ALL {
                let aliases = format.aliases().join(", ");
                let aliases = if aliases.is_empty() {
                    "-".to_string()
                } else {
                    aliases
                };
                println!("{:<6} {:<8} {}", format.name(), aliases, format.media_type());
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so they never mix with converted output on stdout.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Pick the format token for one side: the explicit flag wins, then the
/// file extension. An explicit token is passed through unchecked so the
/// engine reports unknown formats itself.
fn format_token(
    explicit: Option<String>,
    path: Option<&str>,
    side: &str,
    flag: &str,
    path_flag: &str,
) -> Result<String> {
    if let Some(token) = explicit {
        return Ok(token);
    }
    let path = path.with_context(|| {
        format!("Cannot infer the {side} format: pass {flag} or a {path_flag} file with a known extension")
    })?;
    let format = Format::from_extension(Path::new(path)).with_context(|| {
        format!("Cannot infer the {side} format from '{path}': pass {flag}")
    })?;
    debug!(%format, path, "inferred {side} format from extension");
    Ok(format.name().to_string())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    let content = with_trailing_newline(content);
    match path {
        Some(path) => {
            std::fs::write(path, content.as_ref())
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// JSON output has no final newline; files and terminals expect one.
fn with_trailing_newline(content: &str) -> std::borrow::Cow<'_, str> {
    if content.is_empty() || content.ends_with('\n') {
        content.into()
    } else {
        format!("{content}\n").into()
    }
}
