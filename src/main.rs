//! Track Link CLI
//!
//! Usage:
//!   track-link [OPTIONS] <COMMAND>
//!
//! Commands:
//!   follow   Render if needed and open the artifact of a link
//!   export   Print the exported form of a link
//!   publish  Copy an artifact into a publish directory
//!   compose  Build a link from coordinates and a filename
//!   check    Validate a link

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use track_link::{
    parse, parse_bracket_link, textio, Coordinate, EngineConfig, Error, ExportFormat, LinkEngine,
    ParseError, PublishContext, TrackLink,
};

#[derive(Parser)]
#[command(name = "track-link")]
#[command(about = "Resolve, export and publish links to rendered map tracks")]
struct Cli {
    /// Configuration file (TOML format)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the artifact if needed and show it
    Follow {
        /// Link path, e.g. 'track:(48.1 11.5)(48.2 11.6)walk.svg'
        link: String,

        /// Directory of the document containing the link
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Print the link as it appears in an exported document
    Export {
        /// Link path or bracketed link '[[track:...][description]]'
        link: String,

        /// Output format: html, latex or plain
        #[arg(short, long, default_value = "html")]
        format: ExportFormat,

        /// Link description (overrides the bracketed one)
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// Directory of the exported document
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Copy an artifact into a publish directory, relinking cached tiles
    Publish {
        /// Rendered artifact to publish
        artifact: PathBuf,

        /// Destination directory
        #[arg(short, long)]
        publish_dir: PathBuf,

        /// Cache directory the published copy should reference
        #[arg(long)]
        cache_dir: Option<PathBuf>,
    },

    /// Build a bracketed link from its parts
    Compose {
        /// Track point as 'LAT,LON' (repeatable, in order)
        #[arg(short, long = "point", required = true, value_parser = parse_point)]
        points: Vec<Coordinate>,

        /// Artifact filename; the extension is added when missing
        #[arg(short, long)]
        file: String,

        /// Link description
        #[arg(short = 'D', long)]
        description: Option<String>,
    },

    /// Validate a link and report errors
    Check {
        /// Link path or bracketed link
        link: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration
    let config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };
    textio::set_newline_mode(config.newline);
    let engine = LinkEngine::new(config);

    let report_source = match &cli.command {
        Command::Follow { link, .. } | Command::Export { link, .. } | Command::Check { link } => {
            link.clone()
        }
        Command::Publish { .. } | Command::Compose { .. } => String::new(),
    };

    let result = match cli.command {
        Command::Follow { link, dir } => engine.follow(&link, &dir).map(|_| ()),
        Command::Export {
            link,
            format,
            description,
            dir,
        } => run_export(&engine, &link, format, description, &dir),
        Command::Publish {
            artifact,
            publish_dir,
            cache_dir,
        } => {
            let ctx = PublishContext {
                source_artifact: artifact,
                publish_dir,
                cache_dir: cache_dir.unwrap_or_else(|| engine.config().cache_dir.clone()),
            };
            engine.publish(&ctx).map(|target| println!("{}", target.display()))
        }
        Command::Compose {
            points,
            file,
            description,
        } => match TrackLink::new(points, file, description) {
            Some(link) => {
                println!("{}", link);
                Ok(())
            }
            None => {
                eprintln!(
                    "Error: filename must be non-empty, free of brackets and stay below the document directory"
                );
                std::process::exit(1);
            }
        },
        Command::Check { link } => match parse_any(&link) {
            Ok(parsed) => {
                println!(
                    "ok: {} point(s), file {}",
                    parsed.coordinates().len(),
                    parsed.filename()
                );
                Ok(())
            }
            Err(e) => Err(Error::Parse(e)),
        },
    };

    if let Err(e) = result {
        match &e {
            Error::Parse(parse_err) => eprint!("{}", parse_err.format(&report_source, "<link>")),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }
}

fn run_export(
    engine: &LinkEngine,
    link: &str,
    format: ExportFormat,
    description: Option<String>,
    dir: &Path,
) -> Result<(), Error> {
    let mut parsed = parse_any(link)?;
    if description.is_some() {
        parsed = parsed.with_description(description);
    }
    let out = engine.export_link(&parsed, format, dir)?;
    println!("{}", out);
    Ok(())
}

/// Accept either the bare link path or the bracketed document form
fn parse_any(link: &str) -> Result<TrackLink, ParseError> {
    if link.starts_with("[[") {
        parse_bracket_link(link)
    } else {
        parse(link)
    }
}

fn parse_point(s: &str) -> Result<Coordinate, String> {
    let mut parts = s.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
    let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected 'LAT,LON', got '{}'", s));
    };
    let lat: f64 = lat.parse().map_err(|_| format!("invalid latitude '{}'", lat))?;
    let lon: f64 = lon.parse().map_err(|_| format!("invalid longitude '{}'", lon))?;
    Ok(Coordinate::new(lat, lon))
}

fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(if verbose {
        tracing::Level::DEBUG.into()
    } else {
        tracing::Level::INFO.into()
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
