//! CfImage CLI - JSON bridge for non-Rust callers
//!
//! Commands: render, src, srcset, sizes
//! Outputs JSON to stdout, logs to stderr
//! Returns non-zero on bad input

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cfimage_core::{
    build_sizes, build_src_set, image_src, resolve_max_width, strip_path, ImageOptions,
    RenderError, RenderMode, Renderer, ENGINE_VERSION,
};

#[derive(Parser)]
#[command(name = "cfimage-cli")]
#[command(about = "CfImage CLI - Responsive image URL builder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Render mode (production or development), defaults to $CFIMAGE_MODE
    #[arg(short, long, global = true)]
    mode: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an <img> element from ImageProps
    Render {
        /// JSON payload (ImageProps)
        #[arg(short, long, conflicts_with = "payload_file")]
        payload: Option<String>,

        /// File holding the JSON payload
        #[arg(short = 'f', long)]
        payload_file: Option<PathBuf>,

        /// Emit the HTML tag instead of JSON attributes
        #[arg(long)]
        html: bool,
    },

    /// Build the rewritten source URL
    Src {
        /// Image path
        #[arg(short, long)]
        src: String,

        /// JSON payload (ImageOptions)
        #[arg(short, long)]
        options: Option<String>,
    },

    /// Build the srcset attribute
    Srcset {
        /// Image path
        #[arg(short, long)]
        src: String,

        /// JSON payload (ImageOptions)
        #[arg(short, long)]
        options: String,
    },

    /// Build the sizes attribute
    Sizes {
        /// JSON payload (ImageOptions)
        #[arg(short, long)]
        options: String,
    },
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let cli = Cli::parse();

    let mode = match cli.mode.as_deref().map(str::parse::<RenderMode>) {
        Some(Ok(mode)) => mode,
        Some(Err(e)) => return failure(&e, ExitCode::from(2)),
        None => RenderMode::from_env(),
    };
    debug!(%mode, "Resolved render mode");

    match cli.command {
        Commands::Render { payload, payload_file, html } => {
            let renderer = Renderer::new(mode);
            let result = match (payload, payload_file) {
                (Some(payload), _) => renderer.render_json(&payload),
                (None, Some(path)) => renderer.render_file(&path),
                (None, None) => {
                    println!(r#"{{"success": false, "error": "Either --payload or --payload-file is required"}}"#);
                    return ExitCode::FAILURE;
                }
            };

            match result {
                Ok(element) if html => {
                    println!("{}", element.to_html());
                    ExitCode::SUCCESS
                }
                Ok(element) => {
                    let output = serde_json::json!({
                        "success": true,
                        "mode": mode,
                        "engine_version": ENGINE_VERSION,
                        "element": element,
                    });
                    print_json(&output)
                }
                Err(e @ RenderError::PayloadIo(_)) => failure(&e, ExitCode::FAILURE),
                Err(e) => failure(&e, ExitCode::from(2)),
            }
        }

        Commands::Src { src, options } => {
            let options = match options.as_deref().map(parse_options).transpose() {
                Ok(o) => o,
                Err(e) => return failure(&e, ExitCode::from(2)),
            };
            let url = image_src(strip_path(&src), options.as_ref());
            print_json(&serde_json::json!({ "success": true, "src": url }))
        }

        Commands::Srcset { src, options } => {
            let options = match parse_options(&options) {
                Ok(o) => o,
                Err(e) => return failure(&e, ExitCode::from(2)),
            };
            let src_set = build_src_set(strip_path(&src), &options);
            print_json(&serde_json::json!({ "success": true, "srcSet": src_set }))
        }

        Commands::Sizes { options } => {
            let options = match parse_options(&options) {
                Ok(o) => o,
                Err(e) => return failure(&e, ExitCode::from(2)),
            };
            let widths = options.widths.as_deref().unwrap_or_default();
            let sizes = build_sizes(widths, resolve_max_width(&options));
            print_json(&serde_json::json!({ "success": true, "sizes": sizes }))
        }
    }
}

fn parse_options(payload: &str) -> Result<ImageOptions, RenderError> {
    Ok(serde_json::from_str(payload)?)
}

fn print_json(value: &serde_json::Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn failure(error: &RenderError, code: ExitCode) -> ExitCode {
    let output = serde_json::json!({
        "success": false,
        "error": error.to_string(),
    });
    println!("{}", output);
    code
}
