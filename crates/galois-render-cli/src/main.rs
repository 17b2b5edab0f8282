use std::{io::Read, path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use tracing::{Level, warn};

use galois_render::{
    EngineSlot, ErrorSlot, FieldKey, FieldKind, FieldState, MathCoreEngine, ResultView,
    Vocabulary, complete_splitting_field, normalize, normalize_explained, plan, preview, submit,
    to_markup,
};

mod config_file;
mod explain;
mod html;
mod http;

use config_file::{Config, ConfigError, load_config_file};
use http::HttpSolver;

/// Normalizes polynomials and typesets Galois computation results
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Normalizes polynomials and typesets Galois computation results",
    long_about = None
)]
struct Args {
    /// Reads settings from a TOML file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Logs what the pipeline is doing
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Makes every implicit multiplication explicit
    Normalize {
        /// The polynomial; read from stdin if omitted
        expr: Option<String>,

        /// Shows where multiplication signs were inserted, and why
        #[arg(long)]
        explain: bool,
    },
    /// Prints the LaTeX markup for an expression
    Markup {
        /// The expression; read from stdin if omitted
        expr: Option<String>,

        /// Treats the expression as solver output rather than user input
        #[arg(long)]
        result: bool,
    },
    /// Picks a font size and line breaks for a polynomial
    Plan {
        /// The polynomial; read from stdin if omitted
        expr: Option<String>,

        /// Container width in pixels
        #[arg(long, value_name = "PX")]
        width: Option<f32>,

        /// Emits HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Sends a polynomial to the solver and lays out every field of the reply
    Solve {
        /// The polynomial; read from stdin if omitted
        expr: Option<String>,

        /// Base URL of the solver service
        #[arg(long, value_name = "URL")]
        url: Option<String>,

        /// Container width in pixels
        #[arg(long, value_name = "PX")]
        width: Option<f32>,

        /// Emits HTML instead of plain text
        #[arg(long)]
        html: bool,

        /// Also computes the splitting field
        #[arg(long)]
        splitting_field: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let config = match args.config {
        Some(ref path) => load_config_file(path).unwrap_or_else(|e| exit_config_error(e)),
        None => Config::default(),
    };

    match args.command {
        Command::Normalize { expr, explain } => {
            let raw = expr.unwrap_or_else(read_stdin);
            if explain {
                print_explained(raw.trim());
            } else {
                println!("{}", normalize(raw.trim()));
            }
        }
        Command::Markup { expr, result } => {
            let raw = expr.unwrap_or_else(read_stdin);
            let markup = if result {
                to_markup(raw.trim(), Vocabulary::Result)
            } else {
                preview(&raw)
            };
            println!("{markup}");
        }
        Command::Plan { expr, width, html } => {
            let raw = expr.unwrap_or_else(read_stdin);
            let width = width.unwrap_or(config.container_width);
            let measurer = config.render.measurer(engine_slot());
            let planned = plan(
                &measurer,
                &normalize(raw.trim()),
                FieldKind::Polynomial,
                width,
                &config.render,
            )
            .await;
            let state = FieldState::from(planned);
            print_fields(&[(FieldKey::Polynomial, state)], html);
        }
        Command::Solve {
            expr,
            url,
            width,
            html,
            splitting_field,
        } => {
            let raw = expr.unwrap_or_else(read_stdin);
            let width = width.unwrap_or(config.container_width);
            let url = url.as_deref().unwrap_or(&config.solver_url);
            solve(&config, url, &raw, width, html, splitting_field).await;
        }
    }
}

async fn solve(config: &Config, url: &str, raw: &str, width: f32, html: bool, splitting: bool) {
    let solver = HttpSolver::new(url, Duration::from_secs(config.solver_timeout_secs));
    let mut errors = ErrorSlot::default();
    let Some(mut computation) = errors.catch(submit(&solver, raw, splitting).await) else {
        exit_display_error(&mut errors);
    };
    if splitting {
        // The rest of the reply is still worth showing without the splitting field.
        if let Err(error) = complete_splitting_field(&solver, &mut computation).await {
            eprintln!("Splitting field unavailable: {error}");
        }
    }

    let measurer = Arc::new(config.render.measurer(engine_slot()));
    let mut view = ResultView::new(measurer, Arc::new(config.render.clone()));
    view.show(&computation, width);
    let states = view.settled().await;
    print_fields(&states, html);
}

fn engine_slot() -> Arc<EngineSlot> {
    match MathCoreEngine::new() {
        Ok(engine) => Arc::new(EngineSlot::with_engine(engine)),
        Err(e) => {
            warn!(error = %e, "typesetting engine unavailable, widths will be estimated");
            Arc::new(EngineSlot::empty())
        }
    }
}

fn print_explained(raw: &str) {
    let (normalized, insertions) = normalize_explained(raw);
    if let Some(report) = explain::insertion_report("<input>", &insertions, true) {
        report
            .eprint(("<input>", ariadne::Source::from(raw)))
            .unwrap_or_else(|e| exit_io_error(e));
    }
    println!("{normalized}");
}

fn print_fields(states: &[(FieldKey, FieldState)], as_html: bool) {
    if as_html {
        let engine = MathCoreEngine::new().ok();
        let mut output = String::new();
        for (key, state) in states {
            if let Some(plan) = state.plan() {
                html::render_field(&mut output, &field_name(*key), plan, engine.as_ref());
            }
        }
        print!("{output}");
        return;
    }
    for (key, state) in states {
        let Some(plan) = state.plan() else {
            println!("{}: (empty)", field_name(*key));
            continue;
        };
        let mut notes = format!("{}px", plan.font_size);
        if !plan.fits {
            notes.push_str(", overflows");
        }
        if matches!(state, FieldState::FallbackSized(_)) {
            notes.push_str(", estimated");
        }
        println!("{} ({notes}):", field_name(*key));
        for line in &plan.lines {
            println!("    {line}");
        }
    }
}

fn field_name(key: FieldKey) -> String {
    match key {
        FieldKey::Polynomial => "polynomial".to_string(),
        FieldKey::Group => "group".to_string(),
        FieldKey::FieldDegree => "field-degree".to_string(),
        FieldKey::Root(index) => format!("root-{}", index + 1),
        FieldKey::SplittingField => "splitting-field".to_string(),
    }
}

fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut buffer) {
        exit_io_error(e);
    }
    buffer
}

fn exit_display_error(errors: &mut ErrorSlot) -> ! {
    if let Some(error) = errors.dismiss() {
        eprintln!("Error: {error}");
        if let Some(reducible) = error.reducible {
            eprintln!("Factorization: {}", reducible.polynomial);
        }
    }
    std::process::exit(2);
}

fn exit_config_error(e: ConfigError) -> ! {
    eprintln!("Config error: {e}");
    match e {
        ConfigError::Io(_) => std::process::exit(1),
        ConfigError::Parse(_) => std::process::exit(2),
    }
}

fn exit_io_error(e: std::io::Error) -> ! {
    eprintln!("IO Error: {e}");
    std::process::exit(1);
}
