use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courseloom::cli::commands::generate::GenerateOptions;
use courseloom::{ConfigLoader, CourseSpec};

#[derive(Parser)]
#[command(name = "courseloom")]
#[command(
    version,
    about = "AI-driven course outline generator with scholarly reference search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a course outline document
    Generate {
        #[arg(long, help = "Course title")]
        title: String,
        #[arg(
            long,
            default_value = "",
            help = "Course description (drafted automatically when omitted)"
        )]
        description: String,
        #[arg(long, help = "Instructor name, e.g. 'Dr. Juan Dela Cruz'")]
        instructor: String,
        #[arg(
            long,
            help = "Target students, e.g. '3rd year BS Computer Science students'"
        )]
        audience: String,
        #[arg(long, default_value = "3", help = "Credit units")]
        credit_units: u32,
        #[arg(long, default_value = "54", help = "Total hours for the semester")]
        total_hours: u32,
        #[arg(long, default_value = "3", help = "Class hours per week")]
        weekly_hours: u32,
        #[arg(long, default_value = "5", help = "Number of topics to plan")]
        topics: usize,
        #[arg(
            long,
            default_value = "APA",
            help = "Citation style: APA, MLA, Chicago, Harvard"
        )]
        citation_style: String,
        #[arg(long, help = "Output title (default: derived from course title)")]
        output: Option<String>,
        #[arg(long, help = "Model override for this run")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mCourseLoom encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }

        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Generate {
            title,
            description,
            instructor,
            audience,
            credit_units,
            total_hours,
            weekly_hours,
            topics,
            citation_style,
            output,
            model,
        } => {
            let config = ConfigLoader::load()?;
            let options = GenerateOptions {
                spec: CourseSpec {
                    title,
                    description,
                    instructor,
                    target_audience: audience,
                    credit_units,
                    total_hours,
                    weekly_hours,
                    citation_style,
                    topic_count: topics,
                },
                output_title: output,
                model,
            };
            courseloom::cli::commands::generate::run(config, options)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                courseloom::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                courseloom::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                courseloom::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
