// ABOUTME: Main application orchestration for the actparse CLI
// ABOUTME: Coordinates between CLI arguments, configuration, and command execution

use anyhow::Result;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use super::commands;
use super::{Args, Commands, Config};

pub struct App {
    config: Config,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Initialize logging based on configuration. Logs go to stderr so
    /// rendered output on stdout stays machine readable.
    pub fn init_logging(&self, verbose: bool, no_color: bool) -> Result<()> {
        let log_level = if verbose {
            "debug"
        } else {
            &self.config.logging.level
        };

        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

        match self.config.logging.format.as_str() {
            "compact" => {
                tracing_subscriber::fmt()
                    .compact()
                    .with_env_filter(env_filter)
                    .with_writer(std::io::stderr)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .init();
            }
            _ => {
                tracing_subscriber::fmt()
                    .with_env_filter(env_filter)
                    .with_writer(std::io::stderr)
                    .with_ansi(!no_color)
                    .with_target(false)
                    .init();
            }
        }

        debug!("Logging initialized with level: {}", log_level);
        Ok(())
    }

    /// Run the application with parsed arguments
    pub async fn run(&mut self, args: Args) -> Result<()> {
        self.init_logging(args.verbose, args.no_color)?;

        info!("Starting actparse v{}", env!("CARGO_PKG_VERSION"));
        debug!("Configuration loaded from: {:?}", args.config);

        match args.command {
            Commands::Validate { workflow, strict } => {
                commands::validate_workflow(workflow, strict || self.config.strict, &self.config)
                    .await
            }

            Commands::List { workflow } => commands::list_jobs(workflow, &self.config).await,

            Commands::Show {
                workflow,
                job,
                format,
                output,
                dry_run,
                secrets,
                secret_file,
            } => {
                let mut secret_values = match secret_file {
                    Some(path) => Args::load_secret_file(&path)?,
                    None => Default::default(),
                };
                secret_values.extend(Args::parse_secrets(&secrets)?);

                commands::show_workflow(
                    workflow,
                    job,
                    format,
                    output,
                    dry_run,
                    secret_values,
                    &self.config,
                )
                .await
            }
        }
    }
}
