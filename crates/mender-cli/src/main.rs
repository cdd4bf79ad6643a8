use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use mender_browser::DEFAULT_DEBUGGING_PORT;
use mender_cli::commands;
use mender_cli::commands::login::LoginArgs;
use mender_cli::{DEFAULT_WEIGHT_FILE, OutputFormat, PersistMode, SessionOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mender")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Self-healing element locator for UI test automation",
    long_about = "Mender resolves logical form fields (username, password, login_button) to live \
                  page elements using a learned, score-ranked list of selectors, falling back to \
                  built-in guesses when every learned selector has drifted."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Path to the selector weight file
    #[arg(
        short,
        long,
        global = true,
        env = "MENDER_WEIGHTS",
        default_value = DEFAULT_WEIGHT_FILE
    )]
    weights: PathBuf,
}

#[derive(Args)]
struct ResolverArgs {
    /// JSON file replacing the built-in fallback selectors
    #[arg(long, env = "MENDER_FALLBACK")]
    fallback: Option<PathBuf>,

    /// Bounded wait per learned selector, in milliseconds
    #[arg(long, env = "MENDER_TIMEOUT_MS", default_value_t = mender_core::resolver::DEFAULT_PROBE_TIMEOUT_MS)]
    timeout_ms: u64,

    /// When to write learned weights back to the weight file
    #[arg(long, value_enum, default_value = "end")]
    persist: PersistMode,
}

#[derive(Args)]
struct BrowserArgs {
    /// Chrome remote debugging port to attach to
    #[arg(long, env = "MENDER_CDP_PORT", default_value_t = DEFAULT_DEBUGGING_PORT)]
    port: u16,

    /// Navigate to this URL before resolving
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show learned selector weights, ranked per field
    Weights {
        /// Only show this field type
        #[arg(long)]
        field: Option<String>,
    },

    /// Rank the learned selectors for one field type
    Rank {
        /// Field type, e.g. username
        #[arg(value_name = "FIELD")]
        field: String,
    },

    /// Show the fallback selectors used when no learned selector matches
    Fallback {
        /// JSON file replacing the built-in fallback selectors
        #[arg(long, env = "MENDER_FALLBACK")]
        fallback: Option<PathBuf>,

        /// Only show this field type
        #[arg(long)]
        field: Option<String>,
    },

    /// Resolve fields against a running Chrome and learn from the result
    Resolve {
        /// Field types to resolve, in order
        #[arg(value_name = "FIELD", required = true)]
        fields: Vec<String>,

        #[command(flatten)]
        browser: BrowserArgs,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Fill in and submit a login form in a running Chrome
    Login {
        /// Value typed into the username field
        #[arg(long)]
        username: String,

        /// Value typed into the password field
        #[arg(long, env = "MENDER_PASSWORD", hide_env_values = true)]
        password: String,

        /// Text expected on the page after submitting
        #[arg(long)]
        expect: Option<String>,

        #[command(flatten)]
        browser: BrowserArgs,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  \
                            bash: mender completion --shell bash >> ~/.bashrc\n  \
                            zsh:  mender completion --shell zsh > \"${fpath[1]}/_mender\"\n  \
                            fish: mender completion --shell fish > ~/.config/fish/completions/mender.fish")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

impl ResolverArgs {
    fn session_options(self, weights: PathBuf) -> SessionOptions {
        SessionOptions {
            weights,
            fallback: self.fallback,
            timeout_ms: self.timeout_ms,
            persist: self.persist,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Weights { field } => {
            commands::weights::execute(&cli.weights, field.as_deref(), cli.format)
        }
        Commands::Rank { field } => commands::rank::execute(&cli.weights, &field, cli.format),
        Commands::Fallback { fallback, field } => {
            commands::fallback::execute(fallback.as_deref(), field.as_deref(), cli.format)
        }
        Commands::Resolve {
            fields,
            browser,
            resolver,
        } => {
            let options = resolver.session_options(cli.weights);
            commands::resolve::execute(
                &options,
                &fields,
                browser.url.as_deref(),
                browser.port,
                cli.format,
            )
        }
        Commands::Login {
            username,
            password,
            expect,
            browser,
            resolver,
        } => {
            let options = resolver.session_options(cli.weights);
            commands::login::execute(
                &options,
                LoginArgs {
                    username: &username,
                    password: &password,
                    url: browser.url.as_deref(),
                    expect: expect.as_deref(),
                    port: browser.port,
                },
            )
        }
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("mender=debug,mender_cli=debug,mender_core=debug,mender_browser=debug")
    } else {
        EnvFilter::new("mender=info,mender_cli=info,mender_core=info,mender_browser=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
