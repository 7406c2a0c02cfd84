use banner_server::banner::selector::Viewer;
use banner_server::cli::manage_config::ConfigurationChanges;
use banner_server::cli_error::CliError;
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use log::{error, warn};

fn main() {
    let args = CliArgs::parse();
    let dotenv_result = dotenv();

    let env = env_logger::Env::new().filter_or(
        "RUST_LOG",
        match args.global_opts.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        },
    );
    env_logger::Builder::from_env(env).init();
    if let Err(e) = dotenv_result {
        warn!("Could not read .env file: {}", e);
    }

    if let Err(e) = run_command(args.command) {
        error!("{}", e);
        std::process::exit(e.exit_code());
    }
}

fn run_command(command: Command) -> Result<(), CliError> {
    match command {
        Command::Serve => banner_server::web::serve(),
        Command::MigrateDb => banner_server::cli::database_migration::run_migrations(),
        Command::ShowConfig => banner_server::cli::manage_config::print_configuration(),
        Command::Render { guest } => banner_server::cli::manage_config::render_banner(if guest {
            Viewer::Guest
        } else {
            Viewer::Authenticated
        }),
        Command::Configure(args) => banner_server::cli::manage_config::configure(args.into()),
    }
}

/// Site-wide announcement banner service
#[derive(Debug, Parser)]
#[clap(name = "banner_server", version)]
pub struct CliArgs {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the banner admin interface, content endpoint and JSON API
    Serve,
    /// Apply all pending database schema migrations
    MigrateDb,
    /// Print the stored banner configuration
    ShowConfig,
    /// Print the banner markup for a logged-in user (or a guest)
    Render {
        /// Render the banner as shown to guests
        #[clap(long)]
        guest: bool,
    },
    /// Change the banner configuration. Omitted fields keep their current value.
    Configure(ConfigureArgs),
}

#[derive(Debug, Args)]
struct ConfigureArgs {
    /// Show the banner at all (1/0, true/false, on/off, yes/no)
    #[clap(long)]
    enabled: Option<String>,
    /// HTML content for logged-in users
    #[clap(long)]
    content: Option<String>,
    /// HTML content for guests
    #[clap(long)]
    content_guests: Option<String>,
    /// Show a close button (1/0, true/false, on/off, yes/no)
    #[clap(long)]
    close_button: Option<String>,
    /// One of info, success, warning, danger
    #[clap(long)]
    style: Option<String>,
    /// manual or one of the built-in types, e.g. weather_alert
    #[clap(long)]
    banner_type: Option<String>,
}

impl From<ConfigureArgs> for ConfigurationChanges {
    fn from(value: ConfigureArgs) -> Self {
        Self {
            enabled: value.enabled,
            content: value.content,
            content_guests: value.content_guests,
            close_button: value.close_button,
            style: value.style,
            banner_type: value.banner_type,
        }
    }
}

#[derive(Debug, Args)]
struct GlobalOpts {
    /// Verbosity level (can be specified multiple times)
    #[clap(long, short, global = true, action = ArgAction::Count)]
    verbose: u8,
}
