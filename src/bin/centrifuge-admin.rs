use centrifuge_admin::{AdminClient, ClientSettings, Error, ExternalConfig, Reply, SettingsOverrides};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_TARGET: &str = "centrifuge_admin_cli";
const CONFIG_FILE_NAME: &str = "centrifuge.toml";

#[derive(Parser, Debug)]
#[clap(name = "centrifuge-admin", author, version, about = "Centrifuge admin API command line client", long_about = None)]
struct CliArgs {
    /// Path to the configuration file holding the centrifuge_* keys
    #[clap(short, long, value_parser)]
    configuration: Option<PathBuf>,
    /// Set the logging level [default: Info]
    #[clap(short, long, value_parser)]
    log_level: Option<LevelFilter>,
    /// Log full request and response bodies
    #[clap(short, long)]
    debug: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send JSON data into a channel
    Publish { channel: String, data: String },
    /// Unsubscribe a user from a channel
    Unsubscribe { channel: String, user: String },
    /// Disconnect a user
    Disconnect { user: String },
    /// Show clients subscribed to a channel
    Presence { channel: String },
    /// Show the last messages of a channel
    History { channel: String },
    /// Print the connection token for a browser client
    Token { user: String, timestamp: String, custom_data: Option<String> },
    /// Print the signature of an encoded payload
    Sign { payload: String },
}

fn main() {
    let cli = CliArgs::parse();
    let module_log_level = cli.log_level.unwrap_or(LevelFilter::INFO);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::OFF.into())
        .parse_lossy(format!("{}={},{}={}", centrifuge_admin::LIB_LOG_TARGET, module_log_level, LOG_TARGET, module_log_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(error) = run(cli) {
        error!(target: LOG_TARGET, "{}", error);
        std::process::exit(1);
    }
}

fn run(args: CliArgs) -> Result<(), Error> {
    let external = load_configuration(args.configuration)?;
    let settings = ClientSettings::resolve(&external, SettingsOverrides::default())?;
    let debug = args.debug;
    let client = AdminClient::new(settings)?;

    match args.command {
        Command::Publish { channel, data } => {
            let data: serde_json::Value = serde_json::from_str(&data)?;
            print_reply(client.publish(channel, &data, debug)?)
        }
        Command::Unsubscribe { channel, user } => print_reply(client.unsubscribe(channel, user, debug)?),
        Command::Disconnect { user } => print_reply(client.disconnect(user, debug)?),
        Command::Presence { channel } => print_reply(client.presence(channel, debug)?),
        Command::History { channel } => print_reply(client.history(channel, debug)?),
        Command::Token { user, timestamp, custom_data } => {
            println!("{}", client.get_client_token(user, timestamp, custom_data.as_deref()));
            Ok(())
        }
        Command::Sign { payload } => {
            println!("{}", client.socket_auth(payload));
            Ok(())
        }
    }
}

fn load_configuration(path: Option<PathBuf>) -> Result<ExternalConfig, Error> {
    let config_path = match path {
        Some(path) => Some(path),
        None => directories::ProjectDirs::from("com", "centrifuge-admin", "centrifuge-admin")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .filter(|path| path.exists()),
    };

    match config_path {
        Some(config_path) => {
            info!(target: LOG_TARGET, "Reading configuration from: {}", config_path.display());
            ExternalConfig::try_from(std::fs::read_to_string(config_path)?.as_str())
        }
        None => {
            info!(target: LOG_TARGET, "No configuration file found, reading CENTRIFUGE_* environment variables");
            ExternalConfig::from_env()
        }
    }
}

fn print_reply(reply: Reply) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(&reply.into_map())?);
    Ok(())
}
