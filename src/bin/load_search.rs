use anyhow::{bail, Context};
use chrono::{NaiveDateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use truckstop_proxy::client::{repeat_until, DEFAULT_PROXY_URL};
use truckstop_proxy::config::storage::default_config_dir;
use truckstop_proxy::core::lenient::parse_datetime;
use truckstop_proxy::domain::catalog::state_province_options;
use truckstop_proxy::domain::model::{Credentials, MultipleLoadDetailReturn};
use truckstop_proxy::render::{render_detail, render_result, OutputFormat};
use truckstop_proxy::utils::{logger, validation::Validate};
use truckstop_proxy::{CredentialStore, LocalStorage, ProxyClient, SearchForm};

#[derive(Parser)]
#[command(name = "load-search")]
#[command(about = "Search TruckStop loads through the truckstop-proxy service")]
struct Cli {
    /// Base URL of the running proxy
    #[arg(long, env = "TRUCKSTOP_PROXY_URL", default_value = DEFAULT_PROXY_URL, global = true)]
    proxy_url: String,

    /// Directory holding saved credentials
    #[arg(long, env = "TRUCKSTOP_CONFIG_DIR", global = true)]
    config_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage saved TruckStop credentials
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Run a load search
    Search(SearchArgs),
    /// List state/province codes for a country
    States {
        #[arg(long, default_value = "USA")]
        country: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Save credentials
    Set {
        #[arg(long)]
        integration_id: String,
        #[arg(long)]
        user_name: String,
        #[arg(long, env = "TRUCKSTOP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Print saved credentials with the password masked
    Show,
    /// Delete saved credentials
    Clear,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    origin_city: Option<String>,

    /// Origin state/province codes, comma-separated
    #[arg(long, value_delimiter = ',', required = true)]
    origin_state: Vec<String>,

    #[arg(long, default_value = "USA")]
    origin_country: String,

    #[arg(long)]
    origin_range: Option<i32>,

    #[arg(long)]
    destination_city: Option<String>,

    /// Destination state/province codes, comma-separated
    #[arg(long, value_delimiter = ',')]
    destination_state: Vec<String>,

    #[arg(long, default_value = "USA")]
    destination_country: String,

    #[arg(long)]
    destination_range: Option<i32>,

    /// Equipment type codes, comma-separated
    #[arg(long, value_delimiter = ',', default_value = "ANY")]
    equipment: Vec<String>,

    #[arg(long, default_value = "All")]
    load_type: String,

    #[arg(long, default_value_t = 0)]
    hours_old: i32,

    /// Pickup date; repeat for several
    #[arg(long = "pickup-date", value_parser = parse_pickup_date)]
    pickup_dates: Vec<NaiveDateTime>,

    #[arg(long, default_value_t = 1)]
    page: i32,

    #[arg(long, default_value_t = 50)]
    page_size: i32,

    #[arg(long, default_value = "Age")]
    sort_by: String,

    #[arg(long)]
    sort_descending: bool,

    /// Repeat the search every N seconds until interrupted
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "5",
        value_parser = clap::value_parser!(u64).range(2..)
    )]
    watch: Option<u64>,

    /// Print the full record of one load instead of the list
    #[arg(long)]
    detail: Option<String>,

    #[arg(long, default_value = "table", value_parser = parse_format)]
    format: OutputFormat,
}

fn parse_pickup_date(value: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(value).ok_or_else(|| format!("'{}' is not a recognised date", value))
}

fn parse_format(value: &str) -> Result<OutputFormat, String> {
    value.parse().map_err(|e: truckstop_proxy::ProxyError| e.to_string())
}

impl SearchArgs {
    fn form(&self) -> SearchForm {
        SearchForm {
            origin_city: self.origin_city.clone(),
            origin_states: self.origin_state.clone(),
            origin_country: Some(self.origin_country.clone()),
            origin_range: self.origin_range,
            destination_city: self.destination_city.clone(),
            destination_states: self.destination_state.clone(),
            destination_country: Some(self.destination_country.clone()),
            destination_range: self.destination_range,
            equipment_types: self.equipment.clone(),
            load_type: Some(self.load_type.clone()),
            hours_old: Some(self.hours_old),
            pickup_dates: self.pickup_dates.clone(),
            page_number: Some(self.page),
            page_size: Some(self.page_size),
            sort_by: Some(self.sort_by.clone()),
            sort_descending: Some(self.sort_descending),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose);

    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);
    tracing::debug!("📁 Credentials directory: {}", config_dir.display());
    let store = CredentialStore::new(LocalStorage::new(config_dir));

    match cli.command {
        Command::Config(command) => run_config(&store, command).await,
        Command::Search(args) => run_search(&store, &cli.proxy_url, &args).await,
        Command::States { country } => list_states(&country),
    }
}

fn list_states(country: &str) -> anyhow::Result<()> {
    let options = state_province_options(Some(country));
    if options.is_empty() {
        bail!("Unknown country '{}' (expected USA, CAN or MEX)", country);
    }
    for (_, label) in options {
        println!("{}", label);
    }
    Ok(())
}

async fn run_config(store: &CredentialStore<LocalStorage>, command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Set {
            integration_id,
            user_name,
            password,
        } => {
            let credentials = Credentials {
                integration_id,
                user_name,
                password,
            };
            store.save(&credentials).await.context("saving credentials")?;
            println!("✅ Credentials saved");
        }
        ConfigCommand::Show => match store.load().await? {
            Some(credentials) => {
                println!("Integration ID: {}", credentials.integration_id);
                println!("User name:      {}", credentials.user_name);
                println!("Password:       {}", "*".repeat(credentials.password.chars().count()));
            }
            None => println!("No credentials saved"),
        },
        ConfigCommand::Clear => {
            store.clear().await.context("clearing credentials")?;
            println!("🗑️  Credentials cleared");
        }
    }
    Ok(())
}

async fn run_search(
    store: &CredentialStore<LocalStorage>,
    proxy_url: &str,
    args: &SearchArgs,
) -> anyhow::Result<()> {
    let Some(credentials) = store.load().await? else {
        bail!("No saved credentials. Run `load-search config set` first");
    };

    let form = args.form();
    if let Err(e) = form.validate() {
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(1);
    }

    let client = ProxyClient::new(proxy_url)?;
    tracing::info!("🔍 {}", form.summary());

    let Some(seconds) = args.watch else {
        let result = client.search_loads(&credentials, &form).await?;
        return print_result(&result, args);
    };

    tracing::info!("⏱️  Refreshing every {}s, Ctrl-C to stop", seconds);
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let (client, credentials, form) = (&client, &credentials, &form);
    repeat_until(Duration::from_secs(seconds), shutdown, move || async move {
        match client.search_loads(credentials, form).await {
            Ok(result) => {
                println!("\n[{}]", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
                if let Err(e) = print_result(&result, args) {
                    tracing::error!("❌ {}", e);
                }
            }
            Err(e) => {
                tracing::error!("❌ Search failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message());
            }
        }
    })
    .await;

    tracing::info!("Stopped watching");
    Ok(())
}

fn print_result(result: &MultipleLoadDetailReturn, args: &SearchArgs) -> anyhow::Result<()> {
    if let Some(id) = &args.detail {
        let load = result
            .loads
            .iter()
            .flatten()
            .find(|load| load.id.as_deref() == Some(id.as_str()))
            .with_context(|| format!("load {} is not in the current results", id))?;
        println!("{}", render_detail(load));
        return Ok(());
    }

    println!("{}", render_result(result, args.format, Utc::now())?);
    Ok(())
}
