use std::{
    io::Read,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use clap::{Parser, Subcommand};
use common_utils::CustomResult;
use connector_integration::Fortis;
use domain_types::{payment_method_data::KeyedCard, payment_record::PaymentSource};
use error_stack::ResultExt;
use fortis_gateway::{
    actions::{ActionDispatcher, LifecycleAction},
    configs,
    error::{GatewayError, ReportSwitchExt},
    logger,
};
use hyperswitch_masking::{ExposeInterface, Secret};

#[derive(Parser)]
#[command(name = "fortis-gateway")]
#[command(about = "Fortis card processing adapter", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file, defaults to config/<RUN_ENV>.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration with the API key hidden
    EnvCheck,

    /// Vault a card with the processor and print the token id
    MintToken {
        #[arg(long, env = "FORTIS_TEST_CC")]
        card_number: String,

        /// Expiry as MMYY
        #[arg(long, env = "FORTIS_TEST_EXP")]
        exp_date: String,

        #[arg(long, default_value = "CI Test")]
        holder: String,

        /// Overrides the configured location
        #[arg(long)]
        location_id: Option<String>,
    },

    /// Run a lifecycle action on a payment document and print the updated document
    Run {
        #[arg(value_enum)]
        action: LifecycleAction,

        /// JSON payment document, `-` reads stdin
        #[arg(value_name = "PAYMENT")]
        payment: PathBuf,
    },
}

#[allow(clippy::print_stderr)]
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    #[allow(clippy::expect_used)]
    let config = configs::Config::new_with_config_path(cli.config.clone())
        .expect("Failed while parsing config");
    let _guard = logger::setup(
        &config.log,
        fortis_gateway::service_name!(),
        [
            fortis_gateway::service_name!(),
            "connector_integration",
            "external_services",
        ],
    );

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            logger::error!(?error, "command failed");
            eprintln!("{error:?}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stdout)]
async fn run(command: Commands, config: configs::Config) -> CustomResult<(), GatewayError> {
    match command {
        Commands::EnvCheck => {
            for (key, value) in config.summary() {
                println!("{key:<24} {value}");
            }
        }
        Commands::MintToken {
            card_number,
            exp_date,
            holder,
            location_id,
        } => {
            let fortis = Fortis::from_config(config.fortis, &config.proxy).switch()?;
            let card = KeyedCard {
                account_number: Secret::new(card_number),
                exp_date: Secret::new(exp_date),
                cvv: None,
            };
            let token = fortis
                .create_card_token(&card, &holder, location_id.as_deref())
                .await
                .switch()?;
            println!("{}", token.expose());
        }
        Commands::Run { action, payment } => {
            let mut payment = read_payment(&payment)?;
            let fortis = Fortis::from_config(config.fortis, &config.proxy).switch()?;
            let dispatcher = ActionDispatcher::new(Arc::new(fortis));

            let status = dispatcher.execute(action, &mut payment).await?;
            logger::info!(%status, "payment status");

            let document = serde_json::to_string_pretty(&payment)
                .change_context(GatewayError::InvalidDocument)?;
            println!("{document}");
        }
    }
    Ok(())
}

fn read_payment(path: &Path) -> CustomResult<PaymentSource, GatewayError> {
    let mut contents = String::new();
    if path.as_os_str() == "-" {
        std::io::stdin()
            .read_to_string(&mut contents)
            .change_context(GatewayError::InvalidDocument)?;
    } else {
        contents = std::fs::read_to_string(path)
            .change_context(GatewayError::InvalidDocument)
            .attach_printable_lazy(|| format!("path: {}", path.display()))?;
    }
    serde_json::from_str(&contents).change_context(GatewayError::InvalidDocument)
}
