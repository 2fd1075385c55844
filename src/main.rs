use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use capis::cli::{Cli, Commands};
use capis::config::{Settings, load_configuration};
use capis::log::init_logging;
use capis::resources::IssuerFilters;
use capis::resources::products::Mortgage;
use capis::{Client, DumpCurl, MortgageProductsRepository, SourcingRun};
use clap::Parser;
use log::{error, info};
use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let mut settings = load_configuration(Path::new(&cli.config_file))?;
    apply_overrides(&mut settings, &cli);
    let client = build_client(&settings, cli.dump_curl)?;

    match cli.command {
        Commands::Issuers { label, start, limit } => {
            let filters = label.map(|label| IssuerFilters { label });
            let issuers = client
                .list_issuers(filters.as_ref(), start, limit)
                .await
                .context("Could not list issuers")?;

            for issuer in issuers.data {
                println!("{}", issuer.label);
            }
        },
        Commands::Health => {
            if !client.healthy().await {
                bail!("{} is not healthy", settings.api.base_url);
            }
            println!("{} is healthy", settings.api.base_url);
        },
        Commands::LookupMortgages {
            group_name,
            loan_amount,
            max_cost,
            watch,
        } => {
            if let Some(group_name) = group_name {
                settings.sourcing.group_name = group_name;
            }
            if let Some(loan_amount) = loan_amount {
                settings.sourcing.loan_amount = loan_amount;
            }
            if let Some(max_cost) = max_cost {
                settings.sourcing.max_cost = max_cost;
            }
            lookup_mortgages(&client, &settings, watch).await?;
        },
    }

    Ok(())
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(base_url) = &cli.base_url {
        settings.api.base_url = base_url.clone();
    }
    if let Some(token) = &cli.token {
        settings.api.token = token.clone();
    }
    if let Some(username) = &cli.username {
        settings.api.username = username.clone();
    }
    if let Some(password) = &cli.password {
        settings.api.password = password.clone();
    }
}

fn build_client(settings: &Settings, dump_curl: bool) -> Result<Client> {
    let mut builder = settings
        .api
        .client_builder()?
        .error_log(|e| error!(error:% = e; "Request failed"));
    if dump_curl {
        builder = builder.request_middleware(DumpCurl::to_log());
    }

    builder.build().context("Could not build the API client")
}

async fn lookup_mortgages(client: &Client, settings: &Settings, watch: bool) -> Result<()> {
    let sourcing = &settings.sourcing;
    if sourcing.group_name.is_empty() {
        bail!("A product group name is required");
    }

    let repo = Arc::new(MortgageProductsRepository::from_client(client, &sourcing.group_name));
    repo.sync().await.context("Initial sync failed")?;

    let period = Duration::from_secs(sourcing.sync_interval_secs.max(1));
    let cancel = CancellationToken::new();
    let refresh = tokio::spawn({
        let repo = repo.clone();
        let cancel = cancel.clone();
        async move { repo.sync_every(period, cancel).await }
    });

    let run = SourcingRun::new(sourcing.loan_amount, sourcing.max_cost);
    print_matches(&run, &repo.find_matching(|m| run.matches(m)).await);

    if watch {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    print_matches(&run, &repo.find_matching(|m| run.matches(m)).await);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }
    }

    cancel.cancel();
    refresh.await.context("Product refresh task panicked")?;
    Ok(())
}

fn print_matches(run: &SourcingRun, products: &[Mortgage]) {
    if products.is_empty() {
        println!("sorry, no products matched the criteria");
        return;
    }

    println!("{} products were found:", products.len());
    println!("===========");

    for p in products {
        println!(
            "\t - [{}] {} ({:.2} for {} months) + £{} in fees",
            p.id,
            p.name,
            p.offer_interest_rate.rate.value,
            p.offer_interest_rate.period.value,
            run.fee_cost(p),
        );
    }

    println!();
}
