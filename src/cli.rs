use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "capis")]
#[command(about = "comparisonapis.com command line client", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "Path to the configuration file", default_value = "data/config.toml")]
    pub config_file: String,
    #[arg(short = 'u', long, help = "Overrides the configured API base URL")]
    pub base_url: Option<String>,
    #[arg(short, long, help = "API token; takes precedence over username and password")]
    pub token: Option<String>,
    #[arg(long, help = "comparisonapis.com username")]
    pub username: Option<String>,
    #[arg(long, help = "comparisonapis.com password")]
    pub password: Option<String>,
    #[arg(long, help = "Log every request as a curl command")]
    pub dump_curl: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List issuers and print their labels
    Issuers {
        #[arg(long, help = "Only issuers with this label")]
        label: Option<String>,
        #[arg(long, help = "Index of the first issuer", default_value_t = 0)]
        start: i64,
        #[arg(short, long, help = "Maximum number of issuers", default_value_t = 50)]
        limit: i64,
    },
    /// Check whether the service is healthy
    Health,
    /// Find mortgages in a product group whose fees fit a budget
    LookupMortgages {
        #[arg(short, long, help = "Product group to source from")]
        group_name: Option<String>,
        #[arg(long, help = "Amount to borrow, in whole pounds")]
        loan_amount: Option<i64>,
        #[arg(long, help = "Maximum acceptable fee, in whole pounds; 0 accepts any fee")]
        max_cost: Option<i64>,
        #[arg(long, help = "Keep running and print matches after every refresh")]
        watch: bool,
    },
}
