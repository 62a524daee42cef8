use clap::Parser;
use juspredict::adapter::inbound::cli::{self, command::Cli};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    std::process::exit(cli::run(cli).await);
}
