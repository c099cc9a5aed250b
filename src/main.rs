use clap::Parser;
use tweetrade::adapter::inbound::cli::command::Cli;
use tweetrade::adapter::inbound::cli::run;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let code = run::execute(&cli).await;
    std::process::exit(code);
}
