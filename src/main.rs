use clap::Parser;

use boiler_ocr_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    boiler_ocr_lib::run(Cli::parse()).await
}
