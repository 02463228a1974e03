#[path = "ocifleet/app/mod.rs"]
mod app;
#[path = "ocifleet/args.rs"]
mod args;
#[path = "ocifleet/logging.rs"]
mod logging;
#[path = "ocifleet/report.rs"]
mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
