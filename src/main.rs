// Entrypoint for the seeder.
// - Parse arguments first so a bad invocation never touches the network.
// - Returns `anyhow::Result` so transport failures end the process with
//   a non-zero status and the error chain on stderr.

use chrono::Local;
use nutrilyzer_seed::api::ApiClient;
use nutrilyzer_seed::cli::Cli;
use nutrilyzer_seed::config::Config;
use nutrilyzer_seed::seeder::{seed, SeedPlan};
use nutrilyzer_seed::ui::Spinning;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_or_exit();

    // Logs go to stderr; stdout only carries the responses.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::resolve(cli.server_url.as_deref(), &cli.env_file)?;
    tracing::info!(server_url = %config.server_url, "seeding demo data");

    let api = Spinning::new(ApiClient::new(&config.server_url, &cli.token)?);
    let today = Local::now().date_naive();
    let mut out = std::io::stdout().lock();
    seed(&api, &cli.user_id, &SeedPlan::demo(), today, &mut out)?;
    Ok(())
}
