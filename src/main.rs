use clap::Parser;
use leaderboard::{names, services::view_model::LeaderboardSettings, AppState};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Base URL of the scoring API.
    #[arg(long, env, default_value = names::DEFAULT_UPSTREAM_URL)]
    upstream_url: String,

    /// Rank shown as the current viewer's pinned row and card.
    #[arg(long, env, default_value_t = names::DEFAULT_HIGHLIGHTED_RANK)]
    highlighted_rank: u32,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tracing=info,leaderboard=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let settings = LeaderboardSettings {
        highlighted_rank: args.highlighted_rank,
        ..LeaderboardSettings::default()
    };
    let app = leaderboard::router(AppState::new(args.upstream_url, settings));

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on {address}");
    axum::serve(listener, app).await?;

    Ok(())
}
