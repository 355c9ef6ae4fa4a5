use clap::{Args, Parser, Subcommand};
use uuid::Uuid;

use adwise_engine::Recommender;
use adwise_signals::{SignalAggregator, SignalConfig};

#[derive(Debug, Parser)]
#[command(name = "adwise-cli")]
#[command(about = "Adwise channel recommendation tooling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run migrations and seed the channel catalog from config/channels.yaml.
    Seed,
    /// Compute (or reuse) a recommendation for one entity.
    Recommend(RecommendArgs),
}

#[derive(Debug, Args)]
struct RecommendArgs {
    /// Public id of the entity.
    #[arg(long)]
    entity: Uuid,
    /// Bypass the staleness check and force a fresh run.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = adwise_core::load_app_config()?;
    let pool_config = adwise_db::PoolConfig::from_app_config(&config);
    let pool = adwise_db::connect_pool(&config.database_url, pool_config).await?;

    let cli = Cli::parse();
    match cli.command {
        Commands::Seed => {
            adwise_db::run_migrations(&pool).await?;
            let channels = adwise_core::load_channels_file(&config.channels_path)?;
            tracing::info!(
                path = %config.channels_path.display(),
                channels = channels.len(),
                "seeding channel catalog"
            );
            let count = adwise_db::seed_channels(&pool, &channels).await?;
            println!("seeded {count} channels from {}", config.channels_path.display());
        }
        Commands::Recommend(args) => {
            let signals = SignalAggregator::new(SignalConfig::from_app_config(&config))?;
            let recommender = Recommender::new(pool, signals);
            tracing::info!(entity = %args.entity, force = args.force, "running recommendation");
            let bundle = recommender.recommend(args.entity, args.force).await?;
            print_bundle(&bundle);
        }
    }

    Ok(())
}

fn print_bundle(bundle: &adwise_engine::RecommendationBundle) {
    if bundle.reused {
        println!(
            "reusing recommendation generated at {}",
            bundle.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }

    println!("{}", bundle.narrative);
    println!();
    println!(
        "{:<28} {:>6} {:>8} {:>10} {:>10}",
        "channel", "score", "weight", "avg $", "reach"
    );
    for score in &bundle.scores {
        let allocation = bundle
            .allocation
            .iter()
            .find(|a| a.channel_slug == score.channel_slug);
        let estimate = bundle
            .outcomes
            .channels
            .iter()
            .find(|(slug, _)| *slug == score.channel_slug)
            .map(|(_, e)| e);
        println!(
            "{:<28} {:>6} {:>8} {:>10} {:>10}",
            score.name,
            score.score,
            allocation.map_or_else(|| "-".to_string(), |a| format!("{:.2}", a.weight)),
            allocation.map_or_else(|| "-".to_string(), |a| format!("{:.2}", a.budget.avg)),
            estimate.map_or_else(|| "-".to_string(), |e| e.reach.to_string()),
        );
    }
}
