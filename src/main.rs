use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use dugout::{
    parse_batch, BehaviorAnalyzer, DugoutConfig, PerformancePredictor, PlayerId,
    PredictionFeatures, RecommendationEngine, RecommendationResponse, SearchRecord,
};
use dugout_insights::{most_frequent_search_type, personalized_content};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Similar-player recommendations and player insights
#[derive(Parser, Debug)]
#[command(name = "dugout")]
#[command(about = "Similar-player recommendations for baseball", long_about = None)]
struct Args {
    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train on a player batch and list players similar to one of them
    Recommend {
        /// JSON array of player records
        #[arg(long)]
        players: PathBuf,

        /// Id of the player to find matches for
        #[arg(long)]
        player_id: PlayerId,

        /// Number of recommendations (overrides the config file)
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Predict next-season batting average
    Predict {
        /// Birth date as YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<String>,

        #[arg(long)]
        career_avg: Option<f64>,

        #[arg(long)]
        games_played: Option<f64>,

        #[arg(long)]
        at_bats: Option<f64>,
    },
    /// Build a user profile from search history
    Profile {
        /// JSON array of search records
        #[arg(long)]
        history: PathBuf,

        #[arg(long, default_value = "anonymous")]
        user_id: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries command output only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match &args.config {
        Some(path) => DugoutConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DugoutConfig::default(),
    };

    match args.command {
        Command::Recommend {
            players,
            player_id,
            top_k,
        } => recommend(&config, &players, player_id, top_k),
        Command::Predict {
            birth_date,
            career_avg,
            games_played,
            at_bats,
        } => {
            let today = config
                .reference_date
                .unwrap_or_else(|| Utc::now().date_naive());
            let mut features = PredictionFeatures::from_player(birth_date.as_deref(), None, today);
            if let Some(avg) = career_avg {
                features.career_avg = avg;
            }
            if let Some(games) = games_played {
                features.games_played = games;
            }
            if let Some(at_bats) = at_bats {
                features.at_bats = at_bats;
            }
            predict(&features)
        }
        Command::Profile { history, user_id } => profile(&history, &user_id),
    }
}

fn recommend(
    config: &DugoutConfig,
    players: &Path,
    player_id: PlayerId,
    top_k: Option<usize>,
) -> anyhow::Result<()> {
    let top_k = top_k.unwrap_or(config.top_k);
    anyhow::ensure!(top_k > 0, "--top-k must be at least 1");

    let content = std::fs::read_to_string(players)
        .with_context(|| format!("failed to read {}", players.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("{} is not valid JSON", players.display()))?;
    let batch = parse_batch(&value)?;
    if batch.skipped > 0 {
        warn!("Skipped {} malformed player entries", batch.skipped);
    }

    let engine = RecommendationEngine::new(config.encoder());
    let summary = engine.train(&batch.records)?;
    info!("Model trained at {}", summary.trained_at);

    let snapshot = engine
        .snapshot()
        .context("model missing right after training")?;
    let result = snapshot.recommend(player_id, top_k);
    let candidates_count = if snapshot.contains(player_id) {
        snapshot.candidates_count()
    } else {
        0
    };

    let response = RecommendationResponse::new(player_id, result, candidates_count);
    if response.is_empty() {
        println!("no similar players found");
        return Ok(());
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn predict(features: &PredictionFeatures) -> anyhow::Result<()> {
    let predictor = PerformancePredictor::new();
    let prediction = predictor.predict_batting_average(features);
    let analysis = predictor.analyze(&prediction, features);

    let output = json!({
        "features": features,
        "prediction": prediction,
        "analysis": analysis,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn profile(history: &Path, user_id: &str) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(history)
        .with_context(|| format!("failed to read {}", history.display()))?;
    let records: Vec<SearchRecord> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of search records", history.display()))?;

    let analyzer = BehaviorAnalyzer::new();
    let profile = analyzer.analyze_search_patterns(user_id, &records);

    let output = json!({
        "profile": profile,
        "personalized_content": personalized_content(&profile),
        "favorite_search_type": most_frequent_search_type(&records),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
