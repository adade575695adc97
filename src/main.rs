use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use beanstalk::config::{Config, SeasonConfig};
use beanstalk::ranking::{DistributionCache, DistributionRequest, TournamentType};
use beanstalk::season::{Format, LeaderboardFilter, ResultsFile};
use beanstalk::RankingError;

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_UNRESOLVED: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show how a tournament's beans are split across its field
    Distribute {
        /// Tournament type, e.g. "national" or "continental championship"
        #[arg(long = "type")]
        tournament_type: TournamentType,

        /// Number of players in the tournament
        #[arg(long)]
        players: u32,

        /// Season whose rules apply (defaults to the current season)
        #[arg(long)]
        season: Option<u32>,

        /// Override the type's baseline points
        #[arg(long)]
        baseline: Option<f64>,

        /// Override the share of the pool paid to first place
        #[arg(long)]
        first_place_fraction: Option<f64>,

        /// Override the share of the field that gets paid
        #[arg(long)]
        receiving_fraction: Option<f64>,

        /// Override the points added per player
        #[arg(long)]
        extra_per_player: Option<f64>,

        /// Print tab-separated values instead of a table
        #[arg(long)]
        tsv: bool,
    },
    /// Rank players for a season from a JSON results file
    Leaderboard {
        /// Path to the results file
        #[arg(long)]
        results: PathBuf,

        /// Season to rank (defaults to the current season)
        #[arg(long)]
        season: Option<u32>,

        /// Only count results played with this faction
        #[arg(long)]
        faction: Option<String>,

        /// Only count results in this format
        #[arg(long)]
        format: Option<Format>,

        /// Only count tournaments carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Print tab-separated values instead of a table
        #[arg(long)]
        tsv: bool,
    },
    /// List each tournament type's payout rules
    Tiers {
        /// Season whose rules to show (defaults to the current season)
        #[arg(long)]
        season: Option<u32>,
    },
    /// List configured seasons
    Seasons,
    /// Write the default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "beanstalk")]
#[command(about = "Tournament bean distribution and season leaderboards", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/beanstalk/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "beanstalk=debug" } else { "beanstalk=warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn exit_code(error: &RankingError) -> i32 {
    match error {
        RankingError::UnresolvedSeason(_) => EXIT_UNRESOLVED,
        _ => EXIT_INPUT,
    }
}

/// Requested season, or the current one when none is given.
fn resolve_season(config: &Config, requested: Option<u32>) -> &SeasonConfig {
    let today = chrono::Local::now().date_naive();
    let season = match requested {
        Some(id) => config.season(id),
        None => config.default_season(today),
    };
    match season {
        Some(s) => s,
        None => {
            match requested {
                Some(id) => eprintln!("{}", RankingError::UnresolvedSeason(id)),
                None => eprintln!("No season is running on {} and none has started yet.", today),
            }
            std::process::exit(EXIT_UNRESOLVED);
        }
    }
}

/// Load the config and validate every season, exiting on failure.
fn load_validated_config(path: Option<PathBuf>) -> Config {
    let config = match beanstalk::config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = beanstalk::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    info!(seasons = config.seasons.len(), "config validated");
    config
}

fn init_config(path: Option<PathBuf>, force: bool) {
    let path = match path.map_or_else(beanstalk::config::get_config_path, Ok) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    if let Err(e) = beanstalk::config::save_config(&path, &Config::default(), force) {
        eprintln!("Config error: {:#}", e);
        std::process::exit(EXIT_CONFIG);
    }
    println!("Config written to {}", path.display());
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);
    let use_colors = beanstalk::output::should_use_colors();

    match cli.command {
        Commands::Distribute {
            tournament_type,
            players,
            season,
            baseline,
            first_place_fraction,
            receiving_fraction,
            extra_per_player,
            tsv,
        } => {
            let config = load_validated_config(config_path);
            let season = resolve_season(&config, season);
            let ranking = &season.ranking;
            let mut request =
                DistributionRequest::for_type(ranking.tournament(tournament_type), tournament_type, players);
            if let Some(b) = baseline {
                request.baseline_points = b;
            }
            if let Some(f) = first_place_fraction {
                request.first_place_fraction = f;
            }
            if let Some(f) = receiving_fraction {
                request.receiving_fraction = f;
            }
            if let Some(e) = extra_per_player {
                request.extra_per_player = e;
            }

            let distribution = match beanstalk::ranking::calculate_point_distribution(&request, ranking) {
                Ok(d) => d,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            };
            let rows = beanstalk::ranking::preview_distribution(&distribution);

            if tsv {
                println!("{}", beanstalk::output::format_distribution_tsv(&rows));
            } else {
                println!(
                    "{}",
                    beanstalk::output::format_distribution_table(&distribution, &rows, use_colors)
                );
            }
            info!(season = season.id, alpha = ?distribution.alpha, "distribution done");
        }
        Commands::Leaderboard {
            results,
            season,
            faction,
            format,
            tags,
            tsv,
        } => {
            let config = load_validated_config(config_path);
            let season = resolve_season(&config, season);

            let results_file: ResultsFile = match File::open(&results)
                .map_err(anyhow::Error::from)
                .and_then(|f| serde_json::from_reader(BufReader::new(f)).map_err(anyhow::Error::from))
            {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Failed to read results from {}: {}", results.display(), e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let season_tournaments: Vec<_> = results_file
                .tournaments
                .into_iter()
                .filter(|t| t.season_id == season.id)
                .collect();

            let mut cache = DistributionCache::new();
            let facts = match beanstalk::season::facts_for_tournaments(&season_tournaments, &config, &mut cache) {
                Ok(f) => f,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            };
            info!(
                tournaments = season_tournaments.len(),
                distributions = cache.len(),
                cache_hits = cache.hits(),
                "applied distributions"
            );

            let mut filter = LeaderboardFilter::new();
            if let Some(f) = faction {
                filter = filter.with_faction(f);
            }
            if let Some(f) = format {
                filter = filter.with_format(f);
            }
            for tag in &tags {
                filter = filter.with_tag(tag);
            }

            let entries = match beanstalk::season::aggregate_season(season.id, &facts, &config, &filter) {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(exit_code(&e));
                }
            };

            if tsv {
                println!("{}", beanstalk::output::format_leaderboard_tsv(&entries));
            } else {
                println!("{}", beanstalk::output::format_leaderboard_table(&entries, use_colors));
            }
        }
        Commands::Tiers { season } => {
            let config = load_validated_config(config_path);
            let season = resolve_season(&config, season);
            println!("{}", beanstalk::output::format_tiers(&season.ranking, use_colors));
        }
        Commands::Seasons => {
            let config = load_validated_config(config_path);
            let today = chrono::Local::now().date_naive();
            let current = config.current_season(today).map(|s| s.id);
            println!("{}", beanstalk::output::format_seasons(&config, current, use_colors));
        }
        Commands::Init { force } => init_config(config_path, force),
    }

    info!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
