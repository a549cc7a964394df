//! wordgrid - solve, rate and generate Boggle-style letter grids

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wordgrid::game::{difficulty, display_rank, Dictionary, GeneratorConfig};
use wordgrid::storage::Storage;
use wordgrid::GameSession;

/// Word search, scoring and board generation for letter grids.
#[derive(Debug, Parser)]
#[command(version)]
struct Opts {
    /// Word list, one lowercase word per line. Defaults to words.txt in the
    /// data directory.
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Don't read or write the local database
    #[arg(long, global = true)]
    no_store: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every word on a board
    Solve {
        #[arg(long, default_value_t = 4)]
        width: usize,
        #[arg(long, default_value_t = 4)]
        height: usize,
        /// Letters, row-major, optionally with rows separated by '/'
        letters: String,
    },

    /// Generate a high-scoring board
    Generate {
        /// Speed/quality tradeoff, 0 (fast) to 9 (best)
        #[arg(short, long, default_value_t = 9)]
        power: u8,
        #[arg(long, default_value_t = 4)]
        width: usize,
        #[arg(long, default_value_t = 4)]
        height: usize,
        /// Minimum total score of all words on the board
        #[arg(long, default_value_t = 100_000)]
        floor: u32,
        /// Boards to try before giving up on the floor
        #[arg(long, default_value_t = 25)]
        attempts: u32,
        /// Give up after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
        /// Seed for reproducible boards
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Rate words from 0 (easy) to 100 (hard)
    Difficulty {
        #[arg(required = true)]
        words: Vec<String>,
    },

    /// Score a finished game and show its review
    Rank {
        #[arg(long, default_value_t = 4)]
        width: usize,
        #[arg(long, default_value_t = 4)]
        height: usize,
        letters: String,
        /// Words the player found
        found: Vec<String>,
    },

    /// Show lifetime statistics
    History,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opts = Opts::parse();

    let level = if opts.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match opts.command {
        Command::Solve {
            width,
            height,
            ref letters,
        } => {
            let mut session = GameSession::new(load_dictionary(&opts)?);
            session.set_board(width, height, letters)?;
            println!("{}\n", session.board());

            let words = session.board_words();
            for found in words.iter() {
                println!(
                    "{:<16} {:>6}  {:>5.1}",
                    found.word,
                    found.score,
                    difficulty(&found.word)
                );
            }
            println!("\n{} words, {} points", words.len(), words.total_score);
        }

        Command::Generate {
            power,
            width,
            height,
            floor,
            attempts,
            seconds,
            seed,
        } => {
            let config = GeneratorConfig {
                score_floor: floor,
                max_attempts: attempts,
                time_budget: seconds.map(Duration::from_secs),
                ..GeneratorConfig::default()
            };
            let mut session = GameSession::new(load_dictionary(&opts)?).with_generator_config(config);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_os_rng(),
            };

            let generated = session.generate_board(power, width, height, &mut rng)?;
            println!("{}\n", generated.board);
            println!("{}", generated.letters());
            println!(
                "{} words, {} points ({} attempts)",
                generated.word_count, generated.total_score, generated.attempts
            );

            if !opts.no_store {
                match Storage::open().and_then(|s| s.save_board(&generated)) {
                    Ok(id) => debug!("saved board {}", id),
                    Err(e) => warn!("could not save board: {}", e),
                }
            }
        }

        Command::Difficulty { ref words } => {
            for word in words {
                println!("{:<16} {:>5.1}", word, difficulty(word));
            }
        }

        Command::Rank {
            width,
            height,
            ref letters,
            ref found,
        } => {
            let mut session = GameSession::new(load_dictionary(&opts)?);
            session.set_board(width, height, letters)?;
            for word in found {
                let result = session.submit(word);
                if !result.is_accepted() {
                    println!("{:<16} {}", word, result.message());
                }
            }

            let points = session.calculate_points();
            let rank = session.calculate_rank();
            println!(
                "{} points from {} of {} words, rank {:.1}",
                points.total,
                session.found_words().len(),
                session.board_words().len(),
                display_rank(rank)
            );

            let review = session.review();
            let missed: Vec<&str> = review.missed.iter().map(|e| e.word.as_str()).collect();
            if !missed.is_empty() {
                println!("missed: {}", missed.join(", "));
            }
            println!("{} words beyond reach", review.beyond.len());

            if !opts.no_store {
                match Storage::open().and_then(|s| s.record_game(&session.record())) {
                    Ok(id) => debug!("recorded game {}", id),
                    Err(e) => warn!("could not record game: {}", e),
                }
            }
        }

        Command::History => {
            let stats = Storage::open()?.lifetime_stats()?;
            println!("games played   {}", stats.games_played);
            println!("total points   {}", stats.total_points);
            println!("best score     {}", stats.best_score);
            println!("average score  {:.0}", stats.average_score());
            println!("best rank      {:.1}", display_rank(stats.best_rank));
            println!("words found    {}", stats.words_found);
            println!("longest word   {}", stats.longest_word);
        }
    }

    Ok(())
}

fn load_dictionary(opts: &Opts) -> Result<Arc<Dictionary>, Box<dyn Error>> {
    let path = match &opts.dictionary {
        Some(path) => path.clone(),
        None => Storage::default_dictionary_path()?,
    };
    Ok(Arc::new(Dictionary::from_path(path)?))
}
