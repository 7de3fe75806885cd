use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use services::{Clock, GameLoopService, LeaderboardService};
use storage::file::{DEFAULT_LEADERBOARD_FILE, DEFAULT_QUESTIONS_FILE, DEFAULT_SAVE_FILE, StoragePaths};
use storage::repository::Storage;

mod console;
mod shell;

use console::Console;
use shell::{Shell, ShellError};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPath { flag: &'static str, raw: String },
    InvalidSeed { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPath { flag, raw } => write!(f, "invalid {flag} value: {raw:?}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_path(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<PathBuf, ArgsError> {
    let value = require_value(args, flag)?;
    if value.trim().is_empty() {
        return Err(ArgsError::InvalidPath { flag, raw: value });
    }
    Ok(PathBuf::from(value))
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    data_dir: PathBuf,
    questions: PathBuf,
    save: PathBuf,
    leaderboard: PathBuf,
    seed: Option<u64>,
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let env_path = |key: &str, default: &str| {
            std::env::var(key).map_or_else(|_| PathBuf::from(default), PathBuf::from)
        };

        Ok(Self {
            data_dir: env_path("TRIVIA_DATA_DIR", "."),
            questions: env_path("TRIVIA_QUESTIONS_FILE", DEFAULT_QUESTIONS_FILE),
            save: env_path("TRIVIA_SAVE_FILE", DEFAULT_SAVE_FILE),
            leaderboard: env_path("TRIVIA_LEADERBOARD_FILE", DEFAULT_LEADERBOARD_FILE),
            seed: std::env::var("TRIVIA_SEED").ok().map(parse_seed).transpose()?,
        })
    }

    /// Flags override environment values, which override defaults.
    fn parse(mut self, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => self.data_dir = require_path(args, "--data-dir")?,
                "--questions" => self.questions = require_path(args, "--questions")?,
                "--save" => self.save = require_path(args, "--save")?,
                "--leaderboard" => self.leaderboard = require_path(args, "--leaderboard")?,
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    self.seed = Some(parse_seed(value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        Ok(self)
    }

    /// Relative file paths resolve under the data directory.
    fn storage_paths(&self) -> StoragePaths {
        let resolve = |path: &Path| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                self.data_dir.join(path)
            }
        };
        StoragePaths {
            questions: resolve(&self.questions),
            save: resolve(&self.save),
            leaderboard: resolve(&self.leaderboard),
        }
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  trivia [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data-dir <dir>          Directory for relative data paths (default: .)");
    eprintln!("  --questions <path>        Question bank (default: questions.txt)");
    eprintln!("  --save <path>             Saved game slot (default: saved_game.txt)");
    eprintln!("  --leaderboard <path>      Leaderboard (default: leaderboard.txt)");
    eprintln!("  --seed <u64>              Fixed shuffle seed (default: time based)");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TRIVIA_DATA_DIR, TRIVIA_QUESTIONS_FILE, TRIVIA_SAVE_FILE,");
    eprintln!("  TRIVIA_LEADERBOARD_FILE, TRIVIA_SEED, RUST_LOG");
}

#[derive(Debug)]
enum AppError {
    Args(ArgsError),
    Shell(ShellError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Args(e) => write!(f, "{e}"),
            AppError::Shell(e) => write!(f, "{e}"),
        }
    }
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::Args(_) => 2,
            AppError::Shell(_) => 1,
        }
    }
}

fn run() -> Result<(), AppError> {
    let mut argv = std::env::args().skip(1);
    let args = Args::from_env()
        .and_then(|defaults| defaults.parse(&mut argv))
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            AppError::Args(e)
        })?;

    let paths = args.storage_paths();
    log::info!(
        "questions={} save={} leaderboard={}",
        paths.questions.display(),
        paths.save.display(),
        paths.leaderboard.display()
    );

    // Keep file wiring in the binary glue so core/services stay pure.
    let storage = Storage::files(paths);
    let games = GameLoopService::from_storage(Clock::default_clock(), &storage).with_seed(args.seed);
    let leaderboard = LeaderboardService::new(storage.leaderboard.clone());

    let stdin = io::stdin();
    let console = Console::new(stdin.lock(), io::stdout());
    Shell::new(console, games, leaderboard)
        .run()
        .map_err(AppError::Shell)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}
