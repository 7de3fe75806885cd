use std::fmt;
use std::path::PathBuf;

use storage::file::{DEFAULT_QUESTIONS_FILE, FileRepository, StoragePaths};
use storage::repository::QuestionRepository;
use trivia_core::model::QuestionDraft;

#[derive(Debug, Clone)]
struct Args {
    questions: PathBuf,
    force: bool,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPath { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPath { raw } => write!(f, "invalid --questions value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
struct AlreadyExists(PathBuf);

impl fmt::Display for AlreadyExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} already exists; pass --force to replace it",
            self.0.display()
        )
    }
}

impl std::error::Error for AlreadyExists {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut questions = std::env::var("TRIVIA_QUESTIONS_FILE")
            .map_or_else(|_| PathBuf::from(DEFAULT_QUESTIONS_FILE), PathBuf::from);
        let mut force = false;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    let value = require_value(&mut args, "--questions")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidPath { raw: value });
                    }
                    questions = PathBuf::from(value);
                }
                "--force" => force = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self { questions, force })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --questions <path>        Question bank to write (default: questions.txt)");
    eprintln!("  --force                   Replace an existing bank");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  TRIVIA_QUESTIONS_FILE");
}

/// (question, options, correct answer, difficulty)
type Sample = (&'static str, [&'static str; 4], u8, u8);

const SAMPLES: [Sample; 50] = [
    ("What is the capital of France?", ["Paris", "Lyon", "Marseille", "Nice"], 1, 1),
    ("How many continents are there?", ["Five", "Six", "Seven", "Eight"], 3, 1),
    ("Which planet is known as the Red Planet?", ["Venus", "Mars", "Jupiter", "Mercury"], 2, 1),
    ("What is the largest ocean on Earth?", ["Atlantic", "Indian", "Arctic", "Pacific"], 4, 1),
    ("What gas do plants absorb from the air?", ["Oxygen", "Nitrogen", "Carbon dioxide", "Helium"], 3, 1),
    ("How many legs does a spider have?", ["Six", "Eight", "Ten", "Twelve"], 2, 1),
    ("Which animal is the largest mammal?", ["Elephant", "Blue whale", "Giraffe", "Orca"], 2, 1),
    ("What is the freezing point of water in Celsius?", ["0", "32", "-10", "100"], 1, 1),
    ("Which color is made by mixing blue and yellow?", ["Purple", "Orange", "Green", "Brown"], 3, 1),
    ("How many days are in a leap year?", ["364", "365", "366", "367"], 3, 1),
    ("Who painted the Mona Lisa?", ["Michelangelo", "Raphael", "Donatello", "Leonardo da Vinci"], 4, 1),
    ("What is the chemical symbol for gold?", ["Go", "Gd", "Au", "Ag"], 3, 2),
    ("Which country gifted the Statue of Liberty to the USA?", ["France", "Spain", "Italy", "England"], 1, 1),
    ("What is the square root of 144?", ["10", "11", "12", "14"], 3, 1),
    ("Which instrument has 88 keys?", ["Organ", "Piano", "Harpsichord", "Accordion"], 2, 1),
    ("What is the hardest natural substance?", ["Quartz", "Granite", "Diamond", "Iron"], 3, 2),
    ("Which language has the most native speakers?", ["English", "Spanish", "Hindi", "Mandarin Chinese"], 4, 2),
    ("In which year did the Titanic sink?", ["1905", "1912", "1918", "1921"], 2, 2),
    ("What is the longest river in South America?", ["Amazon", "Parana", "Orinoco", "Magdalena"], 1, 2),
    ("Which element has atomic number 1?", ["Helium", "Hydrogen", "Lithium", "Carbon"], 2, 2),
    ("Who wrote Pride and Prejudice?", ["Charlotte Bronte", "Mary Shelley", "Jane Austen", "George Eliot"], 3, 2),
    ("What is the smallest prime number?", ["0", "1", "2", "3"], 3, 1),
    ("Which organ pumps blood through the body?", ["Lungs", "Liver", "Kidney", "Heart"], 4, 1),
    ("What is the capital of Australia?", ["Sydney", "Melbourne", "Canberra", "Perth"], 3, 2),
    ("How many sides does a hexagon have?", ["Five", "Six", "Seven", "Eight"], 2, 1),
    ("Which scientist proposed the theory of general relativity?", ["Newton", "Einstein", "Bohr", "Curie"], 2, 2),
    ("What is the main language spoken in Brazil?", ["Spanish", "Portuguese", "French", "Italian"], 2, 1),
    ("Which planet has the most confirmed moons?", ["Jupiter", "Saturn", "Uranus", "Neptune"], 2, 3),
    ("What is the speed of light in vacuum, roughly, in km/s?", ["3,000", "30,000", "300,000", "3,000,000"], 3, 2),
    ("Who was the first person to walk on the Moon?", ["Buzz Aldrin", "Yuri Gagarin", "Neil Armstrong", "John Glenn"], 3, 1),
    ("Which blood type is the universal donor?", ["A+", "AB+", "O-", "B-"], 3, 2),
    ("What is the currency of Japan?", ["Yuan", "Won", "Yen", "Ringgit"], 3, 1),
    ("Which mountain is the tallest above sea level?", ["K2", "Kangchenjunga", "Lhotse", "Mount Everest"], 4, 1),
    ("In computing, what does CPU stand for?", ["Central Processing Unit", "Core Power Unit", "Central Program Utility", "Computer Processing Unit"], 1, 1),
    ("What is the largest desert in the world?", ["Sahara", "Gobi", "Antarctic", "Arabian"], 3, 3),
    ("Which composer wrote the Moonlight Sonata?", ["Mozart", "Beethoven", "Chopin", "Bach"], 2, 2),
    ("How many bones are in the adult human body?", ["186", "206", "226", "246"], 2, 2),
    ("What is the capital of Canada?", ["Toronto", "Vancouver", "Montreal", "Ottawa"], 4, 2),
    ("Which metal is liquid at room temperature?", ["Mercury", "Lead", "Tin", "Zinc"], 1, 2),
    ("What year did the Berlin Wall fall?", ["1985", "1987", "1989", "1991"], 3, 2),
    ("What is the most abundant gas in Earth's atmosphere?", ["Oxygen", "Nitrogen", "Argon", "Carbon dioxide"], 2, 2),
    ("Which ancient wonder stood in Alexandria?", ["The Colossus", "The Lighthouse", "The Mausoleum", "The Hanging Gardens"], 2, 3),
    ("What is the value of pi to two decimal places?", ["3.12", "3.14", "3.16", "3.18"], 2, 1),
    ("Which country has the most natural lakes?", ["Russia", "United States", "Finland", "Canada"], 4, 3),
    ("Who developed the polio vaccine first licensed in 1955?", ["Louis Pasteur", "Jonas Salk", "Albert Sabin", "Edward Jenner"], 2, 3),
    ("What is the only even prime number?", ["0", "2", "4", "8"], 2, 1),
    ("Which chess piece can only move diagonally?", ["Rook", "Knight", "Bishop", "King"], 3, 1),
    ("What is the largest internal organ of the human body?", ["Liver", "Lungs", "Brain", "Stomach"], 1, 2),
    ("Which programming language introduced the borrow checker to the mainstream?", ["Go", "Rust", "Swift", "Kotlin"], 2, 2),
    ("What is the deepest known point in the ocean?", ["Puerto Rico Trench", "Java Trench", "Challenger Deep", "Tonga Trench"], 3, 3),
];

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    if args.questions.exists() {
        if !args.force {
            return Err(AlreadyExists(args.questions).into());
        }
        std::fs::remove_file(&args.questions)?;
    }

    let repo = FileRepository::new(StoragePaths {
        questions: args.questions.clone(),
        ..StoragePaths::default()
    });

    for (text, options, correct, difficulty) in SAMPLES {
        let question = QuestionDraft {
            text: text.to_owned(),
            options: options.map(str::to_owned),
            correct,
            difficulty,
        }
        .validate()?;
        repo.append_question(&question)?;
    }

    println!(
        "Seeded {} questions into {}",
        SAMPLES.len(),
        args.questions.display()
    );

    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
