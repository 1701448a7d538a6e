//! Kioku CLI
//!
//! Terminal front end for the study service:
//! - Sign in and out
//! - Dashboard, decks and cards
//! - Interactive review
//! - Practice conversations
//! - Dictionary lookup and notes

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use kioku::config::generate_default_config;
use kioku::models::{group_by_level, NewPracticeSession, RegisterRequest};
use kioku::review::Phase;
use kioku::stats::bar_percent;
use kioku::{
    ApiClient, Card, Config, Conversation, ConversationEntry, FileStore, Grade, LoginRedirect,
    ReviewDriver, ReviewError, Role, Session, SessionStats,
};

#[derive(Parser)]
#[command(name = "kioku")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Japanese vocabulary reviews from the terminal")]
#[command(long_about = "Kioku talks to your study server: review due cards, chat with the practice tutor,\nlook words up and keep notes.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/kioku/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API server URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in
    Login {
        /// Account email
        email: String,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Account email
        email: String,
    },

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in profile
    Whoami,

    /// Due counts and the last days of activity
    Dashboard,

    /// List decks grouped by level
    Decks,

    /// List the cards of a deck
    Cards {
        /// Deck slug
        slug: String,
    },

    /// Review due cards
    Review {
        /// Only review cards from this deck
        #[arg(short, long)]
        deck: Option<String>,
        /// Cards per batch (default from config)
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Chat with the practice tutor
    Practice {
        /// Resume an existing session instead of starting one
        #[arg(short, long)]
        session: Option<i64>,
        /// Topic for a new session
        #[arg(long)]
        context: Option<String>,
    },

    /// Look a word up in the dictionary
    Lookup {
        /// Word in kanji or kana
        word: String,
    },

    /// List your notes
    Notes,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Nothing to navigate in a terminal; point the user at `login` instead
struct TerminalRedirect;

impl LoginRedirect for TerminalRedirect {
    fn redirect_to_login(&self) {
        eprintln!("Your session has expired. Run `kioku login` to sign in again.");
    }
}

type Client = ApiClient<FileStore>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = cli.api_url.clone() {
        config.api.base_url = url;
    }

    kioku::logging::init(&config.logging);
    tracing::debug!("Kioku CLI v{} against {}", env!("CARGO_PKG_VERSION"), config.api.base_url);

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let store = FileStore::open(&config.session.file)?;
    let session = Arc::new(Session::new(store));
    let client = ApiClient::new(&config.api, session, Arc::new(TerminalRedirect))?;

    match cli.command {
        Commands::Login { email } => {
            let password = prompt_secret("Password")?;
            let user = client.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.name, user.email);
        }

        Commands::Register { name, email } => {
            let password = prompt_secret("Password")?;
            let password_confirmation = prompt_secret("Confirm password")?;
            if password != password_confirmation {
                bail!("Passwords do not match");
            }
            let user = client
                .register(&RegisterRequest {
                    name,
                    email,
                    password,
                    password_confirmation,
                })
                .await?;
            println!("Welcome, {}! You are signed in.", user.name);
        }

        Commands::Logout => {
            client.logout().await?;
            println!("Signed out");
        }

        Commands::Whoami => {
            require_login(&client)?;
            let user = client.me().await?;
            println!("{} <{}>", user.name, user.email);
            if let Some(number) = &user.settings.whatsapp_number {
                println!("WhatsApp: {}", number);
            }
        }

        Commands::Dashboard => {
            require_login(&client)?;
            show_dashboard(&client).await?;
        }

        Commands::Decks => {
            require_login(&client)?;
            let decks = client.decks().await?;
            if decks.is_empty() {
                println!("No decks yet");
            }
            for (level, decks) in group_by_level(&decks) {
                println!("{}", level);
                for deck in decks {
                    let badge = if deck.is_official { " [official]" } else { "" };
                    println!(
                        "  {:<24} {:>5} cards  {}{}",
                        deck.slug, deck.card_count, deck.name, badge
                    );
                }
            }
        }

        Commands::Cards { slug } => {
            require_login(&client)?;
            let cards = client.deck_cards(&slug).await?;
            println!("{} cards in {}", cards.len(), slug);
            for card in &cards {
                println!(
                    "  {:<10} {:<12} {}",
                    card.prompt(),
                    card.kana,
                    card.meanings().collect::<Vec<_>>().join(" / ")
                );
            }
        }

        Commands::Review { deck, limit } => {
            require_login(&client)?;
            let batch_size = limit.unwrap_or(config.review.batch_size).max(1);
            run_review(ReviewDriver::new(client, deck, batch_size)).await?;
        }

        Commands::Practice { session, context } => {
            require_login(&client)?;
            run_practice(&client, session, context).await?;
        }

        Commands::Lookup { word } => {
            require_login(&client)?;
            let entries = client.lookup(&word).await?;
            if entries.is_empty() {
                println!("No entries for {}", word);
            }
            for entry in entries {
                let reading = entry.reading.as_deref().unwrap_or("");
                let pos = entry
                    .part_of_speech
                    .as_deref()
                    .map(|p| format!(" ({})", p))
                    .unwrap_or_default();
                println!("{} {}{}", entry.word, reading, pos);
                for (i, meaning) in entry.meanings.iter().enumerate() {
                    println!("  {}. {}", i + 1, meaning);
                }
            }
        }

        Commands::Notes => {
            require_login(&client)?;
            let notes = client.notes().await?;
            if notes.is_empty() {
                println!("No notes yet");
            }
            for note in notes {
                let title = note.title.as_deref().unwrap_or("(untitled)");
                println!("#{} {}", note.id, title);
                for line in note.content.lines() {
                    println!("    {}", line);
                }
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

fn require_login(client: &Client) -> anyhow::Result<()> {
    if !client.session().is_authenticated() {
        bail!("Not signed in. Run `kioku login <email>` first.");
    }
    Ok(())
}

/// Read one line from stdin; `None` on end of input
fn prompt(label: &str) -> anyhow::Result<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;

    let mut line = String::new();
    let read = std::io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt_secret(label: &str) -> anyhow::Result<String> {
    prompt(&format!("{}: ", label))?.context("No input")
}

async fn show_dashboard(client: &Client) -> anyhow::Result<()> {
    let dashboard = client.dashboard().await?;
    let summary = kioku::summarize(&dashboard.chart_data);

    println!("Due today:   {}", dashboard.due_count);
    println!("New cards:   {}", dashboard.new_count);
    println!("Learned:     {} / {}", dashboard.learned_cards, dashboard.total_cards);
    println!("Streak:      {} day(s)", summary.streak);
    println!();

    for day in &dashboard.chart_data {
        let width = (bar_percent(day, &dashboard.chart_data) / 5) as usize;
        println!(
            "  {}  {:<20} {:>4} reviews  {:>3} min",
            day.date.format("%a %d"),
            "#".repeat(width),
            day.reviews,
            day.focus_minutes
        );
    }

    println!();
    println!(
        "This week: {} reviews, {} focus minutes, {} active day(s)",
        summary.reviews, summary.focus_minutes, summary.active_days
    );
    if let Some(best) = summary.best_day {
        println!("Best day:  {}", best.format("%A %d %B"));
    }
    Ok(())
}

// ============ Review ============

fn print_question(card: &Card, remaining: usize) {
    println!();
    println!("[{} left]  {}", remaining, card.prompt());
}

fn print_answer(card: &Card) {
    if card.kanji.is_some() {
        println!("  Reading: {}", card.kana);
    }
    if let Some(m) = &card.meaning_id {
        println!("  Arti:    {}", m);
    }
    if let Some(m) = &card.meaning_en {
        println!("  Meaning: {}", m);
    }
    for example in card.examples.iter().take(2) {
        println!("  例: {}", example.japanese);
        if let Some(t) = &example.translation {
            println!("      {}", t);
        }
    }
}

fn print_summary(stats: &SessionStats) {
    println!();
    println!("Session complete");
    println!("  Reviewed:  {}", stats.total);
    println!("  Correct:   {}", stats.correct);
    println!("  Incorrect: {}", stats.incorrect);
    if let Some(accuracy) = stats.accuracy() {
        println!("  Accuracy:  {:.0}%", accuracy * 100.0);
    }
    if let Some(avg) = stats.average_ms() {
        println!("  Avg time:  {:.1}s", avg as f64 / 1000.0);
    }
}

/// Report a failed action and keep the session going. A 401 ends it.
fn report(err: ReviewError) -> anyhow::Result<()> {
    if let ReviewError::Client(e) = &err {
        if e.is_unauthorized() {
            return Err(err.into());
        }
    }
    eprintln!("  ! {}", err);
    Ok(())
}

async fn run_review(mut driver: ReviewDriver<Client>) -> anyhow::Result<()> {
    driver.start().await?;
    if driver.session().is_finished() {
        println!("Nothing due right now. Nice work!");
        return Ok(());
    }
    println!("Type your answer (kana or meaning), Enter to reveal. u undo, s skip, q quit.");

    loop {
        let phase = driver.session().phase().clone();
        match phase {
            Phase::Loading => {
                let Some(choice) = prompt("Fetching cards failed. [r]etry, [q]uit > ")? else {
                    break;
                };
                if choice.trim() == "q" {
                    break;
                }
                if let Err(e) = driver.continue_session().await {
                    report(e)?;
                }
            }

            Phase::Finished => {
                print_summary(&driver.session().stats());
                let Some(choice) = prompt("[c]ontinue, [r]estart, [q]uit > ")? else {
                    break;
                };
                let result = match choice.trim() {
                    "c" => driver.continue_session().await,
                    "r" => driver.restart().await,
                    "u" => driver.undo().map(|outcome| {
                        println!("  Undid {} (the server keeps that grade)", outcome.grade);
                    }),
                    _ => break,
                };
                if let Err(e) = result {
                    report(e)?;
                }
                if driver.session().is_finished() {
                    println!("No more cards due.");
                    break;
                }
            }

            Phase::Question => {
                let Some(card) = driver.session().current().cloned() else {
                    continue;
                };
                print_question(&card, driver.session().remaining());
                let Some(input) = prompt("> ")? else { break };
                match input.trim() {
                    "q" => break,
                    "u" => match driver.undo() {
                        Ok(outcome) => println!(
                            "  Undid {} (the server keeps that grade)",
                            outcome.grade
                        ),
                        Err(e) => report(e)?,
                    },
                    "s" => {
                        driver.skip()?;
                    }
                    "" => driver.session_mut().reveal()?,
                    guess => {
                        let check = driver.session_mut().check_answer(guess)?;
                        if check.is_correct() {
                            println!("  ✓ correct");
                        } else {
                            println!("  ✗ not quite");
                        }
                        driver.session_mut().reveal()?;
                    }
                }
            }

            Phase::Checked(_) => driver.session_mut().reveal()?,

            Phase::Answer => {
                let Some(card) = driver.session().current().cloned() else {
                    continue;
                };
                print_answer(&card);
                if let Some(sentence) = &driver.session().reveal_state().sentence {
                    println!("  Sentence: {}", sentence);
                }
                if driver.session().reveal_state().mnemonic {
                    if let Some(m) = &card.mnemonic {
                        println!("  Mnemonic: {}", m);
                    }
                }

                let Some(input) = prompt("1 again  2 hard  3 good  4 easy  (m mnemonic, x sentence) > ")? else {
                    break;
                };
                let key = input.trim();
                if key == "q" {
                    break;
                }
                let result = match key {
                    "u" => driver.undo().map(|outcome| {
                        println!("  Undid {} (the server keeps that grade)", outcome.grade);
                    }),
                    "s" => driver.skip().map(|_| ()),
                    "m" => driver.mnemonic().await.map(|_| ()),
                    "x" => driver.sentence().await.map(|_| ()),
                    other => match other.parse::<Grade>() {
                        Ok(grade) => driver.grade(grade).await.map(|_| ()),
                        Err(_) => {
                            println!("  Unknown key {:?}", other);
                            Ok(())
                        }
                    },
                };
                if let Err(e) = result {
                    report(e)?;
                }
            }
        }
    }

    let stats = driver.session().stats();
    if stats.total > 0 && !driver.session().is_finished() {
        print_summary(&stats);
    }
    Ok(())
}

// ============ Practice ============

async fn run_practice(
    client: &Client,
    session_id: Option<i64>,
    context: Option<String>,
) -> anyhow::Result<()> {
    let session = match session_id {
        Some(id) => client.practice_session(id).await?,
        None => {
            client
                .create_practice_session(&NewPracticeSession {
                    context,
                    material_id: None,
                })
                .await?
        }
    };

    println!(
        "Practice session #{}{}",
        session.id,
        session
            .title
            .as_deref()
            .map(|t| format!(": {}", t))
            .unwrap_or_default()
    );
    if let Some(reference) = &session.reading_reference {
        println!("Reading: {}", reference);
    }
    println!("Write in Japanese. Empty line or /quit to leave.");

    let mut conversation = Conversation::from_session(&session);
    for entry in conversation.entries() {
        print_entry(entry);
    }

    loop {
        let Some(line) = prompt("あなた> ")? else { break };
        let text = line.trim();
        if text.is_empty() || text == "/quit" {
            break;
        }

        let pending = match conversation.send(text) {
            Ok(pending) => pending,
            Err(e) => {
                eprintln!("  ! {}", e);
                continue;
            }
        };

        match client.send_practice_message(conversation.session_id(), text).await {
            Ok(reply) => {
                conversation.confirm(pending, reply)?;
                if let Some(last) = conversation.entries().last() {
                    print_entry(last);
                }
            }
            Err(e) => {
                conversation.rollback(pending)?;
                if e.is_unauthorized() {
                    return Err(e.into());
                }
                eprintln!("  ! Message not sent: {}", e);
            }
        }
    }

    Ok(())
}

fn print_entry(entry: &ConversationEntry) {
    let who = match entry.role() {
        Role::User => "あなた",
        Role::Assistant => "先生",
    };
    println!("{}: {}", who, entry.content());
}
