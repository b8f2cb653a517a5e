use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use blackjack_table::{Engine, FileStore, GamePhase, TableConfig, TableEvent};
use clap::Parser;

#[derive(Parser)]
#[command(name = "blackjack-cli", about = "Play blackjack against the dealer in the terminal")]
struct Args {
    /// Fix the shuffle order
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the win/loss tally
    #[arg(long, default_value = ".blackjack")]
    stats_dir: PathBuf,

    /// Key the tally is stored under
    #[arg(long, default_value = blackjack_table::config::DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Play this many rounds hitting below 17, then print the tally
    #[arg(long)]
    autoplay: Option<u32>,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = TableConfig {
        seed: args.seed,
        storage_key: args.storage_key,
    };
    let mut engine = Engine::new(&config, Box::new(FileStore::new(&args.stats_dir)));

    match args.autoplay {
        Some(rounds) => autoplay(&mut engine, rounds),
        None => interactive(&mut engine),
    }
}

fn autoplay(engine: &mut Engine, rounds: u32) -> io::Result<()> {
    for _ in 0..rounds {
        engine.new_game();
        engine.settle();
        while engine.phase() == GamePhase::PlayerTurn && engine.player_score() < 17 {
            engine.hit();
        }
        engine.stand();
        engine.settle();
        engine.take_events();
    }
    let stats = engine.stats();
    println!("Wins: {}  Losses: {}", stats.wins, stats.losses);
    Ok(())
}

fn interactive(engine: &mut Engine) -> io::Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    engine.new_game();
    loop {
        engine.settle();
        print_events(engine);
        print_table(engine);

        print!("[h]it [s]tand [n]ew game [q]uit > ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let accepted = match line?.trim() {
            "h" | "hit" => engine.hit(),
            "s" | "stand" => engine.stand(),
            "n" | "new" => engine.new_game(),
            "q" | "quit" => return Ok(()),
            other => {
                println!("Unknown command '{other}'");
                continue;
            }
        };
        if !accepted {
            println!("Not now.");
        }
    }
}

fn print_events(engine: &mut Engine) {
    for event in engine.take_events() {
        match event {
            TableEvent::CardDealt { .. } | TableEvent::DealerRevealed => {}
            TableEvent::Resolved { outcome } => println!("\n*** {} ***", outcome.message()),
        }
    }
}

fn print_table(engine: &Engine) {
    let dealer: Vec<String> = engine
        .dealer_cards()
        .iter()
        .enumerate()
        .map(|(index, card)| {
            if index == 0 && engine.dealer_hidden() {
                "??".to_string()
            } else {
                card.to_string()
            }
        })
        .collect();
    let player: Vec<String> = engine.player_cards().iter().map(|card| card.to_string()).collect();
    let dealer_score = engine
        .dealer_score()
        .map_or_else(|| "?".to_string(), |score| score.to_string());
    let stats = engine.stats();

    println!();
    println!("Dealer: {:<24} Score: {}", dealer.join(" "), dealer_score);
    println!("You:    {:<24} Score: {}", player.join(" "), engine.player_score());
    println!("Wins: {}  Losses: {}", stats.wins, stats.losses);
}
