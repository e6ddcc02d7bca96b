//! Wager Vault Simulator
//!
//! Funds a vault on an in-memory ledger, plays a run of wagers against it and
//! reports the resulting balances and win rate. Without `--seed` the draws
//! come from a VRF and the retained proofs are verified before exit.

use clap::{Parser, ValueEnum};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use wager_vault::common::traits::{EventSink, Ledger, RandomnessSource};
use wager_vault::games::{SeededRandomness, VrfRandomness};
use wager_vault::logging::init_logging;
use wager_vault::{
    AccountId, AssetType, BroadcastEventSink, ConfigLoader, InMemoryLedger, SettlementEngine, TracingEventSink,
    WagerError,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Game {
    Flip,
    Delegate,
    Roulette,
}

#[derive(Parser, Debug)]
#[command(name = "wager-sim")]
#[command(about = "Wager Vault settlement simulator", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Game to play
    #[arg(long, value_enum, default_value = "flip")]
    game: Game,

    /// Number of wagers
    #[arg(long, default_value = "1000")]
    rounds: u64,

    /// Stake per wager in smallest units
    #[arg(long, default_value = "100")]
    bet: u64,

    /// Seed for reproducible outcomes (VRF when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Roulette numbers (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "7")]
    numbers: Vec<u64>,

    /// Initial bankroll for both the player and the vault
    #[arg(long, default_value = "10000000")]
    bankroll: u64,

    /// Print counters in Prometheus text format when done
    #[arg(long)]
    metrics: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(ref path) = args.config {
        loader = loader.with_path(path);
    }
    let config = loader.load()?;
    init_logging(&config.logging);

    let asset: AssetType = config.primary_asset();
    let house = AccountId::new("house");
    let player = AccountId::new("player");

    let ledger = Arc::new(InMemoryLedger::new());
    for account in [&house, &player] {
        ledger.open_account(account, &asset)?;
        ledger.credit(account, &asset, args.bankroll)?;
    }

    let (randomness, vrf): (Arc<dyn RandomnessSource>, Option<Arc<VrfRandomness>>) = match args.seed {
        Some(seed) => (Arc::new(SeededRandomness::new(seed)), None),
        None => {
            let vrf = Arc::new(VrfRandomness::new_random("wager-sim"));
            (vrf.clone(), Some(vrf))
        }
    };

    let sink = Arc::new(BroadcastEventSink::new(1024));
    let mut receiver = sink.subscribe();
    let reporter = tokio::spawn(async move {
        let tracing_sink = TracingEventSink;
        let mut received = 0u64;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    received += 1;
                    tracing_sink.emit(event);
                }
                Err(RecvError::Lagged(skipped)) => received += skipped,
                Err(RecvError::Closed) => break,
            }
        }
        received
    });

    let engine = SettlementEngine::new(config, ledger.clone(), randomness, sink.clone())?;
    match args.game {
        Game::Delegate => {
            engine.create_delegate_vault(&house)?;
            engine.delegate_vaults().add_coins(&house, &house, args.bankroll)?;
        }
        Game::Flip | Game::Roulette => {
            engine.create_vault(&house)?;
            engine.vaults().add_coins(&house, &house, args.bankroll)?;
        }
    }

    println!("🎲 Playing {} {:?} wagers of {}", args.rounds, args.game, args.bet);
    let mut stopped_early = None;
    for _ in 0..args.rounds {
        let result = match args.game {
            Game::Flip => engine.play(&player, args.bet, &house).map(|_| ()),
            Game::Delegate => engine.play_delegate(&player, args.bet, &house, &asset).map(|_| ()),
            Game::Roulette => engine
                .play_roulette(&player, args.bet, &args.numbers, &house, &asset)
                .map(|_| ()),
        };
        if let Err(e) = result {
            stopped_early = Some(e);
            break;
        }
    }

    let metrics = engine.metrics().clone();
    let snapshot = metrics.snapshot();
    let vault_balance = match args.game {
        Game::Delegate => engine.delegate_vaults().custody_balance(&house, &asset)?,
        Game::Flip | Game::Roulette => engine.vaults().custody_balance(&house, &asset)?,
    };

    drop(engine);
    drop(sink);
    let events = reporter.await?;

    if let Some(e) = stopped_early {
        match e {
            WagerError::InsufficientFunds { .. } | WagerError::TransferFailed(_) => {
                println!("⚠️  Stopped early: {}", e)
            }
            other => return Err(other.into()),
        }
    }

    println!("✅ Settled {} wagers ({} events)", snapshot.wagers_settled, events);
    println!("   Won:        {}", snapshot.wagers_won);
    println!("   Lost:       {}", snapshot.wagers_lost());
    println!("   Win rate:   {:.4}", snapshot.win_rate());
    println!("   Player:     {}", ledger.balance(&player, &asset));
    println!("   Vault:      {}", vault_balance);
    println!("   Supply:     {}", ledger.total_supply(&asset));

    if let Some(vrf) = vrf {
        let proofs = vrf.take_proofs();
        let mut verified = 0usize;
        for proof in &proofs {
            if VrfRandomness::verify_proof(proof)? {
                verified += 1;
            }
        }
        println!("🔐 VRF key:    {}", vrf.public_key_hex());
        println!("   Proofs:     {} of the last {} verified", verified, proofs.len());
        if verified != proofs.len() {
            return Err("VRF proof verification failed".into());
        }
    }

    if args.metrics {
        print!("{}", metrics.to_prometheus_format());
    }

    Ok(())
}
