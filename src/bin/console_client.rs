//! Console client: plays one round against the house and logs every card.

use std::sync::Arc;

use anyhow::Error;
use half_deck::{GameEngine, LoggingObserver, Player, Table, TableConfig, TableWorker};
use log::info;
use pico_args::Arguments;

const HELP: &str = "\
Play one round of the half-deck game on the console

USAGE:
  console_client [OPTIONS]

OPTIONS:
  --seed       N           Seed for a reproducible first shuffle
  --delay      MS          Delay between cards, 0..=1000  [default: 100]

FLAGS:
  --show-deck              Log a freshly shuffled deck before playing
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter, e.g. debug to see every card
";

const BET: u32 = 100;

struct Args {
    seed: Option<u64>,
    delay_ms: u64,
    show_deck: bool,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        seed: pargs.opt_value_from_str("--seed")?,
        delay_ms: pargs.opt_value_from_str("--delay")?.unwrap_or(100),
        show_deck: pargs.contains("--show-deck"),
    };

    env_logger::builder()
        .format_target(false)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut config = TableConfig::default().with_deal_delay(args.delay_ms);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut table = Table::new(config)?;
    table.add_dealing_observer(Arc::new(LoggingObserver));

    if args.show_deck {
        for (i, card) in table.engine().shuffled_half_deck().iter().enumerate() {
            info!("{:>2}: {card}", i + 1);
        }
    }

    let worker = TableWorker::spawn(table)?;
    let handle = worker.handle();

    handle.add_player(Player::new("1", "The Loser", 500))?;
    handle.add_player(Player::new("2", "The Shark", 1000))?;

    for player in handle.players()? {
        if player.points() <= BET {
            info!("{} sits this round out", player.name());
            continue;
        }
        handle.place_bet(player.id(), BET)?;
        handle.deal_player(player.id(), args.delay_ms)?;
    }

    handle.deal_house(args.delay_ms)?;
    worker.shutdown();
    Ok(())
}
