use cards_core::{Board, Deck, DeckSeed, Pool};
use itertools::Itertools;
use structopt::StructOpt;

/// Deal a board and some pockets, then show everyone's best five at showdown.
#[derive(StructOpt)]
#[structopt(name = "showdown")]
struct Opt {
    /// Number of players to deal in
    #[structopt(short, long, default_value = "4")]
    players: u8,

    /// Base64 deck seed for a reproducible deal
    #[structopt(short, long)]
    seed: Option<DeckSeed>,
}

fn main() {
    let opt = Opt::from_args();
    let (mut deck, seed) = match opt.seed {
        Some(s) => (Deck::new(&s), s),
        None => Deck::deck_and_seed(),
    };
    println!("seed: {}", seed);

    let pockets = match deck.deal_pockets(opt.players) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let community = Board::new();
    let mut pools = vec![];
    for pocket in pockets {
        let mut pool = Pool::new();
        pool.add(pocket).expect("pocket cards are cards");
        pool.add(community.clone()).expect("board handle is a board");
        pools.push(pool);
    }

    // flop, turn, river; every pool sees the shared board grow
    deck.burn();
    for _ in 0..3 {
        community.push(deck.draw().unwrap());
    }
    deck.burn();
    community.push(deck.draw().unwrap());
    deck.burn();
    community.push(deck.draw().unwrap());

    println!(
        "board: {}",
        community.cards().iter().map(|c| c.to_string()).join(" ")
    );
    let winner = pools
        .iter()
        .map(Pool::score)
        .max()
        .expect("at least one player");
    for (i, pool) in pools.iter().enumerate() {
        let tag = if pool.score() == winner { " <-- winner" } else { "" };
        println!(
            "player {}: {} -> {} ({}){}",
            i + 1,
            pool,
            pool.best_five().iter().map(|c| c.to_string()).join(""),
            pool.class_name(),
            tag,
        );
    }
}
