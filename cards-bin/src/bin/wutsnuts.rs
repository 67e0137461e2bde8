use cards_core::{cards_from_str, nuts, Card, Deck, Score, ALL_RANKS, ALL_SUITS};
use itertools::Itertools;
use std::cmp::Ordering;
use structopt::StructOpt;

/// Given 3+ community cards, find the strongest pocket(s): the nuts.
#[derive(StructOpt)]
#[structopt(name = "wutsnuts")]
struct Opt {
    /// Community cards as a run of tokens (e.g. "AhKd7c2s9d"). Dealt from a
    /// fresh deck when not given.
    #[structopt(short, long)]
    board: Option<String>,

    /// Number of community cards to deal when --board is not given
    #[structopt(short = "n", long, default_value = "5")]
    deal: usize,
}

/// Every pocket that achieves the best possible score with this board, with
/// the score and winning 5 cards it achieves.
///
/// Checks every 2-card pocket not already on the board. With a full 5-card
/// board that's C(47,2) pockets, each costing a full best-hand search, so run
/// with --release.
fn find_nuts(community: &[Card]) -> Vec<([Card; 2], Score, Vec<Card>)> {
    let mut best: Vec<([Card; 2], Score, Vec<Card>)> = vec![];
    if community.len() < 3 {
        return best;
    }
    // A-high down to 2, spades first, just because it reads well in output
    let deck: Vec<Card> = ALL_RANKS
        .iter()
        .rev()
        .cartesian_product(ALL_SUITS.iter().rev())
        .map(|x| Card::new(*x.0, *x.1))
        .filter(|c| !community.contains(c))
        .collect();
    for pair in deck.iter().combinations(2) {
        let pocket = [*pair[0], *pair[1]];
        let mut pool = pocket.to_vec();
        pool.extend_from_slice(community);
        let (score, hand) = nuts(&pool);
        let ord = match best.first() {
            None => Ordering::Greater,
            Some((_, top, _)) => score.cmp(top),
        };
        match ord {
            Ordering::Less => {}
            Ordering::Equal => best.push((pocket, score, hand)),
            Ordering::Greater => {
                best.clear();
                best.push((pocket, score, hand));
            }
        }
    }
    best
}

fn main() {
    let opt = Opt::from_args();
    let community = match &opt.board {
        Some(s) => match cards_from_str(s) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("bad --board: {}", e);
                std::process::exit(1);
            }
        },
        None => {
            let mut d = Deck::default();
            (0..opt.deal).map(|_| d.draw().unwrap()).collect()
        }
    };
    println!(
        "Given community {}, the best possible hands are:",
        community.iter().map(|c| c.to_string()).join(" ")
    );
    for (pocket, score, hand) in find_nuts(&community) {
        println!(
            "  {}{}: {} ({}, score {})",
            pocket[0],
            pocket[1],
            hand.iter().map(|c| c.to_string()).join(""),
            score.name(),
            score,
        );
    }
}
