//! The hand-ranking engine: category detectors, the score encoding, and the
//! best-hand ("nuts") search.
//!
//! Every detector consumes a flat slice of cards and returns *all* qualifying
//! 5-card combinations for its category, strongest first, so `nuts` can assume
//! the first candidate is the best one. Pools with fewer than 5 cards produce
//! no candidates and are never an error.

use super::card::{Card, Rank, Suit, ALL_RANKS};
use enum_map::EnumMap;
use itertools::Itertools;
use std::collections::BTreeMap;
use std::fmt;

pub const HAND_LEN: usize = 5;
/// When set, an ace may play low in a straight: A5432, the wheel.
pub const WRAP_FINAL_RANK: bool = true;

const CLASS_MULT: i64 = 1_000_000;
const MEMO_LIMIT: usize = 10;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HandClass {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
}

impl HandClass {
    pub fn value(self) -> i64 {
        self as i64
    }

    pub fn from_value(v: i64) -> Option<Self> {
        match v {
            0 => Some(Self::HighCard),
            1 => Some(Self::Pair),
            2 => Some(Self::TwoPair),
            3 => Some(Self::ThreeOfAKind),
            4 => Some(Self::Straight),
            5 => Some(Self::Flush),
            6 => Some(Self::FullHouse),
            7 => Some(Self::FourOfAKind),
            8 => Some(Self::StraightFlush),
            9 => Some(Self::RoyalFlush),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::HighCard => "high card",
            Self::Pair => "one pair",
            Self::TwoPair => "two pair",
            Self::ThreeOfAKind => "three of a kind",
            Self::Straight => "straight",
            Self::Flush => "flush",
            Self::FullHouse => "full house",
            Self::FourOfAKind => "four of a kind",
            Self::StraightFlush => "straight flush",
            Self::RoyalFlush => "royal flush",
        }
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A totally-ordered hand strength. Encoded scores are
/// `class * 1_000_000 + t1 * 10_000 + t2 * 100 + t3` with tiebreaks being raw
/// rank values (2..=14); the class term always dominates because the largest
/// tiebreak contribution is 141_414. Bare high-card scores are the top card's
/// raw `order_value` and sit below the class threshold, so callers must not
/// assume every score is a pre-encoded 6-digit number.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Score(i64);

impl Score {
    pub const ZERO: Self = Score(0);

    pub fn value(self) -> i64 {
        self.0
    }

    /// The class part of the score: the encoded class for encoded scores, the
    /// raw value otherwise (see the type-level note about bare high cards).
    pub fn class_value(self) -> i64 {
        if self.0 < CLASS_MULT {
            self.0
        } else {
            self.0 / CLASS_MULT
        }
    }

    pub fn class(self) -> Option<HandClass> {
        HandClass::from_value(self.class_value())
    }

    pub fn name(self) -> String {
        match self.class() {
            Some(c) => c.name().to_string(),
            None => format!("nothing (value={})", self.0),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn join_score(class: HandClass, t1: u8, t2: u8, t3: u8) -> Score {
    Score(class.value() * CLASS_MULT + t1 as i64 * 10_000 + t2 as i64 * 100 + t3 as i64)
}

pub fn score_class(score: Score) -> i64 {
    score.class_value()
}

fn sorted_desc(cards: &[Card]) -> Vec<Card> {
    cards.iter().copied().sorted_unstable().rev().collect()
}

/// Cards must be sorted descending. A run is 5 consecutive ranks; with
/// `wrap_final_rank` the ace may also stand in for rank 1 atop a 5-high run.
fn is_run(cards: &[Card; 5], wrap_final_rank: bool) -> bool {
    let consec = |lo: usize, hi: usize| {
        (lo..hi).all(|i| cards[i].rank().value() == cards[i + 1].rank().value() + 1)
    };
    if wrap_final_rank
        && cards[0].rank() == Rank::RA
        && cards[1].rank() == Rank::R5
        && cards[4].rank() == Rank::R2
        && consec(1, 4)
    {
        return true;
    }
    consec(0, 4)
}

fn is_wheel(cards: &[Card; 5], wrap_final_rank: bool) -> bool {
    wrap_final_rank
        && cards[0].rank() == Rank::RA
        && cards[1].rank() == Rank::R5
        && cards[4].rank() == Rank::R2
}

/// Canonical tiebreak order for a qualifying run: descending, except a wheel
/// rotates the ace to the back where it plays as rank 1. The effective top
/// card is then always at index 0 (rank 5 for the wheel, not 14).
fn low_ace_order(mut cards: [Card; 5], wrap_final_rank: bool) -> [Card; 5] {
    if is_wheel(&cards, wrap_final_rank) {
        cards.rotate_left(1);
    }
    cards
}

fn five(combo: Vec<Card>) -> [Card; 5] {
    [combo[0], combo[1], combo[2], combo[3], combo[4]]
}

/// All 5-card flushes in the pool, best first. Every 5-card subset of every
/// suit group of 5+ cards is a candidate, not just each group's top 5.
pub fn flushes(cards: &[Card]) -> Vec<[Card; 5]> {
    if cards.len() < HAND_LEN {
        return vec![];
    }
    let mut by_suit: EnumMap<Suit, Vec<Card>> = EnumMap::default();
    for c in sorted_desc(cards) {
        by_suit[c.suit()].push(c);
    }
    let mut out = vec![];
    for (_suit, group) in by_suit {
        if group.len() < HAND_LEN {
            continue;
        }
        // group is descending, so each combination comes out descending too
        for combo in group.into_iter().combinations(HAND_LEN) {
            out.push(five(combo));
        }
    }
    out.sort_unstable_by(|a, b| b.cmp(a));
    out
}

pub fn straights(cards: &[Card]) -> Vec<[Card; 5]> {
    straights_wrap(cards, WRAP_FINAL_RANK)
}

/// All 5-card straights, best first by effective top card. A wheel candidate
/// is canonicalized via [`low_ace_order`] so its top card reads as the 5.
pub fn straights_wrap(cards: &[Card], wrap_final_rank: bool) -> Vec<[Card; 5]> {
    if cards.len() < HAND_LEN {
        return vec![];
    }
    let mut out = vec![];
    for combo in sorted_desc(cards).into_iter().combinations(HAND_LEN) {
        let run = five(combo);
        if is_run(&run, wrap_final_rank) {
            out.push(low_ace_order(run, wrap_final_rank));
        }
    }
    out.sort_unstable_by_key(|run| std::cmp::Reverse(run[0].order_value()));
    out
}

/// Group the pool's cards by rank and bucket the groups by size, restricted to
/// `[min_count, max_count]`. Buckets map group size (2 pairs, 3 trips, 4
/// quads) to rank groups in descending rank order; each group's cards are
/// descending by suit tiebreak.
pub fn pair_groups(
    cards: &[Card],
    min_count: usize,
    max_count: usize,
) -> BTreeMap<usize, Vec<Vec<Card>>> {
    let mut by_rank: EnumMap<Rank, Vec<Card>> = EnumMap::default();
    for c in sorted_desc(cards) {
        by_rank[c.rank()].push(c);
    }
    let mut out: BTreeMap<usize, Vec<Vec<Card>>> = BTreeMap::new();
    for rank in ALL_RANKS.iter().rev() {
        let group = &by_rank[*rank];
        if group.len() >= min_count && group.len() <= max_count {
            out.entry(group.len()).or_default().push(group.clone());
        }
    }
    out
}

/// All full houses: every trips group crossed with the top two cards of every
/// other pair-or-better group, trips first. Best first by trips rank, then
/// pair rank.
pub fn full_houses(cards: &[Card]) -> Vec<[Card; 5]> {
    let groups = pair_groups(cards, 2, 3);
    let trips = match groups.get(&3) {
        Some(t) => t,
        None => return vec![],
    };
    let mut out = vec![];
    for t in trips {
        for gs in groups.values() {
            for g in gs {
                if g[0].rank() == t[0].rank() {
                    continue;
                }
                out.push([t[0], t[1], t[2], g[0], g[1]]);
            }
        }
    }
    out.sort_unstable_by_key(|h| std::cmp::Reverse((h[0].rank().value(), h[3].rank().value())));
    out
}

pub fn straight_flushes(cards: &[Card]) -> Vec<[Card; 5]> {
    straight_flushes_wrap(cards, WRAP_FINAL_RANK)
}

/// Flush candidates that also qualify as runs, canonicalized and sorted best
/// first by effective top card.
pub fn straight_flushes_wrap(cards: &[Card], wrap_final_rank: bool) -> Vec<[Card; 5]> {
    let mut out: Vec<[Card; 5]> = flushes(cards)
        .into_iter()
        .filter(|f| is_run(f, wrap_final_rank))
        .map(|f| low_ace_order(f, wrap_final_rank))
        .collect();
    out.sort_unstable_by_key(|run| std::cmp::Reverse(run[0].order_value()));
    out
}

/// Straight flushes whose effective top card is the ace: the non-wrapped,
/// top-of-deck straight flush.
pub fn royal_flushes(cards: &[Card]) -> Vec<[Card; 5]> {
    straight_flushes(cards)
        .into_iter()
        .filter(|run| run[0].rank() == Rank::RA)
        .collect()
}

/// The best achievable hand: its score and the (up to) 5 cards justifying it.
///
/// Categories are checked strictly from strongest to weakest and the first
/// match wins. Matches of fewer than 5 cards are padded with the strongest
/// remaining cards from the whole pool (kickers, appended last and not
/// re-sorted). An empty pool scores zero with an empty hand.
pub fn nuts(cards: &[Card]) -> (Score, Vec<Card>) {
    let pool = sorted_desc(cards);
    if pool.is_empty() {
        return (Score::ZERO, vec![]);
    }

    let fill = |pick: &[Card]| {
        let mut ret = pick.to_vec();
        for c in &pool {
            if ret.len() >= HAND_LEN {
                break;
            }
            if !ret.contains(c) {
                ret.push(*c);
            }
        }
        ret
    };
    let kicker_at = |hand: &[Card], idx: usize| hand.get(idx).map_or(0, |c| c.rank().value());

    if let Some(res) = royal_flushes(&pool).first() {
        let score = join_score(HandClass::RoyalFlush, res[0].rank().value(), 0, 0);
        return (score, res.to_vec());
    }

    if let Some(res) = straight_flushes(&pool).first() {
        let score = join_score(HandClass::StraightFlush, res[0].rank().value(), 0, 0);
        return (score, res.to_vec());
    }

    let groups = pair_groups(&pool, 2, 4);

    if let Some(quads) = groups.get(&4).and_then(|g| g.first()) {
        let hand = fill(quads);
        let score = join_score(HandClass::FourOfAKind, quads[0].rank().value(), 0, 0);
        return (score, hand);
    }

    if let Some(res) = full_houses(&pool).first() {
        let score = join_score(
            HandClass::FullHouse,
            res[0].rank().value(),
            res[3].rank().value(),
            0,
        );
        return (score, res.to_vec());
    }

    if let Some(res) = flushes(&pool).first() {
        let score = join_score(HandClass::Flush, res[0].rank().value(), 0, 0);
        return (score, res.to_vec());
    }

    if let Some(res) = straights(&pool).first() {
        let score = join_score(HandClass::Straight, res[0].rank().value(), 0, 0);
        return (score, res.to_vec());
    }

    if let Some(trips) = groups.get(&3).and_then(|g| g.first()) {
        let hand = fill(trips);
        let score = join_score(
            HandClass::ThreeOfAKind,
            trips[0].rank().value(),
            kicker_at(&hand, 3),
            0,
        );
        return (score, hand);
    }

    if let Some(pairs) = groups.get(&2) {
        if pairs.len() >= 2 {
            let mut pick = pairs[0].clone();
            pick.extend_from_slice(&pairs[1]);
            let hand = fill(&pick);
            let score = join_score(
                HandClass::TwoPair,
                pairs[0][0].rank().value(),
                pairs[1][0].rank().value(),
                kicker_at(&hand, 4),
            );
            return (score, hand);
        }
        if let Some(pair) = pairs.first() {
            let hand = fill(pair);
            let score = join_score(
                HandClass::Pair,
                pair[0].rank().value(),
                kicker_at(&hand, 2),
                0,
            );
            return (score, hand);
        }
    }

    let hand = pool.iter().copied().take(HAND_LEN).collect();
    (Score(pool[0].order_value() as i64), hand)
}

/// A `nuts` front-end with a small bounded memo keyed by the exact card
/// sequence. The cache is owned by this value, never process-global, and
/// memoized results are identical to unmemoized ones.
#[derive(Debug, Default)]
pub struct Evaluator {
    cache: Vec<(Vec<Card>, (Score, Vec<Card>))>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn evaluate(&mut self, cards: &[Card]) -> (Score, Vec<Card>) {
        if let Some((_, hit)) = self.cache.iter().find(|(k, _)| k == cards) {
            return hit.clone();
        }
        let res = nuts(cards);
        if self.cache.len() >= MEMO_LIMIT {
            self.cache.remove(0);
        }
        self.cache.push((cards.to_vec(), res.clone()));
        res
    }
}


#[cfg(test)]
mod test_detectors {
    use super::*;
    use crate::cards::card::cards_from_str;

    fn cards(s: &str) -> Vec<Card> {
        cards_from_str(s).unwrap()
    }

    #[test]
    fn undersized_pools_yield_nothing() {
        for s in ["", "Ah", "AhKh", "AhKhQhJh"] {
            let c = cards(s);
            assert!(flushes(&c).is_empty());
            assert!(straights(&c).is_empty());
            assert!(full_houses(&c).is_empty());
            assert!(straight_flushes(&c).is_empty());
            assert!(royal_flushes(&c).is_empty());
        }
    }

    #[test]
    fn flushes_all_subsets() {
        // Six hearts: C(6,5) = 6 candidates, best one is the top five
        let c = cards("2h4h6h8hThQh9c");
        let f = flushes(&c);
        assert_eq!(f.len(), 6);
        let top: Vec<String> = f[0].iter().map(|c| c.to_string()).collect();
        assert_eq!(top.join(""), "QhTh8h6h4h");
    }

    #[test]
    fn flushes_best_suit_wins() {
        // Five clubs and five spades; the ace-high spades must come first
        let c = cards("2c3c4c5c7cAsKsQsJs9s");
        let f = flushes(&c);
        assert_eq!(f.len(), 2);
        assert_eq!(f[0][0], "As".parse().unwrap());
    }

    #[test]
    fn flushes_none_for_four_suited() {
        let c = cards("2h4h6h8hTc9c5d");
        assert!(flushes(&c).is_empty());
    }

    #[test]
    fn straights_basic() {
        let c = cards("9h8c7d6s5c2h2d");
        let s = straights(&c);
        assert!(!s.is_empty());
        assert_eq!(s[0][0].rank(), Rank::R9);
    }

    #[test]
    fn straights_pick_highest_top() {
        let c = cards("Th9h8c7d6s5c");
        let s = straights(&c);
        // T-high first, 9-high after
        assert_eq!(s[0][0].rank(), Rank::RT);
        assert_eq!(s[1][0].rank(), Rank::R9);
    }

    #[test]
    fn straights_wheel() {
        let c = cards("Ah2c3d4s5c");
        let s = straights(&c);
        assert_eq!(s.len(), 1);
        // Ace rotated to the back, effective top card is the 5
        assert_eq!(s[0][0].rank(), Rank::R5);
        assert_eq!(s[0][4].rank(), Rank::RA);
    }

    #[test]
    fn straights_no_wheel_when_wrap_off() {
        let c = cards("Ah2c3d4s5c");
        assert!(straights_wrap(&c, false).is_empty());
        // A real straight is unaffected by the knob
        let c = cards("6h5c4d3s2c");
        assert_eq!(straights_wrap(&c, false).len(), 1);
    }

    #[test]
    fn straights_no_wrap_around_top() {
        // QKA23 is never a straight
        let c = cards("QhKcAd2s3c");
        assert!(straights(&c).is_empty());
    }

    #[test]
    fn pair_groups_buckets() {
        let c = cards("AhAsKcKdKh2c3d");
        let g = pair_groups(&c, 2, 4);
        assert_eq!(g.get(&2).unwrap().len(), 1);
        assert_eq!(g.get(&3).unwrap().len(), 1);
        assert!(g.get(&4).is_none());
        assert_eq!(g[&2][0][0].rank(), Rank::RA);
        assert_eq!(g[&3][0][0].rank(), Rank::RK);
    }

    #[test]
    fn pair_groups_ordered_by_rank() {
        let c = cards("2h2s7c7dKcKd");
        let g = pair_groups(&c, 2, 4);
        let pairs = &g[&2];
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0][0].rank(), Rank::RK);
        assert_eq!(pairs[1][0].rank(), Rank::R7);
        assert_eq!(pairs[2][0].rank(), Rank::R2);
    }

    #[test]
    fn pair_groups_count_range() {
        let c = cards("AhAsAdAc2h2s");
        let only_pairs = pair_groups(&c, 2, 2);
        assert_eq!(only_pairs.len(), 1);
        assert_eq!(only_pairs[&2][0][0].rank(), Rank::R2);
        let all = pair_groups(&c, 2, 4);
        assert!(all.contains_key(&4));
    }

    #[test]
    fn full_houses_best_first() {
        let c = cards("AhAsAd2c2dKhKs");
        let fh = full_houses(&c);
        // Aces full of kings beats aces full of twos; twos never lead
        assert_eq!(fh[0][0].rank(), Rank::RA);
        assert_eq!(fh[0][3].rank(), Rank::RK);
        assert_eq!(fh[1][0].rank(), Rank::RA);
        assert_eq!(fh[1][3].rank(), Rank::R2);
    }

    #[test]
    fn full_houses_two_trips() {
        // A second trips plays its top two cards as the pair
        let c = cards("KhKsKd2c2d2h");
        let fh = full_houses(&c);
        assert!(!fh.is_empty());
        assert_eq!(fh[0][0].rank(), Rank::RK);
        assert_eq!(fh[0][3].rank(), Rank::R2);
    }

    #[test]
    fn full_houses_need_trips() {
        let c = cards("AhAsKcKd2h2s9d");
        assert!(full_houses(&c).is_empty());
    }

    #[test]
    fn straight_flush_needs_same_suit() {
        let c = cards("9h8h7h6h5c4c3c");
        assert!(straight_flushes(&c).is_empty());
        let c = cards("9h8h7h6h5h");
        let sf = straight_flushes(&c);
        assert_eq!(sf.len(), 1);
        assert_eq!(sf[0][0].rank(), Rank::R9);
    }

    #[test]
    fn steel_wheel() {
        let c = cards("Ah2h3h4h5h");
        let sf = straight_flushes(&c);
        assert_eq!(sf.len(), 1);
        assert_eq!(sf[0][0].rank(), Rank::R5);
        // and it is not royal
        assert!(royal_flushes(&c).is_empty());
    }

    #[test]
    fn royal_is_ace_high_straight_flush() {
        let c = cards("AhKhQhJhTh9h");
        let r = royal_flushes(&c);
        assert_eq!(r.len(), 1);
        assert_eq!(r[0][0].rank(), Rank::RA);
        assert_eq!(r[0][4].rank(), Rank::RT);
        // King-high straight flush in the same pool is not royal
        let sf = straight_flushes(&c);
        assert_eq!(sf.len(), 2);
    }
}


#[cfg(test)]
mod test_evaluator {
    use super::*;
    use crate::cards::card::cards_from_str;

    #[test]
    fn memo_matches_direct() {
        let mut ev = Evaluator::new();
        for s in ["AcKcQcJcTc", "7c7d3h3s9c", "Ah2c3d4s5c9d", ""] {
            let c = cards_from_str(s).unwrap();
            assert_eq!(ev.evaluate(&c), nuts(&c));
            // again, now hitting the cache
            assert_eq!(ev.evaluate(&c), nuts(&c));
        }
    }

    #[test]
    fn memo_is_bounded() {
        let mut ev = Evaluator::new();
        let mut deck = crate::cards::deck::Deck::default();
        for _ in 0..30 {
            let pool: Vec<Card> = (0..1).map(|_| deck.draw().unwrap()).collect();
            ev.evaluate(&pool);
        }
        assert!(ev.cache.len() <= 10);
    }
}
