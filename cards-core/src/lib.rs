//! Generic 52-card deck types and a poker hand-ranking engine.
//!
//! [`cards::rules::nuts`] is the main entry point: give it any pool of cards
//! and it returns the best achievable 5-card hand and its totally-ordered
//! [`Score`]. The [`Pool`] aggregate layers own cards plus shared community
//! boards on top of that, and [`Deck`] deals the cards in the first place.

pub mod cards;

pub use cards::card::{cards_from_str, Card, CardError, Rank, Suit, ALL_RANKS, ALL_SUITS};
pub use cards::deck::{Deck, DeckError, DeckSeed};
pub use cards::pool::{Board, CardLike, Pool};
pub use cards::rules::{join_score, nuts, score_class, Evaluator, HandClass, Score};
