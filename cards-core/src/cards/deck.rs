use super::card::{Card, ALL_RANKS, ALL_SUITS};
use base64ct::{Base64, Encoding};
use rand::prelude::*;
use rand_chacha::ChaChaRng;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

const DECK_LEN: usize = ALL_RANKS.len() * ALL_SUITS.len();
/// TECHNICALLY this could be 22.
/// 22x2(pockets)+3(burn)+5(table) = `DECK_LEN`
pub const MAX_PLAYERS: u8 = 21;
const SEED_LEN: usize = 32;
const ENCODED_SEED_LEN: usize = 4 * ((SEED_LEN + 3 - 1) / 3); // 4 * ceil(SEED_LEN / 3)

#[derive(PartialEq, Debug)]
pub enum DeckError {
    OutOfCards,
    TooManyPlayers,
    CantDealToNoPlayers,
    CardNotInDeck(Card),
    CardAlreadyInDeck(Card),
    DeckSeedDecodeError(base64ct::Error),
}

impl Error for DeckError {}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::OutOfCards => write!(f, "No more cards in deck"),
            DeckError::TooManyPlayers => write!(f, "Too many players to deal"),
            DeckError::CantDealToNoPlayers => write!(f, "Need at least one player"),
            DeckError::CardNotInDeck(c) => write!(f, "{} is not in the deck", c),
            DeckError::CardAlreadyInDeck(c) => write!(f, "{} is already in the deck", c),
            DeckError::DeckSeedDecodeError(e) => write!(f, "{}", e),
        }
    }
}

impl From<base64ct::Error> for DeckError {
    fn from(e: base64ct::Error) -> Self {
        Self::DeckSeedDecodeError(e)
    }
}

#[derive(Debug, PartialEq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        use itertools::Itertools;
        let c: Vec<Card> = ALL_RANKS
            .iter()
            .cartesian_product(ALL_SUITS.iter())
            .map(|x| Card::new(*x.0, *x.1))
            .collect();
        assert_eq!(c.len(), DECK_LEN);
        let mut d = Deck { cards: c };
        d.shuffle();
        d
    }
}

impl Deck {
    /// Generate a new single deck of cards, shuffled with the given seed
    pub fn new(seed: &DeckSeed) -> Self {
        let mut d = Self::default();
        d.seeded_shuffle(seed);
        d
    }

    pub fn deck_and_seed() -> (Deck, DeckSeed) {
        let ds = DeckSeed::default();
        let d = Deck::new(&ds);
        (d, ds)
    }

    /// Shuffle the remaining cards in-place with a fresh random seed
    pub fn shuffle(&mut self) {
        self.seeded_shuffle(&DeckSeed::default());
    }

    pub fn seeded_shuffle(&mut self, seed: &DeckSeed) {
        let mut rng = ChaChaRng::from_seed(seed.0);
        // For determinism given the same seed, the cards need to be in a known order before shuffling.
        self.cards.sort_unstable();
        self.cards.shuffle(&mut rng)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw the topmost card and return it, or return an error if there are no more cards.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::OutOfCards)
    }

    pub fn burn(&mut self) {
        self.cards.pop();
    }

    /// Remove a specific card from anywhere in the deck. Unlike `burn`, asking
    /// for a card that isn't here is an error, never a silent no-op.
    pub fn take(&mut self, card: Card) -> Result<Card, DeckError> {
        match self.cards.iter().position(|c| *c == card) {
            Some(idx) => Ok(self.cards.remove(idx)),
            None => Err(DeckError::CardNotInDeck(card)),
        }
    }

    /// Return a previously-taken card to the top of the deck.
    pub fn put_back(&mut self, card: Card) -> Result<(), DeckError> {
        if self.cards.contains(&card) {
            return Err(DeckError::CardAlreadyInDeck(card));
        }
        self.cards.push(card);
        Ok(())
    }

    pub fn deal_pockets(&mut self, num_players: u8) -> Result<Vec<[Card; 2]>, DeckError> {
        if num_players > MAX_PLAYERS {
            Err(DeckError::TooManyPlayers)
        } else if num_players < 1 {
            Err(DeckError::CantDealToNoPlayers)
        } else if self.cards.len() < 2 * num_players as usize {
            Err(DeckError::OutOfCards)
        } else {
            let mut v = Vec::new();
            // Range only works in positive direction
            for i in (1..=num_players).rev() {
                let c1 = self.draw()?;
                let c2 = self.cards.remove(self.cards.len() - i as usize);
                v.push([c1, c2]);
            }
            Ok(v)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeckSeed([u8; SEED_LEN]);

impl DeckSeed {
    pub fn new(b: [u8; SEED_LEN]) -> Self {
        Self(b)
    }
}

impl Default for DeckSeed {
    fn default() -> Self {
        let mut b = [0u8; SEED_LEN];
        thread_rng().fill_bytes(&mut b);
        Self(b)
    }
}

impl fmt::Display for DeckSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b = [0u8; ENCODED_SEED_LEN];
        let s = Base64::encode(&self.0, &mut b).unwrap();
        write!(f, "{}", s)
    }
}

impl FromStr for DeckSeed {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut b: [u8; SEED_LEN] = [0; SEED_LEN];
        let decoded = Base64::decode(s, &mut b)?;
        // A short input would otherwise zero-pad the tail and collide with
        // other seeds. Only a full-length encoding is a seed.
        if decoded.len() != SEED_LEN {
            return Err(DeckError::DeckSeedDecodeError(
                base64ct::Error::InvalidLength,
            ));
        }
        Ok(DeckSeed(b))
    }
}
