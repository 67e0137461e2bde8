use enum_map::Enum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const CLUB: char = 'c';
pub const DIAMOND: char = 'd';
pub const HEART: char = 'h';
pub const SPADE: char = 's';

pub const ALL_SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
pub const ALL_RANKS: [Rank; 13] = [
    Rank::R2,
    Rank::R3,
    Rank::R4,
    Rank::R5,
    Rank::R6,
    Rank::R7,
    Rank::R8,
    Rank::R9,
    Rank::RT,
    Rank::RJ,
    Rank::RQ,
    Rank::RK,
    Rank::RA,
];

#[derive(Debug, derive_more::Display, derive_more::Error, PartialEq, Eq)]
pub enum CardError {
    #[display(fmt = "{} is not a valid rank (2-9TJQKA)", _0)]
    BadRank(#[error(not(source))] char),
    #[display(fmt = "{} is not a valid suit (cdhs)", _0)]
    BadSuit(#[error(not(source))] char),
    #[display(fmt = "expected a 2-char rank+suit token, got {:?}", _0)]
    BadToken(#[error(not(source))] String),
}

#[derive(Hash, Enum, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Rank {
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
    R9,
    RT,
    RJ,
    RQ,
    RK,
    RA,
}

impl Rank {
    /// Poker value of the rank: 2 through 14, ace high.
    pub fn value(self) -> u8 {
        match self {
            Self::R2 => 2,
            Self::R3 => 3,
            Self::R4 => 4,
            Self::R5 => 5,
            Self::R6 => 6,
            Self::R7 => 7,
            Self::R8 => 8,
            Self::R9 => 9,
            Self::RT => 10,
            Self::RJ => 11,
            Self::RQ => 12,
            Self::RK => 13,
            Self::RA => 14,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::R2 => write!(f, "2"),
            Self::R3 => write!(f, "3"),
            Self::R4 => write!(f, "4"),
            Self::R5 => write!(f, "5"),
            Self::R6 => write!(f, "6"),
            Self::R7 => write!(f, "7"),
            Self::R8 => write!(f, "8"),
            Self::R9 => write!(f, "9"),
            Self::RT => write!(f, "T"),
            Self::RJ => write!(f, "J"),
            Self::RQ => write!(f, "Q"),
            Self::RK => write!(f, "K"),
            Self::RA => write!(f, "A"),
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = CardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '2' => Ok(Rank::R2),
            '3' => Ok(Rank::R3),
            '4' => Ok(Rank::R4),
            '5' => Ok(Rank::R5),
            '6' => Ok(Rank::R6),
            '7' => Ok(Rank::R7),
            '8' => Ok(Rank::R8),
            '9' => Ok(Rank::R9),
            'T' | 't' => Ok(Rank::RT),
            'J' | 'j' => Ok(Rank::RJ),
            'Q' | 'q' => Ok(Rank::RQ),
            'K' | 'k' => Ok(Rank::RK),
            'A' | 'a' => Ok(Rank::RA),
            _ => Err(CardError::BadRank(c)),
        }
    }
}

#[derive(Hash, Enum, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Serialize, Deserialize)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    /// Sub-rank increment used to break rank ties when sorting. This is not a
    /// poker ranking of suits; it only makes the card order strict and total.
    pub fn tiebreak(self) -> u8 {
        match self {
            Self::Club => 1,
            Self::Diamond => 2,
            Self::Heart => 3,
            Self::Spade => 4,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Club => write!(f, "{}", CLUB),
            Self::Diamond => write!(f, "{}", DIAMOND),
            Self::Heart => write!(f, "{}", HEART),
            Self::Spade => write!(f, "{}", SPADE),
        }
    }
}

impl TryFrom<char> for Suit {
    type Error = CardError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            CLUB | 'C' => Ok(Self::Club),
            DIAMOND | 'D' => Ok(Self::Diamond),
            HEART | 'H' => Ok(Self::Heart),
            SPADE | 'S' => Ok(Self::Spade),
            _ => Err(CardError::BadSuit(c)),
        }
    }
}

#[derive(Hash, PartialEq, Eq, Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Card {
    rank: Rank,
    suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    pub fn rank(self) -> Rank {
        self.rank
    }

    pub fn suit(self) -> Suit {
        self.suit
    }

    /// Strict total sort key: rank value scaled by 10 plus the suit tiebreak.
    /// Used only for sorting and deduplication, never for category scoring.
    pub fn order_value(self) -> u16 {
        self.rank.value() as u16 * 10 + self.suit.tiebreak() as u16
    }
}

/// Cards sort by rank first, then by the suit tiebreak so the order is strict.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order_value().cmp(&other.order_value())
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl TryFrom<[char; 2]> for Card {
    type Error = CardError;

    fn try_from(cs: [char; 2]) -> Result<Self, Self::Error> {
        Ok(Self {
            rank: cs[0].try_into()?,
            suit: cs[1].try_into()?,
        })
    }
}

impl FromStr for Card {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut i = s.chars();
        match (i.next(), i.next(), i.next()) {
            (Some(r), Some(su), None) => [r, su].try_into(),
            _ => Err(CardError::BadToken(s.to_string())),
        }
    }
}

/// Parse a run of 2-char tokens ("Ah2c6h") into cards. Errors on the first bad
/// rank, bad suit, or trailing half token.
pub fn cards_from_str(s: &str) -> Result<Vec<Card>, CardError> {
    let mut v = vec![];
    let mut s_chars = s.chars();
    while let Some(r) = s_chars.next() {
        let su = s_chars
            .next()
            .ok_or_else(|| CardError::BadToken(r.to_string()))?;
        v.push([r, su].try_into()?);
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    /// The sort order of cards is used as logic all over the rules module, so
    /// this test exists to highlight when it breaks.
    #[test]
    fn rank_sort_order() {
        for (i, r) in ALL_RANKS.into_iter().sorted_unstable().rev().enumerate() {
            assert_eq!(r.value(), 14u8 - (i as u8));
        }
    }

    #[test]
    fn order_value_is_strict() {
        let all = ALL_RANKS
            .iter()
            .cartesian_product(ALL_SUITS.iter())
            .map(|(r, s)| Card::new(*r, *s).order_value())
            .collect_vec();
        assert_eq!(all.iter().unique().count(), 52);
    }

    #[test]
    fn string_single() {
        let c: Card = "Ah".parse().unwrap();
        assert_eq!(c.rank(), Rank::RA);
        assert_eq!(c.suit(), Suit::Heart);
    }

    #[test]
    fn string_multi() {
        let res = cards_from_str("Ah2c6h").unwrap();
        assert_eq!(res.len(), 3);
    }

    #[test]
    fn string_empty() {
        assert_eq!(cards_from_str("").unwrap().len(), 0);
    }

    #[test]
    fn bad_rank() {
        assert_eq!("1h".parse::<Card>().unwrap_err(), CardError::BadRank('1'));
    }

    #[test]
    fn bad_suit() {
        assert_eq!("AX".parse::<Card>().unwrap_err(), CardError::BadSuit('X'));
    }

    #[test]
    fn bad_token() {
        assert!(matches!(
            "A".parse::<Card>().unwrap_err(),
            CardError::BadToken(_)
        ));
        assert!(matches!(
            "Ahh".parse::<Card>().unwrap_err(),
            CardError::BadToken(_)
        ));
        assert!(matches!(
            cards_from_str("Ah2").unwrap_err(),
            CardError::BadToken(_)
        ));
    }

    #[test]
    fn rank_beats_suit() {
        let c1 = Card::new(Rank::RJ, Suit::Spade);
        let c2 = Card::new(Rank::RQ, Suit::Club);
        assert!(c1 < c2);
    }

    #[test]
    fn suit_breaks_rank_tie() {
        let c1 = Card::new(Rank::RJ, Suit::Club);
        let c2 = Card::new(Rank::RJ, Suit::Heart);
        assert!(c1 < c2);
        assert_ne!(c1, c2);
    }

    #[test]
    fn serde_round_trip() {
        let c = Card::new(Rank::RT, Suit::Diamond);
        let s = serde_json::to_string(&c).unwrap();
        let c2: Card = serde_json::from_str(&s).unwrap();
        assert_eq!(c, c2);
    }
}
