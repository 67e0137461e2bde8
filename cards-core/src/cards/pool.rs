use super::card::{cards_from_str, Card, CardError};
use super::rules::{self, HandClass, Score};
use itertools::Itertools;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared community cards. Cloning the handle aliases the same live
/// collection: pushing a card through any clone is visible to every pool that
/// holds one, and pools re-read the contents at evaluation time.
#[derive(Clone, Debug, Default)]
pub struct Board(Rc<RefCell<Vec<Card>>>);

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, card: Card) {
        self.0.borrow_mut().push(card);
    }

    /// Snapshot of the current contents.
    pub fn cards(&self) -> Vec<Card> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// The closed set of things [`Pool::add`] accepts: a card, a shared board
/// handle, a 2-char rank+suit token, or a sequence of any of these. Anything
/// else simply does not convert; bad tokens error out of `add`.
#[derive(Clone, Debug)]
pub enum CardLike {
    Card(Card),
    Board(Board),
    Token(String),
    Seq(Vec<CardLike>),
}

impl From<Card> for CardLike {
    fn from(c: Card) -> Self {
        Self::Card(c)
    }
}

impl From<Board> for CardLike {
    fn from(b: Board) -> Self {
        Self::Board(b)
    }
}

impl From<&str> for CardLike {
    fn from(s: &str) -> Self {
        Self::Token(s.to_string())
    }
}

impl<T: Into<CardLike>> From<Vec<T>> for CardLike {
    fn from(v: Vec<T>) -> Self {
        Self::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CardLike> + Clone, const N: usize> From<[T; N]> for CardLike {
    fn from(v: [T; N]) -> Self {
        Self::Seq(v.iter().cloned().map(Into::into).collect())
    }
}

/// A pool of cards to evaluate: own cards plus any number of shared boards.
/// Own cards are exclusively owned; boards are aliased handles.
#[derive(Debug, Default)]
pub struct Pool {
    own: Vec<Card>,
    shared: Vec<Board>,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(items: impl Into<CardLike>) -> Result<Self, CardError> {
        let mut p = Self::new();
        p.add(items)?;
        Ok(p)
    }

    /// Build a pool of own cards from a run of tokens ("AhKs2c").
    pub fn from_tokens(s: &str) -> Result<Self, CardError> {
        Ok(Self {
            own: cards_from_str(s)?,
            shared: vec![],
        })
    }

    /// Add anything [`CardLike`]. On error the pool is unchanged: a bad token
    /// partway through a sequence does not leave the earlier elements behind.
    pub fn add(&mut self, item: impl Into<CardLike>) -> Result<(), CardError> {
        match item.into() {
            CardLike::Card(c) => self.own.push(c),
            CardLike::Board(b) => self.shared.push(b),
            CardLike::Token(t) => self.own.push(t.parse()?),
            CardLike::Seq(items) => {
                let mut staged = Pool::new();
                for x in items {
                    staged.add(x)?;
                }
                self.own.append(&mut staged.own);
                self.shared.append(&mut staged.shared);
            }
        }
        Ok(())
    }

    pub fn own_cards(&self) -> &[Card] {
        &self.own
    }

    pub fn shared_cards(&self) -> Vec<Card> {
        self.shared.iter().flat_map(|b| b.cards()).collect()
    }

    /// Flattened view: own cards first, then the live contents of every
    /// shared board in the order they were added.
    pub fn cards(&self) -> Vec<Card> {
        let mut all = self.own.clone();
        for b in &self.shared {
            all.extend(b.cards());
        }
        all
    }

    pub fn len(&self) -> usize {
        self.own.len() + self.shared.iter().map(Board::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn score(&self) -> Score {
        rules::nuts(&self.cards()).0
    }

    pub fn class(&self) -> Option<HandClass> {
        self.score().class()
    }

    pub fn class_name(&self) -> String {
        self.score().name()
    }

    /// The cards behind [`Pool::score`]: at most five, kickers last.
    pub fn best_five(&self) -> Vec<Card> {
        rules::nuts(&self.cards()).1
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let own = self.own.iter().map(|c| c.to_string()).join(" ");
        let shared = self.shared_cards();
        if shared.is_empty() {
            write!(f, "{}", own)
        } else {
            let shared = shared.iter().map(|c| c.to_string()).join(" ");
            write!(f, "{} [{}]", own, shared)
        }
    }
}
