pub mod card;
pub mod deck;
pub mod pool;
pub mod rules;

pub use card::Card;
pub use deck::Deck;
pub use pool::Pool;
