pub mod change;
pub mod watchlist;
