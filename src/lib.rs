//! Tournament point ("beans") distribution and season leaderboards.
//!
//! [`ranking`] calculates how one tournament's beans are split across its
//! field. [`season`] applies those payouts to standings and folds placement
//! facts into a capped season leaderboard.

pub mod config;
pub mod error;
pub mod output;
pub mod ranking;
pub mod season;

pub use error::RankingError;
