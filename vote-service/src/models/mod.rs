pub mod vote;

pub use vote::{Choice, VoteRecord, VoterId};
