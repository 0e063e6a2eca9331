pub mod health;
pub mod metrics;
pub mod vote;

pub use health::health_check;
pub use vote::{cast_vote, show_ballot, VOTER_COOKIE};
