pub mod metrics;
pub mod store;

pub use metrics::{get_metrics, init_metrics, record_vote};
pub use store::{MockVoteStore, RedisVoteStore, VoteStore, VOTES_LIST_KEY};
