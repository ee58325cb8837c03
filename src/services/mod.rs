pub mod accounts;
pub mod cricket_feed;
pub mod reconcile;
pub mod tally;
