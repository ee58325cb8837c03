pub mod connection;
pub mod crud;
pub mod indexes;
pub mod match_store;
#[cfg(test)]
pub mod memory;
pub mod poll_store;
pub mod populate;

pub const TEAMS: &str = "teams";
pub const PLAYERS: &str = "players";
pub const MATCHES: &str = "matches";
pub const NEWS: &str = "news";
pub const POLLS: &str = "polls";
pub const HISTORY: &str = "histories";
pub const ADMINS: &str = "admins";
