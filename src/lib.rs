pub mod antenna;
pub mod channel;
pub mod config;
pub mod link;
pub mod orbit;
pub mod station;
pub mod tracker;
