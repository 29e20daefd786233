pub mod baseline;
pub mod engine;
pub mod output;
pub mod probe;
pub mod session;
pub mod sink;
pub mod target;
pub mod wordlist;
