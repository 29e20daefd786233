pub mod writer_json;

pub use writer_json::write_results;
