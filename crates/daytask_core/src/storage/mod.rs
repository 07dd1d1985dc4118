mod kv_store;

pub use kv_store::{JsonFileStore, KeyValueStore, MemoryStore, read_json, remove, write_json};
