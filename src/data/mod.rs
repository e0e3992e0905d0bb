mod store;

pub use store::{FileStore, MemoryStore, STATE_KEY, StateStore, load_state, save_state};
