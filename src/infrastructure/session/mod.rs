mod memory_session_store;

pub use memory_session_store::MemorySessionStore;
