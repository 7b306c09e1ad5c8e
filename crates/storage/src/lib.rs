pub mod seed;
pub mod store;

pub use seed::seed_demo_data;
pub use store::MemoryStore;
