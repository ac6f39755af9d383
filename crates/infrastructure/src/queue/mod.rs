mod memory;
mod redis;

pub use memory::InMemoryWorkQueue;
pub use redis::RedisWorkQueue;
