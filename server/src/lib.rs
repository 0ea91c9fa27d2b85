pub mod server;
pub mod benchmark;

pub use server::{configure, CipherLabServer};
