pub mod codec;
mod store;

pub use store::Store;
