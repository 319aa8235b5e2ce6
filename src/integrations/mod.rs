pub mod blockfrost;

pub use blockfrost::BlockfrostClient;
