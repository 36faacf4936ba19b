mod nft;

pub use nft::NftBackend;
