//! Request signer implementations

mod sigv4;

pub use sigv4::SigV4Signer;
