pub mod client;
pub mod goldapi;
pub mod metal_price_api;
pub mod util;

pub use client::QuoteClient;
