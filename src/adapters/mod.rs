// Adapters layer: 對外系統的具體實作 (storage, http API, http client)

pub mod client;
pub mod http;
pub mod storage;
