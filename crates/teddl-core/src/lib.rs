pub mod config;
pub mod logging;

// Pipeline, leaf-first.
pub mod variant;
pub mod ledger;
pub mod feed;
pub mod fetcher;
pub mod pipeline;

// Support.
pub mod http;
pub mod storage;
pub mod url_model;
