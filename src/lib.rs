//! Amazon Comprehend demo: NLP request dispatcher and demo page renderer.
//!
//! The dispatcher and renderer are transport independent; `server` hosts them
//! on two hyper listeners and the `lambda` feature hosts them on AWS Lambda.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod handler;
pub mod http;
pub mod logger;
pub mod nlp;
pub mod render;
pub mod server;
