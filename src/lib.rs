//! Vocabulary quiz engine.
//!
//! A [`deck::source::DataSource`] supplies word records, the
//! [`engine::sampler`] picks which ones to ask, and a
//! [`session::quiz::QuizEngine`] walks a [`session::quiz::QuizState`] from
//! question to question. The terminal UI in the binary is one presentation
//! surface over this API.

pub mod config;
pub mod deck;
pub mod engine;
pub mod error;
pub mod session;

pub use error::QuizError;
