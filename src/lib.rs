// src/lib.rs

//! ReelVault library
//!
//! Saves short-video links shared from social apps: normalizes the URL,
//! scrapes page metadata, infers platform tags and stores the result under
//! tier-based limits.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(test)]
mod testing;
