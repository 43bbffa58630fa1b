// src/testing.rs

//! Test doubles shared by unit tests.

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::utils::http::{HttpClient, HttpResponse};

enum Behavior {
    Respond(u16, String),
    Refuse,
    Stall(Duration),
}

/// Scripted [`HttpClient`] that counts its calls.
pub struct FakeHttpClient {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl FakeHttpClient {
    /// Answer every request with `200 OK` and the given body.
    pub fn html(body: impl Into<String>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::with(Behavior::Respond(status, body.into()))
    }

    /// Fail every request at the transport level.
    pub fn refusing() -> Self {
        Self::with(Behavior::Refuse)
    }

    /// Sleep before answering with an empty page.
    pub fn stalling(delay: Duration) -> Self {
        Self::with(Behavior::Stall(delay))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, _url: &str) -> Result<HttpResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Respond(status, body) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Behavior::Refuse => Err(AppError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Behavior::Stall(delay) => {
                tokio::time::sleep(*delay).await;
                Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                })
            }
        }
    }
}
