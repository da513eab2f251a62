// src/testing.rs
//! Scripted transport for tests: records every request and answers from a
//! queue. Deferred answers stay pending until the test releases them.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use tokio::sync::{oneshot, Notify};

use crate::core::service_client::{ApiRequest, RawResponse, Transport};

enum Scripted {
    Ready(std::result::Result<RawResponse, String>),
    Deferred(oneshot::Receiver<RawResponse>),
}

#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<ApiRequest>>,
    called: Notify,
}

/// Releases a deferred response
pub struct Release(oneshot::Sender<RawResponse>);

impl Release {
    pub fn send(self, status: u16, body: Value) {
        let _ = self.0.send(RawResponse {
            status,
            body: body.to_string(),
        });
    }
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: Value) {
        self.respond_raw(status, &body.to_string());
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.push(Scripted::Ready(Ok(RawResponse {
            status,
            body: body.to_string(),
        })));
    }

    pub fn fail(&self, cause: &str) {
        self.push(Scripted::Ready(Err(cause.to_string())));
    }

    pub fn defer(&self) -> Release {
        let (tx, rx) = oneshot::channel();
        self.push(Scripted::Deferred(rx));
        Release(tx)
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub async fn wait_for_calls(&self, count: usize) {
        loop {
            let notified = self.called.notified();
            if self.call_count() >= count {
                return;
            }
            notified.await;
        }
    }

    fn push(&self, scripted: Scripted) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(scripted);
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let next = {
            self.calls
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request);
            self.script
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front()
        };
        self.called.notify_waiters();

        match next {
            Some(Scripted::Ready(Ok(response))) => Ok(response),
            Some(Scripted::Ready(Err(cause))) => Err(anyhow::anyhow!(cause)),
            Some(Scripted::Deferred(rx)) => rx
                .await
                .map_err(|_| anyhow::anyhow!("deferred response dropped")),
            None => Err(anyhow::anyhow!("no scripted response left")),
        }
    }
}
