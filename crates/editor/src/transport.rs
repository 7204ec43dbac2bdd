//! Persistence transport for the zones document.
//!
//! The editor only sees `ZonesTransport`; `HttpTransport` talks to the zones
//! server and `MemoryTransport` keeps everything in process.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use reqwest::header::CONTENT_TYPE;

use crate::config::EditorConfig;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug)]
pub struct TransportError {
    pub message: String,
    /// HTTP status when the server answered with a failure.
    pub status: Option<u16>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub fn with_status(message: impl Into<String>, status: u16) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }
}

/// Loads and stores the serialized FeatureCollection.
///
/// Methods return boxed futures so the trait stays dyn-compatible.
pub trait ZonesTransport: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<String, TransportError>>;
    fn save(&self, document: String) -> BoxFuture<'_, Result<(), TransportError>>;
}

pub struct HttpTransport {
    client: reqwest::Client,
    zones_url: String,
    save_url: String,
}

impl HttpTransport {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &EditorConfig) -> Self {
        Self {
            client,
            zones_url: config.zones_url.clone(),
            save_url: config.save_url.clone(),
        }
    }
}

impl ZonesTransport for HttpTransport {
    fn fetch(&self) -> BoxFuture<'_, Result<String, TransportError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.zones_url)
                .send()
                .await
                .map_err(|e| TransportError::with_source("zones fetch failed", e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::with_status(
                    format!("zones fetch from {} was rejected", self.zones_url),
                    status.as_u16(),
                ));
            }
            resp.text()
                .await
                .map_err(|e| TransportError::with_source("zones body read failed", e))
        })
    }

    fn save(&self, document: String) -> BoxFuture<'_, Result<(), TransportError>> {
        Box::pin(async move {
            let resp = self
                .client
                .post(&self.save_url)
                .header(CONTENT_TYPE, "application/json")
                .body(document)
                .send()
                .await
                .map_err(|e| TransportError::with_source("zones save failed", e))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(TransportError::with_status(
                    format!("zones save to {} was rejected", self.save_url),
                    status.as_u16(),
                ));
            }
            Ok(())
        })
    }
}

/// In-process transport holding one document.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    document: Mutex<Option<String>>,
    saved: Mutex<Vec<String>>,
    fail_fetch: AtomicBool,
    fail_save: AtomicBool,
}

impl MemoryTransport {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: Mutex::new(Some(document.into())),
            ..Self::default()
        }
    }

    pub fn document(&self) -> Option<String> {
        self.document.lock().clone()
    }

    /// Every document accepted by `save`, oldest first.
    pub fn saved(&self) -> Vec<String> {
        self.saved.lock().clone()
    }

    pub fn set_fail_fetch(&self, fail: bool) {
        self.fail_fetch.store(fail, Ordering::Relaxed);
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.fail_save.store(fail, Ordering::Relaxed);
    }
}

impl ZonesTransport for MemoryTransport {
    fn fetch(&self) -> BoxFuture<'_, Result<String, TransportError>> {
        Box::pin(async move {
            if self.fail_fetch.load(Ordering::Relaxed) {
                return Err(TransportError::new("fetch disabled"));
            }
            self.document
                .lock()
                .clone()
                .ok_or_else(|| TransportError::with_status("no zones document", 404))
        })
    }

    fn save(&self, document: String) -> BoxFuture<'_, Result<(), TransportError>> {
        Box::pin(async move {
            if self.fail_save.load(Ordering::Relaxed) {
                return Err(TransportError::with_status("save disabled", 500));
            }
            self.saved.lock().push(document.clone());
            *self.document.lock() = Some(document);
            Ok(())
        })
    }
}
