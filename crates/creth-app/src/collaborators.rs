//! External collaborators: wallet and content-addressed file storage.
//!
//! Both are local mocks standing in for a browser wallet extension and an
//! IPFS pinning service. The messaging transport and escrow contract
//! interfaces live in `creth-messaging` and `creth-escrow`.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use tracing::{debug, info};

use crate::{AppError, Result};

/// Upload limit for deliverables, 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

/// Wallet connection provider.
pub trait WalletProvider: Send + Sync {
    /// Connected account address.
    fn address(&self) -> &str;

    /// Sign `message`, returning a hex signature.
    fn sign(&self, message: &[u8]) -> String;
}

/// Deterministic wallet that "signs" with a keyed BLAKE3 hash.
pub struct MockWallet {
    address: String,
    key: [u8; 32],
}

impl MockWallet {
    pub fn new(address: impl Into<String>) -> Self {
        let address = address.into();
        let key = *blake3::hash(address.as_bytes()).as_bytes();
        Self { address, key }
    }
}

impl WalletProvider for MockWallet {
    fn address(&self) -> &str {
        &self.address
    }

    fn sign(&self, message: &[u8]) -> String {
        hex::encode(blake3::keyed_hash(&self.key, message).as_bytes())
    }
}

/// A file accepted by a [`ContentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Content identifier (`Qm…`).
    pub cid: String,
    pub name: String,
    pub size: u64,
}

/// Content-addressed file storage.
pub trait ContentStore: Send + Sync {
    /// Store `data`, returning its content identifier.
    fn put(&self, name: &str, data: &[u8]) -> Result<StoredFile>;

    fn get(&self, cid: &str) -> Option<Vec<u8>>;
}

/// Derive a content identifier from the BLAKE3 digest of `data`.
pub fn content_id(data: &[u8]) -> String {
    format!("Qm{}", hex::encode(blake3::hash(data).as_bytes()))
}

/// In-memory content store.
#[derive(Default)]
pub struct LocalContentStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl LocalContentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContentStore for LocalContentStore {
    fn put(&self, name: &str, data: &[u8]) -> Result<StoredFile> {
        let size = data.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(AppError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let cid = content_id(data);
        let mut blobs = self.blobs.lock().unwrap_or_else(PoisonError::into_inner);
        if blobs.insert(cid.clone(), data.to_vec()).is_some() {
            debug!(cid = %cid, "content already pinned");
        }
        info!(cid = %cid, name, size, "content pinned");

        Ok(StoredFile {
            cid,
            name: name.to_string(),
            size,
        })
    }

    fn get(&self, cid: &str) -> Option<Vec<u8>> {
        self.blobs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(cid)
            .cloned()
    }
}
