//! Session-scoped photo capture with bounded size and explicit preview
//! release.
//!
//! Each captured photo owns a [`PreviewHandle`], the displayable reference
//! the UI renders. Handles are released exactly once: by `remove`, by
//! `clear` when the session ends, or by `Drop` as a backstop when a form is
//! abandoned. The [`ReleaseLedger`] makes the exactly-once contract
//! checkable.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

/// Counts preview-handle acquisitions and releases.
#[derive(Debug, Default)]
pub struct ReleaseLedger {
    created: AtomicUsize,
    released: AtomicUsize,
}

impl ReleaseLedger {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Handles acquired but not yet released. Zero once a session has ended.
    pub fn outstanding(&self) -> usize {
        self.created() - self.released()
    }
}

/// Releasable reference to a displayable preview of a photo payload.
#[derive(Debug)]
pub struct PreviewHandle {
    id: Uuid,
    released: AtomicBool,
    ledger: Arc<ReleaseLedger>,
}

impl PreviewHandle {
    fn acquire(id: Uuid, ledger: Arc<ReleaseLedger>) -> Self {
        ledger.created.fetch_add(1, Ordering::SeqCst);
        Self {
            id,
            released: AtomicBool::new(false),
            ledger,
        }
    }

    /// Releases the preview resource. Subsequent calls are no-ops.
    pub fn release(&self) {
        if !self.released.swap(true, Ordering::SeqCst) {
            self.ledger.released.fetch_add(1, Ordering::SeqCst);
            debug!(preview_id = %self.id, "preview handle released");
        }
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// A captured photo owned by the store: the byte payload, its capture time,
/// and the live preview handle.
#[derive(Debug)]
pub struct PhotoAttachment {
    pub id: Uuid,
    pub payload: Bytes,
    pub timestamp: DateTime<Utc>,
    pub preview: PreviewHandle,
}

/// Result of a capture attempt. Captures beyond the session cap are dropped
/// silently; the soft cap is reported, not raised as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    Captured(Uuid),
    CapacityExceeded,
}

/// Bounded, insertion-ordered set of photo attachments for one capture
/// session (new-order form or in-progress work).
#[derive(Debug)]
pub struct PhotoAttachmentStore {
    attachments: Vec<PhotoAttachment>,
    max_photos: usize,
    ledger: Arc<ReleaseLedger>,
}

impl PhotoAttachmentStore {
    pub fn new(max_photos: usize) -> Self {
        Self::with_ledger(max_photos, Arc::new(ReleaseLedger::default()))
    }

    /// Builds a store sharing an externally-owned ledger, so callers can
    /// audit handle release across sessions.
    pub fn with_ledger(max_photos: usize, ledger: Arc<ReleaseLedger>) -> Self {
        Self {
            attachments: Vec::new(),
            max_photos,
            ledger,
        }
    }

    /// Captures a photo, acquiring a fresh preview handle. Returns
    /// [`Capture::CapacityExceeded`] without storing anything once the
    /// session is at its cap.
    pub fn capture(&mut self, payload: Bytes, timestamp: DateTime<Utc>) -> Capture {
        if self.attachments.len() >= self.max_photos {
            debug!(
                max_photos = self.max_photos,
                "photo capture dropped: session at capacity"
            );
            return Capture::CapacityExceeded;
        }
        let id = Uuid::new_v4();
        let preview = PreviewHandle::acquire(id, Arc::clone(&self.ledger));
        self.attachments.push(PhotoAttachment {
            id,
            payload,
            timestamp,
            preview,
        });
        Capture::Captured(id)
    }

    /// Removes an attachment and releases its preview handle. Unknown ids
    /// are ignored.
    pub fn remove(&mut self, id: Uuid) {
        if let Some(pos) = self.attachments.iter().position(|p| p.id == id) {
            let attachment = self.attachments.remove(pos);
            attachment.preview.release();
        }
    }

    /// Ends the capture session: releases every preview handle and empties
    /// the store. Must run whenever the owning form is discarded.
    pub fn clear(&mut self) {
        for attachment in self.attachments.drain(..) {
            attachment.preview.release();
        }
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn max_photos(&self) -> usize {
        self.max_photos
    }

    /// Attachments in insertion order, which is display order.
    pub fn iter(&self) -> impl Iterator<Item = &PhotoAttachment> {
        self.attachments.iter()
    }

    pub fn ledger(&self) -> &Arc<ReleaseLedger> {
        &self.ledger
    }
}
