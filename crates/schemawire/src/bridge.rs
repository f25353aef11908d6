// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sync/async bridge for the blocking convenience wrappers.
//!
//! One generic "await this future from a plain thread" utility: the future is
//! spawned onto the codec's runtime handle and the calling thread blocks on a
//! channel receive until it completes. Every blocking wrapper layers over
//! this instead of rolling its own promise/wait pair.
//!
//! Caller contract: do not call from a thread that drives the same runtime.
//! The runtime cannot service the spawned future while its own thread is
//! parked here, and the codec does not detect that situation.

use crate::error::{CodecError, CodecResult};
use std::future::Future;
use std::sync::mpsc;
use tokio::runtime::Handle;

/// Run `future` on `handle` and block the calling thread until it completes.
///
/// A runtime that shuts down before completion surfaces as
/// [`CodecError::Shutdown`].
pub(crate) fn wait_on<T, F>(handle: &Handle, future: F) -> CodecResult<T>
where
    T: Send + 'static,
    F: Future<Output = CodecResult<T>> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    handle.spawn(async move {
        // Receiver gone means the waiter gave up; nothing to do.
        let _ = tx.send(future.await);
    });
    rx.recv().unwrap_or(Err(CodecError::Shutdown))
}
