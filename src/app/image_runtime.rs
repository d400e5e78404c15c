//! Background image decoding to keep the UI thread responsive.
//!
//! Opening a project spawns a small pool of worker threads that pull image
//! paths from a shared queue, decode and downscale them, and report back
//! over a channel.  Every batch carries a generation id; results for a
//! gallery that has since been closed are dropped by the receiver, and the
//! shared cancel flag stops the workers early.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Context;
use tokio::sync::mpsc;

/// Decoded images are downscaled to fit inside this box.  Panels never
/// need more: a terminal row is two pixels tall.
const THUMB_MAX_W: u32 = 960;
const THUMB_MAX_H: u32 = 480;

#[derive(Debug)]
pub struct ImageUpdate {
    pub generation: u64,
    pub index: usize,
    pub result: Result<Arc<image::RgbaImage>, String>,
}

/// Handle to a running decode batch.  Cancels on drop.
#[derive(Debug)]
pub struct DecodeBatch {
    cancel: Arc<AtomicBool>,
}

impl DecodeBatch {
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for DecodeBatch {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn spawn_decode(
    tx: mpsc::UnboundedSender<ImageUpdate>,
    generation: u64,
    paths: Vec<PathBuf>,
) -> DecodeBatch {
    let cancel = Arc::new(AtomicBool::new(false));
    let job_count = paths.len();
    if job_count == 0 {
        return DecodeBatch { cancel };
    }

    let queue: Arc<Mutex<VecDeque<(usize, PathBuf)>>> =
        Arc::new(Mutex::new(paths.into_iter().enumerate().collect()));

    let max_threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .max(1);
    let worker_count = max_threads.min(job_count);
    tracing::debug!(generation, job_count, worker_count, "decoding gallery images");

    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let tx = tx.clone();
        let cancel = Arc::clone(&cancel);
        std::thread::spawn(move || loop {
            if cancel.load(Ordering::Relaxed) {
                break;
            }
            let (index, path) = {
                let mut q = match queue.lock() {
                    Ok(guard) => guard,
                    Err(_) => break,
                };
                match q.pop_front() {
                    Some(job) => job,
                    None => break,
                }
            };

            let result = decode_thumbnail(&path).map(Arc::new).map_err(|err| {
                tracing::warn!("{err:#}");
                format!("{err:#}")
            });
            if tx.send(ImageUpdate { generation, index, result }).is_err() {
                break; // receiver dropped
            }
        });
    }

    DecodeBatch { cancel }
}

fn decode_thumbnail(path: &std::path::Path) -> anyhow::Result<image::RgbaImage> {
    let img = image::open(path).with_context(|| format!("decoding {}", path.display()))?;
    let img = if img.width() > THUMB_MAX_W || img.height() > THUMB_MAX_H {
        img.thumbnail(THUMB_MAX_W, THUMB_MAX_H)
    } else {
        img
    };
    Ok(img.to_rgba8())
}
