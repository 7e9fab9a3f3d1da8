use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Receiver, TryRecvError};

use crate::audio::SoundData;
use crate::error::AssetError;

use super::fetch::Fetch;
use super::image::Image;
use super::manifest::AssetManifest;

/// Loaded assets by name. Entries that failed to load are absent.
#[derive(Debug, Clone, Default)]
pub struct AssetBag {
    pub images: HashMap<String, Image>,
    pub sounds: HashMap<String, SoundData>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Progress {
    pub loaded: usize,
    pub total: usize,
}

impl Progress {
    /// Completed fraction in `[0, 1]`; an empty load counts as complete.
    pub fn ratio(self) -> f32 {
        if self.total == 0 { 1.0 } else { self.loaded as f32 / self.total as f32 }
    }
}

enum Outcome {
    Image(String, Image),
    Sound(String, SoundData),
    Failed(AssetError),
}

/// An in-flight manifest load.
///
/// Fetching and decoding run on worker threads; results are only observed on the
/// thread that polls, so completion handling stays on the frame loop.
pub struct PendingAssets {
    rx: Receiver<Outcome>,
    total: usize,
    loaded: usize,
    bag: Option<AssetBag>,
}

impl PendingAssets {
    pub fn progress(&self) -> Progress {
        Progress { loaded: self.loaded, total: self.total }
    }

    pub fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }

    fn settle(&mut self, outcome: Outcome) {
        if let Some(bag) = self.bag.as_mut() {
            match outcome {
                Outcome::Image(name, img) => {
                    bag.images.insert(name, img);
                }
                Outcome::Sound(name, snd) => {
                    bag.sounds.insert(name, snd);
                }
                Outcome::Failed(e) => log::warn!("{e}"),
            }
        }
        self.loaded += 1;
    }

    /// Drains finished entries without blocking, reporting progress for each.
    ///
    /// Returns the bag exactly once, when every entry has settled.
    pub fn poll(&mut self, mut on_progress: impl FnMut(Progress)) -> Option<AssetBag> {
        while !self.is_complete() {
            match self.rx.try_recv() {
                Ok(outcome) => {
                    self.settle(outcome);
                    on_progress(self.progress());
                }
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    let missing = self.total - self.loaded;
                    log::warn!("{missing} asset worker(s) exited without reporting");
                    self.loaded = self.total;
                    on_progress(self.progress());
                }
            }
        }
        self.bag.take()
    }

    /// Blocks until every entry has settled.
    pub fn wait(mut self) -> AssetBag {
        while !self.is_complete() {
            match self.rx.recv() {
                Ok(outcome) => self.settle(outcome),
                Err(_) => self.loaded = self.total,
            }
        }
        self.bag.take().unwrap_or_default()
    }
}

/// Upper bound on fetch/decode threads per manifest load.
pub const MAX_ASSET_WORKERS: usize = 4;

/// Starts concurrent manifest loads through a `Fetch` implementation.
///
/// Each load runs on its own small pool of at most [`MAX_ASSET_WORKERS`] threads that
/// pull entries from a shared queue and exit once it is empty. Nothing about the
/// results is visible to the caller until it polls the returned [`PendingAssets`].
#[derive(Clone)]
pub struct AssetLoader {
    fetcher: Arc<dyn Fetch>,
}

impl AssetLoader {
    pub fn new(fetcher: Arc<dyn Fetch>) -> Self {
        Self { fetcher }
    }

    /// Queues every entry at once. Never fails; bad entries settle as failures.
    pub fn start(&self, manifest: &AssetManifest) -> PendingAssets {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<Job>();

        let jobs = manifest
            .images
            .iter()
            .map(|(n, u)| Job { name: n.clone(), url: u.clone(), kind: Kind::Image })
            .chain(manifest.sounds.iter().map(|(n, u)| Job { name: n.clone(), url: u.clone(), kind: Kind::Sound }));

        let mut total = 0;
        for job in jobs {
            total += 1;
            // the receiver is alive in this scope, so the queue cannot be closed
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        for i in 0..total.min(MAX_ASSET_WORKERS) {
            let tx = tx.clone();
            let jobs = job_rx.clone();
            let fetcher = self.fetcher.clone();
            let spawned = thread::Builder::new()
                .name(format!("asset-worker-{i}"))
                .spawn(move || {
                    for job in jobs.iter() {
                        let outcome = match load_one(fetcher.as_ref(), &job.name, &job.url, job.kind) {
                            Ok(o) => o,
                            Err(e) => Outcome::Failed(e),
                        };
                        if tx.send(outcome).is_err() {
                            break;
                        }
                    }
                });
            if let Err(e) = spawned {
                log::warn!("could not spawn asset worker: {e}");
            }
        }

        log::debug!("loading {total} asset(s)");
        PendingAssets { rx, total, loaded: 0, bag: Some(AssetBag::default()) }
    }
}

struct Job {
    name: String,
    url: String,
    kind: Kind,
}

#[derive(Copy, Clone)]
enum Kind {
    Image,
    Sound,
}

fn load_one(fetcher: &dyn Fetch, name: &str, url: &str, kind: Kind) -> Result<Outcome, AssetError> {
    let bytes = fetcher
        .fetch(url)
        .map_err(|source| AssetError::Fetch { url: url.to_string(), source })?;

    match kind {
        Kind::Image => {
            let img = Image::decode(&bytes)
                .map_err(|source| AssetError::Image { url: url.to_string(), source })?;
            Ok(Outcome::Image(name.to_string(), img))
        }
        Kind::Sound => {
            let data = SoundData::from_bytes(bytes);
            rodio::Decoder::new(Cursor::new(data.clone()))
                .map_err(|source| AssetError::Sound { url: url.to_string(), source })?;
            Ok(Outcome::Sound(name.to_string(), data))
        }
    }
}
