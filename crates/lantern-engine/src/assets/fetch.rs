use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Byte source for asset urls. Called from loader worker threads.
pub trait Fetch: Send + Sync {
    fn fetch(&self, url: &str) -> io::Result<Vec<u8>>;
}

/// Reads urls as paths relative to a root directory (absolute paths pass through).
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Fetch for FileFetcher {
    fn fetch(&self, url: &str) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(url))
    }
}

/// Serves bytes registered up front; unknown urls are `NotFound`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(url.into(), bytes.into());
        self
    }
}

impl Fetch for MemoryFetcher {
    fn fetch(&self, url: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(url)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such asset: {url}")))
    }
}
