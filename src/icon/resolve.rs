use std::collections::HashMap;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use super::{IconError, IconRef};

/// Source of raw icon markup.
pub trait IconResolver {
    fn resolve(&self, icon: &IconRef) -> Result<String, IconError>;
}

impl<R: IconResolver + ?Sized> IconResolver for &R {
    fn resolve(&self, icon: &IconRef) -> Result<String, IconError> {
        (**self).resolve(icon)
    }
}

/// Reads `{dir}/{name}.svg` for named icons; decodes embedded ones.
#[derive(Debug, Clone)]
pub struct DirectoryResolver {
    dir: PathBuf,
}

impl DirectoryResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_named(&self, name: &str) -> Result<String, IconError> {
        // Names map straight onto file stems; anything else could escape the directory
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(IconError::InvalidName(name.to_string()));
        }

        let path = self.dir.join(format!("{}.svg", name));
        debug!(path = %path.display(), "reading icon");
        std::fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                IconError::NotFound(name.to_string())
            } else {
                IconError::Io {
                    name: name.to_string(),
                    source,
                }
            }
        })
    }
}

impl IconResolver for DirectoryResolver {
    fn resolve(&self, icon: &IconRef) -> Result<String, IconError> {
        match icon {
            IconRef::Named(name) => self.read_named(name),
            IconRef::Embedded { data_uri, .. } => decode_data_uri(data_uri),
        }
    }
}

/// Icons held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryResolver {
    icons: HashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_icon(mut self, name: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(name, markup);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, markup: impl Into<String>) {
        self.icons.insert(name.into(), markup.into());
    }
}

impl IconResolver for MemoryResolver {
    fn resolve(&self, icon: &IconRef) -> Result<String, IconError> {
        match icon {
            IconRef::Named(name) => self
                .icons
                .get(name)
                .cloned()
                .ok_or_else(|| IconError::NotFound(name.clone())),
            IconRef::Embedded { data_uri, .. } => decode_data_uri(data_uri),
        }
    }
}

/// Keeps the most recently used icons in memory. Failures are not cached.
pub struct CachedResolver<R> {
    inner: R,
    cache: Mutex<LruCache<IconRef, String>>,
}

impl<R: IconResolver> CachedResolver<R> {
    pub fn new(inner: R, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cached_len(&self) -> usize {
        self.cache.lock().len()
    }
}

impl<R: IconResolver> IconResolver for CachedResolver<R> {
    fn resolve(&self, icon: &IconRef) -> Result<String, IconError> {
        if let Some(hit) = self.cache.lock().get(icon) {
            return Ok(hit.clone());
        }

        let markup = self.inner.resolve(icon)?;
        self.cache.lock().put(icon.clone(), markup.clone());
        Ok(markup)
    }
}

/// Decodes `data:[<mediatype>][;base64],<payload>` into text.
pub fn decode_data_uri(uri: &str) -> Result<String, IconError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or(IconError::InvalidDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(IconError::InvalidDataUri)?;
    if payload.trim().is_empty() {
        return Err(IconError::InvalidDataUri);
    }

    let bytes = if header.to_ascii_lowercase().ends_with(";base64") {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD.decode(compact)?
    } else {
        percent_decode(payload)
    };

    Ok(String::from_utf8(bytes)?)
}

fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}
