//! Named, file-backed copy storage.
//!
//! Each player gets a directory under the store root holding one file per
//! saved copy. New saves are always written in the current format; loads
//! fall back to the legacy extension when no current file exists.

use std::io;
use std::path::{Path, PathBuf};

use crate::copy::codec::{self, BufferFormat};
use crate::copy::CopyBuffer;
use crate::core::config::CopyConfig;
use crate::core::error::Error;
use crate::core::types::Result;

const TEMP_SUFFIX: &str = "tmp";

/// Result of listing a player's saved copies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Listing {
    /// The player has never saved anything.
    NoDirectory,
    /// Saved names, sorted.
    Names(Vec<String>),
}

/// Saved copies for every player, rooted at one directory.
#[derive(Clone, Debug)]
pub struct BufferStore {
    root: PathBuf,
    max_saved: usize,
    max_name_length: usize,
}

impl BufferStore {
    pub fn new(root: impl Into<PathBuf>, max_saved: usize, max_name_length: usize) -> Self {
        Self {
            root: root.into(),
            max_saved,
            max_name_length,
        }
    }

    pub fn from_config(config: &CopyConfig) -> Self {
        Self::new(&config.save_root, config.max_saved_copies, config.max_name_length)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn max_saved(&self) -> usize {
        self.max_saved
    }

    /// Directory holding `player`'s saves.
    pub fn player_dir(&self, player: &str) -> Result<PathBuf> {
        self.validate_name(player)?;
        Ok(self.root.join(player))
    }

    /// Check a save or player name: 1 to `max_name_length` characters from
    /// `[A-Za-z0-9_.+-]`, not starting with a dot.
    pub fn validate_name(&self, name: &str) -> Result<()> {
        let valid = !name.is_empty()
            && name.len() <= self.max_name_length
            && !name.starts_with('.')
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'+' | b'-'));
        if valid {
            Ok(())
        } else {
            Err(Error::InvalidName(name.to_string()))
        }
    }

    fn file_path(&self, player: &str, name: &str, format: BufferFormat) -> Result<PathBuf> {
        self.validate_name(name)?;
        let dir = self.player_dir(player)?;
        Ok(dir.join(format!("{}.{}", name, format.extension())))
    }

    /// Existing file for `name`, current format first.
    pub fn find_sync(&self, player: &str, name: &str) -> Result<Option<(PathBuf, BufferFormat)>> {
        for format in BufferFormat::LOOKUP_ORDER {
            let path = self.file_path(player, name, format)?;
            if path.is_file() {
                return Ok(Some((path, format)));
            }
        }
        Ok(None)
    }

    /// Save `buffer` as `name`. Refused without touching disk once the player
    /// already has `max_saved` files.
    pub fn save_sync(&self, player: &str, name: &str, buffer: &CopyBuffer) -> Result<PathBuf> {
        let path = self.file_path(player, name, BufferFormat::Current)?;
        let dir = self.player_dir(player)?;

        if dir.is_dir() {
            let mut count = 0;
            for entry in std::fs::read_dir(&dir)? {
                if entry?.file_type()?.is_file() {
                    count += 1;
                }
            }
            self.check_cap(player, count)?;
        }

        let bytes = codec::encode(buffer)?;
        std::fs::create_dir_all(&dir)?;
        let temp = path.with_extension(TEMP_SUFFIX);
        if let Err(e) = std::fs::write(&temp, &bytes).and_then(|()| std::fs::rename(&temp, &path)) {
            // a leftover temp file would count against the cap
            let _ = std::fs::remove_file(&temp);
            return Err(e.into());
        }

        log::info!("{} saved copy {} ({} bytes)", player, name, bytes.len());
        Ok(path)
    }

    /// Load and fully decode `name`. Nothing is returned on a decode failure.
    pub fn load_sync(&self, player: &str, name: &str) -> Result<CopyBuffer> {
        let (path, format) = self
            .find_sync(player, name)?
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        let bytes = std::fs::read(&path)?;
        let mut buffer = format.decode(&bytes)?;
        buffer.set_source(format!("file {}", name));
        log::info!("{} loaded copy {} from {}", player, name, path.display());
        Ok(buffer)
    }

    /// Remove every file saved under `name`.
    pub fn delete_sync(&self, player: &str, name: &str) -> Result<()> {
        let mut removed = false;
        for format in BufferFormat::LOOKUP_ORDER {
            let path = self.file_path(player, name, format)?;
            match std::fs::remove_file(&path) {
                Ok(()) => removed = true,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if !removed {
            return Err(Error::NotFound(name.to_string()));
        }
        log::info!("{} deleted copy {}", player, name);
        Ok(())
    }

    /// Names of the player's saved copies.
    pub fn list_sync(&self, player: &str) -> Result<Listing> {
        let dir = self.player_dir(player)?;
        if !dir.is_dir() {
            return Ok(Listing::NoDirectory);
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if let Some(name) = saved_name(&path) {
                names.push(name);
            }
        }
        Ok(Listing::Names(sorted(names)))
    }

    /// Save `buffer` as `name`.
    pub async fn save(&self, player: &str, name: &str, buffer: &CopyBuffer) -> Result<PathBuf> {
        let path = self.file_path(player, name, BufferFormat::Current)?;
        let dir = self.player_dir(player)?;

        if tokio::fs::try_exists(&dir).await? {
            let mut count = 0;
            let mut entries = tokio::fs::read_dir(&dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    count += 1;
                }
            }
            self.check_cap(player, count)?;
        }

        let bytes = codec::encode(buffer)?;
        tokio::fs::create_dir_all(&dir).await?;
        let temp = path.with_extension(TEMP_SUFFIX);
        let written = async {
            tokio::fs::write(&temp, &bytes).await?;
            tokio::fs::rename(&temp, &path).await
        };
        if let Err(e) = written.await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        log::info!("{} saved copy {} ({} bytes)", player, name, bytes.len());
        Ok(path)
    }

    /// Load and fully decode `name`.
    pub async fn load(&self, player: &str, name: &str) -> Result<CopyBuffer> {
        for format in BufferFormat::LOOKUP_ORDER {
            let path = self.file_path(player, name, format)?;
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let mut buffer = format.decode(&bytes)?;
            buffer.set_source(format!("file {}", name));
            log::info!("{} loaded copy {} from {}", player, name, path.display());
            return Ok(buffer);
        }
        Err(Error::NotFound(name.to_string()))
    }

    /// Remove every file saved under `name`.
    pub async fn delete(&self, player: &str, name: &str) -> Result<()> {
        let mut removed = false;
        for format in BufferFormat::LOOKUP_ORDER {
            let path = self.file_path(player, name, format)?;
            match tokio::fs::remove_file(&path).await {
                Ok(()) => removed = true,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        if !removed {
            return Err(Error::NotFound(name.to_string()));
        }
        log::info!("{} deleted copy {}", player, name);
        Ok(())
    }

    /// Names of the player's saved copies.
    pub async fn list(&self, player: &str) -> Result<Listing> {
        let dir = self.player_dir(player)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Listing::NoDirectory),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = saved_name(&entry.path()) {
                names.push(name);
            }
        }
        Ok(Listing::Names(sorted(names)))
    }

    fn check_cap(&self, player: &str, count: usize) -> Result<()> {
        if count >= self.max_saved {
            log::warn!("{} hit the saved copy limit ({} files)", player, count);
            return Err(Error::SaveLimitReached {
                limit: self.max_saved,
            });
        }
        Ok(())
    }
}

impl Default for BufferStore {
    fn default() -> Self {
        Self::from_config(&CopyConfig::default())
    }
}

/// Stem of a saved copy file, or `None` for anything else. The extension
/// must match exactly, since loads and deletes build the lowercase path.
fn saved_name(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if ext != BufferFormat::from_extension(ext)?.extension() {
        return None;
    }
    Some(path.file_stem()?.to_str()?.to_string())
}

fn sorted(mut names: Vec<String>) -> Vec<String> {
    names.sort();
    names.dedup();
    names
}
