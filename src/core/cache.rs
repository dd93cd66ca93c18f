//! File system cache for slow-changing public data.
//!
//! Only public reference data is cached here (the Sleeper player catalog).
//! League results and credentials are never written to disk.

use std::{
    fs,
    io::{Read, Write},
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

/// Base directory: `~/.cache/league-import`
pub fn default_cache_dir() -> PathBuf {
    let base = dirs::cache_dir().unwrap_or_else(|| {
        let mut home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.push(".cache");
        home
    });
    base.join("league-import")
}

/// Path: `{dir}/sleeper-players_{sport}.json`
pub fn player_catalog_path(dir: &Path, sport: &str) -> PathBuf {
    dir.join(format!("sleeper-players_{}.json", sport))
}

/// Try to read a file into a String
pub fn try_read_to_string(path: &Path) -> Option<String> {
    let mut f = fs::File::open(path).ok()?;
    let mut s = String::new();

    f.read_to_string(&mut s).ok()?;

    Some(s)
}

/// Read a file only if it was modified less than `ttl` ago.
pub fn try_read_fresh(path: &Path, ttl: Duration) -> Option<String> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    let age = SystemTime::now().duration_since(modified).unwrap_or_default();
    if age > ttl {
        return None;
    }
    try_read_to_string(path)
}

/// Write a string to file
pub fn write_string(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut f = fs::File::create(path)?;
    f.write_all(contents.as_bytes())
}
