use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::MmapMut;

/// Writes `bytes` to a fresh file at `path` through a writable mapping.
pub fn write_mapped(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if bytes.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "resource is empty"));
    }

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(bytes.len() as u64)?;

    let mut map = unsafe { MmapMut::map_mut(&file)? };
    map.copy_from_slice(bytes);
    map.flush()
}

/// Deletes `path`, treating an already-absent file as success.
pub fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
