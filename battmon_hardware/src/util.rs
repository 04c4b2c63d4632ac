use std::path::Path;

use crate::error::{HwError, Result};

/// Read a single unsigned integer attribute from a sysfs-style file.
///
/// Surrounding whitespace (sysfs values end in '\n') is ignored. A read that
/// times out at the OS level maps to `HwError::Timeout`.
pub fn read_sysfs_u32(path: &Path) -> Result<u32> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::TimedOut => HwError::Timeout,
        _ => HwError::Io(e),
    })?;
    let trimmed = text.trim();
    trimmed.parse::<u32>().map_err(|_| HwError::Parse {
        path: path.to_path_buf(),
        value: trimmed.to_string(),
    })
}
