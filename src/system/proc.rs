//! Readers for /proc files and libc system calls.

use std::io;
use std::path::Path;

/// Free and total bytes of a filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpace {
    /// Bytes available to unprivileged users
    pub free: u64,
    pub total: u64,
}

/// Parse a line like "VmRSS:     16384 kB" out of /proc/self/status and
/// return the value in bytes.
pub fn parse_status_kb(content: &str, field: &str) -> Option<u64> {
    content
        .lines()
        .find(|line| line.starts_with(field))
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|kb| kb.parse::<u64>().ok())
        .map(|kb| kb * 1024)
}

/// Parse /proc/uptime ("350735.47 234388.90") into seconds since boot.
pub fn parse_uptime(content: &str) -> Option<f64> {
    content.split_whitespace().next()?.parse().ok()
}

/// 1, 5 and 15 minute load averages.
#[cfg(unix)]
pub fn load_average() -> Option<[f64; 3]> {
    let mut loads = [0f64; 3];
    // SAFETY: the buffer holds exactly the 3 samples requested
    let n = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    (n == 3).then_some(loads)
}

#[cfg(not(unix))]
pub fn load_average() -> Option<[f64; 3]> {
    None
}

/// Filesystem space for the mount containing `path`.
#[cfg(unix)]
pub fn disk_space(path: &Path) -> io::Result<DiskSpace> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: statvfs is plain old data, fully written on success
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    let fragment = stat.f_frsize as u64;
    Ok(DiskSpace {
        free: stat.f_bavail as u64 * fragment,
        total: stat.f_blocks as u64 * fragment,
    })
}

#[cfg(not(unix))]
pub fn disk_space(_path: &Path) -> io::Result<DiskSpace> {
    Err(io::Error::new(io::ErrorKind::Unsupported, "statvfs"))
}
