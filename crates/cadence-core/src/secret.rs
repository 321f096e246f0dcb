//! Extracted secret: 32 bytes of key material recovered from a keystroke code.
//!
//! [`Secret`] is the only type in this crate that carries key material. It:
//! - lives in a heap allocation that is `mlock`'d on a best-effort basis
//! - is zeroized on drop (via [`secrecy::SecretBox`])
//! - prints as `Secret(***)` in `Debug`/`Display`
//! - compares in constant time
//! - is neither `Clone` nor `Serialize`: ownership passes straight to the
//!   caller and the core keeps no copy.

use std::fmt;

use secrecy::{ExposeSecret, SecretBox};
use zeroize::Zeroize;

/// Length of an extracted secret in bytes (256 bits).
pub const SECRET_LEN: usize = 32;

/// A secret produced by [`generate`](crate::FuzzyExtractor::generate) or
/// recovered by [`reproduce`](crate::FuzzyExtractor::reproduce).
pub struct Secret {
    // Dropped (and zeroized) before the page lock is released.
    inner: SecretBox<[u8; SECRET_LEN]>,
    lock: PageLock,
}

impl Secret {
    /// Move `bytes` into locked heap memory and wipe the caller's copy.
    pub(crate) fn from_bytes(bytes: &mut [u8; SECRET_LEN]) -> Self {
        let inner = SecretBox::new(Box::new(*bytes));
        bytes.zeroize();
        let lock = PageLock::acquire(inner.expose_secret().as_ptr(), SECRET_LEN);
        Self { inner, lock }
    }

    /// Expose the raw bytes. Keep the borrow short.
    #[must_use]
    pub fn expose(&self) -> &[u8; SECRET_LEN] {
        self.inner.expose_secret()
    }

    /// Whether the backing pages are locked in RAM.
    ///
    /// Locks are counted per page, so this stays true until this secret is
    /// dropped even when neighbours on the same page go first.
    #[must_use]
    pub const fn is_mlocked(&self) -> bool {
        self.lock.locked
    }
}

impl PartialEq for Secret {
    fn eq(&self, other: &Self) -> bool {
        let diff = self
            .expose()
            .iter()
            .zip(other.expose())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b));
        diff == 0
    }
}

impl Eq for Secret {}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

// ---------------------------------------------------------------------------
// Page locking
// ---------------------------------------------------------------------------

/// RAII `mlock` guard over a heap region owned by the enclosing [`Secret`].
struct PageLock {
    addr: usize,
    len: usize,
    locked: bool,
}

impl PageLock {
    fn acquire(ptr: *const u8, len: usize) -> Self {
        let addr = ptr as usize;
        let locked = pages::lock(addr, len);
        if !locked {
            static WARNED: std::sync::Once = std::sync::Once::new();
            WARNED.call_once(|| {
                tracing::warn!(
                    "mlock unavailable; extracted secrets may be swapped to disk \
                     (consider raising RLIMIT_MEMLOCK)"
                );
            });
        }
        Self { addr, len, locked }
    }
}

impl Drop for PageLock {
    fn drop(&mut self) {
        if self.locked {
            pages::unlock(self.addr, self.len);
        }
    }
}

/// Process-wide lock counts per page.
///
/// `mlock` works on whole pages and does not nest, and many 32-byte secrets
/// share a heap page. A page is locked by its first holder and unlocked by
/// its last.
mod pages {
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

    use super::platform;

    fn holders() -> MutexGuard<'static, HashMap<usize, usize>> {
        static HOLDERS: OnceLock<Mutex<HashMap<usize, usize>>> = OnceLock::new();
        HOLDERS
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Start addresses of the pages covering `addr..addr + len`.
    fn covering(addr: usize, len: usize, page: usize) -> Vec<usize> {
        let (Some(offset), Some(last)) = (
            addr.checked_rem(page),
            addr.checked_add(len.saturating_sub(1)),
        ) else {
            return Vec::new();
        };
        let first = addr.saturating_sub(offset);
        std::iter::successors(Some(first), |p| p.checked_add(page))
            .take_while(|p| *p <= last)
            .collect()
    }

    /// Lock every page under `addr..addr + len`, or none of them.
    pub(super) fn lock(addr: usize, len: usize) -> bool {
        let page = platform::page_size();
        let covered = covering(addr, len, page);
        if covered.is_empty() {
            return false;
        }

        let mut counts = holders();
        let mut fresh = Vec::new();
        for &p in &covered {
            if counts.contains_key(&p) {
                continue;
            }
            if platform::mlock(p, page) {
                fresh.push(p);
            } else {
                for q in fresh {
                    platform::munlock(q, page);
                }
                return false;
            }
        }
        for p in covered {
            let count = counts.entry(p).or_insert(0);
            *count = count.saturating_add(1);
        }
        true
    }

    /// Release one hold on every page under `addr..addr + len`.
    pub(super) fn unlock(addr: usize, len: usize) {
        let page = platform::page_size();
        let mut counts = holders();
        for p in covering(addr, len, page) {
            let Some(count) = counts.get_mut(&p) else {
                continue;
            };
            *count = count.saturating_sub(1);
            if *count == 0 {
                counts.remove(&p);
                platform::munlock(p, page);
            }
        }
    }

    #[cfg(test)]
    pub(super) fn holder_count(addr: usize) -> usize {
        let page = platform::page_size();
        covering(addr, 1, page)
            .first()
            .and_then(|p| holders().get(p).copied())
            .unwrap_or(0)
    }
}

#[cfg(unix)]
mod platform {
    pub(super) fn page_size() -> usize {
        // SAFETY: sysconf has no memory-safety preconditions.
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        usize::try_from(size).unwrap_or(0)
    }

    pub(super) fn mlock(addr: usize, len: usize) -> bool {
        // SAFETY: mlock only inspects the address range; an invalid range
        // yields ENOMEM rather than undefined behaviour.
        unsafe { libc::mlock(addr as *const libc::c_void, len) == 0 }
    }

    pub(super) fn munlock(addr: usize, len: usize) {
        // SAFETY: as above; failure is harmless.
        unsafe {
            libc::munlock(addr as *const libc::c_void, len);
        }
    }
}

#[cfg(not(unix))]
mod platform {
    pub(super) const fn page_size() -> usize {
        0
    }

    pub(super) fn mlock(_addr: usize, _len: usize) -> bool {
        false
    }

    pub(super) fn munlock(_addr: usize, _len: usize) {}
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
