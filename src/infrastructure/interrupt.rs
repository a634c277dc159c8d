//! Interrupt forwarding to running children.
//!
//! While a child is registered, SIGINT/SIGTERM no longer terminate this
//! process; the same signal is passed on to the child and the launcher keeps
//! waiting. With no child registered the default action applies.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Once;

use tracing::warn;

const SLOTS: usize = 16;

#[allow(clippy::declare_interior_mutable_const)]
const FREE: AtomicI32 = AtomicI32::new(0);

// Read from the signal handler, so plain atomics only.
static CHILDREN: [AtomicI32; SLOTS] = [FREE; SLOTS];
static HANDLER: Once = Once::new();

/// Registration of one child; dropping it stops forwarding to that pid.
#[derive(Debug)]
pub struct Forwarding {
    slot: Option<usize>,
}

/// Forward interrupts to `pid` until the returned guard is dropped.
pub fn forward_to(pid: u32) -> Forwarding {
    HANDLER.call_once(install);

    let Ok(pid) = i32::try_from(pid) else {
        warn!("interrupt forwarding: pid {} out of range", pid);
        return Forwarding { slot: None };
    };
    let slot = CHILDREN.iter().position(|entry| {
        entry
            .compare_exchange(0, pid, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    });
    if slot.is_none() {
        warn!("interrupt forwarding: no free slot for pid {}", pid);
    }
    Forwarding { slot }
}

/// Pids currently receiving forwarded interrupts.
pub fn registered() -> Vec<u32> {
    CHILDREN
        .iter()
        .map(|entry| entry.load(Ordering::SeqCst))
        .filter(|pid| *pid > 0)
        .map(|pid| pid as u32)
        .collect()
}

impl Drop for Forwarding {
    fn drop(&mut self) {
        if let Some(slot) = self.slot {
            CHILDREN[slot].store(0, Ordering::SeqCst);
        }
    }
}

#[cfg(unix)]
fn install() {
    for signal in [libc::SIGINT, libc::SIGTERM] {
        // SAFETY: the action is fully initialised before use and the handler
        // only performs async-signal-safe calls.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            action.sa_sigaction = forward_signal as extern "C" fn(libc::c_int) as libc::sighandler_t;
            action.sa_flags = libc::SA_RESTART;
            libc::sigemptyset(&mut action.sa_mask);
            libc::sigaction(signal, &action, std::ptr::null_mut())
        };
        if rc != 0 {
            warn!(
                "interrupt forwarding unavailable for signal {}: {}",
                signal,
                std::io::Error::last_os_error()
            );
        }
    }
}

#[cfg(unix)]
extern "C" fn forward_signal(signal: libc::c_int) {
    let mut forwarded = false;
    for entry in &CHILDREN {
        let pid = entry.load(Ordering::SeqCst);
        if pid > 0 {
            // SAFETY: kill(2) is async-signal-safe and takes plain integers.
            unsafe { libc::kill(pid, signal) };
            forwarded = true;
        }
    }
    if !forwarded {
        // SAFETY: signal(2) and raise(3) are async-signal-safe.
        unsafe {
            libc::signal(signal, libc::SIG_DFL);
            libc::raise(signal);
        }
    }
}

// Console children on Windows receive Ctrl-C from the console themselves;
// this process only has to survive it.
#[cfg(not(unix))]
fn install() {
    if let Err(e) = ctrlc::set_handler(|| tracing::debug!("interrupt left to the child")) {
        warn!("interrupt forwarding unavailable: {}", e);
    }
}
