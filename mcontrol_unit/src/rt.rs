//! Real-time preparation of the thread that runs the slew loop.
//!
//! [`rt_setup`] locks memory, touches the stack, pins the thread to one
//! core and raises it to `SCHED_FIFO`. Without the `rt` feature only the
//! argument checks run.

use thiserror::Error;

/// Stack touched before the first slew iteration.
const STACK_PREFAULT_BYTES: usize = 256 * 1024;

/// Valid `SCHED_FIFO` priorities on Linux.
pub const RT_PRIORITY_RANGE: std::ops::RangeInclusive<i32> = 1..=99;

#[derive(Debug, Clone, Error)]
pub enum RtError {
    #[error("rt priority {0} outside 1..=99")]
    InvalidPriority(i32),

    #[error("cannot lock process memory: {0}")]
    MemoryLock(String),

    #[error("cannot pin control thread to cpu {cpu}: {reason}")]
    Affinity { cpu: usize, reason: String },

    #[error("cannot switch to SCHED_FIFO at priority {priority}: {reason}")]
    Scheduler { priority: i32, reason: String },
}

/// Prepare the calling thread for the slew loop.
pub fn rt_setup(cpu_core: usize, rt_priority: i32) -> Result<(), RtError> {
    if !RT_PRIORITY_RANGE.contains(&rt_priority) {
        return Err(RtError::InvalidPriority(rt_priority));
    }
    imp::lock_memory()?;
    imp::prefault_stack();
    imp::pin_to(cpu_core)?;
    imp::fifo(rt_priority)
}

#[cfg(feature = "rt")]
mod imp {
    use super::{RtError, STACK_PREFAULT_BYTES};
    use nix::sched::{CpuSet, sched_setaffinity};
    use nix::sys::mman::{MlockallFlags, mlockall};
    use nix::unistd::Pid;

    pub(super) fn lock_memory() -> Result<(), RtError> {
        mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
            .map_err(|e| RtError::MemoryLock(e.to_string()))
    }

    pub(super) fn prefault_stack() {
        let mut page = [0u8; STACK_PREFAULT_BYTES];
        for b in &mut page {
            // SAFETY: `b` is an exclusive reference into a live local array.
            unsafe { core::ptr::write_volatile(b, 0xA5) };
        }
        core::hint::black_box(&page);
    }

    pub(super) fn pin_to(cpu: usize) -> Result<(), RtError> {
        let affinity = |reason: String| RtError::Affinity { cpu, reason };
        let mut set = CpuSet::new();
        set.set(cpu).map_err(|e| affinity(e.to_string()))?;
        sched_setaffinity(Pid::from_raw(0), &set).map_err(|e| affinity(e.to_string()))
    }

    pub(super) fn fifo(priority: i32) -> Result<(), RtError> {
        let param = libc::sched_param {
            sched_priority: priority,
        };
        // SAFETY: pid 0 selects the calling thread; `param` lives across the call.
        if unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) } == 0 {
            return Ok(());
        }
        Err(RtError::Scheduler {
            priority,
            reason: std::io::Error::last_os_error().to_string(),
        })
    }
}

#[cfg(not(feature = "rt"))]
mod imp {
    use super::RtError;

    pub(super) fn lock_memory() -> Result<(), RtError> {
        Ok(())
    }

    pub(super) fn prefault_stack() {}

    pub(super) fn pin_to(_cpu: usize) -> Result<(), RtError> {
        Ok(())
    }

    pub(super) fn fifo(_priority: i32) -> Result<(), RtError> {
        Ok(())
    }
}
