use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use sweepr_common::network::target::{Target, TargetSet};
use sweepr_common::run::CancelSignal;

/// The "next unclaimed target" shared by all workers.
pub(super) struct Cursor {
    targets: TargetSet,
    next: Mutex<usize>,
    cancel: CancelSignal,
    interrupted: AtomicBool,
}

impl Cursor {
    pub(super) fn new(targets: TargetSet, cancel: CancelSignal) -> Self {
        Self {
            targets,
            next: Mutex::new(0),
            cancel,
            interrupted: AtomicBool::new(false),
        }
    }

    /// Hands out the next target with its enumeration index.
    ///
    /// Returns `None` once the set is exhausted or cancellation was requested.
    /// The cancellation check happens under the lock, so no target is claimed
    /// after a worker has observed the signal.
    pub(super) fn claim(&self) -> Option<(usize, Target)> {
        let mut next = self.next.lock().unwrap_or_else(PoisonError::into_inner);

        if *next >= self.targets.len() {
            return None;
        }
        if self.cancel.is_cancelled() {
            self.interrupted.store(true, Ordering::SeqCst);
            return None;
        }

        let index = *next;
        *next += 1;
        self.targets.get(index).map(|target| (index, target))
    }

    /// `true` if cancellation left targets unclaimed.
    pub(super) fn was_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
