use alloc::boxed::Box;
use alloc::vec::Vec;

/// Listener registrations collected at mount and detached together.
///
/// Each entry is the closure that undoes one registration (e.g. removes a scroll or resize
/// handler). Detach closures run in reverse registration order, exactly once: on
/// [`Listeners::release`] or when the guard is dropped.
#[derive(Default)]
pub struct Listeners {
    detach: Vec<Box<dyn FnOnce()>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, detach: impl FnOnce() + 'static) {
        self.detach.push(Box::new(detach));
    }

    pub fn len(&self) -> usize {
        self.detach.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detach.is_empty()
    }

    /// Detaches every registered listener.
    pub fn release(&mut self) {
        while let Some(detach) = self.detach.pop() {
            detach();
        }
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.release();
    }
}

impl core::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.detach.len())
            .finish()
    }
}
