/// Coalesces render requests into at most one pass per frame.
///
/// `request` marks the list dirty and schedules a frame unless one is already scheduled or a
/// pass is running. A request that arrives while a pass is running schedules exactly one
/// follow-up frame when that pass ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderScheduler {
    scheduled: bool,
    rendering: bool,
    dirty: bool,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when this call scheduled a new frame.
    pub fn request(&mut self) -> bool {
        self.dirty = true;
        if self.rendering || self.scheduled {
            return false;
        }
        self.scheduled = true;
        self.dirty = false;
        true
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    /// Starts the scheduled pass. Returns `false` when no frame is scheduled.
    pub fn begin_frame(&mut self) -> bool {
        if !self.scheduled || self.rendering {
            return false;
        }
        self.scheduled = false;
        self.rendering = true;
        true
    }

    /// Ends the running pass, scheduling another frame if state changed during it.
    pub fn end_frame(&mut self) {
        debug_assert!(self.rendering, "end_frame without begin_frame");
        self.rendering = false;
        if self.dirty {
            self.dirty = false;
            self.scheduled = true;
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }
}
