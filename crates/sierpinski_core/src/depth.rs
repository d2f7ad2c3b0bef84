//! Recursion depth state machine
//!
//! Depth is always within `0..=MAX_DEPTH`. Changes raise a one-shot dirty
//! flag that the frame update consumes, so the depth parameter is pushed to
//! the GPU once per change instead of every frame.

/// Highest depth reachable through the controls
///
/// Caps the stream at `4^7 = 16384` triangles per frame.
pub const MAX_DEPTH: u32 = 6;

/// Starting depth, and the target of [`DepthCommand::Reset`]
pub const DEFAULT_DEPTH: u32 = 3;

/// Discrete depth transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthCommand {
    Increase,
    Decrease,
    Reset,
}

/// Current depth plus the dirty flag
#[derive(Clone, Debug)]
pub struct DepthState {
    value: u32,
    initial: u32,
    dirty: bool,
}

impl Default for DepthState {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl DepthState {
    /// Create a state at `initial` (clamped), marked dirty so the first frame
    /// uploads it
    pub fn new(initial: u32) -> Self {
        let initial = initial.min(MAX_DEPTH);
        Self {
            value: initial,
            initial,
            dirty: true,
        }
    }

    /// Current depth
    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Depth that `Reset` returns to
    #[inline]
    pub fn initial(&self) -> u32 {
        self.initial
    }

    /// Whether a change is waiting to be uploaded
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Depth as a fraction of [`MAX_DEPTH`], in `[0, 1]`
    #[inline]
    pub fn fraction(&self) -> f32 {
        self.value as f32 / MAX_DEPTH as f32
    }

    /// Apply a transition, returning whether the depth value changed
    ///
    /// `Increase` at the maximum and `Decrease` at zero are no-ops and leave
    /// the dirty flag alone. `Reset` always marks the state dirty.
    pub fn apply(&mut self, command: DepthCommand) -> bool {
        let previous = self.value;
        match command {
            DepthCommand::Increase => {
                if self.value < MAX_DEPTH {
                    self.value += 1;
                    self.dirty = true;
                }
            }
            DepthCommand::Decrease => {
                if self.value > 0 {
                    self.value -= 1;
                    self.dirty = true;
                }
            }
            DepthCommand::Reset => {
                self.value = self.initial;
                self.dirty = true;
            }
        }
        self.value != previous
    }

    /// Set the depth from an unchecked value, clamping silently
    pub fn set(&mut self, raw: i64) {
        let clamped = raw.clamp(0, MAX_DEPTH as i64) as u32;
        if clamped as i64 != raw {
            log::debug!("Depth {} out of range, clamped to {}", raw, clamped);
        }
        if clamped != self.value {
            self.value = clamped;
            self.dirty = true;
        }
    }

    /// Consume the dirty flag, returning the depth to upload if it was set
    pub fn take_dirty(&mut self) -> Option<u32> {
        if self.dirty {
            self.dirty = false;
            Some(self.value.min(MAX_DEPTH))
        } else {
            None
        }
    }
}
