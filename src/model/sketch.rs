use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::geometry::shape::ShapeKind;
use crate::model::frame::{Frame, FrameId};
use crate::model::stroke::{StrokeRecord, StrokeStyle};

/// Neighbor lookup direction in sequence order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Before,
    After,
}

/// Fixed palette for generated demo frames.
const GENERATION_PALETTE: [Rgba8; 5] = [
    Rgba8::BLACK,
    Rgba8::WHITE,
    Rgba8::RED,
    Rgba8::GREEN,
    Rgba8::YELLOW,
];

const GENERATED_WIDTH_MIN: f64 = 1.0;
const GENERATED_WIDTH_MAX: f64 = 5.0;

/// Ordered collection of frames with a current-frame pointer.
///
/// Invariants:
/// - the sequence is never empty; removing the last frame clears it in
///   place instead of deleting it
/// - `current` always points at an element of the sequence
/// - after any membership/order mutation every frame's `index` equals its
///   position, so `index` is a position label, never an identity
///
/// All mutation is synchronous and single-threaded; callers confine it to
/// the interactive thread and hand [`snapshot`](Self::snapshot) copies to
/// anything running elsewhere (e.g. export).
#[derive(Clone, Debug)]
pub struct Sketch {
    frames: Vec<Frame>,
    current: usize,
    max_frames: usize,
    gen_state: u64,
}

impl Default for Sketch {
    fn default() -> Self {
        Self::new()
    }
}

impl Sketch {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::new(0)],
            current: 0,
            max_frames: usize::MAX,
            gen_state: 0x5EED_0F_5EED,
        }
    }

    /// Caps the frame count for [`add_after_current`](Self::add_after_current),
    /// [`duplicate_current`](Self::duplicate_current) and
    /// [`generate_frames`](Self::generate_frames).
    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames.max(1);
        self
    }

    /// Reseeds the generator used by [`generate_frames`](Self::generate_frames).
    /// Same seed and call sequence, same frames.
    pub fn set_generation_seed(&mut self, seed: u64) {
        self.gen_state = seed;
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        // The sequence invariant makes this impossible, but the slice-like
        // accessor pair stays complete.
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn current(&self) -> &Frame {
        &self.frames[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Frame {
        &mut self.frames[self.current]
    }

    pub fn current_id(&self) -> FrameId {
        self.frames[self.current].id()
    }

    pub fn get(&self, id: FrameId) -> Option<&Frame> {
        self.position_of(id).map(|i| &self.frames[i])
    }

    pub fn get_mut(&mut self, id: FrameId) -> Option<&mut Frame> {
        self.position_of(id).map(|i| &mut self.frames[i])
    }

    fn position_of(&self, id: FrameId) -> Option<usize> {
        self.frames.iter().position(|f| f.id() == id)
    }

    /// Makes `id` the current frame. Returns whether the frame exists.
    pub fn select(&mut self, id: FrameId) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.current = pos;
                true
            }
            None => false,
        }
    }

    pub fn can_add(&self) -> bool {
        self.frames.len() < self.max_frames
    }

    /// Whether a clear/remove action would change anything.
    pub fn can_clear(&self) -> bool {
        self.frames.len() > 1 || !self.current().is_empty()
    }

    /// Inserts a new empty frame right after the current one and makes it
    /// current. Returns `None` when the frame cap is reached.
    pub fn add_after_current(&mut self) -> Option<FrameId> {
        if !self.can_add() {
            return None;
        }
        let pos = self.current + 1;
        let frame = Frame::new(pos);
        let id = frame.id();
        self.frames.insert(pos, frame);
        self.renumber();
        self.current = pos;
        Some(id)
    }

    /// Inserts a deep copy of the current frame right after it and makes
    /// the copy current. The copy starts with an empty redo buffer and
    /// shares no mutable state with the original.
    pub fn duplicate_current(&mut self) -> Option<FrameId> {
        if !self.can_add() {
            return None;
        }
        let pos = self.current + 1;
        let copy = self.frames[self.current].duplicated(pos);
        let id = copy.id();
        self.frames.insert(pos, copy);
        self.renumber();
        self.current = pos;
        Some(id)
    }

    /// Removes a frame. With more than one frame present the frame before
    /// it (wrapping past the front) becomes current; the sole remaining
    /// frame is cleared in place instead of removed, keeping the sequence
    /// non-empty. Returns whether anything changed.
    pub fn remove(&mut self, id: FrameId) -> bool {
        let Some(pos) = self.position_of(id) else {
            return false;
        };

        if self.frames.len() == 1 {
            self.frames[0].clear();
            self.current = 0;
            return true;
        }

        let before = self.neighbor_position(pos, Direction::Before, true);
        let keep = self.frames[before].id();
        self.frames.remove(pos);
        self.renumber();
        // `keep` survives: with len > 1 the wrapping before-neighbor is
        // always a different frame than the removed one.
        self.current = self.position_of(keep).unwrap_or(0);
        true
    }

    /// Removes every frame, collapsing the sequence to its first frame
    /// cleared in place, which becomes current.
    ///
    /// Equivalent to removing frames back-to-front one at a time, but
    /// without the per-step neighbor lookups.
    pub fn remove_all(&mut self) {
        self.frames.truncate(1);
        self.frames[0].clear();
        self.renumber();
        self.current = 0;
    }

    /// Adjacent frame in sequence order. With `looped` the lookup wraps
    /// past the ends; without it a boundary frame is its own neighbor.
    /// Returns `None` only for an unknown id.
    pub fn neighbor(&self, id: FrameId, direction: Direction, looped: bool) -> Option<FrameId> {
        let pos = self.position_of(id)?;
        Some(self.frames[self.neighbor_position(pos, direction, looped)].id())
    }

    fn neighbor_position(&self, pos: usize, direction: Direction, looped: bool) -> usize {
        let last = self.frames.len() - 1;
        match direction {
            Direction::Before => {
                if pos > 0 {
                    pos - 1
                } else if looped {
                    last
                } else {
                    pos
                }
            }
            Direction::After => {
                if pos < last {
                    pos + 1
                } else if looped {
                    0
                } else {
                    pos
                }
            }
        }
    }

    /// The previous frame drawn faintly behind the current one as an
    /// editing guide. The first frame has no ghost.
    pub fn ghost_of_current(&self) -> Option<&Frame> {
        (self.current > 0).then(|| &self.frames[self.current - 1])
    }

    /// Appends `count` frames, each holding one generated shape stroke:
    /// random kind, endpoints within the canvas, palette color, line width
    /// in 1..=5. The count saturates against the frame cap. The last
    /// generated frame becomes current. Returns how many frames were added.
    pub fn generate_frames(&mut self, count: usize, canvas: Canvas) -> usize {
        let room = self.max_frames.saturating_sub(self.frames.len());
        let count = count.min(room);

        for _ in 0..count {
            let start = self.random_point(canvas);
            let end = self.random_point(canvas);
            let kind = ShapeKind::ALL[(next_u64(&mut self.gen_state) % 3) as usize];
            let color = GENERATION_PALETTE
                [(next_u64(&mut self.gen_state) % GENERATION_PALETTE.len() as u64) as usize];
            let line_width = GENERATED_WIDTH_MIN
                + next_unit_f64(&mut self.gen_state) * (GENERATED_WIDTH_MAX - GENERATED_WIDTH_MIN);

            let index = self.frames.len();
            let mut frame = Frame::new(index);
            frame.commit(StrokeRecord::shape(
                kind,
                start,
                end,
                StrokeStyle { color, line_width },
                canvas,
            ));
            self.frames.push(frame);
        }

        if count > 0 {
            self.renumber();
            self.current = self.frames.len() - 1;
        }
        count
    }

    fn random_point(&mut self, canvas: Canvas) -> Point {
        let x = next_unit_f64(&mut self.gen_state) * f64::from(canvas.width);
        let y = next_unit_f64(&mut self.gen_state) * f64::from(canvas.height);
        Point::new(x, y)
    }

    /// Deep copy of the frame sequence, taken at the moment export starts.
    /// Mutations after the snapshot are invisible to an in-flight export.
    pub fn snapshot(&self) -> Vec<Frame> {
        self.frames.clone()
    }

    fn renumber(&mut self) {
        for (i, frame) in self.frames.iter_mut().enumerate() {
            frame.index = i;
        }
    }
}

// splitmix64: small, seedable and stable across platforms, which keeps
// generated demo content reproducible for a given seed.
fn next_u64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn next_unit_f64(state: &mut u64) -> f64 {
    (next_u64(state) >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
#[path = "../../tests/unit/model/sketch.rs"]
mod tests;
