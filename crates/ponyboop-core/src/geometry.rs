use std::fmt;

/// Integer screen coordinates of a host window.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Largest per-axis displacement between two positions.
    ///
    /// This is `max(|Δx|, |Δy|)`, not the Euclidean distance: a diagonal move
    /// of (8, 8) has an axis delta of 8.
    pub fn axis_delta(self, other: Position) -> u64 {
        let dx = (i64::from(other.x) - i64::from(self.x)).unsigned_abs();
        let dy = (i64::from(other.y) - i64::from(self.y)).unsigned_abs();
        dx.max(dy)
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A window position captured at a monotonic timestamp.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MotionSample {
    pub position: Position,
    pub timestamp_ms: u64,
}

impl MotionSample {
    pub const fn new(position: Position, timestamp_ms: u64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}
