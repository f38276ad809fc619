// Balloon-mode simulation entities.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalloonKind {
    /// Popping it scores a point.
    Beneficial,
    /// Popping it costs a point.
    Harmful,
}

impl BalloonKind {
    pub fn score_delta(self) -> i32 {
        match self {
            BalloonKind::Beneficial => 1,
            BalloonKind::Harmful => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Balloon {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vx: f32, // px/s
    pub vy: f32, // px/s, negative is up
    pub kind: BalloonKind,
    pub alive: bool,
}

/// Aim point in play-area pixels. Only meaningful while `visible`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
    pub visible: bool,
}

impl Pointer {
    pub fn hidden_at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visible: false,
        }
    }
}
