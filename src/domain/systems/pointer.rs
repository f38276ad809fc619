use crate::domain::landmarks::{HandLandmarks, INDEX_TIP};
use crate::domain::state::Pointer;

/// Projects the index fingertip onto the play area, mirrored horizontally so
/// the aim follows the player like a mirror. No smoothing.
pub fn project_aim(hand: &HandLandmarks, width: f32, height: f32) -> Pointer {
    let tip = hand[INDEX_TIP];
    Pointer {
        x: (1.0 - tip.x) * width,
        y: tip.y * height,
        visible: true,
    }
}
