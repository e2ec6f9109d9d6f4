//! Field boundary rules
//!
//! The X axis is a wall: circles reflect off it, paddles stop against it.
//! The Y axis holds the two goal lines and is never enforced here; leaving
//! it is an escape that the stepper turns into a victory.

use super::state::{Blob, Entity, Player};
use crate::consts::{HEIGHT, WIDTH};

/// Circle strictly inside the field on X
#[inline]
pub fn blob_x_in_bounds(blob: &Blob) -> bool {
    blob.r < blob.pos.x && blob.pos.x < WIDTH - blob.r
}

/// Paddle rectangle strictly inside the field on X
#[inline]
pub fn paddle_x_in_bounds(paddle: &Player) -> bool {
    0.0 < paddle.blob.pos.x && paddle.blob.pos.x < WIDTH - paddle.rect_w
}

/// Circle strictly between the two goal lines
#[inline]
pub fn y_in_bounds(blob: &Blob) -> bool {
    blob.r < blob.pos.y && blob.pos.y < HEIGHT - blob.r
}

/// Circle strictly inside the field on both axes
#[inline]
pub fn in_bounds(blob: &Blob) -> bool {
    blob_x_in_bounds(blob) && y_in_bounds(blob)
}

pub fn x_in_bounds(entity: &Entity) -> bool {
    match entity {
        Entity::Blob(b) => blob_x_in_bounds(b),
        Entity::Player(p) => paddle_x_in_bounds(p),
    }
}

/// Clamp a circle to the nearest side wall and reflect its horizontal velocity
///
/// A circle at or past a wall only reflects while it is still heading out,
/// so one sitting exactly on the edge and already moving inward keeps going.
pub fn reposition_blob_x(blob: &mut Blob) {
    let max_x = WIDTH - blob.r;
    if blob.pos.x <= blob.r {
        blob.pos.x = blob.r;
        if blob.vel.x < 0.0 {
            blob.vel.x = -blob.vel.x;
        }
    } else if blob.pos.x >= max_x {
        blob.pos.x = max_x;
        if blob.vel.x > 0.0 {
            blob.vel.x = -blob.vel.x;
        }
    }
}

/// Clamp a paddle to the nearest side wall; paddles stop dead instead of bouncing
pub fn reposition_paddle_x(paddle: &mut Player) {
    let max_x = WIDTH - paddle.rect_w;
    if paddle.blob.pos.x <= 0.0 {
        paddle.blob.pos.x = 0.0;
        if paddle.blob.vel.x < 0.0 {
            paddle.blob.vel.x = 0.0;
        }
    } else if paddle.blob.pos.x >= max_x {
        paddle.blob.pos.x = max_x;
        if paddle.blob.vel.x > 0.0 {
            paddle.blob.vel.x = 0.0;
        }
    }
}

pub fn reposition_x(entity: &mut Entity) {
    match entity {
        Entity::Blob(b) => reposition_blob_x(b),
        Entity::Player(p) => reposition_paddle_x(p),
    }
}

/// Reposition `entity` on X only if it is out of bounds
pub fn enforce_x(entity: &mut Entity) {
    if !x_in_bounds(entity) {
        reposition_x(entity);
    }
}
