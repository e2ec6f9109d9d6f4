//! Collision detection and response
//!
//! Only blob-vs-paddle contacts are resolved during a step. The paddle is an
//! axis-aligned rectangle anchored at its top-left corner; blobs are circles
//! tested by their bounding box against it.

use super::events::DeadEvent;
use super::state::{Blob, Entity, Player};
use crate::consts::{ABSORBED_DEATH_RADIUS, PADDLE_HEIGHT, PADDLE_WIDTH, TRANSFER_RATE};

/// Check whether a ball has entered a paddle's rectangle
///
/// Either the ball's left or right edge must lie strictly within the
/// paddle's horizontal span, and the ball's vertical extent must overlap
/// the paddle band `[y, y + PADDLE_HEIGHT]`.
pub fn ball_paddle_collision(ball: &Blob, paddle: &Player) -> bool {
    let ball_left = ball.pos.x - ball.r;
    let ball_right = ball.pos.x + ball.r;
    let ball_top = ball.pos.y - ball.r;
    let ball_bottom = ball.pos.y + ball.r;

    let pad_left = paddle.blob.pos.x;
    let pad_right = pad_left + PADDLE_WIDTH;
    let pad_top = paddle.blob.pos.y;
    let pad_bottom = pad_top + PADDLE_HEIGHT;

    let left_edge_over = ball_left < pad_right && ball_left > pad_left;
    let right_edge_over = ball_right > pad_left && ball_right < pad_right;

    if paddle.guards_bottom() {
        // Ball arrives from above: its top edge is tested against the band first
        (left_edge_over && ball_top < pad_bottom && ball_bottom > pad_top)
            || (right_edge_over && ball_top < pad_bottom && ball_bottom > pad_top)
    } else {
        // Ball arrives from below: its bottom edge is tested first
        (left_edge_over && ball_bottom > pad_top && ball_top < pad_bottom)
            || (right_edge_over && ball_bottom > pad_top && ball_top < pad_bottom)
    }
}

/// Bounce a ball off a paddle
///
/// The ball is moved just outside the band on the field side so it cannot
/// trigger again on the next step.
pub fn bounce(ball: &mut Blob, paddle: &Player) {
    ball.vel.y = -ball.vel.y;

    if paddle.guards_top() {
        ball.pos.y = paddle.blob.pos.y + PADDLE_HEIGHT + ball.r;
    } else {
        ball.pos.y = paddle.blob.pos.y - ball.r;
    }
}

/// Move area from the smaller of two overlapping bodies to the larger
///
/// A fixed fraction of the overlap depth changes hands. If the smaller body
/// drops to `ABSORBED_DEATH_RADIUS` or below it is marked dead and the
/// corresponding event is returned. Dead bodies are left alone.
pub fn transfer_areas(o: &mut Entity, p: &mut Entity) -> Option<DeadEvent> {
    if o.is_dead() || p.is_dead() {
        return None;
    }

    let (big, small) = if o.blob().r < p.blob().r { (p, o) } else { (o, p) };
    let diff = big.blob().overlap(small.blob()) * TRANSFER_RATE;
    small.blob_mut().transfer_area(-diff);
    big.blob_mut().transfer_area(diff);

    if small.blob().r <= ABSORBED_DEATH_RADIUS {
        small.blob_mut().dead = true;
        return Some(DeadEvent {
            id: small.id(),
            kind: small.kind(),
        });
    }
    None
}
