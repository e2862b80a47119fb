//! Platform collision
//!
//! Platforms are one-way: only a falling player landing on a top surface
//! is resolved. There is no side or ceiling response.

use super::state::{Body, Platform, Player};

/// Whether `body` is landing on `platform` this tick
///
/// Requires horizontal overlap, a bottom edge inside the tolerance band just
/// below the surface, and non-negative vertical velocity.
pub fn is_landing(body: &Body, platform: &Platform, tolerance: f32) -> bool {
    let bottom = body.bottom();
    body.pos.x < platform.right()
        && body.right() > platform.pos.x
        && bottom > platform.top()
        && bottom < platform.top() + tolerance
        && body.vel.y >= 0.0
}

/// Snap the player onto the first platform it is landing on
///
/// Landing restores the full jump budget and cancels any flip. Returns
/// true when a landing happened.
pub fn resolve_landing(player: &mut Player, platforms: &[Platform], tolerance: f32) -> bool {
    let Some(platform) = platforms
        .iter()
        .find(|p| is_landing(&player.body, p, tolerance))
    else {
        return false;
    };

    player.body.pos.y = platform.top() - player.body.size.y;
    player.body.vel.y = 0.0;
    player.airborne = false;
    player.flip.active = false;
    player.flip.angle = 0.0;
    player.jump.taps = 0;
    player.jump.jumps = 0;
    true
}

/// Platform whose span fully contains the body's horizontal extent
pub fn platform_under<'a>(body: &Body, platforms: &'a [Platform]) -> Option<&'a Platform> {
    let left = body.pos.x;
    let right = body.right();
    // Sorted by x: only platforms starting at or before `left` can contain the span
    let end = platforms.partition_point(|p| p.pos.x <= left);
    platforms[..end]
        .iter()
        .rev()
        .find(|p| p.contains_span(left, right))
}
