use crate::common::config::GapSettings;
use crate::sys::geometry::Rect;

/// The workspace rect: the monitor's visible frame inset by the outer gaps.
pub fn compute_tiling_area(screen: Rect, gaps: &GapSettings) -> Rect {
    if gaps.outer.top == 0.0
        && gaps.outer.left == 0.0
        && gaps.outer.bottom == 0.0
        && gaps.outer.right == 0.0
    {
        screen
    } else {
        Rect::from_parts(
            screen.origin.x + gaps.outer.left,
            screen.origin.y + gaps.outer.top,
            (screen.size.width - gaps.outer.left - gaps.outer.right).max(0.0),
            (screen.size.height - gaps.outer.top - gaps.outer.bottom).max(0.0),
        )
        .round()
    }
}
