//! Path budgeting: how far along a polyline an energy pool reaches.

use pb_core::Position;

/// Outcome of budgeting one path against one energy value.
///
/// Recomputed every prediction cycle and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReachabilityResult {
    /// Reachable prefix of the input path.  The last point is either an
    /// input waypoint or a point interpolated inside the first unaffordable
    /// segment.  Empty only when the input path was empty.
    pub path: Vec<Position>,

    /// Energy left at the end of `path`.  Never negative.
    pub residual: f32,

    /// `true` if the whole input path was affordable.
    pub reached_full_path: bool,
}

impl ReachabilityResult {
    /// Where a committed move would end.
    pub fn destination(&self) -> Option<Position> {
        self.path.last().copied()
    }

    /// `true` if the path has at least one point beyond the start, i.e.
    /// committing it would actually send the agent somewhere.
    pub fn moves_agent(&self) -> bool {
        self.path.len() >= 2
    }

    /// Length of the truncated path.
    pub fn travelled(&self) -> f32 {
        path_length(&self.path)
    }
}

/// Sum of segment lengths of a polyline.
pub fn path_length(path: &[Position]) -> f32 {
    path.windows(2).map(|s| s[0].distance(s[1])).sum()
}

/// Truncate `waypoints` to the prefix affordable with `energy`.
///
/// Each segment costs its length.  A segment that fits exactly is taken in
/// full (inclusive boundary), so an exact match never produces a zero-length
/// interpolated tail.  The first segment that does not fit is cut at the
/// interpolated point where energy runs out and the residual is then zero.
///
/// Negative or NaN `energy` is treated as zero.  This is a pure function:
/// identical inputs give bit-identical results.
///
/// ```
/// use pb_core::Position;
/// use pb_energy::budget_path;
///
/// let p = |x, y| Position::new(x, y, 0.0);
/// let r = budget_path(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 4.0)], 4.0);
/// assert_eq!(r.path, vec![p(0.0, 0.0), p(3.0, 0.0), p(3.0, 1.0)]);
/// assert_eq!(r.residual, 0.0);
/// assert!(!r.reached_full_path);
/// ```
pub fn budget_path(waypoints: &[Position], energy: f32) -> ReachabilityResult {
    // f32::max returns the non-NaN operand.
    let energy = energy.max(0.0);

    let Some(&start) = waypoints.first() else {
        return ReachabilityResult { path: Vec::new(), residual: energy, reached_full_path: true };
    };

    let mut path = Vec::with_capacity(waypoints.len());
    path.push(start);
    let mut spent = 0.0_f32;
    let mut reached_full_path = true;

    for segment in waypoints.windows(2) {
        let (a, b) = (segment[0], segment[1]);
        let seg_len = a.distance(b);

        if spent + seg_len <= energy {
            path.push(b);
            spent += seg_len;
            continue;
        }

        let ratio = if seg_len > 0.0 { (energy - spent) / seg_len } else { 0.0 };
        path.push(a.lerp(b, ratio));
        spent = energy;
        reached_full_path = false;
        break;
    }

    ReachabilityResult {
        path,
        residual: (energy - spent).max(0.0),
        reached_full_path,
    }
}
