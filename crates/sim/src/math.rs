//! Small scalar helpers shared by the force falloffs and the rectangle SDF.

/// Linearly remap `v` from `[from_a, from_b]` to `[to_a, to_b]`, clamping
/// to the output range. A degenerate input span maps everything to `to_a`.
#[inline]
pub fn remap_clamped(v: f32, from_a: f32, from_b: f32, to_a: f32, to_b: f32) -> f32 {
    let span = from_b - from_a;
    if span.abs() <= f32::EPSILON {
        return to_a;
    }
    let t = ((v - from_a) / span).clamp(0.0, 1.0);
    to_a + t * (to_b - to_a)
}

/// Hermite smoothstep of `x` between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Sign of `v` with `sign(0) == 0`, unlike `f32::signum`.
#[inline]
pub fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn remap_handles_reversed_and_degenerate_spans() {
        assert_relative_eq!(remap_clamped(150.0, 0.0, 300.0, 0.0, 1.0), 0.5);
        assert_relative_eq!(remap_clamped(150.0, 300.0, 0.0, 1.0, 0.0), 0.5);
        // Clamped at both ends
        assert_relative_eq!(remap_clamped(400.0, 0.0, 300.0, 0.0, 1.0), 1.0);
        assert_relative_eq!(remap_clamped(-10.0, 0.0, 300.0, 0.0, 1.0), 0.0);
        // Degenerate span must not divide by zero
        assert_relative_eq!(remap_clamped(5.0, 0.0, 0.0, 1.0, 0.0), 1.0);
    }

    #[test]
    fn smoothstep_edges() {
        assert_relative_eq!(smoothstep(0.2, 1.0, 0.1), 0.0);
        assert_relative_eq!(smoothstep(0.2, 1.0, 1.5), 1.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn sign_is_zero_at_zero() {
        assert_eq!(sign(0.0), 0.0);
        assert_eq!(sign(-0.0), 0.0);
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-3.0), -1.0);
    }
}
