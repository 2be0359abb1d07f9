//! Math types.
//!
//! CPU-side math uses [`glam`] (SIMD where available). GPU-facing structs are
//! plain `#[repr(C)]` arrays cast with `bytemuck`, so nothing here needs a
//! packed variant.
//!
//! ```
//! use tessera_core::math::{Vec2, Mat4};
//!
//! let position = Vec2::new(10.0, 20.0);
//! let moved = position + Vec2::new(1.0, 0.5) * 0.016;
//! let projection = Mat4::orthographic_rh(0.0, 1280.0, 0.0, 672.0, 0.0, 100.0);
//! assert!(moved.x > position.x);
//! assert_eq!(projection.w_axis.w, 1.0);
//! ```

/// Full re-export of [`glam`].
pub mod fast {
    pub use glam::*;
}

pub use fast::{Mat4, Vec2, Vec3, Vec4};

/// Component-wise approximate equality for 2D vectors.
#[inline]
pub fn approx_eq2(a: Vec2, b: Vec2, epsilon: f32) -> bool {
    a.abs_diff_eq(b, epsilon)
}
