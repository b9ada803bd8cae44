//! Per-camera cull data: viewer position and frustum planes.

use glam::{Mat4, Vec3, Vec4};

/// Plane that accepts every point (`0·p + 1 > 0`).
const ACCEPT_ALL: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// Per-camera frustum planes and view transform.
///
/// Planes are stored as `(normal, d)` with unit normals pointing into the
/// frustum; a point `p` is inside a plane when `normal · p + d >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CullData {
  /// Viewer position, used by the divide predicate.
  pub world_position: Vec3,
  pub view_proj: Mat4,
  /// Left, right, bottom, top, near, far.
  pub frustum_planes: [Vec4; 6],
}

impl CullData {
  /// Viewer at `world_position` with a frustum that accepts everything.
  pub fn at_position(world_position: Vec3) -> Self {
    Self {
      world_position,
      view_proj: Mat4::IDENTITY,
      frustum_planes: [ACCEPT_ALL; 6],
    }
  }

  /// Extract normalised planes from a view-projection matrix with
  /// `[0, 1]` clip depth (Gribb-Hartmann).
  pub fn from_view_proj(world_position: Vec3, view_proj: Mat4) -> Self {
    let r0 = view_proj.row(0);
    let r1 = view_proj.row(1);
    let r2 = view_proj.row(2);
    let r3 = view_proj.row(3);

    let raw = [
      r3 + r0, // left
      r3 - r0, // right
      r3 + r1, // bottom
      r3 - r1, // top
      r2,      // near (z >= 0)
      r3 - r2, // far (z <= w)
    ];

    Self {
      world_position,
      view_proj,
      frustum_planes: raw.map(normalize_plane),
    }
  }

  /// Check if an axis-aligned box is at least partially inside the frustum.
  pub fn intersects_aabb(&self, min: Vec3, max: Vec3) -> bool {
    let center = (min + max) * 0.5;
    let extents = (max - min) * 0.5;

    self.frustum_planes.iter().all(|plane| {
      let normal = plane.truncate();
      let radius = extents.dot(normal.abs());
      normal.dot(center) + plane.w + radius >= 0.0
    })
  }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
  let length = plane.truncate().length();
  if length > 0.0 {
    plane / length
  } else {
    ACCEPT_ALL
  }
}

impl Default for CullData {
  fn default() -> Self {
    Self::at_position(Vec3::ZERO)
  }
}
