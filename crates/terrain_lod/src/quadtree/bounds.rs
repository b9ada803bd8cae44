//! Axis-aligned rectangle on the terrain plane.

use glam::Vec2;

/// Axis-aligned rectangle in world XZ (stored as `Vec2 { x, y: z }`).
///
/// Used for the terrain footprint and for patch footprints during culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb2 {
	/// Minimum corner (inclusive).
	pub min: Vec2,
	/// Maximum corner (inclusive).
	pub max: Vec2,
}

impl Aabb2 {
	/// Create a new rectangle from min and max corners.
	///
	/// # Panics
	/// Debug-asserts that min <= max on both axes.
	pub fn new(min: Vec2, max: Vec2) -> Self {
		debug_assert!(
			min.x <= max.x && min.y <= max.y,
			"Aabb2 min must be <= max on both axes"
		);
		Self { min, max }
	}

	/// Create a rectangle from its minimum corner and edge lengths.
	pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
		Self::new(min, min + size)
	}

	/// Check if the two rectangles share interior area.
	///
	/// Rectangles that only touch along an edge or at a corner do not overlap.
	#[inline]
	pub fn overlaps(&self, other: &Aabb2) -> bool {
		self.min.x < other.max.x
			&& self.max.x > other.min.x
			&& self.min.y < other.max.y
			&& self.max.y > other.min.y
	}

	/// Check if this rectangle contains a point (boundary included).
	#[inline]
	pub fn contains_point(&self, point: Vec2) -> bool {
		point.x >= self.min.x
			&& point.x <= self.max.x
			&& point.y >= self.min.y
			&& point.y <= self.max.y
	}

	/// Get the size of the rectangle (max - min).
	#[inline]
	pub fn size(&self) -> Vec2 {
		self.max - self.min
	}

	/// Get the center of the rectangle.
	#[inline]
	pub fn center(&self) -> Vec2 {
		(self.min + self.max) * 0.5
	}
}
