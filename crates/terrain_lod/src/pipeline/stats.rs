//! Statistics from one generation pass.

use std::ops::Add;

/// Per-pass counters, summed over every phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerationStats {
	/// Root keys seeded.
	pub seeded: usize,
	/// Keys that divided.
	pub divided: usize,
	/// Children dropped for lying outside the terrain.
	pub culled: usize,
	/// Children dropped by the frustum test.
	pub frustum_culled: usize,
	/// Keys finalised during refine phases.
	pub terminal: usize,
	/// Keys finalised by the flush phase.
	pub flushed: usize,
	/// Finalised patches the output partition refused.
	pub rejected: usize,
	/// Work queue appends refused for lack of room.
	pub overflowed: usize,
	/// Largest number of keys queued for a single phase.
	pub peak_queue: usize,
	/// Wall time of the pass in microseconds.
	pub elapsed_us: u64,
}

impl GenerationStats {
	/// Patches handed to the stitching resolver.
	#[inline]
	pub fn finalized(&self) -> usize {
		self.terminal + self.flushed
	}

	/// Patches stored in the output partition.
	#[inline]
	pub fn emitted(&self) -> usize {
		self.finalized().saturating_sub(self.rejected)
	}

	/// Children dropped for any reason.
	#[inline]
	pub fn total_culled(&self) -> usize {
		self.culled + self.frustum_culled
	}

	/// Check if the pass lost no work to capacity or bucket errors.
	#[inline]
	pub fn is_lossless(&self) -> bool {
		self.rejected == 0 && self.overflowed == 0
	}

	pub(crate) fn absorb(&mut self, tally: PhaseTally) {
		self.divided += tally.divided;
		self.culled += tally.culled;
		self.frustum_culled += tally.frustum_culled;
		self.rejected += tally.rejected;
	}
}

/// Counters produced by one task and summed across a parallel phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PhaseTally {
	pub divided: usize,
	pub culled: usize,
	pub frustum_culled: usize,
	pub finalized: usize,
	pub rejected: usize,
}

impl Add for PhaseTally {
	type Output = Self;

	fn add(self, other: Self) -> Self {
		Self {
			divided: self.divided + other.divided,
			culled: self.culled + other.culled,
			frustum_culled: self.frustum_culled + other.frustum_culled,
			finalized: self.finalized + other.finalized,
			rejected: self.rejected + other.rejected,
		}
	}
}
