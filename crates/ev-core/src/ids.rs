//! Strongly typed, zero-cost identifier wrappers.
//!
//! Every identifier is the 0-based data-row ordinal of its record in the
//! source table (or, for `VertexId`, the row position in the sorted vertex
//! table).  Ordinals survive filtering: skipping row 3 does not renumber
//! row 4.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Data-row ordinal of a road in the road source (the `road num` column).
    pub struct RoadId(u32);
}

typed_id! {
    /// Data-row ordinal of a sample in the traffic-count table.
    /// Ties between equidistant sensors resolve to the lowest `SensorId`.
    pub struct SensorId(u32);
}

typed_id! {
    /// Data-row ordinal of a charging station in the station source.
    pub struct StationId(u32);
}

typed_id! {
    /// Row position in the lat-sorted flattened vertex table.
    pub struct VertexId(u32);
}
