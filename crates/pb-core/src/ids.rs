//! Index newtypes.
//!
//! Pilots, waypoints and graph edges all live in dense `Vec`s, so each ID is
//! a `u32` position in its owning vector.  The newtypes keep a `NodeId` from
//! being used to index the pilot list.

use std::fmt;

macro_rules! index_newtype {
    ($(#[$attr:meta])* $name:ident, $tag:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Position in the owning vector.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// The ID at vector position `i`, or `None` past `u32::MAX`.
            #[inline]
            pub fn from_index(i: usize) -> Option<Self> {
                u32::try_from(i).ok().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

index_newtype! {
    /// A pilot's slot in the world's pilot list.
    AgentId, "agent"
}

index_newtype! {
    /// A waypoint in a navigation graph.
    NodeId, "node"
}

index_newtype! {
    /// A directed link between two waypoints.
    EdgeId, "edge"
}
