//! The shared identifier space.
//!
//! Object IDs, snapshot IDs, and frame IDs are drawn from one integer
//! counter inside a `Memory`, but they are distinct *kinds* of identifier —
//! an `ObjectId` should never be compared against a `SnapshotId` by
//! accident. These newtypes live here, alongside `Variant`, because every
//! other component depends on this crate and needs them.

use std::fmt;

macro_rules! id_type {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(u64);

        impl $name {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> u64 {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(ObjectId, "Identifies one object across all of its snapshots.");
id_type!(SnapshotId, "Identifies one immutable version of one object.");
id_type!(FrameId, "Identifies one frame (mutable or stable).");

#[cfg(feature = "serde")]
mod serde_support {
    use super::{FrameId, ObjectId, SnapshotId};
    use serde::{Deserialize, Serialize};

    macro_rules! impl_serde {
        ($name:ident) => {
            impl Serialize for $name {
                fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                    self.get().serialize(s)
                }
            }

            impl<'de> Deserialize<'de> for $name {
                fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                    u64::deserialize(d).map($name::new)
                }
            }
        };
    }

    impl_serde!(ObjectId);
    impl_serde!(SnapshotId);
    impl_serde!(FrameId);
}
