//! crates/tally_core/src/ids.rs
//! Numeric identifiers for the entities the engine reads. The administrative
//! side assigns them; the engine only compares, orders and echoes them.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

macro_rules! numeric_id_newtype {
    ($(#[$m:meta])* $name:ident) => {
        $(#[$m])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            #[inline] pub const fn new(v: u64) -> Self { Self(v) }
            #[inline] pub const fn get(self) -> u64 { self.0 }
        }

        impl fmt::Display for $name {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
        }

        impl From<u64> for $name {
            #[inline]
            fn from(v: u64) -> Self { Self(v) }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|_| CoreError::InvalidId(s.to_owned()))
            }
        }
    }
}

numeric_id_newtype!(
    /// Electoral district (province).
    DistrictId
);
numeric_id_newtype!(
    /// Party list contesting one office in one district.
    ListId
);
numeric_id_newtype!(
    /// Candidate on a list.
    CandidateId
);
numeric_id_newtype!(
    /// Polling station (mesa).
    StationId
);
numeric_id_newtype!(
    /// One station/list tally submission.
    TallyId
);
