//! crates/tally_core/src/entities.rs
//! Read-only domain entities. The engine never mutates these; it receives a
//! consistent snapshot of them from an `ElectionSource`.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::{CandidateId, DistrictId, ListId, StationId, TallyId};

/// Seats elected for the senate in every district, split 2 + 1.
pub const FIXED_SENATE_SEATS: u32 = 3;

/// Upper bound on a district's deputy seats.
pub const MAX_DEPUTY_SEATS: u32 = 1_000;

/// The two legislative bodies being elected.
///
/// Deputies are apportioned with D'Hont over the district's configured seat
/// count; senators always use the fixed 2-1 split.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Office {
    Deputies,
    Senators,
}

impl Office {
    pub const ALL: [Office; 2] = [Office::Deputies, Office::Senators];

    pub fn as_str(self) -> &'static str {
        match self {
            Office::Deputies => "deputies",
            Office::Senators => "senators",
        }
    }
}

impl fmt::Display for Office {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Office {
    type Err = CoreError;

    /// Accepts `deputies` / `senators` and the legacy `DIPUTADOS` / `SENADORES`
    /// tokens, trimmed and case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "deputies" | "diputados" => Ok(Office::Deputies),
            "senators" | "senadores" => Ok(Office::Senators),
            _ => Err(CoreError::InvalidOffice(s.to_owned())),
        }
    }
}

fn default_senator_seats() -> u32 {
    FIXED_SENATE_SEATS
}

/// Electoral district with its seat configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    pub id: DistrictId,
    pub name: String,
    /// `None` when the district does not elect deputies this cycle.
    #[serde(default)]
    pub deputy_seats: Option<u32>,
    /// Stored for reporting; allocation always uses `FIXED_SENATE_SEATS`.
    #[serde(default = "default_senator_seats")]
    pub senator_seats: u32,
}

impl District {
    /// Seats to distribute for `office`, or `None` if the office is not
    /// elected here. A configured count of zero counts as undefined.
    pub fn seats_for(&self, office: Office) -> Option<u32> {
        match office {
            Office::Deputies => self.deputy_seats.filter(|&n| n >= 1),
            Office::Senators => Some(FIXED_SENATE_SEATS),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingStation {
    pub id: StationId,
    pub district_id: DistrictId,
    #[serde(default)]
    pub circuit: String,
    #[serde(default)]
    pub establishment: String,
    /// Registered electors.
    pub electors: u64,
}

/// A party or alliance slate for exactly one office in one district.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub alliance: Option<String>,
    pub office: Office,
    pub district_id: DistrictId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    /// Position on the list, 1-based.
    pub rank: u32,
    pub list_id: ListId,
}

/// Vote counts reported by one polling station for one list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingStationTally {
    pub id: TallyId,
    pub station_id: StationId,
    pub list_id: ListId,
    #[serde(default)]
    pub deputy_votes: u64,
    #[serde(default)]
    pub senator_votes: u64,
    #[serde(default)]
    pub blank_votes: u64,
    #[serde(default)]
    pub null_votes: u64,
    #[serde(default)]
    pub contested_votes: u64,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl PollingStationTally {
    /// The vote field that counts for `office`.
    #[inline]
    pub fn votes_for(&self, office: Office) -> u64 {
        match office {
            Office::Deputies => self.deputy_votes,
            Office::Senators => self.senator_votes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn office_parsing_is_closed() {
        assert_eq!("deputies".parse::<Office>().unwrap(), Office::Deputies);
        assert_eq!("  SENADORES ".parse::<Office>().unwrap(), Office::Senators);
        assert_eq!("Diputados".parse::<Office>().unwrap(), Office::Deputies);
        assert!(matches!("mayor".parse::<Office>(), Err(CoreError::InvalidOffice(_))));
        assert!("".parse::<Office>().is_err());
    }

    #[test]
    fn seats_for_office() {
        let mut d = District {
            id: DistrictId(1),
            name: "North".into(),
            deputy_seats: Some(5),
            senator_seats: 3,
        };
        assert_eq!(d.seats_for(Office::Deputies), Some(5));
        assert_eq!(d.seats_for(Office::Senators), Some(FIXED_SENATE_SEATS));

        d.deputy_seats = None;
        assert_eq!(d.seats_for(Office::Deputies), None);
        d.deputy_seats = Some(0);
        assert_eq!(d.seats_for(Office::Deputies), None);
        // Senate stays defined regardless of the stored count.
        d.senator_seats = 0;
        assert_eq!(d.seats_for(Office::Senators), Some(3));
    }

    #[test]
    fn tally_deserializes_with_defaults() {
        let t: PollingStationTally = serde_json::from_str(
            r#"{"id":1,"station_id":2,"list_id":3,"deputy_votes":10,"blank_votes":2,"null_votes":1}"#,
        )
        .unwrap();
        assert_eq!(t.votes_for(Office::Deputies), 10);
        assert_eq!(t.votes_for(Office::Senators), 0);
        assert_eq!((t.blank_votes, t.null_votes, t.contested_votes), (2, 1, 0));
        assert!(t.submitted_at.is_none());
    }
}
