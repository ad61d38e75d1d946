use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::{Display, EnumIter};

/// Why a rating entry was appended to a history.
///
/// Only [`RatingSource::Race`] entries carry a date; every other source is a
/// synthetic adjustment applied outside of an event.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[repr(u8)]
pub enum RatingSource {
    Initial = 0,
    Race = 1,
    Reset = 2,
    Rerate = 3,
    Reentry = 4
}

impl RatingSource {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, RatingSource::Race)
    }
}

impl TryFrom<i32> for RatingSource {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(RatingSource::Initial),
            1 => Ok(RatingSource::Race),
            2 => Ok(RatingSource::Reset),
            3 => Ok(RatingSource::Rerate),
            4 => Ok(RatingSource::Reentry),
            _ => Err(())
        }
    }
}
