use serde_repr::{Deserialize_repr, Serialize_repr};
use strum_macros::{Display, EnumIter};

/// The three sub-events of a race weekend that feed into ratings.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[repr(u8)]
pub enum SessionKind {
    Race = 0,
    Qualifying = 1,
    Sprint = 2
}
