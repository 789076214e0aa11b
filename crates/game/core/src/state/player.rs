use super::PlayerNumber;

/// Seat description shared by every instance of a session.
///
/// Who controls the seat (a human at this instance, the AI, or a remote peer)
/// is decided per instance by the runtime, not by the world.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSpec {
    pub number: PlayerNumber,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
}

impl PlayerSpec {
    pub fn new(number: PlayerNumber) -> Self {
        Self {
            number,
            name: format!("Player {}", number.0),
        }
    }
}
