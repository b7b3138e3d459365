use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MalformedLogError {
    #[error("log document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("log document has no game_log array")]
    MissingRounds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Crewmates,
    Impostors,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Crewmate,
    Impostor,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Anything that is not explicitly an impostor renders in the crewmate
    /// palette, including players missing from `all_roles`.
    pub fn is_impostor(&self) -> bool {
        matches!(self, Role::Impostor)
    }
}

/// One recorded match, immutable once loaded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameLog {
    #[serde(rename = "game_log")]
    pub rounds: Vec<RoundSnapshot>,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub cause: Option<String>,
    #[serde(default)]
    pub all_roles: BTreeMap<String, Role>,
    #[serde(default)]
    pub meeting_history: Vec<Meeting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    /// Recorded round number. May be sparse; display falls back to the
    /// 1-based sequence position when absent.
    #[serde(default)]
    pub round: Option<u32>,
    #[serde(default)]
    pub state: RoundState,
    #[serde(default)]
    pub actions: BTreeMap<String, PlayerAction>,
    #[serde(default)]
    pub results: BTreeMap<String, ActionOutcome>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    #[serde(default)]
    pub player_locations: BTreeMap<String, String>,
    #[serde(default)]
    pub alive_players: BTreeSet<String>,
    #[serde(default)]
    pub bodies: Vec<Body>,
    #[serde(default)]
    pub sabotage: Option<Sabotage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub location: String,
    #[serde(default)]
    pub player: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sabotage {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub fix_progress: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerAction {
    #[serde(default = "default_action")]
    pub action: String,
    #[serde(default)]
    pub target: Option<String>,
}

fn default_action() -> String {
    "wait".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    #[serde(default)]
    pub round_called: u32,
    #[serde(default)]
    pub trigger: String,
    #[serde(default)]
    pub called_by: String,
    #[serde(default)]
    pub body_found: Option<String>,
    #[serde(default)]
    pub body_location: Option<String>,
    #[serde(default)]
    pub transcript: Vec<ChatMessage>,
    #[serde(default)]
    pub voted_out: Option<String>,
    #[serde(default)]
    pub role_revealed: Option<String>,
    #[serde(default)]
    pub vote_tally: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub speaker: String,
    #[serde(default)]
    pub rotation: u32,
    pub message: String,
}

impl GameLog {
    /// Parses a raw log document. The only required shape is a `game_log`
    /// array at the top level; every other field defaults to empty.
    pub fn parse(raw: &str) -> Result<Self, MalformedLogError> {
        let value: Value = serde_json::from_str(raw)?;
        match value.get("game_log") {
            Some(Value::Array(_)) => {}
            _ => return Err(MalformedLogError::MissingRounds),
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn total_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Caller is responsible for clamping `idx` to `[0, total_rounds)`.
    pub fn get_round(&self, idx: usize) -> &RoundSnapshot {
        &self.rounds[idx]
    }

    /// Recorded round number at sequence position `idx`, defaulting to the
    /// 1-based position when the log omits it.
    pub fn round_number(&self, idx: usize) -> u32 {
        self.rounds[idx].round.unwrap_or(idx as u32 + 1)
    }

    /// Round number of the final snapshot, used for display even when the
    /// recorded numbers are sparse.
    pub fn last_round_number(&self) -> u32 {
        match self.rounds.len() {
            0 => 0,
            n => self.round_number(n - 1),
        }
    }

    /// All meetings called on the given round number, in log order. Matches
    /// on `round_called` vs the recorded round number, never the sequence
    /// index. Autoplay only reacts to the first match; the transcript view
    /// shows all of them.
    pub fn meetings_for(&self, round_number: u32) -> impl Iterator<Item = &Meeting> {
        self.meeting_history
            .iter()
            .filter(move |m| m.round_called == round_number)
    }

    pub fn role_of(&self, player_id: &str) -> Role {
        self.all_roles
            .get(player_id)
            .copied()
            .unwrap_or(Role::Crewmate)
    }

    /// `cause` is stored as `_`-separated tokens; display form is
    /// space-separated and uppercased.
    pub fn cause_display(&self) -> Option<String> {
        self.cause
            .as_ref()
            .map(|c| c.replace('_', " ").to_uppercase())
    }
}

impl Meeting {
    /// "PLAYER_1 EJECTED (IMPOSTOR)" or "NO EJECTION".
    pub fn result_line(&self) -> String {
        match &self.voted_out {
            Some(player) => format!(
                "{} EJECTED ({})",
                player.to_uppercase(),
                self.role_revealed
                    .as_deref()
                    .unwrap_or("unknown")
                    .to_uppercase()
            ),
            None => "NO EJECTION".to_string(),
        }
    }

    /// Vote tally in deterministic display order: count descending, then
    /// target name ascending.
    pub fn sorted_tally(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self
            .vote_tally
            .iter()
            .map(|(target, count)| (target.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_orders_by_count_then_name() {
        let meeting = Meeting {
            vote_tally: BTreeMap::from([
                ("player_3".to_string(), 2),
                ("player_1".to_string(), 2),
                ("skip".to_string(), 1),
            ]),
            ..Meeting::default()
        };
        let tally = meeting.sorted_tally();
        assert_eq!(
            tally,
            vec![("player_1", 2), ("player_3", 2), ("skip", 1)]
        );
    }

    #[test]
    fn result_line_without_ejection() {
        assert_eq!(Meeting::default().result_line(), "NO EJECTION");
    }
}
