use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Join codes avoid ambiguous characters (0/O, 1/I).
const JOIN_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const JOIN_CODE_LENGTH: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    Lobby,
    InProgress,
    Finished,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Participant {
    pub id: String,
    pub nickname: String,
    pub joined_at: DateTime<Utc>,
}

impl Participant {
    pub fn new(nickname: &str) -> Self {
        Participant {
            id: Uuid::new_v4().to_string(),
            nickname: nickname.to_string(),
            joined_at: Utc::now(),
        }
    }
}

/// A live run of a collection. Participants join by code while the session
/// is in the lobby; the host then steps through the activities in order.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Session {
    pub id: String,
    pub collection_id: String,
    pub join_code: String,
    pub status: SessionStatus,
    /// Index into the collection's activity list; meaningful only while the
    /// session is in progress.
    pub current_activity_index: i32,
    pub participants: Vec<Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(collection_id: &str) -> Self {
        Session {
            id: Uuid::new_v4().to_string(),
            collection_id: collection_id.to_string(),
            join_code: generate_join_code(),
            status: SessionStatus::Lobby,
            current_activity_index: 0,
            participants: vec![],
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn participant(&self, participant_id: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == participant_id)
    }

    pub fn has_nickname(&self, nickname: &str) -> bool {
        self.participants
            .iter()
            .any(|p| p.nickname.eq_ignore_ascii_case(nickname))
    }
}

pub fn generate_join_code() -> String {
    let mut rng = rand::thread_rng();
    (0..JOIN_CODE_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
            JOIN_CODE_ALPHABET[idx] as char
        })
        .collect()
}
