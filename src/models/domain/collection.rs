use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::activity::Activity;

/// The editing aggregate: an ordered list of activities a host can run a
/// session against.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Opaque owner reference; identity is managed by an external service.
    pub owner_id: String,
    pub activities: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl Collection {
    pub fn new(name: &str, description: Option<String>, owner_id: &str) -> Self {
        Collection {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            owner_id: owner_id.to_string(),
            activities: vec![],
            created_at: Some(Utc::now()),
            modified_at: Some(Utc::now()),
        }
    }

    pub fn activity(&self, activity_id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == activity_id)
    }

    pub fn activity_mut(&mut self, activity_id: &str) -> Option<&mut Activity> {
        self.activities.iter_mut().find(|a| a.id == activity_id)
    }

    /// Reassign activity order 0..n after inserts and removals.
    pub fn reindex_activities(&mut self) {
        for (position, activity) in self.activities.iter_mut().enumerate() {
            activity.order = position as i32;
        }
    }
}
