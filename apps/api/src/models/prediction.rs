use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of roles returned for every classified résumé.
pub const TOP_K: usize = 3;

/// One ranked role label with its decision score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRole {
    pub role: String,
    pub score: f64,
}

/// Exactly `TOP_K` roles, highest decision score first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRoles(pub [RankedRole; TOP_K]);

impl RankedRoles {
    pub fn roles(&self) -> &[RankedRole] {
        &self.0
    }

    pub fn labels(&self) -> Vec<&str> {
        self.roles().iter().map(|r| r.role.as_str()).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoleMatch {
    pub rank: usize,
    pub role: String,
    pub score: f64,
}

/// Response body for `POST /api/v1/predict`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub request_id: Uuid,
    pub filename: String,
    pub top_roles: Vec<RoleMatch>,
    pub analyzed_at: DateTime<Utc>,
}

impl PredictionResponse {
    pub fn new(request_id: Uuid, filename: String, ranked: RankedRoles) -> Self {
        let top_roles = ranked
            .0
            .into_iter()
            .enumerate()
            .map(|(i, r)| RoleMatch {
                rank: i + 1,
                role: r.role,
                score: r.score,
            })
            .collect();

        Self {
            request_id,
            filename,
            top_roles,
            analyzed_at: Utc::now(),
        }
    }
}
