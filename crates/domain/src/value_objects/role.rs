//! Who is asking: the user behind a manual action and their role.

use serde::{Deserialize, Serialize};

use crate::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Gm,
    Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requester {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Requester {
    pub fn gm(user_id: UserId) -> Self {
        Self {
            user_id,
            role: UserRole::Gm,
        }
    }

    pub fn player(user_id: UserId) -> Self {
        Self {
            user_id,
            role: UserRole::Player,
        }
    }

    pub fn is_gm(&self) -> bool {
        self.role == UserRole::Gm
    }
}
