use serde::{Deserialize, Serialize};

/// A ledger account: string key plus integer balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: String,
    pub money: i64,
}

impl Member {
    pub fn new(member_id: impl Into<String>, money: i64) -> Self {
        Self {
            member_id: member_id.into(),
            money,
        }
    }

    pub fn map_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            member_id: row.get("member_id")?,
            money: row.get("money")?,
        })
    }
}
