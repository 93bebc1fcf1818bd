use serde::{Deserialize, Deserializer};
use time::OffsetDateTime;

pub type UserId = i64;
pub type NoteId = i64;
pub type PlanId = i64;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Only the admin endpoints report this flag, everywhere else it is missing.
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    pub owner_id: UserId,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
    #[serde(with = "timestamp")]
    pub updated_at: OffsetDateTime,
    /// Populated by the endpoints that eager load plans. Absent otherwise.
    #[serde(default)]
    pub plans: Vec<Plan>,
}

impl Note {
    pub fn open_plans(&self) -> usize {
        self.plans.iter().filter(|x| !x.is_done).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub title: String,
    pub is_done: bool,
    pub note_id: NoteId,
    #[serde(with = "timestamp")]
    pub created_at: OffsetDateTime,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The backend writes naive date-times (no offset) which we take as UTC. Anything carrying an
/// offset is parsed as RFC 3339. We always write RFC 3339 back.
pub mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::{Iso8601, Rfc3339};
    use time::{OffsetDateTime, PrimitiveDateTime};

    pub fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(value, &Rfc3339).or_else(|_| {
            PrimitiveDateTime::parse(value, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
    }

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        let value = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let value = String::deserialize(deserializer)?;
        parse(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    #[test]
    fn note_reads_backend_payload() {
        let note: Note = serde_json::from_value(json!({
            "id": 7,
            "title": "Groceries",
            "content": null,
            "owner_id": 3,
            "created_at": "2024-05-01T10:00:00.123456",
            "updated_at": "2024-05-01T11:30:00Z",
        }))
        .unwrap();

        assert_eq!(note.content, "");
        assert!(note.plans.is_empty());
        assert_eq!(note.updated_at, datetime!(2024-05-01 11:30:00 UTC));
        assert_eq!(note.created_at.date(), datetime!(2024-05-01 0:00 UTC).date());
    }

    #[test]
    fn user_without_admin_flag() {
        let user: User = serde_json::from_value(json!({"id": 1, "username": "alice"})).unwrap();
        assert!(!user.is_admin);
    }

    #[test]
    fn open_plans_counts_unfinished() {
        let plan = |id, is_done| Plan {
            id,
            title: format!("plan {id}"),
            is_done,
            note_id: 1,
            created_at: datetime!(2024-05-01 10:00 UTC),
        };
        let note = Note {
            id: 1,
            title: "day".into(),
            content: String::new(),
            owner_id: 1,
            created_at: datetime!(2024-05-01 10:00 UTC),
            updated_at: datetime!(2024-05-01 10:00 UTC),
            plans: vec![plan(1, true), plan(2, false), plan(3, false)],
        };
        assert_eq!(note.open_plans(), 2);
    }
}
