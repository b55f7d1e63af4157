use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the relational `blogs` table (and of the view derived from it).
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct SqlBlog {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A document of the MongoDB `blogs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MongoBlog {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub content: String,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Seed input shared by both stores.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBlog {
    pub id: i64,
    pub title: String,
    pub content: String,
}

impl NewBlog {
    /// Documents get a fresh ObjectId; the numeric id only exists on the relational side.
    pub fn into_mongo(self, now: DateTime<Utc>) -> MongoBlog {
        MongoBlog {
            id: ObjectId::new(),
            title: self.title,
            content: self.content,
            created_at: now,
            updated_at: now,
        }
    }
}
