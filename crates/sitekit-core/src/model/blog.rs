// ── Blog posts ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{known_status, known_status_opt};
use super::{
    ADMIN_PAGE_SIZE, DEFAULT_CATEGORY_SENTINEL, DEFAULT_STATUS_SENTINEL, PublishStatus, Resource,
    ResourceKind,
};

/// A blog post as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub status: PublishStatus,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub read_time: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for BlogPost {
    const KIND: ResourceKind = ResourceKind {
        path: "blogs",
        list_key: "blogs",
        entity_key: "blog",
        singular: "blog",
        plural: "blogs",
        status_sentinel: DEFAULT_STATUS_SENTINEL,
        category_sentinel: DEFAULT_CATEGORY_SENTINEL,
        feed_page_size: 9,
        admin_page_size: ADMIN_PAGE_SIZE,
        view_path: Some("view"),
    };

    fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, with = "known_status")]
    pub status: PublishStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBlogRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        default,
        with = "known_status_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<PublishStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mongo_style_document() {
        let post: BlogPost = serde_json::from_value(json!({
            "_id": "65f0c0ffee",
            "title": "Shipping faster",
            "slug": "shipping-faster",
            "status": "published",
            "coverImage": "/img/cover.png",
            "views": 41,
            "createdAt": "2024-03-01T12:00:00Z"
        }))
        .unwrap();

        assert_eq!(post.id(), "65f0c0ffee");
        assert_eq!(post.status, PublishStatus::Published);
        assert_eq!(post.cover_image.as_deref(), Some("/img/cover.png"));
        assert_eq!(post.views, 41);
        assert!(post.created_at.is_some());
        assert!(post.tags.is_empty());
    }

    #[test]
    fn accepts_plain_id_field() {
        let post: BlogPost = serde_json::from_value(json!({ "id": "b1", "title": "T" })).unwrap();
        assert_eq!(post.id, "b1");
    }

    #[test]
    fn update_request_omits_unset_fields() {
        let update = UpdateBlogRequest {
            status: Some(PublishStatus::Archived),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "status": "archived" })
        );
    }

    #[test]
    fn update_request_refuses_status_it_cannot_send_back() {
        let decoded = serde_json::from_str::<UpdateBlogRequest>(r#"{"status":"scheduled"}"#);
        assert!(decoded.is_err());

        let post: BlogPost =
            serde_json::from_value(json!({ "_id": "b1", "title": "T", "status": "scheduled" })).unwrap();
        assert_eq!(post.status, PublishStatus::Unknown);
    }
}
