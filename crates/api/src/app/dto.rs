use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Value, json};

use toplist_core::UserId;
use toplist_infra::{Pagination, RankFilter, RankQuery, RankSort, UserRecord};
use toplist_ranks::{Category, Comment, ListItemDraft, RankDraft};

use crate::app::services::RankView;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemRequest {
    pub item_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body for both create (POST) and full update (PUT) of a rank.
#[derive(Debug, Deserialize)]
pub struct RankRequest {
    pub category: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub list: Vec<ListItemRequest>,
}

impl RankRequest {
    /// Parse the category and shape the list; all other constraints are
    /// checked by the draft itself before persistence.
    pub fn into_draft(self) -> Result<RankDraft, toplist_core::DomainError> {
        let category: Category = self.category.parse()?;
        Ok(RankDraft {
            category,
            title: self.title,
            description: self.description,
            list: self
                .list
                .into_iter()
                .map(|item| ListItemDraft {
                    item_name: item.item_name,
                    image_url: item.image_url,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

/// Raw listing parameters; numbers arrive as strings so junk input can fall
/// back to defaults instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct ListRanksQuery {
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListRanksQuery {
    pub fn into_query(self) -> RankQuery {
        RankQuery {
            filter: RankFilter {
                search: self.search.filter(|s| !s.trim().is_empty()),
            },
            sort: RankSort::from_param(self.sort_by.as_deref()),
            page: Pagination::from_raw(self.page.as_deref(), self.limit.as_deref()),
        }
    }
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Single-rank view: comment authors resolved to display identity.
pub fn rank_detail_to_json(view: &RankView) -> Value {
    rank_to_json(view, true)
}

/// Listing view: author resolved, comment authors left as raw ids.
pub fn rank_summary_to_json(view: &RankView) -> Value {
    rank_to_json(view, false)
}

fn rank_to_json(view: &RankView, resolve_comment_authors: bool) -> Value {
    let rank = &view.rank;
    json!({
        "id": rank.id.to_string(),
        "category": rank.category.as_str(),
        "title": rank.title,
        "description": rank.description,
        "author": author_to_json(rank.author, &view.usernames),
        "list": rank.list.iter().map(|item| json!({
            "itemName": item.item_name,
            "imageUrl": item.image_url,
            "votes": item.votes.iter().map(|u| u.to_string()).collect::<Vec<_>>(),
            "score": item.score,
        })).collect::<Vec<_>>(),
        "upvotes": rank.upvotes.iter().map(|u| u.to_string()).collect::<Vec<_>>(),
        "downvotes": rank.downvotes.iter().map(|u| u.to_string()).collect::<Vec<_>>(),
        "score": rank.score(),
        "comments": rank.comments.iter().map(|c| {
            comment_to_json(c, &view.usernames, resolve_comment_authors)
        }).collect::<Vec<_>>(),
        "createdAt": rank.created_at.to_rfc3339(),
        "updatedAt": rank.updated_at.to_rfc3339(),
    })
}

fn comment_to_json(
    comment: &Comment,
    usernames: &HashMap<UserId, String>,
    resolve_author: bool,
) -> Value {
    let author = if resolve_author {
        author_to_json(comment.author, usernames)
    } else {
        json!(comment.author.to_string())
    };

    json!({
        "id": comment.id.to_string(),
        "text": comment.text,
        "author": author,
        "createdAt": comment.created_at.to_rfc3339(),
        "updatedAt": comment.updated_at.to_rfc3339(),
    })
}

fn author_to_json(id: UserId, usernames: &HashMap<UserId, String>) -> Value {
    json!({
        "id": id.to_string(),
        "username": usernames.get(&id),
    })
}

pub fn user_to_json(user: &UserRecord) -> Value {
    json!({
        "id": user.id.to_string(),
        "username": user.username,
    })
}
