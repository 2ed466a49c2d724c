use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use toplist_core::{CommentId, DomainError, RankId, UserId};

/// Bounds on a rank's ordered list.
pub const MIN_LIST_ITEMS: usize = 1;
pub const MAX_LIST_ITEMS: usize = 20;

/// Fixed category a rank is published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Games,
    Movies,
    Television,
    Music,
    Books,
    Food,
    Sports,
    Travel,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Games,
        Category::Movies,
        Category::Television,
        Category::Music,
        Category::Books,
        Category::Food,
        Category::Sports,
        Category::Travel,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Movies => "Movies",
            Category::Television => "Television",
            Category::Music => "Music",
            Category::Books => "Books",
            Category::Food => "Food",
            Category::Sports => "Sports",
            Category::Travel => "Travel",
            Category::Other => "Other",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "games" => Ok(Category::Games),
            "movies" => Ok(Category::Movies),
            "television" => Ok(Category::Television),
            "music" => Ok(Category::Music),
            "books" => Ok(Category::Books),
            "food" => Ok(Category::Food),
            "sports" => Ok(Category::Sports),
            "travel" => Ok(Category::Travel),
            "other" => Ok(Category::Other),
            _ => Err(DomainError::validation(format!(
                "category must be one of: Games, Movies, Television, Music, Books, Food, Sports, Travel, Other (got '{s}')"
            ))),
        }
    }
}

/// One entry of a rank's ordered list. Position is significant and
/// caller-supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub item_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Reserved: no operation mutates per-item votes; kept for forward
    /// compatibility with item-level voting.
    #[serde(default)]
    pub votes: Vec<UserId>,

    /// Reserved alongside `votes`.
    #[serde(default)]
    pub score: i64,
}

/// A comment embedded in a rank, ordered by insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    /// Immutable after creation; grants exclusive edit/delete rights.
    pub author: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied list entry for creation/update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItemDraft {
    pub item_name: String,
    pub image_url: Option<String>,
}

/// Validated input for creating or fully replacing a rank's editable fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankDraft {
    pub category: Category,
    pub title: String,
    pub description: String,
    pub list: Vec<ListItemDraft>,
}

impl RankDraft {
    /// Schema-level validation, run before any persistence attempt.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description cannot be empty"));
        }
        if self.list.len() < MIN_LIST_ITEMS || self.list.len() > MAX_LIST_ITEMS {
            return Err(DomainError::validation(format!(
                "list must contain between {MIN_LIST_ITEMS} and {MAX_LIST_ITEMS} items (got {})",
                self.list.len()
            )));
        }
        if self.list.iter().any(|item| item.item_name.trim().is_empty()) {
            return Err(DomainError::validation("list item name cannot be empty"));
        }
        Ok(())
    }
}

/// Root aggregate: a user-authored, titled ordered list carrying votes and
/// comments. Persisted as one self-contained document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub id: RankId,
    pub category: Category,
    pub title: String,
    pub description: String,
    /// Immutable after creation; grants exclusive update/delete rights on
    /// the rank root.
    pub author: UserId,
    pub list: Vec<ListItem>,
    pub upvotes: Vec<UserId>,
    pub downvotes: Vec<UserId>,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rank {
    /// Create a rank from a validated draft.
    pub fn create(
        id: RankId,
        author: UserId,
        draft: RankDraft,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        draft.validate()?;

        Ok(Self {
            id,
            category: draft.category,
            title: draft.title,
            description: draft.description,
            author,
            list: draft.list.into_iter().map(ListItem::from).collect(),
            upvotes: Vec::new(),
            downvotes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Derived popularity metric. Never persisted; recomputed at read time.
    pub fn score(&self) -> i64 {
        self.upvotes.len() as i64 - self.downvotes.len() as i64
    }

    pub fn has_upvoted(&self, user: UserId) -> bool {
        self.upvotes.contains(&user)
    }

    pub fn has_downvoted(&self, user: UserId) -> bool {
        self.downvotes.contains(&user)
    }

    /// Ownership check for update/delete of the rank root.
    ///
    /// Existence is the caller's concern; a missing rank must report
    /// NotFound before this runs.
    pub fn ensure_author(&self, actor: UserId) -> Result<(), DomainError> {
        if self.author != actor {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    /// Replace the editable fields (category/title/description/list).
    /// Author-only; votes and comments are untouched.
    pub fn edit(
        &mut self,
        actor: UserId,
        draft: RankDraft,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.ensure_author(actor)?;
        draft.validate()?;

        self.category = draft.category;
        self.title = draft.title;
        self.description = draft.description;
        self.list = draft.list.into_iter().map(ListItem::from).collect();
        self.updated_at = now;
        Ok(())
    }

    /// Toggle the caller's upvote.
    ///
    /// A user never holds both votes: the opposing vote is cleared
    /// unconditionally before the toggle. Applying the same toggle twice
    /// restores the caller's prior vote state.
    pub fn toggle_upvote(&mut self, user: UserId) {
        self.downvotes.retain(|u| *u != user);
        if let Some(pos) = self.upvotes.iter().position(|u| *u == user) {
            self.upvotes.remove(pos);
        } else {
            self.upvotes.push(user);
        }
    }

    /// Toggle the caller's downvote. Symmetric to [`Rank::toggle_upvote`].
    pub fn toggle_downvote(&mut self, user: UserId) {
        self.upvotes.retain(|u| *u != user);
        if let Some(pos) = self.downvotes.iter().position(|u| *u == user) {
            self.downvotes.remove(pos);
        } else {
            self.downvotes.push(user);
        }
    }

    /// Append a comment authored by `author`. Returns the comment's id.
    pub fn add_comment(
        &mut self,
        id: CommentId,
        author: UserId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<CommentId, DomainError> {
        let text = text.into();
        validate_comment_text(&text)?;

        self.comments.push(Comment {
            id,
            text,
            author,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    /// Replace a comment's text. Comment-author-only; id and author are
    /// immutable.
    pub fn edit_comment(
        &mut self,
        comment_id: CommentId,
        actor: UserId,
        text: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let text = text.into();
        let comment = self
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or(DomainError::NotFound)?;
        if comment.author != actor {
            return Err(DomainError::Forbidden);
        }
        validate_comment_text(&text)?;

        comment.text = text;
        comment.updated_at = now;
        Ok(())
    }

    /// Remove a comment, preserving the order of the remainder.
    /// Comment-author-only; the rank author holds no special right here.
    pub fn delete_comment(
        &mut self,
        comment_id: CommentId,
        actor: UserId,
    ) -> Result<Comment, DomainError> {
        let pos = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or(DomainError::NotFound)?;
        if self.comments[pos].author != actor {
            return Err(DomainError::Forbidden);
        }
        Ok(self.comments.remove(pos))
    }

    pub fn find_comment(&self, comment_id: CommentId) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

impl From<ListItemDraft> for ListItem {
    fn from(draft: ListItemDraft) -> Self {
        Self {
            item_name: draft.item_name,
            image_url: draft.image_url,
            votes: Vec::new(),
            score: 0,
        }
    }
}

fn validate_comment_text(text: &str) -> Result<(), DomainError> {
    if text.trim().is_empty() {
        return Err(DomainError::validation("comment text cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_author() -> UserId {
        UserId::new()
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn item(name: &str) -> ListItemDraft {
        ListItemDraft {
            item_name: name.to_string(),
            image_url: None,
        }
    }

    fn draft_with_items(n: usize) -> RankDraft {
        RankDraft {
            category: Category::Games,
            title: "Top picks".to_string(),
            description: "The definitive order".to_string(),
            list: (0..n).map(|i| item(&format!("item {i}"))).collect(),
        }
    }

    fn test_rank(author: UserId) -> Rank {
        Rank::create(RankId::new(), author, draft_with_items(3), test_time()).unwrap()
    }

    // ── creation / validation ───────────────────────────────────────────

    #[test]
    fn create_sets_author_and_empty_vote_sets() {
        let author = test_author();
        let rank = test_rank(author);

        assert_eq!(rank.author, author);
        assert!(rank.upvotes.is_empty());
        assert!(rank.downvotes.is_empty());
        assert!(rank.comments.is_empty());
        assert_eq!(rank.score(), 0);
        assert_eq!(rank.list.len(), 3);
    }

    #[test]
    fn create_rejects_empty_list() {
        let err = Rank::create(RankId::new(), test_author(), draft_with_items(0), test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_accepts_twenty_items_but_not_twenty_one() {
        assert!(Rank::create(RankId::new(), test_author(), draft_with_items(20), test_time()).is_ok());

        let err = Rank::create(RankId::new(), test_author(), draft_with_items(21), test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_blank_title_and_item_name() {
        let mut draft = draft_with_items(2);
        draft.title = "  ".to_string();
        assert!(matches!(
            Rank::create(RankId::new(), test_author(), draft, test_time()),
            Err(DomainError::Validation(_))
        ));

        let mut draft = draft_with_items(2);
        draft.list[1].item_name = String::new();
        assert!(matches!(
            Rank::create(RankId::new(), test_author(), draft, test_time()),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn category_parses_case_insensitively_and_rejects_unknown() {
        assert_eq!("Games".parse::<Category>().unwrap(), Category::Games);
        assert_eq!("television".parse::<Category>().unwrap(), Category::Television);
        assert!(matches!(
            "Gardening".parse::<Category>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn every_category_round_trips_through_its_display_form() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    // ── vote engine ─────────────────────────────────────────────────────

    #[test]
    fn toggle_upvote_adds_then_removes() {
        let voter = UserId::new();
        let mut rank = test_rank(test_author());

        rank.toggle_upvote(voter);
        assert!(rank.has_upvoted(voter));
        assert_eq!(rank.score(), 1);

        rank.toggle_upvote(voter);
        assert!(!rank.has_upvoted(voter));
        assert_eq!(rank.score(), 0);
    }

    #[test]
    fn opposing_toggle_switches_the_vote() {
        let voter = UserId::new();
        let mut rank = test_rank(test_author());

        rank.toggle_upvote(voter);
        rank.toggle_downvote(voter);

        assert!(!rank.has_upvoted(voter));
        assert!(rank.has_downvoted(voter));
        assert_eq!(rank.score(), -1);
    }

    #[test]
    fn toggle_pair_restores_prior_state() {
        let a = UserId::new();
        let b = UserId::new();
        let c = UserId::new();
        let mut rank = test_rank(test_author());
        rank.toggle_upvote(a);
        rank.toggle_downvote(b);

        let upvotes_before = rank.upvotes.clone();
        let downvotes_before = rank.downvotes.clone();

        // vote → un-vote for a fresh voter, un-vote → vote for existing ones.
        rank.toggle_upvote(a);
        rank.toggle_upvote(a);
        rank.toggle_downvote(b);
        rank.toggle_downvote(b);
        rank.toggle_downvote(c);
        rank.toggle_downvote(c);

        assert_eq!(rank.upvotes, upvotes_before);
        assert_eq!(rank.downvotes, downvotes_before);
    }

    #[test]
    fn double_toggle_across_directions_clears_the_opposing_vote() {
        // Not a round trip: the opposing vote is cleared unconditionally on
        // the first toggle and stays cleared after the second.
        let voter = UserId::new();
        let mut rank = test_rank(test_author());
        rank.toggle_downvote(voter);

        rank.toggle_upvote(voter);
        rank.toggle_upvote(voter);

        assert!(!rank.has_upvoted(voter));
        assert!(!rank.has_downvoted(voter));
    }

    #[test]
    fn votes_from_other_users_are_untouched() {
        let a = UserId::new();
        let b = UserId::new();
        let mut rank = test_rank(test_author());

        rank.toggle_upvote(a);
        rank.toggle_downvote(b);
        rank.toggle_upvote(a);

        assert!(rank.upvotes.is_empty());
        assert!(rank.has_downvoted(b));
        assert_eq!(rank.score(), -1);
    }

    // ── ownership ───────────────────────────────────────────────────────

    #[test]
    fn only_the_author_can_edit() {
        let author = test_author();
        let stranger = UserId::new();
        let mut rank = test_rank(author);

        let err = rank
            .edit(stranger, draft_with_items(2), test_time())
            .unwrap_err();
        assert_eq!(err, DomainError::Forbidden);

        rank.edit(author, draft_with_items(2), test_time()).unwrap();
        assert_eq!(rank.list.len(), 2);
    }

    #[test]
    fn edit_preserves_votes_and_comments() {
        let author = test_author();
        let voter = UserId::new();
        let mut rank = test_rank(author);
        rank.toggle_upvote(voter);
        rank.add_comment(CommentId::new(), voter, "nice", test_time())
            .unwrap();

        let mut draft = draft_with_items(5);
        draft.category = Category::Movies;
        rank.edit(author, draft, test_time()).unwrap();

        assert_eq!(rank.category, Category::Movies);
        assert!(rank.has_upvoted(voter));
        assert_eq!(rank.comments.len(), 1);
    }

    #[test]
    fn edit_rejects_invalid_draft_without_mutating() {
        let author = test_author();
        let mut rank = test_rank(author);
        let title_before = rank.title.clone();

        let err = rank
            .edit(author, draft_with_items(0), test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(rank.title, title_before);
        assert_eq!(rank.list.len(), 3);
    }

    // ── comment manager ─────────────────────────────────────────────────

    #[test]
    fn comments_append_in_insertion_order() {
        let mut rank = test_rank(test_author());
        let a = UserId::new();
        let b = UserId::new();

        rank.add_comment(CommentId::new(), a, "first", test_time()).unwrap();
        rank.add_comment(CommentId::new(), b, "second", test_time()).unwrap();

        assert_eq!(rank.comments.len(), 2);
        assert_eq!(rank.comments[0].text, "first");
        assert_eq!(rank.comments[1].text, "second");
        assert_eq!(rank.comments[0].author, a);
    }

    #[test]
    fn add_comment_rejects_blank_text() {
        let mut rank = test_rank(test_author());
        let err = rank
            .add_comment(CommentId::new(), UserId::new(), "   ", test_time())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(rank.comments.is_empty());
    }

    #[test]
    fn edit_comment_replaces_text_only() {
        let commenter = UserId::new();
        let mut rank = test_rank(test_author());
        let id = CommentId::new();
        rank.add_comment(id, commenter, "draft", test_time()).unwrap();
        let created_at = rank.comments[0].created_at;

        rank.edit_comment(id, commenter, "final", test_time()).unwrap();

        let comment = rank.find_comment(id).unwrap();
        assert_eq!(comment.text, "final");
        assert_eq!(comment.author, commenter);
        assert_eq!(comment.created_at, created_at);
    }

    #[test]
    fn only_the_comment_author_can_edit_or_delete() {
        let author = test_author();
        let commenter = UserId::new();
        let mut rank = test_rank(author);
        let id = CommentId::new();
        rank.add_comment(id, commenter, "mine", test_time()).unwrap();

        // The rank author holds no special right over others' comments.
        assert_eq!(
            rank.edit_comment(id, author, "hijacked", test_time()),
            Err(DomainError::Forbidden)
        );
        assert_eq!(rank.delete_comment(id, author).unwrap_err(), DomainError::Forbidden);
        assert_eq!(rank.comments.len(), 1);

        let removed = rank.delete_comment(id, commenter).unwrap();
        assert_eq!(removed.text, "mine");
        assert!(rank.comments.is_empty());
    }

    #[test]
    fn missing_comment_reports_not_found_before_authorship() {
        let mut rank = test_rank(test_author());
        let err = rank
            .edit_comment(CommentId::new(), UserId::new(), "text", test_time())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn delete_comment_preserves_order_of_the_rest() {
        let commenter = UserId::new();
        let mut rank = test_rank(test_author());
        let ids: Vec<CommentId> = (0..3).map(|_| CommentId::new()).collect();
        for (i, id) in ids.iter().enumerate() {
            rank.add_comment(*id, commenter, format!("c{i}"), test_time())
                .unwrap();
        }

        rank.delete_comment(ids[1], commenter).unwrap();

        let texts: Vec<&str> = rank.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["c0", "c2"]);
    }

    // ── reserved item fields ────────────────────────────────────────────

    #[test]
    fn list_items_start_with_reserved_fields_zeroed() {
        let rank = test_rank(test_author());
        for item in &rank.list {
            assert!(item.votes.is_empty());
            assert_eq!(item.score, 0);
        }
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// (user index, is_upvote) op stream over a small user pool.
        fn ops() -> impl Strategy<Value = Vec<(usize, bool)>> {
            prop::collection::vec((0usize..5, prop::bool::ANY), 0..48)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: after any toggle sequence, no user holds both votes.
            #[test]
            fn vote_sets_stay_disjoint(ops in ops()) {
                let users: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();
                let mut rank = test_rank(test_author());

                for (idx, up) in ops {
                    if up {
                        rank.toggle_upvote(users[idx]);
                    } else {
                        rank.toggle_downvote(users[idx]);
                    }
                    for u in &rank.upvotes {
                        prop_assert!(!rank.downvotes.contains(u));
                    }
                }
            }

            /// Property: the derived score always equals |upvotes| - |downvotes|,
            /// and each set holds a user at most once.
            #[test]
            fn score_tracks_set_sizes(ops in ops()) {
                let users: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();
                let mut rank = test_rank(test_author());

                for (idx, up) in ops {
                    if up {
                        rank.toggle_upvote(users[idx]);
                    } else {
                        rank.toggle_downvote(users[idx]);
                    }
                }

                let mut unique_up = rank.upvotes.clone();
                unique_up.sort_unstable_by_key(|u| *u.as_uuid());
                unique_up.dedup();
                prop_assert_eq!(unique_up.len(), rank.upvotes.len());

                prop_assert_eq!(
                    rank.score(),
                    rank.upvotes.len() as i64 - rank.downvotes.len() as i64
                );
            }

            /// Property: from any reachable state in which the user holds no
            /// opposing vote, the same toggle applied twice restores the
            /// user's prior vote state (idempotent pair).
            #[test]
            fn toggle_twice_is_identity(ops in ops(), idx in 0usize..5, up in prop::bool::ANY) {
                let users: Vec<UserId> = (0..5).map(|_| UserId::new()).collect();
                let mut rank = test_rank(test_author());

                for (i, u) in ops {
                    if u {
                        rank.toggle_upvote(users[i]);
                    } else {
                        rank.toggle_downvote(users[i]);
                    }
                }

                // An opposing vote is cleared (not restored) by the pair; drop
                // it first so the round trip is well-defined.
                if up && rank.has_downvoted(users[idx]) {
                    rank.toggle_downvote(users[idx]);
                }
                if !up && rank.has_upvoted(users[idx]) {
                    rank.toggle_upvote(users[idx]);
                }

                let upvotes_before = rank.upvotes.clone();
                let downvotes_before = rank.downvotes.clone();

                for _ in 0..2 {
                    if up {
                        rank.toggle_upvote(users[idx]);
                    } else {
                        rank.toggle_downvote(users[idx]);
                    }
                }

                prop_assert_eq!(&rank.upvotes, &upvotes_before);
                prop_assert_eq!(&rank.downvotes, &downvotes_before);
            }
        }
    }
}
