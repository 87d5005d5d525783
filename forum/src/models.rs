use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use platform::identity::Author;
use platform::store::{Row, Store};

/// Parent scope every question is stored under.
pub const QUESTION_SCOPE: &str = "questions";

#[derive(Debug, Clone)]
pub struct Question {
    pub author: Author,
    pub title: String,
    pub content: String,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl Question {
    pub fn new(author: Author, title: String, content: String, tags: Vec<String>) -> Self {
        Self {
            author,
            title,
            content,
            created_date: Utc::now(),
            modified_date: None,
            tags,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Answer {
    pub author: Author,
    pub content: String,
    pub vote: i64,
    pub voters: BTreeSet<String>,
    pub created_date: DateTime<Utc>,
    pub modified_date: Option<DateTime<Utc>>,
}

impl Answer {
    pub fn new(author: Author, content: String) -> Self {
        Self {
            author,
            content,
            vote: 0,
            voters: BTreeSet::new(),
            created_date: Utc::now(),
            modified_date: None,
        }
    }

    /// Apply a ±1 vote. An identity votes at most once per answer; a
    /// repeat attempt changes nothing and returns false.
    pub fn cast_vote(&mut self, voter_id: &str, delta: i64) -> bool {
        if !self.voters.insert(voter_id.to_string()) {
            return false;
        }

        self.vote += delta;
        true
    }
}

/// Per-user profile row. The friend list is written by nothing yet.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub author: Author,
    pub friends: Vec<String>,
    pub created_date: DateTime<Utc>,
}

impl UserInfo {
    pub fn new(author: Author) -> Self {
        Self {
            author,
            friends: Vec::new(),
            created_date: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserPhoto {
    pub author: Author,
    pub blob_key: String,
    pub url: String,
    pub note: Option<String>,
    pub created_date: DateTime<Utc>,
}

impl UserPhoto {
    pub fn new(author: Author, blob_key: String, url: String, note: Option<String>) -> Self {
        Self {
            author,
            blob_key,
            url,
            note,
            created_date: Utc::now(),
        }
    }
}

/// Which questions a listing shows.
pub enum QuestionQuery {
    All,
    WithAnyTag(Vec<String>),
}

impl QuestionQuery {
    /// The `tag` query parameter is a space-separated tag list; blank
    /// means no filter.
    pub fn from_tag_param(tag: &str) -> Self {
        let tags: Vec<String> = tag.split(' ').map(str::to_owned).collect();

        if tags[0].is_empty() {
            QuestionQuery::All
        } else {
            QuestionQuery::WithAnyTag(tags)
        }
    }

    /// Matching questions, newest first.
    pub fn run(&self, store: &Store<Question>) -> Vec<Row<Question>> {
        let mut rows = store.rows();

        if let QuestionQuery::WithAnyTag(tags) = self {
            rows.retain(|row| row.entity.tags.iter().any(|tag| tags.contains(tag)));
        }

        rows.sort_by(|a, b| b.entity.created_date.cmp(&a.entity.created_date));
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn author(id: &str) -> Author {
        Author {
            id: id.to_string(),
            nickname: id.to_string(),
        }
    }

    fn question_at(title: &str, tags: &[&str], day: u32) -> Question {
        Question {
            author: author("u1"),
            title: title.to_string(),
            content: String::new(),
            created_date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
            modified_date: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn first_vote_counts() {
        let mut answer = Answer::new(author("a"), "text".to_string());

        assert!(answer.cast_vote("u1", 1));
        assert_eq!(answer.vote, 1);
        assert!(answer.voters.contains("u1"));
    }

    #[test]
    fn repeat_vote_is_a_no_op() {
        let mut answer = Answer::new(author("a"), "text".to_string());

        assert!(answer.cast_vote("u1", 1));
        assert!(!answer.cast_vote("u1", 1));
        assert!(!answer.cast_vote("u1", -1));
        assert_eq!(answer.vote, 1);
        assert_eq!(answer.voters.len(), 1);
    }

    #[test]
    fn distinct_voters_each_count_once() {
        let mut answer = Answer::new(author("a"), "text".to_string());

        assert!(answer.cast_vote("u1", 1));
        assert!(answer.cast_vote("u2", -1));
        assert_eq!(answer.vote, 0);
        assert_eq!(answer.voters.len(), 2);
    }

    #[test]
    fn blank_tag_param_means_no_filter() {
        assert!(matches!(
            QuestionQuery::from_tag_param(""),
            QuestionQuery::All
        ));
        assert!(matches!(
            QuestionQuery::from_tag_param("rust tokio"),
            QuestionQuery::WithAnyTag(_)
        ));
    }

    #[test]
    fn tag_filter_orders_newest_first() {
        let store = Store::new("question");
        store.insert(Some(QUESTION_SCOPE), question_at("old rust", &["rust"], 1));
        store.insert(Some(QUESTION_SCOPE), question_at("python", &["python"], 2));
        store.insert(Some(QUESTION_SCOPE), question_at("new rust", &["rust"], 3));

        let titles: Vec<String> = QuestionQuery::from_tag_param("rust")
            .run(&store)
            .into_iter()
            .map(|row| row.entity.title)
            .collect();

        assert_eq!(titles, vec!["new rust", "old rust"]);
    }
}
