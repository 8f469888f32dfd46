use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub author: String,
    pub title: String,
    pub publisher: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Missing fields default to empty strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewBook {
    pub author: String,
    pub title: String,
    pub publisher: String,
}

/// Partial update payload. Absent, `null` and empty fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookChanges {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
}

impl BookChanges {
    pub fn author(&self) -> Option<&str> {
        non_empty(&self.author)
    }

    pub fn title(&self) -> Option<&str> {
        non_empty(&self.title)
    }

    pub fn publisher(&self) -> Option<&str> {
        non_empty(&self.publisher)
    }

    pub fn is_empty(&self) -> bool {
        self.author().is_none() && self.title().is_none() && self.publisher().is_none()
    }

    /// Applies the effective changes to `book`, leaving the timestamps alone.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(author) = self.author() {
            book.author = author.to_owned();
        }
        if let Some(title) = self.title() {
            book.title = title.to_owned();
        }
        if let Some(publisher) = self.publisher() {
            book.publisher = publisher.to_owned();
        }
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> Book {
        let now = Utc::now();
        Book {
            id: 1,
            author: "Ursula K. Le Guin".to_string(),
            title: "The Dispossessed".to_string(),
            publisher: "Harper & Row".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_changes_skip_empty_and_missing_fields() {
        let changes: BookChanges =
            serde_json::from_str(r#"{"title": "The Lathe of Heaven", "author": "", "publisher": null}"#).unwrap();
        assert!(!changes.is_empty());
        assert_eq!(changes.author(), None);
        assert_eq!(changes.publisher(), None);

        let mut b = book();
        changes.apply_to(&mut b);
        assert_eq!(b.title, "The Lathe of Heaven");
        assert_eq!(b.author, "Ursula K. Le Guin");
        assert_eq!(b.publisher, "Harper & Row");
    }

    #[test]
    fn test_changes_empty_object() {
        let changes: BookChanges = serde_json::from_str("{}").unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_new_book_defaults_missing_fields() {
        let nb: NewBook = serde_json::from_str(r#"{"title": "Dune"}"#).unwrap();
        assert_eq!(nb.title, "Dune");
        assert_eq!(nb.author, "");
        assert_eq!(nb.publisher, "");

        assert!(serde_json::from_str::<NewBook>(r#"{"author": 1, "title": "Dune", "publisher": "Chilton"}"#).is_err());
        assert!(serde_json::from_str::<NewBook>(r#"{"author": null, "title": "Dune"}"#).is_err());

        let nb: NewBook =
            serde_json::from_str(r#"{"author": "Frank Herbert", "title": "Dune", "publisher": "Chilton"}"#).unwrap();
        assert_eq!(nb.author, "Frank Herbert");
    }
}
