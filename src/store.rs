use anyhow::Result;
use async_trait::async_trait;

use crate::model::{Book, BookChanges, NewBook};

/// Persistence operations behind the book handlers.
///
/// `Ok(None)` / `Ok(false)` mean the id does not exist; `Err` is a storage failure.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn create_book(&self, input: NewBook) -> Result<Book>;

    async fn list_books(&self) -> Result<Vec<Book>>;

    async fn get_book(&self, id: i64) -> Result<Option<Book>>;

    async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Option<Book>>;

    async fn delete_book(&self, id: i64) -> Result<bool>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use chrono::Utc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryStore {
        books: Mutex<Vec<Book>>,
        next_id: Mutex<i64>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn len(&self) -> usize {
            self.books.lock().await.len()
        }
    }

    #[async_trait]
    impl BookStore for MemoryStore {
        async fn create_book(&self, input: NewBook) -> Result<Book> {
            let mut next_id = self.next_id.lock().await;
            *next_id += 1;
            let now = Utc::now();
            let book = Book {
                id: *next_id,
                author: input.author,
                title: input.title,
                publisher: input.publisher,
                created_at: now,
                updated_at: now,
            };
            self.books.lock().await.push(book.clone());
            Ok(book)
        }

        async fn list_books(&self) -> Result<Vec<Book>> {
            Ok(self.books.lock().await.clone())
        }

        async fn get_book(&self, id: i64) -> Result<Option<Book>> {
            Ok(self.books.lock().await.iter().find(|b| b.id == id).cloned())
        }

        async fn update_book(&self, id: i64, changes: BookChanges) -> Result<Option<Book>> {
            let mut books = self.books.lock().await;
            let Some(book) = books.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };
            if !changes.is_empty() {
                changes.apply_to(book);
                book.updated_at = Utc::now();
            }
            Ok(Some(book.clone()))
        }

        async fn delete_book(&self, id: i64) -> Result<bool> {
            let mut books = self.books.lock().await;
            let before = books.len();
            books.retain(|b| b.id != id);
            Ok(books.len() < before)
        }
    }

    /// Fails every call, standing in for an unreachable database.
    pub struct FailingStore;

    #[async_trait]
    impl BookStore for FailingStore {
        async fn create_book(&self, _input: NewBook) -> Result<Book> {
            anyhow::bail!("connection refused")
        }

        async fn list_books(&self) -> Result<Vec<Book>> {
            anyhow::bail!("connection refused")
        }

        async fn get_book(&self, _id: i64) -> Result<Option<Book>> {
            anyhow::bail!("connection refused")
        }

        async fn update_book(&self, _id: i64, _changes: BookChanges) -> Result<Option<Book>> {
            anyhow::bail!("connection refused")
        }

        async fn delete_book(&self, _id: i64) -> Result<bool> {
            anyhow::bail!("connection refused")
        }
    }
}
