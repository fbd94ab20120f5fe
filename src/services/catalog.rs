//! Catalog service

use crate::{
    error::AppResult,
    models::{
        activity::NewActivity,
        book::{
            Author, AuthorDetails, Book, BookDetails, BookQuery, CreateAuthor, CreateBook,
            CreateCopy, CreateGenre, CreatePublisher, Genre, GenreDetails, Publisher, UpdateBook,
            UpdateCopy,
        },
        enums::{ActionType, SearchType},
        Copy,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Search the catalog. Searches with a query string are recorded for
    /// the analytics reports.
    pub async fn search(
        &self,
        query: &BookQuery,
        user_id: Option<i32>,
    ) -> AppResult<(Vec<Book>, i64)> {
        let (books, total) = self.repository.books.list(query).await?;

        if let Some(ref q) = query.q {
            let filters = serde_json::json!({
                "genre": query.genre,
                "featured": query.featured,
            });
            self.repository
                .activity
                .record_search(q, user_id, total, SearchType::Catalog, filters)
                .await?;
        }

        Ok((books, total))
    }

    /// Book detail view. Records a view activity for signed-in callers.
    pub async fn get_book(&self, id: i32, user_id: Option<i32>) -> AppResult<BookDetails> {
        let details = self.repository.books.get_details(id).await?;

        if let Some(user_id) = user_id {
            self.repository
                .activity
                .record(&NewActivity::new(
                    Some(user_id),
                    ActionType::ViewBook,
                    format!("Viewed book '{}'", details.book.title),
                ))
                .await?;
        }

        Ok(details)
    }

    pub async fn create_book(&self, data: &CreateBook) -> AppResult<Book> {
        self.repository.books.create(data).await
    }

    pub async fn update_book(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        self.repository.books.update(id, data).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.deactivate(id).await
    }

    pub async fn add_copy(&self, book_id: i32, data: &CreateCopy) -> AppResult<Copy> {
        self.repository.books.create_copy(book_id, data).await
    }

    pub async fn update_copy(&self, id: i32, data: &UpdateCopy) -> AppResult<Copy> {
        self.repository.books.update_copy(id, data).await
    }

    pub async fn delete_copy(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete_copy(id).await
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.books.list_authors().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetails> {
        self.repository.books.get_author_details(id).await
    }

    pub async fn create_author(&self, data: &CreateAuthor) -> AppResult<Author> {
        self.repository.books.create_author(data).await
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.books.list_genres().await
    }

    pub async fn get_genre(&self, slug: &str) -> AppResult<GenreDetails> {
        self.repository.books.get_genre_details(slug).await
    }

    pub async fn create_genre(&self, data: &CreateGenre) -> AppResult<Genre> {
        self.repository.books.create_genre(data).await
    }

    pub async fn list_publishers(&self) -> AppResult<Vec<Publisher>> {
        self.repository.books.list_publishers().await
    }

    pub async fn create_publisher(&self, data: &CreatePublisher) -> AppResult<Publisher> {
        self.repository.books.create_publisher(data).await
    }
}
