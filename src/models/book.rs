//! Catalog models: books, copies, authors, genres, publishers

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::CopyStatus;

/// Book genre / category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Book publisher
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Publisher {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Book author
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub nationality: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Author {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref() {
            Some(m) if !m.is_empty() => {
                format!("{} {} {}", self.first_name, m, self.last_name)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// Book record from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub publisher_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub language: String,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub total_copies: i32,
    /// Derived count of copies with status=available, maintained on every
    /// copy write
    pub available_copies: i32,
    pub location: Option<String>,
    pub call_number: Option<String>,
    pub subject_heading: Option<String>,
    pub keywords: Option<String>,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Book with joined authors and copies for the detail view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    #[serde(flatten)]
    pub book: Book,
    pub authors: Vec<Author>,
    pub copies: Vec<Copy>,
    pub genre: Option<Genre>,
    pub publisher: Option<Publisher>,
}

/// Genre with its active books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreDetails {
    #[serde(flatten)]
    pub genre: Genre,
    pub books: Vec<Book>,
}

/// Author with their books
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorDetails {
    #[serde(flatten)]
    pub author: Author,
    pub books: Vec<Book>,
}

/// Physical copy of a book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
    pub barcode: String,
    pub status: CopyStatus,
    pub location: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    pub acquisition_cost: Option<Decimal>,
    pub condition: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub subtitle: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub author_ids: Option<Vec<i32>>,
    pub publisher_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub call_number: Option<String>,
    pub subject_heading: Option<String>,
    pub keywords: Option<String>,
    pub is_featured: Option<bool>,
}

/// Update book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub isbn: Option<String>,
    pub isbn13: Option<String>,
    pub author_ids: Option<Vec<i32>>,
    pub publisher_id: Option<i32>,
    pub genre_id: Option<i32>,
    pub publication_date: Option<NaiveDate>,
    pub edition: Option<String>,
    pub language: Option<String>,
    pub pages: Option<i32>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub call_number: Option<String>,
    pub subject_heading: Option<String>,
    pub keywords: Option<String>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
}

/// Create copy request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCopy {
    #[validate(length(min = 1, message = "Barcode is required"))]
    pub barcode: String,
    pub status: Option<CopyStatus>,
    pub location: Option<String>,
    pub acquisition_date: Option<NaiveDate>,
    pub acquisition_cost: Option<Decimal>,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

/// Update copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCopy {
    pub status: Option<CopyStatus>,
    pub location: Option<String>,
    pub condition: Option<String>,
    pub notes: Option<String>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub middle_name: Option<String>,
    pub bio: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub nationality: Option<String>,
}

/// Create genre request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

/// Create publisher request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePublisher {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub slug: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
}

/// Query parameters for the book list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Substring search over title, isbn, author names and description
    pub q: Option<String>,
    /// Filter by genre slug
    pub genre: Option<String>,
    pub featured: Option<bool>,
    /// Page number (1-based)
    pub page: Option<i64>,
    /// Items per page (default 20)
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_full_name_includes_middle_name_when_present() {
        let mut author = Author {
            id: 1,
            first_name: "Chinua".to_string(),
            last_name: "Achebe".to_string(),
            middle_name: None,
            bio: None,
            date_of_birth: None,
            date_of_death: None,
            nationality: None,
            created_at: Utc::now(),
        };
        assert_eq!(author.full_name(), "Chinua Achebe");

        author.middle_name = Some("Albert".to_string());
        assert_eq!(author.full_name(), "Chinua Albert Achebe");

        author.middle_name = Some(String::new());
        assert_eq!(author.full_name(), "Chinua Achebe");
    }
}
