//! Catalog repository: books, copies, authors, genres, publishers

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{
            Author, AuthorDetails, Book, BookDetails, BookQuery, CreateAuthor, CreateBook,
            CreateCopy, CreateGenre, CreatePublisher, Genre, GenreDetails, Publisher, UpdateBook,
            UpdateCopy,
        },
        enums::CopyStatus,
        post::slugify,
        Copy,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Recompute a book's available_copies from its copy rows. Must run in
    /// the same transaction as the copy write it follows.
    pub async fn recount_available(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE books SET
                available_copies = (SELECT COUNT(*) FROM copies
                                    WHERE book_id = $1 AND status = 'available'),
                total_copies = (SELECT COUNT(*) FROM copies
                                WHERE book_id = $1 AND status <> 'withdrawn'),
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(book_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1 AND is_active")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Book detail with authors, copies, genre and publisher joined in
    pub async fn get_details(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.get_by_id(id).await?;

        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.* FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY ba.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let copies =
            sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE book_id = $1 ORDER BY barcode")
                .bind(id)
                .fetch_all(&self.pool)
                .await?;

        let genre = match book.genre_id {
            Some(gid) => {
                sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
                    .bind(gid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let publisher = match book.publisher_id {
            Some(pid) => {
                sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
                    .bind(pid)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        Ok(BookDetails {
            book,
            authors,
            copies,
            genre,
            publisher,
        })
    }

    /// Search the catalog with pagination
    pub async fn list(&self, query: &BookQuery) -> AppResult<(Vec<Book>, i64)> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1) * per_page;

        let pattern = query.q.as_ref().map(|q| format!("%{}%", q));

        let mut conditions = vec!["b.is_active".to_string()];
        let mut idx = 1;
        if pattern.is_some() {
            conditions.push(format!(
                r#"(b.title ILIKE ${idx} OR b.isbn ILIKE ${idx} OR b.isbn13 ILIKE ${idx}
                    OR b.description ILIKE ${idx} OR b.keywords ILIKE ${idx}
                    OR EXISTS (SELECT 1 FROM book_authors ba JOIN authors a ON a.id = ba.author_id
                               WHERE ba.book_id = b.id
                                 AND (a.first_name ILIKE ${idx} OR a.last_name ILIKE ${idx})))"#
            ));
            idx += 1;
        }
        if query.genre.is_some() {
            conditions.push(format!(
                "b.genre_id = (SELECT id FROM genres WHERE slug = ${})",
                idx
            ));
        }
        if query.featured == Some(true) {
            conditions.push("b.is_featured".to_string());
        }
        let where_clause = conditions.join(" AND ");

        let count_q = format!("SELECT COUNT(*) FROM books b WHERE {}", where_clause);
        let mut count_builder = sqlx::query_scalar::<_, i64>(&count_q);
        if let Some(ref p) = pattern {
            count_builder = count_builder.bind(p);
        }
        if let Some(ref g) = query.genre {
            count_builder = count_builder.bind(g);
        }
        let total = count_builder.fetch_one(&self.pool).await?;

        let select_q = format!(
            "SELECT b.* FROM books b WHERE {} ORDER BY b.created_at DESC LIMIT {} OFFSET {}",
            where_clause, per_page, offset
        );
        let mut builder = sqlx::query_as::<_, Book>(&select_q);
        if let Some(ref p) = pattern {
            builder = builder.bind(p);
        }
        if let Some(ref g) = query.genre {
            builder = builder.bind(g);
        }
        let books = builder.fetch_all(&self.pool).await?;

        Ok((books, total))
    }

    pub async fn create(&self, data: &CreateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, subtitle, isbn, isbn13, publisher_id, genre_id,
                               publication_date, edition, language, pages, description,
                               location, call_number, subject_heading, keywords, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            RETURNING *
            "#,
        )
        .bind(&data.title)
        .bind(&data.subtitle)
        .bind(&data.isbn)
        .bind(&data.isbn13)
        .bind(data.publisher_id)
        .bind(data.genre_id)
        .bind(data.publication_date)
        .bind(&data.edition)
        .bind(data.language.as_deref().unwrap_or("English"))
        .bind(data.pages)
        .bind(&data.description)
        .bind(&data.location)
        .bind(&data.call_number)
        .bind(&data.subject_heading)
        .bind(&data.keywords)
        .bind(data.is_featured.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref author_ids) = data.author_ids {
            for (position, author_id) in author_ids.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO book_authors (book_id, author_id, position) VALUES ($1, $2, $3)",
                )
                .bind(book.id)
                .bind(author_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(book)
    }

    pub async fn update(&self, id: i32, data: &UpdateBook) -> AppResult<Book> {
        let current = self.get_by_id(id).await?;
        let mut tx = self.pool.begin().await?;

        let book = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = $2, subtitle = $3, isbn = $4, isbn13 = $5, publisher_id = $6,
                genre_id = $7, publication_date = $8, edition = $9, language = $10,
                pages = $11, description = $12, location = $13, call_number = $14,
                subject_heading = $15, keywords = $16, is_featured = $17, is_active = $18,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.title.as_deref().unwrap_or(&current.title))
        .bind(data.subtitle.as_ref().or(current.subtitle.as_ref()))
        .bind(data.isbn.as_ref().or(current.isbn.as_ref()))
        .bind(data.isbn13.as_ref().or(current.isbn13.as_ref()))
        .bind(data.publisher_id.or(current.publisher_id))
        .bind(data.genre_id.or(current.genre_id))
        .bind(data.publication_date.or(current.publication_date))
        .bind(data.edition.as_ref().or(current.edition.as_ref()))
        .bind(data.language.as_deref().unwrap_or(&current.language))
        .bind(data.pages.or(current.pages))
        .bind(data.description.as_ref().or(current.description.as_ref()))
        .bind(data.location.as_ref().or(current.location.as_ref()))
        .bind(data.call_number.as_ref().or(current.call_number.as_ref()))
        .bind(
            data.subject_heading
                .as_ref()
                .or(current.subject_heading.as_ref()),
        )
        .bind(data.keywords.as_ref().or(current.keywords.as_ref()))
        .bind(data.is_featured.unwrap_or(current.is_featured))
        .bind(data.is_active.unwrap_or(current.is_active))
        .fetch_one(&mut *tx)
        .await?;

        if let Some(ref author_ids) = data.author_ids {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for (position, author_id) in author_ids.iter().enumerate() {
                sqlx::query(
                    "INSERT INTO book_authors (book_id, author_id, position) VALUES ($1, $2, $3)",
                )
                .bind(id)
                .bind(author_id)
                .bind(position as i32)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(book)
    }

    /// Deactivate a book (soft delete, keeps loan history)
    pub async fn deactivate(&self, id: i32) -> AppResult<()> {
        let result =
            sqlx::query("UPDATE books SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn get_copy(&self, id: i32) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    pub async fn get_copy_by_barcode(&self, barcode: &str) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE barcode = $1")
            .bind(barcode)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with barcode {} not found", barcode)))
    }

    /// Add a copy and refresh the book's copy counts
    pub async fn create_copy(&self, book_id: i32, data: &CreateCopy) -> AppResult<Copy> {
        self.get_by_id(book_id).await?;
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query_as::<_, Copy>(
            r#"
            INSERT INTO copies (book_id, barcode, status, location, acquisition_date,
                                acquisition_cost, condition, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(&data.barcode)
        .bind(data.status.unwrap_or(CopyStatus::Available))
        .bind(&data.location)
        .bind(data.acquisition_date)
        .bind(data.acquisition_cost)
        .bind(&data.condition)
        .bind(&data.notes)
        .fetch_one(&mut *tx)
        .await?;

        Self::recount_available(&mut tx, book_id).await?;
        tx.commit().await?;
        Ok(copy)
    }

    /// Update a copy and refresh the book's copy counts
    pub async fn update_copy(&self, id: i32, data: &UpdateCopy) -> AppResult<Copy> {
        let current = self.get_copy(id).await?;
        let mut tx = self.pool.begin().await?;

        let copy = sqlx::query_as::<_, Copy>(
            r#"
            UPDATE copies SET
                status = $2, location = $3, condition = $4, notes = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(data.status.unwrap_or(current.status))
        .bind(data.location.as_ref().or(current.location.as_ref()))
        .bind(data.condition.as_ref().or(current.condition.as_ref()))
        .bind(data.notes.as_ref().or(current.notes.as_ref()))
        .fetch_one(&mut *tx)
        .await?;

        Self::recount_available(&mut tx, current.book_id).await?;
        tx.commit().await?;
        Ok(copy)
    }

    /// Remove a copy and refresh the book's copy counts. Copies with loan
    /// history cannot be deleted; they are withdrawn instead.
    pub async fn delete_copy(&self, id: i32) -> AppResult<()> {
        let copy = self.get_copy(id).await?;

        let has_loans: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM loans WHERE copy_id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if has_loans {
            return Err(AppError::BusinessRule(
                "Copy has loan history and cannot be deleted; mark it withdrawn instead"
                    .to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        Self::recount_available(&mut tx, copy.book_id).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn get_author_details(&self, id: i32) -> AppResult<AuthorDetails> {
        let author = sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT b.* FROM books b
            JOIN book_authors ba ON ba.book_id = b.id
            WHERE ba.author_id = $1 AND b.is_active
            ORDER BY b.title
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(AuthorDetails { author, books })
    }

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY last_name, first_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    pub async fn create_author(&self, data: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, middle_name, bio, date_of_birth,
                                 date_of_death, nationality)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.first_name)
        .bind(&data.last_name)
        .bind(&data.middle_name)
        .bind(&data.bio)
        .bind(data.date_of_birth)
        .bind(data.date_of_death)
        .bind(&data.nationality)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn get_genre_details(&self, slug: &str) -> AppResult<GenreDetails> {
        let genre = sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE slug = $1")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre '{}' not found", slug)))?;

        let books = sqlx::query_as::<_, Book>(
            "SELECT * FROM books WHERE genre_id = $1 AND is_active ORDER BY title",
        )
        .bind(genre.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(GenreDetails { genre, books })
    }

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    pub async fn create_genre(&self, data: &CreateGenre) -> AppResult<Genre> {
        let slug = data
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&data.name));
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name, slug, description) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.name)
        .bind(&slug)
        .bind(&data.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(genre)
    }

    pub async fn list_publishers(&self) -> AppResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(publishers)
    }

    pub async fn create_publisher(&self, data: &CreatePublisher) -> AppResult<Publisher> {
        let slug = data
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&data.name));
        let publisher = sqlx::query_as::<_, Publisher>(
            r#"
            INSERT INTO publishers (name, slug, address, website)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&slug)
        .bind(&data.address)
        .bind(&data.website)
        .fetch_one(&self.pool)
        .await?;
        Ok(publisher)
    }
}
