//! Repository layer for database operations

pub mod activity;
pub mod books;
pub mod documents;
pub mod events;
pub mod fines;
pub mod loans;
pub mod posts;
pub mod reservations;
pub mod stats;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub books: books::BooksRepository,
    pub loans: loans::LoansRepository,
    pub reservations: reservations::ReservationsRepository,
    pub fines: fines::FinesRepository,
    pub documents: documents::DocumentsRepository,
    pub posts: posts::PostsRepository,
    pub events: events::EventsRepository,
    pub activity: activity::ActivityRepository,
    pub stats: stats::StatsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            loans: loans::LoansRepository::new(pool.clone()),
            reservations: reservations::ReservationsRepository::new(pool.clone()),
            fines: fines::FinesRepository::new(pool.clone()),
            documents: documents::DocumentsRepository::new(pool.clone()),
            posts: posts::PostsRepository::new(pool.clone()),
            events: events::EventsRepository::new(pool.clone()),
            activity: activity::ActivityRepository::new(pool.clone()),
            stats: stats::StatsRepository::new(pool.clone()),
            pool,
        }
    }
}
