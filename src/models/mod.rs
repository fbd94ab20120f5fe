//! Data models for the Unilib server

pub mod activity;
pub mod book;
pub mod document;
pub mod enums;
pub mod event;
pub mod fine;
pub mod loan;
pub mod post;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use book::{Author, Book, Copy, Genre, Publisher};
pub use document::{Collection, Document};
pub use enums::{
    AccessLevel, ActionType, CopyStatus, DocumentType, EventType, FineStatus, LoanStatus,
    MembershipType, ReservationStatus,
};
pub use event::{Event, EventRegistration};
pub use fine::Fine;
pub use loan::Loan;
pub use post::{Category, Comment, Post, Tag};
pub use reservation::Reservation;
pub use user::{User, UserClaims};
