//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, blog, books, contact, documents, events, fines, health, loans, reservations, stats,
    users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unilib API",
        version = "1.0.0",
        description = "University Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::dashboard,
        auth::get_profile,
        auth::update_profile,
        auth::my_loans,
        auth::my_reservations,
        auth::my_fines,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::create_copy,
        books::update_copy,
        books::delete_copy,
        books::list_authors,
        books::create_author,
        books::get_author,
        books::list_genres,
        books::create_genre,
        books::get_genre,
        books::list_publishers,
        books::create_publisher,
        // Users
        users::list_users,
        users::get_user,
        users::update_user,
        users::deactivate_user,
        users::list_staff,
        // Loans
        loans::list_loans,
        loans::create_loan,
        loans::return_loan,
        loans::renew_loan,
        loans::mark_lost,
        loans::refresh_overdue,
        loans::get_user_loans,
        // Reservations
        reservations::list_reservations,
        reservations::reserve_book,
        reservations::cancel_reservation,
        reservations::fulfill_reservation,
        reservations::expire_stale,
        // Fines
        fines::list_fines,
        fines::create_fine,
        fines::pay_fine,
        fines::waive_fine,
        // Documents
        documents::list_documents,
        documents::get_document,
        documents::download_document,
        documents::submit_document,
        documents::pending_documents,
        documents::review_document,
        documents::list_collections,
        // Blog
        blog::list_posts,
        blog::get_post,
        blog::create_post,
        blog::update_post,
        blog::delete_post,
        blog::create_comment,
        blog::approve_comment,
        blog::reject_comment,
        blog::list_categories,
        blog::list_tags,
        // Events
        events::list_events,
        events::get_event,
        events::create_event,
        events::update_event,
        events::register_for_event,
        events::unregister_from_event,
        events::list_registrations,
        events::mark_attended,
        // Stats
        stats::get_stats,
        stats::popular_books,
        stats::top_searches,
        stats::activity_feed,
        // Contact
        contact::send_message,
        contact::subscribe_newsletter,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            crate::services::auth::LoginResponse,
            crate::services::auth::Dashboard,
            crate::models::user::User,
            crate::models::user::Profile,
            crate::models::user::StaffMember,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateUser,
            crate::models::user::UpdateProfile,
            users::UsersListResponse,
            // Catalog
            crate::models::book::Book,
            crate::models::book::BookDetails,
            crate::models::book::Author,
            crate::models::book::AuthorDetails,
            crate::models::book::Genre,
            crate::models::book::GenreDetails,
            crate::models::book::Publisher,
            crate::models::book::Copy,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::CreateCopy,
            crate::models::book::UpdateCopy,
            crate::models::book::CreateAuthor,
            crate::models::book::CreateGenre,
            crate::models::book::CreatePublisher,
            books::BooksListResponse,
            // Circulation
            crate::models::loan::Loan,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            crate::models::reservation::Reservation,
            crate::models::reservation::ReservationDetails,
            crate::models::reservation::ReserveResponse,
            crate::models::fine::Fine,
            crate::models::fine::CreateFine,
            crate::models::fine::PayFine,
            crate::models::fine::WaiveFine,
            loans::LoansListResponse,
            loans::ReturnResponse,
            loans::OverdueSweepResponse,
            reservations::ReservationsListResponse,
            fines::FinesListResponse,
            // Documents
            crate::models::document::Document,
            crate::models::document::Collection,
            crate::models::document::CreateDocument,
            crate::models::document::ReviewDocument,
            documents::DocumentsListResponse,
            documents::DownloadResponse,
            // Blog
            crate::models::post::Post,
            crate::models::post::PostDetails,
            crate::models::post::Category,
            crate::models::post::Tag,
            crate::models::post::Comment,
            crate::models::post::CommentDetails,
            crate::models::post::CreatePost,
            crate::models::post::UpdatePost,
            crate::models::post::CreateComment,
            blog::PostsListResponse,
            // Events
            crate::models::event::Event,
            crate::models::event::EventRegistration,
            crate::models::event::CreateEvent,
            crate::models::event::UpdateEvent,
            events::EventsListResponse,
            // Stats
            crate::repository::stats::LibraryStats,
            crate::repository::stats::PopularBook,
            crate::models::activity::UserActivity,
            stats::ActivityListResponse,
            stats::TopSearch,
            // Enums
            crate::models::enums::MembershipType,
            crate::models::enums::CopyStatus,
            crate::models::enums::LoanStatus,
            crate::models::enums::ReservationStatus,
            crate::models::enums::FineStatus,
            crate::models::enums::AccessLevel,
            crate::models::enums::DocumentType,
            crate::models::enums::EventType,
            crate::models::enums::PaymentStatus,
            crate::models::enums::ActionType,
            crate::models::enums::SearchType,
            // Contact
            contact::ContactMessage,
            contact::ContactResponse,
            contact::NewsletterSubscription,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and member account"),
        (name = "books", description = "Catalog"),
        (name = "users", description = "Member administration"),
        (name = "loans", description = "Circulation: loans"),
        (name = "reservations", description = "Circulation: reservations"),
        (name = "fines", description = "Circulation: fines"),
        (name = "documents", description = "Institutional repository"),
        (name = "blog", description = "News and blog"),
        (name = "events", description = "Library events"),
        (name = "stats", description = "Statistics and analytics"),
        (name = "contact", description = "Contact form")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
