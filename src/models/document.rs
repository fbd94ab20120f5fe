//! Institutional repository models: documents and collections

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{AccessLevel, DocumentType};
use super::user::UserClaims;

/// Document collection / category
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Collection {
    pub id: i32,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Institutional repository document
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: i32,
    pub title: String,
    pub subtitle: Option<String>,
    pub document_type: DocumentType,
    pub collection_id: Option<i32>,
    /// Primary author (free text, not necessarily a registered user)
    pub author: String,
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub supervisor: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub publisher: Option<String>,
    pub journal_name: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub file_path: String,
    pub file_size: Option<i64>,
    pub access_level: AccessLevel,
    pub embargo_date: Option<NaiveDate>,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub subject: Option<String>,
    pub language: String,
    pub doi: Option<String>,
    pub isbn: Option<String>,
    pub issn: Option<String>,
    pub license: Option<String>,
    pub copyright_holder: Option<String>,
    pub submitted_by: Option<i32>,
    pub submission_date: DateTime<Utc>,
    pub reviewed_by: Option<i32>,
    pub review_date: Option<DateTime<Utc>>,
    pub is_approved: bool,
    pub is_featured: bool,
    pub is_active: bool,
    pub download_count: i32,
    pub view_count: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Access-level gating. Open documents are visible to everyone;
    /// restricted ones to any authenticated user; embargoed ones once the
    /// embargo date has passed (or was never set); private ones only to the
    /// submitter and staff.
    pub fn is_accessible(&self, user: Option<&UserClaims>, today: NaiveDate) -> bool {
        match self.access_level {
            AccessLevel::Open => true,
            AccessLevel::Restricted => user.is_some(),
            AccessLevel::Embargoed => match self.embargo_date {
                None => true,
                Some(embargo) => today >= embargo,
            },
            AccessLevel::Private => user.map_or(false, |u| {
                Some(u.user_id) == self.submitted_by || u.require_staff().is_ok()
            }),
        }
    }
}

/// Submit document request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateDocument {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub subtitle: Option<String>,
    pub document_type: DocumentType,
    pub collection_id: Option<i32>,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    pub department: Option<String>,
    pub faculty: Option<String>,
    pub supervisor: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub publisher: Option<String>,
    pub journal_name: Option<String>,
    #[validate(length(min = 1, message = "File path is required"))]
    pub file_path: String,
    pub file_size: Option<i64>,
    pub access_level: Option<AccessLevel>,
    pub embargo_date: Option<NaiveDate>,
    pub abstract_text: Option<String>,
    pub keywords: Option<String>,
    pub subject: Option<String>,
    pub language: Option<String>,
    pub doi: Option<String>,
}

/// Document review request (librarian)
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReviewDocument {
    pub is_approved: bool,
    pub notes: Option<String>,
}

/// Query parameters for the document list
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct DocumentQuery {
    /// Substring search over title, author, abstract, keywords and subject
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub document_type: Option<DocumentType>,
    /// Filter by collection slug
    pub collection: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::MembershipType;
    use chrono::Duration;

    fn document(access_level: AccessLevel, embargo_date: Option<NaiveDate>) -> Document {
        let now = Utc::now();
        Document {
            id: 1,
            title: "Groundwater Quality Assessment".to_string(),
            subtitle: None,
            document_type: DocumentType::Thesis,
            collection_id: None,
            author: "A. Researcher".to_string(),
            department: None,
            faculty: None,
            supervisor: None,
            publication_date: None,
            year: Some(2024),
            publisher: None,
            journal_name: None,
            volume: None,
            issue: None,
            pages: None,
            file_path: "repository/documents/thesis.pdf".to_string(),
            file_size: None,
            access_level,
            embargo_date,
            abstract_text: None,
            keywords: None,
            subject: None,
            language: "English".to_string(),
            doi: None,
            isbn: None,
            issn: None,
            license: None,
            copyright_holder: None,
            submitted_by: Some(7),
            submission_date: now,
            reviewed_by: None,
            review_date: None,
            is_approved: true,
            is_featured: false,
            is_active: true,
            download_count: 0,
            view_count: 0,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn user(user_id: i32, is_staff: bool) -> UserClaims {
        UserClaims {
            sub: "reader".to_string(),
            user_id,
            membership_type: MembershipType::Student,
            is_librarian: false,
            is_staff,
            exp: i64::MAX,
            iat: 0,
        }
    }

    #[test]
    fn open_documents_need_no_user() {
        let doc = document(AccessLevel::Open, None);
        assert!(doc.is_accessible(None, Utc::now().date_naive()));
    }

    #[test]
    fn restricted_documents_need_any_authenticated_user() {
        let doc = document(AccessLevel::Restricted, None);
        let today = Utc::now().date_naive();
        assert!(!doc.is_accessible(None, today));
        assert!(doc.is_accessible(Some(&user(99, false)), today));
    }

    #[test]
    fn embargo_lifts_on_the_embargo_date() {
        let today = Utc::now().date_naive();
        let lifted = document(AccessLevel::Embargoed, Some(today - Duration::days(1)));
        let held = document(AccessLevel::Embargoed, Some(today + Duration::days(30)));
        let unset = document(AccessLevel::Embargoed, None);
        assert!(lifted.is_accessible(None, today));
        assert!(!held.is_accessible(None, today));
        assert!(unset.is_accessible(None, today));
    }

    #[test]
    fn private_documents_limited_to_submitter_and_staff() {
        let doc = document(AccessLevel::Private, None);
        let today = Utc::now().date_naive();
        assert!(!doc.is_accessible(None, today));
        assert!(!doc.is_accessible(Some(&user(99, false)), today));
        assert!(doc.is_accessible(Some(&user(7, false)), today));
        assert!(doc.is_accessible(Some(&user(99, true)), today));
    }
}
