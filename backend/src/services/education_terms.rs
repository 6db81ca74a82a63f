//! Education terms: date ordering, one term kind per year, no overlap.

use std::cmp::Ordering;

use chrono::NaiveDate;
use log::info;
use serde::Deserialize;

use super::error::{ServiceError, ServiceResult};
use super::pagination::{paginate, Page, PageRequest, Sortable};
use crate::db::repository::FullRepository;
use crate::models::{EducationTerm, EducationTermId, Term};

#[derive(Debug, Clone, Deserialize)]
pub struct EducationTermRequest {
    pub term: Term,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub last_registration_date: NaiveDate,
}

impl EducationTermRequest {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.last_registration_date > self.start_date {
            return Err(ServiceError::bad_request(
                "Last registration date can not be after the start date",
            ));
        }
        if self.end_date < self.start_date {
            return Err(ServiceError::bad_request(
                "End date can not be before the start date",
            ));
        }
        Ok(())
    }

    fn to_term(&self, id: Option<EducationTermId>) -> EducationTerm {
        EducationTerm {
            id,
            term: self.term,
            start_date: self.start_date,
            end_date: self.end_date,
            last_registration_date: self.last_registration_date,
        }
    }
}

impl Sortable for EducationTerm {
    const SORT_FIELDS: &'static [&'static str] =
        &["id", "term", "start_date", "end_date", "last_registration_date"];

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "term" => (self.term as u8).cmp(&(other.term as u8)),
            "start_date" => self.start_date.cmp(&other.start_date),
            "end_date" => self.end_date.cmp(&other.end_date),
            "last_registration_date" => self
                .last_registration_date
                .cmp(&other.last_registration_date),
            _ => self.id.cmp(&other.id),
        }
    }
}

/// Compare `candidate` with every other term of the same year.
async fn check_calendar<R: FullRepository + ?Sized>(
    repo: &R,
    candidate: &EducationTerm,
) -> ServiceResult<()> {
    let terms = repo.list_education_terms().await?;
    let same_year = terms
        .iter()
        .filter(|t| t.id != candidate.id)
        .filter(|t| t.year() == candidate.year());

    for other in same_year {
        if other.term == candidate.term {
            return Err(ServiceError::conflict(format!(
                "Education term {:?} already exists for {}",
                candidate.term,
                candidate.year()
            )));
        }
        if other.span().overlaps(&candidate.span()) {
            return Err(ServiceError::conflict(format!(
                "Education term dates {} to {} overlap an existing term ({} to {})",
                candidate.start_date, candidate.end_date, other.start_date, other.end_date
            )));
        }
    }
    Ok(())
}

pub async fn save_education_term<R: FullRepository + ?Sized>(
    repo: &R,
    request: &EducationTermRequest,
) -> ServiceResult<EducationTerm> {
    request.validate()?;
    let term = request.to_term(None);
    check_calendar(repo, &term).await?;

    let saved = repo.save_education_term(&term).await?;
    info!(
        "Saved education term {:?} {} to {}",
        saved.term, saved.start_date, saved.end_date
    );
    Ok(saved)
}

/// The term being updated is excluded from its own uniqueness and overlap
/// checks.
pub async fn update_education_term<R: FullRepository + ?Sized>(
    repo: &R,
    id: EducationTermId,
    request: &EducationTermRequest,
) -> ServiceResult<EducationTerm> {
    repo.get_education_term(id).await?;
    request.validate()?;
    let term = request.to_term(Some(id));
    check_calendar(repo, &term).await?;
    Ok(repo.save_education_term(&term).await?)
}

pub async fn get_education_term<R: FullRepository + ?Sized>(
    repo: &R,
    id: EducationTermId,
) -> ServiceResult<EducationTerm> {
    Ok(repo.get_education_term(id).await?)
}

pub async fn list_education_terms<R: FullRepository + ?Sized>(
    repo: &R,
) -> ServiceResult<Vec<EducationTerm>> {
    Ok(repo.list_education_terms().await?)
}

pub async fn page_education_terms<R: FullRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ServiceResult<Page<EducationTerm>> {
    paginate(repo.list_education_terms().await?, page, "start_date")
}

pub async fn delete_education_term<R: FullRepository + ?Sized>(
    repo: &R,
    id: EducationTermId,
) -> ServiceResult<()> {
    repo.delete_education_term(id).await?;
    info!("Deleted education term {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn fall(year: i32) -> EducationTermRequest {
        EducationTermRequest {
            term: Term::FallSemester,
            start_date: d(year, 9, 1),
            end_date: d(year, 12, 31),
            last_registration_date: d(year, 8, 15),
        }
    }

    fn spring(year: i32) -> EducationTermRequest {
        EducationTermRequest {
            term: Term::SpringSemester,
            start_date: d(year, 2, 1),
            end_date: d(year, 6, 15),
            last_registration_date: d(year, 1, 20),
        }
    }

    #[test]
    fn test_date_order_validation() {
        let mut req = fall(2024);
        req.last_registration_date = d(2024, 9, 2);
        assert!(matches!(req.validate(), Err(ServiceError::BadRequest(_))));

        let mut req = fall(2024);
        req.end_date = d(2024, 8, 31);
        assert!(req.validate().is_err());

        let mut req = fall(2024);
        req.last_registration_date = req.start_date;
        assert!(req.validate().is_ok());
    }

    #[tokio::test]
    async fn test_one_term_kind_per_year() {
        let repo = LocalRepository::new();
        save_education_term(&repo, &fall(2024)).await.unwrap();
        save_education_term(&repo, &spring(2024)).await.unwrap();
        save_education_term(&repo, &fall(2025)).await.unwrap();

        let err = save_education_term(&repo, &fall(2024)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_overlapping_terms_conflict() {
        let repo = LocalRepository::new();
        save_education_term(&repo, &spring(2024)).await.unwrap();
        let mut req = fall(2024);
        req.start_date = d(2024, 6, 1);
        req.last_registration_date = d(2024, 5, 1);
        let err = save_education_term(&repo, &req).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(m) if m.contains("overlap")));
    }

    #[tokio::test]
    async fn test_update_does_not_collide_with_itself() {
        let repo = LocalRepository::new();
        let term = save_education_term(&repo, &fall(2024)).await.unwrap();
        let mut req = fall(2024);
        req.end_date = d(2025, 1, 15);
        let updated = update_education_term(&repo, term.id.unwrap(), &req).await.unwrap();
        assert_eq!(updated.end_date, d(2025, 1, 15));
        assert_eq!(list_education_terms(&repo).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_term_is_not_found() {
        let repo = LocalRepository::new();
        assert!(matches!(
            update_education_term(&repo, EducationTermId(3), &fall(2024)).await,
            Err(ServiceError::NotFound(_))
        ));
    }
}
