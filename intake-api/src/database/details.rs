//! Experience, Skills and Education rows. Extraction never fills these;
//! they are written through the store API and read back as candidate details.

use rusqlite::params;
use shared_types::{
    CandidateDetailsResponse, CreateEducationRequest, CreateExperienceRequest,
    CreateSkillRequest, Education, Experience, Skill,
};

use crate::database::candidates::{column_text, get_candidate};
pub use crate::database::{DbPool, StoreError};

pub async fn insert_experience(
    pool: DbPool,
    candidate_id: i64,
    request: &CreateExperienceRequest,
) -> Result<i64, StoreError> {
    let conn = pool.lock().await?;

    let id: i64 = conn.query_row(
        "INSERT INTO Experience (candidate_id, company, position, start_date, end_date, responsibilities)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING id",
        params![
            candidate_id,
            request.company,
            request.position,
            request.start_date,
            request.end_date,
            request.responsibilities,
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn list_experience(pool: DbPool, candidate_id: i64) -> Result<Vec<Experience>, StoreError> {
    let conn = pool.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, candidate_id, company, position, start_date, end_date, responsibilities
         FROM Experience WHERE candidate_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map(params![candidate_id], |row| {
            Ok(Experience {
                id: row.get(0)?,
                candidate_id: row.get(1)?,
                company: row.get(2)?,
                position: row.get(3)?,
                start_date: column_text(row, 4)?,
                end_date: column_text(row, 5)?,
                responsibilities: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub async fn insert_skill(
    pool: DbPool,
    candidate_id: i64,
    request: &CreateSkillRequest,
) -> Result<i64, StoreError> {
    let conn = pool.lock().await?;

    let id: i64 = conn.query_row(
        "INSERT INTO Skills (candidate_id, skill_name, proficiency)
         VALUES (?1, ?2, ?3)
         RETURNING id",
        params![candidate_id, request.skill_name, request.proficiency],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn list_skills(pool: DbPool, candidate_id: i64) -> Result<Vec<Skill>, StoreError> {
    let conn = pool.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, candidate_id, skill_name, proficiency
         FROM Skills WHERE candidate_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map(params![candidate_id], |row| {
            Ok(Skill {
                id: row.get(0)?,
                candidate_id: row.get(1)?,
                skill_name: row.get(2)?,
                proficiency: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

pub async fn insert_education(
    pool: DbPool,
    candidate_id: i64,
    request: &CreateEducationRequest,
) -> Result<i64, StoreError> {
    let conn = pool.lock().await?;

    let id: i64 = conn.query_row(
        "INSERT INTO Education (candidate_id, institution, degree, graduation_date, gpa)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
        params![
            candidate_id,
            request.institution,
            request.degree,
            request.graduation_date,
            request.gpa,
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn list_education(pool: DbPool, candidate_id: i64) -> Result<Vec<Education>, StoreError> {
    let conn = pool.lock().await?;

    let mut stmt = conn.prepare(
        "SELECT id, candidate_id, institution, degree, graduation_date, gpa
         FROM Education WHERE candidate_id = ?1 ORDER BY id",
    )?;

    let rows = stmt
        .query_map(params![candidate_id], |row| {
            Ok(Education {
                id: row.get(0)?,
                candidate_id: row.get(1)?,
                institution: row.get(2)?,
                degree: row.get(3)?,
                graduation_date: column_text(row, 4)?,
                gpa: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// A candidate together with all of its dependent rows
pub async fn get_candidate_details(
    pool: DbPool,
    candidate_id: i64,
) -> Result<CandidateDetailsResponse, StoreError> {
    let candidate = get_candidate(pool.clone(), candidate_id).await?;
    let experience = list_experience(pool.clone(), candidate_id).await?;
    let skills = list_skills(pool.clone(), candidate_id).await?;
    let education = list_education(pool, candidate_id).await?;

    Ok(CandidateDetailsResponse {
        candidate,
        experience,
        skills,
        education,
    })
}
