use rusqlite::types::ValueRef;
use rusqlite::{params, Row};
use shared_types::{CandidateRecord, ExtractedFields};

pub use crate::database::{DbPool, StoreError};

/// Candidate joined with its most recent PDFData row
const CANDIDATE_SELECT: &str = "SELECT c.candidate_id, c.first_name, c.middle_name, c.last_name,
        c.permanent_address, c.current_address, c.date_of_birth, c.age, c.gender,
        c.passport_number, c.mobile, c.pan_number, c.visa_status, c.email,
        c.emergency_contact_name, c.emergency_contact_number, c.relocation_availability,
        p.pdf_path, p.processed_date
     FROM Candidate c
     LEFT JOIN PDFData p
        ON p.id = (SELECT MAX(id) FROM PDFData WHERE candidate_id = c.candidate_id)";

/// Insert a candidate and the PDFData row for its source document in one
/// transaction. Returns the new candidate id.
pub async fn create_candidate(
    pool: DbPool,
    fields: &ExtractedFields,
    pdf_path: &str,
) -> Result<i64, StoreError> {
    let mut conn = pool.lock().await?;
    let tx = conn.transaction()?;

    let permanent_address = fields.address("permanent");
    let current_address = fields.address("current");

    let candidate_id: i64 = tx.query_row(
        "INSERT INTO Candidate (
            first_name, middle_name, last_name, permanent_address, current_address,
            date_of_birth, age, gender, passport_number, mobile, pan_number,
            visa_status, email, emergency_contact_name, emergency_contact_number,
            relocation_availability
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
         RETURNING candidate_id",
        params![
            fields.get("first_name"),
            fields.get("middle_name"),
            fields.get("last_name"),
            permanent_address,
            current_address,
            fields.get("dob"),
            fields.get("age"),
            fields.get("gender"),
            fields.get("passport"),
            fields.get("mobile"),
            fields.get("pan"),
            fields.get("visa"),
            fields.get("email"),
            fields.get("emergency_contact"),
            fields.get("emergency_number"),
            fields.get("relocation"),
        ],
        |row| row.get(0),
    )?;

    let processed_date = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string();

    tx.execute(
        "INSERT INTO PDFData (candidate_id, pdf_path, processed_date) VALUES (?1, ?2, ?3)",
        params![candidate_id, pdf_path, processed_date],
    )?;

    // Dropping an uncommitted transaction rolls it back
    tx.commit()?;

    Ok(candidate_id)
}

pub async fn list_candidates(pool: DbPool) -> Result<Vec<CandidateRecord>, StoreError> {
    let conn = pool.lock().await?;

    let mut stmt = conn.prepare(&format!("{} ORDER BY c.candidate_id", CANDIDATE_SELECT))?;
    let candidates = stmt
        .query_map([], map_candidate)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(candidates)
}

pub async fn get_candidate(pool: DbPool, candidate_id: i64) -> Result<CandidateRecord, StoreError> {
    let conn = pool.lock().await?;

    let candidate = conn.query_row(
        &format!("{} WHERE c.candidate_id = ?1", CANDIDATE_SELECT),
        params![candidate_id],
        map_candidate,
    )?;

    Ok(candidate)
}

/// Listing filtered by a case-insensitive substring over every displayed
/// value. An empty query returns everything.
pub async fn search_candidates(
    pool: DbPool,
    query: &str,
) -> Result<Vec<CandidateRecord>, StoreError> {
    let candidates = list_candidates(pool).await?;

    Ok(candidates
        .into_iter()
        .filter(|candidate| candidate.matches(query))
        .collect())
}

/// Delete a candidate and, through the cascades, all of its dependent rows.
/// Returns `false` when no such candidate existed.
pub async fn delete_candidate(pool: DbPool, candidate_id: i64) -> Result<bool, StoreError> {
    let conn = pool.lock().await?;

    let removed = conn.execute(
        "DELETE FROM Candidate WHERE candidate_id = ?1",
        params![candidate_id],
    )?;

    Ok(removed > 0)
}

fn map_candidate(row: &Row) -> rusqlite::Result<CandidateRecord> {
    Ok(CandidateRecord {
        candidate_id: row.get(0)?,
        first_name: column_text(row, 1)?,
        middle_name: column_text(row, 2)?,
        last_name: column_text(row, 3)?,
        permanent_address: column_text(row, 4)?,
        current_address: column_text(row, 5)?,
        date_of_birth: column_text(row, 6)?,
        age: column_text(row, 7)?,
        gender: column_text(row, 8)?,
        passport_number: column_text(row, 9)?,
        mobile: column_text(row, 10)?,
        pan_number: column_text(row, 11)?,
        visa_status: column_text(row, 12)?,
        email: column_text(row, 13)?,
        emergency_contact_name: column_text(row, 14)?,
        emergency_contact_number: column_text(row, 15)?,
        relocation_availability: column_text(row, 16)?,
        pdf_path: column_text(row, 17)?,
        processed_date: column_text(row, 18)?,
    })
}

/// Read a column as text whatever its storage class. DATE and INTEGER
/// affinity columns hold whatever the extractor captured.
pub(crate) fn column_text(row: &Row, idx: usize) -> rusqlite::Result<Option<String>> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) | ValueRef::Blob(t) => Some(String::from_utf8_lossy(t).into_owned()),
    })
}
