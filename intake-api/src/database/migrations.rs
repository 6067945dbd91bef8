use rusqlite::Connection;

/// Tables in drop order: dependents before `Candidate`
const TABLES: &[&str] = &["PDFData", "Education", "Skills", "Experience", "Candidate"];

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create Candidate table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Candidate (
            candidate_id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT,
            middle_name TEXT,
            last_name TEXT,
            permanent_address TEXT,
            current_address TEXT,
            date_of_birth DATE,
            age INTEGER,
            gender TEXT,
            passport_number TEXT UNIQUE,
            mobile TEXT,
            pan_number TEXT UNIQUE,
            visa_status TEXT,
            email TEXT UNIQUE,
            emergency_contact_name TEXT,
            emergency_contact_number TEXT,
            relocation_availability TEXT
        )",
        [],
    )?;

    // Create Experience table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Experience (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id INTEGER,
            company TEXT,
            position TEXT,
            start_date DATE,
            end_date DATE,
            responsibilities TEXT,
            FOREIGN KEY (candidate_id) REFERENCES Candidate(candidate_id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Create Skills table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Skills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id INTEGER,
            skill_name TEXT,
            proficiency TEXT,
            FOREIGN KEY (candidate_id) REFERENCES Candidate(candidate_id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Create Education table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS Education (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id INTEGER,
            institution TEXT,
            degree TEXT,
            graduation_date DATE,
            gpa FLOAT,
            FOREIGN KEY (candidate_id) REFERENCES Candidate(candidate_id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Create PDFData table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS PDFData (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            candidate_id INTEGER,
            pdf_path TEXT,
            processed_date TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (candidate_id) REFERENCES Candidate(candidate_id) ON DELETE CASCADE
        )",
        [],
    )?;

    // Create indexes for performance
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_pdfdata_candidate ON PDFData(candidate_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_experience_candidate ON Experience(candidate_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_skills_candidate ON Skills(candidate_id)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_education_candidate ON Education(candidate_id)",
        [],
    )?;

    Ok(())
}

/// Drop every table and recreate the schema from scratch
pub fn reset_schema(conn: &Connection) -> anyhow::Result<()> {
    for table in TABLES {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
    }

    run_migrations(conn)
}
