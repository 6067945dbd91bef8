use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Candidate types
    types.push(clean_type(CandidateRecord::export_to_string()?));
    types.push(clean_type(CandidatesResponse::export_to_string()?));
    types.push(clean_type(CandidateDetailsResponse::export_to_string()?));
    types.push(clean_type(DeleteCandidateResponse::export_to_string()?));

    // Dormant detail tables
    types.push(clean_type(Experience::export_to_string()?));
    types.push(clean_type(Skill::export_to_string()?));
    types.push(clean_type(Education::export_to_string()?));
    types.push(clean_type(CreateExperienceRequest::export_to_string()?));
    types.push(clean_type(CreateSkillRequest::export_to_string()?));
    types.push(clean_type(CreateEducationRequest::export_to_string()?));

    // Intake types
    types.push(clean_type(ExtractedFields::export_to_string()?));
    types.push(clean_type(ProcessedDocument::export_to_string()?));
    types.push(clean_type(ProcessedDocumentResponse::export_to_string()?));
    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "api-types".to_string());
    let output_dir = Path::new(&output_dir);
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strip the per-file header and imports; every type lands in one module
fn clean_type(type_def: String) -> String {
    let body = type_def
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n", body.trim())
}
