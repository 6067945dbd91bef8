use crate::config::{StorageConfig, TablesConfig};
use crate::database::candidates as candidates_db;
use crate::database::{DbPool, StoreError};
use extractors::{
    CandidateFieldExtractor, FieldExtractor, ImageExtractor, NoopTableExtractor,
    PdfTextExtractor, PdftotextTableExtractor, TableExtractor,
};
use shared_types::{ExtractionError, ProcessedDocument};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Failed to save upload to {path}: {source}")]
    Upload {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Text extraction failed: {0}")]
    Decode(#[from] ExtractionError),

    #[error("Failed to store candidate data: {0}")]
    Storage(#[from] StoreError),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Runs one document through text decoding, field extraction, best-effort
/// asset extraction and storage.
pub struct IntakeManager {
    db_pool: DbPool,
    text_extractor: PdfTextExtractor,
    field_extractor: CandidateFieldExtractor,
    image_extractor: ImageExtractor,
    table_extractor: Arc<dyn TableExtractor>,
    upload_dir: PathBuf,
}

impl IntakeManager {
    pub fn new(
        db_pool: DbPool,
        storage: &StorageConfig,
        tables: &TablesConfig,
    ) -> anyhow::Result<Self> {
        let table_extractor: Arc<dyn TableExtractor> =
            if tables.enabled && PdftotextTableExtractor::is_available() {
                Arc::new(PdftotextTableExtractor::new())
            } else {
                if tables.enabled {
                    tracing::warn!("pdftotext not found, table extraction disabled");
                }
                Arc::new(NoopTableExtractor)
            };

        let image_extractor = ImageExtractor::new(&storage.image_dir);

        tracing::info!("Table extraction backend: {}", table_extractor.backend_name());
        tracing::info!(
            "Extracted images go to {}",
            image_extractor.output_dir().display()
        );

        Ok(Self {
            db_pool,
            text_extractor: PdfTextExtractor::new(),
            field_extractor: CandidateFieldExtractor::new()?,
            image_extractor,
            table_extractor,
            upload_dir: PathBuf::from(&storage.upload_dir),
        })
    }

    pub fn with_table_extractor(mut self, table_extractor: Arc<dyn TableExtractor>) -> Self {
        self.table_extractor = table_extractor;
        self
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Save uploaded bytes under the upload directory and process them.
    /// Only the final component of `file_name` is used; an existing file of
    /// the same name is overwritten.
    pub async fn process_upload(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<ProcessedDocument, IntakeError> {
        let base_name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| IntakeError::InvalidFileName(file_name.to_string()))?;

        let target = self.upload_dir.join(base_name);
        let upload_error = |source| IntakeError::Upload {
            path: target.display().to_string(),
            source,
        };

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(upload_error)?;
        tokio::fs::write(&target, bytes).await.map_err(upload_error)?;

        tracing::debug!("Saved upload of {} bytes to {}", bytes.len(), target.display());

        self.process_pdf(&target).await
    }

    pub async fn process_pdf(&self, pdf_path: &Path) -> Result<ProcessedDocument, IntakeError> {
        let path = pdf_path.to_path_buf();
        tracing::info!("Processing {}", path.display());

        let text = {
            let extractor = self.text_extractor;
            let path = path.clone();
            tokio::task::spawn_blocking(move || extractor.extract_file(&path))
                .await
                .map_err(|e| IntakeError::Task(e.to_string()))?
        };

        let text = match text {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Could not extract text from {}: {}", path.display(), e);
                return Err(e.into());
            }
        };

        let fields = self.field_extractor.extract(&text);
        tracing::debug!(
            "Matched {} of {} fields in {}",
            fields.len(),
            self.field_extractor.pattern_count(),
            path.display()
        );

        let (tables, images) = self.extract_assets(&path).await;
        if !tables.is_empty() {
            tracing::info!("Found {} tables in {}", tables.len(), path.display());
        }
        if !images.is_empty() {
            tracing::info!("Extracted {} images from {}", images.len(), path.display());
        }

        let pdf_path = path.display().to_string();
        let candidate_id =
            match candidates_db::create_candidate(self.db_pool.clone(), &fields, &pdf_path).await
            {
                Ok(id) => id,
                Err(e) => {
                    tracing::warn!("Failed to store candidate data for {}: {}", pdf_path, e);
                    return Err(e.into());
                }
            };

        tracing::info!("Stored candidate {} from {}", candidate_id, pdf_path);

        Ok(ProcessedDocument {
            candidate_id,
            pdf_path,
            fields,
            images: images
                .iter()
                .map(|image| image.display().to_string())
                .collect(),
            tables: tables.len(),
        })
    }

    /// Tables then images, each on its own blocking task so a crash in one
    /// backend only costs that kind of asset
    async fn extract_assets(&self, path: &Path) -> (Vec<extractors::Table>, Vec<PathBuf>) {
        let table_extractor = self.table_extractor.clone();
        let table_path = path.to_path_buf();
        let tables = tokio::task::spawn_blocking(move || table_extractor.extract_tables(&table_path))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Table extraction task failed: {}", e);
                Vec::new()
            });

        let image_extractor = self.image_extractor.clone();
        let image_path = path.to_path_buf();
        let images = tokio::task::spawn_blocking(move || image_extractor.extract(&image_path))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!("Image extraction task failed: {}", e);
                Vec::new()
            });

        (tables, images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::temp_database;
    use extractors::Table;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    fn form_pdf(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![50.into(), 750.into()]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-20).into()]));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    fn manager(pool: DbPool, root: &Path) -> IntakeManager {
        let storage = StorageConfig {
            upload_dir: root.join("uploads").display().to_string(),
            image_dir: root.join("extracted_images").display().to_string(),
            ..Default::default()
        };
        IntakeManager::new(pool, &storage, &TablesConfig { enabled: false }).unwrap()
    }

    #[tokio::test]
    async fn test_upload_is_extracted_and_stored() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path());
        let pdf = form_pdf(&[
            "Email ID: asha.rao@example.com_",
            "Date of Birth: 05/ 03/1990",
            "Mobile: _9876543210_",
        ]);

        let document = manager.process_upload("asha.pdf", &pdf).await.unwrap();

        assert_eq!(document.fields.get("dob"), Some("05/ 03/1990"));
        assert_eq!(document.fields.get("mobile"), Some("9876543210"));
        assert_eq!(document.fields.get("email"), Some("asha.rao@example.com"));
        assert!(!document.fields.contains("passport"));
        assert!(document.images.is_empty());
        assert_eq!(document.tables, 0);

        let record = candidates_db::get_candidate(db.pool.clone(), document.candidate_id)
            .await
            .unwrap();
        assert_eq!(record.date_of_birth.as_deref(), Some("05/ 03/1990"));
        assert_eq!(record.mobile.as_deref(), Some("9876543210"));
        assert_eq!(record.email.as_deref(), Some("asha.rao@example.com"));
        assert_eq!(record.pdf_path.as_deref(), Some(document.pdf_path.as_str()));
    }

    struct PanickingTables;

    impl TableExtractor for PanickingTables {
        fn extract_tables(&self, _pdf_path: &Path) -> Vec<Table> {
            panic!("table backend crashed");
        }

        fn backend_name(&self) -> &str {
            "panicking"
        }
    }

    struct FixedTables;

    impl TableExtractor for FixedTables {
        fn extract_tables(&self, _pdf_path: &Path) -> Vec<Table> {
            vec![Table {
                page_number: 1,
                rows: vec![
                    vec!["Skill".to_string(), "Level".to_string()],
                    vec!["Rust".to_string(), "Expert".to_string()],
                ],
            }]
        }

        fn backend_name(&self) -> &str {
            "fixed"
        }
    }

    #[tokio::test]
    async fn test_table_backend_panic_still_stores_candidate() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path())
            .with_table_extractor(Arc::new(PanickingTables));
        let pdf = form_pdf(&["Mobile: _9876543210_"]);

        let document = manager.process_upload("a.pdf", &pdf).await.unwrap();

        assert_eq!(document.tables, 0);
        assert!(document.images.is_empty());
        let record = candidates_db::get_candidate(db.pool.clone(), document.candidate_id)
            .await
            .unwrap();
        assert_eq!(record.mobile.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn test_table_count_comes_from_backend() {
        let (dir, db) = temp_database();
        let manager =
            manager(db.pool.clone(), dir.path()).with_table_extractor(Arc::new(FixedTables));
        let pdf = form_pdf(&["Age: 34"]);

        let document = manager.process_upload("b.pdf", &pdf).await.unwrap();
        assert_eq!(document.tables, 1);
        assert_eq!(document.fields.get("age"), Some("34"));
    }

    #[tokio::test]
    async fn test_non_pdf_creates_no_rows() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path());

        let err = manager
            .process_upload("resume.pdf", b"this is a plain text file")
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Decode(_)));

        assert!(candidates_db::list_candidates(db.pool.clone())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_upload_keeps_only_final_path_component() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path());

        let _ = manager.process_upload("../../outside/cv.pdf", b"not a pdf").await;

        assert!(manager.upload_dir().join("cv.pdf").exists());
        assert!(!dir.path().join("outside").exists());
    }

    #[tokio::test]
    async fn test_missing_file_is_a_decode_failure() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path());

        let err = manager
            .process_pdf(&dir.path().join("missing.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, IntakeError::Decode(ExtractionError::Io { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_email_surfaces_constraint_violation() {
        let (dir, db) = temp_database();
        let manager = manager(db.pool.clone(), dir.path());
        let pdf = form_pdf(&["Email ID: asha.rao@example.com_", "Age: 34"]);

        manager.process_upload("first.pdf", &pdf).await.unwrap();
        let err = manager.process_upload("second.pdf", &pdf).await.unwrap_err();

        assert!(matches!(
            err,
            IntakeError::Storage(StoreError::ConstraintViolation(_))
        ));
        assert_eq!(
            candidates_db::list_candidates(db.pool.clone())
                .await
                .unwrap()
                .len(),
            1
        );
    }
}
