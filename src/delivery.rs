//! Handing finished artifacts to the user.
//!
//! A [`SaveTarget`] is the host's "save as" capability. The CLI uses
//! [`DirectoryTarget`]; tests use a recording target.

use crate::naming::{contact_file_name, unique_name};
use crate::output::NormalizeReport;
use crate::types::ContactRecord;
use crate::vcard::{VCARD_MEDIA_TYPE, export_vcard};
use log::debug;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to persist {name}: {reason}")]
    Persist { name: String, reason: String },
}

pub trait SaveTarget {
    /// Save `bytes` under `name`. Returns where the file ended up.
    fn save_as(&self, bytes: &[u8], name: &str, media_type: &str)
    -> Result<PathBuf, DeliveryError>;
}

/// Saves into a directory on the local filesystem.
///
/// Bytes are written to a temporary file in the same directory and renamed
/// into place, so a failed save never leaves a truncated file behind.
/// Existing files with the same name are replaced.
pub struct DirectoryTarget {
    dir: PathBuf,
}

impl DirectoryTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SaveTarget for DirectoryTarget {
    fn save_as(
        &self,
        bytes: &[u8],
        name: &str,
        media_type: &str,
    ) -> Result<PathBuf, DeliveryError> {
        std::fs::create_dir_all(&self.dir)?;
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;

        let dest = self.dir.join(name);
        tmp.persist(&dest).map_err(|e| DeliveryError::Persist {
            name: name.to_string(),
            reason: e.error.to_string(),
        })?;
        debug!("saved {} ({}, {} bytes)", dest.display(), media_type, bytes.len());
        Ok(dest)
    }
}

/// Deliver an exported vCard document under a suggested name.
pub fn deliver(
    target: &impl SaveTarget,
    document: &str,
    suggested_name: &str,
) -> Result<PathBuf, DeliveryError> {
    target.save_as(document.as_bytes(), suggested_name, VCARD_MEDIA_TYPE)
}

/// Export a record and deliver it as `<name>.vcf`.
pub fn save_contact(
    target: &impl SaveTarget,
    record: &ContactRecord,
) -> Result<PathBuf, DeliveryError> {
    deliver(target, &export_vcard(record), &contact_file_name(&record.name))
}

/// Save the image of every successful report.
///
/// Images whose names collide with an earlier one in the batch get a numbered
/// name (`me.png`, `me-1.png`) and the report is updated to match. A failed
/// save turns that report into a failure; the remaining images are still saved.
pub fn save_normalized(target: &impl SaveTarget, reports: &mut [NormalizeReport]) {
    let mut taken = HashSet::new();
    for report in reports.iter_mut() {
        let Ok(img) = &mut report.result else {
            continue;
        };
        let name = unique_name(&img.file_name, &mut taken);
        if name != img.file_name {
            debug!("{}: {} already used, saving as {}", report.input, img.file_name, name);
            img.file_name = name;
        }
        if let Err(e) = target.save_as(&img.bytes, &img.file_name, img.media_type) {
            debug!("{}: save failed: {}", report.input, e);
            report.result = Err(e.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Dimensions, NormalizeError, NormalizedImage};
    use crate::output::ReportError;
    use crate::test_helpers::{full_record, record_named};
    use std::sync::Mutex;
    use std::time::SystemTime;

    fn report(input: &str, file_name: &str, bytes: &[u8]) -> NormalizeReport {
        NormalizeReport {
            input: input.to_string(),
            input_size: None,
            result: Ok(NormalizedImage {
                bytes: bytes.to_vec(),
                file_name: file_name.to_string(),
                media_type: "image/png",
                dimensions: Dimensions {
                    width: 1,
                    height: 1,
                },
                last_modified: SystemTime::now(),
            }),
        }
    }

    fn saved_name(report: &NormalizeReport) -> &str {
        match &report.result {
            Ok(img) => &img.file_name,
            Err(e) => panic!("unexpected failure: {e}"),
        }
    }

    #[derive(Default)]
    struct RecordingTarget {
        saved: Mutex<Vec<(Vec<u8>, String, String)>>,
    }

    impl SaveTarget for RecordingTarget {
        fn save_as(
            &self,
            bytes: &[u8],
            name: &str,
            media_type: &str,
        ) -> Result<PathBuf, DeliveryError> {
            self.saved
                .lock()
                .unwrap()
                .push((bytes.to_vec(), name.to_string(), media_type.to_string()));
            Ok(PathBuf::from(name))
        }
    }

    #[test]
    fn save_contact_uses_vcard_media_type_and_name() {
        let target = RecordingTarget::default();
        save_contact(&target, &record_named("Анна Smith")).unwrap();

        let saved = target.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        let (bytes, name, media_type) = &saved[0];
        assert_eq!(name, "Анна_Smith.vcf");
        assert_eq!(media_type, "text/vcard;charset=utf-8");
        assert!(bytes.starts_with(b"BEGIN:VCARD\r\n"));
    }

    #[test]
    fn directory_target_writes_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = DirectoryTarget::new(tmp.path());

        let path = save_contact(&target, &full_record()).unwrap();
        assert_eq!(path, tmp.path().join("Jane_Q__Doe.vcf"));

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, export_vcard(&full_record()));
    }

    #[test]
    fn directory_target_creates_missing_dir_and_leaves_no_temp_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("cards/exported");
        let target = DirectoryTarget::new(&out);

        deliver(&target, "BEGIN:VCARD\r\nEND:VCARD", "x.vcf").unwrap();

        let entries: Vec<_> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("x.vcf")]);
    }

    #[test]
    fn directory_target_replaces_existing_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = DirectoryTarget::new(tmp.path());

        deliver(&target, "old", "x.vcf").unwrap();
        deliver(&target, "new", "x.vcf").unwrap();

        assert_eq!(std::fs::read_to_string(tmp.path().join("x.vcf")).unwrap(), "new");
    }

    #[test]
    fn persist_failure_is_reported() {
        let tmp = tempfile::TempDir::new().unwrap();
        // A directory already sits where the file should go
        std::fs::create_dir(tmp.path().join("taken.vcf")).unwrap();
        let target = DirectoryTarget::new(tmp.path());

        let err = deliver(&target, "doc", "taken.vcf").unwrap_err();
        assert!(matches!(err, DeliveryError::Persist { .. }));

        let leftovers = std::fs::read_dir(tmp.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temporary file was not cleaned up");
    }

    #[test]
    fn same_base_name_gets_numbered_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let target = DirectoryTarget::new(tmp.path());
        let mut reports = vec![
            report("in/a.png", "a.png", b"first"),
            report("in/sub/a.png", "a.png", b"second"),
            report("in/b.jpg", "b.png", b"third"),
        ];

        save_normalized(&target, &mut reports);

        assert_eq!(saved_name(&reports[0]), "a.png");
        assert_eq!(saved_name(&reports[1]), "a-1.png");
        assert_eq!(saved_name(&reports[2]), "b.png");
        assert_eq!(std::fs::read(tmp.path().join("a.png")).unwrap(), b"first");
        assert_eq!(std::fs::read(tmp.path().join("a-1.png")).unwrap(), b"second");
        assert_eq!(std::fs::read(tmp.path().join("b.png")).unwrap(), b"third");
    }

    #[test]
    fn failed_inputs_are_not_saved() {
        let target = RecordingTarget::default();
        let mut reports = vec![
            NormalizeReport {
                input: "x.txt".to_string(),
                input_size: None,
                result: Err(NormalizeError::Decode("bad magic".into()).into()),
            },
            report("y.jpg", "y.png", b"png"),
        ];

        save_normalized(&target, &mut reports);

        let saved = target.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].1, "y.png");
        assert_eq!(saved[0].2, "image/png");
    }

    #[test]
    fn save_failure_marks_only_that_report() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("a.png")).unwrap();
        let target = DirectoryTarget::new(tmp.path());
        let mut reports = vec![report("a.jpg", "a.png", b"a"), report("b.jpg", "b.png", b"b")];

        save_normalized(&target, &mut reports);

        assert!(matches!(
            reports[0].result,
            Err(ReportError::Save(DeliveryError::Persist { .. }))
        ));
        assert_eq!(saved_name(&reports[1]), "b.png");
        assert_eq!(std::fs::read(tmp.path().join("b.png")).unwrap(), b"b");
    }
}
