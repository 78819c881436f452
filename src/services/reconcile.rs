use crate::models::{FileContent, FileSet, ProjectFile};

/// What a single upsert did to the file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Replaced,
}

/// Counts from folding a batch into a file set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub inserted: usize,
    pub replaced: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.replaced
    }
}

/// Add or replace one file.
///
/// An existing entry at `path` keeps its position and has its content (and
/// therefore its text/binary kind) replaced; otherwise the file is appended.
pub fn upsert(files: &mut FileSet, path: impl Into<String>, content: FileContent) -> UpsertOutcome {
    let path = path.into();
    match files.insert(path, content) {
        Some(_) => UpsertOutcome::Replaced,
        None => UpsertOutcome::Inserted,
    }
}

/// Fold a batch in order, one upsert per file.
///
/// Later files in the batch overwrite earlier ones at the same path.
pub fn merge<I>(files: &mut FileSet, batch: I) -> MergeSummary
where
    I: IntoIterator<Item = ProjectFile>,
{
    let mut summary = MergeSummary::default();
    for file in batch {
        match upsert(files, file.path, file.content) {
            UpsertOutcome::Inserted => summary.inserted += 1,
            UpsertOutcome::Replaced => summary.replaced += 1,
        }
    }

    tracing::debug!(
        "Merged batch: {} inserted, {} replaced, {} files total",
        summary.inserted,
        summary.replaced,
        files.len()
    );

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_set() -> FileSet {
        [
            ProjectFile::text("manifest.json", "{}"),
            ProjectFile::text("scripts/main.js", "// main"),
            ProjectFile::binary("pack_icon.png", vec![1, 2, 3]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_upsert_appends_new_path() {
        let mut files = sample_set();
        let outcome = upsert(&mut files, "scripts/util.js", "export {}".into());

        assert_eq!(outcome, UpsertOutcome::Inserted);
        assert_eq!(files.len(), 4);
        assert_eq!(files.position("scripts/util.js"), Some(3));
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut files = sample_set();
        let outcome = upsert(&mut files, "scripts/main.js", "// v2".into());

        assert_eq!(outcome, UpsertOutcome::Replaced);
        assert_eq!(files.len(), 3);
        assert_eq!(files.position("scripts/main.js"), Some(1));
        assert_eq!(files.get("scripts/main.js"), Some(&FileContent::Text("// v2".into())));
    }

    #[test]
    fn test_upsert_switches_kind() {
        let mut files = sample_set();
        upsert(&mut files, "pack_icon.png", FileContent::Text("oops".into()));
        assert_eq!(files.get("pack_icon.png").and_then(FileContent::as_text), Some("oops"));
    }

    #[test]
    fn test_upsert_same_path_twice_keeps_last_and_size() {
        let mut files = sample_set();
        let before = files.len();
        upsert(&mut files, "scripts/main.js", "a".into());
        upsert(&mut files, "scripts/main.js", "b".into());

        assert_eq!(files.len(), before);
        assert_eq!(files.get("scripts/main.js").and_then(FileContent::as_text), Some("b"));
    }

    #[test]
    fn test_merge_batch_in_order() {
        let mut files = sample_set();
        let summary = merge(
            &mut files,
            vec![
                ProjectFile::text("entities/cow.json", "{\"a\":1}"),
                ProjectFile::text("scripts/main.js", "// new"),
                ProjectFile::text("entities/cow.json", "{\"a\":2}"),
            ],
        );

        assert_eq!(summary, MergeSummary { inserted: 1, replaced: 2 });
        assert_eq!(summary.total(), 3);
        assert_eq!(files.len(), 4);
        assert_eq!(
            files.get("entities/cow.json").and_then(FileContent::as_text),
            Some("{\"a\":2}")
        );
        // unrelated entries untouched
        assert_eq!(files.get("pack_icon.png"), Some(&FileContent::Binary(vec![1, 2, 3])));
    }

    proptest! {
        #[test]
        fn prop_upsert_is_idempotent(path in "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.js", body in ".*") {
            let mut once = sample_set();
            upsert(&mut once, path.clone(), FileContent::Text(body.clone()));

            let mut twice = once.clone();
            upsert(&mut twice, path, FileContent::Text(body));

            prop_assert_eq!(once, twice);
        }
    }
}
