//! Task extraction from markdown documents.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::Task;
use crate::store::{DocumentStore, StoreError};

/// A checkbox line: optional indentation, `- [<marker>] `, then the text.
static TASK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*- \[(.)\] (.+?)\r?$").expect("valid task line regex"));

/// An inline due-date token with ASCII digits. The `due:` keyword is
/// case-insensitive.
static DUE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:@|#|due: ?|📅 ?)([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("valid due date regex")
});

/// Finds the first due-date token in `text`.
///
/// Returns the parsed date and the byte range of the whole token. A token
/// that is not a real calendar date (`2024-02-30`) yields `None`.
pub fn find_due_date(text: &str) -> Option<(NaiveDate, Range<usize>)> {
    let captures = DUE_TOKEN.captures(text)?;
    let token = captures.get(0)?;
    let date = NaiveDate::parse_from_str(captures.get(1)?.as_str(), "%Y-%m-%d").ok()?;
    Some((date, token.range()))
}

/// Extracts the tasks of a single document.
pub fn extract_document(path: &str, content: &str) -> Vec<Task> {
    TASK_LINE
        .captures_iter(content)
        .map(|captures| {
            let marker = &captures[1];
            let completed = marker == "x" || marker == "X";
            Task::new(path, &captures[2], completed)
        })
        .collect()
}

/// Extracts the tasks of several `(path, content)` documents, in order.
///
/// # Example
///
/// ```
/// use vault_calendar_core::task::extract;
///
/// let tasks = extract([
///     ("daily/2024-03-15.md", "# Friday\n- [ ] Buy milk 📅 2024-03-15\n- [x] Call mom\n"),
/// ]);
/// assert_eq!(tasks.len(), 2);
/// assert!(!tasks[0].completed);
/// assert!(tasks[1].completed);
/// ```
pub fn extract<I, P, C>(documents: I) -> Vec<Task>
where
    I: IntoIterator<Item = (P, C)>,
    P: AsRef<str>,
    C: AsRef<str>,
{
    documents
        .into_iter()
        .flat_map(|(path, content)| extract_document(path.as_ref(), content.as_ref()))
        .collect()
}

/// A document that could not be read during a scan.
#[derive(Debug)]
pub struct SkippedDocument {
    pub path: String,
    pub error: StoreError,
}

/// Result of scanning a store: the tasks found and the documents skipped.
#[derive(Debug, Default)]
pub struct Extraction {
    pub tasks: Vec<Task>,
    pub skipped: Vec<SkippedDocument>,
}

impl Extraction {
    /// Returns true if every document was read.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Reads every document of `store` and extracts its tasks.
///
/// Documents are read one after another. A document that cannot be read is
/// logged and recorded in [`Extraction::skipped`]; the scan continues with
/// the remaining documents.
///
/// # Errors
///
/// Returns an error only if the document list itself cannot be obtained.
pub async fn scan<S: DocumentStore>(store: &S) -> Result<Extraction, StoreError> {
    let paths = store.list_documents().await?;
    let mut extraction = Extraction::default();

    for path in paths {
        match store.read(&path).await {
            Ok(content) => extraction.tasks.extend(extract_document(&path, &content)),
            Err(error) => {
                tracing::warn!(path = %path, error = %error, "skipping unreadable document");
                extraction.skipped.push(SkippedDocument { path, error });
            }
        }
    }

    tracing::debug!(
        tasks = extraction.tasks.len(),
        skipped = extraction.skipped.len(),
        "task scan finished"
    );
    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ==================== Line Matching Tests ====================

    #[test]
    fn test_extract_open_and_completed() {
        let tasks = extract_document("a.md", "- [ ] open\n- [x] done\n- [X] also done\n");
        assert_eq!(tasks.len(), 3);
        assert!(!tasks[0].completed);
        assert!(tasks[1].completed);
        assert!(tasks[2].completed);
    }

    #[test]
    fn test_extract_other_markers_are_open() {
        let tasks = extract_document("a.md", "- [/] in progress\n- [-] cancelled\n");
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_extract_raw_text_excludes_marker() {
        let tasks = extract_document("a.md", "- [ ] Buy milk 📅 2024-03-15");
        assert_eq!(tasks[0].raw_text, "Buy milk 📅 2024-03-15");
        assert_eq!(tasks[0].source_path, "a.md");
    }

    #[test]
    fn test_extract_indented_tasks() {
        let tasks = extract_document("a.md", "- [ ] parent\n    - [ ] child\n\t- [x] tabbed\n");
        assert_eq!(tasks.len(), 3);
        assert_eq!(tasks[1].raw_text, "child");
    }

    #[test]
    fn test_extract_ignores_non_task_lines() {
        let content = "# Heading\n- plain bullet\n-[ ] no space\n- [ ]\n[ ] no dash\ntext - [ ] inline\n";
        assert!(extract_document("a.md", content).is_empty());
    }

    #[test]
    fn test_extract_crlf_line_endings() {
        let tasks = extract_document("a.md", "- [ ] first\r\n- [x] second\r\n");
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].raw_text, "first");
        assert_eq!(tasks[1].raw_text, "second");
    }

    #[test]
    fn test_extract_many_documents_in_order() {
        let tasks = extract(vec![
            ("b.md".to_string(), "- [ ] from b".to_string()),
            ("a.md".to_string(), "- [ ] from a".to_string()),
        ]);
        assert_eq!(tasks[0].source_path, "b.md");
        assert_eq!(tasks[1].source_path, "a.md");
    }

    // ==================== Due Date Tests ====================

    #[test]
    fn test_due_date_calendar_emoji() {
        let tasks = extract_document("a.md", "- [ ] Buy milk 📅 2024-03-15");
        assert_eq!(tasks[0].due_date, Some(date(2024, 3, 15)));
        assert!(!tasks[0].completed);
    }

    #[test]
    fn test_due_date_emoji_without_space() {
        assert_eq!(find_due_date("x 📅2024-03-15").map(|d| d.0), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_due_date_at_and_hash() {
        assert_eq!(find_due_date("x @2024-01-02").map(|d| d.0), Some(date(2024, 1, 2)));
        assert_eq!(find_due_date("x #2024-01-03").map(|d| d.0), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_due_date_keyword_case_insensitive() {
        assert_eq!(find_due_date("x due: 2024-05-06").map(|d| d.0), Some(date(2024, 5, 6)));
        assert_eq!(find_due_date("x due:2024-05-06").map(|d| d.0), Some(date(2024, 5, 6)));
        assert_eq!(find_due_date("x DUE: 2024-05-06").map(|d| d.0), Some(date(2024, 5, 6)));
        assert_eq!(find_due_date("x Due:2024-05-06").map(|d| d.0), Some(date(2024, 5, 6)));
    }

    #[test]
    fn test_due_date_requires_marker() {
        assert_eq!(find_due_date("released 2024-05-06"), None);
        assert_eq!(find_due_date("due:  2024-05-06"), None);
    }

    #[test]
    fn test_due_date_invalid_calendar_date() {
        assert_eq!(find_due_date("x 📅 2024-02-30"), None);
        assert_eq!(find_due_date("x @2023-13-01"), None);
    }

    #[test]
    fn test_due_date_first_token_wins() {
        assert_eq!(
            find_due_date("x @2024-01-01 📅 2024-02-02").map(|d| d.0),
            Some(date(2024, 1, 1))
        );
    }

    #[test]
    fn test_due_date_ascii_digits_only() {
        assert_eq!(find_due_date("x @２０２４-０３-１５"), None);
        assert_eq!(
            find_due_date("x @２０２４-０３-１５ 📅 2024-03-20").map(|d| d.0),
            Some(date(2024, 3, 20))
        );
    }

    #[test]
    fn test_due_date_token_range() {
        let text = "Pay rent due: 2024-04-01 now";
        let (_, range) = find_due_date(text).unwrap();
        assert_eq!(&text[range], "due: 2024-04-01");
    }

    // ==================== Scan Tests ====================

    #[tokio::test]
    async fn test_scan_skips_unreadable_documents() {
        let store = MemoryStore::new()
            .with_document("a.md", "- [ ] from a")
            .with_document("b.md", "- [ ] from b")
            .with_document("c.md", "- [x] from c")
            .with_unreadable("b.md");

        let extraction = scan(&store).await.unwrap();
        assert_eq!(extraction.tasks.len(), 2);
        assert_eq!(extraction.tasks[0].raw_text, "from a");
        assert_eq!(extraction.tasks[1].raw_text, "from c");
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].path, "b.md");
        assert!(!extraction.is_complete());
    }

    #[tokio::test]
    async fn test_scan_empty_store() {
        let extraction = scan(&MemoryStore::new()).await.unwrap();
        assert!(extraction.tasks.is_empty());
        assert!(extraction.is_complete());
    }
}
