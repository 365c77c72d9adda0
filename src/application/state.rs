//! Application state for the loan tracker.
//!
//! [`App`] owns the record store and the persistence bridge and is the only
//! place where mutations happen. Every mutation follows the same path:
//! compute the full next collection, save it, and only then commit it to the
//! store. A failed save leaves the store exactly as it was.

use crate::domain::{
    FormField, LoanDraft, LoanRecord, LoanStatus, LoanValidator, RecordStore, StatusFilter,
};
use crate::infrastructure::{
    CorruptionPolicy, CsvExporter, ExportError, PersistenceBridge, PersistenceResult,
};
use chrono::NaiveDate;

const DEFAULT_EXPORT_FILENAME: &str = "loans.csv";

/// Current interaction mode. Determines how keys are interpreted and which
/// modal is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Table navigation and shortcuts
    Normal,
    /// Add/edit modal form is open
    Form,
    /// Delete confirmation modal is open
    ConfirmDelete,
    /// CSV export filename prompt
    Export,
    /// Help popup
    Help,
}

/// Main application state: the loan collection plus everything the terminal
/// UI needs to render it.
///
/// # Examples
///
/// ```
/// use loanbook::application::{App, AppMode};
///
/// let app = App::default();
/// assert_eq!(app.mode, AppMode::Normal);
/// assert!(app.store().is_empty());
/// ```
#[derive(Debug)]
pub struct App {
    store: RecordStore,
    persistence: PersistenceBridge,
    /// Current application mode
    pub mode: AppMode,
    /// Status filter applied to the table
    pub filter: StatusFilter,
    /// Selected row, as an index into the filtered view
    pub selected: usize,
    /// Contents of the add/edit form
    pub draft: LoanDraft,
    /// Store position of the record open in the form, when editing
    pub editing_position: Option<usize>,
    /// Field of the form receiving keystrokes
    pub focused_field: FormField,
    /// Cursor position, in characters, within the active input
    pub cursor_position: usize,
    /// Record staged for deletion, awaiting confirmation
    pub pending_delete: Option<LoanRecord>,
    /// Filename buffer for CSV export
    pub filename_input: String,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Scroll position in help text
    pub help_scroll: usize,
}

impl Default for App {
    fn default() -> Self {
        Self::new(RecordStore::default(), PersistenceBridge::in_memory())
    }
}

impl App {
    pub fn new(store: RecordStore, persistence: PersistenceBridge) -> Self {
        Self {
            store,
            persistence,
            mode: AppMode::Normal,
            filter: StatusFilter::All,
            selected: 0,
            draft: LoanDraft::default(),
            editing_position: None,
            focused_field: FormField::Title,
            cursor_position: 0,
            pending_delete: None,
            filename_input: String::new(),
            status_message: None,
            help_scroll: 0,
        }
    }

    /// Loads the persisted collection once and builds the app around it.
    ///
    /// # Errors
    ///
    /// Storage failures, and corrupt data under [`CorruptionPolicy::FailFast`].
    pub fn start(mut persistence: PersistenceBridge, policy: CorruptionPolicy) -> PersistenceResult<Self> {
        let records = persistence.load_with_policy(policy)?;
        tracing::info!(count = records.len(), "loan records loaded");

        let mut store = RecordStore::default();
        store.replace_all(records);
        Ok(Self::new(store, persistence))
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Local calendar date used by the date rule of the form.
    pub fn today() -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    /// Records shown in the table under the current filter.
    pub fn visible_records(&self) -> Vec<&LoanRecord> {
        self.store.filtered(self.filter)
    }

    pub fn selected_record(&self) -> Option<&LoanRecord> {
        self.visible_records().get(self.selected).copied()
    }

    /// Position in the store of the selected row. Ids may repeat in legacy
    /// data, so row actions target this position rather than the id.
    pub fn selected_position(&self) -> Option<usize> {
        self.store.filtered_position(self.filter, self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.visible_records().len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.visible_records().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let visible = self.visible_records().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }

    /// Moves to the next status filter. The stored collection is untouched.
    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.clamp_selection();
        self.status_message = Some(format!("Filter: {}", self.filter.label()));
    }

    /// Persists `next` and, once that succeeds, makes it the store's contents.
    fn commit(&mut self, next: Vec<LoanRecord>) -> bool {
        match self.persistence.save(&next) {
            Ok(()) => {
                self.store.replace_all(next);
                self.clamp_selection();
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to persist loan records");
                self.status_message = Some(format!("Save failed: {err}"));
                false
            }
        }
    }

    /// Opens an empty form for a new loan.
    pub fn start_add(&mut self) {
        self.draft = LoanDraft::default();
        self.editing_position = None;
        self.open_form();
    }

    /// Opens the form pre-filled with the selected record.
    pub fn start_edit(&mut self) {
        let Some(position) = self.selected_position() else {
            self.status_message = Some("No loan selected".to_string());
            return;
        };
        let Some(record) = self.store.records().get(position) else {
            return;
        };
        self.draft = LoanDraft::from_record(record);
        self.editing_position = Some(position);
        self.open_form();
    }

    fn open_form(&mut self) {
        self.mode = AppMode::Form;
        self.focused_field = FormField::Title;
        self.cursor_position = self.draft.title.chars().count();
        self.status_message = None;
    }

    pub fn focus_next_field(&mut self) {
        self.focus_field(self.focused_field.next());
    }

    pub fn focus_previous_field(&mut self) {
        self.focus_field(self.focused_field.previous());
    }

    fn focus_field(&mut self, field: FormField) {
        self.focused_field = field;
        self.cursor_position = self.draft.field(field).chars().count();
    }

    /// Validates the form and applies it as an add or an edit.
    ///
    /// On a validation or save failure the form stays open with its
    /// contents, and the reason is shown in the status bar.
    pub fn submit_form(&mut self) {
        let editing = self.draft.editing_id;
        let id = match editing.or_else(|| self.store.next_id()) {
            Some(id) => id,
            None => {
                tracing::warn!("loan id space exhausted");
                self.status_message = Some("No loan id left to assign".to_string());
                return;
            }
        };

        let record = match LoanValidator::validate(&self.draft, id, Self::today()) {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(error = %err, "loan form rejected");
                self.status_message = Some(err.to_string());
                return;
            }
        };

        let title = record.title.clone();
        let mut next = self.store.records().to_vec();
        match self.editing_position {
            Some(position) => match next.get_mut(position) {
                Some(slot) => *slot = record,
                None => return,
            },
            None => next.push(record),
        }

        if self.commit(next) {
            tracing::info!(id, edit = editing.is_some(), "loan saved");
            self.status_message = Some(if editing.is_some() {
                format!("Updated \"{title}\"")
            } else {
                format!("Added \"{title}\"")
            });
            self.close_form();
        }
    }

    /// Closes the form without touching the store.
    pub fn cancel_form(&mut self) {
        self.close_form();
    }

    fn close_form(&mut self) {
        self.mode = AppMode::Normal;
        self.draft = LoanDraft::default();
        self.editing_position = None;
        self.focused_field = FormField::Title;
        self.cursor_position = 0;
    }

    /// Sets the status of the record at store `position`. No validation applies.
    pub fn set_status(&mut self, position: usize, status: LoanStatus) {
        let mut next = self.store.records().to_vec();
        let Some(record) = next.get_mut(position) else {
            return;
        };
        record.status = status;
        let id = record.id;

        if self.commit(next) {
            tracing::info!(id, status = %status, "loan status changed");
            self.status_message = Some(format!("Marked as {status}"));
        }
    }

    pub fn toggle_selected_status(&mut self) {
        if let Some(position) = self.selected_position() {
            if let Some(status) = self.store.records().get(position).map(|r| r.status) {
                self.set_status(position, status.toggled());
            }
        }
    }

    /// Stages the selected record for deletion and asks for confirmation.
    pub fn stage_delete(&mut self) {
        if let Some(record) = self.selected_record().cloned() {
            self.pending_delete = Some(record);
            self.mode = AppMode::ConfirmDelete;
            self.status_message = None;
        }
    }

    /// Removes every record sharing the staged record's id.
    pub fn confirm_delete(&mut self) {
        if let Some(record) = self.pending_delete.take() {
            let mut next = self.store.clone();
            next.remove_by_id(record.id);
            if self.commit(next.into_records()) {
                tracing::info!(id = record.id, "loan deleted");
                self.status_message = Some(format!("Deleted \"{}\"", record.title));
            }
        }
        self.mode = AppMode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = AppMode::Normal;
    }

    pub fn start_export(&mut self) {
        self.mode = AppMode::Export;
        self.filename_input = DEFAULT_EXPORT_FILENAME.to_string();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    /// Filename to export to; falls back to the default when the prompt is empty.
    pub fn get_export_filename(&self) -> String {
        if self.filename_input.trim().is_empty() {
            DEFAULT_EXPORT_FILENAME.to_string()
        } else {
            self.filename_input.trim().to_string()
        }
    }

    /// Exports the currently visible rows to CSV.
    pub fn finish_export(&mut self) {
        let filename = self.get_export_filename();
        let result = CsvExporter::export_records(&self.visible_records(), &filename);
        self.set_export_result(result);
    }

    pub fn set_export_result(&mut self, result: Result<String, ExportError>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {filename}"));
            }
            Err(error) => {
                tracing::warn!(error = %error, "CSV export failed");
                self.status_message = Some(format!("Export failed: {error}"));
            }
        }
        self.cancel_export();
    }

    pub fn cancel_export(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }

    pub fn show_help(&mut self) {
        self.mode = AppMode::Help;
        self.help_scroll = 0;
    }

    pub fn close_help(&mut self) {
        self.mode = AppMode::Normal;
    }

    fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.mode {
            AppMode::Form => Some(self.draft.field_mut(self.focused_field)),
            AppMode::Export => Some(&mut self.filename_input),
            _ => None,
        }
    }

    /// Text of the input currently receiving keystrokes.
    pub fn active_input(&self) -> Option<&str> {
        match self.mode {
            AppMode::Form => Some(self.draft.field(self.focused_field)),
            AppMode::Export => Some(&self.filename_input),
            _ => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        let cursor = self.cursor_position;
        if let Some(input) = self.active_input_mut() {
            let at = byte_offset(input, cursor);
            input.insert(at, c);
            self.cursor_position += 1;
        }
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor = self.cursor_position;
        if let Some(input) = self.active_input_mut() {
            let at = byte_offset(input, cursor - 1);
            input.remove(at);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let cursor = self.cursor_position;
        if let Some(input) = self.active_input_mut() {
            if cursor < input.chars().count() {
                let at = byte_offset(input, cursor);
                input.remove(at);
            }
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.active_input().map_or(0, |input| input.chars().count());
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.active_input().map_or(0, |input| input.chars().count());
    }
}

/// Byte index of the `char_index`-th character, or the end of the string.
fn byte_offset(s: &str, char_index: usize) -> usize {
    s.char_indices().nth(char_index).map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DATE_FORMAT;
    use crate::infrastructure::{BOOKS_KEY, FileStore, MemoryStore};
    use chrono::Duration;

    fn days_from_today(days: i64) -> String {
        (App::today() + Duration::days(days)).format(DATE_FORMAT).to_string()
    }

    fn fill_form(app: &mut App, title: &str, student: &str) {
        app.draft.title = title.to_string();
        app.draft.student = student.to_string();
        app.draft.borrow_date = days_from_today(0);
        app.draft.return_date = days_from_today(7);
    }

    fn add_loan(app: &mut App, title: &str) {
        app.start_add();
        fill_form(app, title, "Student");
        app.submit_form();
        assert_eq!(app.mode, AppMode::Normal, "add of {title} failed: {:?}", app.status_message);
    }

    fn future_record(id: u32, title: &str, status: LoanStatus) -> LoanRecord {
        LoanRecord {
            id,
            title: title.to_string(),
            student: "S".to_string(),
            borrow_date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2099, 1, 2).unwrap(),
            status,
        }
    }

    #[test]
    fn test_app_default() {
        let app = App::default();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.filter, StatusFilter::All);
        assert_eq!(app.selected, 0);
        assert!(app.pending_delete.is_none());
        assert!(app.status_message.is_none());
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn test_start_rehydrates_from_storage() {
        let records = vec![
            future_record(1, "A", LoanStatus::Returned),
            future_record(2, "B", LoanStatus::NotReturned),
        ];
        let json = serde_json::to_string(&records).unwrap();

        let app = App::start(
            PersistenceBridge::new(MemoryStore::with_slot(BOOKS_KEY, &json)),
            CorruptionPolicy::FailFast,
        )
        .unwrap();
        assert_eq!(app.store().records(), records.as_slice());
    }

    #[test]
    fn test_start_with_corrupt_storage() {
        let corrupt = || PersistenceBridge::new(MemoryStore::with_slot(BOOKS_KEY, "[1,2"));
        assert!(App::start(corrupt(), CorruptionPolicy::FailFast).is_err());

        let app = App::start(corrupt(), CorruptionPolicy::Reset).unwrap();
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_add_loan() {
        let mut app = App::default();
        app.start_add();
        assert_eq!(app.mode, AppMode::Form);
        assert!(!app.draft.is_edit());

        fill_form(&mut app, "Nhật ký trong tù", "Long");
        app.submit_form();

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.store().len(), 1);
        let record = &app.store().records()[0];
        assert_eq!(record.id, 1);
        assert_eq!(record.title, "Nhật ký trong tù");
        assert_eq!(record.status, LoanStatus::NotReturned);
        assert_eq!(app.status_message.as_deref(), Some("Added \"Nhật ký trong tù\""));
    }

    #[test]
    fn test_add_is_written_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(RecordStore::default(), PersistenceBridge::new(FileStore::new(dir.path())));
        add_loan(&mut app, "A");
        add_loan(&mut app, "B");

        let reloaded = PersistenceBridge::new(FileStore::new(dir.path())).load().unwrap();
        assert_eq!(reloaded, app.store().records());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut app = App::default();
        app.start_add();
        fill_form(&mut app, "", "Long");
        app.submit_form();

        assert_eq!(app.mode, AppMode::Form);
        assert!(app.store().is_empty());
        assert!(app.status_message.as_deref().unwrap().contains("title"));
    }

    #[test]
    fn test_borrow_date_yesterday_rejected() {
        let mut app = App::default();
        app.start_add();
        fill_form(&mut app, "A", "Long");
        app.draft.borrow_date = days_from_today(-1);
        app.submit_form();

        assert_eq!(app.mode, AppMode::Form);
        assert!(app.store().is_empty());
        assert!(app.status_message.as_deref().unwrap().contains("earlier than today"));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut app = App::default();
        add_loan(&mut app, "A");
        add_loan(&mut app, "B");
        add_loan(&mut app, "C");

        app.selected = 0;
        app.stage_delete();
        app.confirm_delete();
        add_loan(&mut app, "D");

        let ids: Vec<u32> = app.store().records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
    }

    #[test]
    fn test_edit_keeps_id_and_position() {
        let mut app = App::default();
        add_loan(&mut app, "A");
        add_loan(&mut app, "B");

        app.selected = 0;
        app.start_edit();
        assert_eq!(app.draft.editing_id, Some(1));
        assert_eq!(app.cursor_position, 1);
        app.draft.title = "A, second edition".to_string();
        app.submit_form();

        assert_eq!(app.mode, AppMode::Normal);
        let records = app.store().records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[0].title, "A, second edition");
        assert_eq!(records[1].title, "B");
    }

    #[test]
    fn test_edit_applies_same_validation() {
        let mut app = App::default();
        add_loan(&mut app, "A");
        app.start_edit();
        app.draft.return_date = days_from_today(-3);
        app.submit_form();

        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.store().records()[0].return_date, App::today() + Duration::days(7));
    }

    #[test]
    fn test_edit_without_selection() {
        let mut app = App::default();
        app.start_edit();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("No loan selected"));
    }

    #[test]
    fn test_status_change_is_unconditional() {
        let past = LoanRecord {
            borrow_date: NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2001, 1, 2).unwrap(),
            ..future_record(1, "old", LoanStatus::NotReturned)
        };
        let mut app = App::new(RecordStore::new(vec![past]), PersistenceBridge::in_memory());

        app.toggle_selected_status();
        assert_eq!(app.store().records()[0].status, LoanStatus::Returned);
        app.set_status(0, LoanStatus::NotReturned);
        assert_eq!(app.store().records()[0].status, LoanStatus::NotReturned);
    }

    #[test]
    fn test_edit_targets_selected_duplicate() {
        let store = RecordStore::new(vec![
            future_record(1, "first", LoanStatus::NotReturned),
            future_record(1, "second", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.selected = 1;
        app.start_edit();
        assert_eq!(app.draft.title, "second");
        assert_eq!(app.editing_position, Some(1));

        app.draft.title = "second edited".to_string();
        app.draft.borrow_date = days_from_today(0);
        app.draft.return_date = days_from_today(1);
        app.submit_form();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.editing_position.is_none());
        let titles: Vec<&str> = app.store().records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second edited"]);
    }

    #[test]
    fn test_toggle_targets_selected_duplicate() {
        let store = RecordStore::new(vec![
            future_record(1, "first", LoanStatus::NotReturned),
            future_record(1, "second", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.selected = 1;
        app.toggle_selected_status();

        let statuses: Vec<LoanStatus> = app.store().records().iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![LoanStatus::NotReturned, LoanStatus::Returned]);
    }

    #[test]
    fn test_toggle_targets_filtered_duplicate() {
        let store = RecordStore::new(vec![
            future_record(1, "first", LoanStatus::Returned),
            future_record(1, "second", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.filter = StatusFilter::NotReturned;
        assert_eq!(app.selected_position(), Some(1));

        app.toggle_selected_status();
        assert_eq!(app.store().records()[0].status, LoanStatus::Returned);
        assert_eq!(app.store().records()[1].status, LoanStatus::Returned);
        assert_eq!(app.store().records()[0].title, "first");
    }

    #[test]
    fn test_add_rejected_when_ids_exhausted() {
        let store = RecordStore::new(vec![future_record(u32::MAX, "last", LoanStatus::NotReturned)]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.start_add();
        fill_form(&mut app, "A", "S");
        app.submit_form();

        assert_eq!(app.mode, AppMode::Form);
        assert_eq!(app.store().len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("No loan id left to assign"));
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = App::default();
        add_loan(&mut app, "A");

        app.stage_delete();
        assert_eq!(app.mode, AppMode::ConfirmDelete);
        assert_eq!(app.store().len(), 1);

        app.cancel_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.pending_delete.is_none());
        assert_eq!(app.store().len(), 1);

        app.stage_delete();
        app.confirm_delete();
        assert!(app.store().is_empty());
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_delete_removes_duplicate_ids() {
        let store = RecordStore::new(vec![
            future_record(1, "first", LoanStatus::NotReturned),
            future_record(1, "second", LoanStatus::NotReturned),
            future_record(2, "other", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.stage_delete();
        app.confirm_delete();

        assert_eq!(app.store().len(), 1);
        assert_eq!(app.store().records()[0].title, "other");
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let store = RecordStore::new(vec![future_record(1, "A", LoanStatus::NotReturned)]);
        let before = store.clone();
        let mut app = App::new(store, PersistenceBridge::new(FileStore::new(&blocker)));

        app.toggle_selected_status();
        assert_eq!(app.store(), &before);

        app.start_add();
        fill_form(&mut app, "B", "S");
        app.submit_form();
        assert_eq!(app.store(), &before);
        assert_eq!(app.mode, AppMode::Form);
        assert!(app.status_message.as_deref().unwrap().starts_with("Save failed"));

        app.cancel_form();
        app.stage_delete();
        app.confirm_delete();
        assert_eq!(app.store(), &before);
    }

    #[test]
    fn test_filter_does_not_mutate_store() {
        let store = RecordStore::new(vec![
            future_record(1, "A", LoanStatus::Returned),
            future_record(2, "B", LoanStatus::NotReturned),
            future_record(3, "C", LoanStatus::NotReturned),
        ]);
        let before = store.clone();
        let mut app = App::new(store, PersistenceBridge::in_memory());

        app.selected = 2;
        app.cycle_filter();
        assert_eq!(app.filter, StatusFilter::Returned);
        assert_eq!(app.visible_records().len(), 1);
        assert_eq!(app.selected, 0); // clamped to the shorter view

        app.cycle_filter();
        assert_eq!(app.filter, StatusFilter::NotReturned);
        assert_eq!(app.selected_record().map(|r| r.id), Some(2));

        app.cycle_filter();
        assert_eq!(app.filter, StatusFilter::All);
        assert_eq!(app.store(), &before);
    }

    #[test]
    fn test_actions_target_filtered_row() {
        let store = RecordStore::new(vec![
            future_record(1, "A", LoanStatus::Returned),
            future_record(2, "B", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.filter = StatusFilter::NotReturned;

        app.toggle_selected_status();
        assert_eq!(app.store().get(2).unwrap().status, LoanStatus::Returned);
        assert_eq!(app.store().get(1).unwrap().status, LoanStatus::Returned);
        assert!(app.visible_records().is_empty());
        assert!(app.selected_record().is_none());
    }

    #[test]
    fn test_selection_bounds() {
        let store = RecordStore::new(vec![
            future_record(1, "A", LoanStatus::Returned),
            future_record(2, "B", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());

        app.select_previous();
        assert_eq!(app.selected, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 1);
        app.select_first();
        assert_eq!(app.selected, 0);
        app.select_last();
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn test_text_editing_handles_multibyte() {
        let mut app = App::default();
        app.start_add();
        for c in "Sách".chars() {
            app.insert_char(c);
        }
        assert_eq!(app.draft.title, "Sách");
        assert_eq!(app.cursor_position, 4);

        app.move_cursor_left();
        app.delete_before_cursor(); // removes 'á'
        assert_eq!(app.draft.title, "Sch");
        app.move_cursor_home();
        app.delete_at_cursor();
        assert_eq!(app.draft.title, "ch");
        app.move_cursor_end();
        assert_eq!(app.cursor_position, 2);
    }

    #[test]
    fn test_form_focus_moves_cursor() {
        let mut app = App::default();
        app.start_add();
        app.draft.student = "Hùng".to_string();
        app.focus_next_field();
        assert_eq!(app.focused_field, FormField::Student);
        assert_eq!(app.cursor_position, 4);
        app.insert_char('!');
        assert_eq!(app.draft.student, "Hùng!");
        app.focus_previous_field();
        assert_eq!(app.focused_field, FormField::Title);
    }

    #[test]
    fn test_cancel_form_discards_draft() {
        let mut app = App::default();
        app.start_add();
        fill_form(&mut app, "A", "S");
        app.cancel_form();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.draft, LoanDraft::default());
        assert!(app.store().is_empty());
    }

    #[test]
    fn test_export_visible_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let store = RecordStore::new(vec![
            future_record(1, "A", LoanStatus::Returned),
            future_record(2, "B", LoanStatus::NotReturned),
        ]);
        let mut app = App::new(store, PersistenceBridge::in_memory());
        app.filter = StatusFilter::Returned;

        app.start_export();
        assert_eq!(app.mode, AppMode::Export);
        assert_eq!(app.filename_input, "loans.csv");
        app.filename_input = path.to_str().unwrap().to_string();
        app.finish_export();

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.status_message.as_deref().unwrap().starts_with("Exported to"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_export_filename_default() {
        let mut app = App::default();
        app.start_export();
        app.filename_input = "   ".to_string();
        assert_eq!(app.get_export_filename(), "loans.csv");
    }

    #[test]
    fn test_help_mode() {
        let mut app = App::default();
        app.help_scroll = 3;
        app.show_help();
        assert_eq!(app.mode, AppMode::Help);
        assert_eq!(app.help_scroll, 0);
        app.close_help();
        assert_eq!(app.mode, AppMode::Normal);
    }
}
