//! Add / edit / delete dialog state machines
//!
//! A dialog is `Open` until it is either `Confirmed` or `Cancelled`. On
//! confirmation it stages its record in the [`DataStore`] and reports
//! result code 1. Dialogs never touch the collection itself.

use super::record::Record;
use super::store::DataStore;
use thiserror::Error;

/// Result code reported by a confirmed dialog
pub const CONFIRMED: u8 = 1;

/// Lifecycle of a dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Open,
    Confirmed(Record),
    Cancelled,
}

impl DialogState {
    /// `Some(1)` when confirmed, `None` otherwise
    pub fn result_code(&self) -> Option<u8> {
        match self {
            DialogState::Confirmed(_) => Some(CONFIRMED),
            _ => None,
        }
    }

    pub fn is_open(&self) -> bool {
        *self == DialogState::Open
    }
}

/// Inline validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Required field")]
    Required,
    #[error("Not a valid number")]
    NotANumber,
}

/// Editable fields of the author form, in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Id,
    Author,
    SignatureStatus,
    SignatureDate,
}

impl FormField {
    pub fn all() -> [FormField; 4] {
        [
            FormField::Id,
            FormField::Author,
            FormField::SignatureStatus,
            FormField::SignatureDate,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Id => "Id",
            FormField::Author => "Author",
            FormField::SignatureStatus => "Signature status",
            FormField::SignatureDate => "Signature date",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// Form backing the add and edit dialogs
#[derive(Debug, Clone)]
pub struct AuthorForm {
    pub mode: FormMode,
    pub id: String,
    pub author: String,
    pub signature_status: String,
    pub signature_date: String,
    pub focus: FormField,
    pub error: Option<(FormField, FormError)>,
    pub state: DialogState,
}

impl AuthorForm {
    /// Blank form for a new record
    pub fn for_add() -> Self {
        Self::from_record(FormMode::Add, &Record::default(), FormField::Id)
            .with_id_text(String::new())
    }

    /// Form prefilled with an existing record; the id is read-only
    pub fn for_edit(record: &Record) -> Self {
        Self::from_record(FormMode::Edit, record, FormField::Author)
    }

    fn from_record(mode: FormMode, record: &Record, focus: FormField) -> Self {
        Self {
            mode,
            id: record.id.to_string(),
            author: record.author.clone(),
            signature_status: record.signature_status.clone(),
            signature_date: record.signature_date.clone(),
            focus,
            error: None,
            state: DialogState::Open,
        }
    }

    fn with_id_text(mut self, id: String) -> Self {
        self.id = id;
        self
    }

    /// Fields the cursor can visit
    pub fn editable_fields(&self) -> Vec<FormField> {
        FormField::all()
            .into_iter()
            .filter(|f| self.mode == FormMode::Add || *f != FormField::Id)
            .collect()
    }

    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Id => &self.id,
            FormField::Author => &self.author,
            FormField::SignatureStatus => &self.signature_status,
            FormField::SignatureDate => &self.signature_date,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Id => &mut self.id,
            FormField::Author => &mut self.author,
            FormField::SignatureStatus => &mut self.signature_status,
            FormField::SignatureDate => &mut self.signature_date,
        }
    }

    pub fn focus_next(&mut self) {
        let fields = self.editable_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + 1) % fields.len()];
    }

    pub fn focus_prev(&mut self) {
        let fields = self.editable_fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(idx + fields.len() - 1) % fields.len()];
    }

    pub fn input(&mut self, c: char) {
        let focus = self.focus;
        self.value_mut(focus).push(c);
        self.revalidate_focused();
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
        self.revalidate_focused();
    }

    // Clear a stale message once the field it points at is edited
    fn revalidate_focused(&mut self) {
        if matches!(self.error, Some((field, _)) if field == self.focus) {
            self.error = None;
        }
    }

    /// Build the record, or report the first invalid field
    pub fn validate(&self) -> Result<Record, (FormField, FormError)> {
        let id = match self.mode {
            FormMode::Add => self
                .id
                .trim()
                .parse::<i64>()
                .map_err(|_| (FormField::Id, FormError::NotANumber))?,
            FormMode::Edit => self.id.parse::<i64>().unwrap_or_default(),
        };

        if self.author.trim().is_empty() {
            return Err((FormField::Author, FormError::Required));
        }

        Ok(Record::new(
            id,
            self.author.clone(),
            self.signature_status.clone(),
            self.signature_date.clone(),
        ))
    }

    /// Validate and stage the record; stays open on validation failure
    pub fn confirm(&mut self, store: &mut DataStore) -> &DialogState {
        match self.validate() {
            Ok(record) => {
                match self.mode {
                    FormMode::Add => store.add_author(record.clone()),
                    FormMode::Edit => store.update_author(record.clone()),
                }
                self.error = None;
                self.state = DialogState::Confirmed(record);
            }
            Err((field, err)) => {
                self.focus = field;
                self.error = Some((field, err));
            }
        }
        &self.state
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}

/// Confirmation for removing one record
#[derive(Debug, Clone)]
pub struct DeleteConfirm {
    pub record: Record,
    pub state: DialogState,
}

impl DeleteConfirm {
    pub fn new(record: Record) -> Self {
        Self {
            record,
            state: DialogState::Open,
        }
    }

    /// Send the delete request to the store and close with code 1
    pub fn confirm(&mut self, store: &mut DataStore) -> &DialogState {
        store.remove_by_id(self.record.id);
        self.state = DialogState::Confirmed(self.record.clone());
        &self.state
    }

    pub fn cancel(&mut self) {
        self.state = DialogState::Cancelled;
    }
}
