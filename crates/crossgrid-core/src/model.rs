//! State and behaviour shared by both grid variants.
//!
//! [`GridModel`] owns everything that does not depend on the separator kind:
//! dimensions, symmetry, the derived field lists and cell→field links, the
//! entries buffer, the optional solution and the incorrect-entry cache. The
//! block and bar grids embed a model and drive it through their structural
//! edits.

use crate::{
    Board, Direction, Entries, EntryValue, Field, FieldId, GridError, Position, Symmetry,
    UNDEFINED_MARKER,
    derive::{self, CellFields, SeparatorLayout},
};

/// The separator-independent state of a grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    num_columns: usize,
    num_rows: usize,
    symmetry: Symmetry,
    across: Vec<Field>,
    down: Vec<Field>,
    links: Board<CellFields>,
    entries: Entries,
    solution: Option<Entries>,
    incorrect: Option<Board<bool>>,
}

impl GridModel {
    pub(crate) fn new(num_columns: usize, num_rows: usize, symmetry: Symmetry) -> Self {
        Self {
            num_columns,
            num_rows,
            symmetry,
            across: Vec::new(),
            down: Vec::new(),
            links: Board::filled(num_columns, num_rows, CellFields::default()),
            entries: Entries::new(num_columns, num_rows),
            solution: None,
            incorrect: None,
        }
    }

    /// Re-derives the field lists and links from the given cell layout.
    ///
    /// Entries are re-initialised (letters are lost), and the
    /// incorrect-entry cache is invalidated. The solution buffer is kept: it
    /// describes the answer key, which survives structural edits.
    pub(crate) fn rebuild_fields(&mut self, layout: &impl SeparatorLayout) {
        let derived = derive::derive_fields(layout, &mut self.entries);
        self.across = derived.across;
        self.down = derived.down;
        self.links = derived.links;
        self.incorrect = None;
    }

    pub(crate) fn set_symmetry_value(&mut self, symmetry: Symmetry) {
        self.symmetry = symmetry;
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Returns the grid's symmetry.
    #[must_use]
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Returns the fields running in one direction, in field-number order.
    #[must_use]
    pub fn field_list(&self, direction: Direction) -> &[Field] {
        match direction {
            Direction::Across => &self.across,
            Direction::Down => &self.down,
        }
    }

    /// Returns the number of fields in one direction.
    #[must_use]
    pub fn num_fields(&self, direction: Direction) -> usize {
        self.field_list(direction).len()
    }

    /// Returns all fields in enumeration order: across fields first, then
    /// down fields, each in field-number order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.across.iter().chain(self.down.iter())
    }

    /// Looks up a field by id.
    ///
    /// An id without a direction matches only when the number identifies
    /// exactly one field.
    #[must_use]
    pub fn field(&self, id: FieldId) -> Option<&Field> {
        match id.direction {
            Some(direction) => self
                .field_list(direction)
                .iter()
                .find(|field| field.number() == id.number),
            None => {
                let mut matches = self.fields().filter(|field| field.number() == id.number);
                let first = matches.next()?;
                matches.next().is_none().then_some(first)
            }
        }
    }

    /// Returns the fields covering a cell, optionally restricted to one
    /// direction.
    #[must_use]
    pub fn find_fields(&self, pos: Position, direction: Option<Direction>) -> Vec<Field> {
        self.fields()
            .filter(|field| {
                direction.is_none_or(|d| d == field.direction()) && field.contains_cell(pos)
            })
            .copied()
            .collect()
    }

    /// Returns the field covering a cell in the given direction, if any.
    #[must_use]
    pub fn field_at(&self, pos: Position, direction: Direction) -> Option<&Field> {
        let index = self.links[pos].link(direction)?;
        Some(&self.field_list(direction)[index])
    }

    /// Returns whether the cell is the origin of a field in either
    /// direction.
    #[must_use]
    pub fn is_field_origin(&self, pos: Position) -> bool {
        self.links[pos].is_origin()
    }

    /// Returns the field number displayed in a cell, if the cell originates
    /// a field.
    #[must_use]
    pub fn field_number_at(&self, pos: Position) -> Option<u32> {
        let links = self.links[pos];
        if links.origin_across {
            return links.across.map(|index| self.across[index].number());
        }
        if links.origin_down {
            return links.down.map(|index| self.down[index].number());
        }
        None
    }

    /// Returns the fields whose every cell is crossed by a field in the
    /// other direction.
    #[must_use]
    pub fn fully_intersecting_fields(&self) -> Vec<Field> {
        self.fields()
            .filter(|field| {
                field
                    .positions()
                    .all(|pos| self.links[pos].link(!field.direction()).is_some())
            })
            .copied()
            .collect()
    }

    /// Returns the entries buffer.
    #[must_use]
    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    /// Returns the entry value at a cell.
    #[must_use]
    pub fn entry_value(&self, pos: Position) -> EntryValue {
        self.entries.value(pos)
    }

    /// Sets the entry value at a single cell and invalidates the
    /// incorrect-entry cache.
    pub fn set_entry_value(&mut self, pos: Position, value: EntryValue) {
        self.entries.set_value(pos, value);
        self.incorrect = None;
    }

    /// Replaces the entries buffer wholesale, cloning the given snapshot.
    pub fn restore_entries(&mut self, entries: &Entries) {
        self.entries = entries.clone();
        self.incorrect = None;
    }

    /// Sets all entries from per-field strings in field-enumeration order.
    ///
    /// The [`UNDEFINED_MARKER`] leaves a cell unset. Validation is atomic:
    /// on any error the previous entries are kept unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncorrectNumberOfEntries`],
    /// [`GridError::IncorrectEntryLength`],
    /// [`GridError::IllegalCharacterInEntry`] or
    /// [`GridError::ConflictingEntry`].
    pub fn set_entries(&mut self, entries: &[String]) -> Result<(), GridError> {
        if entries.len() != self.across.len() + self.down.len() {
            return Err(GridError::IncorrectNumberOfEntries);
        }

        let mut fresh = self.entries.clone();
        fresh.clear();
        for (field, text) in self.fields().zip(entries) {
            apply_field_text(&mut fresh, field, text, &ENTRY_ERRORS)?;
        }

        self.entries = fresh;
        self.incorrect = None;
        Ok(())
    }

    /// Concatenates the entries of every field in enumeration order,
    /// separated by `separator` when given. Unset cells appear as the
    /// [`UNDEFINED_MARKER`].
    #[must_use]
    pub fn entries_string(&self, separator: Option<&str>) -> String {
        self.buffer_string(Some(&self.entries), separator)
    }

    /// Returns whether a solution is set.
    #[must_use]
    pub fn has_solution(&self) -> bool {
        self.solution.is_some()
    }

    /// Returns the solution buffer, if set.
    #[must_use]
    pub fn solution(&self) -> Option<&Entries> {
        self.solution.as_ref()
    }

    /// Adopts the current entries as the solution.
    pub fn set_solution_from_entries(&mut self) {
        self.solution = Some(self.entries.clone());
        self.incorrect = None;
    }

    /// Replaces the solution buffer wholesale, cloning the given snapshot.
    pub fn restore_solution(&mut self, solution: Option<&Entries>) {
        self.solution = solution.cloned();
        self.incorrect = None;
    }

    /// Sets the solution from per-field answers in field-enumeration order.
    ///
    /// Unlike [`GridModel::set_entries`], every cell must receive a letter;
    /// the undefined marker is not allowed. Validation is atomic: on any
    /// error the previous solution is kept unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::IncorrectNumberOfAnswers`],
    /// [`GridError::IncorrectAnswerLength`],
    /// [`GridError::IllegalCharacterInAnswer`] or
    /// [`GridError::ConflictingAnswer`].
    pub fn set_solution(&mut self, answers: &[String]) -> Result<(), GridError> {
        if answers.len() != self.across.len() + self.down.len() {
            return Err(GridError::IncorrectNumberOfAnswers);
        }

        let mut solution = Entries::new(self.num_columns, self.num_rows);
        for (field, text) in self.fields().zip(answers) {
            apply_field_text(&mut solution, field, text, &ANSWER_ERRORS)?;
        }

        self.solution = Some(solution);
        self.incorrect = None;
        Ok(())
    }

    /// Concatenates the solution answers of every field in enumeration
    /// order, separated by `separator` when given. Returns an empty string
    /// when no solution is set.
    #[must_use]
    pub fn solution_string(&self, separator: Option<&str>) -> String {
        self.buffer_string(self.solution.as_ref(), separator)
    }

    /// Removes the solution.
    pub fn clear_solution(&mut self) {
        self.solution = None;
        self.incorrect = None;
    }

    /// Recomputes the incorrect-entry cache against the solution. Without a
    /// solution the cache stays empty.
    pub fn check_entries(&mut self) {
        if let Some(solution) = &self.solution {
            self.incorrect = Some(solution.compare(&self.entries));
        }
    }

    /// Returns whether the incorrect-entry cache is populated.
    #[must_use]
    pub fn has_checked_entries(&self) -> bool {
        self.incorrect.is_some()
    }

    /// Returns whether the cell was flagged incorrect by the last
    /// [`GridModel::check_entries`].
    #[must_use]
    pub fn is_incorrect_entry(&self, pos: Position) -> bool {
        self.incorrect
            .as_ref()
            .is_some_and(|incorrect| incorrect[pos])
    }

    fn buffer_string(&self, buffer: Option<&Entries>, separator: Option<&str>) -> String {
        let Some(buffer) = buffer else {
            return String::new();
        };
        let mut out = String::new();
        for field in self.fields() {
            if let Some(separator) = separator
                && !out.is_empty()
            {
                out.push_str(separator);
            }
            for pos in field.positions() {
                out.push(buffer.value(pos).letter().unwrap_or(UNDEFINED_MARKER));
            }
        }
        out
    }
}

/// Error constructors distinguishing the entry and answer flavours of the
/// same validation failure.
struct TextErrors {
    wrong_length: fn(FieldId) -> GridError,
    illegal_character: fn(FieldId, char) -> GridError,
    conflict: fn(FieldId, usize) -> GridError,
    allow_undefined: bool,
}

static ENTRY_ERRORS: TextErrors = TextErrors {
    wrong_length: |id| GridError::IncorrectEntryLength { id },
    illegal_character: |id, ch| GridError::IllegalCharacterInEntry { id, ch },
    conflict: |id, index| GridError::ConflictingEntry { id, index },
    allow_undefined: true,
};

static ANSWER_ERRORS: TextErrors = TextErrors {
    wrong_length: |id| GridError::IncorrectAnswerLength { id },
    illegal_character: |id, ch| GridError::IllegalCharacterInAnswer { id, ch },
    conflict: |id, index| GridError::ConflictingAnswer { id, index },
    allow_undefined: false,
};

fn apply_field_text(
    buffer: &mut Entries,
    field: &Field,
    text: &str,
    errors: &TextErrors,
) -> Result<(), GridError> {
    let id = field.id();
    if text.chars().count() != field.length() {
        return Err((errors.wrong_length)(id));
    }

    for (index, ch) in text.chars().enumerate() {
        if errors.allow_undefined && ch == UNDEFINED_MARKER {
            continue;
        }
        if !ch.is_alphanumeric() {
            return Err((errors.illegal_character)(id, ch));
        }
        let pos = field.position_at(index);
        if let EntryValue::Letter(existing) = buffer.value(pos)
            && existing != ch
        {
            return Err((errors.conflict)(id, index));
        }
        buffer.set_value(pos, EntryValue::Letter(ch));
    }
    Ok(())
}
