/// One planned rename: replace the identifier occupying
/// `[start_col, end_col)` on `line` (all 0-based, byte offsets) with
/// `long_name`. An empty `long_name` marks a short flag with no long form
/// configured; the rewrite engine leaves those spans untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagEdit {
    pub short_name: String,
    pub long_name: String,
    pub line: usize,
    pub start_col: usize,
    pub end_col: usize,
}

/// A recognized target-namespace call site and the edits collected from its
/// argument list, in source order. Target calls passed as argument
/// expressions appear as nested records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord {
    pub command_name: String,
    pub edits: Vec<Edit>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Flag(FlagEdit),
    Call(CallRecord),
}

impl CallRecord {
    /// Total flag edits including nested records.
    pub fn edit_count(&self) -> usize {
        self.edits
            .iter()
            .map(|edit| match edit {
                Edit::Flag(_) => 1,
                Edit::Call(record) => record.edit_count(),
            })
            .sum()
    }
}
