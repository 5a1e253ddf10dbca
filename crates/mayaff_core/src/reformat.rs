use crate::flags::{CallRecord, Edit};

/// Apply the collected rename edits to the original source. Lines are split
/// on `\n` (a CR from a CRLF ending stays inside its line and survives
/// untouched); every byte outside the edit spans is preserved. Edits are
/// applied in reverse collection order, which is right-to-left per line, so
/// earlier spans on the same line keep their original columns.
pub fn reformat(source: &str, records: &[CallRecord]) -> String {
    let mut lines: Vec<String> = source.split('\n').map(str::to_string).collect();
    for record in records.iter().rev() {
        apply_record(record, &mut lines);
    }
    lines.join("\n")
}

fn apply_record(record: &CallRecord, lines: &mut [String]) {
    for edit in record.edits.iter().rev() {
        match edit {
            Edit::Call(nested) => apply_record(nested, lines),
            Edit::Flag(flag) => {
                // Empty long name: short flag with no long form, leave it.
                if flag.long_name.is_empty() {
                    continue;
                }
                if let Some(line) = lines.get_mut(flag.line)
                    && flag.start_col < flag.end_col
                    && flag.end_col <= line.len()
                {
                    line.replace_range(flag.start_col..flag.end_col, &flag.long_name);
                }
            }
        }
    }
}
