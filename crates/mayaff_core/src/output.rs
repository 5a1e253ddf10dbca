use similar::TextDiff;

const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

pub fn print_failed(msg: &str) {
    println!("{RED}{msg}{RESET}");
}

/// Colored unified diff between the original and the reformatted source,
/// with 5 lines of context.
pub fn diff(original: &str, formatted: &str, file_name: &str) -> String {
    let text_diff = TextDiff::from_lines(original, formatted);
    let unified = text_diff
        .unified_diff()
        .context_radius(5)
        .header(file_name, file_name)
        .to_string();

    let mut out = String::new();
    for line in unified.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            out.push_str(BOLD);
            out.push_str(line);
            out.push_str(RESET);
        } else if line.starts_with("@@") {
            out.push_str(CYAN);
            out.push_str(line);
            out.push_str(RESET);
        } else if line.starts_with('+') {
            out.push_str(GREEN);
            out.push_str(line);
            out.push_str(RESET);
        } else if line.starts_with('-') {
            out.push_str(RED);
            out.push_str(line);
            out.push_str(RESET);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}
