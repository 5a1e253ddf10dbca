use crate::config::MayaFlagsConfig;
use crate::flags::{CallRecord, Edit, FlagEdit};
use crate::tokens::{TokenCursor, TokenKind};

/// One open target-call argument list. `depth` counts parentheses opened
/// since entering the call (1 right after the call's own opening paren);
/// flag arguments are only meaningful at depth 1.
#[derive(Debug)]
struct Frame {
    command_name: String,
    depth: usize,
    edits: Vec<Edit>,
}

/// The call-site scanner. Two states, made explicit by the frame stack:
/// an empty stack is "seeking a name", a non-empty stack is "inside the
/// argument list of the top frame's command". Nested target calls push
/// frames instead of recursing.
pub struct FlagScanner<'a> {
    config: &'a MayaFlagsConfig,
    /// Bound alias paths with a trailing dot (`cmds.`, `maya.cmds.`), the
    /// shape the dotted-path reconstruction matches against.
    alias_paths: Vec<String>,
}

impl<'a> FlagScanner<'a> {
    pub fn new(config: &'a MayaFlagsConfig, aliases: &[String]) -> Self {
        Self {
            config,
            alias_paths: aliases.iter().map(|alias| format!("{alias}.")).collect(),
        }
    }

    /// Walk the token stream and collect a record per target call that has
    /// at least one abbreviated-flag argument. Unbalanced parentheses at end
    /// of stream are tolerated; whatever was collected survives.
    pub fn scan(&self, cursor: &mut TokenCursor) -> Vec<CallRecord> {
        let mut records = Vec::new();
        let mut frames: Vec<Frame> = Vec::new();

        while cursor.advance() {
            // Target-call recognition runs first, at any depth, so target
            // calls nested inside argument expressions are still found. It
            // may consume the dotted path greedily; on failure the tokens it
            // swallowed were part of a non-matching path and carry no flags.
            if !self.alias_paths.is_empty()
                && cursor.current().is_some_and(|t| t.kind == TokenKind::Name)
                && let Some(command_name) = self.try_enter_call(cursor)
            {
                cursor.advance(); // the call's opening paren
                frames.push(Frame {
                    command_name,
                    depth: 1,
                    edits: Vec::new(),
                });
                continue;
            }

            let Some(token) = cursor.current().cloned() else {
                break;
            };
            let Some(frame) = frames.last_mut() else {
                continue;
            };

            if token.is_op("(") {
                frame.depth += 1;
            } else if token.is_op(")") {
                frame.depth -= 1;
                if frame.depth == 0 {
                    // This call's own closing paren.
                    close_frame(&mut frames, &mut records);
                }
            } else if token.kind == TokenKind::Name && frame.depth == 1 {
                let long_name = self
                    .config
                    .flags(&frame.command_name)
                    .and_then(|flags| flags.get(&token.text));
                if let Some(long_name) = long_name
                    && cursor.peek().is_some_and(|t| t.is_op("="))
                {
                    frame.edits.push(Edit::Flag(FlagEdit {
                        short_name: token.text.clone(),
                        long_name: long_name.clone(),
                        line: token.line,
                        start_col: token.start_col,
                        end_col: token.end_col,
                    }));
                }
            }
        }

        // A call left unterminated at end of file keeps its edits.
        while !frames.is_empty() {
            close_frame(&mut frames, &mut records);
        }
        records
    }

    /// Decide whether the current Name token starts a call into the target
    /// namespace. Rebuilds the dotted path token by token, consuming a token
    /// only while the accumulated string stays a prefix of some bound alias
    /// path; the path must then match one exactly, the next token must be a
    /// command in the flag table, and the token after it an opening paren.
    fn try_enter_call(&self, cursor: &mut TokenCursor) -> Option<String> {
        let mut path = cursor.current()?.text.clone();
        loop {
            let Some(next) = cursor.peek() else { break };
            let mut candidate = path.clone();
            candidate.push_str(&next.text);
            if self
                .alias_paths
                .iter()
                .any(|alias| alias.starts_with(&candidate))
            {
                cursor.advance();
                path = candidate;
            } else {
                break;
            }
        }
        if !self.alias_paths.contains(&path) {
            return None;
        }

        if !cursor.advance() {
            return None;
        }
        let command = cursor.current()?;
        if self.config.flags(&command.text).is_none() {
            return None;
        }
        if !cursor.peek().is_some_and(|t| t.is_op("(")) {
            return None;
        }
        Some(command.text.clone())
    }
}

/// Pop the top frame and attach its record to the enclosing frame, or to the
/// result list. Calls with no flag edits (and no edited nested calls) leave
/// no record.
fn close_frame(frames: &mut Vec<Frame>, records: &mut Vec<CallRecord>) {
    let Some(frame) = frames.pop() else { return };
    if frame.edits.is_empty() {
        return;
    }
    let record = CallRecord {
        command_name: frame.command_name,
        edits: frame.edits,
    };
    match frames.last_mut() {
        Some(parent) => parent.edits.push(Edit::Call(record)),
        None => records.push(record),
    }
}
