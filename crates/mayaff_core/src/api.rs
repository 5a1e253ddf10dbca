use std::env;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use tracing::debug;

use crate::config::MayaFlagsConfig;
use crate::flags::CallRecord;
use crate::scanner::FlagScanner;
use crate::tokens::TokenCursor;
use crate::{Error, imports, output, reformat, tokens};

const BOM_BYTES: &[u8] = b"\xef\xbb\xbf";

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Don't print progress messages.
    pub quiet: bool,
    /// Don't write changes, only report whether any were found.
    pub check_only: bool,
    /// Print a unified diff instead of writing the file.
    pub print_diff: bool,
}

/// Run the resolve -> scan pipeline over one source string. The returned
/// records are empty when the file never imports a configured namespace or
/// its target calls carry no abbreviated flags.
pub fn scan_source(
    source: &str,
    file_name: &str,
    config: &MayaFlagsConfig,
) -> Result<Vec<CallRecord>, Error> {
    let tree = imports::parse_python(source, file_name)?;
    let aliases = imports::resolve_aliases(&tree, source, config.modules());
    if aliases.is_empty() {
        debug!(file = file_name, "no maya imports found, skipping scan");
        return Ok(Vec::new());
    }
    let mut cursor = TokenCursor::new(tokens::lex_tree(&tree, source));
    Ok(FlagScanner::new(config, &aliases).scan(&mut cursor))
}

/// Rewrite one source string, returning it unchanged when there is nothing
/// to do.
pub fn format_source(source: &str, config: &MayaFlagsConfig) -> Result<String, Error> {
    let records = scan_source(source, "<string>", config)?;
    if records.is_empty() {
        return Ok(source.to_string());
    }
    Ok(reformat::reformat(source, &records))
}

/// Reformat one file on disk. Returns the number of flag edits found (zero
/// means the file was left alone). Depending on the options the new text is
/// written back, printed as a diff, or (check mode) discarded.
pub fn format_file(
    path: &Path,
    config: &MayaFlagsConfig,
    options: &FormatOptions,
) -> Result<usize, Error> {
    let file_name = path.display().to_string();
    let bytes = fs::read(path).map_err(|err| Error::io(path, err))?;
    let (source, text_encoding) = decode_source(&bytes, &file_name)?;

    let records = scan_source(&source, &file_name, config)?;
    let edits: usize = records.iter().map(CallRecord::edit_count).sum();
    if records.is_empty() || options.check_only {
        return Ok(edits);
    }

    let formatted = reformat::reformat(&source, &records);
    if options.print_diff {
        println!("{}", output::diff(&source, &formatted, &file_name));
        return Ok(edits);
    }

    fs::write(path, text_encoding.encode(&formatted)).map_err(|err| Error::io(path, err))?;

    if !options.quiet {
        println!("reformatted {}", relative_to_cwd(path).display());
    }
    Ok(edits)
}

/// What the decoder learned about one file, enough to write the rewritten
/// text back in the same byte representation.
struct SourceEncoding {
    encoding: &'static Encoding,
    had_bom: bool,
}

impl SourceEncoding {
    fn encode(&self, text: &str) -> Vec<u8> {
        let (encoded, _, _) = self.encoding.encode(text);
        if self.had_bom {
            let mut bytes = BOM_BYTES.to_vec();
            bytes.extend_from_slice(&encoded);
            bytes
        } else {
            encoded.into_owned()
        }
    }
}

/// Decode one file the way the Python toolchain does: a UTF-8 BOM wins,
/// otherwise a PEP 263 coding cookie on one of the first two lines names the
/// codec, otherwise UTF-8. Undecodable bytes are a per-file parse failure.
fn decode_source(bytes: &[u8], file_name: &str) -> Result<(String, SourceEncoding), Error> {
    let (payload, had_bom) = match bytes.strip_prefix(BOM_BYTES) {
        Some(rest) => (rest, true),
        None => (bytes, false),
    };
    let encoding = if had_bom {
        UTF_8
    } else {
        match declared_encoding(payload) {
            Some(label) => Encoding::for_label(label.as_bytes()).ok_or_else(|| {
                Error::parse(file_name, format!("unknown source encoding {label:?}"))
            })?,
            None => UTF_8,
        }
    };
    let (text, had_errors) = encoding.decode_without_bom_handling(payload);
    if had_errors {
        return Err(Error::parse(
            file_name,
            format!("file does not decode as {}", encoding.name()),
        ));
    }
    Ok((text.into_owned(), SourceEncoding { encoding, had_bom }))
}

/// The PEP 263 cookie, e.g. `# -*- coding: latin-1 -*-`. Only the first two
/// lines count and the line must be a comment.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    let cookie = Regex::new(r"^[ \t\x0C]*#.*?coding[:=][ \t]*([-_.a-zA-Z0-9]+)").ok()?;
    bytes
        .split(|&byte| byte == b'\n')
        .take(2)
        .find_map(|line| {
            let line = String::from_utf8_lossy(line);
            cookie.captures(&line).map(|caps| caps[1].to_string())
        })
}

fn relative_to_cwd(path: &Path) -> &Path {
    env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok())
        .unwrap_or(path)
}
