//! Path normalizer and splitter.
//!
//! The path generator packs commands and numbers together
//! (`M10,10L20,20Z`). Document hosts want them spaced out
//! (`M 10 10 L 20 20 Z`), and want one shape per closed ring. `normalize`
//! produces the spaced form; `split` cuts it into subpaths at every move.
//!
//! Only the path command letters count as commands. The `e`/`E` of an
//! exponent (`1e-5`) stays glued to its number.

/// Path command letters (absolute and relative).
const COMMANDS: &str = "MmLlHhVvCcSsQqTtAaZz";

#[inline]
fn is_command(c: char) -> bool {
    COMMANDS.contains(c)
}

#[inline]
fn is_move(c: char) -> bool {
    c == 'M' || c == 'm'
}

/// Canonicalize path syntax.
///
/// Commas become whitespace, whitespace runs collapse to one space, every
/// command letter is surrounded by single spaces, and the ends are trimmed.
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 2);
    let mut pending_space = false;

    for c in raw.chars() {
        if c == ',' || c.is_whitespace() {
            pending_space = true;
        } else if is_command(c) {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push(c);
            pending_space = true;
        } else {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            out.push(c);
            pending_space = false;
        }
    }
    out
}

/// Split a normalized path into subpaths, one per move command.
///
/// Segments are trimmed and empty ones dropped. Splitting a single subpath
/// returns it unchanged.
pub fn split(cleaned: &str) -> Vec<&str> {
    let mut starts: Vec<usize> = cleaned
        .char_indices()
        .filter(|&(_, c)| is_move(c))
        .map(|(i, _)| i)
        .collect();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    starts.push(cleaned.len());

    starts
        .windows(2)
        .map(|w| cleaned[w[0]..w[1]].trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// `normalize` then `split`, owning the results.
pub fn normalize_and_split(raw: &str) -> Vec<String> {
    let cleaned = normalize(raw);
    split(&cleaned).into_iter().map(str::to_string).collect()
}

// ============================================================================
// TESTS
// ============================================================================
