use std::fmt::{Display, Formatter};

use once_cell::unsync::OnceCell;

use super::Log;

/// Line/column location of a byte offset, used only for diagnostic output
/// (parse errors, trace logging) — never part of a [`crate::Token`]'s own
/// data.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The scanner's input buffer, with lazily-computed line-break positions, used
/// to turn a byte offset into a human-readable [`Position`] for diagnostics.
///
/// `Scanner` owns one `Code` for the whole parse and reuses it across every
/// `log()` call, so the line-break table is built at most once per parse
/// regardless of how many trace lines it produces.
pub struct Code<'c> {
    value: &'c [u8],
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'c> From<&'c [u8]> for Code<'c> {
    fn from(value: &'c [u8]) -> Self {
        Self {
            value,
            line_breaks: OnceCell::new(),
        }
    }
}

impl<'c> Code<'c> {
    fn obtain_line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.value
                .iter()
                .enumerate()
                .filter_map(|(index, n)| if *n == b'\n' { Some(index) } else { None })
                .collect()
        })
    }

    /// Translate a byte offset into a 1-based line/column `Position`.
    ///
    /// Columns are counted in bytes, not chars: TOK rejects any byte with
    /// the high bit set outside a `\uXXXX` escape, so every byte a
    /// successful scan has actually consumed is ASCII and a byte count is a
    /// char count.
    fn obtain_position(&self, pointer: usize) -> Position {
        let line_breaks = self.obtain_line_breaks();
        let index = match line_breaks.binary_search(&pointer) {
            Ok(index) | Err(index) => index,
        };

        if index == 0 {
            Position::new(1, pointer + 1)
        } else {
            let break_point = line_breaks[index - 1] + 1;
            Position::new(index + 1, pointer - break_point + 1)
        }
    }
}

impl Log {
    /// Print a trace/debug line if `self` is at least as verbose as `level`,
    /// tagging it with the byte `pointer`'s line/column in `code`.
    ///
    /// `#[cfg(debug_assertions)]`-gated, matching the original C parser's
    /// `MU_LOG_TRACE`/`MU_LOG_DEBUG` calls: release builds pay nothing for
    /// this, not even the `Position` computation.
    pub fn log(&self, level: Log, code: &Code, pointer: usize, message: std::fmt::Arguments) {
        #[cfg(debug_assertions)]
        if self.order() >= level.order() {
            let pos: Position = code.obtain_position(pointer);
            eprintln!("[{:?} @ {}] {}", level, pos, message);
        }
        #[cfg(not(debug_assertions))]
        {
            let _ = (level, code, pointer, message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_counts_from_one() {
        let code = Code::from(b"abc".as_slice());
        assert_eq!(code.obtain_position(0), Position::new(1, 1));
        assert_eq!(code.obtain_position(2), Position::new(1, 3));
    }

    #[test]
    fn tracks_line_breaks() {
        let code = Code::from(b"ab\ncd\nef".as_slice());
        // offsets:                0123 456 78
        assert_eq!(code.obtain_position(3), Position::new(2, 1));
        assert_eq!(code.obtain_position(7), Position::new(3, 2));
    }
}
