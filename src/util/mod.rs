mod logger;

pub use logger::Code;

/// Diagnostic verbosity, ordered from silent to most chatty.
///
/// The original C parser threads a level + format + varargs call through
/// every parse step via an opaque `MU_LOG_*` sink; this is the Rust
/// equivalent of that sink's level axis. `order()` lets a call site compare
/// "is this level at least as verbose as that one" without a match arm per
/// comparison.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Log {
    None,
    Debug,
    Trace,
}

impl Log {
    pub fn order(&self) -> u8 {
        match self {
            Log::None => 0,
            Log::Debug => 1,
            Log::Trace => 2,
        }
    }
}
