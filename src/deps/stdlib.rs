// src/deps/stdlib.rs

//! Standard-library membership test for import paths.

/// Top-level roots of the Go standard library.
///
/// An import whose first path segment is one of these never leaves the
/// toolchain's own tree, so it is never worth watching.
pub const GO_STDLIB_ROOTS: &[&str] = &[
    "C",
    "archive",
    "bufio",
    "bytes",
    "cmp",
    "compress",
    "container",
    "context",
    "crypto",
    "database",
    "debug",
    "embed",
    "encoding",
    "errors",
    "expvar",
    "flag",
    "fmt",
    "go",
    "hash",
    "html",
    "image",
    "index",
    "io",
    "iter",
    "log",
    "maps",
    "math",
    "mime",
    "net",
    "os",
    "path",
    "plugin",
    "reflect",
    "regexp",
    "runtime",
    "slices",
    "sort",
    "strconv",
    "strings",
    "structs",
    "sync",
    "syscall",
    "testing",
    "text",
    "time",
    "unicode",
    "unique",
    "unsafe",
    "weak",
];

/// Immutable set of standard-library roots, injected into the graph builder.
#[derive(Debug, Clone, Copy)]
pub struct StdLib {
    roots: &'static [&'static str],
}

impl StdLib {
    pub const fn new(roots: &'static [&'static str]) -> Self {
        Self { roots }
    }

    /// The Go standard library.
    pub const fn go() -> Self {
        Self::new(GO_STDLIB_ROOTS)
    }

    /// Whether `segment` (the first segment of an import path) is a
    /// standard-library root.
    pub fn is_root(&self, segment: &str) -> bool {
        self.roots.contains(&segment)
    }

    /// Whether the whole import path lives under a standard-library root.
    pub fn contains_import(&self, import: &str) -> bool {
        let first = import.split('/').next().unwrap_or_default();
        self.is_root(first)
    }
}

impl Default for StdLib {
    fn default() -> Self {
        Self::go()
    }
}
