//! Resolved-edge filtering.
//!
//! A pure keep/drop predicate applied after resolution and before graph
//! insertion. The typical policies are suppressing edges into the standard
//! library and into third-party installations, so the graph only shows the
//! project's own structure. Both policies can be switched off to get the
//! complete picture.

use std::{collections::HashSet, path::PathBuf};

use log::debug;

use crate::modules::ResolvedImport;

/// Top-level names of standard-library and built-in modules.
///
/// The host exposes this list at runtime; without a runtime to ask, the table
/// is embedded. Only the first segment of a target is checked, which matches
/// how the host attributes a dotted name to a distribution.
const STDLIB_MODULES: &[&str] = &[
    "abc", "aifc", "argparse", "array", "ast", "asynchat", "asyncio", "asyncore", "atexit",
    "audioop", "base64", "bdb", "binascii", "bisect", "builtins", "bz2", "cProfile", "calendar",
    "cgi", "cgitb", "chunk", "cmath", "cmd", "code", "codecs", "codeop", "collections",
    "colorsys", "compileall", "concurrent", "configparser", "contextlib", "contextvars", "copy",
    "copyreg", "crypt", "csv", "ctypes", "curses", "dataclasses", "datetime", "dbm", "decimal",
    "difflib", "dis", "distutils", "doctest", "email", "encodings", "enum", "errno",
    "faulthandler", "fcntl", "filecmp", "fileinput", "fnmatch", "fractions", "ftplib",
    "functools", "gc", "getopt", "getpass", "gettext", "glob", "graphlib", "grp", "gzip",
    "hashlib", "heapq", "hmac", "html", "http", "imaplib", "imghdr", "importlib", "inspect",
    "io", "ipaddress", "itertools", "json", "keyword", "linecache", "locale", "logging", "lzma",
    "mailbox", "mailcap", "marshal", "math", "mimetypes", "mmap", "modulefinder",
    "multiprocessing", "netrc", "nntplib", "numbers", "operator", "optparse", "os", "pathlib",
    "pdb", "pickle", "pickletools", "pipes", "pkgutil", "platform", "plistlib", "poplib",
    "posix", "pprint", "profile", "pstats", "pty", "pwd", "pyclbr", "pydoc", "queue", "quopri",
    "random", "re", "readline", "reprlib", "resource", "rlcompleter", "runpy", "sched",
    "secrets", "select", "selectors", "shelve", "shlex", "shutil", "signal", "site", "smtpd",
    "smtplib", "sndhdr", "socket", "socketserver", "sqlite3", "ssl", "stat", "statistics",
    "string", "stringprep", "struct", "subprocess", "sunau", "symtable", "sys", "sysconfig",
    "syslog", "tabnanny", "tarfile", "telnetlib", "tempfile", "termios", "textwrap",
    "threading", "time", "timeit", "tkinter", "token", "tokenize", "tomllib", "trace",
    "traceback", "tracemalloc", "tty", "turtle", "types", "typing", "unicodedata", "unittest",
    "urllib", "uu", "uuid", "venv", "warnings", "wave", "weakref", "webbrowser", "winreg",
    "winsound", "wsgiref", "xdrlib", "xml", "xmlrpc", "zipapp", "zipfile", "zipimport", "zlib",
    "zoneinfo",
];

/// Keep/drop predicate over resolved edges.
///
/// Cheap to clone; shared read-only across worker threads.
#[derive(Debug, Clone, Default)]
pub struct ImportFilter {
    include_std: bool,
    include_third_party: bool,
    third_party_roots: Vec<PathBuf>,
}

impl ImportFilter {
    /// Create a filter that drops standard-library and third-party edges.
    ///
    /// `third_party_roots` are installation directories (the site-packages
    /// analogue): any target whose probed file lies under one of them is
    /// classified as third-party.
    #[must_use]
    pub fn new(third_party_roots: Vec<PathBuf>) -> Self {
        Self {
            include_std: false,
            include_third_party: false,
            third_party_roots,
        }
    }

    /// Keep standard-library edges instead of dropping them.
    #[must_use]
    pub fn include_std(mut self, include: bool) -> Self {
        self.include_std = include;
        self
    }

    /// Keep third-party edges instead of dropping them.
    #[must_use]
    pub fn include_third_party(mut self, include: bool) -> Self {
        self.include_third_party = include;
        self
    }

    /// Whether one resolved edge should be kept.
    #[must_use]
    pub fn keep(&self, import: &ResolvedImport) -> bool {
        if !self.include_std && self.is_std(import) {
            debug!("skipping {} as a standard-library module", import.target);
            return false;
        }

        if !self.include_third_party && self.is_third_party(import) {
            debug!("skipping {} as a third-party module", import.target);
            return false;
        }

        true
    }

    /// Apply the predicate to a resolved edge set.
    #[must_use]
    pub fn apply(&self, imports: HashSet<ResolvedImport>) -> HashSet<ResolvedImport> {
        imports.into_iter().filter(|i| self.keep(i)).collect()
    }

    fn is_std(&self, import: &ResolvedImport) -> bool {
        match import.target.segments().first() {
            Some(top) => STDLIB_MODULES.contains(&top.as_str()),
            None => false,
        }
    }

    fn is_third_party(&self, import: &ResolvedImport) -> bool {
        self.third_party_roots
            .iter()
            .any(|root| import.target_path.starts_with(root))
    }
}
