//! Ordering hint files
//!
//! A hint file lists archive-relative paths, one per line, in the order the
//! application loads them. Lines produced by Electron's tracing tools look
//! like `<pid>:<path>`; only the text after the last `:` is used.

/// Parse hint file contents into archive-relative paths
///
/// # Examples
///
/// ```
/// use asar_trim::codec::parse_ordering;
///
/// let paths = parse_ordering("1234:/main.js\n  /lib/a.js \n\nrenderer.js\n");
/// assert_eq!(paths, vec!["main.js", "lib/a.js", "renderer.js"]);
/// ```
pub fn parse_ordering(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.rsplit(':').next().unwrap_or(line))
        .map(str::trim)
        .map(|line| line.strip_prefix('/').unwrap_or(line))
        .filter(|line| !line.is_empty())
        .map(|line| line.replace('\\', "/"))
        .collect()
}

/// Every prefix of a relative path, shortest first
///
/// `a/b/c.js` yields `a`, `a/b`, `a/b/c.js`.
pub(crate) fn path_prefixes(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(idx, _)| &path[..idx])
        .chain(std::iter::once(path))
        .filter(|prefix| !prefix.is_empty())
}
