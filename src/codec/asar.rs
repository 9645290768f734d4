//! Electron asar reader and writer
//!
//! Layout of an asar file:
//!
//! ```text
//! [u32 LE = 4][u32 LE header_size]           size pickle, 8 bytes
//! [u32 LE payload][u32 LE json_len][json][pad] header pickle, header_size bytes
//! [file data ...]                             offsets relative to 8 + header_size
//! ```
//!
//! The header JSON is a tree of nodes: directories (`{"files": {...}}`),
//! files (`{"size", "offset", "executable"?, "unpacked"?, "integrity"?}`)
//! and links (`{"link": "relative/target"}`). Files flagged `unpacked` live
//! next to the archive in `<archive>.unpacked/`.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Component, Path, PathBuf};

use log::{debug, trace};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use super::ordering::{parse_ordering, path_prefixes};
use super::{unpacked_dir, ArchiveCodec, CodecError, PackOptions};

const SIZE_PICKLE_LEN: u64 = 8;
const INTEGRITY_BLOCK_SIZE: usize = 4 * 1024 * 1024;

/// Asar implementation of [`ArchiveCodec`]
#[derive(Debug, Clone, Copy, Default)]
pub struct AsarCodec;

impl AsarCodec {
    /// Create a new codec
    pub fn new() -> Self {
        Self
    }

    /// Read and parse the header of `archive`
    ///
    /// Returns the header tree and the absolute offset where file data starts.
    pub fn read_header(&self, archive: &Path) -> Result<(Value, u64), CodecError> {
        let mut file = File::open(archive).map_err(|e| CodecError::io(archive, e))?;

        let mut size_pickle = [0u8; SIZE_PICKLE_LEN as usize];
        file.read_exact(&mut size_pickle)
            .map_err(|_| CodecError::InvalidHeader("file shorter than size pickle".into()))?;
        let header_size = u64::from(read_u32(&size_pickle, 4));

        let file_len = file
            .metadata()
            .map_err(|e| CodecError::io(archive, e))?
            .len();
        if SIZE_PICKLE_LEN + header_size > file_len {
            return Err(CodecError::InvalidHeader(format!(
                "header size {header_size} exceeds file length {file_len}"
            )));
        }

        let mut header = vec![0u8; header_size as usize];
        file.read_exact(&mut header)
            .map_err(|e| CodecError::io(archive, e))?;
        if header.len() < 8 {
            return Err(CodecError::InvalidHeader("header pickle too short".into()));
        }

        let json_len = read_u32(&header, 4) as usize;
        let json_bytes = header
            .get(8..8 + json_len)
            .ok_or_else(|| CodecError::InvalidHeader("header string overruns pickle".into()))?;
        let tree: Value = serde_json::from_slice(json_bytes)?;
        if !tree.get("files").is_some_and(Value::is_object) {
            return Err(CodecError::InvalidHeader("root node has no files".into()));
        }

        Ok((tree, SIZE_PICKLE_LEN + header_size))
    }

    fn extract_dir(
        &self,
        ctx: &mut ExtractContext<'_>,
        node: &Value,
        rel: &str,
    ) -> Result<(), CodecError> {
        let files = node
            .get("files")
            .and_then(Value::as_object)
            .ok_or_else(|| CodecError::InvalidHeader(format!("'{rel}' is not a directory")))?;

        for (name, child) in files {
            check_entry_name(name)?;
            let child_rel = join_rel(rel, name);
            let dest = ctx.dest.join(&child_rel);

            if child.get("files").is_some() {
                fs::create_dir_all(&dest).map_err(|e| CodecError::io(&dest, e))?;
                self.extract_dir(ctx, child, &child_rel)?;
            } else if let Some(target) = child.get("link") {
                let target = target
                    .as_str()
                    .ok_or_else(|| CodecError::InvalidHeader(format!("bad link at '{child_rel}'")))?;
                create_link(&dest, &child_rel, target)?;
            } else {
                ctx.extract_file(child, &child_rel, &dest)?;
            }
        }
        Ok(())
    }
}

impl ArchiveCodec for AsarCodec {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), CodecError> {
        let (tree, data_base) = self.read_header(archive)?;
        debug!(
            "Extracting {} (data at offset {}) to {}",
            archive.display(),
            data_base,
            dest.display()
        );

        fs::create_dir_all(dest).map_err(|e| CodecError::io(dest, e))?;
        let file = File::open(archive).map_err(|e| CodecError::io(archive, e))?;
        let mut ctx = ExtractContext {
            archive,
            reader: BufReader::new(file),
            data_base,
            unpacked: unpacked_dir(archive),
            dest,
        };
        self.extract_dir(&mut ctx, &tree, "")
    }

    fn pack(
        &self,
        source: &Path,
        archive: &Path,
        options: &PackOptions,
    ) -> Result<(), CodecError> {
        let crawled = crawl(source)?;
        let ordered = match &options.ordering {
            Some(hint) => {
                let text = fs::read_to_string(hint).map_err(|e| CodecError::io(hint, e))?;
                apply_ordering(crawled, &parse_ordering(&text))
            }
            None => crawled,
        };

        let unpacked = unpacked_dir(archive);
        let mut root = json!({ "files": {} });
        let mut payload: Vec<PathBuf> = Vec::new();
        let mut unpacked_files: Vec<&CrawledEntry> = Vec::new();
        let mut offset: u64 = 0;

        for entry in &ordered {
            let parent = ensure_parent(&mut root, &entry.rel)?;
            let name = entry.rel.rsplit('/').next().unwrap_or(&entry.rel).to_string();
            let node = match entry.kind {
                EntryKind::Directory => {
                    if parent.contains_key(&name) {
                        continue;
                    }
                    json!({ "files": {} })
                }
                EntryKind::Link => json!({ "link": link_target(source, &entry.path)? }),
                EntryKind::File { size, executable } => {
                    let mut node = Map::new();
                    node.insert("size".into(), json!(size));
                    if unpacked.join(&entry.rel).is_file() {
                        node.insert("unpacked".into(), json!(true));
                        unpacked_files.push(entry);
                    } else {
                        node.insert("offset".into(), json!(offset.to_string()));
                        node.insert("integrity".into(), integrity(&entry.path)?);
                        offset += size;
                        payload.push(entry.path.clone());
                    }
                    if executable {
                        node.insert("executable".into(), json!(true));
                    }
                    Value::Object(node)
                }
            };
            parent.insert(name, node);
        }

        let header = serde_json::to_string(&root)?;
        debug!(
            "Packing {} entries ({} bytes of data, {} byte header) into {}",
            ordered.len(),
            offset,
            header.len(),
            archive.display()
        );
        write_archive(archive, &header, &payload)?;
        sync_unpacked(&unpacked, &unpacked_files, &ordered)
    }
}

struct ExtractContext<'a> {
    archive: &'a Path,
    reader: BufReader<File>,
    data_base: u64,
    unpacked: PathBuf,
    dest: &'a Path,
}

impl ExtractContext<'_> {
    fn extract_file(&mut self, node: &Value, rel: &str, dest: &Path) -> Result<(), CodecError> {
        let size = node
            .get("size")
            .and_then(Value::as_u64)
            .ok_or_else(|| CodecError::InvalidHeader(format!("missing size for '{rel}'")))?;

        if node.get("unpacked").and_then(Value::as_bool) == Some(true) {
            let src = self.unpacked.join(rel);
            trace!("Copying unpacked file {}", src.display());
            fs::copy(&src, dest).map_err(|e| CodecError::io(&src, e))?;
        } else {
            let offset = node
                .get("offset")
                .and_then(|o| match o {
                    Value::String(s) => s.parse::<u64>().ok(),
                    Value::Number(n) => n.as_u64(),
                    _ => None,
                })
                .ok_or_else(|| CodecError::InvalidHeader(format!("bad offset for '{rel}'")))?;

            self.reader
                .seek(SeekFrom::Start(self.data_base + offset))
                .map_err(|e| CodecError::io(self.archive, e))?;
            let mut out = File::create(dest).map_err(|e| CodecError::io(dest, e))?;
            let copied = io::copy(&mut (&mut self.reader).take(size), &mut out)
                .map_err(|e| CodecError::io(dest, e))?;
            if copied != size {
                return Err(CodecError::InvalidHeader(format!(
                    "'{rel}' truncated: expected {size} bytes, got {copied}"
                )));
            }
        }

        if node.get("executable").and_then(Value::as_bool) == Some(true) {
            set_executable(dest)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Directory,
    Link,
    File { size: u64, executable: bool },
}

#[derive(Debug, Clone)]
struct CrawledEntry {
    path: PathBuf,
    rel: String,
    kind: EntryKind,
}

/// Pre-order listing of `source`, sorted by name within each directory
fn crawl(source: &Path) -> Result<Vec<CrawledEntry>, CodecError> {
    let mut entries = Vec::new();
    for item in WalkDir::new(source)
        .min_depth(1)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = item.map_err(|e| walk_error(source, e))?;

        let rel = relative_key(source, entry.path())?;
        let file_type = entry.file_type();
        let kind = if file_type.is_symlink() {
            EntryKind::Link
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else {
            let metadata = entry
                .metadata()
                .map_err(|e| CodecError::io(entry.path(), e.into()))?;
            EntryKind::File {
                size: metadata.len(),
                executable: is_executable(&metadata),
            }
        };

        entries.push(CrawledEntry {
            path: entry.into_path(),
            rel,
            kind,
        });
    }
    Ok(entries)
}

fn walk_error(root: &Path, e: walkdir::Error) -> CodecError {
    let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.into());
    let source = e
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    CodecError::Io { path, source }
}

/// Bring `<archive>.unpacked/` in line with the packed tree
///
/// Files listed as unpacked get the source bytes, so header sizes match what
/// is on disk. Files no longer present in the source are removed; directories
/// are left alone.
fn sync_unpacked(
    unpacked: &Path,
    kept: &[&CrawledEntry],
    packed: &[CrawledEntry],
) -> Result<(), CodecError> {
    if !unpacked.is_dir() {
        return Ok(());
    }

    for entry in kept {
        let dest = unpacked.join(&entry.rel);
        fs::copy(&entry.path, &dest).map_err(|e| CodecError::io(&dest, e))?;
    }

    let present: HashSet<&str> = packed.iter().map(|e| e.rel.as_str()).collect();
    for item in WalkDir::new(unpacked).min_depth(1).follow_links(false) {
        let entry = item.map_err(|e| walk_error(unpacked, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let rel = relative_key(unpacked, entry.path())?;
        if !present.contains(rel.as_str()) {
            debug!("Removing trimmed unpacked file {}", entry.path().display());
            fs::remove_file(entry.path()).map_err(|e| CodecError::io(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Hinted paths (and their parents) first, then the rest in crawl order
fn apply_ordering(crawled: Vec<CrawledEntry>, hints: &[String]) -> Vec<CrawledEntry> {
    if hints.is_empty() {
        return crawled;
    }

    let order = {
        let index: HashMap<&str, usize> = crawled
            .iter()
            .enumerate()
            .map(|(i, e)| (e.rel.as_str(), i))
            .collect();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut order: Vec<usize> = Vec::with_capacity(crawled.len());

        for hint in hints {
            for prefix in path_prefixes(hint) {
                if let Some(&i) = index.get(prefix) {
                    if seen.insert(prefix) {
                        order.push(i);
                    }
                }
            }
        }
        trace!("{} entries placed by ordering hint", order.len());
        for (i, entry) in crawled.iter().enumerate() {
            if !seen.contains(entry.rel.as_str()) {
                order.push(i);
            }
        }
        order
    };

    let mut slots: Vec<Option<CrawledEntry>> = crawled.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

/// Find or create the `files` map that will hold `rel`
fn ensure_parent<'a>(root: &'a mut Value, rel: &str) -> Result<&'a mut Map<String, Value>, CodecError> {
    let mut components: Vec<&str> = rel.split('/').collect();
    components.pop();

    let mut node = root;
    for component in components {
        let files = files_of(node, rel)?;
        node = files
            .entry(component.to_string())
            .or_insert_with(|| json!({ "files": {} }));
    }
    files_of(node, rel)
}

fn files_of<'a>(node: &'a mut Value, rel: &str) -> Result<&'a mut Map<String, Value>, CodecError> {
    node.get_mut("files")
        .and_then(Value::as_object_mut)
        .ok_or_else(|| CodecError::InvalidHeader(format!("parent of '{rel}' is not a directory")))
}

fn write_archive(archive: &Path, header: &str, payload: &[PathBuf]) -> Result<(), CodecError> {
    let json_len = u32::try_from(header.len())
        .map_err(|_| CodecError::InvalidHeader("header larger than 4 GiB".into()))?;
    let padded = header.len().next_multiple_of(4);
    let payload_len = 4 + padded as u32;
    let header_size = 4 + payload_len;

    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "archive".into());
    let temp = archive.with_file_name(format!(".{}.{}.tmp", file_name, uuid::Uuid::new_v4()));

    let result = (|| -> Result<(), CodecError> {
        let file = File::create(&temp).map_err(|e| CodecError::io(&temp, e))?;
        let mut out = BufWriter::new(file);
        let io_err = |e| CodecError::io(&temp, e);

        out.write_all(&4u32.to_le_bytes()).map_err(io_err)?;
        out.write_all(&header_size.to_le_bytes()).map_err(io_err)?;
        out.write_all(&payload_len.to_le_bytes()).map_err(io_err)?;
        out.write_all(&json_len.to_le_bytes()).map_err(io_err)?;
        out.write_all(header.as_bytes()).map_err(io_err)?;
        out.write_all(&[0u8; 3][..padded - header.len()])
            .map_err(io_err)?;

        for path in payload {
            let mut input = File::open(path).map_err(|e| CodecError::io(path, e))?;
            io::copy(&mut input, &mut out).map_err(|e| CodecError::io(path, e))?;
        }

        out.into_inner()
            .map_err(|e| CodecError::io(&temp, e.into_error()))?
            .sync_all()
            .map_err(io_err)?;
        fs::rename(&temp, archive).map_err(|e| CodecError::io(archive, e))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp);
    }
    result
}

fn integrity(path: &Path) -> Result<Value, CodecError> {
    let mut file = File::open(path).map_err(|e| CodecError::io(path, e))?;
    let mut whole = Sha256::new();
    let mut blocks = Vec::new();
    let mut buf = vec![0u8; INTEGRITY_BLOCK_SIZE];

    loop {
        let filled = read_block(&mut file, &mut buf).map_err(|e| CodecError::io(path, e))?;
        if filled == 0 {
            break;
        }
        whole.update(&buf[..filled]);
        blocks.push(Value::String(format!("{:x}", Sha256::digest(&buf[..filled]))));
        if filled < buf.len() {
            break;
        }
    }
    if blocks.is_empty() {
        blocks.push(Value::String(format!("{:x}", Sha256::digest(b""))));
    }

    Ok(json!({
        "algorithm": "SHA256",
        "hash": format!("{:x}", whole.finalize()),
        "blockSize": INTEGRITY_BLOCK_SIZE,
        "blocks": blocks,
    }))
}

/// Fill `buf` as far as possible; returns the byte count (0 at EOF)
fn read_block(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn link_target(source: &Path, link: &Path) -> Result<String, CodecError> {
    let target = fs::read_link(link).map_err(|e| CodecError::io(link, e))?;
    let parent = link.parent().unwrap_or(source);
    let absolute = normalize(&parent.join(target));
    let outside = || CodecError::LinkOutsideArchive {
        link: link.to_path_buf(),
        root: source.to_path_buf(),
    };
    let rel = absolute.strip_prefix(normalize(source)).map_err(|_| outside())?;
    if rel.as_os_str().is_empty() {
        return Err(outside());
    }
    Ok(path_to_key(rel))
}

fn create_link(dest: &Path, rel: &str, target: &str) -> Result<(), CodecError> {
    for component in target.split('/') {
        check_entry_name(component)?;
    }
    let depth = rel.matches('/').count();
    let relative: PathBuf = std::iter::repeat_n("..", depth)
        .chain(target.split('/'))
        .collect();
    symlink(&relative, dest)
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> Result<(), CodecError> {
    std::os::unix::fs::symlink(target, link).map_err(|e| CodecError::io(link, e))
}

#[cfg(not(unix))]
fn symlink(target: &Path, link: &Path) -> Result<(), CodecError> {
    log::warn!(
        "Symbolic links are not supported here; skipping {} -> {}",
        link.display(),
        target.display()
    );
    Ok(())
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o100 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    false
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<(), CodecError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| CodecError::io(path, e))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<(), CodecError> {
    Ok(())
}

fn check_entry_name(name: &str) -> Result<(), CodecError> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(CodecError::UnsafePath(name.to_string()));
    }
    Ok(())
}

fn join_rel(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn relative_key(root: &Path, path: &Path) -> Result<String, CodecError> {
    let rel = path
        .strip_prefix(root)
        .map_err(|_| CodecError::UnsafePath(path.display().to_string()))?;
    Ok(path_to_key(rel))
}

fn path_to_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[at..at + 4]);
    u32::from_le_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_tree(root: &Path) {
        fs::create_dir_all(root.join("lib/nested")).unwrap();
        fs::write(root.join("package.json"), r#"{"name":"app","main":"main.js"}"#).unwrap();
        fs::write(root.join("main.js"), "require('./lib/a')").unwrap();
        fs::write(root.join("lib/a.js"), "module.exports = 1").unwrap();
        fs::write(root.join("lib/nested/empty.txt"), "").unwrap();
    }

    fn pack_tree(temp: &TempDir) -> PathBuf {
        let src = temp.path().join("src");
        build_tree(&src);
        let archive = temp.path().join("app.asar");
        AsarCodec::new()
            .pack(&src, &archive, &PackOptions::default())
            .unwrap();
        archive
    }

    mod format {
        use super::*;

        #[test]
        fn test_size_pickle_and_header_alignment() {
            let temp = TempDir::new().unwrap();
            let archive = pack_tree(&temp);
            let bytes = fs::read(&archive).unwrap();

            assert_eq!(read_u32(&bytes, 0), 4);
            let header_size = read_u32(&bytes, 4) as usize;
            assert_eq!(header_size % 4, 0);
            let payload = read_u32(&bytes, 8) as usize;
            assert_eq!(payload + 4, header_size);
            let json_len = read_u32(&bytes, 12) as usize;
            let json: Value = serde_json::from_slice(&bytes[16..16 + json_len]).unwrap();
            assert!(json["files"]["lib"]["files"]["a.js"].is_object());
        }

        #[test]
        fn test_header_records_offsets_and_integrity() {
            let temp = TempDir::new().unwrap();
            let archive = pack_tree(&temp);
            let (tree, base) = AsarCodec::new().read_header(&archive).unwrap();

            let main = &tree["files"]["main.js"];
            assert_eq!(main["size"], json!(18));
            assert!(main["offset"].is_string());
            assert_eq!(main["integrity"]["algorithm"], "SHA256");
            assert_eq!(main["integrity"]["blocks"].as_array().unwrap().len(), 1);

            let offset: u64 = main["offset"].as_str().unwrap().parse().unwrap();
            let bytes = fs::read(&archive).unwrap();
            let start = (base + offset) as usize;
            assert_eq!(&bytes[start..start + 18], b"require('./lib/a')");
        }

        #[test]
        fn test_pack_replaces_existing_archive_without_leftovers() {
            let temp = TempDir::new().unwrap();
            let archive = pack_tree(&temp);
            fs::write(temp.path().join("src/extra.js"), "x").unwrap();
            AsarCodec::new()
                .pack(&temp.path().join("src"), &archive, &PackOptions::default())
                .unwrap();

            let (tree, _) = AsarCodec::new().read_header(&archive).unwrap();
            assert!(tree["files"]["extra.js"].is_object());

            let leftovers = fs::read_dir(temp.path())
                .unwrap()
                .filter_map(Result::ok)
                .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
                .count();
            assert_eq!(leftovers, 0);
        }
    }

    mod extraction {
        use super::*;

        #[test]
        fn test_extract_restores_tree() {
            let temp = TempDir::new().unwrap();
            let archive = pack_tree(&temp);
            let out = temp.path().join("out");
            AsarCodec::new().extract(&archive, &out).unwrap();

            assert_eq!(
                fs::read_to_string(out.join("main.js")).unwrap(),
                "require('./lib/a')"
            );
            assert_eq!(
                fs::read_to_string(out.join("lib/a.js")).unwrap(),
                "module.exports = 1"
            );
            assert_eq!(fs::read(out.join("lib/nested/empty.txt")).unwrap().len(), 0);
        }

        #[test]
        fn test_extract_rejects_garbage() {
            let temp = TempDir::new().unwrap();
            let archive = temp.path().join("bad.asar");
            fs::write(&archive, b"not an archive at all").unwrap();

            let err = AsarCodec::new()
                .extract(&archive, &temp.path().join("out"))
                .unwrap_err();
            assert!(matches!(err, CodecError::InvalidHeader(_)));
        }

        #[test]
        fn test_extract_rejects_short_file() {
            let temp = TempDir::new().unwrap();
            let archive = temp.path().join("short.asar");
            fs::write(&archive, [4u8, 0, 0]).unwrap();

            let err = AsarCodec::new()
                .extract(&archive, &temp.path().join("out"))
                .unwrap_err();
            assert!(matches!(err, CodecError::InvalidHeader(_)));
        }

        #[test]
        fn test_extract_missing_archive_is_io_error() {
            let temp = TempDir::new().unwrap();
            let err = AsarCodec::new()
                .extract(&temp.path().join("nope.asar"), &temp.path().join("out"))
                .unwrap_err();
            assert!(matches!(err, CodecError::Io { .. }));
        }

        #[test]
        fn test_extract_rejects_parent_dir_entries() {
            let temp = TempDir::new().unwrap();
            let archive = temp.path().join("evil.asar");
            let header = r#"{"files":{"..":{"files":{"x":{"size":0,"offset":"0"}}}}}"#;
            write_archive(&archive, header, &[]).unwrap();

            let err = AsarCodec::new()
                .extract(&archive, &temp.path().join("out"))
                .unwrap_err();
            assert!(matches!(err, CodecError::UnsafePath(_)));
        }

        #[test]
        fn test_extract_copies_unpacked_files() {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            build_tree(&src);
            fs::write(src.join("native.node"), "binary").unwrap();

            let archive = temp.path().join("app.asar");
            let unpacked = unpacked_dir(&archive);
            fs::create_dir_all(&unpacked).unwrap();
            fs::write(unpacked.join("native.node"), "binary").unwrap();

            AsarCodec::new()
                .pack(&src, &archive, &PackOptions::default())
                .unwrap();
            let (tree, _) = AsarCodec::new().read_header(&archive).unwrap();
            assert_eq!(tree["files"]["native.node"]["unpacked"], json!(true));
            assert!(tree["files"]["native.node"].get("offset").is_none());

            let out = temp.path().join("out");
            AsarCodec::new().extract(&archive, &out).unwrap();
            assert_eq!(fs::read_to_string(out.join("native.node")).unwrap(), "binary");
        }

        #[test]
        fn test_repack_syncs_unpacked_dir_with_source() {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            fs::create_dir_all(src.join("data")).unwrap();
            fs::write(src.join("data/table.json"), r#"{"a":1}"#).unwrap();

            let archive = temp.path().join("app.asar");
            let unpacked = unpacked_dir(&archive);
            fs::create_dir_all(unpacked.join("data")).unwrap();
            fs::write(unpacked.join("data/table.json"), "{\n  \"a\": 1\n}\n").unwrap();
            fs::write(unpacked.join("data/README.md"), "docs").unwrap();

            AsarCodec::new()
                .pack(&src, &archive, &PackOptions::default())
                .unwrap();

            let (tree, _) = AsarCodec::new().read_header(&archive).unwrap();
            let node = &tree["files"]["data"]["files"]["table.json"];
            assert_eq!(node["unpacked"], json!(true));
            let on_disk = fs::read(unpacked.join("data/table.json")).unwrap();
            assert_eq!(node["size"], json!(on_disk.len()));
            assert_eq!(on_disk, br#"{"a":1}"#);
            assert!(!unpacked.join("data/README.md").exists());
            assert!(unpacked.join("data").is_dir());
        }

        #[test]
        #[cfg(unix)]
        fn test_links_and_executables_survive() {
            use std::os::unix::fs::PermissionsExt;

            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            build_tree(&src);
            fs::set_permissions(src.join("main.js"), fs::Permissions::from_mode(0o755)).unwrap();
            std::os::unix::fs::symlink("../main.js", src.join("lib/main-link.js")).unwrap();

            let archive = temp.path().join("app.asar");
            AsarCodec::new()
                .pack(&src, &archive, &PackOptions::default())
                .unwrap();
            let (tree, _) = AsarCodec::new().read_header(&archive).unwrap();
            assert_eq!(tree["files"]["lib"]["files"]["main-link.js"]["link"], "main.js");

            let out = temp.path().join("out");
            AsarCodec::new().extract(&archive, &out).unwrap();
            let mode = fs::metadata(out.join("main.js")).unwrap().permissions().mode();
            assert_ne!(mode & 0o100, 0);
            assert_eq!(
                fs::read_to_string(out.join("lib/main-link.js")).unwrap(),
                "require('./lib/a')"
            );
        }

        #[test]
        #[cfg(unix)]
        fn test_pack_rejects_link_outside_source() {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            build_tree(&src);
            std::os::unix::fs::symlink("/etc/passwd", src.join("escape")).unwrap();

            let err = AsarCodec::new()
                .pack(&src, &temp.path().join("app.asar"), &PackOptions::default())
                .unwrap_err();
            assert!(matches!(err, CodecError::LinkOutsideArchive { .. }));
        }
    }

    mod ordering {
        use super::*;

        fn header_keys(archive: &Path) -> Vec<String> {
            let (tree, _) = AsarCodec::new().read_header(archive).unwrap();
            tree["files"].as_object().unwrap().keys().cloned().collect()
        }

        #[test]
        fn test_default_order_is_sorted_by_name() {
            let temp = TempDir::new().unwrap();
            let archive = pack_tree(&temp);
            assert_eq!(header_keys(&archive), vec!["lib", "main.js", "package.json"]);
        }

        #[test]
        fn test_hint_file_moves_entries_first() {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            build_tree(&src);
            let hint = temp.path().join("order.txt");
            fs::write(&hint, "1:/package.json\n2:/lib/a.js\nmissing.js\n").unwrap();

            let archive = temp.path().join("app.asar");
            let options = PackOptions {
                ordering: Some(hint),
            };
            AsarCodec::new().pack(&src, &archive, &options).unwrap();

            assert_eq!(header_keys(&archive), vec!["package.json", "lib", "main.js"]);

            let (tree, _) = AsarCodec::new().read_header(&archive).unwrap();
            assert_eq!(tree["files"]["package.json"]["offset"], "0");
        }

        #[test]
        fn test_missing_hint_file_is_io_error() {
            let temp = TempDir::new().unwrap();
            let src = temp.path().join("src");
            build_tree(&src);
            let options = PackOptions {
                ordering: Some(temp.path().join("nope.txt")),
            };

            let err = AsarCodec::new()
                .pack(&src, &temp.path().join("app.asar"), &options)
                .unwrap_err();
            assert!(matches!(err, CodecError::Io { .. }));
        }
    }

    #[test]
    fn test_integrity_of_empty_file_has_one_block() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty");
        fs::write(&path, "").unwrap();

        let value = integrity(&path).unwrap();
        assert_eq!(value["blocks"].as_array().unwrap().len(), 1);
        assert_eq!(value["hash"], value["blocks"][0]);
    }

    #[test]
    fn test_normalize_resolves_parent_components() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
    }
}
