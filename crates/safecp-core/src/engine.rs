//! Recursive copy engine
//!
//! Walks a source tree depth-first and mirrors it under a destination
//! directory. Every file or directory is one task; a failed task is reported
//! and recorded, and the walk carries on with its siblings.
//!
//! Overwrite prompting is a per-frame flag. A directory hands its children
//! `true` only when the operator explicitly confirmed overwriting that
//! directory; a freshly created (or freshly renamed) directory has nothing
//! inside it to collide with, so its subtree copies without asking.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::builder::make_dir;
use crate::classify::classify;
use crate::config::{MIN_BUFFER_SIZE, SafeCpConfig};
use crate::conflict::{ConflictResolver, resolve_destination};
use crate::error::SafeCpError;
use crate::interaction::InteractionAdapter;
use crate::types::{CopyReport, CopyTask, PathKind, Resolution, SourceSpec, TaskFailure};

/// File-writing knobs for the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyOptions {
    /// Give new files the source's permission bits
    pub preserve_mode: bool,
    /// Mode for new files when `preserve_mode` is off
    pub file_mode: u32,
    /// Copy buffer size in bytes
    pub buffer_size: usize,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::from(&SafeCpConfig::default())
    }
}

impl From<&SafeCpConfig> for CopyOptions {
    fn from(config: &SafeCpConfig) -> Self {
        Self {
            preserve_mode: config.preserve_mode,
            file_mode: config.file_mode,
            buffer_size: config.effective_buffer_size(),
        }
    }
}

/// Refuse directory copies that are meaningless or unbounded
///
/// Checked before anything is opened or created. `destination_dir` is the
/// directory the copy goes *into*, not the final destination path.
pub fn check_directory_copy(source: &Path, destination_dir: &Path) -> Result<(), SafeCpError> {
    if source == Path::new("/") {
        return Err(SafeCpError::RootCopy);
    }
    if source == destination_dir {
        return Err(SafeCpError::SameDirectory {
            path: source.to_path_buf(),
        });
    }
    // Component-wise, so /home/user/dir1 is not a parent of /home/user/dir123
    if destination_dir.starts_with(source) {
        return Err(SafeCpError::CopyIntoDescendant {
            source_dir: source.to_path_buf(),
            destination: destination_dir.to_path_buf(),
        });
    }
    Ok(())
}

/// Whether two existing paths name the same filesystem node
fn same_node(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Recursive copier with conflict resolution
pub struct CopyEngine<'a, R> {
    resolver: R,
    out: &'a dyn InteractionAdapter,
    options: CopyOptions,
    report: CopyReport,
}

impl<'a, R: ConflictResolver> CopyEngine<'a, R> {
    pub fn new(resolver: R, out: &'a dyn InteractionAdapter, options: CopyOptions) -> Self {
        Self {
            resolver,
            out,
            options,
            report: CopyReport::default(),
        }
    }

    /// Counters so far
    pub fn report(&self) -> &CopyReport {
        &self.report
    }

    pub fn into_report(self) -> CopyReport {
        self.report
    }

    /// Copy one resolved top-level source into `destination_root`
    pub fn copy_source(&mut self, spec: &SourceSpec, destination_root: &Path) {
        self.out.print_header(&format!(
            "Processing source: {}",
            spec.canonical_path.display()
        ));
        self.copy(CopyTask::top_level(spec, destination_root));
    }

    /// Run one task, dispatching on what the source currently is
    pub fn copy(&mut self, task: CopyTask) {
        let result = match classify(&task.source) {
            PathKind::File => self.copy_file(&task),
            PathKind::Directory => self.copy_directory(&task),
            PathKind::Missing => Err(SafeCpError::SourceMissing {
                path: task.source.clone(),
            }),
        };
        if let Err(err) = result {
            self.record_failure(&task.source, err);
        }
    }

    fn record_failure(&mut self, path: &Path, err: SafeCpError) {
        let message = err.to_string();
        warn!(path = %path.display(), code = err.code(), "{}", message);
        if err.is_refusal() || matches!(err, SafeCpError::SourceMissing { .. }) {
            self.out.print_warning(&message);
        } else {
            self.out.print_error(&message);
        }
        self.report.failures.push(TaskFailure {
            path: path.to_path_buf(),
            code: err.code().to_string(),
            message,
        });
    }

    fn copy_file(&mut self, task: &CopyTask) -> Result<(), SafeCpError> {
        let resolution = resolve_destination(
            &mut self.resolver,
            &task.destination_dir,
            &task.target_name,
            &task.source,
            PathKind::File,
            task.overwrite_enabled,
        )?;
        let Some(destination) = resolution.path() else {
            self.report.skipped += 1;
            return Ok(());
        };

        // Truncating the destination would destroy the source
        if !matches!(resolution, Resolution::Fresh(_)) && same_node(&task.source, destination) {
            return Err(SafeCpError::SameFile {
                path: task.source.clone(),
            });
        }

        let mut source = File::open(&task.source).map_err(|e| SafeCpError::OpenSource {
            path: task.source.clone(),
            source: e,
        })?;
        let mode = self.new_file_mode(&source);
        let mut target =
            open_destination(destination, mode).map_err(|e| SafeCpError::CreateDestination {
                path: destination.to_path_buf(),
                source: e,
            })?;

        let bytes = self.stream(&mut source, &mut target, &task.source, destination)?;
        debug!(
            from = %task.source.display(),
            to = %destination.display(),
            bytes,
            "file copied"
        );
        self.report.files_copied += 1;
        self.report.bytes_copied += bytes;
        Ok(())
    }

    fn copy_directory(&mut self, task: &CopyTask) -> Result<(), SafeCpError> {
        check_directory_copy(&task.source, &task.destination_dir)?;

        let entries = fs::read_dir(&task.source).map_err(|e| SafeCpError::OpenSource {
            path: task.source.clone(),
            source: e,
        })?;

        let resolution = resolve_destination(
            &mut self.resolver,
            &task.destination_dir,
            &task.target_name,
            &task.source,
            PathKind::Directory,
            task.overwrite_enabled,
        )?;
        let Some(destination) = resolution.path() else {
            self.report.skipped += 1;
            return Ok(());
        };

        if same_node(&task.source, destination) {
            return Err(SafeCpError::SameDirectory {
                path: task.source.clone(),
            });
        }

        if make_dir(destination)? {
            self.report.dirs_created += 1;
        } else {
            self.report.dirs_merged += 1;
        }

        let overwrite_enabled = resolution.propagated_overwrite();
        debug!(
            from = %task.source.display(),
            to = %destination.display(),
            overwrite_enabled,
            "copying directory"
        );

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    self.record_failure(
                        &task.source,
                        SafeCpError::OpenSource {
                            path: task.source.clone(),
                            source: e,
                        },
                    );
                    continue;
                }
            };
            let name = entry.file_name();
            trace!(entry = %entry.path().display(), "visiting");
            self.copy(CopyTask {
                source: task.source.join(&name),
                destination_dir: destination.to_path_buf(),
                target_name: name,
                overwrite_enabled,
            });
        }
        Ok(())
    }

    fn new_file_mode(&self, source: &File) -> u32 {
        if !self.options.preserve_mode {
            return self.options.file_mode;
        }
        source
            .metadata()
            .map(|meta| permission_bits(&meta))
            .unwrap_or(self.options.file_mode)
    }

    /// Copy every byte from `reader` to `writer`; partial output stays on failure
    fn stream(
        &self,
        reader: &mut File,
        writer: &mut File,
        source: &Path,
        destination: &Path,
    ) -> Result<u64, SafeCpError> {
        let mut buffer = vec![0u8; self.options.buffer_size.max(MIN_BUFFER_SIZE)];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(SafeCpError::Read {
                        path: source.to_path_buf(),
                        source: e,
                    });
                }
            };
            writer
                .write_all(&buffer[..n])
                .map_err(|e| SafeCpError::Write {
                    path: destination.to_path_buf(),
                    source: e,
                })?;
            total += n as u64;
        }
        Ok(total)
    }
}

#[cfg(unix)]
fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(_meta: &fs::Metadata) -> u32 {
    0o644
}

/// Create or truncate `path` for writing; `mode` applies only to new files
#[cfg(unix)]
fn open_destination(path: &Path, mode: u32) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(mode)
        .open(path)
}

#[cfg(not(unix))]
fn open_destination(path: &Path, _mode: u32) -> std::io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conflict::{ConflictPolicy, PolicyResolver};
    use crate::interaction::{InteractionError, InteractionResult};
    use crate::types::{Conflict, Decision};
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::ffi::OsString;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records printed messages; never expects to be asked anything
    #[derive(Default)]
    struct RecordingAdapter {
        messages: RefCell<Vec<String>>,
    }

    impl InteractionAdapter for RecordingAdapter {
        fn ask_line(&self, _prompt: &str) -> InteractionResult<String> {
            Err(InteractionError::Eof)
        }
        fn print_info(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
        fn print_header(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
        fn print_warning(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
        fn print_error(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    /// Replays canned decisions and records every conflict it was shown
    #[derive(Default)]
    struct ScriptedResolver {
        decisions: VecDeque<Decision>,
        seen: Vec<Conflict>,
    }

    impl ScriptedResolver {
        fn with(decisions: Vec<Decision>) -> Self {
            Self {
                decisions: decisions.into(),
                seen: vec![],
            }
        }
    }

    impl ConflictResolver for ScriptedResolver {
        fn resolve_conflict(&mut self, conflict: &Conflict) -> InteractionResult<Decision> {
            self.seen.push(conflict.clone());
            self.decisions.pop_front().ok_or(InteractionError::Eof)
        }

        fn confirm_create(&mut self, _path: &Path) -> InteractionResult<bool> {
            Ok(true)
        }
    }

    struct Fixture {
        _temp: TempDir,
        root: PathBuf,
    }

    impl Fixture {
        /// `src/{f1.txt, sub/f2.txt}` and an empty `dst/`
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let root = fs::canonicalize(temp.path()).unwrap();
            fs::create_dir_all(root.join("src/sub")).unwrap();
            fs::write(root.join("src/f1.txt"), b"first file").unwrap();
            fs::write(root.join("src/sub/f2.txt"), b"second file").unwrap();
            fs::create_dir(root.join("dst")).unwrap();
            Self { _temp: temp, root }
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.root.join(rel)
        }

        fn task(&self, source: &str, name: &str, overwrite_enabled: bool) -> CopyTask {
            CopyTask {
                source: self.path(source),
                destination_dir: self.path("dst"),
                target_name: OsString::from(name),
                overwrite_enabled,
            }
        }
    }

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_copy_file_without_collision() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());

        engine.copy(fx.task("src/f1.txt", "f1.txt", true));

        assert_eq!(read(&fx.path("dst/f1.txt")), "first file");
        let report = engine.into_report();
        assert_eq!(report.files_copied, 1);
        assert_eq!(report.bytes_copied, 10);
        assert!(report.is_success());
    }

    #[test]
    fn test_round_trip_tree() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut resolver = ScriptedResolver::default();
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());

        engine.copy(fx.task("src", "src", true));

        assert_eq!(read(&fx.path("dst/src/f1.txt")), "first file");
        assert_eq!(read(&fx.path("dst/src/sub/f2.txt")), "second file");
        let report = engine.into_report();
        assert_eq!(report.files_copied, 2);
        assert_eq!(report.dirs_created, 2);
        assert!(resolver.seen.is_empty());
    }

    #[test]
    fn test_second_run_overwrite_propagates_to_children() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine =
            CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());
        engine.copy(fx.task("src", "src", true));

        fs::write(fx.path("dst/src/f1.txt"), b"stale").unwrap();

        // dir src, f1.txt, dir sub, f2.txt: every level asks again
        let mut resolver = ScriptedResolver::with(vec![Decision::Overwrite; 4]);
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());
        engine.copy(fx.task("src", "src", true));

        assert_eq!(read(&fx.path("dst/src/f1.txt")), "first file");
        assert_eq!(read(&fx.path("dst/src/sub/f2.txt")), "second file");
        let report = engine.into_report();
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.dirs_merged, 2);
        assert_eq!(resolver.seen.len(), 4);
        assert!(resolver.seen.iter().all(|c| !c.is_type_clash()));
    }

    #[test]
    fn test_second_run_rename_creates_sibling() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine =
            CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());
        engine.copy(fx.task("src", "src", true));
        fs::write(fx.path("dst/src/f1.txt"), b"kept").unwrap();

        let mut resolver = ScriptedResolver::with(vec![Decision::Rename("src2".to_string())]);
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());
        engine.copy(fx.task("src", "src", true));

        assert_eq!(read(&fx.path("dst/src/f1.txt")), "kept");
        assert_eq!(read(&fx.path("dst/src2/f1.txt")), "first file");
        assert_eq!(read(&fx.path("dst/src2/sub/f2.txt")), "second file");
        assert_eq!(resolver.seen.len(), 1, "renamed directory is fresh");
    }

    #[test]
    fn test_fresh_directory_disables_prompts_for_descendants() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        // Any prompt would exhaust the script and fail the task
        let mut resolver = ScriptedResolver::default();
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());

        engine.copy(fx.task("src", "fresh", true));
        assert!(fx.path("dst/fresh/sub/f2.txt").is_file());
        fs::write(fx.path("dst/fresh/sub/f2.txt"), b"written earlier in the run").unwrap();

        // A later task under the fresh directory meets names this run already made
        let flag = Resolution::Fresh(fx.path("dst/fresh")).propagated_overwrite();
        engine.copy(CopyTask {
            source: fx.path("src/sub"),
            destination_dir: fx.path("dst/fresh"),
            target_name: OsString::from("sub"),
            overwrite_enabled: flag,
        });

        let report = engine.into_report();
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.dirs_merged, 1);
        assert_eq!(read(&fx.path("dst/fresh/sub/f2.txt")), "second file");
        assert!(resolver.seen.is_empty());
    }

    #[test]
    fn test_dot_dot_rename_suffix_stays_inside_destination() {
        let fx = Fixture::new();
        fs::create_dir(fx.path("dst/inner")).unwrap();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(
            PolicyResolver::new(ConflictPolicy::Overwrite),
            &out,
            CopyOptions::default(),
        );
        let ctx = crate::resolver::PathContext::new(fx.root.clone());

        let spec = crate::resolver::resolve_source("src:..", &ctx);
        engine.copy_source(&spec, &fx.path("dst/inner"));

        let report = engine.into_report();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "E001");
        assert!(!fx.path("dst/f1.txt").exists());
        assert!(!fx.path("dst/sub").exists());
    }

    #[test]
    fn test_disabled_overwrite_merges_silently() {
        let fx = Fixture::new();
        fs::create_dir_all(fx.path("dst/src/sub")).unwrap();
        fs::write(fx.path("dst/src/f1.txt"), b"older content that is longer").unwrap();
        let out = RecordingAdapter::default();
        let mut resolver = ScriptedResolver::default();
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());

        engine.copy(fx.task("src", "src", false));

        // The write still happens and truncates
        assert_eq!(read(&fx.path("dst/src/f1.txt")), "first file");
        assert_eq!(engine.into_report().dirs_merged, 2);
        assert!(resolver.seen.is_empty());
    }

    #[test]
    fn test_file_onto_directory_prompts_for_name() {
        let fx = Fixture::new();
        fs::create_dir(fx.path("dst/f1.txt")).unwrap();
        fs::create_dir(fx.path("dst/taken")).unwrap();
        let out = RecordingAdapter::default();
        let mut resolver = ScriptedResolver::with(vec![
            Decision::Rename("taken".to_string()),
            Decision::Rename("free.txt".to_string()),
        ]);
        let mut engine = CopyEngine::new(&mut resolver, &out, CopyOptions::default());

        engine.copy(fx.task("src/f1.txt", "f1.txt", false));

        assert_eq!(read(&fx.path("dst/free.txt")), "first file");
        assert_eq!(resolver.seen.len(), 2);
        assert!(resolver.seen.iter().all(Conflict::is_type_clash));
    }

    #[test]
    fn test_skip_leaves_destination_untouched() {
        let fx = Fixture::new();
        fs::write(fx.path("dst/f1.txt"), b"mine").unwrap();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(
            PolicyResolver::new(ConflictPolicy::Skip),
            &out,
            CopyOptions::default(),
        );

        engine.copy(fx.task("src/f1.txt", "f1.txt", true));

        assert_eq!(read(&fx.path("dst/f1.txt")), "mine");
        let report = engine.into_report();
        assert_eq!(report.skipped, 1);
        assert!(report.is_success());
    }

    #[test]
    fn test_root_copy_refused() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());

        engine.copy(CopyTask {
            source: PathBuf::from("/"),
            destination_dir: fx.path("dst"),
            target_name: OsString::new(),
            overwrite_enabled: true,
        });

        assert_eq!(fs::read_dir(fx.path("dst")).unwrap().count(), 0);
        let report = engine.into_report();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "E006");
        assert!(out.messages.borrow()[0].contains("Cannot copy root directory"));
    }

    #[test]
    fn test_copy_into_descendant_refused() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());

        engine.copy(CopyTask {
            source: fx.path("src"),
            destination_dir: fx.path("src/sub"),
            target_name: OsString::from("src"),
            overwrite_enabled: true,
        });

        assert!(!fx.path("src/sub/src").exists());
        assert_eq!(engine.report().failures[0].code, "E008");
    }

    #[test]
    fn test_check_directory_copy_guards() {
        assert!(matches!(
            check_directory_copy(Path::new("/"), Path::new("/tmp")),
            Err(SafeCpError::RootCopy)
        ));
        assert!(matches!(
            check_directory_copy(Path::new("/a/b"), Path::new("/a/b")),
            Err(SafeCpError::SameDirectory { .. })
        ));
        assert!(matches!(
            check_directory_copy(Path::new("/a/b"), Path::new("/a/b/c")),
            Err(SafeCpError::CopyIntoDescendant { .. })
        ));
        assert!(check_directory_copy(Path::new("/home/user/dir1"), Path::new("/home/user/dir123")).is_ok());
        assert!(check_directory_copy(Path::new("/a/b"), Path::new("/a")).is_ok());
    }

    #[test]
    fn test_directory_onto_itself_refused() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(
            PolicyResolver::new(ConflictPolicy::Overwrite),
            &out,
            CopyOptions::default(),
        );

        engine.copy(CopyTask {
            source: fx.path("src"),
            destination_dir: fx.root.clone(),
            target_name: OsString::from("src"),
            overwrite_enabled: true,
        });

        assert_eq!(read(&fx.path("src/f1.txt")), "first file");
        assert_eq!(engine.report().failures[0].code, "E007");
    }

    #[test]
    fn test_file_onto_itself_refused() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(
            PolicyResolver::new(ConflictPolicy::Overwrite),
            &out,
            CopyOptions::default(),
        );

        engine.copy(CopyTask {
            source: fx.path("src/f1.txt"),
            destination_dir: fx.path("src"),
            target_name: OsString::from("f1.txt"),
            overwrite_enabled: true,
        });

        assert_eq!(read(&fx.path("src/f1.txt")), "first file");
        assert_eq!(engine.report().failures[0].code, "E017");
    }

    #[test]
    fn test_missing_source_reported_and_siblings_continue() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());

        engine.copy(fx.task("src/ghost.txt", "ghost.txt", true));
        engine.copy(fx.task("src/f1.txt", "f1.txt", true));

        let report = engine.into_report();
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "E001");
        assert_eq!(report.files_copied, 1);
    }

    #[test]
    fn test_copy_source_announces() {
        let fx = Fixture::new();
        let out = RecordingAdapter::default();
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());
        let spec = SourceSpec {
            raw: "src/f1.txt:renamed.txt".to_string(),
            canonical_path: fx.path("src/f1.txt"),
            target_name: "renamed.txt".to_string(),
        };

        engine.copy_source(&spec, &fx.path("dst"));

        assert_eq!(read(&fx.path("dst/renamed.txt")), "first file");
        assert!(out.messages.borrow()[0].starts_with("Processing source: "));
    }

    #[cfg(unix)]
    #[test]
    fn test_mode_preserved_or_fixed() {
        use std::os::unix::fs::PermissionsExt;

        let fx = Fixture::new();
        fs::set_permissions(fx.path("src/f1.txt"), fs::Permissions::from_mode(0o640)).unwrap();
        let out = RecordingAdapter::default();

        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, CopyOptions::default());
        engine.copy(fx.task("src/f1.txt", "kept.txt", true));
        let mode = fs::metadata(fx.path("dst/kept.txt")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);

        let options = CopyOptions {
            preserve_mode: false,
            file_mode: 0o600,
            ..CopyOptions::default()
        };
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, options);
        engine.copy(fx.task("src/f1.txt", "fixed.txt", true));
        let mode = fs::metadata(fx.path("dst/fixed.txt")).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_large_file_streams_through_small_buffer() {
        let fx = Fixture::new();
        let payload: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        fs::write(fx.path("src/big.bin"), &payload).unwrap();
        let out = RecordingAdapter::default();
        let options = CopyOptions {
            buffer_size: MIN_BUFFER_SIZE,
            ..CopyOptions::default()
        };
        let mut engine = CopyEngine::new(ScriptedResolver::default(), &out, options);

        engine.copy(fx.task("src/big.bin", "big.bin", true));

        assert_eq!(fs::read(fx.path("dst/big.bin")).unwrap(), payload);
        assert_eq!(engine.report().bytes_copied, 50_000);
    }
}
