//! Host side of open-location requests: launch an editor at a position.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use logview_render::HostMessage;

use crate::config::EditorSettings;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("No editor configured (set [editor] command, $VISUAL or $EDITOR)")]
    NoEditor,

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to execute editor: {0}")]
    ExecutionFailed(#[from] std::io::Error),

    #[error("Editor exited with {0}")]
    Exited(ExitStatus),

    #[error("Path rejected: {0}")]
    PathRejected(String),
}

/// A resolved editor invocation, ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    program: String,
    args: Vec<String>,
    /// `path:line:column` that was requested, for display
    target: String,
}

impl EditorCommand {
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Run the editor in the foreground and wait for it to exit
    ///
    /// The caller must release the terminal first; a terminal editor reads
    /// the same tty.
    pub async fn run(&self) -> Result<(), EditorError> {
        debug!("Running editor: {} {:?}", self.program, self.args);
        let status = Command::new(&self.program).args(&self.args).status().await?;
        if !status.success() {
            return Err(EditorError::Exited(status));
        }
        info!("Opened {}", self.target);
        Ok(())
    }
}

/// Resolves open-location requests into editor invocations
pub struct EditorHost {
    settings: EditorSettings,
    workspace: PathBuf,
}

impl EditorHost {
    pub fn new(settings: EditorSettings, workspace: PathBuf) -> Self {
        Self {
            settings,
            workspace,
        }
    }

    /// Build the command that opens the requested location
    pub fn prepare(&self, message: &HostMessage) -> Result<EditorCommand, EditorError> {
        match message {
            HostMessage::OpenFile {
                file_path,
                line,
                column,
            } => self.open_command(file_path, *line, *column),
        }
    }

    fn open_command(&self, path: &str, line: u32, column: u32) -> Result<EditorCommand, EditorError> {
        if sanitize_path(path).is_none() {
            return Err(EditorError::PathRejected(path.to_string()));
        }
        let editor = self
            .settings
            .resolve_command()
            .ok_or(EditorError::NoEditor)?;
        let resolved = resolve_file_path(path, &self.workspace)?;

        let argv = substitute_pattern(&self.settings.open_pattern, &editor, &resolved, line, column);
        let Some((program, args)) = argv.split_first() else {
            return Err(EditorError::NoEditor);
        };

        Ok(EditorCommand {
            program: program.clone(),
            args: args.to_vec(),
            target: format!("{}:{}:{}", resolved.display(), line.max(1), column.max(1)),
        })
    }
}

/// Workspace-relative first, then the path as given
pub fn resolve_file_path(path: &str, workspace: &Path) -> Result<PathBuf, EditorError> {
    let as_given = PathBuf::from(path);
    let in_workspace = workspace.join(&as_given);
    if in_workspace.exists() {
        return Ok(in_workspace);
    }
    if as_given.exists() {
        return Ok(as_given);
    }
    Err(EditorError::FileNotFound(in_workspace))
}

/// Split the pattern into words, then substitute $EDITOR, $FILE, $LINE and
/// $COLUMN inside each word
///
/// Substituted values never introduce word breaks, except that a word which
/// is exactly `$EDITOR` expands to the editor command's own words
/// (`code --wait`).
pub fn substitute_pattern(
    pattern: &str,
    editor: &str,
    file_path: &Path,
    line: u32,
    column: u32,
) -> Vec<String> {
    let file_str = file_path.display().to_string();
    let line = line.max(1).to_string();
    let column = column.max(1).to_string();

    let mut argv = Vec::new();
    for word in pattern.split_whitespace() {
        if word == "$EDITOR" {
            argv.extend(editor.split_whitespace().map(str::to_string));
            continue;
        }
        argv.push(
            word.replace("$EDITOR", editor)
                .replace("$FILE", &file_str)
                .replace("$LINE", &line)
                .replace("$COLUMN", &column),
        );
    }
    argv
}

/// Reject traversal, NUL bytes and shell metacharacters
pub fn sanitize_path(path: &str) -> Option<String> {
    if path.is_empty() || path.contains("..") || path.contains('\0') {
        return None;
    }

    let dangerous_chars = ['|', '&', ';', '$', '`', '(', ')', '{', '}', '<', '>'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return None;
    }

    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn host(command: &str, pattern: &str, workspace: &Path) -> EditorHost {
        EditorHost::new(
            EditorSettings {
                command: command.to_string(),
                open_pattern: pattern.to_string(),
                ..EditorSettings::default()
            },
            workspace.to_path_buf(),
        )
    }

    #[test]
    fn test_substitute_pattern() {
        let argv = substitute_pattern(
            "$EDITOR --goto $FILE:$LINE:$COLUMN",
            "code",
            Path::new("/src/x.ts"),
            5,
            3,
        );
        assert_eq!(argv, ["code", "--goto", "/src/x.ts:5:3"]);
    }

    #[test]
    fn test_substitute_pattern_clamps_positions() {
        let argv = substitute_pattern("nvim +$LINE $FILE:$COLUMN", "nvim", Path::new("a.js"), 0, 0);
        assert_eq!(argv, ["nvim", "+1", "a.js:1"]);
    }

    #[test]
    fn test_substitute_pattern_keeps_spaced_path_whole() {
        let argv = substitute_pattern(
            "$EDITOR $FILE:$LINE",
            "code --wait",
            Path::new("/work/my dir/x.ts"),
            5,
            1,
        );
        assert_eq!(argv, ["code", "--wait", "/work/my dir/x.ts:5"]);
    }

    #[test]
    fn test_sanitize_path() {
        assert_eq!(sanitize_path("src/x.ts").as_deref(), Some("src/x.ts"));
        assert!(sanitize_path("../etc/passwd").is_none());
        assert!(sanitize_path("a.ts; rm -rf /").is_none());
        assert!(sanitize_path("$(whoami).ts").is_none());
        assert!(sanitize_path("").is_none());
    }

    #[test]
    fn test_resolve_prefers_workspace() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/x.ts"), "").unwrap();

        let resolved = resolve_file_path("src/x.ts", dir.path()).unwrap();
        assert_eq!(resolved, dir.path().join("src/x.ts"));
    }

    #[test]
    fn test_resolve_absolute_fallback() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = other.path().join("y.ts");
        fs::write(&file, "").unwrap();

        let resolved = resolve_file_path(file.to_str().unwrap(), dir.path()).unwrap();
        assert_eq!(resolved, file);
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_file_path("missing.ts", dir.path()),
            Err(EditorError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_rejected_path_never_runs_editor() {
        let dir = TempDir::new().unwrap();
        let host = host("true", "$EDITOR $FILE", dir.path());
        let message = HostMessage::open_file("../x.ts", Some(1), None);
        assert!(matches!(
            host.prepare(&message),
            Err(EditorError::PathRejected(_))
        ));
    }

    #[test]
    fn test_prepare_passes_spaced_path_as_one_argument() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("my dir")).unwrap();
        fs::write(dir.path().join("my dir/x.ts"), "").unwrap();

        let host = host("code", "$EDITOR --goto $FILE:$LINE:$COLUMN", dir.path());
        let command = host
            .prepare(&HostMessage::open_file("my dir/x.ts", Some(5), None))
            .unwrap();

        let expected = format!("{}:5:1", dir.path().join("my dir/x.ts").display());
        assert_eq!(command.program, "code");
        assert_eq!(command.args, ["--goto".to_string(), expected.clone()]);
        assert_eq!(command.target(), expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_waits_for_editor_and_reports_exit() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("my dir/x.ts");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "").unwrap();
        let message = HostMessage::open_file("my dir/x.ts", Some(2), Some(4));

        // The editor records its single argument; it has finished by the
        // time run() returns
        let out = dir.path().join("args.txt");
        let script = dir.path().join("editor.sh");
        fs::write(&script, format!("printf '%s|' \"$@\" > '{}'\n", out.display())).unwrap();

        let editor = format!("sh {}", script.display());
        let ok = host(&editor, "$EDITOR $FILE:$LINE:$COLUMN", dir.path());
        ok.prepare(&message).unwrap().run().await.unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            format!("{}:2:4|", file.display())
        );

        let failing = host("false", "$EDITOR $FILE", dir.path());
        assert!(matches!(
            failing.prepare(&message).unwrap().run().await,
            Err(EditorError::Exited(_))
        ));
    }
}
