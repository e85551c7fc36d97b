use crate::hierarchy::LeafKind;
use std::path::Path;

/// Hands a leaf over to the desktop.
pub trait TargetOpener {
    fn open(&self, path: &Path, kind: LeafKind) -> anyhow::Result<()>;
}

/// Tells whether a registered target is still on disk.
pub trait ExistenceChecker {
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsExistence;

impl ExistenceChecker for FsExistence {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

/// Opens projects in the configured editor and everything else with the
/// platform default handler.
#[derive(Debug, Clone, Default)]
pub struct SystemOpener {
    editor: Option<String>,
}

impl SystemOpener {
    pub fn new(editor: Option<String>) -> Self {
        let editor = editor.filter(|e| !e.trim().is_empty());
        Self { editor }
    }

    pub fn editor(&self) -> Option<&str> {
        self.editor.as_deref()
    }
}

impl TargetOpener for SystemOpener {
    fn open(&self, path: &Path, kind: LeafKind) -> anyhow::Result<()> {
        match (&self.editor, kind) {
            (Some(editor), LeafKind::Project) => {
                let editor = editor.trim();
                let mut parts = shlex::split(editor)
                    .unwrap_or_else(|| editor.split_whitespace().map(str::to_string).collect());
                if parts.is_empty() {
                    anyhow::bail!("editor command is empty");
                }
                let program = parts.remove(0);
                tracing::debug!("launching '{program}' for {}", path.display());
                let mut command = std::process::Command::new(program);
                command.args(parts).arg(path);
                command.spawn().map(|_| ()).map_err(|e| e.into())
            }
            _ => open::that(path).map_err(|e| e.into()),
        }
    }
}
