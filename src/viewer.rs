//! Showing a resolved artifact to the user

use std::io::Write;
use std::path::Path;
use std::process::Command;

use thiserror::Error;
use tracing::debug;

use crate::config::ViewerCommand;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("could not start viewer '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not print path: {0}")]
    Output(#[from] std::io::Error),
}

/// Displays an artifact given its absolute path
pub trait Viewer {
    fn show(&self, path: &Path) -> Result<(), ViewError>;
}

/// Launches an external program with the path as last argument
#[derive(Debug, Clone)]
pub struct CommandViewer {
    command: ViewerCommand,
}

impl CommandViewer {
    pub fn new(command: ViewerCommand) -> Self {
        Self { command }
    }
}

impl Viewer for CommandViewer {
    fn show(&self, path: &Path) -> Result<(), ViewError> {
        debug!(command = %self.command.command, path = %path.display(), "launching viewer");
        Command::new(&self.command.command)
            .args(&self.command.args)
            .arg(path)
            .spawn()
            // Detached: the viewer outlives this one-shot process, nobody waits on it
            .map(drop)
            .map_err(|source| ViewError::Spawn {
                command: self.command.command.clone(),
                source,
            })
    }
}

/// Writes the path to a stream, one per line
pub struct PrintViewer<W> {
    out: std::cell::RefCell<W>,
}

impl<W: Write> PrintViewer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: std::cell::RefCell::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl<W: Write> Viewer for PrintViewer<W> {
    fn show(&self, path: &Path) -> Result<(), ViewError> {
        writeln!(self.out.borrow_mut(), "{}", path.display())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_viewer() {
        let viewer = PrintViewer::new(Vec::new());
        viewer.show(Path::new("/a/b.svg")).unwrap();
        assert_eq!(viewer.into_inner(), b"/a/b.svg\n");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let viewer = CommandViewer::new(ViewerCommand {
            command: "track-link-no-such-viewer".to_string(),
            args: vec![],
        });
        assert!(matches!(
            viewer.show(Path::new("/a.svg")),
            Err(ViewError::Spawn { .. })
        ));
    }
}
