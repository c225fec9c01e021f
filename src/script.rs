//! Command scripts: YAML files of [`Command`]s replayed through a controller.

use std::path::Path;

use serde::Deserialize;

use crate::controller::{Command, Controller, Feedback};

/// A named sequence of commands.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    /// Label used in log output.
    #[serde(default)]
    pub name: Option<String>,
    /// Commands in dispatch order.
    pub commands: Vec<Command>,
}

/// Load a script file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_script(path: &Path) -> Result<Script, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read script file {}: {e}", path.display()))?;
    serde_yaml::from_str(&content)
        .map_err(|e| format!("Failed to parse script file {}: {e}", path.display()))
}

/// Dispatch every command in order, collecting the feedback for each.
///
/// A failing command does not stop the replay.
pub async fn replay(controller: &mut Controller, script: &Script) -> Vec<Feedback> {
    let mut feedback = Vec::with_capacity(script.commands.len());
    for command in &script.commands {
        feedback.push(controller.dispatch(command.clone()).await);
    }
    feedback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ServiceContext;
    use crate::controller::Output;
    use crate::model::SymbolKind;

    fn write_script(dir: &Path, body: &str) -> std::path::PathBuf {
        let path = dir.join("session.yaml");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn load_valid_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(
            dir.path(),
            "name: demo\ncommands:\n  - set_content: hello\n  - save\n",
        );
        let script = load_script(&path).unwrap();
        assert_eq!(script.name.as_deref(), Some("demo"));
        assert_eq!(script.commands, [Command::SetContent("hello".into()), Command::Save]);
    }

    #[test]
    fn load_nonexistent_fails() {
        assert!(load_script(Path::new("/nonexistent/script.yaml")).is_err());
    }

    #[test]
    fn load_unknown_command_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_script(dir.path(), "commands:\n  - launch_rocket\n");
        let err = load_script(&path).unwrap_err();
        assert!(err.contains("Failed to parse script file"));
    }

    #[tokio::test]
    async fn replay_is_deterministic() {
        let script = Script {
            name: None,
            commands: vec![
                Command::SwitchTab(SymbolKind::Barcode),
                Command::SetContent("CODE-42".into()),
                Command::Save,
                Command::Delete(7),
                Command::SwitchTab(SymbolKind::Qr),
                Command::SetContent("https://example.com".into()),
                Command::Save,
            ],
        };

        let mut outputs = Vec::new();
        for _ in 0..2 {
            let mut controller = Controller::start(ServiceContext::ephemeral(), 4).await;
            let feedback = replay(&mut controller, &script).await;
            assert_eq!(feedback.len(), script.commands.len());
            assert!(feedback[3].failed());
            assert_eq!(feedback[6].gallery.saved, 2);
            let Output::Image { image, .. } = &feedback[6].output else {
                panic!("expected an image after rendering");
            };
            outputs.push(image.clone());
            controller.shutdown().await;
        }
        assert_eq!(outputs[0], outputs[1]);
    }
}
