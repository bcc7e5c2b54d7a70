use std::path::PathBuf;

use anyhow::Context;

use crate::{
    camera::OrbitCamera,
    config::{self, ConfigError, PlacementRecord},
    config_watcher::ConfigWatcher,
    scene_graph::scene::Scene,
};

#[derive(Debug, Clone, Default)]
pub struct ViewerOptions {
    pub config_path: Option<PathBuf>,
    pub watch: bool,
}

/// Text buffer behind the configuration panel.
#[derive(Debug, Default)]
pub struct ConfigEditor {
    pub text: String,
    pub error: Option<String>,
    show_error: bool,
}

impl ConfigEditor {
    fn show_records(&mut self, records: &[PlacementRecord]) {
        match config::layout_to_json(records) {
            Ok(text) => self.text = text,
            Err(e) => log::error!("Failed to serialize layout: {e}"),
        }
        self.error = None;
    }

    fn report(&mut self, error: &ConfigError) {
        log::warn!("Rejected configuration: {error}");
        self.error = Some(error.to_string());
        self.show_error = true;
    }

    /// True once per rejected configuration, when the error popup should open.
    pub fn take_error_popup(&mut self) -> bool {
        std::mem::take(&mut self.show_error)
    }
}

pub struct ViewerState {
    pub camera: OrbitCamera,
    pub scene: Scene,
    pub editor: ConfigEditor,
    watcher: Option<ConfigWatcher>,
}

impl ViewerState {
    pub fn new(options: &ViewerOptions) -> anyhow::Result<Self> {
        let records = match &options.config_path {
            Some(path) => config::read_layout_file(path)
                .with_context(|| format!("Failed to load layout from {}", path.display()))?,
            None => config::default_layout(),
        };

        let mut scene = Scene::new();
        scene.load(&records);

        let mut editor = ConfigEditor::default();
        editor.show_records(&records);

        let watcher = match &options.config_path {
            Some(path) if options.watch => match ConfigWatcher::new(path) {
                Ok(watcher) => Some(watcher),
                Err(e) => {
                    log::warn!("Layout changes will not be picked up: {e:#}");
                    None
                }
            },
            _ => None,
        };

        Ok(Self {
            camera: OrbitCamera::default(),
            scene,
            editor,
            watcher,
        })
    }

    /// Loads whatever is in the editor. A rejected text keeps the current scene.
    pub fn apply_editor_text(&mut self) {
        match self.scene.reload(&self.editor.text) {
            Ok(count) => {
                log::info!("Applied configuration with {count} entries");
                self.editor.error = None;
            }
            Err(e) => self.editor.report(&e),
        }
    }

    pub fn reset_editor_to_default(&mut self) {
        let records = config::default_layout();
        self.scene.load(&records);
        self.editor.show_records(&records);
    }

    /// Reloads the watched file if it changed on disk.
    pub fn poll_config_file(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };

        if !watcher.poll_changed() {
            return;
        }

        log::info!("{} changed, reloading", watcher.path().display());

        match config::read_layout_file(watcher.path()) {
            Ok(records) => {
                self.scene.load(&records);
                self.editor.show_records(&records);
            }
            Err(e) => self.editor.report(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlacementKind;

    fn default_viewer() -> ViewerState {
        ViewerState::new(&ViewerOptions::default()).unwrap()
    }

    #[test]
    fn starts_with_the_default_layout() {
        let viewer = default_viewer();
        assert_eq!(viewer.scene.composites().len(), 3);

        let shown = config::parse_layout(&viewer.editor.text).unwrap();
        assert_eq!(shown, config::default_layout());
        assert!(viewer.editor.error.is_none());
    }

    #[test]
    fn rejected_text_keeps_the_scene_and_raises_the_popup_once() {
        let mut viewer = default_viewer();
        viewer.editor.text = "[{\"x\": ".to_string();
        viewer.apply_editor_text();

        assert_eq!(viewer.scene.composites().len(), 3);
        assert!(viewer.editor.error.is_some());
        assert!(viewer.editor.take_error_popup());
        assert!(!viewer.editor.take_error_popup());
    }

    #[test]
    fn applying_valid_text_replaces_the_scene() {
        let mut viewer = default_viewer();
        viewer.editor.error = Some("stale".to_string());
        viewer.editor.text =
            r#"[{"x": 0, "y": 0, "z": 0, "length": 2, "width": 2, "r": 0, "type": "Rotative"}]"#
                .to_string();
        viewer.apply_editor_text();

        assert_eq!(viewer.scene.composites().len(), 1);
        assert_eq!(viewer.scene.composites()[0].kind, PlacementKind::Rotary);
        assert!(viewer.editor.error.is_none());
    }

    #[test]
    fn reset_restores_the_default_layout() {
        let mut viewer = default_viewer();
        viewer.editor.text = "[]".to_string();
        viewer.apply_editor_text();
        assert!(viewer.scene.composites().is_empty());

        viewer.reset_editor_to_default();
        assert_eq!(viewer.scene.composites().len(), 3);
        assert_eq!(
            config::parse_layout(&viewer.editor.text).unwrap(),
            config::default_layout()
        );
    }

    #[test]
    fn startup_layout_comes_from_the_given_file() {
        let path = std::env::temp_dir().join(format!(
            "conveyor-viz-startup-{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"[{"x": 1, "y": 0, "z": 2, "length": 6, "width": 1, "r": 0, "type": "Rouleau"}]"#,
        )
        .unwrap();

        let viewer = ViewerState::new(&ViewerOptions {
            config_path: Some(path.clone()),
            watch: false,
        });
        std::fs::remove_file(&path).unwrap();

        let viewer = viewer.unwrap();
        assert_eq!(viewer.scene.composites().len(), 1);
        assert!(viewer.watcher.is_none());
    }

    fn poll_until(viewer: &mut ViewerState, done: impl Fn(&ViewerState) -> bool) -> bool {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while std::time::Instant::now() < deadline {
            viewer.poll_config_file();
            if done(viewer) {
                return true;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }
        false
    }

    #[test]
    fn watched_file_is_reapplied_and_bad_rewrites_are_rejected() {
        let directory =
            std::env::temp_dir().join(format!("conveyor-viz-watch-{}", std::process::id()));
        std::fs::create_dir_all(&directory).unwrap();
        let path = directory.join("layout.json");
        std::fs::write(
            &path,
            r#"[{"x": 0, "y": 0, "z": 0, "length": 4, "width": 1, "r": 0, "type": "Rouleau"}]"#,
        )
        .unwrap();

        let mut viewer = ViewerState::new(&ViewerOptions {
            config_path: Some(path.clone()),
            watch: true,
        })
        .unwrap();
        assert!(viewer.watcher.is_some());
        assert_eq!(viewer.scene.composites().len(), 1);

        std::fs::write(
            &path,
            r#"[
                {"x": 0, "y": 0, "z": 0, "length": 4, "width": 1, "r": 0, "type": "Rouleau"},
                {"x": 0, "y": 0, "z": 5, "length": 2, "width": 2, "r": 0, "type": "Rotative"}
            ]"#,
        )
        .unwrap();
        let reloaded = poll_until(&mut viewer, |viewer| viewer.scene.composites().len() == 2);
        assert!(viewer.editor.error.is_none());

        std::thread::sleep(std::time::Duration::from_millis(300));
        viewer.poll_config_file();
        std::fs::write(&path, "[{\"x\": ").unwrap();
        let rejected = poll_until(&mut viewer, |viewer| viewer.editor.error.is_some());

        std::fs::remove_dir_all(&directory).unwrap();

        assert!(reloaded);
        assert_eq!(viewer.scene.composites()[1].kind, PlacementKind::Rotary);
        assert!(rejected);
        assert_eq!(viewer.scene.composites().len(), 2);
        assert!(viewer.editor.take_error_popup());
    }

    #[test]
    fn unreadable_startup_file_is_an_error() {
        let options = ViewerOptions {
            config_path: Some(std::env::temp_dir().join("conveyor-viz-no-such-layout.json")),
            watch: true,
        };
        assert!(ViewerState::new(&options).is_err());
    }
}
