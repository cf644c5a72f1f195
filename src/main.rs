//! `studio-replay`: drive an annotation session from a JSON event script.
//!
//! ```text
//! studio-replay <script.json> [--config <config.json>]
//! ```
//!
//! The script lists the images to annotate and the pointer, key and dialog
//! events to feed the session. The resulting per-image boxes are printed to
//! stdout as JSON.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = replay::run(std::env::args().skip(1)) {
        eprintln!("studio-replay: {}", e);
        std::process::exit(1);
    }
}

// No filesystem or stdout in the browser
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod replay {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use annotation_studio::geometry::Point;
    use annotation_studio::model::{AnnotationImage, BoundingBox};
    use annotation_studio::{
        AnnotationSession, BoxStore, ConfigError, Key, StudioConfig, StudioError,
    };
    use serde::Deserialize;

    #[derive(Debug, thiserror::Error)]
    pub enum ReplayError {
        #[error("usage: studio-replay <script.json> [--config <config.json>]")]
        Usage,

        #[error("failed to read {path:?}: {source}")]
        Read {
            path: PathBuf,
            source: std::io::Error,
        },

        #[error("invalid script: {0}")]
        Script(#[from] serde_json::Error),

        #[error(transparent)]
        Config(#[from] ConfigError),
    }

    /// A replay script.
    #[derive(Debug, Deserialize)]
    struct Script {
        images: Vec<AnnotationImage>,
        /// Viewport used to size the canvas
        #[serde(default = "default_viewport")]
        viewport: (f32, f32),
        events: Vec<Event>,
    }

    fn default_viewport() -> (f32, f32) {
        (1560.0, 1100.0)
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum Event {
        PointerDown { x: f32, y: f32 },
        PointerMove { x: f32, y: f32 },
        PointerUp,
        Select { value: String },
        NewViolation {
            name: String,
            severity: String,
            description: String,
        },
        Confirm,
        Cancel,
        AddIssue { label: String },
        Delete { id: String },
        Key { key: Key },
        Next,
        Previous,
        GoTo { index: usize },
    }

    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), ReplayError> {
        let script_path = PathBuf::from(args.next().ok_or(ReplayError::Usage)?);
        let config = match (args.next().as_deref(), args.next()) {
            (Some("--config"), Some(path)) => StudioConfig::load(Path::new(&path))?,
            (None, _) => StudioConfig::load_from_default_path().unwrap_or_default(),
            _ => return Err(ReplayError::Usage),
        };

        env_logger::Builder::new()
            .filter_level(config.preferences.log_level.to_level_filter())
            .parse_default_env()
            .init();

        let json = std::fs::read_to_string(&script_path).map_err(|source| ReplayError::Read {
            path: script_path.clone(),
            source,
        })?;
        let script: Script = serde_json::from_str(&json)?;
        log::info!(
            "Replaying {} events over {} images",
            script.events.len(),
            script.images.len()
        );

        let mut session = AnnotationSession::new(&config);
        session.set_images(script.images);
        session.resize(script.viewport.0, script.viewport.1);

        for (step, event) in script.events.into_iter().enumerate() {
            if let Err(e) = apply(&mut session, event) {
                log::warn!("Step {}: {}", step, e);
            }
        }

        let progress = session.progress();
        log::info!(
            "Finished on image {} ({}/{} violations annotated)",
            session.current_index(),
            progress.annotated(),
            progress.total()
        );

        let store = session.into_store();
        let output: BTreeMap<String, &[BoundingBox]> = store
            .annotated_keys()
            .into_iter()
            .map(|key| {
                let boxes = store.get(&key);
                (key, boxes)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    fn apply(session: &mut AnnotationSession, event: Event) -> Result<(), StudioError> {
        log::debug!("{:?}", event);
        match event {
            Event::PointerDown { x, y } => {
                session.pointer_down(Point::new(x, y), ORIGIN);
            }
            Event::PointerMove { x, y } => {
                session.pointer_move(Point::new(x, y), ORIGIN);
            }
            Event::PointerUp => {
                session.pointer_up();
            }
            Event::Select { value } => {
                if !session.select_tag(&value) {
                    log::warn!("'{}' is not a choice", value);
                }
            }
            Event::NewViolation {
                name,
                severity,
                description,
            } => {
                let dialog = session
                    .dialog_mut()
                    .ok_or(StudioError::Locked("no tagging dialog open"))?;
                let form = dialog.form_mut();
                form.name = name;
                form.severity = severity;
                form.description = description;
            }
            Event::Confirm => {
                session.confirm_tag()?;
            }
            Event::Cancel => session.cancel_tag(),
            Event::AddIssue { label } => {
                if session.add_custom_issue(&label).is_none() {
                    log::warn!("Issue '{}' rejected", label);
                }
            }
            Event::Delete { id } => {
                session.delete_box(&id);
            }
            Event::Key { key } => {
                session.handle_key(key);
            }
            Event::Next => {
                session.next();
            }
            Event::Previous => {
                session.previous();
            }
            Event::GoTo { index } => {
                session.go_to(index)?;
            }
        }
        Ok(())
    }
}
