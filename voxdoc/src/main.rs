//! Headless driver for the document model.
//!
//! Creates a fresh document and applies the actions named on the command line in order, each written
//! `name` or `name=argument`, then prints the resulting document. `--image <path>` adds an image layer.
//! `--list` prints the available actions, `--write-settings` saves the settings in effect.

#![warn(clippy::pedantic)]

mod settings;

use anyhow::Result as AnyResult;
use voxdoc_core::{state::painter::Painter, Action, Document};

// Snapshots are full copies, measure them with `--features dhat_heap`.
#[cfg(feature = "dhat_heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

enum Step {
    Action(Action, Option<i32>),
    Image(std::path::PathBuf),
}

fn parse_args(mut args: impl Iterator<Item = String>) -> AnyResult<(Vec<Step>, bool, bool)> {
    let mut steps = Vec::new();
    let (mut list, mut write_settings) = (false, false);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--list" => list = true,
            "--write-settings" => write_settings = true,
            "--image" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--image needs a path"))?;
                steps.push(Step::Image(path.into()));
            }
            other => {
                let (name, value) = match other.split_once('=') {
                    Some((name, value)) => (name, Some(value.parse::<i32>()?)),
                    None => (other, None),
                };
                let action = name
                    .parse::<Action>()
                    .map_err(|_| anyhow::anyhow!("unknown action {name:?}, see --list"))?;
                steps.push(Step::Action(action, value));
            }
        }
    }
    Ok((steps, list, write_settings))
}

fn print_summary(document: &mut Document) -> AnyResult<()> {
    let synchronized = document.synchronize()?;
    log::debug!("{synchronized} layers regenerated before printing");
    document.check_invariants()?;

    let active = document.active_layer_id();
    for layer in document.layers() {
        let mut kind = Vec::new();
        if let Some(base) = layer.base() {
            kind.push(format!("clone of {base}"));
        }
        if let Some(shape) = layer.shape() {
            kind.push(shape.as_ref().to_owned());
        }
        if layer.image.is_some() {
            kind.push("image".to_owned());
        }
        println!(
            "{} {} {:?}: {} voxels{}{}{}",
            if Some(layer.id()) == active { '*' } else { ' ' },
            layer.id(),
            layer.name(),
            layer.mesh.len(),
            if layer.visible { "" } else { ", hidden" },
            if kind.is_empty() { "" } else { ", " },
            kind.join(", "),
        );
    }
    let active_camera = document.active_camera().map(|camera| camera.id());
    for camera in document.cameras() {
        let marker = if Some(camera.id()) == active_camera { '*' } else { ' ' };
        println!("{marker} {} {:?}", camera.id(), camera.name());
    }
    let active_material = document.active_material().map(|material| material.id());
    for material in document.materials() {
        let marker = if Some(material.id()) == active_material { '*' } else { ' ' };
        println!("{marker} {} {:?}", material.id(), material.name());
    }
    println!(
        "{} undo, {} redo, key {:?}, {}",
        document.undo_len(),
        document.redo_len(),
        document.document_key(),
        if document.is_dirty() { "modified" } else { "unmodified" },
    );
    Ok(())
}

fn main() -> AnyResult<()> {
    let settings = settings::Settings::load();
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(settings.level_filter())
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", settings.level_filter());
    }
    #[cfg(feature = "dhat_heap")]
    let _profiler = {
        log::trace!("Installed dhat");
        dhat::Profiler::new_heap()
    };
    if settings.did_fail_to_load() {
        log::warn!("Settings weren't available, defaulting.");
    }

    let (steps, list, write_settings) = parse_args(std::env::args().skip(1))?;
    if list {
        for action in <Action as strum::IntoEnumIterator>::iter() {
            println!("{:<26} {}", action.as_ref(), action.help());
        }
    }
    if write_settings {
        match settings.save() {
            Ok(path) => log::info!("Wrote settings to {path:?}"),
            Err(e) => log::warn!("Failed to save settings:\n{e:?}"),
        }
    }

    let painter = Painter {
        shape: settings.shape,
        color: settings.paint_color,
        selection: None,
    };
    let mut document = Document::new();
    for step in steps {
        match step {
            Step::Action(action, arg) => action.perform(&mut document, &painter, None, arg)?,
            Step::Image(path) => {
                document.history_tracked(|document| document.add_image_layer(&path))?;
            }
        }
        // Regenerate derived content eagerly, so later steps see it.
        document.synchronize()?;
    }
    let dropped = document.history_resize(settings.history_size);
    if dropped != 0 {
        log::debug!("Forgot {dropped} undo steps");
    }
    print_summary(&mut document)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{parse_args, Step};
    use voxdoc_core::Action;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|&s| s.to_owned()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn parses_steps() {
        let (steps, list, write) =
            parse_args(args(&["img_new_layer", "img_move_layer=-1", "--image", "a.png", "--list"]))
                .unwrap();
        assert!(list && !write);
        assert!(matches!(steps[0], Step::Action(Action::ImgNewLayer, None)));
        assert!(matches!(steps[1], Step::Action(Action::ImgMoveLayer, Some(-1))));
        assert!(matches!(&steps[2], Step::Image(path) if path.as_os_str() == "a.png"));
    }
    #[test]
    fn rejects_garbage() {
        assert!(parse_args(args(&["img_frobnicate"])).is_err());
        assert!(parse_args(args(&["img_move_layer=up"])).is_err());
        assert!(parse_args(args(&["--image"])).is_err());
    }
}
