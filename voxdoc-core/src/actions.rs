//! # Actions
//!
//! Every document operation a dispatcher may invoke, by a stable name. An action takes the document, at most one
//! target entity and at most one integer argument. Actions that mutate the document are undoable as a whole.

use crate::state::{
    camera::CameraID, material::MaterialID, painter::Painter, Direction, Document, DocumentError,
};
use crate::id::LayerID;

#[derive(
    strum::AsRefStr,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
    PartialEq,
    Eq,
    Copy,
    Clone,
    Hash,
    Debug,
)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
    LayerClear,
    ImgNewLayer,
    ImgDelLayer,
    /// Takes a direction argument, `1` for up or `-1` for down.
    ImgMoveLayer,
    ImgMoveLayerUp,
    ImgMoveLayerDown,
    ImgDuplicateLayer,
    ImgCloneLayer,
    ImgUncloneLayer,
    ImgSelectParentLayer,
    ImgMergeVisibleLayers,
    ImgNewCamera,
    ImgDelCamera,
    /// Takes a direction argument, `1` for up or `-1` for down.
    ImgMoveCamera,
    ImgMoveCameraUp,
    ImgMoveCameraDown,
    ImgImageLayerToMesh,
    ImgNewShapeLayer,
    ImgNewMaterial,
    ImgDelMaterial,
    Undo,
    Redo,
}

/// The entity an action is aimed at, when not the active one.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Target {
    Layer(LayerID),
    Camera(CameraID),
    Material(MaterialID),
}
impl Target {
    fn kind(self) -> &'static str {
        match self {
            Self::Layer(_) => "layer",
            Self::Camera(_) => "camera",
            Self::Material(_) => "material",
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ActionError {
    #[error("{action} can't act on a {found}")]
    MismatchedTarget {
        action: Action,
        found: &'static str,
    },
    #[error("{action} needs an argument of 1 or -1, got {found:?}")]
    InvalidArgument {
        action: Action,
        found: Option<i32>,
    },
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl Action {
    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            Self::LayerClear => "Clear the active layer, or the selected part of it",
            Self::ImgNewLayer => "Add a new layer to the image",
            Self::ImgDelLayer => "Delete the active layer",
            Self::ImgMoveLayer => "Move the active layer",
            Self::ImgMoveLayerUp => "Move the active layer up",
            Self::ImgMoveLayerDown => "Move the active layer down",
            Self::ImgDuplicateLayer => "Duplicate the active layer",
            Self::ImgCloneLayer => "Clone the active layer",
            Self::ImgUncloneLayer => "Unclone the active layer",
            Self::ImgSelectParentLayer => "Select the parent of a layer",
            Self::ImgMergeVisibleLayers => "Merge all the visible layers",
            Self::ImgNewCamera => "Add a new camera to the image",
            Self::ImgDelCamera => "Delete the active camera",
            Self::ImgMoveCamera => "Move the active camera",
            Self::ImgMoveCameraUp => "Move the active camera up",
            Self::ImgMoveCameraDown => "Move the active camera down",
            Self::ImgImageLayerToMesh => "Turn an image layer into a mesh",
            Self::ImgNewShapeLayer => "Add a new shape layer to the image",
            Self::ImgNewMaterial => "Add a new material to the image",
            Self::ImgDelMaterial => "Delete a material",
            Self::Undo => "Undo the last change",
            Self::Redo => "Redo the last undone change",
        }
    }
    /// Does this action change the document, and so get an undo point?
    #[must_use]
    pub fn touches_document(self) -> bool {
        !matches!(self, Self::Undo | Self::Redo)
    }
    fn wants_argument(self) -> bool {
        matches!(self, Self::ImgMoveLayer | Self::ImgMoveCamera)
    }

    /// Run this action. An undo point is recorded first if [`Self::touches_document`].
    ///
    /// `painter` supplies the shape, color and selection box for the actions that draw on them.
    /// # Errors
    /// If the target is of the wrong kind or doesn't exist, or the argument is unusable,
    /// or the operation itself fails. The document and its history are unchanged on error.
    pub fn perform(
        self,
        document: &mut Document,
        painter: &Painter,
        target: Option<Target>,
        arg: Option<i32>,
    ) -> Result<(), ActionError> {
        let direction = if self.wants_argument() {
            let found = arg;
            Some(
                arg.and_then(|arg| Direction::try_from(arg).ok())
                    .ok_or(ActionError::InvalidArgument {
                        action: self,
                        found,
                    })?,
            )
        } else {
            if arg.is_some() {
                log::warn!("{self} ignores its argument {arg:?}");
            }
            None
        };
        let target = self.check_target(document, target)?;
        log::debug!("Performing {self} on {target:?}");

        if self.touches_document() {
            document.history_tracked(|document| self.apply(document, painter, target, direction))?;
        } else {
            self.apply(document, painter, target, direction)?;
        }
        Ok(())
    }

    /// Make sure the target is of a kind this action accepts and is in the document.
    fn check_target(
        self,
        document: &Document,
        target: Option<Target>,
    ) -> Result<Option<Target>, ActionError> {
        let Some(target) = target else {
            return Ok(None);
        };
        let accepted = match self {
            Self::LayerClear
            | Self::ImgDelLayer
            | Self::ImgMoveLayer
            | Self::ImgMoveLayerUp
            | Self::ImgMoveLayerDown
            | Self::ImgDuplicateLayer
            | Self::ImgCloneLayer
            | Self::ImgUncloneLayer
            | Self::ImgSelectParentLayer
            | Self::ImgImageLayerToMesh => matches!(target, Target::Layer(_)),
            Self::ImgDelCamera
            | Self::ImgMoveCamera
            | Self::ImgMoveCameraUp
            | Self::ImgMoveCameraDown => matches!(target, Target::Camera(_)),
            Self::ImgDelMaterial => matches!(target, Target::Material(_)),
            _ => false,
        };
        if !accepted {
            return Err(ActionError::MismatchedTarget {
                action: self,
                found: target.kind(),
            });
        }
        match target {
            Target::Layer(id) => document.layer(id).map(|_| ())?,
            Target::Camera(id) => document.camera(id).map(|_| ())?,
            Target::Material(id) => document.material(id).map(|_| ())?,
        }
        Ok(Some(target))
    }

    fn apply(
        self,
        document: &mut Document,
        painter: &Painter,
        target: Option<Target>,
        direction: Option<Direction>,
    ) -> Result<(), DocumentError> {
        let layer = match target {
            Some(Target::Layer(id)) => Some(id),
            _ => None,
        };
        let camera = match target {
            Some(Target::Camera(id)) => Some(id),
            _ => None,
        };
        let material = match target {
            Some(Target::Material(id)) => Some(id),
            _ => None,
        };
        let direction = direction.unwrap_or(Direction::Up);
        match self {
            Self::LayerClear => document.clear_layer(layer, painter.selection())?,
            Self::ImgNewLayer => {
                document.add_layer(None);
            }
            Self::ImgDelLayer => document.delete_layer(layer)?,
            Self::ImgMoveLayer => document.move_layer(layer, direction)?,
            Self::ImgMoveLayerUp => document.move_layer_up(layer)?,
            Self::ImgMoveLayerDown => document.move_layer_down(layer)?,
            Self::ImgDuplicateLayer => {
                document.duplicate_layer(layer)?;
            }
            Self::ImgCloneLayer => {
                document.clone_layer(layer)?;
            }
            Self::ImgUncloneLayer => document.unclone_layer(layer)?,
            Self::ImgSelectParentLayer => document.select_parent_layer(layer)?,
            Self::ImgMergeVisibleLayers => document.merge_visible_layers(),
            Self::ImgNewCamera => {
                document.add_camera(None);
            }
            Self::ImgDelCamera => document.delete_camera(camera)?,
            Self::ImgMoveCamera => document.move_camera(camera, direction)?,
            Self::ImgMoveCameraUp => document.move_camera_up(camera)?,
            Self::ImgMoveCameraDown => document.move_camera_down(camera)?,
            Self::ImgImageLayerToMesh => document.image_layer_to_mesh(layer)?,
            Self::ImgNewShapeLayer => {
                document.add_shape_layer(painter);
            }
            Self::ImgNewMaterial => {
                document.add_material(None);
            }
            Self::ImgDelMaterial => document.delete_material(material)?,
            Self::Undo => {
                document.undo();
            }
            Self::Redo => {
                document.redo();
            }
        }
        Ok(())
    }
}
