use super::{Document, DocumentError};
use crate::{
    id,
    state::{
        camera::{Camera, CameraID},
        Direction,
    },
};

impl Document {
    /// # Errors
    /// If no camera has this ID.
    pub fn camera(&self, id: CameraID) -> Result<&Camera, DocumentError> {
        self.content
            .cameras
            .iter()
            .find(|camera| camera.id() == id)
            .ok_or(DocumentError::CameraNotFound(id))
    }
    /// # Errors
    /// If no camera has this ID.
    pub fn camera_mut(&mut self, id: CameraID) -> Result<&mut Camera, DocumentError> {
        self.content
            .cameras
            .iter_mut()
            .find(|camera| camera.id() == id)
            .ok_or(DocumentError::CameraNotFound(id))
    }
    fn camera_index(&self, id: CameraID) -> Result<usize, DocumentError> {
        self.content
            .cameras
            .iter()
            .position(|camera| camera.id() == id)
            .ok_or(DocumentError::CameraNotFound(id))
    }
    fn camera_name_exists(&self, name: &str) -> bool {
        self.content
            .cameras
            .iter()
            .any(|camera| id::name_eq(camera.name(), name))
    }
    #[must_use]
    pub fn active_camera(&self) -> Option<&Camera> {
        self.content
            .active_camera
            .and_then(|id| self.camera(id).ok())
    }
    /// # Errors
    /// If no camera has this ID.
    pub fn set_active_camera(&mut self, id: CameraID) -> Result<(), DocumentError> {
        self.camera_index(id)?;
        self.content.active_camera = Some(id);
        Ok(())
    }

    /// Append a new camera and make it active.
    pub fn add_camera(&mut self, name: Option<&str>) -> CameraID {
        let name = match name {
            Some(name) => id::available_name(name, |c| self.camera_name_exists(c)),
            None => id::unique_name("Camera", |c| self.camera_name_exists(c)),
        };
        let camera = Camera::new(name);
        let id = camera.id();
        log::trace!("Adding {id} {:?}", camera.name());
        self.content.cameras.push(camera);
        self.content.active_camera = Some(id);
        id
    }
    /// Remove a camera, the active one when given `None`. Removing the active camera activates the first remaining one.
    /// Without a target and without an active camera, nothing happens.
    /// # Errors
    /// If the target doesn't exist.
    pub fn delete_camera(&mut self, target: Option<CameraID>) -> Result<(), DocumentError> {
        let Some(id) = target.or(self.content.active_camera) else {
            log::debug!("No camera to delete");
            return Ok(());
        };
        let idx = self.camera_index(id)?;
        self.content.cameras.remove(idx);
        if self.content.active_camera == Some(id) {
            self.content.active_camera = self.content.cameras.first().map(Camera::id);
        }
        Ok(())
    }
    /// Swap a camera with its neighbor. Nothing happens at either end of the list.
    /// # Errors
    /// If the target doesn't exist, or there is no target and no active camera.
    pub fn move_camera(
        &mut self,
        target: Option<CameraID>,
        direction: Direction,
    ) -> Result<(), DocumentError> {
        let Some(id) = target.or(self.content.active_camera) else {
            log::debug!("No camera to move");
            return Ok(());
        };
        let idx = self.camera_index(id)?;
        if let Some(other) = direction.neighbor(idx, self.content.cameras.len()) {
            self.content.cameras.swap(idx, other);
        }
        Ok(())
    }
    /// # Errors
    /// See [`Self::move_camera`].
    pub fn move_camera_up(&mut self, target: Option<CameraID>) -> Result<(), DocumentError> {
        self.move_camera(target, Direction::Up)
    }
    /// # Errors
    /// See [`Self::move_camera`].
    pub fn move_camera_down(&mut self, target: Option<CameraID>) -> Result<(), DocumentError> {
        self.move_camera(target, Direction::Down)
    }
}
