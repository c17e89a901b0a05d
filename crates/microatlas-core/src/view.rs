//! Camera view-state: log2 zoom plus an image-space focal point.

use serde::{Deserialize, Serialize};

/// The single source of truth for the current camera.
///
/// `zoom` is a log2 scale factor: one image pixel covers `2^zoom` screen pixels.
/// `target` is the image-space point shown at the container center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub zoom: f32,
    pub target: [f32; 3],
}

impl ViewState {
    pub fn new(zoom: f32, target: [f32; 3]) -> Self {
        Self { zoom, target }
    }

    /// Screen pixels per image pixel at the current zoom.
    pub fn scale(&self) -> f32 {
        self.zoom.exp2()
    }

    /// Project an image-space point to container-relative screen coordinates.
    pub fn image_to_screen(&self, image: [f32; 2], container: [f32; 2]) -> [f32; 2] {
        let s = self.scale();
        [
            (image[0] - self.target[0]) * s + container[0] / 2.0,
            (image[1] - self.target[1]) * s + container[1] / 2.0,
        ]
    }

    /// Inverse of [`image_to_screen`](Self::image_to_screen).
    pub fn screen_to_image(&self, screen: [f32; 2], container: [f32; 2]) -> [f32; 2] {
        let s = self.scale();
        [
            (screen[0] - container[0] / 2.0) / s + self.target[0],
            (screen[1] - container[1] / 2.0) / s + self.target[1],
        ]
    }
}

/// Camera destination for programmatic navigation. The z component is optional
/// on the wire; absent means 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavDestination {
    pub zoom: f32,
    pub target: [f32; 3],
}

impl NavDestination {
    pub fn new(zoom: f32, target: [f32; 3]) -> Self {
        Self { zoom, target }
    }

    pub fn from_xy(zoom: f32, x: f32, y: f32) -> Self {
        Self { zoom, target: [x, y, 0.0] }
    }
}

impl From<&crate::config::SavedView> for NavDestination {
    fn from(view: &crate::config::SavedView) -> Self {
        Self { zoom: view.zoom, target: view.target }
    }
}
