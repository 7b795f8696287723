/// Window dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDimensions {
    pub width: u32,
    pub height: u32,
}

impl WindowDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A minimised window reports zero in one dimension
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height; 1.0 for an empty window so projections stay finite
    pub fn aspect_ratio(&self) -> f32 {
        if self.is_empty() {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for WindowDimensions {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::new(size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_dimensions_new() {
        let dims = WindowDimensions::new(1920, 1080);
        assert_eq!(dims.width, 1920);
        assert_eq!(dims.height, 1080);
    }

    #[test]
    fn test_aspect_ratio() {
        assert_eq!(WindowDimensions::new(1280, 720).aspect_ratio(), 1280.0 / 720.0);
        assert_eq!(WindowDimensions::new(600, 600).aspect_ratio(), 1.0);
    }

    #[test]
    fn test_minimised_window() {
        let dims = WindowDimensions::new(1280, 0);
        assert!(dims.is_empty());
        assert_eq!(dims.aspect_ratio(), 1.0);
        assert!(!WindowDimensions::new(1, 1).is_empty());
    }

    #[test]
    fn test_from_physical_size() {
        let dims: WindowDimensions = winit::dpi::PhysicalSize::new(800u32, 600u32).into();
        assert_eq!(dims, WindowDimensions::new(800, 600));
    }
}
