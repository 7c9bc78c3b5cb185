//! Sprite records

use glam::Vec2;

/// Axis-aligned rectangle in atlas pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// (width, height)
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// One named region inside one atlas
///
/// Immutable after decode except for [`Sprite::origin`], which the host may
/// override through [`crate::Bundle::set_sprite_origin`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Sprite name, non-empty
    pub name: String,
    /// Position of the atlas in the bundle's [`crate::AtlasStore`]
    pub atlas_index: usize,
    /// Region inside the atlas
    pub source: Rect,
    /// Draw pivot, relative to the top-left of `source`
    pub origin: Vec2,
    /// Animation frame count as authored
    pub frame_count: u32,
    /// Animation speed; only schema version 2 carries it
    pub frame_speed: Option<f32>,
}

impl Sprite {
    pub fn size(&self) -> Vec2 {
        self.source.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_accessors() {
        let rect = Rect::new(16.0, 32.0, 8.0, 24.0);
        assert_eq!(rect.position(), Vec2::new(16.0, 32.0));
        assert_eq!(rect.size(), Vec2::new(8.0, 24.0));
    }

    #[test]
    fn test_sprite_size_is_source_size() {
        let sprite = Sprite {
            name: "hero".into(),
            atlas_index: 0,
            source: Rect::new(4.0, 4.0, 12.0, 20.0),
            origin: Vec2::new(6.0, 20.0),
            frame_count: 1,
            frame_speed: None,
        };
        assert_eq!(sprite.size(), Vec2::new(12.0, 20.0));
    }
}
