//! Draw-call preparation
//!
//! Rendering itself belongs to the host. This module turns a sprite index plus
//! placement into a [`DrawCommand`] and hands it to a [`SpriteRenderer`]
//! together with the atlas texture the sprite lives on.

use glam::Vec2;

use crate::bundle::Bundle;
use crate::sprite::Rect;

/// RGBA8 tint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Everything a renderer needs to blit one sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Atlas the source rect refers to
    pub atlas_index: usize,
    /// Region of the atlas, in pixels
    pub source: Rect,
    /// Screen rect: top-left at the draw position, size scaled
    pub destination: Rect,
    /// Pivot relative to `destination`, already scaled
    pub origin: Vec2,
    /// Degrees, around `origin`
    pub rotation: f32,
    pub tint: Color,
}

/// Host-side drawing backend
pub trait SpriteRenderer<T> {
    fn draw_texture(&mut self, texture: &T, command: &DrawCommand);
}

impl<T> Bundle<T> {
    /// Build the draw command for sprite `index`, or `None` if there is no
    /// such sprite.
    pub fn draw_command(
        &self,
        index: usize,
        position: Vec2,
        scale: Vec2,
        rotation: f32,
        tint: Color,
    ) -> Option<DrawCommand> {
        let sprite = self.sprite(index)?;
        let size = sprite.size() * scale;
        Some(DrawCommand {
            atlas_index: sprite.atlas_index,
            source: sprite.source,
            destination: Rect::new(position.x, position.y, size.x, size.y),
            origin: sprite.origin * scale,
            rotation,
            tint,
        })
    }

    /// Draw at `position` with no scaling or rotation. Does nothing for an
    /// unknown index.
    pub fn draw_sprite<R>(&self, renderer: &mut R, index: usize, position: Vec2, tint: Color)
    where
        R: SpriteRenderer<T> + ?Sized,
    {
        self.draw_sprite_ex(renderer, index, position, Vec2::ONE, 0.0, tint);
    }

    pub fn draw_sprite_ex<R>(
        &self,
        renderer: &mut R,
        index: usize,
        position: Vec2,
        scale: Vec2,
        rotation: f32,
        tint: Color,
    ) where
        R: SpriteRenderer<T> + ?Sized,
    {
        let Some(command) = self.draw_command(index, position, scale, rotation, tint) else {
            return;
        };
        if let Some(atlas) = self.atlas_image(command.atlas_index) {
            renderer.draw_texture(&atlas.texture, &command);
        }
    }
}
