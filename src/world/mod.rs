mod camera;
mod grid;
mod sprite;
mod texture;

pub use camera::Camera;
pub use grid::{Cell, GridMap, MapError};
pub use sprite::{Sprite, SpriteLayer};
pub use texture::{NO_TEXTURE, Texture, TextureBank, TextureError, TextureId};
