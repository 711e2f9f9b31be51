//! Grid-based first-person renderer and agent sim.
//!
//! The crate splits along the frame phases:
//!
//! * [`world`]    – grid map, camera basis, textures, sprites
//! * [`raycast`]  – DDA traversal shared by renderer, AI and weapon
//! * [`nav`]      – BFS pathfinding and the locomotion state machine
//! * [`sim`]      – hecs world of agents, pickups and the player
//! * [`renderer`] – software wall/sprite projection into a pixel buffer
//! * [`config`], [`hooks`], [`audio`] – binary-facing seams

pub mod audio;
pub mod config;
pub mod hooks;
pub mod nav;
pub mod raycast;
pub mod renderer;
pub mod sim;
pub mod world;
