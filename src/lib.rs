//! Simulation core of a vertical-scrolling bullet-hell shooter.
//!
//! The core is a fixed-timestep state machine: the front end hands an
//! [`input::InputSnapshot`] to [`compute::tick`] once per frame, then draws
//! the [`render::RenderModel`] built from the resulting [`entities::GameState`].

pub mod boss;
pub mod bullets;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod events;
pub mod geometry;
pub mod grenade;
pub mod hard_mode;
pub mod input;
pub mod patterns;
pub mod player;
pub mod pool;
pub mod render;
pub mod select;
pub mod spawner;
