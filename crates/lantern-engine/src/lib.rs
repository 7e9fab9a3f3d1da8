//! Lantern engine crate.
//!
//! A small real-time 2D runtime: a capped-delta frame loop driving named scenes,
//! unified keyboard/pointer/touch actions, a follow camera with shake, tweens,
//! collision predicates, procedural audio and background asset loading. Scenes
//! draw into a fixed-resolution software surface that the desktop runtime scales
//! into the window.

pub mod config;
pub mod error;
pub mod logging;

pub mod coords;
pub mod paint;
pub mod time;
pub mod util;

pub mod input;
pub mod collide;
pub mod tween;
pub mod camera;
pub mod audio;
pub mod assets;
pub mod draw;
pub mod scene;

pub mod core;

pub mod device;
pub mod render;
pub mod window;

pub use crate::config::{EngineConfig, Orientation};
pub use crate::core::{Engine, EngineBuilder};
pub use crate::scene::{LoadDone, Scene, SceneCtx};
