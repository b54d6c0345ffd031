pub mod control;
pub mod days;
pub mod gauge;
pub mod geometry;
pub mod reveal;
pub mod svg;
pub mod tween;
