//! Puzzle units placed around the installation.

pub mod bone;
