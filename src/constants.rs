//! Centralized arena constants.
//!
//! Values that must match on every participant live here so a deployment
//! diff is one file. Per-deployment tunables (grid size, branch budget) are
//! in [`crate::config::GenerationConfig`] instead.

// =====================================================
// Seed
// =====================================================

/// Replicated seed value meaning "authority has not chosen yet"
pub const PENDING_SEED: u32 = 0;

/// Smallest valid seed (inclusive)
pub const SEED_MIN: u32 = 1000;

/// Upper seed bound (exclusive)
pub const SEED_MAX: u32 = 9999;

// =====================================================
// Generation
// =====================================================

/// Draws above this threshold pick WallKindA / step along X
pub const COIN_THRESHOLD: f64 = 0.5;

/// Hard cap on dead-end sampling attempts per generation run
pub const BRANCH_ATTEMPT_LIMIT: u32 = 100;

// =====================================================
// Geometry
// =====================================================

/// Y coordinate of wall centers
pub const WALL_CENTER_Y: f32 = 1.5;

/// Visual height of a wall block
pub const WALL_HEIGHT: f32 = 3.0;

/// Thickness of the floor slab
pub const FLOOR_THICKNESS: f32 = 0.2;

/// Height of the outer border walls
pub const BORDER_HEIGHT: f32 = 4.0;

/// Avatar spawn height above the floor
pub const SPAWN_HEIGHT: f32 = 2.0;

// =====================================================
// Dimensions (render layers)
// =====================================================

/// Floor, borders and avatars
pub const SHARED_LAYER: usize = 0;

/// Walls only the red dimension can see
pub const RED_LAYER: usize = 1;

/// Walls only the blue dimension can see
pub const BLUE_LAYER: usize = 2;
