//! Turtle state and operations for tree interpretation.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Multiplicative decay applied to each sub-branch.
///
/// On `[` the width is multiplied by `width_scale` and both branch-length bounds by
/// `length_scale`; `]` undoes it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShrinkParams {
    pub length_scale: f32,
    pub width_scale: f32,
}

/// Position and orientation of the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cursor {
    /// Current world-space position of the "cursor".
    pub position: Vec3,

    /// Current world-space orientation.
    pub rotation: Quat,
}

impl Default for Cursor {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Cursor {
    /// Returns the turtle's local up direction (Y-axis) in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Returns the turtle's local forward direction (Z-axis) in world space.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Returns the turtle's local right direction (X-axis) in world space.
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Rotates the turtle around its local Y axis by `angle` radians.
    pub fn rotate_local_y(&mut self, angle: f32) {
        self.rotation *= Quat::from_axis_angle(Vec3::Y, angle);
    }

    /// Rotates the turtle around its local Z axis by `angle` radians.
    pub fn rotate_local_z(&mut self, angle: f32) {
        self.rotation *= Quat::from_axis_angle(Vec3::Z, angle);
    }

    /// Moves the turtle `distance` units along its local up axis.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.up() * distance;
    }
}

/// Everything a `[` saves and a `]` restores.
///
/// Position, orientation, width and the branch-length bounds travel together as one record so
/// they can never be restored out of step with each other.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleState {
    pub cursor: Cursor,

    /// Width applied to branch placements.
    pub width: f32,

    /// Lower bound for sampled branch lengths.
    pub min_branch_length: f32,

    /// Upper bound for sampled branch lengths.
    pub max_branch_length: f32,
}

impl TurtleState {
    pub fn new(width: f32, min_branch_length: f32, max_branch_length: f32) -> Self {
        Self {
            cursor: Cursor::default(),
            width,
            min_branch_length,
            max_branch_length,
        }
    }

    /// Scales width and length bounds down for a sub-branch.
    ///
    /// Results saturate at `±f32::MAX`, so growing factors under deep nesting stay finite.
    pub fn shrink(&mut self, params: &ShrinkParams) {
        self.width = saturate(self.width * params.width_scale);
        self.min_branch_length = saturate(self.min_branch_length * params.length_scale);
        self.max_branch_length = saturate(self.max_branch_length * params.length_scale);
    }
}

fn saturate(value: f32) -> f32 {
    value.clamp(-f32::MAX, f32::MAX)
}

/// The LIFO of saved turtle states.
#[derive(Clone, Debug)]
pub struct TurtleStack {
    frames: Vec<TurtleState>,
    max_depth: usize,
}

impl TurtleStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            frames: Vec::new(),
            max_depth,
        }
    }

    /// Saves `state`. Returns `false` (and saves nothing) when the stack is full.
    #[must_use]
    pub fn push(&mut self, state: TurtleState) -> bool {
        if self.frames.len() >= self.max_depth {
            return false;
        }
        self.frames.push(state);
        true
    }

    pub fn pop(&mut self) -> Option<TurtleState> {
        self.frames.pop()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
