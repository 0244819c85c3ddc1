use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// What a placement represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    /// A structural segment. The turtle advances past it.
    Branch,
    /// A terminal leaf or flower. The turtle stays put.
    Blossom,
}

/// A single positioned, oriented, scaled element for the host to instantiate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementCommand {
    pub kind: PlacementKind,

    /// World-space position of the element's pivot.
    pub position: Vec3,

    /// World-space orientation; the element's growth axis is local Y.
    pub rotation: Quat,

    /// Per-axis scale. Branches are `(width, length, width)`, blossoms are uniform.
    pub scale: Vec3,
}

/// The complete, engine-agnostic output of one generation pass.
///
/// An ordered list of [`PlacementCommand`]s, one per drawn `F`, in string order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeBlueprint {
    pub commands: Vec<PlacementCommand>,
}

impl TreeBlueprint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: PlacementCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementCommand> {
        self.commands.iter()
    }

    pub fn branches(&self) -> impl Iterator<Item = &PlacementCommand> {
        self.of_kind(PlacementKind::Branch)
    }

    pub fn blossoms(&self) -> impl Iterator<Item = &PlacementCommand> {
        self.of_kind(PlacementKind::Blossom)
    }

    fn of_kind(&self, kind: PlacementKind) -> impl Iterator<Item = &PlacementCommand> {
        self.commands.iter().filter(move |c| c.kind == kind)
    }

    /// Axis-aligned `(min, max)` of all placement pivots, `None` when empty.
    ///
    /// Only pivots are considered, not the extent of the scaled geometry; hosts use this for
    /// framing the camera, not for collision.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.commands.first()?.position;
        Some(
            self.commands
                .iter()
                .fold((first, first), |(min, max), c| {
                    (min.min(c.position), max.max(c.position))
                }),
        )
    }
}

impl<'a> IntoIterator for &'a TreeBlueprint {
    type Item = &'a PlacementCommand;
    type IntoIter = std::slice::Iter<'a, PlacementCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
