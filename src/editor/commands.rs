use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::boundary::{Boundary, BoundaryConfig, ConfirmSummary};
use crate::editor::EditorHost;
use crate::scene::{NodeId, SceneGraph};

pub const CMD_RECONFIGURE: &str = "boundary.reconfigure";
pub const CMD_ADD_NODE: &str = "boundary.add_node";
pub const CMD_CONFIRM: &str = "boundary.confirm";
pub const CMD_RESET: &str = "boundary.reset";
pub const CMD_NODE_MOVED: &str = "boundary.node_moved";

/// Inbound edits a frontend can request against one boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryCommand {
    /// Re-derive everything; with a config, replace the configuration first.
    Reconfigure { config: Option<BoundaryConfig> },
    AddNode,
    Confirm,
    Reset,
    /// A control node was dragged to a new world position.
    NodeMoved { node: NodeId, position: [f32; 3] },
}

impl BoundaryCommand {
    pub fn op_name(&self) -> &'static str {
        match self {
            BoundaryCommand::Reconfigure { .. } => CMD_RECONFIGURE,
            BoundaryCommand::AddNode => CMD_ADD_NODE,
            BoundaryCommand::Confirm => CMD_CONFIRM,
            BoundaryCommand::Reset => CMD_RESET,
            BoundaryCommand::NodeMoved { .. } => CMD_NODE_MOVED,
        }
    }

    /// Human-readable label recorded with the mutation, in undo-menu style.
    pub fn undo_label(&self) -> &'static str {
        match self {
            BoundaryCommand::Reconfigure { .. } => "Reconfigure Boundary",
            BoundaryCommand::AddNode => "Add Node",
            BoundaryCommand::Confirm => "Confirm Boundary",
            BoundaryCommand::Reset => "Reset Boundary",
            BoundaryCommand::NodeMoved { .. } => "Move Node",
        }
    }
}

/// Result of dispatching one command: either the boundary is still being
/// edited, or confirm converted it into permanent geometry.
pub enum DispatchOutcome {
    Editing(Boundary),
    Confirmed(ConfirmSummary),
}

impl DispatchOutcome {
    pub fn into_boundary(self) -> Option<Boundary> {
        match self {
            DispatchOutcome::Editing(boundary) => Some(boundary),
            DispatchOutcome::Confirmed(_) => None,
        }
    }
}

/// Applies a command to the boundary. The mutation is recorded on the host
/// before anything changes, so even rejected edits leave an undo entry,
/// matching editor undo conventions.
pub fn dispatch<H: EditorHost>(
    mut boundary: Boundary,
    command: BoundaryCommand,
    scene: &mut SceneGraph,
    host: &mut H,
) -> DispatchOutcome {
    host.record_mutation(command.op_name(), command.undo_label());

    match command {
        BoundaryCommand::Reconfigure { config } => {
            match config {
                Some(config) => boundary.apply_config(scene, host, config),
                None => boundary.reconfigure(scene, host),
            }
            DispatchOutcome::Editing(boundary)
        }
        BoundaryCommand::AddNode => {
            boundary.add_node(scene, host);
            DispatchOutcome::Editing(boundary)
        }
        BoundaryCommand::Confirm => {
            let summary = boundary.confirm(scene, host);
            DispatchOutcome::Confirmed(summary)
        }
        BoundaryCommand::Reset => {
            boundary.reset(scene, host);
            DispatchOutcome::Editing(boundary)
        }
        BoundaryCommand::NodeMoved { node, position } => {
            scene.set_position(node, Point3::from(position));
            boundary.notify_node_moved(scene, host, node);
            DispatchOutcome::Editing(boundary)
        }
    }
}
