use std::env;
use std::path::PathBuf;

use rampart_editor::boundary::{Boundary, BoundaryConfig};
use rampart_editor::editor::{BoundaryCommand, DispatchOutcome, HeadlessHost, dispatch};
use rampart_editor::scene::SceneGraph;

fn main() {
    if let Err(err) = run() {
        eprintln!("[session] error: {err}");
        std::process::exit(1);
    }
}

/// Runs a scripted headless authoring session and writes its edit journal,
/// so the journal format can be inspected without an editor frontend.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let output_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("boundary_session.json"));

    let mut scene = SceneGraph::new();
    let mut host = HeadlessHost::new();
    let root = scene.spawn("Playspace");
    let boundary = Boundary::attach(&mut scene, &mut host, root, BoundaryConfig::default())?;

    let script = [
        BoundaryCommand::Reset,
        BoundaryCommand::AddNode,
        BoundaryCommand::Confirm,
    ];
    let mut outcome = DispatchOutcome::Editing(boundary);
    for command in script {
        outcome = match outcome {
            DispatchOutcome::Editing(live) => dispatch(live, command, &mut scene, &mut host),
            confirmed => confirmed,
        };
    }

    match outcome {
        DispatchOutcome::Confirmed(summary) => println!(
            "[session] confirmed: {} colliders kept, {} nodes swept",
            summary.colliders.len(),
            summary.removed_nodes
        ),
        DispatchOutcome::Editing(live) => {
            println!("[session] still editing {} nodes", live.node_count())
        }
    }
    for warning in host.warnings() {
        eprintln!("[session] warning: {warning}");
    }

    host.journal().write_json(&output_path)?;
    println!(
        "[session] wrote {} records to {}",
        host.journal().total_records(),
        output_path.display()
    );
    Ok(())
}
