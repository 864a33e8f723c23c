use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::Receiver;
use grove_canvas::CanvasSession;
use grove_core::{CanvasSettings, DocumentSnapshot, Heat, NodeId, VoiceRegistry};
use grove_events::{Event, InMemoryBoundary};
use grove_graph::{LinkIndex, LinkKind, Vec2, ViewTransform};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Lay out a thinking tree headlessly and print the result as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Document snapshot: `{"tree": {...}, "edges": [...]}`
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Canvas settings JSON; missing fields use defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Persona registry JSON: `{"<voice id>": {"id", "name", "color"}}`
    #[arg(long)]
    voices: Option<PathBuf>,

    #[arg(long, default_value_t = 1200.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,

    /// Override the repelling force (clamped to 5..=60)
    #[arg(long)]
    repel_force: Option<f32>,

    /// Thought ids to hover once before the layout runs
    #[arg(long = "hover", value_name = "ID")]
    hover: Vec<String>,

    /// Frame interval of the simulated clock in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Stop after this many frames even if the canvas is still animating
    #[arg(long, default_value_t = 2_000)]
    max_frames: u64,

    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Serialize)]
struct NodeReport {
    id: NodeId,
    label: String,
    heat: Heat,
    x: f32,
    y: f32,
    radius: f32,
    seen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    ring: Option<String>,
}

#[derive(Debug, Serialize)]
struct LinkReport {
    kind: LinkKind,
    source: NodeId,
    target: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    label_at: Option<Vec2>,
}

#[derive(Debug, Serialize)]
struct Report {
    nodes: Vec<NodeReport>,
    links: Vec<LinkReport>,
    transform: ViewTransform,
    unseen_count: usize,
    acknowledged: Vec<NodeId>,
    frames: u64,
    ticks: u64,
    settled: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
    let args = Args::parse();

    let report = run(&args)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}

fn run(args: &Args) -> Result<Report> {
    let snapshot = DocumentSnapshot::load(&args.snapshot)
        .with_context(|| format!("loading snapshot {}", args.snapshot.display()))?;
    let settings = match &args.settings {
        Some(path) => CanvasSettings::load(path)
            .with_context(|| format!("loading settings {}", path.display()))?,
        None => CanvasSettings::default(),
    };
    let voices: VoiceRegistry = match &args.voices {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading voices {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing voices {}", path.display()))?
        }
        None => VoiceRegistry::default(),
    };

    let (boundary, events) = InMemoryBoundary::channel();
    let mut session = CanvasSession::new(
        settings,
        Vec2::new(args.width, args.height),
        Box::new(boundary),
    )
    .with_voices(voices);
    session.load_snapshot(&snapshot, Duration::ZERO);
    if let Some(repel_force) = args.repel_force {
        session.set_repel_force(repel_force);
    }
    for id in &args.hover {
        let id = NodeId::new(id.as_str());
        let known = snapshot
            .tree
            .as_ref()
            .is_some_and(|tree| tree.find(&id).is_some());
        if !known {
            tracing::warn!("Hover target {} is not in the snapshot", id);
            continue;
        }
        session.hover_enter(&id, Vec2::ZERO, Duration::ZERO);
        session.hover_leave(Duration::ZERO);
    }

    let step = args.frame_ms.max(1);
    let mut frames = 0;
    let mut busy = true;
    while busy && frames < args.max_frames {
        frames += 1;
        busy = session.frame(Duration::from_millis(frames * step));
    }
    if busy {
        tracing::warn!("Canvas still animating after {} frames", frames);
    }

    let end = Duration::from_millis(frames * step);
    Ok(build_report(&session, &events, frames, end, !busy))
}

fn build_report(
    session: &CanvasSession,
    events: &Receiver<Event>,
    frames: u64,
    end: Duration,
    settled: bool,
) -> Report {
    let state = session.state();
    let model = state.engine.model();

    let nodes = model
        .nodes()
        .iter()
        .map(|node| NodeReport {
            id: node.id.clone(),
            label: node.label.clone(),
            heat: node.heat,
            x: node.position.x,
            y: node.position.y,
            radius: node.radius,
            seen: state.visibility.is_seen(node),
            ring: session
                .node_visual(&node.id, end)
                .and_then(|visual| visual.ring)
                .map(|color| color.to_css()),
        })
        .collect();
    let links = model
        .links()
        .iter()
        .enumerate()
        .map(|(i, link)| LinkReport {
            kind: link.kind,
            source: link.source.clone(),
            target: link.target.clone(),
            label: link.label.clone(),
            label_at: session.link_label(LinkIndex(i)).map(|label| label.position),
        })
        .collect();
    let acknowledged = events
        .try_iter()
        .filter_map(|event| match event {
            Event::AcknowledgeNode { id } => Some(id),
            _ => None,
        })
        .collect();

    Report {
        nodes,
        links,
        transform: session.transform(),
        unseen_count: session.unseen_count(),
        acknowledged,
        frames,
        ticks: state.engine.ticks(),
        settled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(snapshot: PathBuf) -> Args {
        Args::parse_from(["grove", "--snapshot", snapshot.to_str().unwrap()])
    }

    #[test]
    fn test_run_lays_out_snapshot() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.json");
        fs::write(
            &path,
            r#"{"tree": {"id": "r", "label": "Root", "seen": true, "children": [
                {"id": "a", "label": "A", "heat": "hot"},
                {"id": "b", "label": "B"}
            ]}, "edges": [{"source": "a", "target": "b", "label": "see also"}]}"#,
        )?;

        let mut args = args(path);
        args.hover = vec!["a".to_string()];
        let report = run(&args)?;

        assert!(report.settled);
        assert_eq!(report.nodes.len(), 3);
        assert_eq!(report.links.len(), 3);
        assert_eq!(report.unseen_count, 1);
        assert_eq!(report.acknowledged, vec![NodeId::from("a")]);
        let cross = report
            .links
            .iter()
            .find(|link| link.kind == LinkKind::Cross)
            .unwrap();
        let (a, b) = (&report.nodes[1], &report.nodes[2]);
        let label_at = cross.label_at.unwrap();
        assert!((label_at.x - (a.x + b.x) / 2.0).abs() < 1e-3);
        assert!((label_at.y - ((a.y + b.y) / 2.0 - 4.0)).abs() < 1e-3);
        assert!(report.nodes.iter().all(|n| n.x.is_finite() && n.y.is_finite()));
        assert!(report.transform.scale <= 1.0);
        Ok(())
    }

    #[test]
    fn test_voice_authored_thought_gets_ring() -> Result<()> {
        let dir = tempdir()?;
        let doc = dir.path().join("doc.json");
        fs::write(
            &doc,
            r#"{"tree": {"id": "r", "by": "claude", "children": [
                {"id": "f", "by": "claude:feynman"},
                {"id": "c", "by": "claude:curie"}
            ]}}"#,
        )?;
        let voices = dir.path().join("voices.json");
        fs::write(
            &voices,
            r##"{"feynman": {"id": "feynman", "name": "Richard", "color": "#ff8800"}}"##,
        )?;

        let mut args = args(doc);
        args.voices = Some(voices);
        let report = run(&args)?;

        let rings: Vec<Option<&str>> = report.nodes.iter().map(|n| n.ring.as_deref()).collect();
        assert_eq!(rings, vec![None, Some("rgba(255,136,0,0.80)"), None]);
        Ok(())
    }

    #[test]
    fn test_unknown_hover_target_is_skipped() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("doc.json");
        fs::write(&path, r#"{"tree": {"id": "r", "children": [{"id": "a"}]}}"#)?;

        let mut args = args(path);
        args.hover = vec!["nope".to_string(), "a".to_string()];
        let report = run(&args)?;

        assert_eq!(report.acknowledged, vec![NodeId::from("a")]);
        assert_eq!(report.unseen_count, 1);
        Ok(())
    }

    #[test]
    fn test_missing_snapshot_reports_path() {
        let err = run(&args(PathBuf::from("/definitely/not/here.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("here.json"));
    }

    #[test]
    fn test_settings_file_overrides_defaults() -> Result<()> {
        let dir = tempdir()?;
        let doc = dir.path().join("doc.json");
        fs::write(&doc, r#"{"tree": {"id": "solo"}}"#)?;
        let settings = dir.path().join("settings.json");
        fs::write(
            &settings,
            r#"{"layout": {"repel_force": 90}, "fit": {"padding": 0, "max_scale": 2.0}}"#,
        )?;

        let mut args = args(doc);
        args.settings = Some(settings);
        args.width = 400.0;
        args.height = 400.0;
        let report = run(&args)?;

        let solo = &report.nodes[0];
        assert!((solo.x - 200.0).abs() < 1e-2 && (solo.y - 200.0).abs() < 1e-2);
        assert_eq!(report.unseen_count, 1);
        assert_eq!(report.transform.scale, 2.0);
        Ok(())
    }
}
