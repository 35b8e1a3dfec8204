use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vps_frame_select::evaluation::{EvaluatorEvent, UploadCandidate};
use vps_frame_select::geometry::rad_to_deg;
use vps_frame_select::io::FrameLog;
use vps_frame_select::session::{LocalizationSession, SelectorConfig};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(log_path) = args.next() else {
        bail!("usage: vps_frame_select <frames.csv> [config.yaml]");
    };
    let config = match args.next() {
        Some(path) => SelectorConfig::from_yaml_file(&path)?,
        None => SelectorConfig::default(),
    };

    let log = FrameLog::load(&log_path)?;
    println!(
        "Loaded {} frames spanning {:.2}s from {}",
        log.len(),
        log.duration_s(),
        log_path
    );

    let (events_tx, events_rx) = crossbeam_channel::unbounded::<EvaluatorEvent>();
    let mut session = LocalizationSession::new(config, log.scorer(), Box::new(events_tx));

    let mut uploads: Vec<UploadCandidate> = Vec::new();
    for frame in &log.frames {
        let now = frame.timestamp_s;
        let disposition = session.process_frame(frame.clone());
        debug!("[Replay] {} -> {:?}", frame.id, disposition);
        session.poll(now);

        for event in events_rx.try_iter() {
            debug!("[Replay] event {:?}", event);
        }
        for candidate in session.take_upload_candidates() {
            log_candidate(&candidate);
            uploads.push(candidate);
        }
    }

    let end = log
        .frames
        .last()
        .map(|f| f.timestamp_s)
        .context("Frame log is empty")?;
    session.finalize(end);
    for candidate in session.take_upload_candidates() {
        log_candidate(&candidate);
        uploads.push(candidate);
    }

    let stats = session.stats();
    println!(
        "Done! {} frames seen, {} admitted ({} force-accepted), {} windows, {} uploads",
        stats.frames_seen,
        stats.frames_admitted,
        stats.frames_force_accepted,
        stats.windows_finished,
        uploads.len()
    );
    for (reason, count) in &stats.rejections {
        println!("  rejected ({}): {}", reason, count);
    }

    let spread = session.spread();
    println!(
        "Orientation spread: pitch {:.1} deg, yaw {:.1} deg, roll {:.1} deg",
        rad_to_deg(spread.pitch.spread()),
        rad_to_deg(spread.yaw.spread()),
        rad_to_deg(spread.roll.spread())
    );
    if let Some(request) = session.behavior_request() {
        println!("Suggestion: {}", request.prompt());
    }

    Ok(())
}

fn log_candidate(candidate: &UploadCandidate) {
    let t = &candidate.pose.translation;
    info!(
        "[Replay] {} best {} score {:.3} at [{:.2}, {:.2}, {:.2}]",
        candidate.window, candidate.frame.id, candidate.score, t.x, t.y, t.z
    );
}
