#![deny(unsafe_code)]
//! VSE demo binary.
//!
//! Walks one packet through the whole pipeline:
//! 1. construction and both serializations
//! 2. lenient and strict validation
//! 3. migration analysis, upgrade and downgrade
//! 4. scoring simulated outputs
//! 5. monitoring the scores for drift
//! 6. cost fidelity and cross-agent drift over simulation envelopes
//!
//! Usage: `vse-demo [metrics.toml]`. Logging is controlled by `RUST_LOG`.

mod workload;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vse_bridge::{
    cost_fidelity, simulated_cost, DriftWatchdog, HistoryEntry, PacketHandler,
    SimulationEnvelope,
};
use vse_metrics::{
    network_resonance, MetricComputer, MetricMonitor, MetricSnapshot, MetricsConfig,
};
use vse_migration::{analyze_migration, migrate, migrate_to};
use vse_packet::{CTvm, Gsn, Kbm, Layer, Packet};
use vse_validator::Validator;

use workload::{HashingEmbedder, SimulatedGenerator};

const BANNER: &str = r#"
 ╔══════════════════════════════════════════════════════════╗
 ║          Vector-Space Esperanto  --  Demo                ║
 ║                                                          ║
 ║   Control packets, validation, migration and drift       ║
 ║   monitoring over simulated generator output.            ║
 ╚══════════════════════════════════════════════════════════╝
"#;

const ROUNDS: usize = 5;

// ── Formatting Helpers ──────────────────────────────────────────────────

fn section(title: &str) {
    let width: usize = 60;
    let pad = width.saturating_sub(title.len() + 4);
    let left = pad / 2;
    let right = pad - left;
    println!();
    println!(" ┌{}┐", "─".repeat(width));
    println!(" │{}  {}  {}│", " ".repeat(left), title, " ".repeat(right));
    println!(" └{}┘", "─".repeat(width));
}

fn ok(msg: &str) {
    println!("   [OK]  {}", msg);
}

fn note(msg: &str) {
    println!("   [--]  {}", msg);
}

fn alert(msg: &str) {
    println!("   [!!]  {}", msg);
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    println!("{}", BANNER);

    if let Err(e) = run_demo() {
        eprintln!();
        eprintln!("   [FATAL]  Demo failed: {:#}", e);
        std::process::exit(1);
    }

    println!();
    println!(" ════════════════════════════════════════════════════════════");
    println!("  Demo complete.");
    println!(" ════════════════════════════════════════════════════════════");
    println!();
}

fn load_config() -> Result<MetricsConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config {}", path))?;
            let config = MetricsConfig::from_toml_str(&contents)
                .with_context(|| format!("parsing config {}", path))?;
            info!(path = %path, "loaded metrics config");
            Ok(config)
        }
        None => Ok(MetricsConfig::default()),
    }
}

fn run_demo() -> Result<()> {
    let config = load_config()?;

    // ── Phase A: Packets ────────────────────────────────────────────
    section("Phase A: Packet Construction");

    let packet = Packet::builder("summarize_quarterly_report")
        .version("1.3")
        .constraints(["3_sentences", "report"])
        .divergence(0.2)
        .immune("Q3 revenue")
        .build()?;
    ok(&format!("Built {} packet  hash={}", packet.layer(), packet.content_hash()));

    let text = packet.to_text();
    note(&format!("Text : {}", text));
    let reparsed: Packet = text.parse()?;
    ok(&format!("Text round-trip equal: {}", reparsed == packet));

    let json = packet.to_json()?;
    note(&format!("JSON : {}", json));
    ok(&format!("JSON round-trip equal: {}", Packet::from_json(&json)? == packet));

    match Packet::builder("x").divergence(1.5).build() {
        Ok(_) => alert("out-of-range divergence was accepted"),
        Err(e) => ok(&format!("Rejected bad packet: {}", e)),
    }

    // ── Phase B: Validation ─────────────────────────────────────────
    section("Phase B: Validation");

    let lenient = Validator::lenient().validate(&packet);
    print_report("lenient", &lenient.to_string());

    let mut risky = packet.clone();
    risky.divergence = 0.75;
    risky.c_tvm = Some(CTvm::new("premise", "conclusion", 20_000));
    let strict = Validator::strict().validate(&risky);
    print_report("strict ", &strict.to_string());

    // ── Phase C: Migration ──────────────────────────────────────────
    section("Phase C: Migration");

    let analysis = analyze_migration(&packet);
    note(&format!(
        "Current layer {}  version {}",
        analysis.current_layer, analysis.version
    ));
    for upgrade in &analysis.suggested_upgrades {
        note(&format!("  -> {}: {}", upgrade.target, upgrade.benefits.join("; ")));
    }

    let kinetic = migrate_to(&packet, "1.4")?;
    ok(&format!("Kinetic  : {}", kinetic.to_text()));
    let gregarious = migrate(&kinetic, Layer::Gregarious);
    ok(&format!("Gregarious: {}", gregarious.to_text_compact()));
    let downgraded = migrate(&gregarious, Layer::V13);
    ok(&format!("Downgrade: {}", downgraded));
    if Validator::lenient().validate(&gregarious).is_valid() {
        ok("Migrated packet validates");
    }

    // ── Phase D + E: Scoring and Monitoring ─────────────────────────
    section("Phase D: Scoring + Monitoring");

    let kbm = gregarious.kbm.clone().unwrap_or_else(|| Kbm::new(0.0, 1.0));
    note(&format!("KBM window {:?}", kbm.bounds()));

    let computer = MetricComputer::new(config.health);
    let mut monitor = match &gregarious.mu_loop {
        Some(mu) => MetricMonitor::from_mu_loop(mu)?,
        None => MetricMonitor::new(config.monitor)?,
    };

    let mut envelopes = Vec::with_capacity(ROUNDS);
    for round in 0..ROUNDS {
        let output = SimulatedGenerator::output(round);
        let mut snapshot = computer.snapshot_with(
            &HashingEmbedder,
            output,
            &gregarious,
            SimulatedGenerator::feedback(round),
        )?;
        if let Some(Gsn { curiosity_factor: Some(bonus), .. }) = &gregarious.gsn {
            let peers = [snapshot.resonance, 0.9];
            let net = network_resonance(snapshot.resonance, &peers, *bonus, snapshot.divergence);
            snapshot = snapshot.with_network(net);
        }
        monitor.record(snapshot);
        print_snapshot(round, &snapshot, computer.is_healthy(&snapshot));

        let mut envelope = SimulationEnvelope::new(gregarious.clone());
        envelope.observe_delta(snapshot.divergence);
        envelopes.push(envelope);
    }

    if let Some(avg) = monitor.average() {
        note("Window average:");
        for line in avg.to_string().lines() {
            note(&format!("  {}", line));
        }
    }
    for field in ["scm", "divergence", "semcoh", "resonance"] {
        let trend = monitor.trend_by_name(field)?;
        note(&format!(
            "Trend {:<10} {:<8} slope={:+.4}",
            field, trend.direction, trend.slope
        ));
    }
    let alerts = monitor.evaluate();
    if alerts.is_empty() {
        ok("No monitor alerts");
    }
    for a in &alerts {
        alert(&format!("{:?} severity={:.2}  {}", a.kind, a.severity, a.description));
    }

    // ── Phase F: Simulation Bridge ──────────────────────────────────
    section("Phase F: Cost + Drift");

    let costing = CostingAgent { payload_size: 4 };
    let envelopes: Vec<SimulationEnvelope> =
        envelopes.into_iter().map(|e| costing.handle(e)).collect();
    for (i, (envelope, snapshot)) in envelopes.iter().zip(monitor.snapshots()).enumerate() {
        note(&format!(
            "Agent {}  δ={:.3}  fidelity={:.3e}  ops={}",
            i,
            envelope.observed_delta.unwrap_or_default(),
            cost_fidelity(envelope, snapshot.scm),
            envelope.history.len()
        ));
    }

    let report = DriftWatchdog::default().inspect(&envelopes);
    match report.mean_delta {
        Some(mean) => note(&format!("Mean drift {:.3}", mean)),
        None => note("No drift observed"),
    }
    if report.diverging {
        alert("Agents disagree beyond the tolerated spread");
    } else {
        ok("Agents agree within the tolerated spread");
    }

    Ok(())
}

/// Attaches simulated cost to each envelope it handles.
struct CostingAgent {
    payload_size: u64,
}

impl PacketHandler for CostingAgent {
    fn handle(&self, mut envelope: SimulationEnvelope) -> SimulationEnvelope {
        envelope.cost = simulated_cost(self.payload_size);
        envelope.record(
            HistoryEntry::new("cost").with_meta("payload_size", serde_json::json!(self.payload_size)),
        );
        envelope
    }
}

fn print_report(label: &str, report: &str) {
    let mut lines = report.lines();
    if let Some(head) = lines.next() {
        note(&format!("{}  {}", label, head));
    }
    for line in lines {
        note(&format!("         {}", line));
    }
}

fn print_snapshot(round: usize, s: &MetricSnapshot, healthy: bool) {
    let line = format!(
        "Round {}  SCM={:.2}  δ={:.2}  SemCoh={:.2}  ℜ={:.2}{}",
        round + 1,
        s.scm,
        s.divergence,
        s.semcoh,
        s.resonance,
        s.resonance_net
            .map(|n| format!("  ℜ_net={:.2}", n))
            .unwrap_or_default()
    );
    if healthy {
        ok(&line);
    } else {
        alert(&line);
    }
}
