use criterion::{black_box, criterion_group, criterion_main, Criterion};
use delve_core::{InputFrame, Intents, Phase, Session, SessionConfig, WorldDescriptor};

const ARENA: &str = r#"{
    "player_spawn": { "x": 10, "y": 10 },
    "walls": [
        { "x": 0, "y": 0, "w": 21, "h": 1 },
        { "x": 0, "y": 20, "w": 21, "h": 1 },
        { "x": 0, "y": 1, "w": 1, "h": 19 },
        { "x": 20, "y": 1, "w": 1, "h": 19 }
    ],
    "pots": [
        { "x": 3, "y": 3 }, { "x": 6, "y": 3 }, { "x": 9, "y": 3 },
        { "x": 12, "y": 3 }, { "x": 15, "y": 3 }, { "x": 3, "y": 16 },
        { "x": 6, "y": 16 }, { "x": 9, "y": 16 }, { "x": 12, "y": 16 }
    ],
    "enemies": [
        { "x": 2, "y": 8 }, { "x": 18, "y": 8 }, { "x": 2, "y": 12 },
        { "x": 18, "y": 12 }, { "x": 8, "y": 18 }, { "x": 12, "y": 18 }
    ]
}"#;

fn session(config: SessionConfig) -> Session {
    let level = WorldDescriptor::from_json(ARENA).expect("bench level parses");
    let mut session = Session::new(1, config, level).expect("bench session builds");
    session.step(&InputFrame::idle());
    session
}

/// Walks in a square and keeps swinging; respawns after a death.
fn bot(session: &Session) -> InputFrame {
    if session.phase() == Phase::GameOver {
        return InputFrame::new(Intents::RESPAWN);
    }
    let walk = match (session.tick() / 30) % 4 {
        0 => Intents::RIGHT,
        1 => Intents::DOWN,
        2 => Intents::LEFT,
        _ => Intents::UP,
    };
    InputFrame::new(walk | Intents::ATTACK)
}

fn bench_step_busy(c: &mut Criterion) {
    let mut session = session(SessionConfig::default());

    c.bench_function("step_busy", |b| {
        b.iter(|| {
            let input = bot(&session);
            session.step(black_box(&input));
        })
    });
}

fn bench_step_idle(c: &mut Criterion) {
    // Hostiles out of reach: measures the fixed cost of a tick
    let mut config = SessionConfig::default();
    config.hostile.aggro_radius = 0.0;
    let mut session = session(config);
    let input = InputFrame::idle();

    c.bench_function("step_idle", |b| {
        b.iter(|| {
            session.step(black_box(&input));
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let session = session(SessionConfig::default());

    c.bench_function("snapshot", |b| b.iter(|| black_box(session.snapshot())));
}

criterion_group!(benches, bench_step_busy, bench_step_idle, bench_snapshot);
criterion_main!(benches);
