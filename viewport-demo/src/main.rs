use anyhow::Context;
use slippy_viewport::prelude::*;
use std::collections::VecDeque;

const FRAME_MS: f64 = 16.0;

/// Headless host: a fixed container and a virtual clock advanced by the script
struct ReplayHost {
    size: Size,
    now: f64,
    frames: VecDeque<FrameHandle>,
    next_frame: FrameHandle,
}

impl ReplayHost {
    fn new(width: f64, height: f64) -> Self {
        Self {
            size: Size::new(width, height),
            now: 0.0,
            frames: VecDeque::new(),
            next_frame: 0,
        }
    }
}

impl ViewportHost for ReplayHost {
    fn current_size(&self) -> Size {
        self.size
    }

    fn now(&self) -> f64 {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.next_frame += 1;
        self.frames.push_back(self.next_frame);
        self.next_frame
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|frame| *frame != handle);
    }
}

/// One scripted step: wait, then deliver an input
struct Step {
    wait_ms: f64,
    label: &'static str,
    input: InputEvent,
}

fn step(wait_ms: f64, label: &'static str, input: InputEvent) -> Step {
    Step {
        wait_ms,
        label,
        input,
    }
}

fn press(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerDown {
        position: Point::new(x, y),
        button: MouseButton::Left,
        target: None,
    }
}

fn release(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerUp {
        position: Point::new(x, y),
        target: None,
    }
}

fn pointer(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMove {
        position: Point::new(x, y),
    }
}

fn fingers(points: &[(f64, f64)]) -> Vec<TouchPoint> {
    points
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| TouchPoint::new(id as u64, x, y))
        .collect()
}

fn script() -> Vec<Step> {
    vec![
        step(
            0.0,
            "wheel zoom in",
            InputEvent::Wheel {
                position: Point::new(600.0, 200.0),
                delta_y: -150.0,
                modifiers: KeyModifiers::default(),
            },
        ),
        step(400.0, "press", press(400.0, 300.0)),
        step(50.0, "drag", pointer(450.0, 320.0)),
        step(50.0, "drag", pointer(560.0, 340.0)),
        step(10.0, "fling", release(560.0, 340.0)),
        step(2_000.0, "click", press(100.0, 100.0)),
        step(20.0, "click", release(100.0, 100.0)),
        step(100.0, "double click", press(100.0, 100.0)),
        step(20.0, "double click", release(100.0, 100.0)),
        step(
            1_000.0,
            "touch",
            InputEvent::TouchStart {
                touches: fingers(&[(300.0, 300.0)]),
                target: None,
            },
        ),
        step(
            10.0,
            "pinch start",
            InputEvent::TouchStart {
                touches: fingers(&[(300.0, 300.0), (500.0, 300.0)]),
                target: None,
            },
        ),
        step(
            30.0,
            "pinch",
            InputEvent::TouchMove {
                touches: fingers(&[(350.0, 300.0), (450.0, 300.0)]),
            },
        ),
        step(
            30.0,
            "pinch release",
            InputEvent::TouchEnd {
                touches: fingers(&[(350.0, 300.0)]),
                changed: fingers(&[(450.0, 300.0)]),
            },
        ),
        step(
            30.0,
            "lift",
            InputEvent::TouchEnd {
                touches: Vec::new(),
                changed: fingers(&[(350.0, 300.0)]),
            },
        ),
    ]
}

/// Delivers queued frames until the viewport stops asking for more
fn settle(viewport: &mut ViewportManager<ReplayHost>) -> usize {
    let mut frames = 0;
    while viewport.host_mut().frames.pop_front().is_some() {
        viewport.host_mut().now += FRAME_MS;
        let now = viewport.host().now;
        viewport.on_animation_frame(now);
        frames += 1;
    }
    frames
}

fn report(viewport: &ViewportManager<ReplayHost>) -> anyhow::Result<()> {
    let tiles = viewport.tile_viewport();
    log::info!(
        "state {} | tiles x {}..={} y {}..={} @ z{} ({} visible)",
        serde_json::to_string(&viewport.state())?,
        tiles.tile_min_x,
        tiles.tile_max_x,
        tiles.tile_min_y,
        tiles.tile_max_y,
        tiles.rounded_zoom,
        tiles.tiles().len()
    );
    Ok(())
}

fn load_options() -> anyhow::Result<ViewportOptions> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading options from {}", path))?;
            ViewportOptions::from_json(&json).with_context(|| format!("parsing {}", path))
        }
        None => Ok(ViewportOptions::default()
            .with_center(LatLng::new(52.5200, 13.4050))
            .with_zoom(11.0)),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let clock = SystemClock::new();
    let options = load_options()?;
    let mut viewport = ViewportManager::new(ReplayHost::new(800.0, 600.0), options)
        .context("creating viewport")?;

    viewport.on("click", |event| {
        if let MapEvent::Click { lat_lng, pixel } = event {
            log::info!(
                "clicked {:.5},{:.5} at ({}, {})",
                lat_lng.lat,
                lat_lng.lng,
                pixel.x,
                pixel.y
            );
        }
    });
    let events = viewport.subscribe();

    report(&viewport)?;
    for Step {
        wait_ms,
        label,
        input,
    } in script()
    {
        viewport.host_mut().now += wait_ms;
        let handled = viewport.handle_input(&input);
        let frames = settle(&mut viewport);
        log::info!("{} -> {:?}, {} frames", label, handled, frames);
        report(&viewport)?;
    }

    viewport.set_center_zoom(Some(LatLng::new(48.8566, 2.3522)), Some(12.0));
    settle(&mut viewport);
    log::info!("jumped to Paris");
    report(&viewport)?;

    let summary = events
        .try_iter()
        .fold(HashMap::default(), |mut counts, event| {
            *counts.entry(event.kind()).or_insert(0_usize) += 1;
            counts
        });
    let mut summary: Vec<_> = summary.into_iter().collect();
    summary.sort();
    log::info!("events: {:?}", summary);

    viewport.dispose();
    log::info!("replay finished in {:.1}ms", clock.now());
    Ok(())
}
