//! Spin Cube entry point
//!
//! The interactive build runs in the browser (`trunk serve`). Natively this
//! runs a headless session: scramble, drag a face, solve the drag back and
//! report what happened.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spin Cube (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => spin_cube::Settings::load_from(path),
        None => spin_cube::Settings::default(),
    };
    let seed = std::env::var("SPIN_CUBE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    demo::run(settings, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use spin_cube::consts::MAX_FRAME_DT;
    use spin_cube::{PointerEvent, Session, Settings};

    const WIDTH: f32 = 1280.0;
    const HEIGHT: f32 = 720.0;
    const DT: f32 = 1.0 / 60.0;
    /// Give up after this many simulated seconds
    const MAX_SECONDS: f32 = 60.0;

    /// Tick until nothing is animating. Returns simulated seconds elapsed.
    fn settle(session: &mut Session) -> f32 {
        let mut elapsed = 0.0;
        while (session.is_turning() || session.is_scrambling()) && elapsed < MAX_SECONDS {
            let report = session.tick(DT);
            if report.newly_solved {
                println!("  solved at t={:.2}s", elapsed);
            }
            elapsed += DT.min(MAX_FRAME_DT);
        }
        elapsed
    }

    /// Drag from the canvas center by `(dx, dy)` pixels
    fn drag(session: &mut Session, dx: f32, dy: f32) -> bool {
        let (cx, cy) = (WIDTH / 2.0, HEIGHT / 2.0);
        session.pointer_down(PointerEvent::primary(1, cx, cy));
        session.pointer_move(PointerEvent::primary(1, cx + dx, cy + dy));
        session.pointer_up(PointerEvent::primary(1, cx + dx, cy + dy));
        session.is_turning()
    }

    pub fn run(settings: Settings, seed: u64) {
        let mut session = Session::new(settings, seed);
        session.resize(WIDTH, HEIGHT);

        println!("\nScrambling (seed {:#x})...", seed);
        session.scramble_default();
        let t = settle(&mut session);
        println!("  scrambled in {:.2}s, solved: {}", t, session.is_solved());

        println!("\nReset...");
        session.reset();
        println!("  solved: {}", session.is_solved());

        println!("\nDragging right across the front face...");
        if drag(&mut session, 80.0, 0.0) {
            settle(&mut session);
            println!("  turned, solved: {}", session.is_solved());

            println!("Dragging back...");
            if drag(&mut session, -80.0, 0.0) {
                settle(&mut session);
            }
            println!("  solved: {}", session.is_solved());
        } else {
            println!("  drag did not resolve into a turn");
        }

        println!("\nZooming out...");
        for _ in 0..30 {
            session.wheel(100.0);
            session.tick(DT);
        }
        println!("  radius {:.2}", session.camera().radius());

        match session.settings().to_json() {
            Ok(json) => println!("\nSettings:\n{}", json),
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}
