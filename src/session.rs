//! Interactive session
//!
//! Owns the puzzle, camera and input state and routes pointer events between
//! them. Everything runs on one thread: state changes either inside a pointer
//! handler or inside `tick`.

use glam::Vec2;

use crate::consts::*;
use crate::input::{
    BoxHitTester, CameraBasis, DragStep, HitTest, OrbitCamera, PuzzleDrag, TurnRequest,
};
use crate::renderer::{CameraPose, CubeletInstance};
use crate::settings::{DragMode, Settings};
use crate::sim::{Puzzle, Scramble};

/// Pointer button that started a gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

/// Pointer event in canvas pixels (origin top-left, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: i32,
    pub pos: Vec2,
    pub button: PointerButton,
    /// Shift held
    pub shift: bool,
}

impl PointerEvent {
    pub fn primary(pointer_id: i32, x: f32, y: f32) -> Self {
        Self {
            pointer_id,
            pos: Vec2::new(x, y),
            button: PointerButton::Primary,
            shift: false,
        }
    }

    /// Whether this pointer-down must orbit the camera regardless of what is
    /// under the cursor
    pub fn forces_orbit(&self) -> bool {
        self.shift || self.button == PointerButton::Secondary
    }
}

/// The single active gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    /// Orbiting the camera
    Orbit { pointer_id: i32 },
    /// Dragging a cubelet face
    Twist(PuzzleDrag),
}

impl DragState {
    pub fn pointer_id(&self) -> i32 {
        match self {
            DragState::Orbit { pointer_id } => *pointer_id,
            DragState::Twist(drag) => drag.pointer_id,
        }
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Puzzle is at rest and solved
    pub solved: bool,
    /// Puzzle became solved this frame (fires once per solve)
    pub newly_solved: bool,
    /// A turn finished this frame
    pub turn_committed: bool,
}

pub struct Session {
    puzzle: Puzzle,
    camera: OrbitCamera,
    hit_tester: Box<dyn HitTest>,
    settings: Settings,
    drag: Option<DragState>,
    scramble: Option<Scramble>,
    /// Canvas size (pixels)
    viewport: Vec2,
    seed: u64,
    scrambles_started: u64,
    was_solved: bool,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self::with_hit_tester(settings, seed, Box::new(BoxHitTester::default()))
    }

    pub fn with_hit_tester(settings: Settings, seed: u64, hit_tester: Box<dyn HitTest>) -> Self {
        let mut camera = OrbitCamera::default();
        camera.set_sensitivity(settings.effective_camera_sensitivity());
        camera.zoom_speed = settings.zoom_speed;

        log::info!("Session started (seed {})", seed);
        Self {
            puzzle: Puzzle::with_turn_speed(settings.effective_turn_speed()),
            camera,
            hit_tester,
            settings,
            drag: None,
            scramble: None,
            viewport: Vec2::new(1.0, 1.0),
            seed,
            scrambles_started: 0,
            was_solved: true,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn drag_state(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn is_turning(&self) -> bool {
        self.puzzle.is_turning()
    }

    pub fn is_scrambling(&self) -> bool {
        self.scramble.is_some()
    }

    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    /// Set the canvas size in pixels
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    pub fn aspect(&self) -> f32 {
        self.viewport.x / self.viewport.y
    }

    /// Canvas pixels -> normalized device coordinates (y up)
    pub fn ndc(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x / self.viewport.x * 2.0 - 1.0,
            -(pos.y / self.viewport.y * 2.0 - 1.0),
        )
    }

    // === Pointer input ===

    /// Start a gesture. Returns `true` if a drag session began.
    pub fn pointer_down(&mut self, ev: PointerEvent) -> bool {
        // Nothing starts while a layer is moving
        if self.puzzle.is_turning() {
            return false;
        }
        match self.drag {
            // An orbit whose release never arrived gives way to the new pointer
            Some(DragState::Orbit { pointer_id }) if pointer_id != ev.pointer_id => {
                log::trace!("Dropping stale orbit of pointer {}", pointer_id);
                self.camera.end_drag();
                self.drag = None;
            }
            Some(_) => return false,
            None => {}
        }

        let ndc = self.ndc(ev.pos);
        if ev.forces_orbit() {
            self.begin_orbit(ev.pointer_id, ndc);
            return true;
        }

        let ray = self.camera.ray_through(ndc, self.aspect());
        match self.hit_tester.hit_test(&self.puzzle, &ray) {
            None => self.begin_orbit(ev.pointer_id, ndc),
            Some(hit) => {
                log::trace!("Grabbed cubelet {} on {:?}", hit.cubelet, hit.face);
                self.drag = Some(DragState::Twist(PuzzleDrag::new(
                    ev.pointer_id,
                    ev.pos,
                    hit.cubelet,
                    hit.normal,
                )));
            }
        }
        true
    }

    fn begin_orbit(&mut self, pointer_id: i32, ndc: Vec2) {
        self.camera.begin_drag(ndc);
        self.drag = Some(DragState::Orbit { pointer_id });
    }

    /// Continue the active gesture. Events from other pointers are ignored.
    pub fn pointer_move(&mut self, ev: PointerEvent) {
        let ndc = self.ndc(ev.pos);
        let step = match &mut self.drag {
            Some(state) if state.pointer_id() != ev.pointer_id => return,
            Some(DragState::Orbit { .. }) => {
                self.camera.drag_to(ndc);
                return;
            }
            // No new turns while a layer is moving
            Some(DragState::Twist(_)) if self.puzzle.is_turning() => return,
            Some(DragState::Twist(drag)) => {
                let basis: CameraBasis = self.camera.basis();
                drag.update(
                    ev.pos,
                    self.settings.drag_threshold,
                    self.settings.drag_mode,
                    &basis,
                    &self.puzzle,
                )
            }
            None => return,
        };

        if let DragStep::Turn(request) = step {
            self.submit_turn(request);
            // One turn per drag
            self.drag = None;
        }
    }

    fn submit_turn(&mut self, request: TurnRequest) -> bool {
        self.puzzle.begin_turn(request.axis, request.layer, request.direction)
    }

    /// End the active gesture.
    ///
    /// An orbit only ends for its own pointer; a puzzle drag is cleared by
    /// any release.
    pub fn pointer_up(&mut self, ev: PointerEvent) {
        self.release(ev.pointer_id);
    }

    pub fn pointer_cancel(&mut self, ev: PointerEvent) {
        self.release(ev.pointer_id);
    }

    fn release(&mut self, pointer_id: i32) {
        match self.drag {
            Some(DragState::Orbit { pointer_id: id }) if id != pointer_id => {}
            Some(DragState::Orbit { .. }) => {
                self.camera.end_drag();
                self.drag = None;
            }
            Some(DragState::Twist(_)) => self.drag = None,
            None => {}
        }
    }

    /// Wheel zoom
    pub fn wheel(&mut self, delta_y: f32) {
        self.camera.scroll(delta_y);
    }

    // === Frame ===

    /// Advance animations by `dt` seconds (clamped to `MAX_FRAME_DT`)
    pub fn tick(&mut self, dt: f32) -> FrameReport {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        if let Some(scramble) = &mut self.scramble
            && !scramble.tick(&mut self.puzzle, dt)
        {
            self.scramble = None;
        }
        let turn_committed = self.puzzle.tick(dt);
        self.camera.tick(dt);

        let solved = self.puzzle.is_solved();
        let newly_solved = solved && !self.was_solved && self.scramble.is_none();
        if newly_solved {
            log::info!("Puzzle solved!");
        }
        self.was_solved = solved;

        FrameReport {
            solved,
            newly_solved,
            turn_committed,
        }
    }

    // === Controls ===

    /// Rebuild the solved puzzle. Rejected while a turn is animating.
    pub fn reset(&mut self) -> bool {
        if !self.puzzle.reset() {
            log::debug!("Reset rejected: turn in progress");
            return false;
        }
        if let Some(mut scramble) = self.scramble.take() {
            scramble.cancel();
        }
        self.drag = None;
        self.camera.end_drag();
        self.was_solved = true;
        log::info!("Puzzle reset");
        true
    }

    /// Start a scramble of `count` random turns. Rejected while a turn is
    /// animating or another scramble is running.
    pub fn scramble(&mut self, count: u32) -> bool {
        if self.puzzle.is_turning() || self.scramble.is_some() {
            return false;
        }
        let seed = self.seed.wrapping_add(self.scrambles_started);
        self.scrambles_started += 1;
        self.scramble = Some(Scramble::new(count, seed));
        true
    }

    /// Scramble with the configured length
    pub fn scramble_default(&mut self) -> bool {
        self.scramble(self.settings.scramble_length)
    }

    pub fn cancel_scramble(&mut self) {
        if let Some(mut scramble) = self.scramble.take() {
            scramble.cancel();
        }
    }

    pub fn set_drag_mode(&mut self, mode: DragMode) {
        self.settings.drag_mode = mode;
    }

    /// Clamped to [0.05, 5]; non-finite values are ignored
    pub fn set_camera_sensitivity(&mut self, value: f32) {
        self.camera.set_sensitivity(value);
        self.settings.camera_sensitivity = self.camera.sensitivity();
    }

    // === Rendering surface ===

    /// World pose and stickers of every cubelet as currently displayed
    pub fn instances(&self) -> Vec<CubeletInstance> {
        self.puzzle
            .lattice()
            .cubelets()
            .iter()
            .filter_map(|c| {
                let (pos, rot) = self.puzzle.world_pose(c.id)?;
                Some(CubeletInstance::new(pos, rot, c.stickers()))
            })
            .collect()
    }

    pub fn camera_pose(&self) -> CameraPose {
        CameraPose {
            eye: self.camera.eye(),
            target: self.camera.target,
            up: self.camera.up(),
            fov_y: self.camera.fov_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Axis, Sign};
    use glam::Vec3;

    const W: f32 = 800.0;
    const H: f32 = 600.0;
    const DT: f32 = 1.0 / 60.0;

    fn session() -> Session {
        let mut s = Session::new(Settings::default(), 1234);
        s.resize(W, H);
        s
    }

    fn settle(s: &mut Session) {
        for _ in 0..1000 {
            s.tick(DT);
            if !s.is_turning() && !s.is_scrambling() {
                return;
            }
        }
        panic!("session never settled");
    }

    #[test]
    fn test_center_click_grabs_puzzle() {
        let mut s = session();
        assert!(s.pointer_down(PointerEvent::primary(1, W / 2.0, H / 2.0)));
        assert!(matches!(s.drag_state(), Some(DragState::Twist(_))));
    }

    #[test]
    fn test_corner_click_orbits() {
        let mut s = session();
        let before = s.camera().orientation();
        assert!(s.pointer_down(PointerEvent::primary(1, 5.0, 5.0)));
        assert!(matches!(s.drag_state(), Some(DragState::Orbit { .. })));

        s.pointer_move(PointerEvent::primary(1, 120.0, 40.0));
        assert_ne!(s.camera().orientation(), before);

        s.pointer_up(PointerEvent::primary(1, 120.0, 40.0));
        assert!(s.drag_state().is_none());
        assert!(!s.camera().is_dragging());
    }

    #[test]
    fn test_shift_forces_orbit_over_puzzle() {
        let mut s = session();
        let ev = PointerEvent {
            shift: true,
            ..PointerEvent::primary(1, W / 2.0, H / 2.0)
        };
        s.pointer_down(ev);
        assert!(matches!(s.drag_state(), Some(DragState::Orbit { .. })));
    }

    #[test]
    fn test_drag_on_puzzle_turns_once() {
        let mut s = session();
        s.pointer_down(PointerEvent::primary(1, W / 2.0, H / 2.0));
        s.pointer_move(PointerEvent::primary(1, W / 2.0 + 60.0, H / 2.0));
        assert!(s.is_turning());
        assert!(s.drag_state().is_none());

        // Further movement does nothing until a new pointer-down
        let axis = s.puzzle().active_turn().map(|t| t.axis);
        s.pointer_move(PointerEvent::primary(1, W / 2.0 + 200.0, H / 2.0 + 90.0));
        assert_eq!(s.puzzle().active_turn().map(|t| t.axis), axis);

        settle(&mut s);
        assert!(!s.is_solved());
    }

    #[test]
    fn test_tap_without_motion_does_not_turn() {
        let mut s = session();
        s.pointer_down(PointerEvent::primary(1, W / 2.0, H / 2.0));
        s.pointer_move(PointerEvent::primary(1, W / 2.0 + 3.0, H / 2.0 + 2.0));
        s.pointer_up(PointerEvent::primary(1, W / 2.0 + 3.0, H / 2.0 + 2.0));
        assert!(!s.is_turning());
        assert!(s.drag_state().is_none());
    }

    #[test]
    fn test_other_pointer_is_ignored() {
        let mut s = session();
        s.pointer_down(PointerEvent::primary(1, W / 2.0, H / 2.0));
        // Second finger neither starts a gesture nor moves the first
        assert!(!s.pointer_down(PointerEvent::primary(2, 10.0, 10.0)));
        s.pointer_move(PointerEvent::primary(2, W / 2.0 + 80.0, H / 2.0));
        assert!(!s.is_turning());
        assert!(s.drag_state().is_some());

        // Any release drops a puzzle drag
        s.pointer_cancel(PointerEvent::primary(2, 0.0, 0.0));
        assert!(s.drag_state().is_none());
    }

    #[test]
    fn test_orbit_ends_only_for_its_pointer() {
        let mut s = session();
        s.pointer_down(PointerEvent::primary(1, 5.0, 5.0));
        s.pointer_up(PointerEvent::primary(2, 5.0, 5.0));
        assert!(matches!(s.drag_state(), Some(DragState::Orbit { pointer_id: 1 })));
        assert!(s.camera().is_dragging());

        s.pointer_up(PointerEvent::primary(1, 5.0, 5.0));
        assert!(s.drag_state().is_none());
        assert!(!s.camera().is_dragging());
    }

    #[test]
    fn test_new_pointer_replaces_unreleased_orbit() {
        let mut s = session();
        assert!(s.pointer_down(PointerEvent::primary(1, 5.0, 5.0)));
        // Release from some other pointer; pointer 1 never lifts
        s.pointer_up(PointerEvent::primary(2, 5.0, 5.0));
        assert!(matches!(s.drag_state(), Some(DragState::Orbit { pointer_id: 1 })));

        assert!(s.pointer_down(PointerEvent::primary(3, W / 2.0, H / 2.0)));
        assert!(matches!(s.drag_state(), Some(DragState::Twist(d)) if d.pointer_id == 3));
        assert!(!s.camera().is_dragging());

        s.pointer_move(PointerEvent::primary(3, W / 2.0 + 60.0, H / 2.0));
        assert!(s.is_turning());
    }

    #[test]
    fn test_release_without_drag_is_ignored() {
        let mut s = session();
        s.pointer_up(PointerEvent::primary(7, 0.0, 0.0));
        assert!(s.drag_state().is_none());
    }

    #[test]
    fn test_pointer_down_ignored_while_turning() {
        let mut s = session();
        s.puzzle.begin_turn(Axis::X, 1, Sign::Pos);
        assert!(!s.pointer_down(PointerEvent::primary(1, W / 2.0, H / 2.0)));
        assert!(!s.pointer_down(PointerEvent::primary(1, 5.0, 5.0)));
        assert!(s.drag_state().is_none());

        settle(&mut s);
        assert!(s.pointer_down(PointerEvent::primary(1, 5.0, 5.0)));
    }

    #[test]
    fn test_newly_solved_fires_once() {
        let mut s = session();
        assert!(!s.tick(DT).newly_solved);

        s.puzzle.begin_turn(Axis::X, 1, Sign::Pos);
        settle(&mut s);
        assert!(!s.is_solved());

        s.puzzle.begin_turn(Axis::X, 1, Sign::Neg);
        let mut fired = 0;
        for _ in 0..100 {
            if s.tick(DT).newly_solved {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
        assert!(s.is_solved());
    }

    #[test]
    fn test_scramble_and_reset() {
        let mut s = session();
        assert!(s.scramble(5));
        assert!(!s.scramble(5));
        settle(&mut s);
        assert!(!s.is_scrambling());

        assert!(s.reset());
        assert!(s.is_solved());
        assert!(!s.tick(DT).newly_solved);
    }

    #[test]
    fn test_reset_rejected_while_turning() {
        let mut s = session();
        s.scramble(3);
        s.tick(DT);
        assert!(s.is_turning());
        assert!(!s.reset());
        assert!(!s.scramble(3));
    }

    #[test]
    fn test_reset_cancels_scramble() {
        let mut s = session();
        s.scramble(50);
        s.tick(DT);
        while s.is_turning() {
            s.tick(DT);
        }
        assert!(s.is_scrambling());
        assert!(s.reset());
        assert!(!s.is_scrambling());
        for _ in 0..60 {
            s.tick(DT);
        }
        assert!(s.is_solved());
    }

    #[test]
    fn test_controls_update_settings() {
        let mut s = session();
        s.set_drag_mode(DragMode::Vertical);
        assert_eq!(s.settings().drag_mode, DragMode::Vertical);
        s.set_camera_sensitivity(9.0);
        assert_eq!(s.camera().sensitivity(), MAX_SENSITIVITY);
        assert_eq!(s.settings().camera_sensitivity, MAX_SENSITIVITY);
        s.set_camera_sensitivity(f32::INFINITY);
        assert_eq!(s.camera().sensitivity(), MAX_SENSITIVITY);
    }

    #[test]
    fn test_wheel_zoom_stays_in_range() {
        let mut s = session();
        for _ in 0..200 {
            s.wheel(5000.0);
            s.tick(DT);
        }
        assert_eq!(s.camera().radius(), MAX_RADIUS);
    }

    #[test]
    fn test_instances_follow_turn() {
        let mut s = session();
        let rest = s.instances();
        assert_eq!(rest.len(), 27);

        s.puzzle.begin_turn(Axis::Y, 1, Sign::Pos);
        s.tick(DT);
        let moving = s.instances();
        let moved = rest
            .iter()
            .zip(&moving)
            .filter(|(a, b)| {
                (Vec3::from(a.translation) - Vec3::from(b.translation)).length() > 1e-4
            })
            .count();
        // The top layer minus its center cubelet on the axis
        assert_eq!(moved, 8);
    }

    #[test]
    fn test_camera_pose_looks_at_target() {
        let s = session();
        let pose = s.camera_pose();
        assert_eq!(pose.target, Vec3::ZERO);
        assert!((pose.eye.length() - s.camera().radius()).abs() < 1e-4);
    }

    #[test]
    fn test_ndc_mapping() {
        let s = session();
        assert_eq!(s.ndc(Vec2::new(W / 2.0, H / 2.0)), Vec2::ZERO);
        assert_eq!(s.ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(s.ndc(Vec2::new(W, H)), Vec2::new(1.0, -1.0));
    }
}
