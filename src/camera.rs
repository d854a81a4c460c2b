//! Map-bounded 2D camera.
//!
//! The viewport lives in map space (Y-up): `position.y` is the top edge and
//! the center sits half a viewport below it. The camera's center is kept
//! inside a bounding box derived from the map's extent; on an axis where the
//! whole map fits in the viewport the camera may instead be pinned to the
//! map's center.
//!
//! Pan operations are step functions. Call them once per frame and redraw
//! in between until they report `true`.

use crate::config::{CameraConfig, BASE_ZOOM};
use crate::geom::IRect;
use crate::map::{MapExtent, TileMap};
use macroquad::math::{ivec2, vec3, IVec2, Mat4, Rect};

/// Fraction of the current zoom changed per pan-with-zoom step.
const PAN_ZOOM_STEP: f32 = 0.05;
/// Zoom-in continues in steps while the original zoom is more than this
/// fraction above the current one; the rest is a direct snap.
const PAN_ZOOM_SNAP: f32 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

/// Camera commands an input layer can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Up,
    Down,
    Left,
    Right,
    ZoomIn,
    ZoomOut,
}

/// Where a pan-with-zoom is in its zoom out / pan / zoom in sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    ZoomingOut,
    Panning,
    ZoomingIn,
    Done,
}

/// Arguments and progress of one pan.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPan {
    /// Target viewport top-left, or center with `center_destination`.
    pub destination: IVec2,
    /// Maximum distance per step on each axis.
    pub speed: i32,
    pub center_destination: bool,
    last_position: Option<IVec2>,
    original_zoom: Option<u8>,
    phase: PanPhase,
}

impl CameraPan {
    pub fn new(destination: IVec2, speed: i32) -> Self {
        Self {
            destination,
            speed: speed.max(0),
            center_destination: false,
            last_position: None,
            original_zoom: None,
            phase: PanPhase::ZoomingOut,
        }
    }

    /// Treat `destination` as the desired viewport center.
    pub fn centered(mut self) -> Self {
        self.center_destination = true;
        self
    }

    pub fn phase(&self) -> PanPhase {
        self.phase
    }

    /// Zoom recorded when a pan-with-zoom started.
    pub fn original_zoom(&self) -> Option<u8> {
        self.original_zoom
    }

    /// Viewport top-left before the most recent step.
    pub fn last_position(&self) -> Option<IVec2> {
        self.last_position
    }
}

#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    position: IRect,
    center: IVec2,
    bounding_box: IRect,
    extent: MapExtent,
    zoom: u8,
    stretch: f32,
    rotation: f32,
    movement_allowed_horizontal: bool,
    movement_allowed_vertical: bool,
}

impl Camera {
    /// Creates a camera over `map`. `start` is the viewport's top-left, or
    /// its center when `center_start` is set.
    pub fn new(
        config: CameraConfig,
        start: IVec2,
        center_start: bool,
        allow_centering: bool,
        map: &TileMap,
    ) -> Self {
        let config = config.sanitized();
        let (w, h) = (config.screen_width, config.screen_height);
        let start = if center_start {
            ivec2(start.x - w / 2, start.y + h / 2)
        } else {
            start
        };
        let target_zoom = config.zoom;

        let mut cam = Camera {
            zoom: BASE_ZOOM.clamp(config.min_zoom, config.max_zoom),
            config,
            position: IRect::new(start.x, start.y, w, h),
            center: IVec2::ZERO,
            bounding_box: IRect::default(),
            extent: map.extent(None),
            stretch: 1.0,
            rotation: 0.0,
            movement_allowed_horizontal: true,
            movement_allowed_vertical: true,
        };
        cam.reposition();
        cam.apply_stretch(allow_centering);
        cam.set_zoom(target_zoom, allow_centering);
        cam
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Viewport rectangle, top-left anchored, Y-up.
    pub fn position(&self) -> IRect {
        self.position
    }

    pub fn top_left(&self) -> IVec2 {
        self.position.top_left()
    }

    pub fn center(&self) -> IVec2 {
        self.center
    }

    pub fn bounding_box(&self) -> IRect {
        self.bounding_box
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn min_zoom(&self) -> u8 {
        self.config.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.config.max_zoom
    }

    pub fn stretch(&self) -> f32 {
        self.stretch
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn movement_allowed_horizontal(&self) -> bool {
        self.movement_allowed_horizontal
    }

    pub fn movement_allowed_vertical(&self) -> bool {
        self.movement_allowed_vertical
    }

    /// Recomputes the center from the viewport.
    pub fn reposition(&mut self) {
        self.center = self.position.center();
    }

    /// Top-left that would put `point` in the middle of the viewport.
    pub fn center_point(&self, point: IVec2) -> IVec2 {
        ivec2(
            point.x - self.position.w / 2,
            point.y + self.position.h / 2,
        )
    }

    /// Switches to a new map's extent (scene transition).
    pub fn set_map(&mut self, map: &TileMap, allow_centering: bool) {
        self.extent = map.extent(None);
        self.set_bounding_box(allow_centering);
    }

    /// Rebuilds the bounding box from the map extent. With
    /// `allow_centering`, an axis on which the map fits inside the viewport
    /// is locked and centered on the map.
    pub fn set_bounding_box(&mut self, allow_centering: bool) {
        let map_bounding = self.extent.bounding(self.config.base_stretch);
        let map_center = map_bounding.center();

        let lock_h = allow_centering && map_bounding.w <= self.position.w;
        if lock_h {
            self.position.x = map_center.x - self.position.w / 2;
        }
        let lock_v = allow_centering && map_bounding.h <= self.position.h;
        if lock_v {
            self.position.y = map_center.y + self.position.h / 2;
        }

        if lock_h == self.movement_allowed_horizontal || lock_v == self.movement_allowed_vertical {
            log::debug!(
                "camera movement locks changed: horizontal={} vertical={} (zoom {})",
                lock_h,
                lock_v,
                self.zoom
            );
        }
        self.movement_allowed_horizontal = !lock_h;
        self.movement_allowed_vertical = !lock_v;
        self.bounding_box = map_bounding;
        self.reposition();
    }

    /// Inclusive test against the bounding box.
    pub fn point_in_bounding_box(&self, point: IVec2) -> bool {
        self.bounding_box.contains_point(point)
    }

    /// Resizes the viewport for the current zoom, keeping the center.
    fn apply_stretch(&mut self, allow_centering: bool) {
        self.stretch = self.zoom as f32 / BASE_ZOOM as f32;
        self.position.w = (self.config.screen_width as f32 / self.stretch).ceil() as i32;
        self.position.h = (self.config.screen_height as f32 / self.stretch).ceil() as i32;
        self.position.x = self.center.x - self.position.w / 2;
        self.position.y = self.center.y + self.position.h / 2;
        self.set_bounding_box(allow_centering);
    }

    /// One zoom unit in. At `max_zoom` only the bounding box is rebuilt.
    pub fn zoom_in(&mut self, allow_centering: bool) {
        if self.zoom < self.config.max_zoom {
            self.zoom += 1;
            self.apply_stretch(allow_centering);
        } else {
            self.set_bounding_box(allow_centering);
        }
    }

    pub fn zoom_out(&mut self, allow_centering: bool) {
        if self.zoom > self.config.min_zoom {
            self.zoom -= 1;
            self.apply_stretch(allow_centering);
        } else {
            self.set_bounding_box(allow_centering);
        }
    }

    /// Back to one tile per 64 pixels.
    pub fn zoom_default(&mut self, allow_centering: bool) {
        self.zoom = BASE_ZOOM.clamp(self.config.min_zoom, self.config.max_zoom);
        self.apply_stretch(allow_centering);
    }

    /// Walks the zoom one unit at a time to `target` (clamped), so every
    /// intermediate level recomputes the viewport and bounding box.
    pub fn set_zoom(&mut self, target: u8, allow_centering: bool) {
        let target = target.clamp(self.config.min_zoom, self.config.max_zoom);
        while self.zoom != target {
            if self.zoom > target {
                self.zoom_out(allow_centering);
            } else {
                self.zoom_in(allow_centering);
            }
        }
    }

    pub fn smooth_zoom_in(&mut self, percent: f32, allow_centering: bool) {
        let target = self.smooth_target(percent);
        self.set_zoom(target, allow_centering);
    }

    pub fn smooth_zoom_out(&mut self, percent: f32, allow_centering: bool) {
        let target = self.smooth_target(-percent);
        self.set_zoom(target, allow_centering);
    }

    /// `zoom + percent * zoom`, moving at least one unit.
    fn smooth_target(&self, percent: f32) -> u8 {
        let z = self.zoom as f32;
        let target = (z + percent * z).clamp(0.0, u8::MAX as f32) as u8;
        if target != self.zoom {
            target
        } else if percent > 0.0 {
            self.zoom.saturating_add(1)
        } else if percent < 0.0 {
            self.zoom.saturating_sub(1)
        } else {
            self.zoom
        }
    }

    pub fn do_action(&mut self, action: CameraAction) {
        let step = self.config.move_step;
        match action {
            CameraAction::Up => self.move_vertical(Vertical::Up, step),
            CameraAction::Down => self.move_vertical(Vertical::Down, step),
            CameraAction::Left => self.move_horizontal(Horizontal::Left, step),
            CameraAction::Right => self.move_horizontal(Horizontal::Right, step),
            CameraAction::ZoomIn => self.zoom_in(true),
            CameraAction::ZoomOut => self.zoom_out(true),
        }
    }

    /// Moves by `amount`, or onto the bounding edge if the center would
    /// leave the box. No-op while horizontal movement is locked.
    pub fn move_horizontal(&mut self, direction: Horizontal, amount: i32) {
        if self.movement_allowed_horizontal {
            self.clamped_move_horizontal(direction, amount);
        }
    }

    pub fn move_vertical(&mut self, direction: Vertical, amount: i32) {
        if self.movement_allowed_vertical {
            self.clamped_move_vertical(direction, amount);
        }
    }

    /// Puts the viewport's left edge (or center) at `x`, clamped like a move.
    pub fn set_horizontal(&mut self, x: i32, center_destination: bool) {
        if self.movement_allowed_horizontal {
            self.clamped_set_horizontal(x, center_destination);
        }
    }

    /// Puts the viewport's top edge (or center) at `y`, clamped like a move.
    pub fn set_vertical(&mut self, y: i32, center_destination: bool) {
        if self.movement_allowed_vertical {
            self.clamped_set_vertical(y, center_destination);
        }
    }

    pub fn set_coordinate(&mut self, coordinate: IVec2, center_destination: bool) {
        self.set_horizontal(coordinate.x, center_destination);
        self.set_vertical(coordinate.y, center_destination);
    }

    /// [`Camera::move_horizontal`] that also works on a locked axis. The
    /// bounding box still clamps.
    pub fn force_move_horizontal(&mut self, direction: Horizontal, amount: i32) {
        self.clamped_move_horizontal(direction, amount);
    }

    pub fn force_move_vertical(&mut self, direction: Vertical, amount: i32) {
        self.clamped_move_vertical(direction, amount);
    }

    pub fn force_set_horizontal(&mut self, x: i32, center_destination: bool) {
        self.clamped_set_horizontal(x, center_destination);
    }

    pub fn force_set_vertical(&mut self, y: i32, center_destination: bool) {
        self.clamped_set_vertical(y, center_destination);
    }

    pub fn force_set_coordinate(&mut self, coordinate: IVec2, center_destination: bool) {
        self.force_set_horizontal(coordinate.x, center_destination);
        self.force_set_vertical(coordinate.y, center_destination);
    }

    fn clamped_move_horizontal(&mut self, direction: Horizontal, amount: i32) {
        let half = self.position.w / 2;
        match direction {
            Horizontal::Right => {
                if self.point_in_bounding_box(ivec2(self.center.x + amount, self.center.y)) {
                    self.position.x += amount;
                } else {
                    self.position.x = self.bounding_box.right() - half;
                }
            }
            Horizontal::Left => {
                if self.point_in_bounding_box(ivec2(self.center.x - amount, self.center.y)) {
                    self.position.x -= amount;
                } else {
                    self.position.x = self.bounding_box.left() - half;
                }
            }
        }
        self.reposition();
    }

    fn clamped_move_vertical(&mut self, direction: Vertical, amount: i32) {
        let half = self.position.h / 2;
        match direction {
            Vertical::Up => {
                if self.point_in_bounding_box(ivec2(self.center.x, self.center.y + amount)) {
                    self.position.y += amount;
                } else {
                    self.position.y = self.bounding_box.top() + half;
                }
            }
            Vertical::Down => {
                if self.point_in_bounding_box(ivec2(self.center.x, self.center.y - amount)) {
                    self.position.y -= amount;
                } else {
                    self.position.y = self.bounding_box.bottom() + half;
                }
            }
        }
        self.reposition();
    }

    fn clamped_set_horizontal(&mut self, x: i32, center_destination: bool) {
        let half = self.position.w / 2;
        let x = if center_destination { x - half } else { x };
        let center_x = x + half;
        if self.point_in_bounding_box(ivec2(center_x, self.center.y)) {
            self.position.x = x;
        } else if center_x <= self.bounding_box.left() {
            self.position.x = self.bounding_box.left() - half;
        } else {
            self.position.x = self.bounding_box.right() - half;
        }
        self.reposition();
    }

    fn clamped_set_vertical(&mut self, y: i32, center_destination: bool) {
        let half = self.position.h / 2;
        let y = if center_destination { y + half } else { y };
        let center_y = y - half;
        if self.point_in_bounding_box(ivec2(self.center.x, center_y)) {
            self.position.y = y;
        } else if center_y >= self.bounding_box.top() {
            self.position.y = self.bounding_box.top() + half;
        } else {
            self.position.y = self.bounding_box.bottom() + half;
        }
        self.reposition();
    }

    /// Raw translation, no locks and no bounding box. Only scripted pans
    /// use it.
    fn translate(&mut self, by: IVec2) {
        self.position.x += by.x;
        self.position.y += by.y;
        self.reposition();
    }

    /// Top-left the pan is heading for at the current viewport size.
    fn pan_target(&self, pan: &CameraPan) -> IVec2 {
        if pan.center_destination {
            self.center_point(pan.destination)
        } else {
            pan.destination
        }
    }

    /// One pan step under the normal movement rules. Returns `true` once the
    /// viewport reached the destination or could not move at all, which
    /// includes destinations outside the bounding box.
    pub fn pan(&mut self, pan: &mut CameraPan) -> bool {
        let target = self.pan_target(pan);
        let before = self.top_left();
        pan.last_position = Some(before);

        if self.point_in_bounding_box(target) {
            let speed = pan.speed;
            if (target.x - self.position.x).abs() <= speed {
                self.set_horizontal(target.x, false);
            } else if self.position.x < target.x {
                self.move_horizontal(Horizontal::Right, speed);
            } else {
                self.move_horizontal(Horizontal::Left, speed);
            }

            if (target.y - self.position.y).abs() <= speed {
                self.set_vertical(target.y, false);
            } else if self.position.y < target.y {
                self.move_vertical(Vertical::Up, speed);
            } else {
                self.move_vertical(Vertical::Down, speed);
            }
        }

        let now = self.top_left();
        now == target || now == before
    }

    /// One pan step that ignores movement locks and the bounding box, for
    /// scripted camera moves that may leave the normal bounds.
    pub fn force_pan(&mut self, pan: &mut CameraPan) -> bool {
        let target = self.pan_target(pan);
        let before = self.top_left();
        pan.last_position = Some(before);

        let speed = pan.speed.max(0);
        let step = |from: i32, to: i32| (to - from).clamp(-speed, speed);
        self.translate(ivec2(
            step(self.position.x, target.x),
            step(self.position.y, target.y),
        ));

        let now = self.top_left();
        now == target || now == before
    }

    /// One step of zoom out, pan, zoom back in, under the normal movement
    /// rules. Finishes at once (returning `true`) when either axis is locked
    /// or the destination lies outside the bounding box.
    pub fn pan_with_zoom(&mut self, pan: &mut CameraPan) -> bool {
        if pan.original_zoom.is_none() && pan.phase != PanPhase::Done {
            let movable = self.movement_allowed_horizontal && self.movement_allowed_vertical;
            if !movable || !self.point_in_bounding_box(self.pan_target(pan)) {
                log::debug!("pan with zoom to {:?} skipped", pan.destination);
                pan.phase = PanPhase::Done;
                return true;
            }
        }
        self.step_pan_with_zoom(pan, false)
    }

    /// One step of zoom out, pan, zoom back in, ignoring movement locks.
    /// Returns `false` while converging and `true` on the step that
    /// restores the original zoom.
    pub fn force_pan_with_zoom(&mut self, pan: &mut CameraPan) -> bool {
        self.step_pan_with_zoom(pan, true)
    }

    fn step_pan_with_zoom(&mut self, pan: &mut CameraPan, force: bool) -> bool {
        let original = *pan.original_zoom.get_or_insert(self.zoom);

        loop {
            match pan.phase {
                PanPhase::ZoomingOut => {
                    let visible = self.position.contains_point(pan.destination);
                    if !visible && self.zoom > self.config.min_zoom {
                        self.smooth_zoom_out(PAN_ZOOM_STEP, false);
                        return false;
                    }
                    log::debug!("pan with zoom: panning at zoom {}", self.zoom);
                    pan.phase = PanPhase::Panning;
                }
                PanPhase::Panning => {
                    let arrived = if force { self.force_pan(pan) } else { self.pan(pan) };
                    if !arrived {
                        return false;
                    }
                    log::debug!("pan with zoom: zooming back in to {}", original);
                    pan.phase = PanPhase::ZoomingIn;
                }
                PanPhase::ZoomingIn => {
                    let z = self.zoom as f32;
                    let threshold = (z + PAN_ZOOM_SNAP * z).min(u8::MAX as f32) as u8;
                    if original > threshold {
                        self.smooth_zoom_in(PAN_ZOOM_STEP, false);
                        return false;
                    }
                    self.set_zoom(original, true);
                    pan.phase = PanPhase::Done;
                    return true;
                }
                PanPhase::Done => return true,
            }
        }
    }

    /// The viewport in draw space (Y-down), for culling with
    /// [`TileMap::draw_commands`].
    pub fn visible_area(&self) -> Rect {
        Rect::new(
            self.position.x as f32,
            -self.position.y as f32,
            self.position.w as f32,
            self.position.h as f32,
        )
    }

    /// Matrix taking draw space into screen space: translate by the negated
    /// viewport origin, rotate, then scale by the stretch.
    pub fn transformation(&self) -> Mat4 {
        Mat4::from_scale(vec3(self.stretch, self.stretch, 1.0))
            * Mat4::from_rotation_z(self.rotation)
            * Mat4::from_translation(vec3(
                -self.position.x as f32,
                self.position.y as f32,
                0.0,
            ))
    }
}
