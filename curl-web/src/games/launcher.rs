//! Curl-powered projectile launcher
//!
//! Curling charges a launch meter: the charge starts while the arm is down,
//! grows with every frame of curling motion (scaled by form) and fires when
//! the arm reaches the top of the curl. Projectiles then fly under gravity
//! across a 0-100 play field and score against caller-placed targets.

use std::collections::VecDeque;

/// Degrees of frame-to-frame change that count as curling motion
const MOTION_THRESHOLD: f32 = 3.0;
const DOWN_ABOVE: f32 = 140.0;
const UP_BELOW: f32 = 50.0;
const LAUNCH_BELOW: f32 = 40.0;
const MIN_LAUNCH_POWER: f32 = 20.0;
const MAX_POWER: f32 = 100.0;
const REP_POWER_BONUS: f32 = 25.0;

/// Play-field units per frame at full power
const LAUNCH_SPEED: f32 = 8.0;
const GRAVITY: f32 = 0.3;
const LAUNCH_ORIGIN: (f32, f32) = (10.0, 90.0);
const TRAIL_LENGTH: usize = 8;
const HIT_RADIUS: f32 = 8.0;

const STARTING_LIVES: u32 = 3;
const MAX_LIVES: u32 = 5;

/// Where the arm is in its curl
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CurlPhase {
    #[default]
    Down,
    Transition,
    Up,
}

impl CurlPhase {
    fn from_angle(angle: f32) -> Self {
        if angle > DOWN_ABOVE {
            CurlPhase::Down
        } else if angle < UP_BELOW {
            CurlPhase::Up
        } else {
            CurlPhase::Transition
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetKind {
    Target,
    Fish,
    Raindrop,
    PowerUp,
}

impl TargetKind {
    pub fn points(&self) -> i32 {
        match self {
            TargetKind::Target => 50,
            TargetKind::Fish => 75,
            TargetKind::Raindrop => -25,
            TargetKind::PowerUp => 100,
        }
    }
}

/// Something on the play field a projectile can hit
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Target {
    pub x: f32,
    pub y: f32,
    pub kind: TargetKind,
    pub hit: bool,
}

impl Target {
    pub fn new(x: f32, y: f32, kind: TargetKind) -> Self {
        Self { x, y, kind, hit: false }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub position: (f32, f32),
    pub velocity: (f32, f32),
    /// Launch power 0-100
    pub power: f32,
    /// Most recent positions, oldest first
    pub trail: VecDeque<(f32, f32)>,
}

impl Projectile {
    fn launch(power: f32, angle_degrees: f32) -> Self {
        let speed = power / MAX_POWER * LAUNCH_SPEED;
        let angle = angle_degrees.to_radians();
        Self {
            position: LAUNCH_ORIGIN,
            // Screen y grows downward
            velocity: (angle.cos() * speed, -angle.sin() * speed),
            power,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    /// Advance one frame; returns `false` once the projectile leaves the field
    fn advance(&mut self) -> bool {
        self.trail.push_back(self.position);
        if self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }

        self.position.0 += self.velocity.0;
        self.position.1 += self.velocity.1;
        self.velocity.1 += GRAVITY;

        let (x, y) = self.position;
        (0.0..=100.0).contains(&x) && y <= 100.0
    }
}

/// A projectile striking a target during `step`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub kind: TargetKind,
    pub target_index: usize,
    /// Points awarded, 0 for hazards
    pub points: u32,
}

/// Launcher game state
#[derive(Clone, Debug)]
pub struct LauncherGame {
    power: f32,
    charging: bool,
    phase: CurlPhase,
    last_angle: Option<f32>,
    launch_angle: f32,
    projectiles: Vec<Projectile>,
    lives: u32,
    level: u32,
    score: u32,
    targets_hit: u32,
}

impl LauncherGame {
    pub fn new() -> Self {
        Self {
            power: 0.0,
            charging: false,
            phase: CurlPhase::Down,
            last_angle: None,
            launch_angle: 45.0,
            projectiles: Vec::new(),
            lives: STARTING_LIVES,
            level: 1,
            score: 0,
            targets_hit: 0,
        }
    }

    pub fn set_launch_angle(&mut self, degrees: f32) {
        self.launch_angle = degrees.clamp(0.0, 90.0);
    }

    /// Feed the latest arm angle and form score.
    ///
    /// Returns `true` when this update launched a projectile.
    pub fn on_angle(&mut self, angle: f32, form_score: u8) -> bool {
        let delta = self.last_angle.map_or(0.0, |last| angle - last);
        self.last_angle = Some(angle);
        self.phase = CurlPhase::from_angle(angle);

        if delta.abs() > MOTION_THRESHOLD {
            if !self.charging && self.phase == CurlPhase::Down {
                self.charging = true;
                self.power = 0.0;
            }
            if self.charging {
                let gain = delta.abs() / 10.0 * (form_score as f32 / 100.0) * 2.0;
                self.power = (self.power + gain).min(MAX_POWER);
            }
        }

        if self.phase == CurlPhase::Up
            && angle < LAUNCH_BELOW
            && self.charging
            && self.power > MIN_LAUNCH_POWER
        {
            self.launch();
            return true;
        }
        false
    }

    /// A completed rep tops up a running charge.
    ///
    /// Returns `true` when `total_reps` calls for a bonus wave (every 5 reps).
    pub fn on_rep(&mut self, total_reps: u32) -> bool {
        if self.charging {
            self.power = (self.power + REP_POWER_BONUS).min(MAX_POWER);
        }
        total_reps > 0 && total_reps % 5 == 0
    }

    fn launch(&mut self) {
        tracing::debug!(power = self.power, angle = self.launch_angle, "projectile launched");
        self.projectiles
            .push(Projectile::launch(self.power, self.launch_angle));
        self.charging = false;
        self.power = 0.0;
    }

    /// Advance every projectile one frame and resolve collisions
    pub fn step(&mut self, targets: &mut [Target]) -> Vec<Hit> {
        self.projectiles.retain_mut(|p| p.advance());

        let mut hits = Vec::new();
        let mut remaining = Vec::with_capacity(self.projectiles.len());
        for projectile in std::mem::take(&mut self.projectiles) {
            // One projectile takes out every unhit target within reach
            let struck: Vec<usize> = targets
                .iter()
                .enumerate()
                .filter(|(_, t)| {
                    let dx = projectile.position.0 - t.x;
                    let dy = projectile.position.1 - t.y;
                    !t.hit && (dx * dx + dy * dy).sqrt() < HIT_RADIUS
                })
                .map(|(index, _)| index)
                .collect();

            if struck.is_empty() {
                remaining.push(projectile);
                continue;
            }
            for index in struck {
                targets[index].hit = true;
                hits.push(self.resolve_hit(index, targets[index].kind, projectile.power));
            }
        }
        self.projectiles = remaining;
        hits
    }

    fn resolve_hit(&mut self, target_index: usize, kind: TargetKind, power: f32) -> Hit {
        let award = (kind.points() + (power / 20.0).floor() as i32).max(0) as u32;
        let points = match kind {
            TargetKind::Target | TargetKind::Fish => {
                self.targets_hit += 1;
                award
            }
            TargetKind::Raindrop => {
                self.lives = self.lives.saturating_sub(1);
                0
            }
            TargetKind::PowerUp => {
                self.lives = (self.lives + 1).min(MAX_LIVES);
                award
            }
        };
        self.score += points;
        Hit {
            kind,
            target_index,
            points,
        }
    }

    /// No regular target left standing on a non-empty field
    pub fn level_cleared(targets: &[Target]) -> bool {
        !targets.is_empty()
            && !targets
                .iter()
                .any(|t| t.kind == TargetKind::Target && !t.hit)
    }

    pub fn next_level(&mut self) {
        self.level += 1;
        self.lives = (self.lives + 1).min(MAX_LIVES);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn power(&self) -> f32 {
        self.power
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn phase(&self) -> CurlPhase {
        self.phase
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn targets_hit(&self) -> u32 {
        self.targets_hit
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }
}

impl Default for LauncherGame {
    fn default() -> Self {
        Self::new()
    }
}
