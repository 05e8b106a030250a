//! Ring-shaped track: an annulus centred on the origin.

use crate::config::TrackConfig;

/// Minimum ray distance counted as a hit
const RAY_EPSILON: f32 = 1e-4;

/// 2D point / direction
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector for a heading in degrees, counter-clockwise from +x
    pub fn from_heading(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self { x: cos, y: sin }
    }

    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

/// Track bounded by an inner and an outer circular wall
#[derive(Clone, Debug)]
pub struct Track {
    pub inner_radius: f32,
    pub outer_radius: f32,
}

impl Track {
    pub fn new(config: &TrackConfig) -> Self {
        Self {
            inner_radius: config.inner_radius,
            outer_radius: config.outer_radius,
        }
    }

    /// Start pose: middle of the lane on +x, facing counter-clockwise
    pub fn start_pose(&self) -> (Vec2, f32) {
        let mid = (self.inner_radius + self.outer_radius) / 2.0;
        (Vec2::new(mid, 0.0), 90.0)
    }

    /// Whether `point` lies on the drivable lane (walls included)
    pub fn contains(&self, point: Vec2) -> bool {
        let r = point.length();
        r >= self.inner_radius && r <= self.outer_radius
    }

    /// Distance along `direction` (unit) from `origin` to the nearest wall
    pub fn raycast(&self, origin: Vec2, direction: Vec2) -> Option<f32> {
        [self.inner_radius, self.outer_radius]
            .into_iter()
            .filter(|&r| r > 0.0)
            .filter_map(|r| circle_hit(origin, direction, r))
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Smallest positive `t` with `|origin + t * direction| == radius`
fn circle_hit(origin: Vec2, direction: Vec2, radius: f32) -> Option<f32> {
    let b = origin.dot(direction);
    let c = origin.dot(origin) - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    [-b - root, -b + root]
        .into_iter()
        .find(|&t| t > RAY_EPSILON)
}
