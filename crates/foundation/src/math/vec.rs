/// Screen-space point or offset in pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Cartesian vector, used for points on (or directions from) the unit sphere.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction; zero-length input is returned unchanged.
    pub fn normalize(self) -> Self {
        let l2 = self.dot(self);
        if l2 <= 0.0 {
            return self;
        }
        self.scale(1.0 / l2.sqrt())
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        self + (other - self).scale(t)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

/// Angle between two unit vectors, in radians.
pub fn angle_between(a: Vec3, b: Vec3) -> f64 {
    // atan2 form stays accurate for nearly parallel vectors.
    a.cross(b).length().atan2(a.dot(b))
}

/// Spherical interpolation between two unit vectors.
pub fn slerp(a: Vec3, b: Vec3, t: f64) -> Vec3 {
    let omega = angle_between(a, b);
    if omega.abs() < 1e-9 {
        return a.lerp(b, t).normalize();
    }
    let sin_omega = omega.sin();
    let wa = ((1.0 - t) * omega).sin() / sin_omega;
    let wb = (t * omega).sin() / sin_omega;
    a.scale(wa) + b.scale(wb)
}

#[cfg(test)]
mod tests {
    use super::{Vec2, Vec3, angle_between, slerp};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn vec2_distance() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(4.0, 6.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b - a, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn vec3_cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(Vec3::new(3.0, 0.0, 4.0).normalize(), Vec3::new(0.6, 0.0, 0.8));
    }

    #[test]
    fn slerp_midpoint_stays_on_sphere() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let mid = slerp(a, b, 0.5);
        assert_close(mid.length(), 1.0, 1e-12);
        assert_close(angle_between(a, mid), std::f64::consts::FRAC_PI_4, 1e-12);
    }
}
