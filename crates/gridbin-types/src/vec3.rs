//! Small helpers over `[f64; 3]`, the point/vector representation shared by
//! every crate in the workspace.

pub type Vec3 = [f64; 3];

/// Geometric tolerance used for coincidence and parallelism checks.
pub const EPS: f64 = 1e-6;

pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// Unit vector along `a`. Degenerate input falls back to +Z.
pub fn normalize(a: Vec3) -> Vec3 {
    let len = norm(a);
    if len > 1e-12 {
        scale(a, 1.0 / len)
    } else {
        [0.0, 0.0, 1.0]
    }
}

pub fn distance(a: Vec3, b: Vec3) -> f64 {
    norm(sub(a, b))
}

pub fn approx_eq(a: Vec3, b: Vec3) -> bool {
    distance(a, b) < EPS
}

/// Component of `v` perpendicular to the unit vector `axis`.
pub fn reject(v: Vec3, axis: Vec3) -> Vec3 {
    sub(v, scale(axis, dot(v, axis)))
}

/// Rotate `v` about the unit vector `axis` by `angle` radians (Rodrigues).
pub fn rotate(v: Vec3, axis: Vec3, angle: f64) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    add(
        add(scale(v, cos), scale(cross(axis, v), sin)),
        scale(axis, dot(axis, v) * (1.0 - cos)),
    )
}

/// Two unit vectors completing `normal` to a right-handed frame.
pub fn plane_basis(normal: Vec3) -> (Vec3, Vec3) {
    let n = normalize(normal);
    let helper = if n[2].abs() < 0.9 {
        [0.0, 0.0, 1.0]
    } else {
        [1.0, 0.0, 0.0]
    };
    let u = normalize(cross(helper, n));
    let v = cross(n, u);
    (u, v)
}
