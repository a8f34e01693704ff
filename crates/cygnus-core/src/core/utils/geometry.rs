use crate::core::models::frame::PeriodicBox;
use nalgebra::{Isometry3, Matrix3, Point3, Rotation3, Translation3, UnitQuaternion, Vector3};

/// Distance between two points, honouring the minimum-image convention when a box is given.
pub fn pbc_distance(a: &Point3<f64>, b: &Point3<f64>, periodic_box: Option<&PeriodicBox>) -> f64 {
    let delta = a - b;
    match periodic_box {
        Some(pbc) => pbc.minimum_image(delta).norm(),
        None => delta.norm(),
    }
}

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Finds the rigid-body transform that best superimposes `mobile` onto `reference`.
///
/// Uses the Kabsch algorithm (SVD of the covariance matrix, with a reflection check).
/// Returns `None` if the point sets differ in length, are empty, or the decomposition fails.
pub fn superposition(
    mobile: &[Point3<f64>],
    reference: &[Point3<f64>],
) -> Option<Isometry3<f64>> {
    if mobile.len() != reference.len() || mobile.is_empty() {
        return None;
    }
    let mobile_center = centroid(mobile)?;
    let reference_center = centroid(reference)?;

    let mut h = Matrix3::<f64>::zeros();
    for (m, r) in mobile.iter().zip(reference) {
        h += (m - mobile_center) * (r - reference_center).transpose();
    }

    let svd = h.svd(true, true);
    let (u, v_t) = (svd.u?, svd.v_t?);
    let mut d = Matrix3::identity();
    if (v_t.transpose() * u.transpose()).determinant() < 0.0 {
        d[(2, 2)] = -1.0;
    }
    let rotation = Rotation3::from_matrix_unchecked(v_t.transpose() * d * u.transpose());
    let translation = reference_center.coords - rotation * mobile_center.coords;

    Some(Isometry3::from_parts(
        Translation3::from(translation),
        UnitQuaternion::from_rotation_matrix(&rotation),
    ))
}

/// Root-mean-square deviation between two equally sized point sets, without fitting.
pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .sum();
    Some((squared_dist_sum / n).sqrt())
}
