use freak_core::{FreakConfig, IntegralImage, Keypoint};
use freak_descriptor::FreakExtractor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SIDE: usize = 128;

/// Smooth synthetic patch: a flat background with four Gaussian blobs
fn blobs(x: f64, y: f64) -> f64 {
    const BLOBS: [(f64, f64, f64, f64); 4] = [
        (10.0, -6.0, 120.0, 6.0),
        (-8.0, 9.0, 80.0, 5.0),
        (3.0, 12.0, -60.0, 4.0),
        (-12.0, -10.0, 50.0, 7.0),
    ];
    let v = BLOBS.iter().fold(100.0, |acc, &(bx, by, amp, sigma)| {
        let d2 = (x - bx).powi(2) + (y - by).powi(2);
        acc + amp * (-d2 / (2.0 * sigma * sigma)).exp()
    });
    v.clamp(0.0, 255.0)
}

/// The blob patch rotated by `theta` about the image centre
fn rotated_patch(theta: f64) -> Vec<u8> {
    let c = SIDE as f64 / 2.0;
    let (s, co) = (-theta).sin_cos();
    (0..SIDE * SIDE)
        .map(|i| {
            let px = (i % SIDE) as f64 + 0.5 - c;
            let py = (i / SIDE) as f64 + 0.5 - c;
            blobs(co * px - s * py, s * px + co * py).round() as u8
        })
        .collect()
}

fn random_patch(seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..SIDE * SIDE).map(|_| rng.gen()).collect()
}

fn describe(ext: &FreakExtractor, img: &[u8]) -> Vec<u8> {
    let integral = IntegralImage::new(img, SIDE, SIDE).unwrap();
    let kp = Keypoint::new(SIDE as f32 / 2.0, SIDE as f32 / 2.0, 7.0);
    ext.describe_keypoint(&integral, &kp).unwrap().1
}

fn hamming(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

#[test]
fn rotated_patch_stays_close() {
    let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
    let base = describe(&ext, &rotated_patch(0.0));
    let unrelated = hamming(
        &describe(&ext, &random_patch(1)),
        &describe(&ext, &random_patch(2)),
    );

    for degrees in [30.0f64, 90.0, 137.0] {
        let rotated = describe(&ext, &rotated_patch(degrees.to_radians()));
        let distance = hamming(&base, &rotated);
        assert!(
            distance < 128,
            "rotation by {} deg moved {} of 512 bits",
            degrees,
            distance
        );
        assert!(distance < unrelated);
    }
}

#[test]
fn estimated_angle_follows_rotation() {
    let ext = FreakExtractor::new(&FreakConfig::default()).unwrap();
    let integral = |img: &[u8]| IntegralImage::new(img, SIDE, SIDE).unwrap();
    let kp = Keypoint::new(64.0, 64.0, 7.0);

    let a0 = ext
        .describe_keypoint(&integral(&rotated_patch(0.0)), &kp)
        .unwrap()
        .0
        .angle
        .unwrap();
    let a90 = ext
        .describe_keypoint(&integral(&rotated_patch(90f64.to_radians())), &kp)
        .unwrap()
        .0
        .angle
        .unwrap();

    let turn = std::f32::consts::TAU;
    let delta = (a90 - a0).rem_euclid(turn);
    let expected = std::f32::consts::FRAC_PI_2;
    assert!(
        (delta - expected).abs() < 0.3,
        "angle moved by {} rad, expected about {}",
        delta,
        expected
    );
}
