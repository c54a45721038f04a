//! Per-stage butterflies of the mixed-radix transform
//!
//! Every stage reads `input` and writes `output` (never in place). For a
//! stage with factor `f` and running product `p` (including `f`), input
//! element `i + a*m` (`m = n/f`) feeds butterfly leg `a`, and leg `b` of
//! the result lands at `k*p + k1 + b*(p/f)`, multiplied by the stage
//! twiddle for `(b, k)`. Factors 2 to 7 use closed-form kernels, anything
//! else goes through the generic symmetric-sum kernel.

use super::fft::Direction;
use num_complex::Complex64;
use std::f64::consts::PI;

const SIN_60: f64 = 0.866_025_403_784_438_6;

const COS_72: f64 = 0.309_016_994_374_947_45;
const COS_144: f64 = -0.809_016_994_374_947_5;
const SIN_72: f64 = 0.951_056_516_295_153_5;
const SIN_144: f64 = 0.587_785_252_292_473_1;

// cos/sin of 2πk/7 for k = 1, 2, 3
const C7_1: f64 = 0.623_489_801_858_733_6;
const C7_2: f64 = -0.222_520_933_956_314_34;
const C7_3: f64 = -0.900_968_867_902_419_1;
const S7_1: f64 = 0.781_831_482_468_029_8;
const S7_2: f64 = 0.974_927_912_181_823_6;
const S7_3: f64 = 0.433_883_739_117_558_23;

/// Run one transform stage with factor `factor`
pub(crate) fn pass(
    input: &[Complex64],
    output: &mut [Complex64],
    factor: usize,
    product: usize,
    twiddle: &[Complex64],
    direction: Direction,
) {
    match factor {
        2 => run_pass::<2>(input, output, product, twiddle, direction, dft2),
        3 => run_pass::<3>(input, output, product, twiddle, direction, dft3),
        4 => run_pass::<4>(input, output, product, twiddle, direction, dft4),
        5 => run_pass::<5>(input, output, product, twiddle, direction, dft5),
        6 => run_pass::<6>(input, output, product, twiddle, direction, dft6),
        7 => run_pass::<7>(input, output, product, twiddle, direction, dft7),
        _ => run_pass_generic(input, output, factor, product, twiddle, direction),
    }
}

/// Multiply by `i * sign`
#[inline]
fn rotate(z: Complex64, sign: f64) -> Complex64 {
    Complex64::new(-sign * z.im, sign * z.re)
}

#[inline]
fn stage_twiddle(twiddle: &[Complex64], leg: usize, k: usize, q: usize, direction: Direction) -> Complex64 {
    let w = twiddle[(leg - 1) * q + (k - 1)];
    match direction {
        Direction::Forward => w,
        Direction::Backward => w.conj(),
    }
}

fn run_pass<const F: usize>(
    input: &[Complex64],
    output: &mut [Complex64],
    product: usize,
    twiddle: &[Complex64],
    direction: Direction,
    kernel: fn(&[Complex64; F], f64) -> [Complex64; F],
) {
    let n = input.len();
    let m = n / F;
    let q = n / product;
    let product_1 = product / F;
    let sign = direction.sign();

    let mut i = 0;
    for k in 0..q {
        let mut w = [Complex64::new(1.0, 0.0); F];
        if k > 0 {
            for (leg, slot) in w.iter_mut().enumerate().skip(1) {
                *slot = stage_twiddle(twiddle, leg, k, q, direction);
            }
        }

        let base = k * product;
        for k1 in 0..product_1 {
            let z: [Complex64; F] = std::array::from_fn(|a| input[i + a * m]);
            let x = kernel(&z, sign);

            let j = base + k1;
            output[j] = x[0];
            for leg in 1..F {
                output[j + leg * product_1] = if k == 0 { x[leg] } else { w[leg] * x[leg] };
            }
            i += 1;
        }
    }
}

fn dft2(z: &[Complex64; 2], _sign: f64) -> [Complex64; 2] {
    [z[0] + z[1], z[0] - z[1]]
}

fn dft3(z: &[Complex64; 3], sign: f64) -> [Complex64; 3] {
    let t1 = z[1] + z[2];
    let t2 = z[0] - t1 * 0.5;
    let t3 = rotate((z[1] - z[2]) * SIN_60, sign);

    [z[0] + t1, t2 + t3, t2 - t3]
}

fn dft4(z: &[Complex64; 4], sign: f64) -> [Complex64; 4] {
    let t1 = z[0] + z[2];
    let t2 = z[1] + z[3];
    let t3 = z[0] - z[2];
    let t4 = rotate(z[1] - z[3], sign);

    [t1 + t2, t3 + t4, t1 - t2, t3 - t4]
}

fn dft5(z: &[Complex64; 5], sign: f64) -> [Complex64; 5] {
    let a1 = z[1] + z[4];
    let a2 = z[2] + z[3];
    let b1 = z[1] - z[4];
    let b2 = z[2] - z[3];

    let r1 = z[0] + a1 * COS_72 + a2 * COS_144;
    let r2 = z[0] + a1 * COS_144 + a2 * COS_72;
    let i1 = rotate(b1 * SIN_72 + b2 * SIN_144, sign);
    let i2 = rotate(b1 * SIN_144 - b2 * SIN_72, sign);

    [z[0] + a1 + a2, r1 + i1, r2 + i2, r2 - i2, r1 - i1]
}

fn dft6(z: &[Complex64; 6], sign: f64) -> [Complex64; 6] {
    // 6 = 2 * 3 with coprime index mapping, so no inner twiddles
    let a = dft3(&[z[0], z[2], z[4]], sign);
    let b = dft3(&[z[3], z[5], z[1]], sign);

    [a[0] + b[0], a[1] - b[1], a[2] + b[2], a[0] - b[0], a[1] + b[1], a[2] - b[2]]
}

fn dft7(z: &[Complex64; 7], sign: f64) -> [Complex64; 7] {
    let a1 = z[1] + z[6];
    let a2 = z[2] + z[5];
    let a3 = z[3] + z[4];
    let b1 = z[1] - z[6];
    let b2 = z[2] - z[5];
    let b3 = z[3] - z[4];

    let r1 = z[0] + a1 * C7_1 + a2 * C7_2 + a3 * C7_3;
    let r2 = z[0] + a1 * C7_2 + a2 * C7_3 + a3 * C7_1;
    let r3 = z[0] + a1 * C7_3 + a2 * C7_1 + a3 * C7_2;
    let i1 = rotate(b1 * S7_1 + b2 * S7_2 + b3 * S7_3, sign);
    let i2 = rotate(b1 * S7_2 - b2 * S7_3 - b3 * S7_1, sign);
    let i3 = rotate(b1 * S7_3 - b2 * S7_1 + b3 * S7_2, sign);

    [
        z[0] + a1 + a2 + a3,
        r1 + i1,
        r2 + i2,
        r3 + i3,
        r3 - i3,
        r2 - i2,
        r1 - i1,
    ]
}

/// Stage with an arbitrary factor, `O(factor)` work per output
fn run_pass_generic(
    input: &[Complex64],
    output: &mut [Complex64],
    factor: usize,
    product: usize,
    twiddle: &[Complex64],
    direction: Direction,
) {
    let n = input.len();
    let m = n / factor;
    let q = n / product;
    let product_1 = product / factor;
    let sign = direction.sign();

    let roots: Vec<(f64, f64)> = (0..factor)
        .map(|t| {
            let theta = 2.0 * PI * t as f64 / factor as f64;
            (theta.cos(), theta.sin())
        })
        .collect();

    let mut z = vec![Complex64::new(0.0, 0.0); factor];
    let mut x = vec![Complex64::new(0.0, 0.0); factor];

    let mut i = 0;
    for k in 0..q {
        let base = k * product;
        for k1 in 0..product_1 {
            for (a, slot) in z.iter_mut().enumerate() {
                *slot = input[i + a * m];
            }

            if factor % 2 == 1 {
                symmetric_dft(&z, &mut x, &roots, sign);
            } else {
                direct_dft(&z, &mut x, &roots, sign);
            }

            let j = base + k1;
            output[j] = x[0];
            for leg in 1..factor {
                output[j + leg * product_1] = if k == 0 {
                    x[leg]
                } else {
                    stage_twiddle(twiddle, leg, k, q, direction) * x[leg]
                };
            }
            i += 1;
        }
    }
}

/// Odd-length DFT that pairs legs `a` and `f - a`
///
/// Real parts share the cosine sums and imaginary parts the sine sums, so
/// outputs `b` and `f - b` come out of one accumulation.
fn symmetric_dft(z: &[Complex64], x: &mut [Complex64], roots: &[(f64, f64)], sign: f64) {
    let f = z.len();
    let half = (f - 1) / 2;

    x[0] = z.iter().sum();

    for b in 1..=half {
        let mut re_sum = z[0];
        let mut im_sum = Complex64::new(0.0, 0.0);
        for a in 1..=half {
            let (c, s) = roots[(a * b) % f];
            re_sum += (z[a] + z[f - a]) * c;
            im_sum += (z[a] - z[f - a]) * s;
        }
        let im_sum = rotate(im_sum, sign);
        x[b] = re_sum + im_sum;
        x[f - b] = re_sum - im_sum;
    }
}

fn direct_dft(z: &[Complex64], x: &mut [Complex64], roots: &[(f64, f64)], sign: f64) {
    let f = z.len();
    for (b, out) in x.iter_mut().enumerate() {
        *out = z
            .iter()
            .enumerate()
            .map(|(a, &za)| {
                let (c, s) = roots[(a * b) % f];
                za * Complex64::new(c, sign * s)
            })
            .sum();
    }
}
