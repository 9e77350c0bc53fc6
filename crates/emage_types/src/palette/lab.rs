//! CIE Lab conversion and the CIEDE2000 colour difference.

use std::f64::consts::{PI, TAU};

use super::linearize;

/// D65 reference white
const WHITE_X: f64 = 0.95047;
const WHITE_Y: f64 = 1.00000;
const WHITE_Z: f64 = 1.08883;

const LAB_EPSILON: f64 = 0.008856;
const LAB_KAPPA: f64 = 903.3;

/// 25^7
const POW_25_7: f64 = 6_103_515_625.0;

/// A colour in CIE L*a*b* space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
	/// Lightness
	pub l: f64,
	/// Green–red axis
	pub a: f64,
	/// Blue–yellow axis
	pub b: f64,
}

impl Lab {
	/// Converts an sRGB byte triple to Lab (D65).
	pub fn from_srgb(r: u8, g: u8, b: u8) -> Self {
		let lr = linearize(r);
		let lg = linearize(g);
		let lb = linearize(b);

		let x = (lr * 0.4124564 + lg * 0.3575761 + lb * 0.1804375) / WHITE_X;
		let y = (lr * 0.2126729 + lg * 0.7151522 + lb * 0.0721750) / WHITE_Y;
		let z = (lr * 0.0193339 + lg * 0.1191920 + lb * 0.9503041) / WHITE_Z;

		let fx = lab_f(x);
		let fy = lab_f(y);
		let fz = lab_f(z);

		Self {
			l: 116.0 * fy - 16.0,
			a: 500.0 * (fx - fy),
			b: 200.0 * (fy - fz),
		}
	}

	/// Squared Euclidean distance, used as a cheap pre-filter.
	#[inline]
	pub fn distance_squared(&self, other: &Lab) -> f64 {
		let dl = self.l - other.l;
		let da = self.a - other.a;
		let db = self.b - other.b;
		dl * dl + da * da + db * db
	}

	/// Squared CIEDE2000 difference (kL = kC = kH = 1).
	///
	/// The square root is skipped since only the ordering matters.
	pub fn ciede2000(&self, other: &Lab) -> f64 {
		let (l1, a1, b1) = (self.l, self.a, self.b);
		let (l2, a2, b2) = (other.l, other.a, other.b);

		let c1 = a1.hypot(b1);
		let c2 = a2.hypot(b2);
		let c_bar7 = pow7((c1 + c2) / 2.0);
		let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + POW_25_7)).sqrt());

		let a1p = a1 * (1.0 + g);
		let a2p = a2 * (1.0 + g);
		let c1p = a1p.hypot(b1);
		let c2p = a2p.hypot(b2);

		let h1p = hue_angle(b1, a1p);
		let h2p = hue_angle(b2, a2p);
		let chroma_product = c1p * c2p;

		let delta_lp = l2 - l1;
		let delta_cp = c2p - c1p;

		let delta_hp = if chroma_product == 0.0 {
			0.0
		} else if (h2p - h1p).abs() <= PI {
			h2p - h1p
		} else if h2p - h1p > PI {
			h2p - h1p - TAU
		} else {
			h2p - h1p + TAU
		};
		let delta_big_hp = 2.0 * chroma_product.sqrt() * (delta_hp / 2.0).sin();

		let l_bar_p = (l1 + l2) / 2.0;
		let c_bar_p = (c1p + c2p) / 2.0;

		let h_bar_p = if chroma_product == 0.0 {
			h1p + h2p
		} else if (h1p - h2p).abs() <= PI {
			(h1p + h2p) / 2.0
		} else if h1p + h2p < TAU {
			(h1p + h2p + TAU) / 2.0
		} else {
			(h1p + h2p - TAU) / 2.0
		};

		let t = 1.0 - 0.17 * (h_bar_p - 30f64.to_radians()).cos()
			+ 0.24 * (2.0 * h_bar_p).cos()
			+ 0.32 * (3.0 * h_bar_p + 6f64.to_radians()).cos()
			- 0.20 * (4.0 * h_bar_p - 63f64.to_radians()).cos();

		let l50 = (l_bar_p - 50.0) * (l_bar_p - 50.0);
		let s_l = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
		let s_c = 1.0 + 0.045 * c_bar_p;
		let s_h = 1.0 + 0.015 * c_bar_p * t;

		let c_bar_p7 = pow7(c_bar_p);
		let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + POW_25_7)).sqrt();
		let theta = (h_bar_p - 275f64.to_radians()) / 25f64.to_radians();
		let delta_theta = 30f64.to_radians() * (-(theta * theta)).exp();
		let r_t = -(2.0 * delta_theta).sin() * r_c;

		let ratio_l = delta_lp / s_l;
		let ratio_c = delta_cp / s_c;
		let ratio_h = delta_big_hp / s_h;

		ratio_l * ratio_l + ratio_c * ratio_c + ratio_h * ratio_h + r_t * ratio_c * ratio_h
	}
}

#[inline]
fn lab_f(t: f64) -> f64 {
	if t > LAB_EPSILON {
		t.cbrt()
	} else {
		(LAB_KAPPA * t + 16.0) / 116.0
	}
}

/// Hue in radians, normalised to `[0, 2π)`
#[inline]
fn hue_angle(b: f64, a_prime: f64) -> f64 {
	let h = b.atan2(a_prime);
	if h < 0.0 {
		h + TAU
	} else {
		h
	}
}

#[inline]
fn pow7(x: f64) -> f64 {
	let x2 = x * x;
	let x3 = x2 * x;
	x3 * x3 * x
}
