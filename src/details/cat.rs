//! Chromatic Adaptation Registry (spec §4.2): named cone-response matrices
//! and the combined adaptation matrix between two white points.

use crate::details::color::WhitePoint;
use crate::{Float, Mat3, Vec3};

/// A named chromatic adaptation method: a cone-response matrix and its
/// inverse, used to adapt XYZ tristimuli between reference white points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChromaticAdaptationMethod {
    Bradford,
    VonKries,
    XyzScaling,
    Cat02,
    Sharp,
}

impl ChromaticAdaptationMethod {
    /// The process-wide default (spec §6): Bradford.
    pub const DEFAULT: Self = ChromaticAdaptationMethod::Bradford;

    fn cone_response_matrix(&self) -> Mat3 {
        match self {
            ChromaticAdaptationMethod::Bradford => Mat3::from_cols(
                Vec3::new(0.8951, -0.7502, 0.0389),
                Vec3::new(0.2664, 1.7135, -0.0685),
                Vec3::new(-0.1614, 0.0367, 1.0296),
            ),
            ChromaticAdaptationMethod::VonKries => Mat3::from_cols(
                Vec3::new(0.40024, -0.22630, 0.0),
                Vec3::new(0.70760, 1.16532, 0.0),
                Vec3::new(-0.08081, 0.04570, 0.91822),
            ),
            ChromaticAdaptationMethod::XyzScaling => Mat3::IDENTITY,
            ChromaticAdaptationMethod::Cat02 => Mat3::from_cols(
                Vec3::new(0.7328, -0.7036, 0.0030),
                Vec3::new(0.4296, 1.6975, 0.0136),
                Vec3::new(-0.1624, 0.0061, 0.9834),
            ),
            ChromaticAdaptationMethod::Sharp => Mat3::from_cols(
                Vec3::new(1.2694, -0.0988, 0.0336),
                Vec3::new(-0.0988, 0.7995, 0.0030),
                Vec3::new(-0.1706, 0.1967, 0.9631),
            ),
        }
    }

    /// Builds the combined 3x3 matrix adapting XYZ tristimuli from
    /// `from_white` to `to_white`:
    /// `A = M^-1 . diag(M . to_white / M . from_white) . M` (spec §4.2).
    pub fn adaptation_matrix(&self, from_white: WhitePoint, to_white: WhitePoint) -> Mat3 {
        if from_white == to_white {
            return Mat3::IDENTITY;
        }
        let m = self.cone_response_matrix();
        let m_inv = m.inverse();

        let src = m.mul_vec3(Vec3::from_array(from_white.xyz()));
        let dst = m.mul_vec3(Vec3::from_array(to_white.xyz()));

        let scale = Mat3::from_cols(
            Vec3::new(dst.x / src.x, 0.0, 0.0),
            Vec3::new(0.0, dst.y / src.y, 0.0),
            Vec3::new(0.0, 0.0, dst.z / src.z),
        );

        m_inv.mul_mat3(&scale).mul_mat3(&m)
    }
}

/// Per-`(method, from, to)` cache of adaptation matrices (spec §4.2: "The
/// registry precomputes `A` and caches by `(method, W1, W2)`"). Requires
/// `std` for the interior-mutable cache.
#[cfg(feature = "std")]
#[derive(Default)]
pub struct ChromaticAdaptationRegistry {
    cache: std::sync::Mutex<std::collections::HashMap<CacheKey, Mat3>>,
}

#[cfg(feature = "std")]
#[derive(PartialEq, Eq, Hash, Clone, Copy)]
struct CacheKey {
    method: ChromaticAdaptationMethod,
    from_bits: [u64; 3],
    to_bits: [u64; 3],
}

#[cfg(feature = "std")]
fn to_bits(xyz: [Float; 3]) -> [u64; 3] {
    [
        (xyz[0] as f64).to_bits(),
        (xyz[1] as f64).to_bits(),
        (xyz[2] as f64).to_bits(),
    ]
}

#[cfg(feature = "std")]
impl ChromaticAdaptationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached adaptation matrix for `(method, from, to)`,
    /// computing and inserting it on first request.
    pub fn get_or_compute(
        &self,
        method: ChromaticAdaptationMethod,
        from_white: WhitePoint,
        to_white: WhitePoint,
    ) -> Mat3 {
        let key = CacheKey {
            method,
            from_bits: to_bits(from_white.xyz()),
            to_bits: to_bits(to_white.xyz()),
        };
        let mut cache = self.cache.lock().expect("chromatic adaptation cache poisoned");
        *cache
            .entry(key)
            .or_insert_with(|| method.adaptation_matrix(from_white, to_white))
    }
}

/// Process-wide chromatic adaptation registry instance (spec §4.2, §6
/// `Converter.chromaticAdaptions`), lazily initialized with the same
/// single-winner guarantee as the Conversion Path Registry (spec §5).
#[cfg(feature = "std")]
static ADAPTATION_REGISTRY: std::sync::OnceLock<ChromaticAdaptationRegistry> =
    std::sync::OnceLock::new();

#[cfg(feature = "std")]
pub fn registry() -> &'static ChromaticAdaptationRegistry {
    ADAPTATION_REGISTRY.get_or_init(ChromaticAdaptationRegistry::new)
}

/// Named, user-registered cone-response matrices (spec §9 "Runtime add/remove
/// remains available for user extension"). [`ChromaticAdaptationMethod`]
/// itself stays a closed, compile-time enum of the built-in methods — this
/// side table is how a caller can extend the set of *names* the registry
/// knows about without the dynamic-dispatch reflection the source used.
#[cfg(feature = "std")]
static CUSTOM_METHODS: std::sync::OnceLock<std::sync::RwLock<std::collections::HashMap<alloc::string::String, Mat3>>> =
    std::sync::OnceLock::new();

#[cfg(feature = "std")]
fn custom_methods() -> &'static std::sync::RwLock<std::collections::HashMap<alloc::string::String, Mat3>> {
    CUSTOM_METHODS.get_or_init(|| std::sync::RwLock::new(std::collections::HashMap::new()))
}

/// Registers a custom chromatic adaptation method by name, keyed by its
/// cone-response matrix (the same role Bradford/CAT02/etc. play for the
/// built-in methods). Takes effect only for `Converter`s constructed
/// afterward (spec §5).
#[cfg(feature = "std")]
pub fn add_chromatic_adaptation(name: alloc::string::String, cone_response: Mat3) {
    custom_methods()
        .write()
        .expect("custom chromatic adaptation registry poisoned")
        .insert(name, cone_response);
}

/// Removes a previously registered custom chromatic adaptation method.
#[cfg(feature = "std")]
pub fn remove_chromatic_adaptation(name: &str) {
    custom_methods()
        .write()
        .expect("custom chromatic adaptation registry poisoned")
        .remove(name);
}

/// The names of every chromatic adaptation method known to the registry:
/// the five built-in methods plus any custom ones registered via
/// [`add_chromatic_adaptation`].
#[cfg(feature = "std")]
pub fn chromatic_adaptation_names() -> alloc::vec::Vec<alloc::string::String> {
    let mut names: alloc::vec::Vec<alloc::string::String> =
        ["Bradford", "VonKries", "XyzScaling", "CAT02", "Sharp"]
            .iter()
            .map(|s| alloc::string::String::from(*s))
            .collect();
    names.extend(
        custom_methods()
            .read()
            .expect("custom chromatic adaptation registry poisoned")
            .keys()
            .cloned(),
    );
    names
}
