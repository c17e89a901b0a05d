//! Named colormaps for merged blend mode, sampled from control-point
//! gradients. Unknown names fall back to greyscale rather than erroring, so a
//! stale name in a saved view still renders something sensible.

type Stop = (f32, [u8; 3]);

const VIRIDIS: &[Stop] = &[
    (0.0, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.5, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.0, [253, 231, 37]),
];

const PLASMA: &[Stop] = &[
    (0.0, [13, 8, 135]),
    (0.25, [126, 3, 168]),
    (0.5, [204, 71, 120]),
    (0.75, [248, 149, 64]),
    (1.0, [240, 249, 33]),
];

const INFERNO: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [87, 16, 110]),
    (0.5, [188, 55, 84]),
    (0.75, [249, 142, 9]),
    (1.0, [252, 255, 164]),
];

const MAGMA: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [81, 18, 124]),
    (0.5, [183, 55, 121]),
    (0.75, [252, 137, 97]),
    (1.0, [252, 253, 191]),
];

const JET: &[Stop] = &[
    (0.0, [0, 0, 131]),
    (0.125, [0, 60, 170]),
    (0.375, [5, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [250, 0, 0]),
    (1.0, [128, 0, 0]),
];

const HOT: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.3, [230, 0, 0]),
    (0.6, [255, 210, 0]),
    (1.0, [255, 255, 255]),
];

const COOL: &[Stop] = &[(0.0, [0, 255, 255]), (1.0, [255, 0, 255])];
const SPRING: &[Stop] = &[(0.0, [255, 0, 255]), (1.0, [255, 255, 0])];
const SUMMER: &[Stop] = &[(0.0, [0, 128, 102]), (1.0, [255, 255, 102])];
const AUTUMN: &[Stop] = &[(0.0, [255, 0, 0]), (1.0, [255, 255, 0])];
const WINTER: &[Stop] = &[(0.0, [0, 0, 255]), (1.0, [0, 255, 128])];
const BLUERED: &[Stop] = &[(0.0, [0, 0, 255]), (1.0, [255, 0, 0])];

const RDBU: &[Stop] = &[
    (0.0, [5, 10, 172]),
    (0.35, [106, 137, 247]),
    (0.5, [190, 190, 190]),
    (0.65, [220, 170, 132]),
    (1.0, [178, 10, 28]),
];

const PICNIC: &[Stop] = &[
    (0.0, [0, 0, 255]),
    (0.25, [102, 153, 255]),
    (0.5, [255, 255, 255]),
    (0.75, [255, 102, 102]),
    (1.0, [255, 0, 0]),
];

const RAINBOW: &[Stop] = &[
    (0.0, [150, 0, 90]),
    (0.2, [0, 0, 255]),
    (0.4, [0, 183, 235]),
    (0.6, [0, 255, 0]),
    (0.8, [255, 255, 0]),
    (1.0, [255, 0, 0]),
];

const RAINBOW_SOFT: &[Stop] = &[
    (0.0, [125, 0, 179]),
    (0.2, [0, 116, 255]),
    (0.4, [0, 231, 205]),
    (0.6, [151, 243, 80]),
    (0.8, [255, 180, 50]),
    (1.0, [255, 93, 162]),
];

const CUBEHELIX: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.25, [22, 81, 57]),
    (0.5, [164, 118, 98]),
    (0.75, [181, 182, 228]),
    (1.0, [255, 255, 255]),
];

const GREENS: &[Stop] = &[(0.0, [0, 68, 27]), (0.5, [65, 171, 93]), (1.0, [247, 252, 245])];
const GREYS: &[Stop] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];
const BONE: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.375, [84, 84, 116]),
    (0.75, [169, 200, 200]),
    (1.0, [255, 255, 255]),
];
const COPPER: &[Stop] = &[(0.0, [0, 0, 0]), (0.8, [255, 160, 102]), (1.0, [255, 199, 127])];

const BLACKBODY: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.2, [230, 0, 0]),
    (0.4, [230, 210, 0]),
    (0.7, [255, 255, 255]),
    (1.0, [160, 200, 255]),
];

const ELECTRIC: &[Stop] = &[
    (0.0, [0, 0, 0]),
    (0.15, [30, 0, 100]),
    (0.4, [120, 0, 100]),
    (0.6, [160, 90, 0]),
    (0.8, [230, 200, 0]),
    (1.0, [255, 250, 220]),
];

const PORTLAND: &[Stop] = &[
    (0.0, [12, 51, 131]),
    (0.25, [10, 136, 186]),
    (0.5, [242, 211, 56]),
    (0.75, [242, 143, 56]),
    (1.0, [217, 30, 30]),
];

const EARTH: &[Stop] = &[
    (0.0, [0, 0, 130]),
    (0.1, [0, 180, 180]),
    (0.2, [40, 210, 40]),
    (0.4, [230, 230, 50]),
    (0.6, [120, 70, 20]),
    (1.0, [255, 255, 255]),
];

fn stops_for(name: &str) -> &'static [Stop] {
    match name {
        "viridis" => VIRIDIS,
        "plasma" => PLASMA,
        "inferno" => INFERNO,
        "magma" => MAGMA,
        "jet" => JET,
        "hot" => HOT,
        "cool" => COOL,
        "spring" => SPRING,
        "summer" => SUMMER,
        "autumn" => AUTUMN,
        "winter" => WINTER,
        "bluered" => BLUERED,
        "rdbu" => RDBU,
        "picnic" => PICNIC,
        "rainbow" => RAINBOW,
        "rainbow_soft" => RAINBOW_SOFT,
        "cubehelix" => CUBEHELIX,
        "greens" => GREENS,
        "greys" => GREYS,
        "bone" => BONE,
        "copper" => COPPER,
        "blackbody" => BLACKBODY,
        "electric" => ELECTRIC,
        "portland" => PORTLAND,
        "earth" => EARTH,
        _ => GREYS,
    }
}

/// Sample a colormap at `t` in [0, 1].
pub fn sample(name: &str, t: f32) -> [u8; 3] {
    let stops = stops_for(name);
    let t = t.clamp(0.0, 1.0);

    let mut prev = stops[0];
    for &stop in stops.iter() {
        if t <= stop.0 {
            let span = stop.0 - prev.0;
            let f = if span > 0.0 { (t - prev.0) / span } else { 0.0 };
            return [
                lerp_u8(prev.1[0], stop.1[0], f),
                lerp_u8(prev.1[1], stop.1[1], f),
                lerp_u8(prev.1[2], stop.1[2], f),
            ];
        }
        prev = stop;
    }
    prev.1
}

/// Precomputed 256-entry lookup table for per-pixel compositing.
pub fn build_lut(name: &str) -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = sample(name, i as f32 / 255.0);
    }
    lut
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use microatlas_core::consts::COLORMAP_OPTIONS;

    #[test]
    fn every_offered_colormap_has_stops() {
        for name in COLORMAP_OPTIONS {
            // Endpoints must differ, otherwise the map renders flat.
            assert_ne!(sample(name, 0.0), sample(name, 1.0), "{name}");
        }
    }

    #[test]
    fn unknown_name_falls_back_to_greyscale() {
        assert_eq!(sample("nonsense", 0.0), [0, 0, 0]);
        assert_eq!(sample("nonsense", 1.0), [255, 255, 255]);
    }

    #[test]
    fn lut_is_monotonic_for_greys() {
        let lut = build_lut("greys");
        assert_eq!(lut[0], [0, 0, 0]);
        assert_eq!(lut[255], [255, 255, 255]);
        assert!(lut[128][0] > lut[64][0]);
    }
}
