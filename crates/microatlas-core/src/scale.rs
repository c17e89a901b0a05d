//! Physical scale: recovering a pixel-to-physical-unit conversion from
//! multiscale metadata, and picking human-friendly scale-bar lengths.
//!
//! Any structural absence in the metadata (missing multiscales, axes, units,
//! transforms) means "no physical scale is derivable"; nothing here errors.

use serde_json::Value;

use crate::consts::NICE_STEPS;

/// Real-world length of one image pixel at native resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicalScale {
    pub pixel_size: f64,
    pub unit: String,
}

/// Parse the first multiscale entry's axis list and coordinate transforms.
///
/// The x axis must carry a unit; the pixel size combines the x scale factor of
/// the first per-level transform with any group-level scale transform.
pub fn extract_physical_scale(metadata: &Value) -> Option<PhysicalScale> {
    let ms = metadata.get("multiscales")?.get(0)?;

    let axes = ms.get("axes").and_then(Value::as_array)?;
    let x_idx = axes.iter().position(is_x_axis)?;
    let unit = axes[x_idx].get("unit")?.as_str()?.to_string();

    let per_level = ms
        .get("datasets")
        .and_then(|d| d.get(0))
        .and_then(|d| d.get("coordinateTransformations"))
        .and_then(|t| find_scale_transform(t, x_idx));
    let group_level = ms
        .get("coordinateTransformations")
        .and_then(|t| find_scale_transform(t, x_idx));

    let mut pixel_size = per_level.unwrap_or(1.0);
    if let Some(group) = group_level {
        pixel_size *= group;
    }

    Some(PhysicalScale { pixel_size, unit })
}

fn is_x_axis(axis: &Value) -> bool {
    match axis {
        Value::String(s) => s == "x",
        Value::Object(o) => {
            o.get("type").and_then(Value::as_str) == Some("space")
                && o.get("name").and_then(Value::as_str) == Some("x")
        }
        _ => false,
    }
}

fn find_scale_transform(transforms: &Value, x_idx: usize) -> Option<f64> {
    transforms
        .as_array()?
        .iter()
        .find(|t| t.get("type").and_then(Value::as_str) == Some("scale"))?
        .get("scale")?
        .get(x_idx)?
        .as_f64()
}

/// Largest step from the nice-step table not exceeding `max_physical`, or the
/// smallest step when none qualifies.
pub fn nice_scale_value(max_physical: f64) -> f64 {
    let mut best = NICE_STEPS[0];
    for &step in NICE_STEPS.iter() {
        if step <= max_physical {
            best = step;
        } else {
            break;
        }
    }
    best
}

/// Canonical short display form for known unit names; unknown units pass
/// through verbatim.
pub fn unit_label(unit: &str) -> &str {
    match unit {
        "micrometer" | "micrometre" => "\u{b5}m",
        "nanometer" | "nanometre" => "nm",
        "millimeter" | "millimetre" => "mm",
        "centimeter" | "centimetre" => "cm",
        "meter" | "metre" => "m",
        "angstrom" => "\u{c5}",
        other => other,
    }
}

/// Scale-bar geometry at a given zoom: the label to print and the bar width in
/// screen pixels. Recomputed every frame from live zoom.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBarLayout {
    pub label: String,
    pub width_px: f32,
}

pub fn scale_bar_layout(scale: &PhysicalScale, zoom: f32, max_width: f32) -> ScaleBarLayout {
    let screen_scale = f64::from(zoom).exp2();
    let phys_per_screen_px = scale.pixel_size / screen_scale;

    let max_physical = phys_per_screen_px * f64::from(max_width);
    let nice = nice_scale_value(max_physical);

    ScaleBarLayout {
        label: format!("{} {}", nice, unit_label(&scale.unit)),
        width_px: (nice / phys_per_screen_px) as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_value_picks_largest_step_below_bound() {
        assert_eq!(nice_scale_value(37.0), 20.0);
        assert_eq!(nice_scale_value(100.0), 100.0);
        assert_eq!(nice_scale_value(99_999.0), 10_000.0);
    }

    #[test]
    fn nice_value_floors_to_smallest_step() {
        assert_eq!(nice_scale_value(0.5), 1.0);
    }

    #[test]
    fn unit_labels_canonicalize_known_variants() {
        assert_eq!(unit_label("micrometer"), "\u{b5}m");
        assert_eq!(unit_label("micrometre"), "\u{b5}m");
        assert_eq!(unit_label("parsec"), "parsec");
    }
}
