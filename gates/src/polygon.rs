//! Containment of data-space points in polygon gates.
//!
//! A gate is drawn in pixels but events live in data space, so a
//! [`PreparedGate`] converts the polygon and both zero bands once through the
//! gate's own scales. Every event is then classified by an ordered decision
//! list where the first rule that fires decides:
//!
//! 1. both zero inclusions on and the event is `(0, 0)`: excluded
//! 2. x zero band defined and enabled, `x == 0` and `y` inside the band: included
//! 3. y zero band defined and enabled, `y == 0` and `x` inside the band: included
//! 4. otherwise: even-odd point-in-polygon
//!
//! Double-zero events are never trusted against a polygon that came through a
//! logarithmic scale, whose domain floor is the channel's smallest positive
//! value rather than zero.

use crate::error::{GateError, Result};
use crate::types::Gate;
use cytogate_events::{ChannelStatistics, ScaleSpec};
use geo::{BoundingRect, MultiPoint, Rect};
use std::sync::Arc;

/// Which rule decided an event's membership in a gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Containment {
    /// `(0, 0)` with both zero inclusions enabled
    ExcludedDoubleZero,
    /// `x == 0` and `y` within the x-channel zero band
    IncludedByXBand,
    /// `y == 0` and `x` within the y-channel zero band
    IncludedByYBand,
    /// Result of the point-in-polygon test
    Polygon(bool),
}

impl Containment {
    pub fn is_inside(self) -> bool {
        match self {
            Self::ExcludedDoubleZero => false,
            Self::IncludedByXBand | Self::IncludedByYBand => true,
            Self::Polygon(inside) => inside,
        }
    }
}

/// A gate with its geometry converted to data space, ready to test events.
#[derive(Debug, Clone)]
pub struct PreparedGate {
    id: Arc<str>,
    x_index: usize,
    y_index: usize,
    vertices: Vec<(f64, f64)>,
    bounds: Option<Rect<f64>>,
    include_x_zeroes: bool,
    include_y_zeroes: bool,
    x_zero_band: Option<(f64, f64)>,
    y_zero_band: Option<(f64, f64)>,
}

impl PreparedGate {
    /// Convert a gate through explicit scales.
    ///
    /// Vertices are inverted through the scale of their own axis. The x-channel
    /// zero band describes where on the y axis an `x == 0` event sits, so it goes
    /// through `y_scale`; the y-channel band goes through `x_scale`. All values
    /// are rounded to two decimal places, and each band is ordered low to high
    /// (an inverted y pixel range flips it).
    pub fn new(gate: &Gate, x_scale: &ScaleSpec, y_scale: &ScaleSpec) -> Self {
        let vertices: Vec<(f64, f64)> = gate
            .polygon_vertices
            .iter()
            .map(|&(px, py)| (x_scale.invert_rounded(px), y_scale.invert_rounded(py)))
            .collect();
        let bounds = MultiPoint::from(vertices.clone()).bounding_rect();

        Self {
            id: gate.id.clone(),
            x_index: gate.x_parameter_index,
            y_index: gate.y_parameter_index,
            vertices,
            bounds,
            include_x_zeroes: gate.include_x_channel_zeroes,
            include_y_zeroes: gate.include_y_channel_zeroes,
            x_zero_band: gate.x_zero_cutoff.map(|band| invert_band(band, y_scale)),
            y_zero_band: gate.y_zero_cutoff.map(|band| invert_band(band, x_scale)),
        }
    }

    /// Convert a gate through the scales implied by its plot frame and the
    /// statistics of its two channels.
    ///
    /// # Errors
    /// - `GateError::MissingParameter` if either channel index has no statistics
    /// - `GateError::Configuration` if a scale domain is invalid (e.g. a log axis
    ///   on a channel without positive values)
    pub fn from_statistics(gate: &Gate, statistics: &[ChannelStatistics]) -> Result<Self> {
        let channel = |index: usize| {
            statistics.get(index).ok_or_else(|| {
                GateError::missing_parameter(
                    format!("channel {index}"),
                    format!(
                        "gate '{}' ({} channels available)",
                        gate.display_name(),
                        statistics.len()
                    ),
                )
            })
        };
        let x_stats = channel(gate.x_parameter_index)?;
        let y_stats = channel(gate.y_parameter_index)?;

        let context = || format!("gate '{}'", gate.display_name());
        let x_scale =
            ScaleSpec::for_channel(gate.x_scale_kind, x_stats, (0.0, gate.plot_width))
                .map_err(|e| GateError::from(e).with_context(context()))?;
        let y_scale =
            ScaleSpec::for_channel(gate.y_scale_kind, y_stats, (gate.plot_height, 0.0))
                .map_err(|e| GateError::from(e).with_context(context()))?;

        Ok(Self::new(gate, &x_scale, &y_scale))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn x_index(&self) -> usize {
        self.x_index
    }

    pub fn y_index(&self) -> usize {
        self.y_index
    }

    /// Polygon vertices in data space
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    pub fn x_zero_band(&self) -> Option<(f64, f64)> {
        self.x_zero_band
    }

    pub fn y_zero_band(&self) -> Option<(f64, f64)> {
        self.y_zero_band
    }

    /// Decide membership of a data-space point and report the deciding rule
    pub fn classify(&self, (x, y): (f64, f64)) -> Containment {
        if self.include_x_zeroes && self.include_y_zeroes && x == 0.0 && y == 0.0 {
            return Containment::ExcludedDoubleZero;
        }
        if self.include_x_zeroes && x == 0.0 && within(self.x_zero_band, y) {
            return Containment::IncludedByXBand;
        }
        if self.include_y_zeroes && y == 0.0 && within(self.y_zero_band, x) {
            return Containment::IncludedByYBand;
        }
        Containment::Polygon(self.polygon_contains(x, y))
    }

    #[inline]
    pub fn contains(&self, point: (f64, f64)) -> bool {
        self.classify(point).is_inside()
    }

    fn polygon_contains(&self, x: f64, y: f64) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        match self.bounds {
            Some(rect)
                if x < rect.min().x || x > rect.max().x || y < rect.min().y || y > rect.max().y =>
            {
                false
            }
            _ => point_in_polygon(x, y, &self.vertices),
        }
    }
}

fn invert_band((low, high): (f64, f64), scale: &ScaleSpec) -> (f64, f64) {
    let a = scale.invert_rounded(low);
    let b = scale.invert_rounded(high);
    (a.min(b), a.max(b))
}

#[inline]
fn within(band: Option<(f64, f64)>, value: f64) -> bool {
    band.is_some_and(|(low, high)| low <= value && value <= high)
}

/// Point-in-polygon using ray casting algorithm
pub fn point_in_polygon(x: f64, y: f64, polygon: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = polygon.len();

    for i in 0..n {
        let (x1, y1) = polygon[i];
        let (x2, y2) = polygon[(i + 1) % n];

        if ((y1 > y) != (y2 > y)) && (x < (x2 - x1) * (y - y1) / (y2 - y1) + x1) {
            inside = !inside;
        }
    }

    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use cytogate_events::ScaleKind;

    fn square_gate() -> Gate {
        Gate::polygon(
            "square",
            0,
            1,
            vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)],
        )
    }

    fn linear_200_to_100() -> ScaleSpec {
        ScaleSpec::linear((0.0, 200.0), (0.0, 100.0)).unwrap()
    }

    #[test]
    fn test_square_gate_scenario() {
        let scale = linear_200_to_100();
        let gate = PreparedGate::new(&square_gate(), &scale, &scale);
        assert_eq!(
            gate.vertices(),
            &[(0.0, 0.0), (200.0, 0.0), (200.0, 200.0), (0.0, 200.0)]
        );

        assert!(gate.contains((50.0, 50.0)));
        assert!(gate.contains((150.0, 150.0)));
        assert!(!gate.contains((250.0, 250.0)));
    }

    #[test]
    fn test_double_zero_excluded_before_bands() {
        let scale = linear_200_to_100();
        let gate = square_gate()
            .with_x_zero_cutoff(0.0, 100.0)
            .with_y_zero_cutoff(0.0, 100.0)
            .with_zero_inclusion(true, true);
        let gate = PreparedGate::new(&gate, &scale, &scale);

        // (0, 0) lies on the polygon's corner and inside both bands, still excluded
        assert_eq!(gate.classify((0.0, 0.0)), Containment::ExcludedDoubleZero);
        assert_eq!(gate.classify((0.0, 120.0)), Containment::IncludedByXBand);
        assert_eq!(gate.classify((120.0, 0.0)), Containment::IncludedByYBand);
    }

    #[test]
    fn test_x_band_uses_y_scale() {
        let x_scale = ScaleSpec::linear((0.0, 1000.0), (0.0, 100.0)).unwrap();
        let y_scale = ScaleSpec::linear((0.0, 50.0), (100.0, 0.0)).unwrap();
        // Polygon well away from the x == 0 line
        let gate = Gate::polygon(
            "far",
            0,
            1,
            vec![(60.0, 10.0), (90.0, 10.0), (90.0, 40.0), (60.0, 40.0)],
        )
        .with_x_zero_cutoff(20.0, 60.0)
        .with_zero_inclusion(true, false);
        let gate = PreparedGate::new(&gate, &x_scale, &y_scale);

        // Pixels 20..60 on an inverted 0..50 y axis are data 40..20
        assert_eq!(gate.x_zero_band(), Some((20.0, 40.0)));
        assert_eq!(gate.classify((0.0, 20.0)), Containment::IncludedByXBand);
        assert_eq!(gate.classify((0.0, 40.0)), Containment::IncludedByXBand);
        assert_eq!(gate.classify((0.0, 40.01)), Containment::Polygon(false));
        // Only exact zeroes use the band
        assert_eq!(gate.classify((0.001, 30.0)), Containment::Polygon(false));
    }

    #[test]
    fn test_bands_ignored_when_inclusion_disabled() {
        let scale = linear_200_to_100();
        let gate = Gate::polygon(
            "inner",
            0,
            1,
            vec![(50.0, 50.0), (100.0, 50.0), (100.0, 100.0), (50.0, 100.0)],
        )
        .with_x_zero_cutoff(0.0, 100.0)
        .with_y_zero_cutoff(0.0, 100.0);
        let gate = PreparedGate::new(&gate, &scale, &scale);

        assert_eq!(gate.classify((0.0, 0.0)), Containment::Polygon(false));
        assert_eq!(gate.classify((0.0, 150.0)), Containment::Polygon(false));
        assert_eq!(gate.classify((150.0, 0.0)), Containment::Polygon(false));
        assert_eq!(gate.classify((150.0, 150.0)), Containment::Polygon(true));
    }

    #[test]
    fn test_zero_points_use_plain_polygon_when_flags_off() {
        let scale = linear_200_to_100();
        // Polygon straddles both axes
        let gate = Gate::polygon(
            "straddle",
            0,
            1,
            vec![(-10.0, -10.0), (50.0, -10.0), (50.0, 50.0), (-10.0, 50.0)],
        );
        let gate = PreparedGate::new(&gate, &scale, &scale);
        assert_eq!(gate.classify((0.0, 0.0)), Containment::Polygon(true));
        assert_eq!(gate.classify((0.0, 300.0)), Containment::Polygon(false));
    }

    #[test]
    fn test_degenerate_polygons_contain_nothing() {
        let scale = linear_200_to_100();
        let line = Gate::polygon("line", 0, 1, vec![(0.0, 0.0), (100.0, 100.0)]);
        let line = PreparedGate::new(&line, &scale, &scale);
        assert_eq!(line.classify((50.0, 50.0)), Containment::Polygon(false));

        let empty = PreparedGate::new(&Gate::polygon("empty", 0, 1, vec![]), &scale, &scale);
        assert!(!empty.contains((1.0, 1.0)));
    }

    #[test]
    fn test_vertices_rounded_to_two_places() {
        let x_scale = ScaleSpec::linear((0.0, 1.0), (0.0, 3.0)).unwrap();
        let gate = Gate::polygon("thirds", 0, 1, vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0)]);
        let gate = PreparedGate::new(&gate, &x_scale, &x_scale);
        assert_eq!(gate.vertices()[0], (0.33, 0.33));
        assert_eq!(gate.vertices()[1], (0.67, 0.33));
    }

    #[test]
    fn test_from_statistics_builds_gate_frame_scales() {
        let stats = vec![
            ChannelStatistics {
                min: 0.0,
                max: 400.0,
                positive_min: Some(1.0),
            },
            ChannelStatistics {
                min: 0.0,
                max: 1000.0,
                positive_min: Some(1.0),
            },
        ];
        // Upper half of a 400px plot with a log y axis from 1 to 1000
        let gate = Gate::polygon(
            "upper",
            0,
            1,
            vec![(0.0, 0.0), (400.0, 0.0), (400.0, 200.0), (0.0, 200.0)],
        )
        .with_scales(ScaleKind::Linear, ScaleKind::Logarithmic);
        let prepared = PreparedGate::from_statistics(&gate, &stats).unwrap();

        let ys: Vec<f64> = prepared.vertices().iter().map(|v| v.1).collect();
        assert_eq!(ys, vec![1000.0, 1000.0, 31.62, 31.62]);
        assert!(prepared.contains((200.0, 500.0)));
        assert!(!prepared.contains((200.0, 10.0)));
    }

    #[test]
    fn test_from_statistics_errors() {
        let stats = vec![ChannelStatistics {
            min: -5.0,
            max: 0.0,
            positive_min: None,
        }];
        let gate = Gate::polygon("g", 0, 3, vec![]);
        assert!(matches!(
            PreparedGate::from_statistics(&gate, &stats),
            Err(GateError::MissingParameter { .. })
        ));

        let log_gate = Gate::polygon("g", 0, 0, vec![])
            .with_scales(ScaleKind::Logarithmic, ScaleKind::Linear);
        assert!(matches!(
            PreparedGate::from_statistics(&log_gate, &stats),
            Err(GateError::Configuration { .. })
        ));
    }

    #[test]
    fn test_point_in_polygon_concave() {
        // L shape
        let poly = [
            (0.0, 0.0),
            (10.0, 0.0),
            (10.0, 4.0),
            (4.0, 4.0),
            (4.0, 10.0),
            (0.0, 10.0),
        ];
        assert!(point_in_polygon(2.0, 8.0, &poly));
        assert!(point_in_polygon(8.0, 2.0, &poly));
        assert!(!point_in_polygon(8.0, 8.0, &poly));
    }
}
