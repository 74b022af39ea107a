// Tests for cytogate-plots
//
// Options, density maps, disc rasterization and cytof margin composition.

#[cfg(test)]
mod tests {
    use crate::colormap::{WHITE, heat_color};
    use crate::density_calc::{DensityMap, DensityMapBuilder};
    use crate::error::PlotError;
    use crate::helpers::{axis_range, density_options_from_statistics};
    use crate::layout::{InstrumentMode, PlotLayout};
    use crate::options::{AxisOptions, BasePlotOptions, DensityPlotOptions};
    use crate::plots::{DensityPlot, Plot};
    use crate::raster::{PixelBuffer, Rasterizer, disc_radius};
    use crate::render::{ProgressInfo, RenderConfig};
    use approx::assert_relative_eq;
    use cytogate_events::{ChannelStatistics, ScaleKind};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::sync::{Arc, Mutex};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const GREEN: [u8; 4] = [0, 255, 0, 255];

    fn linear_axis(max: f64) -> AxisOptions {
        AxisOptions::new()
            .range(0.0..=max)
            .build()
            .expect("Failed to build axis")
    }

    fn density_for(
        size: u32,
        axis_max: f64,
        mode: InstrumentMode,
        points: &[(f64, f64)],
    ) -> DensityMap {
        let layout = PlotLayout::new(size, size, mode);
        let axis = linear_axis(axis_max);
        let viewport = layout.viewport(&axis, &axis).expect("Failed to build viewport");
        DensityMapBuilder::new(size, size).build(points, &viewport, mode)
    }

    // ---- options ----

    #[test]
    fn test_base_options_defaults() {
        let base = BasePlotOptions::default();
        assert_eq!(base.width, 400);
        assert_eq!(base.height, 400);
        assert_eq!(base.background, WHITE);
        assert_eq!(base.title, "Density Plot");

        let built = BasePlotOptions::new().build().unwrap();
        assert_eq!(built, base);
    }

    #[test]
    fn test_base_options_reject_empty_plot() {
        let err = BasePlotOptions::new().height(0u32).build().unwrap_err();
        let err: PlotError = err.into();
        assert!(matches!(err, PlotError::Builder { .. }));
    }

    #[test]
    fn test_density_options_builder() {
        let options = DensityPlotOptions::new()
            .base(BasePlotOptions::new().width(640u32).build().unwrap())
            .x_axis(
                AxisOptions::new()
                    .parameter_index(2usize)
                    .scale(ScaleKind::Logarithmic)
                    .range(1.0..=1e5)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(options.base.width, 640);
        assert_eq!(options.base.height, 400);
        assert_eq!(options.x_axis.parameter_index, 2);
        assert_eq!(options.y_axis, AxisOptions::default());
        assert_eq!(options.instrument_mode, InstrumentMode::Standard);
    }

    #[test]
    fn test_fingerprint_tracks_rendered_settings_only() {
        let options = DensityPlotOptions::default();
        let retitled = DensityPlotOptions {
            base: BasePlotOptions {
                title: "Other".to_string(),
                ..BasePlotOptions::default()
            },
            ..DensityPlotOptions::default()
        };
        assert_eq!(options.fingerprint(), retitled.fingerprint());

        let cytof = DensityPlotOptions {
            instrument_mode: InstrumentMode::Cytof,
            ..DensityPlotOptions::default()
        };
        assert_ne!(options.fingerprint(), cytof.fingerprint());

        let rescaled = DensityPlotOptions {
            y_axis: AxisOptions {
                scale: ScaleKind::Logarithmic,
                range: 1.0..=200_000.0,
                ..AxisOptions::default()
            },
            ..DensityPlotOptions::default()
        };
        assert_ne!(options.fingerprint(), rescaled.fingerprint());
    }

    // ---- helpers ----

    #[test]
    fn test_axis_range_from_statistics() {
        let stats = ChannelStatistics::from_values([-5.0, 0.0, 2.5, 900.0]);
        assert_eq!(axis_range(&stats, ScaleKind::Linear).unwrap(), -5.0..=900.0);
        assert_eq!(
            axis_range(&stats, ScaleKind::Logarithmic).unwrap(),
            2.5..=900.0
        );

        let non_positive = ChannelStatistics::from_values([-5.0, 0.0]);
        assert!(matches!(
            axis_range(&non_positive, ScaleKind::Logarithmic),
            Err(PlotError::Configuration { .. })
        ));
    }

    #[test]
    fn test_log_axis_needs_distinct_positive_values() {
        let single = ChannelStatistics::from_values([0.0, 7.0, 7.0]);
        assert_eq!(single.positive_min, Some(7.0));
        assert!(matches!(
            axis_range(&single, ScaleKind::Logarithmic),
            Err(PlotError::Configuration { .. })
        ));
        assert_eq!(axis_range(&single, ScaleKind::Linear).unwrap(), 0.0..=7.0);
    }

    #[test]
    fn test_density_options_from_statistics() {
        let stats = vec![
            ChannelStatistics::from_values([0.0, 10.0]),
            ChannelStatistics::from_values([1.0, 50.0]),
        ];
        let options =
            density_options_from_statistics(&stats, 1, 0, ScaleKind::Logarithmic, ScaleKind::Linear)
                .unwrap()
                .instrument_mode(InstrumentMode::Cytof)
                .build()
                .unwrap();
        assert_eq!(options.x_axis.parameter_index, 1);
        assert_eq!(options.x_axis.range, 1.0..=50.0);
        assert_eq!(options.y_axis.parameter_index, 0);
        assert_eq!(options.y_axis.range, 0.0..=10.0);

        assert!(matches!(
            density_options_from_statistics(&stats, 0, 2, ScaleKind::Linear, ScaleKind::Linear),
            Err(PlotError::Configuration { .. })
        ));
    }

    // ---- layout ----

    #[test]
    fn test_cytof_margin() {
        let layout = PlotLayout::new(400, 400, InstrumentMode::Cytof);
        assert_eq!(layout.margin, 28);
        assert_eq!(layout.scatter_width(), 372);
        assert_eq!(layout.scatter_height(), 372);

        // Shorter side decides
        assert_eq!(PlotLayout::new(1000, 500, InstrumentMode::Cytof).margin, 35);
        assert_eq!(PlotLayout::new(400, 400, InstrumentMode::Standard).margin, 0);
    }

    #[test]
    fn test_viewport_rejects_log_range_from_zero() {
        let layout = PlotLayout::new(100, 100, InstrumentMode::Standard);
        let log_axis = AxisOptions {
            scale: ScaleKind::Logarithmic,
            range: 0.0..=100.0,
            ..AxisOptions::default()
        };
        assert!(matches!(
            layout.viewport(&log_axis, &linear_axis(100.0)),
            Err(PlotError::Configuration { .. })
        ));
    }

    // ---- density ----

    #[test]
    fn test_density_counts_and_max() {
        let map = density_for(
            100,
            100.0,
            InstrumentMode::Standard,
            &[(10.0, 10.0), (10.0, 10.0), (10.0, 10.0), (50.0, 50.0)],
        );
        assert_eq!(map.count(90, 10), 3);
        assert_eq!(map.count(50, 50), 1);
        assert_eq!(map.max_density, 3);
        assert_eq!(map.total(), 4);
        assert_eq!(map.points.len(), 4);
        assert_eq!(map.zero_density_x, None);
        assert_eq!(map.zero_density_y, None);
        assert_relative_eq!(map.normalized(50, 50), 1.0 / 3.0);
    }

    #[test]
    fn test_out_of_range_points_are_clamped() {
        let map = density_for(
            100,
            100.0,
            InstrumentMode::Standard,
            &[(-50.0, 500.0), (1e9, -1e9)],
        );
        assert_eq!(map.count(0, 0), 1);
        assert_eq!(map.count(99, 99), 1);
        assert_eq!(map.total(), 2);
    }

    #[test]
    fn test_density_total_matches_input() {
        let mut rng = StdRng::seed_from_u64(17);
        let points: Vec<(f64, f64)> = (0..5_000)
            .map(|_| {
                (
                    rng.random_range(-50.0..300.0),
                    rng.random_range(-50.0..300.0),
                )
            })
            .collect();

        let map = density_for(120, 250.0, InstrumentMode::Cytof, &points);
        assert_eq!(map.total(), points.len() as u64);
        assert_eq!(map.max_density, map.counts.iter().copied().max().unwrap());
    }

    #[test]
    fn test_log_axis_zero_lands_on_floor() {
        let layout = PlotLayout::new(100, 100, InstrumentMode::Standard);
        let log_axis = AxisOptions {
            scale: ScaleKind::Logarithmic,
            range: 1.0..=1000.0,
            ..AxisOptions::default()
        };
        let viewport = layout.viewport(&log_axis, &log_axis).unwrap();
        let map = DensityMapBuilder::new(100, 100).build(
            &[(0.0, 0.0), (-4.0, 1.0)],
            &viewport,
            InstrumentMode::Standard,
        );
        assert_eq!(map.count(99, 0), 2);
    }

    #[test]
    fn test_cytof_zero_partition() {
        // margin 7, scatter body 93 x 93 over 0..=93
        let map = density_for(
            100,
            93.0,
            InstrumentMode::Cytof,
            &[(0.0, 0.0), (0.0, 50.0), (20.0, 0.0), (30.0, 30.0)],
        );
        assert_eq!((map.width, map.height), (93, 93));
        assert_eq!(map.double_channel_zeroes, 1);

        let zero_x = map.zero_density_x.as_ref().unwrap();
        let zero_y = map.zero_density_y.as_ref().unwrap();
        assert_eq!(zero_x.len(), 93);
        assert_eq!(zero_y.len(), 93);
        assert_eq!(zero_x[43], 1);
        assert_eq!(zero_y[20], 1);

        let margin_total: u32 = zero_x.iter().chain(zero_y.iter()).sum();
        assert_eq!(margin_total + map.double_channel_zeroes, 3);
        // zero events stay in the scatter grid too
        assert_eq!(map.total(), 4);
        assert_eq!(map.max_margin_density(), 1);
    }

    // ---- raster ----

    #[test]
    fn test_disc_radius() {
        assert_eq!(disc_radius(400, 400), 1);
        assert_eq!(disc_radius(100, 100), 1);
        assert_eq!(disc_radius(1000, 1000), 2);
        assert_eq!(disc_radius(1500, 1500), 3);
    }

    #[test]
    fn test_disc_boundary_is_strict() {
        let mut buffer = PixelBuffer::new(10, 10, WHITE);
        buffer.draw_disc(5, 5, 2, RED);

        assert_eq!(buffer.get_pixel(5, 5), Some(RED));
        assert_eq!(buffer.get_pixel(6, 6), Some(RED));
        assert_eq!(buffer.get_pixel(4, 4), Some(RED));
        // dx² + dy² == r²
        assert_eq!(buffer.get_pixel(3, 5), Some(WHITE));
        assert_eq!(buffer.get_pixel(5, 3), Some(WHITE));
        // outside the scanned 2r box
        assert_eq!(buffer.get_pixel(7, 5), Some(WHITE));
        assert_eq!(buffer.get_pixel(4, 3), Some(WHITE));

        let painted = buffer
            .as_bytes()
            .chunks_exact(4)
            .filter(|p| *p == RED)
            .count();
        assert_eq!(painted, 9);
    }

    #[test]
    fn test_disc_clipped_at_edges() {
        let mut buffer = PixelBuffer::new(4, 4, WHITE);
        buffer.draw_disc(0, 0, 2, RED);
        buffer.draw_disc(10, 10, 2, RED);
        assert_eq!(buffer.get_pixel(0, 0), Some(RED));
        assert_eq!(buffer.get_pixel(1, 1), Some(RED));
        assert_eq!(buffer.get_pixel(3, 3), Some(WHITE));
        assert_eq!(buffer.get_pixel(4, 0), None);
    }

    #[test]
    fn test_heat_colors() {
        assert_eq!(heat_color(0.0), [0, 0, 255, 255]);
        assert_eq!(heat_color(0.25), [0, 255, 255, 255]);
        assert_eq!(heat_color(0.5), GREEN);
        assert_eq!(heat_color(1.0), RED);
        assert_eq!(heat_color(2.0), RED);
        assert_eq!(heat_color(f64::NAN), [0, 0, 255, 255]);
    }

    #[test]
    fn test_standard_render_is_scatter_only() {
        let map = density_for(50, 50.0, InstrumentMode::Standard, &[(25.0, 25.0)]);
        let pixels = Rasterizer::new(WHITE)
            .render(&map, &mut RenderConfig::default())
            .unwrap();
        assert_eq!((pixels.width(), pixels.height()), (50, 50));
        assert_eq!(pixels.get_pixel(25, 25), Some(RED));
        assert_eq!(pixels.get_pixel(24, 25), Some(WHITE));
    }

    #[test]
    fn test_cytof_composition() {
        // margin 7: left margin x < 7, bottom margin y >= 93
        let map = density_for(
            100,
            93.0,
            InstrumentMode::Cytof,
            &[(0.0, 0.0), (0.0, 0.0), (0.0, 50.0)],
        );
        let pixels = Rasterizer::new(WHITE)
            .render(&map, &mut RenderConfig::default())
            .unwrap();
        assert_eq!((pixels.width(), pixels.height()), (100, 100));

        // corner holds the largest margin count
        for (x, y) in [(0, 93), (6, 99), (3, 96)] {
            assert_eq!(pixels.get_pixel(x, y), Some(RED));
        }
        // left margin row of the x-zero event, half the margin max
        assert_eq!(pixels.get_pixel(0, 43), Some(GREEN));
        assert_eq!(pixels.get_pixel(6, 43), Some(GREEN));
        // empty margin buckets keep the background
        assert_eq!(pixels.get_pixel(0, 10), Some(WHITE));
        assert_eq!(pixels.get_pixel(7, 93), Some(WHITE));
        assert_eq!(pixels.get_pixel(99, 99), Some(WHITE));
        // scatter body shifted right by the margin
        assert_eq!(pixels.get_pixel(7, 92), Some(RED));
        assert_eq!(pixels.get_pixel(7, 43), Some(GREEN));
        assert_eq!(pixels.get_pixel(50, 50), Some(WHITE));
    }

    #[test]
    fn test_progress_reporting() {
        let reports: Arc<Mutex<Vec<ProgressInfo>>> = Arc::default();
        let sink = Arc::clone(&reports);
        let mut config = RenderConfig::with_progress(Box::new(move |info| {
            sink.lock().unwrap().push(info);
            Ok(())
        }));

        let points = vec![(10.0, 10.0); 2_500];
        let map = density_for(100, 100.0, InstrumentMode::Standard, &points);
        Rasterizer::new(WHITE).render(&map, &mut config).unwrap();

        let reports = reports.lock().unwrap();
        let drawn: Vec<usize> = reports.iter().map(|r| r.discs_drawn).collect();
        assert_eq!(drawn, vec![1_000, 2_000, 2_500]);
        assert_relative_eq!(reports[0].percent, 40.0);
        assert_relative_eq!(reports[2].percent, 100.0);
    }

    #[test]
    fn test_failing_progress_callback_does_not_stop_render() {
        let mut config =
            RenderConfig::with_progress(Box::new(|_| Err("receiver closed".into())));
        let map = density_for(20, 20.0, InstrumentMode::Standard, &[(10.0, 10.0)]);
        let pixels = Rasterizer::new(WHITE).render(&map, &mut config).unwrap();
        assert_eq!(pixels.get_pixel(10, 10), Some(RED));
    }

    // ---- plot ----

    #[test]
    fn test_density_plot_png_round_trip() {
        let axis = linear_axis(100.0);
        let options = DensityPlotOptions::new()
            .base(BasePlotOptions::new().width(64u32).height(48u32).build().unwrap())
            .x_axis(axis.clone())
            .y_axis(axis)
            .build()
            .unwrap();
        let pixels = DensityPlot::new()
            .render(vec![(50.0, 50.0)], &options, &mut RenderConfig::default())
            .unwrap();

        let png = pixels.to_png().unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(decoded.as_raw().as_slice(), pixels.as_bytes());
    }

    #[test]
    fn test_density_plot_rejects_empty_size() {
        let options = DensityPlotOptions {
            base: BasePlotOptions {
                width: 0,
                ..BasePlotOptions::default()
            },
            ..DensityPlotOptions::default()
        };
        let result = DensityPlot::new().render(vec![], &options, &mut RenderConfig::default());
        assert!(matches!(result, Err(PlotError::Configuration { .. })));
    }

    #[test]
    fn test_empty_population_renders_background() {
        let options = DensityPlotOptions {
            instrument_mode: InstrumentMode::Cytof,
            ..DensityPlotOptions::default()
        };
        let pixels = DensityPlot::new()
            .render(vec![], &options, &mut RenderConfig::default())
            .unwrap();
        assert!(pixels.as_bytes().chunks_exact(4).all(|p| p == WHITE));
    }
}
