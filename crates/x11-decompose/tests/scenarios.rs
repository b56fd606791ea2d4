//! End-to-end decomposition scenarios

mod common;

use approx::assert_relative_eq;
use common::*;
use x11_core::{CachePolicy, DecompositionMode, Error, MISSING};
use x11_decompose::{SeasonalSpan, StageKind, X11Config, X11Decomposer, X11Result};

fn decompose(data: &[f64], config: X11Config) -> X11Result {
    init_tracing();
    X11Decomposer::new(config)
        .expect("valid config")
        .decompose(data)
        .expect("decomposition succeeds")
}

fn additive(period: usize) -> X11Config {
    X11Config::builder(period).build().unwrap()
}

#[test]
fn flat_series_has_no_season_and_no_noise() {
    let data = flat(120, 100.0);
    let result = decompose(&data, additive(12));

    for i in 0..data.len() {
        assert_relative_eq!(result.trend[i], 100.0, epsilon = 1e-9);
        assert_relative_eq!(result.seasonal[i], 0.0, epsilon = 1e-9);
        assert_relative_eq!(result.seasonally_adjusted[i], 100.0, epsilon = 1e-9);
        assert_relative_eq!(result.irregular[i], 0.0, epsilon = 1e-9);
    }
    let d = &result.stage_d.diagnostics;
    assert_eq!(d.msr, Some(0.0));
    assert_eq!(d.seasonal_span, SeasonalSpan::S3x3);
}

#[test]
fn no_extremes_leaves_final_series_untouched() {
    let result = decompose(&flat(96, 100.0), additive(12));
    assert!(result.extreme_indices().is_empty());
    assert!(result.extreme_weights.iter().all(|&w| w == 1.0));
    assert_eq!(result.modified_irregular, result.irregular);
    assert_eq!(result.modified_seasonally_adjusted, result.seasonally_adjusted);
}

#[test]
fn pure_sinusoid_is_recovered() {
    let period = 12;
    let amplitude = 10.0;
    let data = sinusoid(120, period, 100.0, amplitude);
    let result = decompose(&data, additive(period));
    let expected = |t: usize| {
        amplitude * (2.0 * std::f64::consts::PI * (t % period) as f64 / period as f64).sin()
    };

    let years = data.len() / period;
    for position in 0..period {
        let average: f64 =
            result.seasonal.iter().skip(position).step_by(period).sum::<f64>() / years as f64;
        let error = (average - expected(position)).abs() / amplitude;
        assert!(error <= 0.15, "position {position}: {average} vs {}", expected(position));
    }

    let interior = 2 * period..data.len() - 2 * period;
    for t in interior.clone() {
        assert!((result.seasonal[t] - expected(t)).abs() / amplitude <= 0.15, "seasonal at {t}");
    }
    assert!(max_abs(&result.irregular[interior]) / amplitude <= 0.12);
    assert!(max_abs(&result.irregular) / amplitude < 0.3);

    // The sigma band only reacts to edge artifacts on noise-free input
    let core = 3 * period..data.len() - 3 * period;
    for stage in [&result.stage_b, &result.stage_c, &result.stage_d] {
        for outliers in [&stage.si_outliers, &stage.irregular_outliers] {
            assert!(outliers.flagged_indices().iter().all(|i| !core.contains(i)));
        }
    }
    assert!(result.extreme_indices().iter().all(|i| !core.contains(i)));
}

#[test]
fn injected_spike_is_flagged_and_damped() {
    let mut data = flat(96, 100.0);
    data[45] = 500.0;
    let result = decompose(&data, additive(12));

    let c = &result.stage_c.irregular_outliers;
    assert!(c.flags[45]);
    assert!(c.deviations[45] > 1.5);
    assert_eq!(c.weights[45], 0.0);
    assert!(result.extreme_indices().contains(&45));
    assert!(result.stage_b.irregular_outliers.flags[45]);

    // The corrected series of stage B keeps the spike out of later trends
    for (i, trend) in result.trend.iter().enumerate() {
        assert!((trend - 100.0).abs() < 10.0, "trend at {i}: {trend}");
    }
    assert!(result.irregular[45] > 300.0);
    assert!(result.modified_irregular[45].abs() < 0.5 * result.irregular[45].abs());
    assert!(result.modified_seasonally_adjusted[45] < result.seasonally_adjusted[45]);
    assert_relative_eq!(
        result.modified_seasonally_adjusted[45],
        result.trend[45] + result.modified_irregular[45],
        epsilon = 1e-9
    );
}

#[test]
fn unflagged_points_keep_stage_d_values() {
    let mut data = noisy_additive(96, 12, 1.0, 7);
    data[30] += 40.0;
    let result = decompose(&data, additive(12));
    let flags = &result.stage_c.irregular_outliers.flags;
    for i in 0..data.len() {
        if !flags[i] {
            assert_eq!(result.modified_irregular[i], result.irregular[i]);
            assert_eq!(result.modified_seasonally_adjusted[i], result.seasonally_adjusted[i]);
        }
    }
}

#[test]
fn multiplicative_and_log_additive_agree() {
    let data = multiplicative_series(120, 12);
    let mult = decompose(&data, X11Config::builder(12).multiplicative().build().unwrap());
    let log = decompose(&data, X11Config::builder(12).log_additive().build().unwrap());

    for i in 0..data.len() {
        assert!((mult.trend[i] / log.trend[i] - 1.0).abs() < 0.02, "trend at {i}");
        assert!(
            (mult.seasonally_adjusted[i] / log.seasonally_adjusted[i] - 1.0).abs() < 0.02,
            "seasonally adjusted at {i}"
        );
    }
    // Log-additive results are published in levels
    assert!(log.seasonal.iter().all(|s| (0.8..1.2).contains(s)));
    assert!(log.stage_d.seasonal.iter().all(|s| s.abs() < 0.2));
}

#[test]
fn components_recombine_to_the_input() {
    let data = noisy_additive(120, 12, 0.8, 11);
    let result = decompose(&data, additive(12));
    for i in 0..data.len() {
        let sum = result.trend[i] + result.seasonal[i] + result.irregular[i];
        assert_relative_eq!(sum, data[i], epsilon = 1e-9);
    }

    let data = multiplicative_series(96, 12);
    for config in [
        X11Config::builder(12).multiplicative().build().unwrap(),
        X11Config::builder(12).log_additive().build().unwrap(),
    ] {
        let result = decompose(&data, config);
        for i in 0..data.len() {
            let product = result.trend[i] * result.seasonal[i] * result.irregular[i];
            assert_relative_eq!(product, data[i], max_relative = 1e-9);
        }
    }
}

#[test]
fn unadjusted_estimate_recombines_trend_and_seasonal() {
    let data = noisy_additive(96, 12, 1.0, 13);
    let result = decompose(&data, additive(12));
    for i in 0..data.len() {
        assert_relative_eq!(
            result.unadjusted_estimate[i],
            result.trend[i] + result.seasonal[i],
            epsilon = 1e-9
        );
    }

    let data = multiplicative_series(96, 12);
    for config in [
        X11Config::builder(12).multiplicative().build().unwrap(),
        X11Config::builder(12).log_additive().build().unwrap(),
    ] {
        let result = decompose(&data, config);
        assert_eq!(result.unadjusted_estimate.len(), data.len());
        for i in 0..data.len() {
            assert_relative_eq!(
                result.unadjusted_estimate[i],
                result.trend[i] * result.seasonal[i],
                max_relative = 1e-9
            );
        }
    }
}

#[test]
fn short_series_publish_no_missing_values() {
    for len in [24, 30, 37, 60] {
        let data: Vec<f64> = sinusoid(len, 12, 100.0, 10.0)
            .iter()
            .enumerate()
            .map(|(t, v)| v + hashed_noise(t))
            .collect();
        let result = decompose(&data, additive(12));
        for series in [
            &result.trend,
            &result.seasonal,
            &result.seasonally_adjusted,
            &result.irregular,
            &result.unadjusted_estimate,
            &result.modified_seasonally_adjusted,
            &result.modified_irregular,
        ] {
            assert_eq!(series.len(), len);
            assert!(series.iter().all(|v| v.is_finite()), "length {len}");
        }
        assert!(result.stage_d.diagnostics.seasonal_span.half_width() <= len / 12);
    }
}

#[test]
fn quarterly_and_degenerate_periods() {
    let data = noisy_additive(48, 4, 0.5, 3);
    let result = decompose(&data, additive(4));
    assert!(result.seasonally_adjusted.iter().all(|v| v.is_finite()));
    let spans: Vec<usize> = result.diagnostics().iter().map(|d| d.henderson_span).collect();
    assert!(spans.iter().all(|s| [3, 5, 7].contains(s)));

    let data: Vec<f64> = (0..20).map(|t| 10.0 + 0.1 * t as f64 + hashed_noise(t)).collect();
    let result = decompose(&data, additive(1));
    assert!(max_abs(&result.seasonal) < 1e-9);
    assert!(result.trend.iter().all(|v| v.is_finite()));
}

#[test]
fn stage_diagnostics_are_recorded() {
    let data = sinusoid(120, 12, 100.0, 10.0);
    let result = decompose(&data, additive(12));
    let [b, c, d] = result.diagnostics();
    assert_eq!(b.kind, StageKind::B);
    assert_eq!(c.kind, StageKind::C);
    assert_eq!(d.kind, StageKind::D);
    assert!(b.msr.is_none() && c.msr.is_none() && d.msr.is_some());
    assert_eq!(b.seasonal_span, SeasonalSpan::S3x5);
    for diagnostics in [b, c, d] {
        assert!((9..=23).contains(&diagnostics.henderson_span));
        assert!(diagnostics.ic_ratio >= 0.0);
    }

    let summary = result.to_string();
    assert!(summary.contains("period: 12"));
    assert!(summary.contains("stage D"));
}

#[test]
fn overrides_fix_the_spans() {
    let data = noisy_additive(120, 12, 1.0, 5);
    let config = X11Config::builder(12)
        .henderson_span(9)
        .seasonal_span(SeasonalSpan::S3x9)
        .build()
        .unwrap();
    let result = decompose(&data, config);
    for d in result.diagnostics() {
        assert_eq!(d.henderson_span, 9);
        assert_eq!(d.seasonal_span, SeasonalSpan::S3x9);
        assert!(d.msr.is_none());
    }
}

#[test]
fn invalid_inputs_fail_before_any_stage() {
    init_tracing();
    let d = X11Decomposer::new(additive(12)).unwrap();
    assert!(matches!(
        d.decompose(&flat(20, 1.0)),
        Err(Error::InsufficientData { expected: 24, actual: 20 })
    ));

    let mut data = flat(48, 1.0);
    data[10] = f64::NEG_INFINITY;
    assert!(matches!(d.decompose(&data), Err(Error::InvalidInput(_))));

    let mult = X11Decomposer::new(X11Config::builder(12).multiplicative().build().unwrap()).unwrap();
    let mut data = flat(48, 1.0);
    data[7] = -2.0;
    assert!(matches!(
        mult.decompose(&data),
        Err(Error::NonPositiveData { index: 7, .. })
    ));

    let too_wide = X11Decomposer::new(
        X11Config::builder(12).seasonal_span(SeasonalSpan::S3x15).build().unwrap(),
    )
    .unwrap();
    assert!(matches!(too_wide.decompose(&flat(84, 1.0)), Err(Error::SpanTooLong { .. })));

    assert!(X11Config::builder(0).build().is_err());
}

#[test]
fn gaps_are_interpolated() {
    let mut data = sinusoid(96, 12, 100.0, 10.0);
    data[0] = MISSING;
    data[50] = MISSING;
    data[51] = MISSING;
    let result = decompose(&data, additive(12));
    assert_eq!(result.filled_indices, vec![0, 50, 51]);
    assert!(result.original.iter().all(|v| v.is_finite()));
    assert!(result.irregular.iter().all(|v| v.is_finite()));
}

#[test]
fn cache_does_not_change_results() {
    let data = noisy_additive(96, 12, 1.0, 21);
    let cached = decompose(
        &data,
        X11Config::builder(12).cache_policy(CachePolicy::Unbounded).build().unwrap(),
    );
    let uncached = decompose(
        &data,
        X11Config::builder(12).cache_policy(CachePolicy::NoCache).build().unwrap(),
    );
    assert_eq!(cached, uncached);
}

#[test]
fn many_series_match_single_runs() {
    init_tracing();
    let series = vec![
        noisy_additive(72, 12, 1.0, 1),
        sinusoid(96, 12, 50.0, 4.0),
        flat(36, 3.0),
    ];
    let decomposer = X11Decomposer::new(additive(12)).unwrap();
    let batch = decomposer.decompose_many(&series).unwrap();
    assert_eq!(batch.len(), 3);
    for (data, result) in series.iter().zip(&batch) {
        assert_eq!(result, &decomposer.decompose(data).unwrap());
    }

    let mut bad = series.clone();
    bad[1].truncate(10);
    assert!(decomposer.decompose_many(&bad).is_err());
}

#[test]
fn config_and_result_serialize() {
    let config = X11Config::builder(12)
        .log_additive()
        .sigma_limits(1.75, 2.75)
        .seasonal_span(SeasonalSpan::S3x5)
        .build()
        .unwrap();
    let json = serde_json::to_string(&config).unwrap();
    let back: X11Config = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);

    let result = decompose(&sinusoid(96, 12, 100.0, 10.0), additive(12));
    let json = serde_json::to_string(&result).unwrap();
    let back: X11Result = serde_json::from_str(&json).unwrap();
    assert_eq!(back.mode, DecompositionMode::Additive);
    assert_eq!(back.period, 12);
    assert_eq!(back.stage_d.diagnostics.seasonal_span, result.stage_d.diagnostics.seasonal_span);
    for (a, b) in back.trend.iter().zip(&result.trend) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
}
