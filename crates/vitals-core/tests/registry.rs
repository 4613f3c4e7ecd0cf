#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use vitals_core::{MetricKind, MetricRegistry, MetricValue, VitalsError};

const ROOT: &[(&str, &str)] = &[("route", "/"), ("method", "GET")];

#[test]
fn counter_equals_sum_of_deltas() {
    let reg = MetricRegistry::new();
    let deltas = [0_i64, 1, 5, 17, 0, 230];
    for d in deltas {
        reg.increment_by("work_total", &[], d).unwrap();
    }
    assert_eq!(reg.counter_value("work_total", &[]), Some(deltas.iter().sum::<i64>() as u64));
}

#[test]
fn negative_delta_is_rejected_without_mutation() {
    let reg = MetricRegistry::new();
    reg.increment_by("work_total", ROOT, 4).unwrap();
    let before = reg.render();

    let err = reg.increment_by("work_total", ROOT, -1).expect_err("must fail");
    assert!(matches!(err, VitalsError::InvalidDelta(-1)));
    assert_eq!(err.client_code().as_str(), "INVALID_METRIC");
    assert_eq!(reg.render(), before);

    // rejected before the series would be created
    assert!(reg.increment_by("fresh_total", &[], -3).is_err());
    assert_eq!(reg.counter_value("fresh_total", &[]), None);
    assert_eq!(reg.len(), 1);
}

#[test]
fn non_finite_gauge_keeps_prior_value() {
    let reg = MetricRegistry::new();
    reg.set_gauge("temperature", &[], 21.5).unwrap();
    for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = reg.set_gauge("temperature", &[], bad).expect_err("must fail");
        assert!(matches!(err, VitalsError::NonFiniteValue(_)));
    }
    assert_eq!(reg.gauge_value("temperature", &[]), Some(21.5));
}

#[test]
fn gauge_overwrites() {
    let reg = MetricRegistry::new();
    reg.set_gauge("queue_depth", &[], 10.0).unwrap();
    reg.set_gauge("queue_depth", &[], -4.5).unwrap();
    assert_eq!(reg.gauge_value("queue_depth", &[]), Some(-4.5));
}

#[test]
fn invalid_names_are_rejected() {
    let reg = MetricRegistry::new();
    assert!(matches!(reg.increment("bad-name", &[]), Err(VitalsError::InvalidName(_))));
    assert!(matches!(
        reg.set_gauge("ok", &[("0bad", "v")], 1.0),
        Err(VitalsError::InvalidName(_))
    ));
    assert!(matches!(
        reg.increment("ok_total", &[("a", "1"), ("a", "2")]),
        Err(VitalsError::DuplicateLabel(_))
    ));
    assert!(reg.is_empty());
}

#[test]
fn one_kind_per_name() {
    let reg = MetricRegistry::new();
    reg.increment("mixed", &[("a", "1")]).unwrap();
    let err = reg.set_gauge("mixed", &[("a", "2")], 1.0).expect_err("must fail");
    match err {
        VitalsError::KindMismatch { existing, requested, .. } => {
            assert_eq!(existing, MetricKind::Counter);
            assert_eq!(requested, MetricKind::Gauge);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(reg.len(), 1);
}

#[test]
fn unknown_metric_reads_as_absent() {
    let reg = MetricRegistry::new();
    assert_eq!(reg.counter_value("nope", &[]), None);
    assert_eq!(reg.gauge_value("nope", &[]), None);
    assert_eq!(reg.counter_value("not a name", &[]), None);
}

#[test]
fn render_is_deterministic() {
    let reg = MetricRegistry::new();
    reg.increment("requests_total", &[("route", "/b"), ("method", "GET")]).unwrap();
    reg.increment("requests_total", &[("route", "/a"), ("method", "POST")]).unwrap();
    reg.set_gauge("uptime_seconds", &[], 3.25).unwrap();
    reg.increment("errors_total", &[]).unwrap();

    let first = reg.render();
    let second = reg.render();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "errors_total 1\n\
         requests_total{route=\"/a\",method=\"POST\"} 1\n\
         requests_total{route=\"/b\",method=\"GET\"} 1\n\
         uptime_seconds 3.25\n"
    );
}

#[test]
fn snapshot_is_point_in_time() {
    let reg = MetricRegistry::new();
    reg.increment("hits_total", &[]).unwrap();
    let snap = reg.snapshot();
    reg.increment("hits_total", &[]).unwrap();

    assert_eq!(snap.len(), 1);
    assert_eq!(snap.samples()[0].value, MetricValue::Counter(1));
    assert_eq!(snap.render(), "hits_total 1\n");
    assert_eq!(reg.render(), "hits_total 2\n");
}

#[test]
fn concurrent_increments_lose_nothing() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 10_000;

    let reg = Arc::new(MetricRegistry::new());
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            let reg = Arc::clone(&reg);
            s.spawn(move || {
                for _ in 0..PER_THREAD {
                    reg.increment("requests_total", ROOT).unwrap();
                }
            });
        }
        // a concurrent reader must only ever see whole values
        let reader = Arc::clone(&reg);
        s.spawn(move || {
            let mut last = 0;
            for _ in 0..1_000 {
                let now = reader.counter_value("requests_total", ROOT).unwrap_or(0);
                assert!(now >= last);
                last = now;
            }
        });
    });

    assert_eq!(
        reg.counter_value("requests_total", ROOT),
        Some((THREADS * PER_THREAD) as u64)
    );
}

#[test]
fn scenario_request_counter_line() {
    let reg = MetricRegistry::new();
    for _ in 0..3 {
        reg.increment("requests_total", ROOT).unwrap();
    }
    let out = reg.render();
    assert!(out.lines().any(|l| l == "requests_total{route=\"/\",method=\"GET\"} 3"), "{out}");
}

#[test]
fn scenario_uptime_gauge_line() {
    let reg = MetricRegistry::new();
    reg.set_gauge("uptime_seconds", &[], 12.5).unwrap();
    let out = reg.render();
    assert!(out.lines().any(|l| l == "uptime_seconds 12.5"), "{out}");
}
