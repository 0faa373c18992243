mod common;

use approx::assert_abs_diff_eq;

use flocsize_core::io::report::ImageEntry;
use flocsize_core::io::{load_report, write_report, RunReport};
use flocsize_core::measure::{estimate_shape_3d, Axes, HeightPolicy};
use flocsize_core::pipeline::{analyse_directory, AnalysisConfig};
use flocsize_core::summary::summarize;

use common::{record, three_particle_levels, untrimmed_config, write_png};

// ---------------------------------------------------------------------------
// Population summary
// ---------------------------------------------------------------------------

#[test]
fn test_summary_of_empty_population() {
    let summary = summarize(&[]);
    assert_eq!(summary.particle_count, 0);
    assert!(summary.mean_pixel_area.is_none());
    assert!(summary.max_eccentricity.is_none());
    assert!(summary.min_pixel_area.is_none());
    assert!(summary.sauter_mean_diameter.is_none());
}

#[test]
fn test_summary_values() {
    let mut a = record("img", 0.0, 0.0, 16.0);
    a.pixel_diameter = 2.0;
    a.eccentricity = Some(0.2);
    let mut b = record("img", 0.0, 0.0, 64.0);
    b.pixel_diameter = 4.0;
    b.eccentricity = Some(0.6);
    b.aspect_ratio = Some(0.5);
    b.shape_3d = estimate_shape_3d(&Axes::new(20.0, 10.0), &HeightPolicy::Average(10.0));

    let summary = summarize(&[a, b]);
    assert_eq!(summary.particle_count, 2);
    assert_abs_diff_eq!(summary.mean_pixel_area.unwrap(), 40.0);
    assert_abs_diff_eq!(summary.mean_contour_area.unwrap(), 40.0);
    assert_abs_diff_eq!(summary.mean_pixel_diameter.unwrap(), 3.0);
    assert_abs_diff_eq!(summary.mean_eccentricity.unwrap(), 0.4, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.max_eccentricity.unwrap(), 0.6);
    assert_abs_diff_eq!(summary.mean_aspect_ratio.unwrap(), 0.75);
    assert_eq!(summary.min_pixel_area, Some(16));
    assert_eq!(summary.max_pixel_area, Some(64));
    // Only the second record carries 3-D values.
    assert_abs_diff_eq!(
        summary.sauter_mean_diameter.unwrap(),
        13.06791091229648,
        epsilon = 1e-9
    );
    assert_abs_diff_eq!(summary.mean_volume.unwrap(), 1047.1975511965977, epsilon = 1e-9);
}

// ---------------------------------------------------------------------------
// Run report
// ---------------------------------------------------------------------------

#[test]
fn test_report_roundtrip_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    write_png(&images, "one.png", &three_particle_levels());
    std::fs::write(images.join("two.png"), b"garbage").unwrap();

    let config = untrimmed_config();
    let batch = analyse_directory(&images, &config).unwrap();
    let report = RunReport::from_batch(&config, &batch);

    assert_eq!(
        report.images,
        vec![ImageEntry {
            source_image: "one".to_string(),
            particle_count: 3,
            candidates_total: 3,
        }]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.records.len(), 3);
    assert_eq!(report.summary.particle_count, 3);

    let path = dir.path().join("report.json");
    write_report(&report, &path).unwrap();
    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded, report);
}

#[test]
fn test_report_omits_missing_shape_3d() {
    let config = AnalysisConfig {
        estimate_height: false,
        ..untrimmed_config()
    };
    let report = RunReport::from_batch(&config, &Default::default())
        .with_records(vec![record("img", 1.0, 2.0, 9.0)]);
    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("shape_3d"));
    assert_eq!(report.summary.particle_count, 1);
}

#[test]
fn test_load_report_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(load_report(&path).is_err());
}
