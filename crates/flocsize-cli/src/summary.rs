use std::path::Path;

use console::Style;
use flocsize_core::dedup::{DedupConfig, DedupOutcome};
use flocsize_core::detection::ThresholdMode;
use flocsize_core::io::RunReport;
use flocsize_core::pipeline::AnalysisConfig;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
    warning: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
            warning: Style::new().red().bold(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn optional(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{v:.precision$}"),
        None => "n/a".to_string(),
    }
}

pub fn print_analysis_summary(config: &AnalysisConfig, dir: &Path) {
    let s = Styles::new();
    print_title(&s, "Floc Analysis");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Input"),
        s.path.apply_to(dir.display())
    );
    if let Some(ref debug_dir) = config.debug_dir {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Debug images"),
            s.path.apply_to(debug_dir.display())
        );
    }
    println!();

    // Segmentation
    println!("  {}", s.header.apply_to("Segmentation"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Threshold"),
        s.method.apply_to(config.segmentation.threshold_mode)
    );
    if config.segmentation.threshold_mode == ThresholdMode::Fixed {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Level"),
            s.value.apply_to(config.segmentation.threshold_value)
        );
    }
    println!();

    // Acceptance
    println!("  {}", s.header.apply_to("Acceptance"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Clarity"),
        s.value.apply_to(format!("> {}", config.clarity_threshold))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Area"),
        s.value
            .apply_to(format!("{} < px < {}", config.area_min, config.area_max))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Scale"),
        s.value.apply_to(format!("{} \u{b5}m/px", config.pixel_scale))
    );
    println!();

    // 3-D
    print!("  {:<14}", s.header.apply_to("3-D shape"));
    match (config.average_height, config.estimate_height) {
        (Some(h), _) => println!("{}", s.method.apply_to(format!("average height {h} px"))),
        (None, true) => println!("{}", s.method.apply_to("height estimated per particle")),
        (None, false) => println!("{}", s.disabled.apply_to("disabled")),
    }
    println!();
}

pub fn print_run_summary(report: &RunReport) {
    let s = Styles::new();
    let sum = &report.summary;
    print_title(&s, "Results");

    println!(
        "  {:<22}{}",
        s.label.apply_to("Images"),
        s.value.apply_to(report.images.len())
    );
    println!(
        "  {:<22}{}",
        s.label.apply_to("Particles"),
        s.value.apply_to(sum.particle_count)
    );
    if !report.failures.is_empty() {
        println!(
            "  {:<22}{}",
            s.label.apply_to("Failed images"),
            s.warning.apply_to(report.failures.len())
        );
        for failure in &report.failures {
            println!(
                "    {} {}",
                s.path.apply_to(failure.path.display()),
                s.disabled.apply_to(&failure.message)
            );
        }
    }
    println!();

    println!("  {}", s.header.apply_to("Population"));
    let rows = [
        ("Mean pixel diameter", optional(sum.mean_pixel_diameter, 2)),
        ("Mean contour diameter", optional(sum.mean_contour_diameter, 2)),
        ("Mean major axis", optional(sum.mean_major_axis, 2)),
        ("Mean minor axis", optional(sum.mean_minor_axis, 2)),
        ("Mean aspect ratio", optional(sum.mean_aspect_ratio, 3)),
        ("Mean eccentricity", optional(sum.mean_eccentricity, 3)),
        ("Max eccentricity", optional(sum.max_eccentricity, 3)),
        ("Sauter mean diameter", optional(sum.sauter_mean_diameter, 2)),
        ("Mean sphericity", optional(sum.mean_sphericity, 3)),
    ];
    for (label, value) in rows {
        println!("    {:<22}{}", s.label.apply_to(label), s.value.apply_to(value));
    }
    if let (Some(min), Some(max)) = (sum.min_pixel_area, sum.max_pixel_area) {
        println!(
            "    {:<22}{}",
            s.label.apply_to("Pixel area range"),
            s.value.apply_to(format!("{min} - {max}"))
        );
    }
}

pub fn print_dedup_summary(outcome: &DedupOutcome, total: usize, config: &DedupConfig) {
    let s = Styles::new();
    print_title(&s, "Repeat Removal");

    println!(
        "  {:<14}{}",
        s.label.apply_to("Records"),
        s.value.apply_to(total)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Removed"),
        s.value.apply_to(format!(
            "{} ({:.2}%)",
            outcome.removed.len(),
            outcome.percent_removed
        ))
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Kept"),
        s.value.apply_to(outcome.kept.len())
    );
    if outcome.dirty {
        println!();
        println!(
            "  {}",
            s.warning.apply_to(format!(
                "More than {}% of particles repeat: clean the sample cell and re-run.",
                config.max_percent_removed
            ))
        );
    }
}
