#![cfg(feature = "cli")]

mod common;

use common::run;

#[test]
fn evaluate_prints_one_line_per_component() {
    let output = run(["evaluate", "ex", "ey", "dby", "--point=2e-5,1e-4,0"]);
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ex = "));
    assert!(lines[1].starts_with("ey = "));
    assert!(lines[2].starts_with("dby = "));
    assert!(lines.iter().all(|line| line.ends_with("[converged]")));
}

#[test]
fn evaluate_accepts_negative_coordinates_and_config_overrides() {
    let output = run([
        "evaluate",
        "ez",
        "--point=1e-5,0,-1e-7",
        "--bound-tolerance=0.01",
        "--legacy-ez",
    ]);
    assert!(output.starts_with("ez = -"));
}

#[test]
fn evaluate_uses_default_point_at_bunch_center() {
    let output = run(["evaluate", "ex", "ey"]);
    assert_eq!(output, "ex = 0e0 V/m [converged]\ney = 0e0 V/m [converged]\n");
}

#[test]
fn timing_is_written_after_results() {
    let output = run(["--timing", "evaluate", "ez", "--point=0,0,1e-7"]);
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("ez = "));
    assert!(lines[1].starts_with("Elapsed time: "));
}

#[test]
fn sweep_prints_csv_profile() {
    let output = run([
        "sweep",
        "ey",
        "--axis=y",
        "--range=0,10",
        "--n-points=11",
        "--sequential",
    ]);
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines[0], "coordinate,coordinate_over_sigma,value,status");
    assert_eq!(lines.len(), 12);

    let columns: Vec<_> = lines[11].split(',').collect();
    assert_eq!(columns.len(), 4);
    assert!((columns[1].parse::<f64>().unwrap() - 10.0).abs() < 1e-12);
    assert!(columns[2].parse::<f64>().unwrap() > 0.0);
    assert_eq!(columns[3], "converged");
}

#[test]
fn parallel_and_sequential_sweeps_print_the_same() {
    let args = ["sweep", "ex", "--axis=x", "--range=-3,3", "-n", "7", "--point=0,2e-5,0"];
    let parallel = run(args);
    let sequential = run(args.into_iter().chain(["--sequential"]));
    assert_eq!(parallel, sequential);
}
