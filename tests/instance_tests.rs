mod fixtures;

use std::io::Write;

use fixtures::data_path;
use vrpd_routes::instance::InstanceSource;
use vrpd_routes::{Coordinate, Instance, InstanceError, Solution, SolutionError};

#[test]
fn loads_instance_file() {
    let path = data_path("two_vehicles.txt");
    let instance = Instance::from_file(&path).unwrap();

    assert_eq!(instance.num_vehicles(), 2);
    assert_eq!(instance.vehicle_capacities(), &[20, 15]);
    assert_eq!(instance.drone_capacities(), &[5, 4]);
    assert_eq!(instance.num_clients(), 5);
    assert_eq!(instance.client(4).map(|c| c.location), Some(Coordinate::new(-1, -4)));
    assert_eq!(instance.source(), &InstanceSource::File(path.clone()));

    let summary = instance.to_string();
    assert!(summary.contains(&format!("Instance file = {}", path.display())));
    assert!(summary.contains("Client 5: Demand = 2, Location = (6, 6)"));
}

#[test]
fn missing_instance_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Instance::from_file(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, InstanceError::Io { .. }));
}

#[test]
fn malformed_instance_file_names_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "2\n10\n0\n\n0 0").unwrap();

    let err = Instance::from_file(file.path()).unwrap_err();
    assert!(matches!(err, InstanceError::Malformed { line: 1, .. }));
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn malformed_solution_file_names_line() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "1 1 T\n2 1 Z").unwrap();

    let err = Solution::from_file(file.path()).unwrap_err();
    assert!(matches!(err, SolutionError::Malformed { line: 1, .. }));
}
