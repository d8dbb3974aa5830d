use aco_instances::{tsplib, Instance};

#[test]
fn test_generate_is_symmetric_with_zero_diagonal() {
    let instance = Instance::generate(1337, 25).unwrap();
    let n = instance.num_nodes();
    assert_eq!(n, 25);
    for i in 0..n {
        assert_eq!(instance.distance(i, i), 0.0);
        for j in 0..n {
            assert!(instance.distance(i, j) >= 0.0);
            assert_eq!(instance.distance(i, j), instance.distance(j, i));
        }
    }
}

#[test]
fn test_generate_is_deterministic() {
    let a = Instance::generate(42, 10).unwrap();
    let b = Instance::generate(42, 10).unwrap();
    assert_eq!(a.node_positions, b.node_positions);
}

#[test]
fn test_generate_rejects_tiny_instances() {
    assert!(Instance::generate(0, 2).is_err());
}

#[test]
fn test_tour_distance_unit_square() {
    let instance =
        Instance::from_node_positions(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert_eq!(instance.tour_distance(&[0, 1, 2, 3]).unwrap(), 4.0);
    assert_eq!(instance.tour_distance(&[2, 1, 0, 3]).unwrap(), 4.0);
}

#[test]
fn test_tour_distance_rejects_bad_routes() {
    let instance =
        Instance::from_node_positions(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert!(instance.tour_distance(&[0, 1, 2]).is_err());
    assert!(instance.tour_distance(&[0, 1, 2, 2]).is_err());
    assert!(instance.tour_distance(&[0, 1, 2, 4]).is_err());
}

#[test]
fn test_validate_accepts_built_instances() {
    assert!(Instance::generate(7, 6).unwrap().validate().is_ok());
    let square =
        Instance::from_node_positions(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
    assert!(square.validate().is_ok());
}

#[test]
fn test_validate_rejects_ragged_json_instance() {
    // a hand-edited instance file with a short row must be rejected before
    // anything indexes into the matrix
    let instance: Instance = serde_json::from_str(
        r#"{"node_positions":[[0.0,0.0],[1.0,0.0],[2.0,0.0]],
            "distance_matrix":[[0.0,1.0,2.0],[1.0],[2.0,1.0,0.0]]}"#,
    )
    .unwrap();
    assert!(instance.validate().is_err());
}

#[test]
fn test_validate_rejects_inconsistent_matrices() {
    let good =
        Instance::from_node_positions(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);

    let mut wrong_shape = good.clone();
    wrong_shape.distance_matrix.pop();
    assert!(wrong_shape.validate().is_err());

    let mut nonzero_diagonal = good.clone();
    nonzero_diagonal.distance_matrix[2][2] = 0.5;
    assert!(nonzero_diagonal.validate().is_err());

    let mut negative_entry = good.clone();
    negative_entry.distance_matrix[0][1] = -1.0;
    negative_entry.distance_matrix[1][0] = -1.0;
    assert!(negative_entry.validate().is_err());

    let mut non_finite_entry = good.clone();
    non_finite_entry.distance_matrix[0][1] = f64::NAN;
    non_finite_entry.distance_matrix[1][0] = f64::NAN;
    assert!(non_finite_entry.validate().is_err());

    let mut asymmetric = good.clone();
    asymmetric.distance_matrix[0][1] = 3.0;
    assert!(asymmetric.validate().is_err());
}

#[test]
fn test_parse_tsplib_instance() {
    let contents = "NAME : square4\n\
                    TYPE : TSP\n\
                    DIMENSION : 4\n\
                    EDGE_WEIGHT_TYPE : EUC_2D\n\
                    NODE_COORD_SECTION\n\
                    1 0.0 0.0\n\
                    2 1.0 0.0\n\
                    3 1.0 1.0\n\
                    4 0.0 1.0\n\
                    EOF\n";
    let instance = tsplib::parse_instance(contents).unwrap();
    assert_eq!(instance.num_nodes(), 4);
    assert_eq!(instance.distance(0, 1), 1.0);
    assert_eq!(instance.tour_distance(&[0, 1, 2, 3]).unwrap(), 4.0);
}

#[test]
fn test_parse_tsplib_rejects_garbage() {
    assert!(tsplib::parse_instance("COMMENT : nothing here\n").is_err());
    assert!(tsplib::parse_instance("NODE_COORD_SECTION\n1 zero 0.0\nEOF\n").is_err());
}
