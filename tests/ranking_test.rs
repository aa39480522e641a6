use palyno::{top_predictions, ClassMapping};

fn mapping() -> ClassMapping {
    ClassMapping::from_json(
        r#"{
            "0": "anadenanthera",
            "1": "arecaceae",
            "2": "cecropia",
            "3": "combretum",
            "4": "croton"
        }"#,
    )
    .unwrap()
}

#[test]
fn test_mock_five_class_vector() {
    let scores = [0.1, 0.5, 0.05, 0.3, 0.05];
    let top = top_predictions(&scores, &mapping(), 3);

    assert_eq!(top.len(), 3);
    let indices: Vec<u32> = top.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![1, 3, 0]);

    let confidences: Vec<f32> = top.iter().map(|p| p.confidence).collect();
    assert!((confidences[0] - 50.0).abs() < 1e-4);
    assert!((confidences[1] - 30.0).abs() < 1e-4);
    assert!((confidences[2] - 10.0).abs() < 1e-4);

    assert_eq!(top[0].label, "arecaceae");
    assert_eq!(top[1].label, "combretum");
    assert_eq!(top[2].label, "anadenanthera");
}

#[test]
fn test_descending_order_is_maintained() {
    let scores = [0.05, 0.1, 0.15, 0.4, 0.3];
    let top = top_predictions(&scores, &mapping(), 5);
    for pair in top.windows(2) {
        assert!(pair[0].confidence >= pair[1].confidence);
    }
}

#[test]
fn test_tied_scores_keep_original_index_order() {
    let scores = [0.2, 0.2, 0.2, 0.2, 0.2];
    let top = top_predictions(&scores, &mapping(), 5);
    let indices: Vec<u32> = top.iter().map(|p| p.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_unmapped_index_falls_back_to_synthetic_label() {
    let sparse = ClassMapping::from_json(r#"{"0": "anadenanthera", "2": "cecropia"}"#).unwrap();
    let scores = [0.1, 0.6, 0.3];
    let top = top_predictions(&scores, &sparse, 3);

    assert_eq!(top[0].label, "Class 1");
    assert_eq!(top[1].label, "cecropia");
    assert_eq!(top[2].label, "anadenanthera");
}

#[test]
fn test_full_distribution_sums_to_one_hundred_percent() {
    let scores = [0.1, 0.5, 0.05, 0.3, 0.05];
    let top = top_predictions(&scores, &mapping(), 5);
    let total: f32 = top.iter().map(|p| p.confidence).sum();
    assert!((total - 100.0).abs() < 1e-3);
}
