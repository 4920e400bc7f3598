use dinesat::config::{ModelConfig, ModelType};
use dinesat::matrix::FeatureMatrix;
use dinesat::models::factory;

#[test]
fn test_factory_builds_and_predicts() {
    // tiny dataset
    let x = FeatureMatrix::from_shape_vec(
        (6, 2),
        vec![
            1.0, 0.0, // class 1
            0.0, 1.0, // class 0
            1.0, 0.1, // class 1
            0.0, 0.9, // class 0
            1.1, 0.0, // class 1
            0.0, 1.2, // class 0
        ],
    )
    .expect("failed to create feature matrix");
    let y = vec![1, 0, 1, 0, 1, 0];

    let params = ModelConfig {
        learning_rate: 0.1,
        model_type: ModelType::Gbdt {
            max_depth: 3,
            num_boost_round: 10,
            debug: false,
            training_optimization_level: 2,
            loss_type: "LogLikelyhood".to_string(),
        },
    };

    let mut model = factory::build_model(params);
    model.fit(&x, &y).unwrap();
    let labels = model.predict(&x).unwrap();
    assert_eq!(labels.len(), x.nrows());
    assert_eq!(labels, y);
}
