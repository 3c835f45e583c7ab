//! Property-based tests for configuration validation

use super::error::ValidationError;
use super::validator::validate_config;
use crate::config::schema::*;
use proptest::prelude::*;

fn arb_valid_spec() -> impl Strategy<Value = TransferSpec> {
    (
        1usize..1024,    // batch_size
        1e-6f32..1.0,    // lr
        1usize..200,     // epochs
        0usize..10,      // target
        0.0f32..=1.0,    // train_prob
        proptest::collection::btree_set(1usize..100, 0..4), // milestones
    )
        .prop_map(|(batch_size, lr, epochs, target, train_prob, milestones)| {
            let mut spec = TransferSpec::default();
            spec.data.batch_size = batch_size;
            spec.optimizer.lr = lr;
            spec.training.epochs = epochs;
            spec.attack.target = target;
            spec.attack.train_prob = train_prob;
            spec.scheduler.milestones = milestones.into_iter().collect();
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_valid_spec_passes(spec in arb_valid_spec()) {
        prop_assert!(validate_config(&spec).is_ok());
    }

    #[test]
    fn prop_zero_batch_size_fails(spec in arb_valid_spec()) {
        let mut spec = spec;
        spec.data.batch_size = 0;
        prop_assert!(matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidBatchSize(0))
        ));
    }

    #[test]
    fn prop_target_beyond_classes_fails(spec in arb_valid_spec(), extra in 0usize..50) {
        let mut spec = spec;
        spec.attack.target = 10 + extra;
        let is_invalid_target = matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidTarget { .. })
        );
        prop_assert!(is_invalid_target);
    }

    #[test]
    fn prop_lr_above_one_fails(spec in arb_valid_spec(), lr in 1.0001f32..100.0) {
        let mut spec = spec;
        spec.optimizer.lr = lr;
        let is_invalid_lr = matches!(
            validate_config(&spec),
            Err(ValidationError::InvalidLearningRate(_))
        );
        prop_assert!(is_invalid_lr);
    }
}
