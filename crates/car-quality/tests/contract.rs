use car_quality::{CarQualityContract, ContractError, QualityRecord, MAX_QUALITY, MIN_QUALITY};
use ledger::{InMemoryStorage, Ledger, Storage, TxContext, WriteOp};

fn seeded() -> InMemoryStorage {
    InMemoryStorage::with_entries([
        ("1001", br#"{"value":1}"#.to_vec()),
        ("1002", br#"{"value":2}"#.to_vec()),
    ])
}

// ---------------- carQualityExists ---------------- //

#[test]
fn test_exists_for_stored_quality() {
    let contract = CarQualityContract::new();
    assert!(contract.car_quality_exists(&seeded(), "1001").unwrap());
}

#[test]
fn test_exists_false_without_key() {
    let contract = CarQualityContract::new();
    assert!(!contract.car_quality_exists(&seeded(), "1003").unwrap());
}

#[test]
fn test_exists_false_for_empty_bytes() {
    let contract = CarQualityContract::new();
    let state = InMemoryStorage::with_entries([("1003", Vec::new())]);
    assert!(!contract.car_quality_exists(&state, "1003").unwrap());
}

#[test]
fn test_exists_false_for_unseen_keys() {
    let contract = CarQualityContract::new();
    let state = seeded();
    for car_id in ["", "0", "1001 ", "x/y", "🚗", "1000", "10010"] {
        assert!(!contract.car_quality_exists(&state, car_id).unwrap(), "{car_id:?}");
    }
}

// ---------------- createCarQuality ---------------- //

#[test]
fn test_create_writes_exact_encoding_once() {
    let contract = CarQualityContract::new();
    let base = seeded();
    let mut ctx = TxContext::new(&base);

    contract.create_car_quality(&mut ctx, "1003", 1).unwrap();

    assert_eq!(
        ctx.into_write_set(),
        vec![WriteOp::Put { key: "1003".into(), value: br#"{"value":1}"#.to_vec() }]
    );
}

#[test]
fn test_create_duplicate_fails_and_keeps_value() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    let err = contract.create_car_quality(&mut state, "1001", 2).unwrap_err();

    assert!(matches!(err, ContractError::DuplicateAsset { ref car_id } if car_id == "1001"));
    assert_eq!(err.to_string(), "Quality already exists for car 1001");
    assert_eq!(contract.read_car_quality(&state, "1001").unwrap(), QualityRecord::new(1));
}

#[test]
fn test_create_twice_second_call_fails() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::new();

    contract.create_car_quality(&mut state, "2000", 40).unwrap();
    let err = contract.create_car_quality(&mut state, "2000", 80).unwrap_err();

    assert!(matches!(err, ContractError::DuplicateAsset { .. }));
    assert_eq!(contract.read_car_quality(&state, "2000").unwrap().value, 40);
}

#[test]
fn test_create_rejects_non_percentage() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    let err = contract.create_car_quality(&mut state, "2137", 101).unwrap_err();

    assert!(matches!(err, ContractError::InvalidValue { value: 101 }));
    assert!(err.to_string().contains("[1-100]"));
    assert!(!contract.car_quality_exists(&state, "2137").unwrap());
}

#[test]
fn test_create_out_of_range_leaves_key_absent() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::new();

    for value in [i32::MIN, -100, -1, MAX_QUALITY + 1, 1000, i32::MAX] {
        let err = contract.create_car_quality(&mut state, "3000", value).unwrap_err();
        assert!(matches!(err, ContractError::InvalidValue { .. }), "{value}");
        assert!(!contract.car_quality_exists(&state, "3000").unwrap());
    }
    assert!(state.is_empty().unwrap());
}

#[test]
fn test_create_then_read_round_trips_whole_range() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::new();

    for value in MIN_QUALITY..=MAX_QUALITY {
        let car_id = format!("car-{value}");
        contract.create_car_quality(&mut state, &car_id, value).unwrap();
        assert_eq!(contract.read_car_quality(&state, &car_id).unwrap(), QualityRecord::new(value));
    }
}

#[test]
fn test_create_duplicate_checked_before_range() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    let err = contract.create_car_quality(&mut state, "1001", 500).unwrap_err();
    assert!(matches!(err, ContractError::DuplicateAsset { .. }));
}

#[test]
fn test_create_over_empty_bytes() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::with_entries([("1003", Vec::new())]);

    contract.create_car_quality(&mut state, "1003", 9).unwrap();
    assert_eq!(contract.read_car_quality(&state, "1003").unwrap().value, 9);
}

// ---------------- readCarQuality ---------------- //

#[test]
fn test_read_returns_quality() {
    let contract = CarQualityContract::new();
    assert_eq!(contract.read_car_quality(&seeded(), "1001").unwrap().value, 1);
}

#[test]
fn test_read_missing_fails() {
    let contract = CarQualityContract::new();
    let err = contract.read_car_quality(&seeded(), "1003").unwrap_err();

    assert!(matches!(err, ContractError::AssetNotFound { ref car_id } if car_id == "1003"));
    assert_eq!(err.to_string(), "Quality doesn't exist for car 1003");
}

#[test]
fn test_read_malformed_record() {
    let contract = CarQualityContract::new();
    let state = InMemoryStorage::with_entries([
        ("bad-json", b"{value:".to_vec()),
        ("no-field", br#"{"score":3}"#.to_vec()),
        ("array", b"[42]".to_vec()),
        ("number", b"42".to_vec()),
    ]);

    for car_id in ["bad-json", "no-field", "array", "number"] {
        let err = contract.read_car_quality(&state, car_id).unwrap_err();
        assert!(matches!(err, ContractError::MalformedRecord { .. }), "{car_id}");
        assert!(err.to_string().contains(car_id));
    }
}

#[test]
fn test_read_rejects_sequence_form() {
    let contract = CarQualityContract::new();
    let state = InMemoryStorage::with_entries([("7000", b"[42]".to_vec())]);

    assert!(contract.car_quality_exists(&state, "7000").unwrap());
    let err = contract.read_car_quality(&state, "7000").unwrap_err();
    assert!(matches!(err, ContractError::MalformedRecord { ref car_id, .. } if car_id == "7000"));
}

// ---------------- updateCarQuality ---------------- //

#[test]
fn test_update_replaces_value() {
    let contract = CarQualityContract::new();
    let base = seeded();
    let mut ctx = TxContext::new(&base);

    contract.update_car_quality(&mut ctx, "1001", 3).unwrap();

    assert_eq!(
        ctx.write_set(),
        vec![WriteOp::Put { key: "1001".into(), value: br#"{"value":3}"#.to_vec() }]
    );
    assert_eq!(contract.read_car_quality(&ctx, "1001").unwrap().value, 3);
}

#[test]
fn test_update_missing_reports_not_found() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    let update_err = contract.update_car_quality(&mut state, "1003", 4).unwrap_err();
    let read_err = contract.read_car_quality(&state, "1003").unwrap_err();

    assert!(matches!(update_err, ContractError::AssetNotFound { .. }));
    assert_eq!(update_err.to_string(), read_err.to_string());
}

#[test]
fn test_update_rejects_non_percentage_before_lookup() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    // 2137 does not exist; the range check still wins
    let err = contract.update_car_quality(&mut state, "2137", 121).unwrap_err();
    assert!(matches!(err, ContractError::InvalidValue { value: 121 }));

    let err = contract.update_car_quality(&mut state, "1001", -1).unwrap_err();
    assert!(matches!(err, ContractError::InvalidValue { value: -1 }));
    assert_eq!(contract.read_car_quality(&state, "1001").unwrap().value, 1);
}

#[test]
fn test_update_over_malformed_record() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::with_entries([("1005", b"garbage".to_vec())]);

    contract.update_car_quality(&mut state, "1005", 55).unwrap();
    assert_eq!(contract.read_car_quality(&state, "1005").unwrap().value, 55);
}

#[test]
fn test_update_independent_of_prior_value() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::new();
    contract.create_car_quality(&mut state, "4000", 100).unwrap();

    for value in [0, 50, 50, 99, 1] {
        contract.update_car_quality(&mut state, "4000", value).unwrap();
        assert_eq!(contract.read_car_quality(&state, "4000").unwrap().value, value);
    }
}

// ---------------- deleteCarQuality ---------------- //

#[test]
fn test_delete_removes_key() {
    let contract = CarQualityContract::new();
    let base = seeded();
    let mut ctx = TxContext::new(&base);

    contract.delete_car_quality(&mut ctx, "1001").unwrap();

    assert_eq!(ctx.write_set(), vec![WriteOp::Delete { key: "1001".into() }]);
    assert!(!contract.car_quality_exists(&ctx, "1001").unwrap());
}

#[test]
fn test_delete_missing_fails() {
    let contract = CarQualityContract::new();
    let mut state = seeded();

    let err = contract.delete_car_quality(&mut state, "1003").unwrap_err();

    assert!(matches!(err, ContractError::AssetNotFound { .. }));
    assert_eq!(err.to_string(), "Quality doesn't exist for car 1003");
}

#[test]
fn test_key_cycles_between_absent_and_present() {
    let contract = CarQualityContract::new();
    let mut state = InMemoryStorage::new();

    for round in 0..3 {
        contract.create_car_quality(&mut state, "5000", round).unwrap();
        assert!(contract.car_quality_exists(&state, "5000").unwrap());
        contract.delete_car_quality(&mut state, "5000").unwrap();
        assert!(!contract.car_quality_exists(&state, "5000").unwrap());
        assert!(state.get("5000").unwrap().is_none());
    }
}

// ---------------- through the ledger host ---------------- //

#[test]
fn test_lifecycle_scenario_on_ledger() {
    let contract = CarQualityContract::new();
    let state = seeded();
    let handle = state.clone();
    let mut ledger = Ledger::new(state);

    assert!(ledger.evaluate(|ctx| contract.car_quality_exists(ctx, "1001")).unwrap());
    assert_eq!(ledger.evaluate(|ctx| contract.read_car_quality(ctx, "1001")).unwrap().value, 1);

    ledger
        .submit("updateCarQuality", |ctx| contract.update_car_quality(ctx, "1001", 3))
        .unwrap();
    assert_eq!(ledger.evaluate(|ctx| contract.read_car_quality(ctx, "1001")).unwrap().value, 3);

    ledger
        .submit("deleteCarQuality", |ctx| contract.delete_car_quality(ctx, "1001"))
        .unwrap();
    assert!(!ledger.evaluate(|ctx| contract.car_quality_exists(ctx, "1001")).unwrap());

    let (_, receipt) = ledger
        .submit("createCarQuality", |ctx| contract.create_car_quality(ctx, "1003", 1))
        .unwrap();
    assert_eq!(
        receipt.write_set,
        vec![WriteOp::Put { key: "1003".into(), value: br#"{"value":1}"#.to_vec() }]
    );
    assert_eq!(handle.get("1003").unwrap(), Some(br#"{"value":1}"#.to_vec()));

    let err = ledger
        .submit("createCarQuality", |ctx| contract.create_car_quality(ctx, "2137", 101))
        .unwrap_err();
    assert!(matches!(err, ContractError::InvalidValue { value: 101 }));

    assert_eq!(ledger.height(), 3);
    assert!(ledger.verify_commit_log());
}

#[test]
fn test_rejected_transaction_commits_nothing() {
    let contract = CarQualityContract::new();
    let state = seeded();
    let handle = state.clone();
    let mut ledger = Ledger::new(state);

    let before = handle.snapshot().unwrap();
    let result = ledger.submit("createCarQuality", |ctx| contract.create_car_quality(ctx, "1002", 50));

    assert!(matches!(result, Err(ContractError::DuplicateAsset { .. })));
    assert_eq!(handle.snapshot().unwrap(), before);
    assert!(ledger.latest_receipt().is_none());
}
