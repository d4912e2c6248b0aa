use anyhow::Result;
use car_quality::{invoke, CarQualityContract, TX_CREATE, TX_DELETE, TX_EXISTS, TX_READ, TX_UPDATE};
use ledger::{InMemoryStorage, Ledger};

fn query(
    ledger: &Ledger<InMemoryStorage>,
    contract: &CarQualityContract,
    function: &str,
    args: &[&str],
) -> Result<String> {
    let payload = ledger.evaluate(|ctx| invoke(contract, ctx, function, args))?;
    Ok(String::from_utf8_lossy(&payload).into_owned())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Car Quality Demo ===\n");

    let storage = InMemoryStorage::with_entries([("1001", br#"{"value":1}"#.to_vec())]);
    let mut ledger = Ledger::new(storage);
    let contract = CarQualityContract::new();

    // 1. Seeded record
    println!("--- Seeded state ---");
    println!("exists(1001) = {}", query(&ledger, &contract, TX_EXISTS, &["1001"])?);
    println!("read(1001)   = {}", query(&ledger, &contract, TX_READ, &["1001"])?);

    // 2. Lifecycle through committed transactions
    println!("\n--- Transactions ---");
    let steps: [(&str, &[&str]); 3] = [
        (TX_UPDATE, &["1001", "3"]),
        (TX_DELETE, &["1001"]),
        (TX_CREATE, &["1003", "1"]),
    ];
    for (function, args) in steps {
        let (_, receipt) = ledger.submit(function, |ctx| invoke(&contract, ctx, function, args))?;
        println!(
            "{function}({}) committed at height {} tx {}",
            args.join(", "),
            receipt.height,
            &hex::encode(receipt.tx_id)[..16]
        );
    }

    println!("exists(1001) = {}", query(&ledger, &contract, TX_EXISTS, &["1001"])?);
    println!("read(1003)   = {}", query(&ledger, &contract, TX_READ, &["1003"])?);

    // 3. Rejections leave state alone
    println!("\n--- Rejections ---");
    let rejected: [(&str, &[&str]); 3] = [
        (TX_CREATE, &["2137", "101"]),
        (TX_CREATE, &["1003", "50"]),
        (TX_UPDATE, &["9999", "10"]),
    ];
    for (function, args) in rejected {
        match ledger.submit(function, |ctx| invoke(&contract, ctx, function, args)) {
            Ok(_) => println!("{function}({}) unexpectedly committed", args.join(", ")),
            Err(e) => println!("{function}({}) rejected: {e}", args.join(", ")),
        }
    }

    println!("\nHeight: {}", ledger.height());
    println!(
        "Commit log: {}",
        if ledger.verify_commit_log() { "OK ✅" } else { "BROKEN ❌" }
    );

    Ok(())
}
