//! Email Metadata Encoding
//!
//! This example fits the sender and receivers encoders on a small mailbox,
//! then encodes both the whole mailbox and one incoming email:
//! - Top-N vocabulary reduction with a catch-all category
//! - Dual-mode transform (single record vs table)
//! - Saving and reloading a fitted encoder
//!
//! Run with: RUST_LOG=debug cargo run --example email_metadata

use mailfeat::{
    preprocessing::{
        FittedReceiverEncoder, FittedTransformer, ReceiverEncoder, SenderEncoder, Transformer,
        RECEIVERS_FIELD, SENDER_FIELD,
    },
    RecordSource,
};
use serde_json::json;
use std::error::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn mailbox() -> serde_json::Value {
    json!([
        {"from": "claims.desk@insurer.com", "to": ["support@insurer.com"]},
        {"from": "claims.desk@insurer.com", "to": ["support@insurer.com", "jean.dupont@mail.fr"]},
        {"from": "jean.dupont@mail.fr", "to": "['claims.desk@insurer.com']"},
        {"from": "marie.curie@mail.fr", "to": ["claims.desk@insurer.com"]},
        {"from": null, "to": []},
        {"from": "claims.desk@insurer.com", "to": ["support@insurer.com"]},
    ])
}

fn main() -> Result<(), Box<dyn Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let train = RecordSource::try_from(mailbox())?;

    let sender = SenderEncoder::new().with_top_n(2).fit(&train)?;
    let receivers = ReceiverEncoder::new().with_top_n(2).fit(&train)?;

    info!(top = ?sender.top_values(), classes = ?sender.classes(), "sender vocabulary");
    info!(top = ?receivers.top_values(), classes = ?receivers.classes(), "receivers vocabulary");

    let encoded = receivers.transform(sender.transform(train)?)?;
    if let Some(table) = encoded.into_table() {
        for (i, row) in table.rows().iter().enumerate() {
            println!(
                "email {i}: sender={} receivers={}",
                row[SENDER_FIELD], row[RECEIVERS_FIELD]
            );
        }
    }

    // One email arriving after training, from an unknown sender.
    let email = RecordSource::try_from(json!({
        "from": "new.customer@mail.fr",
        "to": ["support@insurer.com", "someone.else@insurer.com"],
    }))?;
    let encoded = receivers.transform(sender.transform(email)?)?;
    if let Some(record) = encoded.into_single() {
        println!(
            "incoming: sender={} receivers={}",
            record[SENDER_FIELD], record[RECEIVERS_FIELD]
        );
    }

    let path = std::env::temp_dir().join("receivers_encoder.bin");
    receivers.save_to_file(&path)?;
    let reloaded = FittedReceiverEncoder::load_from_file(&path)?;
    println!("reloaded receivers encoder: {} classes", reloaded.n_classes());
    std::fs::remove_file(path).ok();

    Ok(())
}
